//! Viewer session: one object owning everything the render loop touches
use crate::camera::Camera;
use crate::geometry::Model;
use crate::lights::LightRig;
use crate::orbit::OrbitControls;

/// Uniform scale applied to every loaded model
pub const MODEL_SCALE: f32 = 8.0;

/// Spin increment per frame, radians around the vertical axis
pub const SPIN_STEP: f32 = 0.008;

/// Upper bound on the square render target edge, CSS pixels
pub const MAX_RENDER_SIZE: u32 = 800;

/// Scene clear color (#f5f5f5)
pub const BACKGROUND: [f64; 4] = [0.961, 0.961, 0.961, 1.0];

/// Where the single asset load attempt stands. `Loaded` and `Failed` are
/// terminal and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Pending,
    Loaded,
    Failed,
}

/// Square render size for a container of the given width
pub fn render_size(container_width: u32) -> u32 {
    container_width.min(MAX_RENDER_SIZE)
}

/// The viewer session. The model is absent until the asset load succeeds;
/// every consumer must treat it as optional.
pub struct ViewerSession {
    pub camera: Camera,
    pub controls: OrbitControls,
    pub lights: LightRig,
    model: Option<Model>,
    phase: LoadPhase,
}

impl ViewerSession {
    pub fn new() -> Self {
        let camera = Camera::new();
        let controls = OrbitControls::new(&camera);
        Self {
            camera,
            controls,
            lights: LightRig::studio(),
            model: None,
            phase: LoadPhase::Pending,
        }
    }

    /// Install a freshly decoded model: scale it, center it on the origin,
    /// switch its shadows on, and mark the load as done.
    pub fn install_model(&mut self, mut model: Model) {
        model.scale = MODEL_SCALE;
        model.recenter();
        model.enable_shadows();
        self.model = Some(model);
        self.phase = LoadPhase::Loaded;
    }

    /// Record a failed load; the viewer keeps rendering the empty scene
    pub fn mark_failed(&mut self) {
        if self.phase == LoadPhase::Pending {
            self.phase = LoadPhase::Failed;
        }
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == LoadPhase::Loaded
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// One frame step: spin the model if present, then advance the controls
    pub fn advance_frame(&mut self) {
        if let Some(model) = &mut self.model {
            model.spin(SPIN_STEP);
        }
        self.controls.update(&mut self.camera);
    }

    /// Recompute the square render size for a container width and force the
    /// camera aspect back to 1.
    pub fn resize(&mut self, container_width: u32) -> u32 {
        self.camera.set_aspect(1.0);
        render_size(container_width)
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MeshNode, Vertex};

    fn sample_model() -> Model {
        Model::new(vec![MeshNode {
            name: Some("tri".to_string()),
            vertices: vec![
                Vertex::new(2.0, 0.0, 0.0, 0.0, 0.0, 1.0),
                Vertex::new(4.0, 0.0, 0.0, 0.0, 0.0, 1.0),
                Vertex::new(3.0, 2.0, 0.0, 0.0, 0.0, 1.0),
            ],
            indices: vec![0, 1, 2],
            base_color: [1.0, 1.0, 1.0, 1.0],
            cast_shadow: false,
            receive_shadow: false,
        }])
    }

    #[test]
    fn test_render_size_cap() {
        assert_eq!(render_size(500), 500);
        assert_eq!(render_size(1000), 800);
        assert_eq!(render_size(800), 800);
    }

    #[test]
    fn test_frame_before_load_is_harmless() {
        let mut session = ViewerSession::new();
        assert!(session.model().is_none());
        session.advance_frame();
        assert!(session.model().is_none());
        assert_eq!(session.load_phase(), LoadPhase::Pending);
    }

    #[test]
    fn test_install_model_prepares_it() {
        let mut session = ViewerSession::new();
        session.install_model(sample_model());
        assert!(session.is_loaded());

        let model = session.model().unwrap();
        assert!((model.scale - MODEL_SCALE).abs() < 1e-6);
        let center = model.bounding_box().unwrap().center();
        assert!(center.coords.norm() < 1e-3);
        assert!(model.nodes.iter().all(|n| n.cast_shadow && n.receive_shadow));
    }

    #[test]
    fn test_spin_step_per_frame() {
        let mut session = ViewerSession::new();
        session.install_model(sample_model());
        let before = session.model().unwrap().rotation_y;
        session.advance_frame();
        let after = session.model().unwrap().rotation_y;
        assert!((after - before - SPIN_STEP).abs() < 1e-7);
    }

    #[test]
    fn test_failure_is_terminal_and_exclusive() {
        let mut session = ViewerSession::new();
        session.mark_failed();
        assert_eq!(session.load_phase(), LoadPhase::Failed);
        // A later failure report must not overwrite a success
        let mut session = ViewerSession::new();
        session.install_model(sample_model());
        session.mark_failed();
        assert_eq!(session.load_phase(), LoadPhase::Loaded);
    }

    #[test]
    fn test_resize_forces_square_aspect() {
        let mut session = ViewerSession::new();
        session.camera.set_aspect(1.8);
        let size = session.resize(500);
        assert_eq!(size, 500);
        assert!((session.camera.aspect - 1.0).abs() < 1e-6);
    }
}
