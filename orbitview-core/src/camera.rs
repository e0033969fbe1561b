//! Perspective camera state and matrix construction
use nalgebra::{Matrix4, Point3, Vector3};

/// Vertical field of view, radians (35 degrees)
const FOV_Y: f32 = 35.0 * std::f32::consts::PI / 180.0;

/// Perspective camera for the viewer. The aspect ratio is the only field
/// mutated after construction (forced square on resize); the position is
/// driven every frame by the orbit controls.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Point3::new(0.0, 3.0, 12.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: FOV_Y,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::new();
        assert_eq!(camera.position, Point3::new(0.0, 3.0, 12.0));
        assert_eq!(camera.aspect, 1.0);
        assert!((camera.fov - 35.0_f32.to_radians()).abs() < 1e-6);
        assert!((camera.near - 0.1).abs() < 1e-6);
        assert!((camera.far - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_nonzero() {
        let camera = Camera::new();
        assert!(camera.view_matrix().norm() > 0.0);
    }

    #[test]
    fn test_set_aspect() {
        let mut camera = Camera::new();
        camera.set_aspect(1.0);
        let square = camera.projection_matrix();
        camera.set_aspect(2.0);
        let wide = camera.projection_matrix();
        assert!((square - wide).norm() > 0.0);
    }
}
