//! The fixed three-light studio rig
use nalgebra::Point3;

/// Shadow map resolution for the directional light
pub const SHADOW_MAP_SIZE: u32 = 2048;

#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Point3<f32>,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Point3<f32>,
    /// Aim point of the cone
    pub target: Point3<f32>,
    /// Full cone half-angle, radians
    pub angle: f32,
}

/// The viewer's light rig: an ambient fill, a shadow-casting key light from
/// above, and a dim spot from the side. Configured once, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub spot: SpotLight,
}

impl LightRig {
    pub fn studio() -> Self {
        let white = [1.0, 1.0, 1.0];
        Self {
            ambient: AmbientLight {
                color: white,
                intensity: 0.6,
            },
            directional: DirectionalLight {
                color: white,
                intensity: 0.8,
                position: Point3::new(5.0, 8.0, 5.0),
                cast_shadow: true,
                shadow_map_size: SHADOW_MAP_SIZE,
            },
            spot: SpotLight {
                color: white,
                intensity: 0.3,
                position: Point3::new(-5.0, 5.0, 0.0),
                target: Point3::origin(),
                angle: std::f32::consts::FRAC_PI_3,
            },
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::studio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_studio_rig() {
        let rig = LightRig::studio();
        assert!((rig.ambient.intensity - 0.6).abs() < 1e-6);
        assert!((rig.directional.intensity - 0.8).abs() < 1e-6);
        assert!((rig.spot.intensity - 0.3).abs() < 1e-6);
        assert!(rig.directional.cast_shadow);
        assert_eq!(rig.directional.shadow_map_size, 2048);
        assert_eq!(rig.directional.position, Point3::new(5.0, 8.0, 5.0));
        assert_eq!(rig.spot.position, Point3::new(-5.0, 5.0, 0.0));
    }
}
