//! Card tilt arithmetic: a pure function of the latest pointer position
//!
//! The decorative tilt is independent of the 3D scene. The DOM wiring lives
//! in the web crate; this module only computes the angles so they can be
//! tested natively.

/// Total swing across the viewport, degrees
pub const TILT_RANGE_DEG: f32 = 20.0;

/// Rotation applied to the card element, degrees per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltAngles {
    /// Rotation around the vertical axis (CSS rotateY)
    pub yaw_deg: f32,
    /// Rotation around the horizontal axis (CSS rotateX)
    pub pitch_deg: f32,
}

impl TiltAngles {
    /// The neutral pose the card returns to when the pointer leaves
    pub fn rest() -> Self {
        Self {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
        }
    }

    /// Angles for a pointer at (x, y) within a viewport of the given size.
    /// Degenerate viewports yield the rest pose.
    pub fn from_pointer(x: f32, y: f32, viewport_width: f32, viewport_height: f32) -> Self {
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Self::rest();
        }
        Self {
            yaw_deg: (x / viewport_width - 0.5) * TILT_RANGE_DEG,
            pitch_deg: -(y / viewport_height - 0.5) * TILT_RANGE_DEG,
        }
    }

    /// CSS transform value applying the rotation
    pub fn css_transform(&self) -> String {
        format!(
            "rotateY({}deg) rotateX({}deg)",
            self.yaw_deg, self.pitch_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_neutral() {
        let angles = TiltAngles::from_pointer(400.0, 300.0, 800.0, 600.0);
        assert_eq!(angles, TiltAngles::rest());
    }

    #[test]
    fn test_corners_hit_the_range_limits() {
        let top_left = TiltAngles::from_pointer(0.0, 0.0, 800.0, 600.0);
        assert!((top_left.yaw_deg + 10.0).abs() < 1e-5);
        assert!((top_left.pitch_deg - 10.0).abs() < 1e-5);

        let bottom_right = TiltAngles::from_pointer(800.0, 600.0, 800.0, 600.0);
        assert!((bottom_right.yaw_deg - 10.0).abs() < 1e-5);
        assert!((bottom_right.pitch_deg + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_viewport() {
        assert_eq!(
            TiltAngles::from_pointer(10.0, 10.0, 0.0, 0.0),
            TiltAngles::rest()
        );
    }

    #[test]
    fn test_css_transform_rest() {
        assert_eq!(
            TiltAngles::rest().css_transform(),
            "rotateY(0deg) rotateX(0deg)"
        );
    }
}
