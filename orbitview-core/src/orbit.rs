//! Orbit controls: spherical camera motion around a fixed target
use std::f32::consts::{FRAC_PI_2, PI};

use nalgebra::{Point3, Vector3};

use crate::camera::Camera;

/// Keeps the polar angle away from the poles where the view basis degenerates
const POLAR_EPSILON: f32 = 1e-3;

/// Per-frame auto-rotation step at speed 1.0: one full turn per minute
/// assuming 60 frames per second.
const AUTO_ROTATE_STEP: f32 = 2.0 * PI / 60.0 / 60.0;

/// Orbit-style interaction controller. Pointer input moves goal spherical
/// coordinates; `update` eases the current coordinates toward the goals
/// (when damping is enabled) and writes the camera position.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Point3<f32>,
    azimuth: f32,
    polar: f32,
    radius: f32,
    goal_azimuth: f32,
    goal_polar: f32,
    goal_radius: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_polar_angle: f32,
    pub enable_pan: bool,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl OrbitControls {
    /// Derive the initial spherical coordinates from the camera position
    pub fn new(camera: &Camera) -> Self {
        let rel = camera.position - camera.target;
        let radius = rel.norm().max(POLAR_EPSILON);
        let polar = (rel.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = rel.x.atan2(rel.z);
        Self {
            target: camera.target,
            azimuth,
            polar,
            radius,
            goal_azimuth: azimuth,
            goal_polar: polar,
            goal_radius: radius,
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 6.0,
            max_distance: 20.0,
            max_polar_angle: FRAC_PI_2,
            enable_pan: false,
            auto_rotate: false,
            auto_rotate_speed: 1.0,
        }
    }

    /// Rotate by angular deltas (radians): positive azimuth turns the camera
    /// around the subject, positive polar tilts it toward the horizon.
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.goal_azimuth += d_azimuth;
        self.goal_polar = self.clamp_polar(self.goal_polar + d_polar);
    }

    /// Zoom by a distance delta, clamped to the configured range
    pub fn zoom(&mut self, delta: f32) {
        self.goal_radius = (self.goal_radius + delta).clamp(self.min_distance, self.max_distance);
    }

    /// Advance damping (or snap when damping is off) and reposition the camera
    pub fn update(&mut self, camera: &mut Camera) {
        if self.auto_rotate {
            self.goal_azimuth += AUTO_ROTATE_STEP * self.auto_rotate_speed;
        }

        if self.enable_damping {
            let k = self.damping_factor;
            self.azimuth += (self.goal_azimuth - self.azimuth) * k;
            self.polar += (self.goal_polar - self.polar) * k;
            self.radius += (self.goal_radius - self.radius) * k;
        } else {
            self.azimuth = self.goal_azimuth;
            self.polar = self.goal_polar;
            self.radius = self.goal_radius;
        }
        self.polar = self.clamp_polar(self.polar);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        camera.target = self.target;
        camera.position = self.target + self.offset();
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    fn clamp_polar(&self, polar: f32) -> f32 {
        polar.clamp(POLAR_EPSILON, self.max_polar_angle)
    }

    fn offset(&self) -> Vector3<f32> {
        Vector3::new(
            self.radius * self.polar.sin() * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * self.polar.sin() * self.azimuth.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> (Camera, OrbitControls) {
        let camera = Camera::new();
        let controls = OrbitControls::new(&camera);
        (camera, controls)
    }

    #[test]
    fn test_initial_spherical_matches_camera() {
        let (camera, controls) = controls();
        let expected = (camera.position - camera.target).norm();
        assert!((controls.radius() - expected).abs() < 1e-4);
        // Camera starts slightly above the horizon, never below it
        assert!(controls.polar() > 0.0 && controls.polar() <= FRAC_PI_2);
    }

    #[test]
    fn test_update_preserves_distance() {
        let (mut camera, mut controls) = controls();
        controls.update(&mut camera);
        let dist = (camera.position - camera.target).norm();
        assert!((dist - controls.radius()).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let (_, mut controls) = controls();
        controls.zoom(100.0);
        assert!((controls.goal_radius - 20.0).abs() < 1e-6);
        controls.zoom(-100.0);
        assert!((controls.goal_radius - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_polar_never_goes_below_horizon() {
        let (mut camera, mut controls) = controls();
        controls.rotate(0.0, 10.0);
        for _ in 0..200 {
            controls.update(&mut camera);
        }
        assert!(controls.polar() <= FRAC_PI_2 + 1e-6);
        assert!(camera.position.y >= -1e-4);
    }

    #[test]
    fn test_damping_converges_to_goal() {
        let (mut camera, mut controls) = controls();
        let start = controls.azimuth();
        controls.rotate(0.5, 0.0);
        controls.update(&mut camera);
        let after_one = controls.azimuth();
        // One damped step covers the damping factor's share of the distance
        assert!((after_one - start - 0.5 * 0.05).abs() < 1e-5);
        for _ in 0..500 {
            controls.update(&mut camera);
        }
        assert!((controls.azimuth() - (start + 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_no_damping_snaps() {
        let (mut camera, mut controls) = controls();
        controls.enable_damping = false;
        let start = controls.azimuth();
        controls.rotate(0.3, 0.0);
        controls.update(&mut camera);
        assert!((controls.azimuth() - start - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_auto_rotate_disabled_by_default() {
        let (mut camera, mut controls) = controls();
        assert!(!controls.auto_rotate);
        let before = controls.azimuth();
        for _ in 0..10 {
            controls.update(&mut camera);
        }
        assert!((controls.azimuth() - before).abs() < 1e-6);
    }

    #[test]
    fn test_auto_rotate_advances_azimuth() {
        let (mut camera, mut controls) = controls();
        controls.auto_rotate = true;
        controls.enable_damping = false;
        let before = controls.azimuth();
        controls.update(&mut camera);
        assert!((controls.azimuth() - before - AUTO_ROTATE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_pan_disabled() {
        let (_, controls) = controls();
        assert!(!controls.enable_pan);
    }
}
