//! Orbit camera with auto-rotation
//!
//! Dragging orbits around the tree and the wheel zooms; panning is disabled.
//! The polar angle is limited so the camera never dips under the floor or
//! looks straight down on the star.

use std::f32::consts::{FRAC_PI_3, PI, TAU};

use glam::{Mat4, Vec3};

pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 14.0;
pub const MIN_POLAR: f32 = FRAC_PI_3;
pub const MAX_POLAR: f32 = PI / 1.8;

pub const NEAR_PLANE: f32 = 0.1;
/// Far enough to keep the starfield shell in view
pub const FAR_PLANE: f32 = 1000.0;

/// Radians per pixel of drag
const ORBIT_SENSITIVITY: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle around the vertical axis, 0 looks down -z from +z
    pub azimuth: f32,
    /// Angle from the +y axis
    pub polar: f32,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(Vec3::new(0.0, 2.0, 9.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Place the camera at `position` orbiting `target`, clamped to limits
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length();
        let polar = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).acos()
        } else {
            FRAC_PI_3
        };

        Self {
            target,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            azimuth: offset.x.atan2(offset.z),
            polar: polar.clamp(MIN_POLAR, MAX_POLAR),
            fov: 45f32.to_radians(),
        }
    }

    pub fn position(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + Vec3::new(
                self.distance * sin_polar * self.azimuth.sin(),
                self.distance * self.polar.cos(),
                self.distance * sin_polar * self.azimuth.cos(),
            )
    }

    /// Drag by a screen-space delta in pixels
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth = (self.azimuth - delta_x * ORBIT_SENSITIVITY).rem_euclid(TAU);
        self.polar = (self.polar - delta_y * ORBIT_SENSITIVITY).clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * 0.5).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Auto-rotate: speed 1.0 is one full turn per minute
    pub fn update(&mut self, dt: f32, rotation_speed: f32) {
        if rotation_speed > 0.0 {
            self.azimuth = (self.azimuth - TAU / 60.0 * rotation_speed * dt).rem_euclid(TAU);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, NEAR_PLANE, FAR_PLANE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position() {
        let camera = OrbitCamera::default();
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 2.0, 9.0), 1e-4));
        assert!((camera.fov - 45f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut camera = OrbitCamera::default();
        camera.zoom(-100.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(100.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_polar_limits() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.polar, MIN_POLAR);
        camera.orbit(0.0, -10_000.0);
        assert_eq!(camera.polar, MAX_POLAR);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = OrbitCamera::default();
        let distance = camera.position().length();
        camera.orbit(120.0, 0.0);
        assert!((camera.position().length() - distance).abs() < 1e-4);
    }

    #[test]
    fn test_auto_rotate() {
        let mut camera = OrbitCamera::default();
        let start = camera.azimuth;

        camera.update(1.0, 0.0);
        assert_eq!(camera.azimuth, start);

        // One full turn at speed 1 takes a minute
        camera.update(30.0, 1.0);
        let half_turn = (camera.azimuth - start).rem_euclid(TAU);
        assert!((half_turn - PI).abs() < 1e-3);
    }

    #[test]
    fn test_view_looks_at_target() {
        let camera = OrbitCamera::default();
        let target_in_view = camera.view_matrix().transform_point3(camera.target);
        assert!(target_in_view.x.abs() < 1e-4);
        assert!(target_in_view.y.abs() < 1e-4);
        assert!(target_in_view.z < 0.0);
    }
}
