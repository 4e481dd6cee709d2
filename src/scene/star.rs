//! The star on top of the tree

use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Quat, Vec3};

/// Resting height on the tip of the tree
pub const STAR_HEIGHT: f32 = 4.8;

/// Height the star floats up to while the tree is scattered
pub const EXPLODED_STAR_HEIGHT: f32 = 8.0;

/// Fraction of the remaining height covered each frame
const RISE_FACTOR: f32 = 0.05;

/// Spin per frame in radians
const SPIN_PER_FRAME: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarTopper {
    pub height: f32,
    pub spin: f32,
}

impl Default for StarTopper {
    fn default() -> Self {
        Self {
            height: STAR_HEIGHT,
            spin: 0.0,
        }
    }
}

impl StarTopper {
    /// Advance one frame
    pub fn update(&mut self, exploded: bool) {
        let target = if exploded { EXPLODED_STAR_HEIGHT } else { STAR_HEIGHT };
        self.height += (target - self.height) * RISE_FACTOR;
        self.spin = (self.spin + SPIN_PER_FRAME) % std::f32::consts::TAU;
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, self.height, 0.0)
    }

    fn base(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.spin), self.position())
    }

    /// Transform of the star body, which swells while scattered
    pub fn body_matrix(&self, exploded: bool) -> Mat4 {
        let scale = if exploded { 1.5 } else { 1.0 };
        self.base() * Mat4::from_scale(Vec3::splat(scale))
    }

    /// Transform of the tilted ring around the star
    pub fn ring_matrix(&self) -> Mat4 {
        self.base() * Mat4::from_rotation_z(FRAC_PI_4) * Mat4::from_scale(Vec3::splat(1.5))
    }

    /// Intensity of the point light the star carries
    pub fn light_intensity(lights_on: bool) -> f32 {
        if lights_on {
            2.0
        } else {
            0.0
        }
    }
}
