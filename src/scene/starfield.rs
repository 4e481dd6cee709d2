//! Distant starfield behind the scene
//!
//! A static shell of points generated once and uploaded once. Stars share
//! the sparkle particle layout and shader; only a global size pulse changes
//! per frame.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::sparkles::SPARKLE_FLOATS;

pub const STAR_COUNT: usize = 5000;
/// Inner radius of the shell
pub const STAR_RADIUS: f32 = 100.0;
/// Thickness of the shell beyond the inner radius
pub const STAR_DEPTH: f32 = 50.0;
pub const STAR_FACTOR: f32 = 4.0;
pub const STAR_SPEED: f32 = 0.5;

/// Brings star sizes onto the sparkle shader's distance falloff
const POINT_SCALE: f32 = 3.6;

/// Greyscale star colour, fully desaturated
const STAR_GREY: f32 = 0.9;

/// Alpha per star; the point shader doubles the colour
const STAR_ALPHA: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Starfield {
    data: Vec<f32>,
    speed: f32,
}

impl Starfield {
    /// Scatter `count` stars between `radius` and `radius + depth`.
    ///
    /// The shell is filled from the outside in, so early stars sit near the
    /// outer edge and later ones drift inward.
    pub fn new<R: Rng + ?Sized>(count: usize, radius: f32, depth: f32, factor: f32, rng: &mut R) -> Self {
        let mut data = Vec::with_capacity(count * SPARKLE_FLOATS);
        let mut r = radius + depth;
        let increment = if count > 0 { depth / count as f32 } else { 0.0 };

        for _ in 0..count {
            r -= increment * rng.gen::<f32>();
            let position = random_direction(rng) * r;
            let size = factor * (0.5 + 0.5 * rng.gen::<f32>()) * POINT_SCALE;

            data.extend_from_slice(&[position.x, position.y, position.z, size, STAR_ALPHA]);
            data.extend_from_slice(&[STAR_GREY; 3]);
        }

        Self {
            data,
            speed: STAR_SPEED,
        }
    }

    pub fn count(&self) -> usize {
        self.data.len() / SPARKLE_FLOATS
    }

    /// Particle data for a one-time GPU upload
    pub fn particle_data(&self) -> &[f32] {
        &self.data
    }

    /// Shared point size multiplier at wall-clock `time`, pulsing around 1
    pub fn size_scale(&self, time: f64) -> f32 {
        ((3.0 + (time * self.speed as f64 + 100.0).sin()) / 3.0) as f32
    }
}

/// Uniform direction on the unit sphere
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let cos_theta = 1.0 - 2.0 * rng.gen::<f32>();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = rng.gen::<f32>() * TAU;
    Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn starfield() -> Starfield {
        let mut rng = StdRng::seed_from_u64(11);
        Starfield::new(STAR_COUNT, STAR_RADIUS, STAR_DEPTH, STAR_FACTOR, &mut rng)
    }

    #[test]
    fn test_stars_fill_the_shell() {
        let stars = starfield();
        assert_eq!(stars.count(), STAR_COUNT);

        for chunk in stars.particle_data().chunks(SPARKLE_FLOATS) {
            let distance = Vec3::new(chunk[0], chunk[1], chunk[2]).length();
            assert!(distance >= STAR_RADIUS - 1e-3);
            assert!(distance <= STAR_RADIUS + STAR_DEPTH + 1e-3);
            assert!(chunk[3] >= STAR_FACTOR * 0.5 * POINT_SCALE);
            assert_eq!(&chunk[5..], &[STAR_GREY; 3]);
        }
    }

    #[test]
    fn test_stars_surround_the_tree() {
        let stars = starfield();
        let mut above = 0;
        let mut below = 0;
        for chunk in stars.particle_data().chunks(SPARKLE_FLOATS) {
            if chunk[1] > 0.0 {
                above += 1;
            } else {
                below += 1;
            }
        }
        // Uniform directions split roughly evenly across the horizon
        assert!((above as i32 - below as i32).abs() < 600);
    }

    #[test]
    fn test_size_pulse_range() {
        let stars = starfield();
        for i in 0..200 {
            let scale = stars.size_scale(i as f64 * 0.37);
            assert!((2.0 / 3.0 - 1e-6..=4.0 / 3.0 + 1e-6).contains(&scale));
        }
    }
}
