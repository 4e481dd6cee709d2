//! Twinkling sparkles drifting around the tree
//!
//! A fixed cloud of points anchored in a unit cube. The cube is stretched to
//! the current sparkle scale each frame, so toggling the explode state
//! spreads the cloud without regenerating it.

use glam::Vec3;
use rand::Rng;

use super::palette::hex;
use crate::state::AppState;

/// Floats per sparkle: position(3) + size(1) + alpha(1) + color(3)
pub const SPARKLE_FLOATS: usize = 8;

pub const SPARKLE_COUNT: usize = 200;

#[derive(Debug, Clone)]
struct Sparkle {
    /// Position inside the unit cube centred on the origin
    anchor: Vec3,
    phase: f32,
    size: f32,
    speed: f32,
}

/// How the cloud looks for the current state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkleLook {
    /// Edge length of the cube the sparkles fill
    pub scale: f32,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    pub color: Vec3,
}

impl SparkleLook {
    pub fn for_state(state: &AppState) -> Self {
        let (scale, size) = if state.is_exploded { (20.0, 6.0) } else { (6.0, 4.0) };
        Self {
            scale,
            size,
            speed: 0.4,
            opacity: 0.6,
            color: hex(state.theme_color.sparkle_hex()),
        }
    }
}

/// Cloud of sparkles; only drawn while the lights are on
#[derive(Debug, Clone)]
pub struct Sparkles {
    sparkles: Vec<Sparkle>,
}

impl Sparkles {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let sparkles = (0..count)
            .map(|_| Sparkle {
                anchor: Vec3::new(
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                ),
                phase: rng.gen::<f32>() * std::f32::consts::TAU,
                size: 0.5 + rng.gen::<f32>() * 0.5,
                speed: 0.5 + rng.gen::<f32>() * 0.5,
            })
            .collect();

        Self { sparkles }
    }

    pub fn visible(state: &AppState) -> bool {
        state.lights_on
    }

    pub fn count(&self) -> usize {
        self.sparkles.len()
    }

    /// Get particle data for GPU upload
    pub fn particle_data(&self, time: f64, look: &SparkleLook) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.sparkles.len() * SPARKLE_FLOATS);

        for s in &self.sparkles {
            let t = time * (look.speed * s.speed) as f64 + s.phase as f64;

            // Gentle wander, proportional to the cloud size
            let wander = Vec3::new(
                value_noise(s.anchor.x * 4.0, t),
                value_noise(s.anchor.y * 4.0, t + 100.0),
                value_noise(s.anchor.z * 4.0, t + 200.0),
            ) * 0.02;
            let position = (s.anchor + wander) * look.scale;

            let twinkle = (t * 3.0).sin() as f32 * 0.3 + 0.7;

            data.push(position.x);
            data.push(position.y);
            data.push(position.z);
            data.push(look.size * s.size);
            data.push(look.opacity * twinkle);
            data.push(look.color.x);
            data.push(look.color.y);
            data.push(look.color.z);
        }

        data
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smooth 2D value noise in `[-1, 1]`. `y` is time-like and kept in f64
/// until its fraction is split off.
fn value_noise(x: f32, y: f64) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, (y - y0) as f32);
    let (ix, iy) = (x0 as i32, y0 as i64 as i32);

    let h00 = hash2d(ix, iy);
    let h10 = hash2d(ix + 1, iy);
    let h01 = hash2d(ix, iy + 1);
    let h11 = hash2d(ix + 1, iy + 1);

    let u = fx * fx * (3.0 - 2.0 * fx);
    let v = fy * fy * (3.0 - 2.0 * fy);

    lerp(lerp(h00, h10, u), lerp(h01, h11, u), v) * 2.0 - 1.0
}

fn hash2d(x: i32, y: i32) -> f32 {
    let n = x.wrapping_mul(374761393).wrapping_add(y.wrapping_mul(668265263));
    let n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    (n as u32 as f32) / (u32::MAX as f32)
}
