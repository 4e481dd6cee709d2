//! Lights and post-processing derived from the application state

use glam::Vec3;

use super::palette::{hex, AMBER_RIM, EMERALD, WARM_KEY, WHITE};
use super::star::StarTopper;
use crate::state::AppState;

/// Maximum point lights the tree shader accepts
pub const MAX_POINT_LIGHTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Zero means no falloff cut-off
    pub range: f32,
}

impl PointLight {
    fn new(position: Vec3, color: u32, intensity: f32) -> Self {
        Self {
            position,
            color: hex(color),
            intensity,
            range: 0.0,
        }
    }
}

/// All lights of one frame, in world space
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub points: Vec<PointLight>,
}

impl LightRig {
    /// Warm key, cool fill, amber rim, plus the star's own light
    ///
    /// The star turns with the tree but sits on its axis, so the tree's
    /// rotation never moves its light.
    pub fn for_state(state: &AppState, star: &StarTopper) -> Self {
        let mut star_light = PointLight::new(star.position(), WHITE, StarTopper::light_intensity(state.lights_on));
        star_light.range = 4.0;

        Self {
            ambient_color: hex(EMERALD),
            ambient_intensity: 0.2,
            points: vec![
                PointLight::new(Vec3::new(5.0, 8.0, 5.0), WARM_KEY, 20.0),
                PointLight::new(Vec3::new(-5.0, 3.0, -5.0), EMERALD, 5.0),
                PointLight::new(Vec3::new(0.0, 5.0, -8.0), AMBER_RIM, 10.0),
                star_light,
            ],
        }
    }
}

/// Parameters of the bloom/vignette/grain passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostSettings {
    pub bloom_strength: f32,
    /// Luminance above which a pixel contributes to bloom
    pub bloom_threshold: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
    pub grain: f32,
}

impl PostSettings {
    pub fn for_state(state: &AppState) -> Self {
        Self {
            bloom_strength: state.effective_bloom(),
            bloom_threshold: 0.8,
            vignette_offset: 0.1,
            vignette_darkness: 0.6,
            grain: 0.02,
        }
    }
}
