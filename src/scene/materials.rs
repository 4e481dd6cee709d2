//! Surface presets for every mesh in the scene

use glam::Vec3;

use super::palette::{hex, ACCENT_GOLD, BARK, BULB, BULB_GLOW, EMERALD, EMERALD_DEEP, WHITE};

/// Physically inspired surface parameters fed to the shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Multiplied with the per-instance colour
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

impl Material {
    pub fn new(color: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            color: hex(color),
            roughness,
            metalness,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
        }
    }

    pub fn with_emissive(mut self, emissive: u32, intensity: f32) -> Self {
        self.emissive = hex(emissive);
        self.emissive_intensity = intensity;
        self
    }

    /// Crystal-like needles
    pub fn foliage() -> Self {
        Self::new(EMERALD, 0.4, 0.6)
    }

    /// Polished metal; the colour comes from the instance buffer
    pub fn ornament() -> Self {
        Self::new(WHITE, 0.1, 1.0)
    }

    /// Bulbs glow hot when the lights are on and go dark otherwise
    pub fn bulb(lights_on: bool) -> Self {
        Self::new(BULB, 0.5, 0.0).with_emissive(BULB_GLOW, if lights_on { 20.0 } else { 0.0 })
    }

    pub fn trunk() -> Self {
        Self::new(BARK, 1.0, 0.0)
    }

    pub fn star(lights_on: bool) -> Self {
        Self::new(ACCENT_GOLD, 0.5, 0.0).with_emissive(ACCENT_GOLD, if lights_on { 10.0 } else { 0.5 })
    }

    pub fn star_ring() -> Self {
        Self::new(ACCENT_GOLD, 0.0, 1.0)
    }

    pub fn floor() -> Self {
        Self::new(EMERALD_DEEP, 0.1, 0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulbs_follow_lights() {
        assert_eq!(Material::bulb(true).emissive_intensity, 20.0);
        assert_eq!(Material::bulb(false).emissive_intensity, 0.0);
    }

    #[test]
    fn test_star_never_fully_dark() {
        assert_eq!(Material::star(true).emissive_intensity, 10.0);
        assert_eq!(Material::star(false).emissive_intensity, 0.5);
    }

    #[test]
    fn test_ornament_is_neutral() {
        assert_eq!(Material::ornament().color, Vec3::ONE);
        assert_eq!(Material::ornament().metalness, 1.0);
    }
}
