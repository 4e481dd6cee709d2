use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One truncated-cone band of the tree silhouette.
///
/// The band is centred on `y`: it spans `y - height/2 ..= y + height/2` and
/// its radius tapers linearly from `radius` at the bottom to zero at the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeLayer {
    pub y: f32,
    pub height: f32,
    pub radius: f32,
}

impl TreeLayer {
    pub const fn new(y: f32, height: f32, radius: f32) -> Self {
        Self { y, height, radius }
    }

    /// The five stacked layers of the default tree, bottom to top
    pub fn default_stack() -> Vec<TreeLayer> {
        vec![
            TreeLayer::new(1.0, 2.0, 2.2),
            TreeLayer::new(2.2, 1.8, 1.8),
            TreeLayer::new(3.2, 1.6, 1.4),
            TreeLayer::new(4.0, 1.4, 1.0),
            TreeLayer::new(4.8, 1.0, 0.6), // tip
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.y.is_finite()
            && self.height.is_finite()
            && self.radius.is_finite()
            && self.height > 0.0
            && self.radius > 0.0
    }

    /// Cone radius at `h` above the bottom of the band
    pub fn taper_radius(&self, h: f32) -> f32 {
        self.radius * (1.0 - h / self.height)
    }

    /// World height of a point `h` above the bottom of the band
    pub fn world_y(&self, h: f32) -> f32 {
        self.y + h - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.world_y(0.0)
    }

    pub fn top(&self) -> f32 {
        self.world_y(self.height)
    }

    /// Whether `position` lies inside this band's cone
    pub fn contains(&self, position: Vec3, epsilon: f32) -> bool {
        let h = position.y - self.bottom();
        if h < -epsilon || h > self.height + epsilon {
            return false;
        }
        let radial = (position.x * position.x + position.z * position.z).sqrt();
        radial <= self.taper_radius(h.clamp(0.0, self.height)) + epsilon
    }
}

/// Where an instance landed inside the cone stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSample {
    /// Index into the layer stack
    pub layer: usize,
    /// Height above the bottom of the layer
    pub height: f32,
    /// Taper radius at that height
    pub radius_limit: f32,
    /// Radial distance actually used
    pub radius: f32,
    /// Azimuth in radians
    pub angle: f32,
}

impl ConeSample {
    pub fn position(&self, layer: &TreeLayer) -> Vec3 {
        Vec3::new(
            self.radius * self.angle.cos(),
            layer.world_y(self.height),
            self.radius * self.angle.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack_valid() {
        let layers = TreeLayer::default_stack();
        assert_eq!(layers.len(), 5);
        assert!(layers.iter().all(TreeLayer::is_valid));
    }

    #[test]
    fn test_taper() {
        let layer = TreeLayer::new(1.0, 2.0, 2.2);
        assert!((layer.taper_radius(0.0) - 2.2).abs() < 1e-6);
        assert!((layer.taper_radius(1.0) - 1.1).abs() < 1e-6);
        assert!(layer.taper_radius(2.0).abs() < 1e-6);
    }

    #[test]
    fn test_band_extent() {
        let layer = TreeLayer::new(1.0, 2.0, 2.2);
        assert_eq!(layer.bottom(), 0.0);
        assert_eq!(layer.top(), 2.0);
    }

    #[test]
    fn test_contains() {
        let layer = TreeLayer::new(1.0, 2.0, 2.0);
        assert!(layer.contains(Vec3::new(1.9, 0.0, 0.0), 1e-4));
        assert!(layer.contains(Vec3::new(0.0, 1.0, 0.9), 1e-4));
        assert!(!layer.contains(Vec3::new(0.0, 1.0, 1.1), 1e-4));
        assert!(!layer.contains(Vec3::new(0.0, 2.5, 0.0), 1e-4));
    }

    #[test]
    fn test_sample_position() {
        let layer = TreeLayer::new(1.0, 2.0, 2.0);
        let sample = ConeSample {
            layer: 0,
            height: 1.0,
            radius_limit: 1.0,
            radius: 0.5,
            angle: std::f32::consts::FRAC_PI_2,
        };
        let p = sample.position(&layer);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
        assert!((p.z - 0.5).abs() < 1e-6);
    }
}
