use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use tracing::debug;

use super::layers::{ConeSample, TreeLayer};
use super::transform::InstanceTransform;
use crate::error::{Result, TreeError};

/// Upper bound on instances per group
pub const MAX_INSTANCES: usize = 100_000;

/// The three kinds of instanced decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Crystal-like needles filling the cone volume
    Foliage,
    /// Metallic spheres hugging the cone surface
    Ornament,
    /// Small emissive bulbs wound in a spiral
    Light,
}

impl GroupKind {
    pub const ALL: [GroupKind; 3] = [GroupKind::Foliage, GroupKind::Ornament, GroupKind::Light];

    pub fn name(&self) -> &'static str {
        match self {
            GroupKind::Foliage => "foliage",
            GroupKind::Ornament => "ornaments",
            GroupKind::Light => "lights",
        }
    }

    pub fn default_count(&self) -> usize {
        match self {
            GroupKind::Foliage => 1500,
            GroupKind::Ornament => 200,
            GroupKind::Light => 150,
        }
    }

    pub fn default_scatter_radius(&self) -> f32 {
        match self {
            GroupKind::Foliage => 12.0,
            GroupKind::Ornament => 10.0,
            GroupKind::Light => 14.0,
        }
    }

    /// Uniform scale used in the scattered layout
    pub fn scatter_scale(&self) -> f32 {
        match self {
            GroupKind::Foliage => 0.5,
            GroupKind::Ornament => 0.2,
            GroupKind::Light => 0.06,
        }
    }

    /// Place instance `index` of `count` somewhere on the tree.
    ///
    /// `layers` must not be empty.
    pub fn sample_tree<R: Rng + ?Sized>(
        &self,
        index: usize,
        count: usize,
        layers: &[TreeLayer],
        rng: &mut R,
    ) -> (ConeSample, InstanceTransform) {
        let layer_index = match self {
            // Lights walk up the tree with their index
            GroupKind::Light => {
                let t = index as f32 / count.max(1) as f32;
                ((t * layers.len() as f32) as usize).min(layers.len() - 1)
            }
            _ => rng.gen_range(0..layers.len()),
        };
        let layer = &layers[layer_index];

        let height = rng.gen::<f32>() * layer.height;
        let radius_limit = layer.taper_radius(height);

        let (radius, angle) = match self {
            // sqrt keeps the density uniform over the disc
            GroupKind::Foliage => (radius_limit * rng.gen::<f32>().sqrt(), rng.gen::<f32>() * TAU),
            // Slightly inset from the surface
            GroupKind::Ornament => (radius_limit * 0.9, rng.gen::<f32>() * TAU),
            // Semi-spiral
            GroupKind::Light => (radius_limit * 0.95, index as f32 * 0.5 + rng.gen::<f32>()),
        };

        let sample = ConeSample {
            layer: layer_index,
            height,
            radius_limit,
            radius,
            angle,
        };

        let (rotation, scale) = match self {
            GroupKind::Foliage => {
                let rotation = Quat::from_euler(
                    EulerRot::XYZ,
                    (rng.gen::<f32>() - 0.5) * 0.5,
                    rng.gen::<f32>() * TAU,
                    (rng.gen::<f32>() - 0.5) * 0.5,
                );
                (rotation, 0.5 + rng.gen::<f32>() * 0.5)
            }
            GroupKind::Ornament => (random_rotation(rng), 0.15 + rng.gen::<f32>() * 0.15),
            GroupKind::Light => (Quat::IDENTITY, 0.06),
        };

        (sample, InstanceTransform::new(sample.position(layer), rotation, scale))
    }

    /// Place an instance somewhere in the scatter sphere
    pub fn sample_scatter<R: Rng + ?Sized>(&self, radius: f32, rng: &mut R) -> InstanceTransform {
        let position = random_in_sphere(rng, radius);
        let rotation = match self {
            // Lights are spheres, orientation is irrelevant
            GroupKind::Light => Quat::IDENTITY,
            _ => random_rotation(rng),
        };
        InstanceTransform::new(position, rotation, self.scatter_scale())
    }
}

/// The two fixed layouts of one particle group
#[derive(Debug, Clone)]
pub struct ParticleGroup {
    pub kind: GroupKind,
    pub scatter_radius: f32,
    pub tree_targets: Vec<InstanceTransform>,
    pub scatter_targets: Vec<InstanceTransform>,
    /// Cone placement behind each tree target
    pub tree_samples: Vec<ConeSample>,
}

impl ParticleGroup {
    /// Generate both layouts for `count` instances.
    pub fn generate<R: Rng + ?Sized>(
        kind: GroupKind,
        count: usize,
        scatter_radius: f32,
        layers: &[TreeLayer],
        rng: &mut R,
    ) -> Result<Self> {
        if count == 0 {
            return Err(TreeError::EmptyGroup { group: kind.name() });
        }
        if count > MAX_INSTANCES {
            return Err(TreeError::TooManyInstances {
                group: kind.name(),
                count,
                max: MAX_INSTANCES,
            });
        }
        if layers.is_empty() {
            return Err(TreeError::NoLayers);
        }

        let mut tree_targets = Vec::with_capacity(count);
        let mut scatter_targets = Vec::with_capacity(count);
        let mut tree_samples = Vec::with_capacity(count);

        for i in 0..count {
            let (sample, tree) = kind.sample_tree(i, count, layers, rng);
            tree_samples.push(sample);
            tree_targets.push(tree);
            scatter_targets.push(kind.sample_scatter(scatter_radius, rng));
        }

        debug!(group = kind.name(), count, scatter_radius, "generated particle layouts");

        Ok(Self {
            kind,
            scatter_radius,
            tree_targets,
            scatter_targets,
            tree_samples,
        })
    }

    pub fn count(&self) -> usize {
        self.tree_targets.len()
    }
}

/// Uniformly distributed point inside a sphere.
///
/// The cube root on the radius keeps the volumetric density uniform.
pub fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Uniformly distributed rotation (Shoemake's method)
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    let u1 = rng.gen::<f32>();
    let a = 2.0 * PI * rng.gen::<f32>();
    let b = 2.0 * PI * rng.gen::<f32>();

    let s1 = (1.0 - u1).sqrt();
    let s2 = u1.sqrt();

    Quat::from_xyzw(s1 * a.sin(), s1 * a.cos(), s2 * b.sin(), s2 * b.cos()).normalize()
}
