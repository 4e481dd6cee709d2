//! Procedural placement of the instanced decorations
//!
//! Each particle group gets two layouts generated once: the assembled tree,
//! built from a stack of tapered cone layers, and a random scatter inside a
//! sphere. Randomness is always injected so layouts can be reproduced.

mod generator;
mod layers;
mod transform;

pub use generator::{random_in_sphere, random_rotation, GroupKind, ParticleGroup, MAX_INSTANCES};
pub use layers::{ConeSample, TreeLayer};
pub use transform::InstanceTransform;
