//! Animation of the tree/scatter morph
//!
//! A damped progress value per particle group drives the blend between the
//! two layouts produced by [`crate::layout`].

mod damping;
mod morph;

pub use damping::{advance_clock, damp, sanitize_dt, MorphProgress};
pub use morph::{float_offset, MorphAnimator};
