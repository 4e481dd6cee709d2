pub mod geometry;
pub mod primitives;

pub use geometry::{Mesh, Vertex, VERTEX_FLOATS};
