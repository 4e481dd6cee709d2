//! Per-instance transform and colour buffers
//!
//! The animators never talk to the GPU directly. They write into an
//! [`InstanceSink`] and flag it dirty once per frame; the render pipeline
//! uploads whatever is dirty and clears the flags.

use glam::{Mat4, Vec3};

/// Floats per instance matrix (column-major 4x4)
pub const MATRIX_FLOATS: usize = 16;

/// Floats per instance colour (RGB)
pub const COLOR_FLOATS: usize = 3;

/// Destination for per-instance data
pub trait InstanceSink {
    fn instance_count(&self) -> usize;

    fn set_matrix_at(&mut self, index: usize, matrix: &Mat4);

    /// Signal that the transforms changed this frame
    fn mark_transforms_dirty(&mut self);

    fn set_color_at(&mut self, index: usize, color: Vec3);

    /// Signal that the colours changed
    fn mark_colors_dirty(&mut self);
}

/// CPU-side instance buffer laid out exactly as the GPU attributes expect
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    matrices: Vec<f32>,
    colors: Vec<f32>,
    transforms_dirty: bool,
    colors_dirty: bool,
    transform_updates: u64,
    color_updates: u64,
}

impl InstanceBuffer {
    /// A buffer of `count` identity transforms and white colours
    pub fn new(count: usize) -> Self {
        let mut buffer = Self::default();
        buffer.resize(count);
        buffer
    }

    /// Change the instance count, resetting every slot
    pub fn resize(&mut self, count: usize) {
        self.matrices = Mat4::IDENTITY
            .to_cols_array()
            .iter()
            .copied()
            .cycle()
            .take(count * MATRIX_FLOATS)
            .collect();
        self.colors = vec![1.0; count * COLOR_FLOATS];
        self.transforms_dirty = true;
        self.colors_dirty = true;
    }

    pub fn matrices(&self) -> &[f32] {
        &self.matrices
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn matrix_at(&self, index: usize) -> Mat4 {
        let start = index * MATRIX_FLOATS;
        Mat4::from_cols_slice(&self.matrices[start..start + MATRIX_FLOATS])
    }

    pub fn color_at(&self, index: usize) -> Vec3 {
        let start = index * COLOR_FLOATS;
        Vec3::from_slice(&self.colors[start..start + COLOR_FLOATS])
    }

    /// Translation part of an instance's matrix
    pub fn position_at(&self, index: usize) -> Vec3 {
        let start = index * MATRIX_FLOATS + 12;
        Vec3::from_slice(&self.matrices[start..start + 3])
    }

    pub fn transforms_dirty(&self) -> bool {
        self.transforms_dirty
    }

    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Read and clear the transform dirty flag
    pub fn take_transforms_dirty(&mut self) -> bool {
        std::mem::take(&mut self.transforms_dirty)
    }

    /// Read and clear the colour dirty flag
    pub fn take_colors_dirty(&mut self) -> bool {
        std::mem::take(&mut self.colors_dirty)
    }

    /// How many times the transforms have been flagged dirty
    pub fn transform_updates(&self) -> u64 {
        self.transform_updates
    }

    /// How many times the colours have been flagged dirty
    pub fn color_updates(&self) -> u64 {
        self.color_updates
    }
}

impl InstanceSink for InstanceBuffer {
    fn instance_count(&self) -> usize {
        self.matrices.len() / MATRIX_FLOATS
    }

    fn set_matrix_at(&mut self, index: usize, matrix: &Mat4) {
        let start = index * MATRIX_FLOATS;
        matrix.write_cols_to_slice(&mut self.matrices[start..start + MATRIX_FLOATS]);
    }

    fn mark_transforms_dirty(&mut self) {
        self.transforms_dirty = true;
        self.transform_updates += 1;
    }

    fn set_color_at(&mut self, index: usize, color: Vec3) {
        let start = index * COLOR_FLOATS;
        color.write_to_slice(&mut self.colors[start..start + COLOR_FLOATS]);
    }

    fn mark_colors_dirty(&mut self) {
        self.colors_dirty = true;
        self.color_updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_layout() {
        let buffer = InstanceBuffer::new(4);
        assert_eq!(buffer.instance_count(), 4);
        assert_eq!(buffer.matrices().len(), 4 * MATRIX_FLOATS);
        assert_eq!(buffer.colors().len(), 4 * COLOR_FLOATS);
        assert_eq!(buffer.matrix_at(3), Mat4::IDENTITY);
    }

    #[test]
    fn test_write_matrix() {
        let mut buffer = InstanceBuffer::new(2);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        buffer.set_matrix_at(1, &m);

        assert_eq!(buffer.matrix_at(1), m);
        assert_eq!(buffer.position_at(1), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(buffer.matrix_at(0), Mat4::IDENTITY);
    }

    #[test]
    fn test_write_color() {
        let mut buffer = InstanceBuffer::new(3);
        buffer.set_color_at(2, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(buffer.color_at(2), Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(buffer.color_at(0), Vec3::ONE);
    }

    #[test]
    fn test_dirty_flags() {
        let mut buffer = InstanceBuffer::new(1);
        assert!(buffer.take_transforms_dirty());
        assert!(!buffer.take_transforms_dirty());

        buffer.mark_transforms_dirty();
        assert!(buffer.transforms_dirty());
        assert_eq!(buffer.transform_updates(), 1);

        assert!(buffer.take_colors_dirty());
        buffer.mark_colors_dirty();
        assert_eq!(buffer.color_updates(), 1);
    }
}
