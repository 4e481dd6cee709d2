use glam::{Mat4, Quat, Vec3};

/// Position, orientation and scale of one instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl InstanceTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::splat(scale),
        }
    }

    /// Blend toward `other`: positions and scales linearly, rotations along
    /// the shortest arc.
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }

    /// Column-major model matrix, ready for a GPU buffer
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints() {
        let a = InstanceTransform::new(Vec3::X, Quat::IDENTITY, 1.0);
        let b = InstanceTransform::new(Vec3::Y, Quat::from_rotation_y(1.0), 0.5);

        let start = a.interpolate(&b, 0.0);
        assert!(start.position.abs_diff_eq(a.position, 1e-6));
        assert!(start.rotation.abs_diff_eq(a.rotation, 1e-6));

        let end = a.interpolate(&b, 1.0);
        assert!(end.position.abs_diff_eq(b.position, 1e-6));
        assert!(end.rotation.abs_diff_eq(b.rotation, 1e-5));
        assert!(end.scale.abs_diff_eq(Vec3::splat(0.5), 1e-6));
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = InstanceTransform::new(Vec3::ZERO, Quat::IDENTITY, 1.0);
        let b = InstanceTransform::new(Vec3::new(2.0, 4.0, 6.0), Quat::from_rotation_y(1.0), 0.0);
        let mid = a.interpolate(&b, 0.5);

        assert!(mid.position.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
        assert!(mid.scale.abs_diff_eq(Vec3::splat(0.5), 1e-6));
        assert!(mid.rotation.abs_diff_eq(Quat::from_rotation_y(0.5), 1e-5));
    }

    #[test]
    fn test_matrix_layout() {
        let t = InstanceTransform::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, 2.0);
        let cols = t.to_matrix().to_cols_array();
        assert_eq!(cols[0], 2.0);
        assert_eq!(cols[5], 2.0);
        assert_eq!(cols[10], 2.0);
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
    }
}
