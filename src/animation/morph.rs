//! Per-group morph between the tree and scatter layouts

use tracing::warn;

use super::damping::{sanitize_dt, MorphProgress};
use crate::config::MorphConfig;
use crate::instances::InstanceSink;
use crate::layout::ParticleGroup;

/// Below this distance from the assembled target the group counts as settled
const SETTLE_EPSILON: f32 = 1e-4;

/// Vertical float applied to instance `index` at wall-clock `time` seconds.
///
/// Zero unless the tree is exploded. The offset does not scale with
/// progress, so it appears as soon as the explode starts.
pub fn float_offset(time: f64, index: usize, exploded: bool, amplitude: f32) -> f32 {
    if exploded {
        (time + index as f64).sin() as f32 * amplitude
    } else {
        0.0
    }
}

/// Owns one particle group and its morph progress
#[derive(Debug, Clone)]
pub struct MorphAnimator {
    group: ParticleGroup,
    progress: MorphProgress,
    morph: MorphConfig,
    /// A settled frame has been written and nothing has moved since
    at_rest: bool,
}

impl MorphAnimator {
    /// Start fully in the layout that matches `exploded`
    pub fn new(group: ParticleGroup, morph: MorphConfig, exploded: bool) -> Self {
        Self {
            group,
            progress: MorphProgress::new(if exploded { 1.0 } else { 0.0 }),
            morph,
            at_rest: false,
        }
    }

    pub fn group(&self) -> &ParticleGroup {
        &self.group
    }

    pub fn count(&self) -> usize {
        self.group.count()
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    /// Swap in freshly generated layouts, keeping the current progress
    pub fn replace_group(&mut self, group: ParticleGroup) {
        self.group = group;
        self.at_rest = false;
    }

    pub fn set_morph(&mut self, morph: MorphConfig) {
        self.morph = morph;
    }

    /// Advance one frame and write every instance transform into `sink`.
    ///
    /// Returns whether the sink was written. Once the group has settled on
    /// the assembled tree the rewrite is skipped; while exploded every frame
    /// is written because the float keeps moving.
    pub fn advance<S: InstanceSink + ?Sized>(
        &mut self,
        dt: f32,
        exploded: bool,
        time: f64,
        sink: &mut S,
    ) -> bool {
        let target = if exploded { 1.0 } else { 0.0 };

        match sanitize_dt(dt) {
            Some(dt) => {
                self.progress.advance(target, self.morph.rate_toward(exploded), dt);
            }
            None => warn!(dt, group = self.group.kind.name(), "skipping non-finite frame delta"),
        }

        let settled = !exploded && self.progress.distance_to(target) < SETTLE_EPSILON;
        if settled {
            if self.at_rest {
                return false;
            }
            // The frozen frame must be the exact assembled layout
            self.progress = MorphProgress::new(target);
        }

        self.write(exploded, time, sink);
        self.at_rest = settled;
        true
    }

    /// Write all instances at the current progress
    pub fn write<S: InstanceSink + ?Sized>(&self, exploded: bool, time: f64, sink: &mut S) {
        debug_assert_eq!(sink.instance_count(), self.count());

        let t = self.progress.value();
        let count = self.count().min(sink.instance_count());

        for i in 0..count {
            let tree = &self.group.tree_targets[i];
            let scatter = &self.group.scatter_targets[i];

            let mut blended = tree.interpolate(scatter, t);
            blended.position.y += float_offset(time, i, exploded, self.morph.float_amplitude);

            sink.set_matrix_at(i, &blended.to_matrix());
        }

        sink.mark_transforms_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instances::InstanceBuffer;
    use crate::layout::{GroupKind, InstanceTransform, TreeLayer};
    use glam::{Quat, Vec3};
    use rand::{rngs::StdRng, SeedableRng};

    fn unit_group() -> ParticleGroup {
        let tree = vec![
            InstanceTransform::new(Vec3::X, Quat::IDENTITY, 1.0),
            InstanceTransform::new(Vec3::Y, Quat::IDENTITY, 1.0),
            InstanceTransform::new(Vec3::Z, Quat::IDENTITY, 1.0),
        ];
        let scatter = vec![InstanceTransform::new(Vec3::ZERO, Quat::IDENTITY, 1.0); 3];
        ParticleGroup {
            kind: GroupKind::Ornament,
            scatter_radius: 10.0,
            tree_samples: Vec::new(),
            tree_targets: tree,
            scatter_targets: scatter,
        }
    }

    fn generated_group(count: usize) -> ParticleGroup {
        let mut rng = StdRng::seed_from_u64(7);
        ParticleGroup::generate(
            GroupKind::Foliage,
            count,
            12.0,
            &TreeLayer::default_stack(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_halfway_positions() {
        let mut animator = MorphAnimator::new(unit_group(), MorphConfig::default(), false);
        animator.progress = MorphProgress::new(0.5);

        let mut buffer = InstanceBuffer::new(3);
        animator.write(false, 0.0, &mut buffer);

        assert!(buffer.position_at(0).abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
        assert!(buffer.position_at(1).abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));
        assert!(buffer.position_at(2).abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-6));
    }

    #[test]
    fn test_explode_first_second() {
        let mut animator = MorphAnimator::new(unit_group(), MorphConfig::default(), false);
        let mut buffer = InstanceBuffer::new(3);

        animator.advance(1.0, true, 0.0, &mut buffer);
        assert!((animator.progress() - (1.0 - (-2.5f32).exp())).abs() < 1e-5);
    }

    #[test]
    fn test_no_float_when_assembled() {
        assert_eq!(float_offset(123.4, 7, false, 0.05), 0.0);

        let group = generated_group(20);
        let expected: Vec<Vec3> = group.tree_targets.iter().map(|t| t.position).collect();
        let mut animator = MorphAnimator::new(group, MorphConfig::default(), false);
        let mut buffer = InstanceBuffer::new(20);

        for frame in 0..10 {
            animator.advance(1.0 / 60.0, false, frame as f64 * 0.37, &mut buffer);
            for (i, position) in expected.iter().enumerate() {
                assert!(buffer.position_at(i).abs_diff_eq(*position, 1e-5));
            }
        }
    }

    #[test]
    fn test_float_applies_while_exploding() {
        let mut animator = MorphAnimator::new(unit_group(), MorphConfig::default(), false);
        let mut buffer = InstanceBuffer::new(3);

        // Barely started, yet the float is already present
        let time = 2.0;
        animator.advance(0.0, true, time, &mut buffer);
        assert_eq!(animator.progress(), 0.0);

        let offset = float_offset(time, 0, true, 0.05);
        assert!(offset.abs() > 0.0);
        assert!((buffer.position_at(0).y - offset).abs() < 1e-6);
    }

    #[test]
    fn test_every_slot_rewritten_and_signalled_once() {
        let mut animator = MorphAnimator::new(generated_group(50), MorphConfig::default(), false);
        let mut buffer = InstanceBuffer::new(50);

        animator.advance(0.1, true, 1.0, &mut buffer);
        assert_eq!(buffer.transform_updates(), 1);
        for i in 0..50 {
            assert_ne!(buffer.matrix_at(i), glam::Mat4::IDENTITY);
        }
    }

    #[test]
    fn test_settled_fast_path() {
        let mut animator = MorphAnimator::new(unit_group(), MorphConfig::default(), false);
        let mut buffer = InstanceBuffer::new(3);

        // First settled frame is written, later ones are skipped
        assert!(animator.advance(1.0 / 60.0, false, 0.0, &mut buffer));
        assert!(!animator.advance(1.0 / 60.0, false, 0.1, &mut buffer));
        assert_eq!(buffer.transform_updates(), 1);

        // Exploded frames are always written
        assert!(animator.advance(1.0 / 60.0, true, 0.2, &mut buffer));
        assert!(animator.advance(1.0 / 60.0, true, 0.3, &mut buffer));
    }

    #[test]
    fn test_settled_frame_is_exact_tree() {
        let group = generated_group(20);
        let expected: Vec<Vec3> = group.tree_targets.iter().map(|t| t.position).collect();
        let mut animator = MorphAnimator::new(group, MorphConfig::default(), true);
        let mut buffer = InstanceBuffer::new(20);

        let mut frames = 0;
        while animator.advance(1.0 / 60.0, false, frames as f64, &mut buffer) {
            frames += 1;
            assert!(frames < 10_000);
        }

        assert_eq!(animator.progress(), 0.0);
        for (i, position) in expected.iter().enumerate() {
            assert_eq!(buffer.position_at(i), *position);
        }
    }

    #[test]
    fn test_exploded_steady_state_keeps_writing() {
        let mut animator = MorphAnimator::new(unit_group(), MorphConfig::default(), true);
        let mut buffer = InstanceBuffer::new(3);
        for frame in 0..5 {
            assert!(animator.advance(1.0 / 60.0, true, frame as f64, &mut buffer));
        }
        assert_eq!(buffer.transform_updates(), 5);
    }

    #[test]
    fn test_non_finite_dt_keeps_buffer_finite() {
        let mut animator = MorphAnimator::new(generated_group(10), MorphConfig::default(), false);
        let mut buffer = InstanceBuffer::new(10);

        animator.advance(0.1, true, 0.0, &mut buffer);
        let before = animator.progress();
        animator.advance(f32::NAN, true, 0.0, &mut buffer);

        assert_eq!(animator.progress(), before);
        assert!(buffer.matrices().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_replace_group_resets_rest() {
        let mut animator = MorphAnimator::new(unit_group(), MorphConfig::default(), false);
        let mut buffer = InstanceBuffer::new(3);
        animator.advance(0.016, false, 0.0, &mut buffer);

        animator.replace_group(unit_group());
        assert!(animator.advance(0.016, false, 0.0, &mut buffer));
    }
}
