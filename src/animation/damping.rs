//! Frame-rate independent exponential damping

/// Move `current` toward `target` by exponential decay.
///
/// `target + (current - target) * e^(-rate * dt)`: never overshoots, and two
/// half steps land exactly where one full step does.
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    target + (current - target) * (-rate * dt).exp()
}

/// Blend factor between the assembled (0) and scattered (1) layouts.
///
/// The value persists across frames and only ever approaches its target, so
/// it may never reach 0 or 1 exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphProgress {
    value: f32,
}

impl MorphProgress {
    pub fn new(value: f32) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance one frame toward `target`
    pub fn advance(&mut self, target: f32, rate: f32, dt: f32) -> f32 {
        self.value = damp(self.value, target, rate, dt).clamp(0.0, 1.0);
        self.value
    }

    pub fn distance_to(&self, target: f32) -> f32 {
        (self.value - target).abs()
    }
}

/// Make a frame delta safe to feed into [`damp`].
///
/// Returns `None` for NaN or infinite deltas, which must not reach the
/// instance buffers. Negative deltas clamp to zero.
pub fn sanitize_dt(dt: f32) -> Option<f32> {
    if dt.is_finite() {
        Some(dt.max(0.0))
    } else {
        None
    }
}

/// Add a frame delta to the wall clock, ignoring unusable deltas
pub fn advance_clock(time: f64, dt: f32) -> f64 {
    match sanitize_dt(dt) {
        Some(dt) => time + dt as f64,
        None => time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_explode_step() {
        let mut progress = MorphProgress::new(0.0);
        let value = progress.advance(1.0, 2.5, 1.0);
        let expected = 1.0 - (-2.5f32).exp();
        assert!((value - expected).abs() < 1e-6);
        assert!((value - 0.918).abs() < 0.001);
    }

    #[test]
    fn test_converges_to_target() {
        for target in [0.0, 1.0] {
            let mut progress = MorphProgress::new(1.0 - target);
            // 5 time units in 60 Hz frames
            for _ in 0..300 {
                progress.advance(target, 2.5, 5.0 / 300.0);
            }
            assert!(progress.distance_to(target) < 0.001);
        }
    }

    #[test]
    fn test_frame_rate_independent() {
        let mut coarse = MorphProgress::new(0.0);
        coarse.advance(1.0, 2.0, 0.5);

        let mut fine = MorphProgress::new(0.0);
        for _ in 0..10 {
            fine.advance(1.0, 2.0, 0.05);
        }

        assert!((coarse.value() - fine.value()).abs() < 1e-5);
    }

    #[test]
    fn test_monotonic_without_overshoot() {
        let mut progress = MorphProgress::new(0.0);
        let mut previous = 0.0;
        for _ in 0..200 {
            let value = progress.advance(1.0, 2.5, 1.0 / 60.0);
            assert!(value >= previous);
            assert!(value <= 1.0);
            previous = value;
        }
    }

    #[test]
    fn test_zero_dt_is_identity() {
        assert_eq!(damp(0.3, 1.0, 2.5, 0.0), 0.3);
    }

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(0.016), Some(0.016));
        assert_eq!(sanitize_dt(-1.0), Some(0.0));
        assert_eq!(sanitize_dt(f32::NAN), None);
        assert_eq!(sanitize_dt(f32::INFINITY), None);
    }

    #[test]
    fn test_clock_keeps_frame_resolution() {
        let mut time = 864_000.0;
        let start = time;
        for _ in 0..60 {
            time = advance_clock(time, 1.0 / 60.0);
        }
        assert!((time - start - 1.0).abs() < 1e-6);

        assert_eq!(advance_clock(time, f32::NAN), time);
        assert_eq!(advance_clock(time, -1.0), time);
    }
}
