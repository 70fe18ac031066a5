//! Easing curves and time-based tweens.
//!
//! Times are milliseconds measured from whatever clock the caller uses; in the
//! browser that is the `requestAnimationFrame` timestamp.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    Power1Out,
    Power2Out,
    Power3InOut,
    BackOut(f64),
}

impl Ease {
    /// Maps linear progress in `0..=1` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => 1.0 - (1.0 - t).powi(2),
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power3InOut => {
                if t < 0.5 {
                    (2.0 * t).powi(4) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(4) / 2.0
                }
            }
            Self::BackOut(overshoot) => {
                let p = t - 1.0;
                p * p * ((overshoot + 1.0) * p + overshoot) + 1.0
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay_ms: 0.0,
            duration_ms,
            ease,
        }
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        let active = elapsed_ms - self.delay_ms;
        if active <= 0.0 {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (active / self.duration_ms).min(1.0)
    }

    pub fn sample(&self, elapsed_ms: f64) -> f64 {
        let eased = self.ease.apply(self.progress(elapsed_ms));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.progress(elapsed_ms) >= 1.0
    }
}

/// Delay for item `index` of a staggered group.
pub fn stagger_delay(base_ms: f64, index: usize, step_ms: f64) -> f64 {
    base_ms + index as f64 * step_ms
}

/// Moves `current` toward `target` by `factor` of the remaining distance.
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn curves_pin_both_ends() {
        for ease in [
            Ease::Linear,
            Ease::Power1Out,
            Ease::Power2Out,
            Ease::Power3InOut,
            Ease::BackOut(1.7),
        ] {
            assert!(close(ease.apply(0.0), 0.0), "{ease:?} at 0");
            assert!(close(ease.apply(1.0), 1.0), "{ease:?} at 1");
        }
    }

    #[test]
    fn back_out_overshoots_before_settling() {
        let peak = (1..100)
            .map(|step| Ease::BackOut(1.7).apply(step as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn power3_in_out_is_symmetric_around_midpoint() {
        assert!(close(Ease::Power3InOut.apply(0.5), 0.5));
        assert!(close(
            Ease::Power3InOut.apply(0.25) + Ease::Power3InOut.apply(0.75),
            1.0
        ));
    }

    #[test]
    fn tween_holds_start_value_through_delay() {
        let tween = Tween::new(0.0, 1.0, 800.0, Ease::Power2Out).with_delay(100.0);

        assert_eq!(tween.sample(0.0), 0.0);
        assert_eq!(tween.sample(100.0), 0.0);
        assert!(tween.sample(500.0) > 0.0);
        assert_eq!(tween.sample(900.0), 1.0);
        assert!(tween.is_finished(900.0));
        assert!(!tween.is_finished(899.0));
    }

    #[test]
    fn zero_duration_jumps_to_target_after_delay() {
        let tween = Tween::new(30.0, 0.0, 0.0, Ease::Linear).with_delay(50.0);

        assert_eq!(tween.sample(49.0), 30.0);
        assert_eq!(tween.sample(50.1), 0.0);
    }

    #[test]
    fn stagger_matches_expertise_card_timing() {
        let delays: Vec<f64> = (0..3).map(|i| stagger_delay(700.0, i, 150.0)).collect();
        assert_eq!(delays, vec![700.0, 850.0, 1000.0]);
    }
}
