use std::time::Duration;

/// Duration of the bar enter animation.
pub const ENTER_TRANSITION: Duration = Duration::from_millis(500);
pub const SHOW_TRANSITION: Duration = Duration::from_millis(1000);
pub const HIDE_TRANSITION: Duration = Duration::from_millis(800);

/// Cubic in-out easing over `t in [0, 1]`.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Time-driven progress of one animation. Advanced explicitly by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    elapsed: Duration,
    duration: Duration,
}

impl Transition {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Advances the clock; returns `true` once finished.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        self.is_finished()
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub fn linear_progress(self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    #[must_use]
    pub fn progress(self) -> f64 {
        ease_cubic_in_out(self.linear_progress())
    }
}

/// Animated scalar, such as the container height while showing or hiding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarAnimation {
    pub from: f64,
    pub to: f64,
    transition: Transition,
}

impl ScalarAnimation {
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            transition: Transition::new(duration),
        }
    }

    pub fn advance(&mut self, delta: Duration) -> bool {
        self.transition.advance(delta)
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        self.transition.is_finished()
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.from + (self.to - self.from) * self.transition.progress()
    }

    /// Keeps progress but aims at a new end value.
    pub fn retarget(&mut self, to: f64) {
        self.to = to;
    }
}

#[cfg(test)]
mod tests {
    use super::{ScalarAnimation, Transition, ease_cubic_in_out};
    use approx::assert_relative_eq;
    use std::time::Duration;

    #[test]
    fn easing_is_symmetric_and_bounded() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_relative_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_relative_eq!(
            ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn transition_saturates_at_duration() {
        let mut transition = Transition::new(Duration::from_millis(500));
        assert!(!transition.advance(Duration::from_millis(200)));
        assert_relative_eq!(transition.linear_progress(), 0.4);
        assert!(transition.advance(Duration::from_secs(3)));
        assert_eq!(transition.progress(), 1.0);
    }

    #[test]
    fn zero_duration_is_immediately_complete() {
        let transition = Transition::new(Duration::ZERO);
        assert!(transition.is_finished());
        assert_eq!(transition.progress(), 1.0);
    }

    #[test]
    fn scalar_animation_retargets_mid_flight() {
        let mut animation = ScalarAnimation::new(0.0, 100.0, Duration::from_millis(1000));
        animation.advance(Duration::from_millis(500));
        assert_relative_eq!(animation.value(), 50.0);
        animation.retarget(200.0);
        assert_relative_eq!(animation.value(), 100.0);
        animation.advance(Duration::from_millis(500));
        assert_relative_eq!(animation.value(), 200.0);
    }
}
