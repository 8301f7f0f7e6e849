use std::f64::consts::TAU;
use std::time::Duration;

/// Time one full revolution takes when nothing else is configured.
pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_millis(5000);

/// Rotation speed, expressed as the wall-clock time of one full turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Spin {
    period: Duration,
}

impl Spin {
    /// A zero period is raised to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Fraction of a revolution covered by `elapsed`.
    pub fn fraction(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() / self.period.as_secs_f64()
    }

    /// Rotation angle in radians for `elapsed`.
    pub fn angle(&self, elapsed: Duration) -> f32 {
        (TAU * self.fraction(elapsed)) as f32
    }
}

impl Default for Spin {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_period_is_one_turn() {
        let spin = Spin::default();
        assert!((spin.angle(DEFAULT_ROTATION_PERIOD) - std::f32::consts::TAU).abs() < 1e-6);
    }

    #[test]
    fn fraction_is_linear_in_elapsed() {
        let spin = Spin::from_millis(5000);
        assert_eq!(spin.fraction(Duration::from_millis(1000)), 0.2);
        assert_eq!(spin.fraction(Duration::ZERO), 0.0);
    }

    #[test]
    fn zero_period_is_clamped() {
        assert_eq!(Spin::new(Duration::ZERO).period(), Duration::from_millis(1));
    }
}
