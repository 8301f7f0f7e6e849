use std::time::Instant;

use crate::transform::TransformState;

use super::{Readiness, Spin};

/// Result of a single tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome<R = ()> {
    /// The readiness gate was closed; nothing was drawn or rotated.
    Skipped,
    /// `draw` ran once and the rotation advanced once.
    Drawn(R),
}

impl<R> TickOutcome<R> {
    pub fn is_drawn(&self) -> bool {
        matches!(self, TickOutcome::Drawn(_))
    }
}

/// Per-frame draw + animate step.
///
/// Holds the timestamp of the previous animate step and the readiness gate.
/// The transform is passed in by exclusive reference each tick: `draw` only
/// reads it, `animate` writes it.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    previous: Instant,
    spin: Option<Spin>,
    readiness: Readiness,
}

impl RenderLoop {
    /// A loop that draws every tick without rotating.
    pub fn new(start: Instant) -> Self {
        Self {
            previous: start,
            spin: None,
            readiness: Readiness::ready(),
        }
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = Some(spin);
        self
    }

    /// Gates drawing on `readiness`.
    pub fn gated_by(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Timestamp of the previous animate step.
    pub fn previous(&self) -> Instant {
        self.previous
    }

    /// Runs one tick.
    ///
    /// While the gate is closed this is a no-op: neither `draw` nor the
    /// rotation runs and the timing state is left alone, so the first drawn
    /// frame catches up on the time spent waiting.
    pub fn tick<F, R>(&mut self, now: Instant, transform: &mut TransformState, draw: F) -> TickOutcome<R>
    where
        F: FnOnce(&TransformState) -> R,
    {
        if !self.readiness.is_ready() {
            return TickOutcome::Skipped;
        }

        let out = draw(transform);
        self.animate(now, transform);
        TickOutcome::Drawn(out)
    }

    /// Advances the rotation by the wall-clock time since the previous step.
    ///
    /// Returns the angle applied, in radians.
    pub fn animate(&mut self, now: Instant, transform: &mut TransformState) -> f32 {
        let elapsed = now.saturating_duration_since(self.previous);
        self.previous = now;

        let Some(spin) = self.spin else { return 0.0 };
        let angle = spin.angle(elapsed);
        transform.rotate(angle);
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::TAU;
    use std::time::Duration;

    use crate::transform::{Projection, TransformState};

    fn cube_transform() -> TransformState {
        TransformState::translated(
            Projection::default().matrix(640.0 / 480.0),
            Vec3::new(0.0, 0.0, -8.0),
            Vec3::new(0.0, 1.0, 1.0),
        )
        .unwrap()
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Feeds ticks with the given elapsed times and returns the summed angle.
    fn run(lp: &mut RenderLoop, t: &mut TransformState, start: Instant, elapsed: &[u64]) -> f32 {
        let mut now = start;
        let mut total = 0.0;
        for e in elapsed {
            now += ms(*e);
            total += lp.animate(now, t);
        }
        total
    }

    #[test]
    fn five_one_second_ticks_make_one_turn() {
        let start = Instant::now();
        let mut lp = RenderLoop::new(start).with_spin(Spin::from_millis(5000));
        let mut t = cube_transform();
        let initial = t.rotation_part();

        let total = run(&mut lp, &mut t, start, &[1000, 1000, 1000, 1000, 1000]);

        assert!((total - TAU).abs() < 1e-5);
        assert!(t.rotation_part().abs_diff_eq(initial, 1e-4));
    }

    #[test]
    fn rotation_is_independent_of_tick_split() {
        let start = Instant::now();

        let mut coarse = RenderLoop::new(start).with_spin(Spin::default());
        let mut a = cube_transform();
        let total_a = run(&mut coarse, &mut a, start, &[1700]);

        let mut fine = RenderLoop::new(start).with_spin(Spin::default());
        let mut b = cube_transform();
        let total_b = run(&mut fine, &mut b, start, &[16, 17, 16, 651, 1000]);

        assert!((total_a - total_b).abs() < 1e-5);
        assert!(a.model_view().abs_diff_eq(b.model_view(), 1e-4));
    }

    #[test]
    fn uneven_ticks_summing_to_a_period_return_to_start() {
        let start = Instant::now();
        let mut lp = RenderLoop::new(start).with_spin(Spin::from_millis(5000));
        let mut t = cube_transform();
        let initial = t.rotation_part();

        run(&mut lp, &mut t, start, &[3, 997, 2500, 1, 1499]);

        assert!(t.rotation_part().abs_diff_eq(initial, 1e-4));
    }

    #[test]
    fn zero_elapsed_tick_leaves_model_view_unchanged() {
        let start = Instant::now();
        let mut lp = RenderLoop::new(start).with_spin(Spin::default());
        let mut t = cube_transform();
        let before = t.model_view();

        let angle = lp.animate(start, &mut t);

        assert_eq!(angle, 0.0);
        assert_eq!(t.model_view(), before);
    }

    #[test]
    fn animate_updates_previous_timestamp() {
        let start = Instant::now();
        let mut lp = RenderLoop::new(start).with_spin(Spin::default());
        let mut t = cube_transform();
        lp.animate(start + ms(40), &mut t);
        assert_eq!(lp.previous(), start + ms(40));
    }

    #[test]
    fn closed_gate_skips_draw_and_rotation() {
        let start = Instant::now();
        let gate = Readiness::pending();
        let mut lp = RenderLoop::new(start).with_spin(Spin::default()).gated_by(gate.clone());
        let mut t = cube_transform();
        let before = t.model_view();
        let mut draws = 0;

        for i in 1..=10 {
            let outcome = lp.tick(start + ms(i * 16), &mut t, |_| draws += 1);
            assert_eq!(outcome, TickOutcome::Skipped);
        }

        assert_eq!(draws, 0);
        assert_eq!(t.model_view(), before);
        assert_eq!(lp.previous(), start);
    }

    #[test]
    fn texture_gate_scenario_draws_twice() {
        let start = Instant::now();
        let gate = Readiness::pending();
        let mut lp = RenderLoop::new(start).with_spin(Spin::default()).gated_by(gate.clone());
        let mut t = cube_transform();
        let mut draws = 0;
        let mut rotations = 0;
        let mut now = start;

        for _ in 0..3 {
            now += ms(16);
            let before = t.model_view();
            lp.tick(now, &mut t, |_| draws += 1);
            if t.model_view() != before {
                rotations += 1;
            }
        }

        // The load callback fires once, outside the loop.
        gate.mark_ready();

        for _ in 0..2 {
            now += ms(16);
            let before = t.model_view();
            let outcome = lp.tick(now, &mut t, |_| draws += 1);
            assert!(outcome.is_drawn());
            if t.model_view() != before {
                rotations += 1;
            }
        }

        assert_eq!(draws, 2);
        assert_eq!(rotations, 2);
    }

    #[test]
    fn draw_sees_the_transform_before_rotation() {
        let start = Instant::now();
        let mut lp = RenderLoop::new(start).with_spin(Spin::default());
        let mut t = cube_transform();
        let before = t.model_view();

        let seen = lp.tick(start + ms(500), &mut t, |state| state.model_view());

        assert_eq!(seen, TickOutcome::Drawn(before));
        assert_ne!(t.model_view(), before);
    }

    #[test]
    fn loop_without_spin_never_rotates() {
        let start = Instant::now();
        let mut lp = RenderLoop::new(start);
        let mut t = cube_transform();
        let before = t.model_view();

        let outcome = lp.tick(start + ms(1000), &mut t, |_| ());

        assert!(outcome.is_drawn());
        assert_eq!(t.model_view(), before);
    }
}
