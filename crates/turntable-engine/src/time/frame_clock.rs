use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Time since the clock baseline.
    pub since_start: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Timestamps are reported unclamped: the render loop derives rotation from
/// wall-clock deltas, so a long stall must still advance the model by the full
/// elapsed time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock with an explicit baseline.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            frame_index: 0,
        }
    }

    /// Baseline timestamp.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Resets the baseline and the frame counter.
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.frame_index = 0;
    }

    /// Advances the clock using the current wall-clock time.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock using a caller-provided timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let ft = FrameTime {
            now,
            since_start: now.saturating_duration_since(self.start),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start).frame_index, 1);
        assert_eq!(clock.tick_at(start).frame_index, 2);
    }

    #[test]
    fn since_start_tracks_the_baseline() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let ft = clock.tick_at(start + Duration::from_millis(1500));
        assert_eq!(ft.since_start, Duration::from_millis(1500));
    }

    #[test]
    fn timestamps_before_the_baseline_saturate() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut clock = FrameClock::starting_at(start);
        let ft = clock.tick_at(start - Duration::from_secs(1));
        assert_eq!(ft.since_start, Duration::ZERO);
    }
}
