use std::time::{Duration, Instant};

use anyhow::Result;

use crate::time::{FrameClock, FrameTime};

/// Something that repeatedly invokes a tick handler.
///
/// The window runtime implements this on top of the display's redraw signal
/// (see [`crate::window::DisplaySync`]); [`ManualScheduler`] replays a fixed
/// list of frame intervals.
pub trait Scheduler<H> {
    /// Drives `handler` until the host stops the loop.
    fn run(self, handler: H) -> Result<()>;
}

/// Deterministic scheduler fed with synthetic frame intervals.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    clock: FrameClock,
    steps: Vec<Duration>,
}

impl ManualScheduler {
    pub fn new(start: Instant) -> Self {
        Self {
            clock: FrameClock::starting_at(start),
            steps: Vec::new(),
        }
    }

    /// Queues one tick `elapsed` after the previous one.
    pub fn step(mut self, elapsed: Duration) -> Self {
        self.steps.push(elapsed);
        self
    }

    /// Queues one tick per interval.
    pub fn steps<I>(mut self, elapsed: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        self.steps.extend(elapsed);
        self
    }
}

impl<H> Scheduler<H> for ManualScheduler
where
    H: FnMut(FrameTime),
{
    fn run(mut self, mut handler: H) -> Result<()> {
        let mut now = self.clock.start();
        for elapsed in std::mem::take(&mut self.steps) {
            now += elapsed;
            handler(self.clock.tick_at(now));
        }
        Ok(())
    }
}
