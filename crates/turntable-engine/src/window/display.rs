use anyhow::Result;

use crate::animation::Scheduler;
use crate::core::{Alert, App, LogAlert};
use crate::device::GpuInit;

use super::{Runtime, RuntimeConfig};

/// Display-synchronised scheduler.
///
/// Calls `App::on_frame` once per redraw; the next redraw is requested as soon
/// as a frame is done and the FIFO present mode holds it to the refresh rate.
pub struct DisplaySync {
    pub config: RuntimeConfig,
    pub gpu_init: GpuInit,
    alert: Box<dyn Alert>,
}

impl DisplaySync {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            gpu_init: GpuInit::default(),
            alert: Box::new(LogAlert),
        }
    }
}

impl<A> Scheduler<A> for DisplaySync
where
    A: App + 'static,
{
    fn run(self, app: A) -> Result<()> {
        Runtime::run(self.config, self.gpu_init, app, self.alert)
    }
}
