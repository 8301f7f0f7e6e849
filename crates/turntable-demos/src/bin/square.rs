//! Flat white square.

use turntable_demos::{DemoApp, Scene};
use turntable_engine::logging::{init_logging, LoggingConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    DemoApp::new(Scene::square()).run()
}
