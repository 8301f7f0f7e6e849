//! Cube with one solid color per face, one turn every five seconds.

use turntable_demos::{DemoApp, Scene};
use turntable_engine::logging::{init_logging, LoggingConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    DemoApp::new(Scene::color_cube()).run()
}
