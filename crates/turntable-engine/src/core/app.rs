use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::texture::LoadedImage;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Contract implemented by a demo.
///
/// All callbacks run on the event-loop thread.
pub trait App {
    /// Called once per window after its GPU context exists.
    ///
    /// An error is reported through the runtime's alert and aborts the loop.
    fn setup(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()>;

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called exactly once per image requested through [`SetupCtx::loader`].
    fn on_image_loaded(&mut self, ctx: &mut SetupCtx<'_, '_>, image: LoadedImage) -> AppControl {
        let _ = (ctx, image);
        AppControl::Continue
    }

    /// Called on every display refresh.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
