use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::{self, RenderCtx, RenderTarget};
use crate::texture::TextureLoader;
use crate::time::FrameTime;

use super::alert::Alert;
use super::app::AppControl;

/// Per-window handles.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Context for setup and asset callbacks.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct SetupCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub loader: &'a TextureLoader,
    pub alert: &'a dyn Alert,
}

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub alert: &'a dyn Alert,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires a frame, clears color and depth, calls `draw`, then presents.
    ///
    /// Transient surface errors skip the frame; a fatal one is reported and
    /// returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let message = err.to_string();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        self.alert.notify("Rendering context lost", &message);
                        AppControl::Exit
                    }
                    action => {
                        log::debug!("frame skipped ({action:?}): {message}");
                        AppControl::Continue
                    }
                };
            }
        };

        let gpu = &*self.gpu;
        let rctx = gpu.render_ctx();

        // Target borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, gpu.depth_view());
            render::clear(&mut target, clear);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        gpu.submit(frame);

        AppControl::Continue
    }
}
