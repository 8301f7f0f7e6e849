use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::core::{Alert, App as CoreApp, AppControl, FrameCtx, SetupCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::error::EngineError;
use crate::texture::{LoadedImage, TextureLoader};
use crate::time::{FrameClock, FrameTime};

use super::RuntimeEvent;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "turntable".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
            resizable: false,
        }
    }
}

impl RuntimeConfig {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` until its window closes or a fatal error aborts the loop.
    ///
    /// A fatal error is reported through `alert` once and then returned.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A, alert: Box<dyn Alert>) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = match EventLoop::<RuntimeEvent>::with_user_event().build() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                let err = anyhow::Error::new(EngineError::ContextUnavailable(e.to_string()))
                    .context("failed to create winit EventLoop");
                report_fatal(&*alert, &err);
                return Err(err);
            }
        };
        let proxy = event_loop.create_proxy();
        let mut state = AppState::new(config, gpu_init, app, alert, proxy);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Shows `err` through `alert`, titled after the engine error it carries.
fn report_fatal(alert: &dyn Alert, err: &anyhow::Error) {
    let title = err
        .downcast_ref::<EngineError>()
        .map(EngineError::title)
        .unwrap_or("Demo failed");
    alert.notify(title, &format!("{err:#}"));
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    loader: TextureLoader,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    alert: Box<dyn Alert>,
    proxy: EventLoopProxy<RuntimeEvent>,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(
        initial: RuntimeConfig,
        gpu_init: GpuInit,
        app: A,
        alert: Box<dyn Alert>,
        proxy: EventLoopProxy<RuntimeEvent>,
    ) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            alert,
            proxy,
            windows: HashMap::new(),
            exit_requested: false,
            fatal: None,
        }
    }

    /// Notifies once, keeps the error for `Runtime::run`, and stops the loop.
    fn abort(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        report_fatal(&*self.alert, &err);

        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size)
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| EngineError::ContextUnavailable(e.to_string()))?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            loader: TextureLoader::new(self.proxy.clone(), id),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .map_err(|e| EngineError::ContextUnavailable(format!("{e:#}")))
            },
        }
        .try_build()?;

        self.windows.insert(id, entry);
        log::info!("window {id:?} ready");
        Ok(id)
    }

    fn setup_window(&mut self, id: WindowId) -> Result<()> {
        let (app, alert) = (&mut self.app, &*self.alert);
        let entry = self
            .windows
            .get_mut(&id)
            .ok_or_else(|| anyhow!("window {id:?} vanished before setup"))?;

        entry.with_mut(|fields| {
            let mut ctx = SetupCtx {
                window: WindowCtx {
                    id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                loader: fields.loader,
                alert,
            };
            app.setup(&mut ctx)
        })?;

        // Animation time starts once setup is done.
        entry.with_mut(|fields| fields.clock.reset());
        Ok(())
    }

    fn deliver_image(&mut self, id: WindowId, image: LoadedImage) -> AppControl {
        let (app, alert) = (&mut self.app, &*self.alert);
        let Some(entry) = self.windows.get_mut(&id) else {
            log::debug!("image {} arrived for closed window", image.path.display());
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let mut ctx = SetupCtx {
                window: WindowCtx {
                    id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                loader: fields.loader,
                alert,
            };
            app.on_image_loaded(&mut ctx, image)
        })
    }

    fn draw_frame(&mut self, id: WindowId) -> AppControl {
        let (app, alert) = (&mut self.app, &*self.alert);
        let Some(entry) = self.windows.get_mut(&id) else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: ft,
                alert,
            };
            let control = app.on_frame(&mut ctx);

            // Schedule the next tick unconditionally.
            fields.window.request_redraw();
            control
        })
    }
}

impl<A> ApplicationHandler<RuntimeEvent> for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() || self.exit_requested {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        let id = match self.create_window_entry(event_loop, self.initial.clone()) {
            Ok(id) => id,
            Err(e) => return self.abort(event_loop, e),
        };

        if let Err(e) = self.setup_window(id) {
            return self.abort(event_loop, e);
        }

        if let Some(entry) = self.windows.get(&id) {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: RuntimeEvent) {
        if self.exit_requested {
            return;
        }

        match event {
            RuntimeEvent::ImageLoaded { window, image } => {
                if self.deliver_image(window, image) == AppControl::Exit {
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.windows.remove(&window_id);
                if self.windows.is_empty() {
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => {
                if self.draw_frame(window_id) == AppControl::Exit {
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingAlert(RefCell<Vec<(String, String)>>);

    impl Alert for RecordingAlert {
        fn notify(&self, title: &str, message: &str) {
            self.0.borrow_mut().push((title.to_owned(), message.to_owned()));
        }
    }

    #[test]
    fn event_loop_failure_is_reported_as_missing_context() {
        let alert = RecordingAlert::default();
        let err = anyhow::Error::new(EngineError::ContextUnavailable("DISPLAY is not set".into()))
            .context("failed to create winit EventLoop");

        report_fatal(&alert, &err);

        let seen = alert.0.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Rendering context unavailable");
        assert!(seen[0].1.contains("failed to create winit EventLoop"));
        assert!(seen[0].1.contains("DISPLAY is not set"));
    }

    #[test]
    fn setup_errors_keep_their_engine_title() {
        let alert = RecordingAlert::default();
        let err = anyhow::Error::new(EngineError::Shader(crate::shader::ShaderError::Link(
            "missing uSampler".into(),
        )))
        .context("textured cube shaders");

        report_fatal(&alert, &err);
        assert_eq!(alert.0.borrow()[0].0, "Could not initialise shaders");
    }

    #[test]
    fn foreign_errors_get_a_generic_title() {
        let alert = RecordingAlert::default();
        report_fatal(&alert, &anyhow::anyhow!("window vanished"));
        assert_eq!(*alert.0.borrow(), vec![("Demo failed".into(), "window vanished".into())]);
    }


    #[test]
    fn default_config_matches_demo_canvas() {
        let cfg = RuntimeConfig::titled("square");
        assert_eq!(cfg.title, "square");
        assert_eq!(cfg.initial_size, LogicalSize::new(640.0, 480.0));
        assert!(!cfg.resizable);
    }
}
