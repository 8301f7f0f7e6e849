use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use winit::event_loop::EventLoopProxy;
use winit::window::WindowId;

use crate::window::RuntimeEvent;

use super::{ImageAsset, ImageOptions, TextureError};

static NEXT_ASSET: AtomicU64 = AtomicU64::new(1);

/// Identifies one load request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AssetId(u64);

impl AssetId {
    fn next() -> Self {
        Self(NEXT_ASSET.fetch_add(1, Ordering::Relaxed))
    }
}

/// Outcome of a load request, delivered once on the event-loop thread.
#[derive(Debug)]
pub struct LoadedImage {
    pub id: AssetId,
    pub path: PathBuf,
    pub result: Result<ImageAsset, TextureError>,
}

/// Starts image decodes for one window.
///
/// Each request decodes on its own short-lived thread and posts a
/// [`RuntimeEvent::ImageLoaded`] back to the event loop; the runtime then calls
/// `App::on_image_loaded` for the owning window.
#[derive(Clone)]
pub struct TextureLoader {
    proxy: EventLoopProxy<RuntimeEvent>,
    window: WindowId,
}

impl TextureLoader {
    pub(crate) fn new(proxy: EventLoopProxy<RuntimeEvent>, window: WindowId) -> Self {
        Self { proxy, window }
    }

    pub fn load(&self, path: impl Into<PathBuf>, options: ImageOptions) -> Result<AssetId, TextureError> {
        let id = AssetId::next();
        let path = path.into();
        let proxy = self.proxy.clone();
        let window = self.window;

        log::info!("loading image {}", path.display());

        std::thread::Builder::new()
            .name("turntable image loader".into())
            .spawn(move || {
                let result = ImageAsset::open(&path, options);
                let event = RuntimeEvent::ImageLoaded {
                    window,
                    image: LoadedImage { id, path, result },
                };
                if proxy.send_event(event).is_err() {
                    log::debug!("event loop closed before image load completed");
                }
            })?;

        Ok(id)
    }
}
