use winit::window::WindowId;

use crate::texture::LoadedImage;

/// Events posted to the event loop from other threads.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A background image decode finished (successfully or not).
    ImageLoaded { window: WindowId, image: LoadedImage },
}
