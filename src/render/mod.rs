pub mod overlay;
#[cfg(feature = "desktop")]
pub mod window;

pub use overlay::{hsl_to_rgb, sigmoid, OverlayRenderer, PathStyle};
#[cfg(feature = "desktop")]
pub use minifb::Key;
#[cfg(feature = "desktop")]
pub use window::ReviewWindow;
