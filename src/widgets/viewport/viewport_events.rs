//! Viewport widget events.

pub use crate::core::port::ViewportChangedEvent;
pub use crate::core::resize_signal::WindowResizedEvent;

/// Host asks the viewport to drop its manual size and go fluid again
#[derive(Clone, Debug)]
pub struct ResetViewportSizeEvent;
