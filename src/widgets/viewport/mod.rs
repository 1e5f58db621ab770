//! Viewport widget - resizable frame hosting the screencast
//!
//! Container state lives in `viewport`, egui drawing in `viewport_ui`.

pub mod info;
pub mod loading_bar;
pub mod resize_handle;
pub mod screencast;
mod viewport;
mod viewport_ui;
pub mod viewport_events;

pub use loading_bar::LoadingBar;
pub use resize_handle::{DragResize, Handle, ResizeEnable};
pub use screencast::{ScreencastInput, ScreencastSignal, ScreencastView};
pub use viewport::{FrameLayout, Lifecycle, ViewportContainer};
pub use viewport_ui::{render, ViewportWidgets};
pub use viewport_events::ResetViewportSizeEvent;
