//! EMUVIEW - device-emulation viewport library
//!
//! Sizing state machine, debounced resize signal and host event port for a
//! viewport hosting a live screencast, plus the egui widgets that draw it.

// Core engine (sizing, resize signal, event port)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod shell;
pub mod widgets;

// Re-export commonly used types from core
pub use crate::core::event_bus::{downcast_event, BoxedEvent, EventBus, EventEmitter};
pub use crate::core::port::{HostPort, ViewportEvent, ViewportPort};
pub use crate::core::props::{ScreencastFrame, ViewportProps};
pub use crate::core::sizing::{Size, SizeDelta, SizingMode, ViewportSizer};

pub use widgets::viewport::ViewportContainer;
