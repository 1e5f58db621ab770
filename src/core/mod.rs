//! Core engine modules - sizing, resize signal, event port
//!
//! These modules hold the viewport's state and timing, independent of UI.

pub mod debounce;
pub mod event_bus;
pub mod port;
pub mod props;
pub mod resize_signal;
pub mod sizing;
pub mod trace;

// Re-exports for convenience
pub use debounce::{Debouncer, RESIZE_DEBOUNCE_MS};
pub use event_bus::{EventBus, EventEmitter, Subscription};
pub use port::{HostPort, PortError, ViewportChangedEvent, ViewportEvent, ViewportPort};
pub use props::{ScreencastFrame, ViewportProps};
pub use resize_signal::{ResizeSignal, WindowResizedEvent};
pub use sizing::{derive_sizing_inputs, Size, SizeDelta, SizingInputs, SizingMode, ViewportSizer, ViewportState};
pub use trace::{LogTrace, NullTrace, SizingTrace};
