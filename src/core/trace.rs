//! Observability hooks for the sizing state machine.
//!
//! The host passes a [`SizingTrace`] in; [`LogTrace`] forwards to the `log`
//! facade, [`NullTrace`] drops everything.

use log::{debug, trace, warn};

use super::port::PortError;
use super::sizing::{Size, SizeDelta, SizingMode};

pub trait SizingTrace: Send + Sync {
    /// Recompute finished with a valid measurement
    fn recomputed(&self, mode: SizingMode, measured: Size, effective: Size);
    /// Manual drag-resize committed
    fn committed(&self, delta: SizeDelta, size: Size);
    /// Explicit reset to fluid mode
    fn reset(&self);
    /// Operation skipped (no measurement, stale instance, ...)
    fn skipped(&self, reason: &str);
    /// Port refused an event
    fn notify_failed(&self, kind: &str, err: &PortError);
}

/// Trace backed by `log`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTrace;

impl SizingTrace for LogTrace {
    fn recomputed(&self, mode: SizingMode, measured: Size, effective: Size) {
        debug!(
            "Viewport recompute ({:?}): measured {:.0}x{:.0} -> {:.0}x{:.0}",
            mode, measured.width, measured.height, effective.width, effective.height
        );
    }

    fn committed(&self, delta: SizeDelta, size: Size) {
        debug!(
            "Viewport resize committed: delta ({:+.0}, {:+.0}) -> {:.0}x{:.0}",
            delta.width, delta.height, size.width, size.height
        );
    }

    fn reset(&self) {
        debug!("Viewport size reset to fluid");
    }

    fn skipped(&self, reason: &str) {
        trace!("Viewport operation skipped: {}", reason);
    }

    fn notify_failed(&self, kind: &str, err: &PortError) {
        warn!("Viewport '{}' event not delivered: {}", kind, err);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullTrace;

impl SizingTrace for NullTrace {
    fn recomputed(&self, _mode: SizingMode, _measured: Size, _effective: Size) {}
    fn committed(&self, _delta: SizeDelta, _size: Size) {}
    fn reset(&self) {}
    fn skipped(&self, _reason: &str) {}
    fn notify_failed(&self, _kind: &str, _err: &PortError) {}
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Collects one line per trace call.
    #[derive(Default)]
    pub struct RecordingTrace {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingTrace {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        fn push(&self, line: String) {
            self.lines.lock().unwrap().push(line);
        }
    }

    impl SizingTrace for RecordingTrace {
        fn recomputed(&self, mode: SizingMode, measured: Size, effective: Size) {
            self.push(format!(
                "recomputed {:?} {}x{} -> {}x{}",
                mode, measured.width, measured.height, effective.width, effective.height
            ));
        }

        fn committed(&self, delta: SizeDelta, size: Size) {
            self.push(format!(
                "committed {}x{} -> {}x{}",
                delta.width, delta.height, size.width, size.height
            ));
        }

        fn reset(&self) {
            self.push("reset".to_string());
        }

        fn skipped(&self, reason: &str) {
            self.push(format!("skipped {}", reason));
        }

        fn notify_failed(&self, kind: &str, err: &PortError) {
            self.push(format!("notify_failed {} {}", kind, err));
        }
    }
}
