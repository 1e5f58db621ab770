//! Outward event port of the viewport.
//!
//! Every notification the host sees goes through [`ViewportPort::notify`]:
//! size reports from the sizing state machine plus the three pass-through
//! kinds from the screencast renderer. Serialized shape is
//! `{"kind": "...", "payload": {...}}`.

use serde::{Deserialize, Serialize};

use super::event_bus::EventEmitter;

/// Viewport notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum ViewportEvent {
    Size {
        width: f32,
        height: f32,
    },
    Interaction {
        action: String,
        params: serde_json::Value,
    },
    InspectElement {
        params: serde_json::Value,
    },
    InspectHighlightRequested {
        params: serde_json::Value,
    },
}

impl ViewportEvent {
    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            ViewportEvent::Size { .. } => "size",
            ViewportEvent::Interaction { .. } => "interaction",
            ViewportEvent::InspectElement { .. } => "inspectElement",
            ViewportEvent::InspectHighlightRequested { .. } => "inspectHighlightRequested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// Host has not connected a receiver yet
    NotConnected,
    /// Receiver refused the event
    Rejected(String),
}

impl std::fmt::Display for PortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortError::NotConnected => write!(f, "Viewport host not connected"),
            PortError::Rejected(msg) => write!(f, "Viewport host rejected event: {}", msg),
        }
    }
}

impl std::error::Error for PortError {}

/// Typed outward interface. Swap implementations to change hosts.
pub trait ViewportPort {
    fn notify(&self, event: ViewportEvent) -> Result<(), PortError>;
}

/// Bus event carrying a viewport notification to the host.
#[derive(Clone, Debug)]
pub struct ViewportChangedEvent(pub ViewportEvent);

/// Port backed by the application event bus (wraps Option<EventEmitter>).
#[derive(Clone, Default, Debug)]
pub struct HostPort {
    inner: Option<EventEmitter>,
}

impl HostPort {
    /// Port with no receiver (for containers created before the host is ready)
    pub fn dummy() -> Self {
        Self { inner: None }
    }

    pub fn from_emitter(emitter: EventEmitter) -> Self {
        Self { inner: Some(emitter) }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_some()
    }
}

impl ViewportPort for HostPort {
    fn notify(&self, event: ViewportEvent) -> Result<(), PortError> {
        let emitter = self.inner.as_ref().ok_or(PortError::NotConnected)?;
        emitter.emit(ViewportChangedEvent(event));
        Ok(())
    }
}

/// Port that always fails with [`PortError::NotConnected`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DisconnectedPort;

impl ViewportPort for DisconnectedPort {
    fn notify(&self, _event: ViewportEvent) -> Result<(), PortError> {
        Err(PortError::NotConnected)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::sizing::Size;

    /// Records every event it receives. Clones share the record.
    #[derive(Clone, Default)]
    pub struct RecordingPort {
        events: Arc<Mutex<Vec<ViewportEvent>>>,
    }

    impl RecordingPort {
        pub fn events(&self) -> Vec<ViewportEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn sizes(&self) -> Vec<Size> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ViewportEvent::Size { width, height } => Some(Size::new(width, height)),
                    _ => None,
                })
                .collect()
        }
    }

    impl ViewportPort for RecordingPort {
        fn notify(&self, event: ViewportEvent) -> Result<(), PortError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }
}
