//! Sizing state machine - decides the viewport's effective dimensions.
//!
//! Two modes:
//! - Fluid: the viewport fills its measured box
//! - Fixed: the user drag-resized it; requested size wins, bounded by the box
//!
//! `fixed_size` is the only field with memory. `resizable` and `padding`
//! are re-derived from the latest props on every update and at the top of
//! every recompute.

use std::sync::Arc;

use eframe::egui;
use serde::{Deserialize, Serialize};

use super::port::{ViewportEvent, ViewportPort};
use super::props::ViewportProps;
use super::trace::SizingTrace;

/// Width/height pair in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Per-axis minimum
    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Subtract `amount` from both axes, stopping at zero
    pub fn shrink(self, amount: f32) -> Size {
        Size::new((self.width - amount).max(0.0), (self.height - amount).max(0.0))
    }

    pub fn to_vec2(self) -> egui::Vec2 {
        egui::vec2(self.width, self.height)
    }
}

impl From<egui::Vec2> for Size {
    fn from(v: egui::Vec2) -> Self {
        Size::new(v.x, v.y)
    }
}

/// Size change produced by a finished drag-resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeDelta {
    pub width: f32,
    pub height: f32,
}

impl SizeDelta {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn apply(self, size: Size) -> Size {
        Size::new(size.width + self.width, size.height + self.height)
    }
}

/// Sizing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizingMode {
    /// Viewport fills its measured box
    #[default]
    Fluid,
    /// Pinned by a manual resize, bounded by the box
    Fixed,
}

/// Inputs derived from host props. Never assigned on their own.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizingInputs {
    pub resizable: bool,
    pub padding: f32,
}

/// Derive `resizable`/`padding` from the props just received.
pub fn derive_sizing_inputs(props: &ViewportProps) -> SizingInputs {
    SizingInputs {
        resizable: props.is_device_emulation_enabled,
        padding: props.padding,
    }
}

/// Snapshot of the sizing state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    pub fixed_size: bool,
    pub resizable: bool,
    pub padding: f32,
}

/// Sizing state machine for one viewport container.
pub struct ViewportSizer {
    fixed_size: bool,
    inputs: SizingInputs,
    trace: Arc<dyn SizingTrace>,
}

impl std::fmt::Debug for ViewportSizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportSizer")
            .field("fixed_size", &self.fixed_size)
            .field("inputs", &self.inputs)
            .finish()
    }
}

impl ViewportSizer {
    pub fn new(props: &ViewportProps, trace: Arc<dyn SizingTrace>) -> Self {
        Self {
            fixed_size: false,
            inputs: derive_sizing_inputs(props),
            trace,
        }
    }

    /// Refresh derived inputs from new props. Leaves the mode untouched.
    pub fn apply_props(&mut self, props: &ViewportProps) {
        self.inputs = derive_sizing_inputs(props);
    }

    pub fn mode(&self) -> SizingMode {
        if self.fixed_size {
            SizingMode::Fixed
        } else {
            SizingMode::Fluid
        }
    }

    pub fn inputs(&self) -> SizingInputs {
        self.inputs
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            fixed_size: self.fixed_size,
            resizable: self.inputs.resizable,
            padding: self.inputs.padding,
        }
    }

    /// Effective size for the current mode. Pure; padding is not applied here.
    pub fn effective_size(&self, requested: Size, measured: Size) -> Size {
        match self.mode() {
            SizingMode::Fixed => requested.min(measured),
            SizingMode::Fluid => measured,
        }
    }

    /// Recompute effective size and report it.
    ///
    /// Returns `None` (and emits nothing) when there is no measured box yet.
    pub fn recompute(
        &mut self,
        props: &ViewportProps,
        measured: Option<Size>,
        port: &dyn ViewportPort,
    ) -> Option<Size> {
        self.apply_props(props);

        let Some(measured) = measured else {
            self.trace.skipped("no measured box");
            return None;
        };

        let size = self.effective_size(props.requested_size(), measured);
        self.trace.recomputed(self.mode(), measured, size);
        self.emit_size(port, size);
        Some(size)
    }

    /// Commit a finished drag-resize: switch to Fixed and report
    /// `requested + delta` without re-measuring.
    pub fn commit_manual_resize(
        &mut self,
        props: &ViewportProps,
        delta: SizeDelta,
        port: &dyn ViewportPort,
    ) -> Size {
        self.fixed_size = true;
        let size = delta.apply(props.requested_size());
        self.trace.committed(delta, size);
        self.emit_size(port, size);
        size
    }

    /// Back to Fluid, then recompute with the given measurement.
    pub fn reset(
        &mut self,
        props: &ViewportProps,
        measured: Option<Size>,
        port: &dyn ViewportPort,
    ) -> Option<Size> {
        self.fixed_size = false;
        self.trace.reset();
        self.recompute(props, measured, port)
    }

    fn emit_size(&self, port: &dyn ViewportPort, size: Size) {
        let event = ViewportEvent::Size {
            width: size.width,
            height: size.height,
        };
        if let Err(e) = port.notify(event) {
            // State already moved; the next recompute self-corrects
            self.trace.notify_failed("size", &e);
        }
    }
}
