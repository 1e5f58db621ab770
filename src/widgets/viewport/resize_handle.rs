//! Drag-resize handles around the viewport frame.
//!
//! Eight compass handles. A gesture accumulates pointer movement while the
//! button is held and reports a single [`SizeDelta`] on release.

use eframe::egui;

use crate::core::sizing::SizeDelta;

/// Hit-zone thickness in points
const HANDLE_THICKNESS: f32 = 8.0;
/// Visible grip length on edges
const GRIP_LENGTH: f32 = 24.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
        Handle::TopLeft,
    ];

    /// Growth direction per axis: +1 grows with pointer, -1 against, 0 ignores
    fn signs(self) -> (f32, f32) {
        match self {
            Handle::Top => (0.0, -1.0),
            Handle::TopRight => (1.0, -1.0),
            Handle::Right => (1.0, 0.0),
            Handle::BottomRight => (1.0, 1.0),
            Handle::Bottom => (0.0, 1.0),
            Handle::BottomLeft => (-1.0, 1.0),
            Handle::Left => (-1.0, 0.0),
            Handle::TopLeft => (-1.0, -1.0),
        }
    }

    /// Size change for a pointer drag of `drag` on this handle
    pub fn delta_for(self, drag: egui::Vec2) -> SizeDelta {
        let (sx, sy) = self.signs();
        SizeDelta::new(sx * drag.x, sy * drag.y)
    }

    pub fn cursor(self) -> egui::CursorIcon {
        match self {
            Handle::Top => egui::CursorIcon::ResizeNorth,
            Handle::TopRight => egui::CursorIcon::ResizeNorthEast,
            Handle::Right => egui::CursorIcon::ResizeEast,
            Handle::BottomRight => egui::CursorIcon::ResizeSouthEast,
            Handle::Bottom => egui::CursorIcon::ResizeSouth,
            Handle::BottomLeft => egui::CursorIcon::ResizeSouthWest,
            Handle::Left => egui::CursorIcon::ResizeWest,
            Handle::TopLeft => egui::CursorIcon::ResizeNorthWest,
        }
    }

    /// Hit zone straddling the frame border
    pub fn hit_rect(self, frame: egui::Rect, thickness: f32) -> egui::Rect {
        let t = thickness;
        let h = t / 2.0;
        let (l, r, top, b) = (frame.left(), frame.right(), frame.top(), frame.bottom());
        let corner = |x: f32, y: f32| egui::Rect::from_center_size(egui::pos2(x, y), egui::vec2(t, t));
        match self {
            Handle::Top => egui::Rect::from_min_max(egui::pos2(l + h, top - h), egui::pos2(r - h, top + h)),
            Handle::Bottom => egui::Rect::from_min_max(egui::pos2(l + h, b - h), egui::pos2(r - h, b + h)),
            Handle::Left => egui::Rect::from_min_max(egui::pos2(l - h, top + h), egui::pos2(l + h, b - h)),
            Handle::Right => egui::Rect::from_min_max(egui::pos2(r - h, top + h), egui::pos2(r + h, b - h)),
            Handle::TopLeft => corner(l, top),
            Handle::TopRight => corner(r, top),
            Handle::BottomLeft => corner(l, b),
            Handle::BottomRight => corner(r, b),
        }
    }

    fn is_corner(self) -> bool {
        let (sx, sy) = self.signs();
        sx != 0.0 && sy != 0.0
    }
}

/// Per-handle enable flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ResizeEnable {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
    pub top_right: bool,
    pub bottom_right: bool,
    pub bottom_left: bool,
    pub top_left: bool,
}

impl ResizeEnable {
    pub const fn all() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
            top_right: true,
            bottom_right: true,
            bottom_left: true,
            top_left: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            top: false,
            right: false,
            bottom: false,
            left: false,
            top_right: false,
            bottom_right: false,
            bottom_left: false,
            top_left: false,
        }
    }

    pub fn is_enabled(&self, handle: Handle) -> bool {
        match handle {
            Handle::Top => self.top,
            Handle::TopRight => self.top_right,
            Handle::Right => self.right,
            Handle::BottomRight => self.bottom_right,
            Handle::Bottom => self.bottom,
            Handle::BottomLeft => self.bottom_left,
            Handle::Left => self.left,
            Handle::TopLeft => self.top_left,
        }
    }

    pub fn any(&self) -> bool {
        Handle::ALL.iter().any(|h| self.is_enabled(*h))
    }

    pub fn enabled(&self) -> impl Iterator<Item = Handle> + '_ {
        Handle::ALL.into_iter().filter(move |h| self.is_enabled(*h))
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveDrag {
    handle: Handle,
    accumulated: egui::Vec2,
}

/// Drag-resize gesture tracker.
#[derive(Clone, Debug, Default)]
pub struct DragResize {
    active: Option<ActiveDrag>,
}

impl DragResize {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, handle: Handle) {
        self.active = Some(ActiveDrag {
            handle,
            accumulated: egui::Vec2::ZERO,
        });
    }

    /// Add pointer movement to the running gesture
    pub fn drag(&mut self, pointer_delta: egui::Vec2) {
        if let Some(active) = self.active.as_mut() {
            active.accumulated += pointer_delta;
        }
    }

    /// End the gesture, returning its size change
    pub fn finish(&mut self) -> Option<SizeDelta> {
        self.active
            .take()
            .map(|a| a.handle.delta_for(a.accumulated))
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_handle(&self) -> Option<Handle> {
        self.active.map(|a| a.handle)
    }

    /// Size change so far (zero when idle), for live preview
    pub fn live_delta(&self) -> SizeDelta {
        self.active
            .map(|a| a.handle.delta_for(a.accumulated))
            .unwrap_or_default()
    }

    /// Draw handles around `frame` and run the gesture.
    /// Returns the committed delta on the frame the drag stops.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        frame: egui::Rect,
        enable: ResizeEnable,
    ) -> Option<SizeDelta> {
        if !enable.any() {
            self.cancel();
            return None;
        }
        if let Some(h) = self.active_handle()
            && !enable.is_enabled(h)
        {
            self.cancel();
        }

        let mut committed = None;
        let grip = egui::Color32::from_gray(150);

        for handle in enable.enabled() {
            let rect = handle.hit_rect(frame, HANDLE_THICKNESS);
            let response = ui.interact(
                rect,
                ui.id().with(("viewport_resizer", handle)),
                egui::Sense::drag(),
            );

            if response.hovered() || response.dragged() {
                ui.ctx().set_cursor_icon(handle.cursor());
            }
            if response.drag_started() {
                self.begin(handle);
            }
            if response.dragged() && self.active_handle() == Some(handle) {
                self.drag(response.drag_delta());
            }
            if response.drag_stopped() && self.active_handle() == Some(handle) {
                committed = self.finish();
            }

            paint_grip(ui, frame, handle, grip);
        }

        committed
    }
}

fn paint_grip(ui: &egui::Ui, frame: egui::Rect, handle: Handle, color: egui::Color32) {
    let painter = ui.painter();
    if handle.is_corner() {
        let rect = handle.hit_rect(frame, HANDLE_THICKNESS * 0.75);
        painter.rect_filled(rect, 1.0, color);
        return;
    }
    let c = handle.hit_rect(frame, HANDLE_THICKNESS).center();
    let (sx, _) = handle.signs();
    let size = if sx != 0.0 {
        egui::vec2(3.0, GRIP_LENGTH)
    } else {
        egui::vec2(GRIP_LENGTH, 3.0)
    };
    painter.rect_filled(egui::Rect::from_center_size(c, size), 1.5, color);
}
