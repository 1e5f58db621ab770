//! Viewport widget - UI rendering

use eframe::egui;

use super::info;
use super::loading_bar::LoadingBar;
use super::resize_handle::DragResize;
use super::screencast::{ScreencastInput, ScreencastView};
use super::ViewportContainer;
use crate::core::sizing::Size;

/// Smallest frame drawn while dragging
const MIN_FRAME: f32 = 16.0;

/// Per-viewport widget state that lives across frames
#[derive(Default)]
pub struct ViewportWidgets {
    pub drag: DragResize,
    pub screencast: ScreencastView,
    pub loading: LoadingBar,
}

impl ViewportWidgets {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Render the viewport into the remaining space of `ui`.
///
/// Measures the box, draws loading bar, dimension label, screencast and
/// resize handles, and feeds resize-stop / renderer events to the container.
/// Returns the measured box.
pub fn render(
    ui: &mut egui::Ui,
    container: &mut ViewportContainer,
    widgets: &mut ViewportWidgets,
) -> Size {
    let panel_rect = ui.max_rect();
    let measured = Size::from(panel_rect.size());
    container.set_measured(Some(measured));

    let layout = container.layout();
    let live = widgets.drag.live_delta().apply(layout.size);
    let frame_size = egui::vec2(live.width.max(MIN_FRAME), live.height.max(MIN_FRAME));
    let frame_rect = egui::Rect::from_center_size(panel_rect.center(), frame_size);

    ui.painter()
        .rect_filled(panel_rect, 0.0, egui::Color32::from_gray(32));

    let props = container.props();
    let input = ScreencastInput {
        frame: props.frame.as_ref(),
        highlight_info: props.highlight_info.as_ref(),
        is_inspect_enabled: props.is_inspect_enabled,
    };
    let signals = widgets.screencast.show(ui, frame_rect, input);

    widgets.loading.set_percent(container.props().loading_percent);
    widgets.loading.render(ui, panel_rect);
    info::render(ui, panel_rect, frame_rect, live.width, live.height);

    if layout.resizable {
        ui.painter().rect_stroke(
            frame_rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(90)),
            egui::StrokeKind::Outside,
        );
    }

    for signal in signals {
        container.forward(signal);
    }

    if let Some(delta) = widgets.drag.show(ui, frame_rect, layout.enable) {
        container.on_resize_stop(delta);
    }
    if widgets.drag.is_active() {
        ui.ctx().request_repaint();
    }

    measured
}
