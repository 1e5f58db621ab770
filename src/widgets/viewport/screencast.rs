//! Screencast renderer - paints the remote screen and reports input.
//!
//! Input leaves as [`ScreencastSignal`]s shaped for the DevTools protocol
//! (`Input.dispatchMouseEvent` / `Input.dispatchKeyEvent`). In inspect mode
//! pointer hover requests a highlight and a click inspects the element.
//! Coordinates are in frame pixels.

use eframe::egui;
use serde_json::{json, Value};

use crate::core::port::ViewportEvent;
use crate::core::props::ScreencastFrame;

const MOUSE_ACTION: &str = "Input.dispatchMouseEvent";
const KEY_ACTION: &str = "Input.dispatchKeyEvent";

/// Event raised by the renderer, forwarded unmodified to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreencastSignal {
    Interaction { action: String, params: Value },
    InspectElement(Value),
    InspectHighlightRequested(Value),
}

impl From<ScreencastSignal> for ViewportEvent {
    fn from(signal: ScreencastSignal) -> Self {
        match signal {
            ScreencastSignal::Interaction { action, params } => {
                ViewportEvent::Interaction { action, params }
            }
            ScreencastSignal::InspectElement(params) => ViewportEvent::InspectElement { params },
            ScreencastSignal::InspectHighlightRequested(params) => {
                ViewportEvent::InspectHighlightRequested { params }
            }
        }
    }
}

/// Per-frame renderer inputs (pass-through props)
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreencastInput<'a> {
    pub frame: Option<&'a ScreencastFrame>,
    pub highlight_info: Option<&'a Value>,
    pub is_inspect_enabled: bool,
}

#[derive(Default)]
pub struct ScreencastView {
    texture: Option<egui::TextureHandle>,
    uploaded_seq: Option<u64>,
    last_hover: Option<(i32, i32)>,
}

impl ScreencastView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint into `rect` and collect input signals for this frame.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        input: ScreencastInput<'_>,
    ) -> Vec<ScreencastSignal> {
        let frame_size = input.frame.map(|f| (f.width, f.height));

        self.upload(ui.ctx(), input.frame);
        self.paint(ui, rect);

        if let Some(hl) = input.highlight_info.and_then(|v| highlight_rect(v, rect, frame_size)) {
            let painter = ui.painter();
            painter.rect_filled(hl, 0.0, egui::Color32::from_rgba_unmultiplied(111, 168, 220, 102));
        }

        let response = ui.interact(rect, ui.id().with("screencast"), egui::Sense::click());
        if !response.hovered() {
            self.last_hover = None;
            return Vec::new();
        }

        let (events, scroll) = ui.ctx().input(|i| (i.events.clone(), i.raw_scroll_delta));
        let mut signals = Vec::new();
        let coords = |pos: egui::Pos2| to_frame_coords(pos, rect, frame_size);

        for event in events {
            match event {
                egui::Event::PointerButton { pos, button, pressed, modifiers, .. } if rect.contains(pos) => {
                    let (x, y) = coords(pos);
                    if input.is_inspect_enabled {
                        if pressed && button == egui::PointerButton::Primary {
                            signals.push(ScreencastSignal::InspectElement(position_params(x, y)));
                        }
                    } else {
                        let kind = if pressed { "mousePressed" } else { "mouseReleased" };
                        signals.push(ScreencastSignal::Interaction {
                            action: MOUSE_ACTION.to_string(),
                            params: mouse_params(kind, x, y, Some(button), modifiers),
                        });
                    }
                }
                egui::Event::PointerMoved(pos) if rect.contains(pos) => {
                    let (x, y) = coords(pos);
                    if input.is_inspect_enabled {
                        let pixel = (x.round() as i32, y.round() as i32);
                        if self.last_hover != Some(pixel) {
                            self.last_hover = Some(pixel);
                            signals.push(ScreencastSignal::InspectHighlightRequested(position_params(x, y)));
                        }
                    } else {
                        let modifiers = ui.ctx().input(|i| i.modifiers);
                        signals.push(ScreencastSignal::Interaction {
                            action: MOUSE_ACTION.to_string(),
                            params: mouse_params("mouseMoved", x, y, None, modifiers),
                        });
                    }
                }
                egui::Event::Key { key, pressed, modifiers, .. } if !input.is_inspect_enabled => {
                    signals.push(ScreencastSignal::Interaction {
                        action: KEY_ACTION.to_string(),
                        params: key_params(key, pressed, modifiers),
                    });
                }
                egui::Event::Text(text) if !input.is_inspect_enabled => {
                    signals.push(ScreencastSignal::Interaction {
                        action: KEY_ACTION.to_string(),
                        params: json!({"type": "char", "text": text}),
                    });
                }
                _ => {}
            }
        }

        if !input.is_inspect_enabled
            && scroll != egui::Vec2::ZERO
            && let Some(pos) = response.hover_pos()
        {
            let (x, y) = coords(pos);
            let mut params = mouse_params("mouseWheel", x, y, None, egui::Modifiers::NONE);
            params["deltaX"] = json!(-scroll.x);
            params["deltaY"] = json!(-scroll.y);
            signals.push(ScreencastSignal::Interaction {
                action: MOUSE_ACTION.to_string(),
                params,
            });
        }

        signals
    }

    fn upload(&mut self, ctx: &egui::Context, frame: Option<&ScreencastFrame>) {
        let Some(frame) = frame else {
            return;
        };
        if self.uploaded_seq == Some(frame.seq) {
            return;
        }
        if !frame.is_valid() {
            log::warn!(
                "Screencast frame {} has {} bytes, expected {}x{} RGBA",
                frame.seq,
                frame.rgba.len(),
                frame.width,
                frame.height
            );
            self.uploaded_seq = Some(frame.seq);
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.rgba,
        );
        match self.texture.as_mut() {
            Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("screencast", image, egui::TextureOptions::LINEAR));
            }
        }
        self.uploaded_seq = Some(frame.seq);
    }

    fn paint(&self, ui: &egui::Ui, rect: egui::Rect) {
        let painter = ui.painter();
        match &self.texture {
            Some(tex) => {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(tex.id(), rect, uv, egui::Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, 0.0, egui::Color32::from_gray(24));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Waiting for screencast...",
                    egui::FontId::proportional(14.0),
                    egui::Color32::from_gray(140),
                );
            }
        }
    }
}

/// Map a screen position inside `rect` to frame pixels.
/// Without a frame the viewport's own points are used.
pub fn to_frame_coords(pos: egui::Pos2, rect: egui::Rect, frame_size: Option<(u32, u32)>) -> (f32, f32) {
    let local = pos - rect.min;
    match frame_size {
        Some((w, h)) if rect.width() > 0.0 && rect.height() > 0.0 => (
            local.x * w as f32 / rect.width(),
            local.y * h as f32 / rect.height(),
        ),
        _ => (local.x, local.y),
    }
}

/// DevTools modifier bitmask: Alt=1, Ctrl=2, Meta/Command=4, Shift=8
pub fn cdp_modifiers(m: egui::Modifiers) -> u8 {
    let mut bits = 0;
    if m.alt {
        bits |= 1;
    }
    if m.ctrl {
        bits |= 2;
    }
    if m.mac_cmd {
        bits |= 4;
    }
    if m.shift {
        bits |= 8;
    }
    bits
}

fn button_name(button: Option<egui::PointerButton>) -> &'static str {
    match button {
        Some(egui::PointerButton::Primary) => "left",
        Some(egui::PointerButton::Secondary) => "right",
        Some(egui::PointerButton::Middle) => "middle",
        Some(egui::PointerButton::Extra1) => "back",
        Some(egui::PointerButton::Extra2) => "forward",
        None => "none",
    }
}

pub fn mouse_params(
    kind: &str,
    x: f32,
    y: f32,
    button: Option<egui::PointerButton>,
    modifiers: egui::Modifiers,
) -> Value {
    let click_count = if button.is_some() { 1 } else { 0 };
    json!({
        "type": kind,
        "x": x.round() as i32,
        "y": y.round() as i32,
        "button": button_name(button),
        "clickCount": click_count,
        "modifiers": cdp_modifiers(modifiers),
    })
}

fn key_params(key: egui::Key, pressed: bool, modifiers: egui::Modifiers) -> Value {
    json!({
        "type": if pressed { "keyDown" } else { "keyUp" },
        "key": key.name(),
        "modifiers": cdp_modifiers(modifiers),
    })
}

fn position_params(x: f32, y: f32) -> Value {
    json!({"position": {"x": x.round() as i32, "y": y.round() as i32}})
}

/// Screen rect for highlight info `{x, y, width, height}` in frame pixels
pub fn highlight_rect(info: &Value, rect: egui::Rect, frame_size: Option<(u32, u32)>) -> Option<egui::Rect> {
    let num = |k: &str| info.get(k).and_then(Value::as_f64).map(|v| v as f32);
    let (x, y, w, h) = (num("x")?, num("y")?, num("width")?, num("height")?);
    let (sx, sy) = match frame_size {
        Some((fw, fh)) if fw > 0 && fh > 0 => (rect.width() / fw as f32, rect.height() / fh as f32),
        _ => (1.0, 1.0),
    };
    let min = rect.min + egui::vec2(x * sx, y * sy);
    Some(egui::Rect::from_min_size(min, egui::vec2(w * sx, h * sy)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(400.0, 300.0))
    }

    #[test]
    fn test_frame_coords_scale_to_frame() {
        let (x, y) = to_frame_coords(egui::pos2(210.0, 170.0), rect(), Some((800, 600)));
        assert_eq!((x, y), (400.0, 300.0));
        let (x, y) = to_frame_coords(egui::pos2(210.0, 170.0), rect(), None);
        assert_eq!((x, y), (200.0, 150.0));
    }

    #[test]
    fn test_modifier_bits() {
        let m = egui::Modifiers { alt: true, shift: true, ..Default::default() };
        assert_eq!(cdp_modifiers(m), 9);
        assert_eq!(cdp_modifiers(egui::Modifiers::NONE), 0);
    }

    #[test]
    fn test_mouse_params_shape() {
        let p = mouse_params("mousePressed", 12.4, 7.6, Some(egui::PointerButton::Primary), egui::Modifiers::NONE);
        assert_eq!(
            p,
            json!({"type": "mousePressed", "x": 12, "y": 8, "button": "left", "clickCount": 1, "modifiers": 0})
        );
    }

    #[test]
    fn test_signal_forwarding_is_unmodified() {
        let params = json!({"position": {"x": 3, "y": 4}});
        let event: ViewportEvent = ScreencastSignal::InspectElement(params.clone()).into();
        assert_eq!(event, ViewportEvent::InspectElement { params });

        let event: ViewportEvent = ScreencastSignal::Interaction {
            action: MOUSE_ACTION.to_string(),
            params: json!({"type": "mouseMoved"}),
        }
        .into();
        assert_eq!(event.kind(), "interaction");
    }

    #[test]
    fn test_highlight_rect_scales() {
        let info = json!({"x": 100, "y": 60, "width": 200, "height": 120});
        let hl = highlight_rect(&info, rect(), Some((800, 600))).unwrap();
        assert_eq!(hl.min, egui::pos2(60.0, 50.0));
        assert_eq!(hl.size(), egui::vec2(100.0, 60.0));
        assert!(highlight_rect(&json!({"x": 1}), rect(), None).is_none());
    }
}
