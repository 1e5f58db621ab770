use eframe::egui;

/// "W × H" label shown above the frame
pub fn format_dimensions(width: f32, height: f32) -> String {
    format!("{} × {}", width.round() as i64, height.round() as i64)
}

/// Draw the dimension label centered just above `frame`, clipped to `panel`
pub fn render(ui: &egui::Ui, panel: egui::Rect, frame: egui::Rect, width: f32, height: f32) {
    let y = (frame.top() - 10.0).max(panel.top() + 10.0);
    ui.painter().text(
        egui::pos2(frame.center().x, y),
        egui::Align2::CENTER_CENTER,
        format_dimensions(width, height),
        egui::FontId::monospace(11.0),
        egui::Color32::from_gray(170),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_dimensions(820.0, 590.4), "820 × 590");
        assert_eq!(format_dimensions(0.0, 0.4), "0 × 0");
    }
}
