use eframe::egui;

/// Thin loading indicator along the top edge of the viewport
pub struct LoadingBar {
    percent: f32,
    height: f32,
    fill_color: egui::Color32,
}

impl Default for LoadingBar {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl LoadingBar {
    /// Default fill color: DevTools blue
    pub fn new(height: f32) -> Self {
        Self::with_color(height, egui::Color32::from_rgb(66, 133, 244))
    }

    pub fn with_color(height: f32, fill_color: egui::Color32) -> Self {
        Self {
            percent: 0.0,
            height,
            fill_color,
        }
    }

    /// 0.0..=1.0; values outside are clamped
    pub fn set_percent(&mut self, percent: f32) {
        self.percent = percent.clamp(0.0, 1.0);
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// Hidden when idle or done
    pub fn is_visible(&self) -> bool {
        self.percent > 0.0 && self.percent < 1.0
    }

    /// Paint over the top of `rect`
    pub fn render(&self, ui: &egui::Ui, rect: egui::Rect) {
        if !self.is_visible() {
            return;
        }
        let bar = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), self.height));
        ui.painter().rect_filled(bar, 0.0, egui::Color32::from_gray(40));

        let fill = egui::Rect::from_min_size(bar.min, egui::vec2(bar.width() * self.percent, bar.height()));
        ui.painter().rect_filled(fill, 0.0, self.fill_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let mut bar = LoadingBar::default();
        assert!(!bar.is_visible());
        bar.set_percent(0.4);
        assert!(bar.is_visible());
        bar.set_percent(3.0);
        assert_eq!(bar.percent(), 1.0);
        assert!(!bar.is_visible());
    }
}
