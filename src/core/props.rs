//! Host-supplied viewport props.
//!
//! Only `width`, `height`, `padding` and `is_device_emulation_enabled` feed the
//! sizing state machine. The rest pass straight through to collaborators.

use std::sync::Arc;

use super::sizing::Size;

/// One decoded screencast frame (RGBA8, row-major).
#[derive(Clone, Debug, PartialEq)]
pub struct ScreencastFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
    /// Monotonic frame counter, used to skip redundant texture uploads
    pub seq: u64,
}

impl ScreencastFrame {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>, seq: u64) -> Self {
        Self {
            width,
            height,
            rgba: Arc::new(rgba),
            seq,
        }
    }

    /// True if the buffer length matches the declared dimensions
    pub fn is_valid(&self) -> bool {
        self.rgba.len() == self.width as usize * self.height as usize * 4
    }
}

/// Props the host hands to the viewport container. May change at any time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportProps {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub is_device_emulation_enabled: bool,
    /// 0.0..=1.0, forwarded to the loading indicator
    pub loading_percent: f32,
    pub frame: Option<ScreencastFrame>,
    pub highlight_info: Option<serde_json::Value>,
    pub is_inspect_enabled: bool,
}

impl ViewportProps {
    pub fn requested_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_validity() {
        assert!(ScreencastFrame::new(2, 2, vec![0; 16], 0).is_valid());
        assert!(!ScreencastFrame::new(2, 2, vec![0; 15], 0).is_valid());
    }
}
