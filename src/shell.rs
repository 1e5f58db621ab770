//! Host shell: logger bootstrap and the glue between a host window and its
//! viewport container.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::ViewportConfig;
use crate::core::event_bus::{downcast_event, EventBus};
use crate::core::port::{HostPort, ViewportChangedEvent, ViewportEvent};
use crate::core::props::{ScreencastFrame, ViewportProps};
use crate::core::resize_signal::WindowResizedEvent;
use crate::core::sizing::Size;
use crate::core::trace::{LogTrace, SizingTrace};
use crate::widgets::viewport::{ResetViewportSizeEvent, ViewportContainer};

/// Initialize env_logger.
///
/// 0 = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace.
/// Console logging respects RUST_LOG; file logging uses the flag level.
pub fn init_logger(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            env_logger::Builder::new()
                .filter_level(level)
                .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
                .filter_module("eframe", log::LevelFilter::Info)
                .format_timestamp_millis()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init()
                .context("Logger already initialized")?;
            info!("Logging to file: {} (level: {:?})", path.display(), level);
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
                .filter_module("egui", log::LevelFilter::Info)
                .filter_module("eframe", log::LevelFilter::Info)
                .format_timestamp_millis()
                .try_init()
                .context("Logger already initialized")?;
        }
    }
    Ok(())
}

/// Load an image file as a screencast frame
pub fn load_frame(path: &Path, seq: u64) -> Result<ScreencastFrame> {
    let img = image::open(path)
        .with_context(|| format!("Failed to load frame image: {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    info!("Loaded frame {}x{} from {}", width, height, path.display());
    Ok(ScreencastFrame::new(width, height, rgba.into_raw(), seq))
}

/// Checkerboard placeholder frame
pub fn test_pattern(width: u32, height: u32, seq: u64) -> ScreencastFrame {
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let light = ((x / 32) + (y / 32)) % 2 == 0;
            let v = if light { 200 } else { 120 };
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    ScreencastFrame::new(width, height, rgba, seq)
}

/// Host state around one viewport container.
///
/// Plays the embedding tool's part: observes the window, echoes size reports
/// back into the props and keeps a short log of viewport events.
pub struct Shell {
    pub event_bus: EventBus,
    pub container: ViewportContainer,
    recent: VecDeque<ViewportEvent>,
    recent_cap: usize,
    last_window: Option<Size>,
}

impl Shell {
    pub fn new(config: &ViewportConfig) -> Self {
        Self::with_trace(config, Arc::new(LogTrace))
    }

    /// Build and mount the container on a fresh bus
    pub fn with_trace(config: &ViewportConfig, trace: Arc<dyn SizingTrace>) -> Self {
        let event_bus = EventBus::new();
        let port = HostPort::from_emitter(event_bus.emitter());
        let mut container = ViewportContainer::with_trace(
            config.initial_props(),
            port,
            trace,
            config.resize_debounce_ms,
        );
        container.mount(&event_bus, Instant::now());

        Self {
            event_bus,
            container,
            recent: VecDeque::new(),
            recent_cap: config.event_log_len.max(1),
            last_window: None,
        }
    }

    /// Edit the host props and hand them to the container
    pub fn update_props(&mut self, f: impl FnOnce(&mut ViewportProps)) {
        let mut props = self.container.props().clone();
        f(&mut props);
        self.container.set_props(props);
    }

    /// Report the current window/frame size; emits a resize event on change.
    pub fn observe_window(&mut self, size: Size, now: Instant) {
        if self.last_window == Some(size) {
            return;
        }
        if self.last_window.is_some() {
            debug!("Window resized to {:.0}x{:.0}", size.width, size.height);
            self.event_bus.emit(WindowResizedEvent { size, at: now });
        }
        self.last_window = Some(size);
    }

    /// Ask the viewport to go fluid again (handled on the next update)
    pub fn request_reset(&self) {
        self.event_bus.emit(ResetViewportSizeEvent);
    }

    /// One host-loop step: drive the debounce, then drain the bus.
    /// Returns how long until the next pending recompute, if any.
    pub fn update(&mut self, now: Instant) -> Option<Duration> {
        self.container.tick(now);
        self.process_events();
        self.container.next_tick_in(now)
    }

    /// Drain queued bus events. Returns the number of viewport events seen.
    pub fn process_events(&mut self) -> usize {
        let mut seen = 0;
        // Handlers may emit more events; loop until the queue stays empty
        loop {
            let events = self.event_bus.poll();
            if events.is_empty() {
                break;
            }
            for event in events {
                if let Some(ViewportChangedEvent(e)) = downcast_event::<ViewportChangedEvent>(&event) {
                    seen += 1;
                    self.handle_viewport_event(e.clone());
                } else if downcast_event::<ResetViewportSizeEvent>(&event).is_some() {
                    self.container.reset_viewport_size();
                }
            }
        }
        seen
    }

    /// Most recent viewport events, oldest first
    pub fn recent_events(&self) -> impl Iterator<Item = &ViewportEvent> {
        self.recent.iter()
    }

    fn handle_viewport_event(&mut self, event: ViewportEvent) {
        match &event {
            ViewportEvent::Size { width, height } => {
                let (w, h) = (*width, *height);
                self.update_props(|p| {
                    p.width = w;
                    p.height = h;
                });
            }
            other => debug!("Viewport {}: {:?}", other.kind(), other),
        }
        if self.recent.len() >= self.recent_cap {
            self.recent.pop_front();
        }
        self.recent.push_back(event);
    }
}
