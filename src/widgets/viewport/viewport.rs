use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use uuid::Uuid;

use crate::core::debounce::RESIZE_DEBOUNCE_MS;
use crate::core::event_bus::EventBus;
use crate::core::port::{ViewportEvent, ViewportPort};
use crate::core::props::ViewportProps;
use crate::core::resize_signal::ResizeSignal;
use crate::core::sizing::{Size, SizeDelta, SizingMode, ViewportSizer, ViewportState};
use crate::core::trace::{LogTrace, SizingTrace};

use super::resize_handle::ResizeEnable;
use super::screencast::ScreencastSignal;

/// Container lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// Geometry of the resizable frame for this render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub size: Size,
    pub resizable: bool,
    pub enable: ResizeEnable,
}

/// Viewport container: props in, size and interaction events out.
///
/// Owns the sizing state machine and the resize signal. All handlers are
/// no-ops unless the container is mounted.
pub struct ViewportContainer {
    id: Uuid,
    props: ViewportProps,
    sizer: ViewportSizer,
    signal: ResizeSignal,
    /// Last measured on-screen box; None until laid out
    measured: Option<Size>,
    /// Reset asked for a recompute before any measurement existed
    recompute_on_measure: bool,
    lifecycle: Lifecycle,
    port: Box<dyn ViewportPort>,
    trace: Arc<dyn SizingTrace>,
}

impl std::fmt::Debug for ViewportContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportContainer")
            .field("id", &self.id)
            .field("lifecycle", &self.lifecycle)
            .field("sizer", &self.sizer)
            .field("measured", &self.measured)
            .finish()
    }
}

impl ViewportContainer {
    pub fn new(props: ViewportProps, port: impl ViewportPort + 'static) -> Self {
        Self::with_trace(props, port, Arc::new(LogTrace), RESIZE_DEBOUNCE_MS)
    }

    pub fn with_trace(
        props: ViewportProps,
        port: impl ViewportPort + 'static,
        trace: Arc<dyn SizingTrace>,
        debounce_ms: u64,
    ) -> Self {
        let sizer = ViewportSizer::new(&props, Arc::clone(&trace));
        Self {
            id: Uuid::new_v4(),
            props,
            sizer,
            signal: ResizeSignal::new(debounce_ms),
            measured: None,
            recompute_on_measure: false,
            lifecycle: Lifecycle::Created,
            port: Box::new(port),
            trace,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn props(&self) -> &ViewportProps {
        &self.props
    }

    pub fn state(&self) -> ViewportState {
        self.sizer.state()
    }

    pub fn mode(&self) -> SizingMode {
        self.sizer.mode()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn measured(&self) -> Option<Size> {
        self.measured
    }

    /// Register the resize signal and arm the initial layout pass.
    pub fn mount(&mut self, bus: &EventBus, now: Instant) {
        if self.is_mounted() {
            debug!("Viewport {} already mounted", self.id);
            return;
        }
        self.signal.attach(bus, now);
        self.lifecycle = Lifecycle::Mounted;
        info!("Viewport {} mounted", self.id);
    }

    /// Release the resize signal. Later callbacks are ignored.
    pub fn unmount(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        self.signal.detach();
        self.measured = None;
        self.recompute_on_measure = false;
        self.lifecycle = Lifecycle::Unmounted;
        info!("Viewport {} unmounted", self.id);
    }

    /// New host props. Re-derives `resizable`/`padding`, keeps the mode.
    pub fn set_props(&mut self, props: ViewportProps) {
        self.sizer.apply_props(&props);
        self.props = props;
    }

    /// Latest on-screen box from layout (None when detached from the display)
    pub fn set_measured(&mut self, measured: Option<Size>) {
        self.measured = measured;
        if self.recompute_on_measure && measured.is_some() && self.is_mounted() {
            self.recompute_on_measure = false;
            self.recompute();
        }
    }

    /// Drive the debounced resize signal. Returns the size if a recompute ran.
    pub fn tick(&mut self, now: Instant) -> Option<Size> {
        if !self.is_mounted() {
            return None;
        }
        if self.signal.poll(now) {
            return self.recompute();
        }
        None
    }

    /// Time until the next pending recompute, for repaint scheduling
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.signal.remaining(now)
    }

    /// Host control: back to fluid sizing and recompute.
    pub fn reset_viewport_size(&mut self) -> Option<Size> {
        if !self.guard("reset") {
            return None;
        }
        let size = self.sizer.reset(&self.props, self.measured, self.port.as_ref());
        if size.is_none() {
            self.recompute_on_measure = true;
        }
        size
    }

    /// Drag-resize wrapper finished a gesture.
    pub fn on_resize_stop(&mut self, delta: SizeDelta) -> Option<Size> {
        if !self.guard("resize stop") {
            return None;
        }
        // A committed size supersedes any recompute still waiting on a measurement
        self.recompute_on_measure = false;
        Some(self.sizer.commit_manual_resize(&self.props, delta, self.port.as_ref()))
    }

    /// Pass a renderer event through to the host unchanged.
    pub fn forward(&self, signal: ScreencastSignal) {
        if !self.guard("forward") {
            return;
        }
        let event: ViewportEvent = signal.into();
        let kind = event.kind();
        if let Err(e) = self.port.notify(event) {
            self.trace.notify_failed(kind, &e);
        }
    }

    /// Frame geometry: padding subtracted and all handles on only when resizable.
    pub fn layout(&self) -> FrameLayout {
        let inputs = self.sizer.inputs();
        let requested = self.props.requested_size();
        if inputs.resizable {
            FrameLayout {
                size: requested.shrink(inputs.padding),
                resizable: true,
                enable: ResizeEnable::all(),
            }
        } else {
            FrameLayout {
                size: requested,
                resizable: false,
                enable: ResizeEnable::none(),
            }
        }
    }

    fn recompute(&mut self) -> Option<Size> {
        self.sizer.recompute(&self.props, self.measured, self.port.as_ref())
    }

    fn guard(&self, op: &str) -> bool {
        if self.is_mounted() {
            return true;
        }
        self.trace.skipped(&format!("{} on {:?} viewport", op, self.lifecycle));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::port::test_support::RecordingPort;
    use crate::core::resize_signal::WindowResizedEvent;
    use crate::core::trace::NullTrace;
    use serde_json::json;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn props(width: f32, height: f32) -> ViewportProps {
        ViewportProps {
            width,
            height,
            ..Default::default()
        }
    }

    fn container(p: ViewportProps) -> (ViewportContainer, RecordingPort) {
        let port = RecordingPort::default();
        let c = ViewportContainer::with_trace(p, port.clone(), Arc::new(NullTrace), 50);
        (c, port)
    }

    fn resized(bus: &EventBus, at: Instant) {
        bus.emit(WindowResizedEvent { size: Size::new(0.0, 0.0), at });
    }

    #[test]
    fn test_mount_runs_initial_recompute() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));

        c.mount(&bus, t0);
        c.set_measured(Some(Size::new(1024.0, 768.0)));

        assert_eq!(c.tick(t0 + ms(10)), None);
        assert_eq!(c.tick(t0 + ms(50)), Some(Size::new(1024.0, 768.0)));
        assert_eq!(port.sizes(), vec![Size::new(1024.0, 768.0)]);
    }

    #[test]
    fn test_resize_burst_uses_measurement_when_window_closes() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, t0);
        c.set_measured(Some(Size::new(500.0, 500.0)));
        c.tick(t0 + ms(50));

        resized(&bus, t0 + ms(100));
        c.set_measured(Some(Size::new(600.0, 500.0)));
        resized(&bus, t0 + ms(120));
        c.set_measured(Some(Size::new(700.0, 500.0)));
        resized(&bus, t0 + ms(140));
        assert_eq!(c.tick(t0 + ms(170)), None);
        c.set_measured(Some(Size::new(720.0, 510.0)));

        assert_eq!(c.tick(t0 + ms(190)), Some(Size::new(720.0, 510.0)));
        assert_eq!(c.tick(t0 + ms(400)), None);
        assert_eq!(port.sizes().len(), 2);
    }

    #[test]
    fn test_no_measurement_no_event() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, t0);

        assert_eq!(c.tick(t0 + ms(60)), None);
        assert!(port.events().is_empty());
    }

    #[test]
    fn test_manual_resize_then_fixed_recompute() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, t0);
        c.set_measured(Some(Size::new(1000.0, 700.0)));

        let committed = c.on_resize_stop(SizeDelta::new(20.0, -10.0));
        assert_eq!(committed, Some(Size::new(820.0, 590.0)));
        assert_eq!(c.mode(), SizingMode::Fixed);

        // Host echoes the size back, then the window shrinks
        c.set_props(props(820.0, 590.0));
        c.set_measured(Some(Size::new(700.0, 900.0)));
        resized(&bus, t0 + ms(100));
        assert_eq!(c.tick(t0 + ms(150)), Some(Size::new(700.0, 590.0)));

        assert_eq!(
            port.sizes(),
            vec![Size::new(820.0, 590.0), Size::new(700.0, 590.0)]
        );
    }

    #[test]
    fn test_reset_from_fixed() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, t0);
        c.set_measured(Some(Size::new(1000.0, 700.0)));
        c.on_resize_stop(SizeDelta::new(-100.0, -100.0));

        let size = c.reset_viewport_size();

        assert_eq!(c.mode(), SizingMode::Fluid);
        assert_eq!(size, Some(Size::new(1000.0, 700.0)));
        assert_eq!(port.sizes().last(), Some(&Size::new(1000.0, 700.0)));
    }

    #[test]
    fn test_reset_before_measurement_defers_once() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, t0);

        assert_eq!(c.reset_viewport_size(), None);
        assert!(port.events().is_empty());

        c.set_measured(Some(Size::new(640.0, 480.0)));
        c.set_measured(Some(Size::new(640.0, 480.0)));
        assert_eq!(port.sizes(), vec![Size::new(640.0, 480.0)]);
    }

    #[test]
    fn test_manual_resize_cancels_deferred_reset() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, t0);

        assert_eq!(c.reset_viewport_size(), None);
        assert_eq!(c.on_resize_stop(SizeDelta::new(20.0, -10.0)), Some(Size::new(820.0, 590.0)));
        c.set_measured(Some(Size::new(1000.0, 700.0)));

        assert_eq!(c.mode(), SizingMode::Fixed);
        assert_eq!(port.sizes(), vec![Size::new(820.0, 590.0)]);
    }

    #[test]
    fn test_layout_never_negative() {
        let mut p = props(10.0, 10.0);
        p.padding = 40.0;
        p.is_device_emulation_enabled = true;
        let (mut c, _) = container(p);
        c.mount(&EventBus::new(), Instant::now());

        assert_eq!(c.layout().size, Size::new(0.0, 0.0));
    }

    #[test]
    fn test_unmount_silences_pending_callbacks() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, t0);
        c.set_measured(Some(Size::new(1000.0, 700.0)));
        resized(&bus, t0 + ms(10));

        c.unmount();

        resized(&bus, t0 + ms(20));
        assert_eq!(c.tick(t0 + ms(500)), None);
        assert_eq!(c.on_resize_stop(SizeDelta::new(1.0, 1.0)), None);
        assert_eq!(c.reset_viewport_size(), None);
        c.forward(ScreencastSignal::InspectElement(json!({})));
        assert!(port.events().is_empty());
        assert_eq!(bus.subscriber_count::<WindowResizedEvent>(), 0);
        assert_eq!(c.lifecycle(), Lifecycle::Unmounted);
    }

    #[test]
    fn test_single_registration_per_container() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let (mut a, _) = container(props(1.0, 1.0));
        let (mut b, _) = container(props(1.0, 1.0));

        a.mount(&bus, t0);
        a.mount(&bus, t0);
        b.mount(&bus, t0);
        assert_eq!(bus.subscriber_count::<WindowResizedEvent>(), 2);

        drop(a);
        assert_eq!(bus.subscriber_count::<WindowResizedEvent>(), 1);
    }

    #[test]
    fn test_layout_follows_emulation_flag() {
        let mut p = props(800.0, 600.0);
        p.padding = 40.0;
        let (mut c, _) = container(p.clone());
        let bus = EventBus::new();
        c.mount(&bus, Instant::now());

        let layout = c.layout();
        assert!(!layout.resizable);
        assert_eq!(layout.enable, ResizeEnable::none());
        assert_eq!(layout.size, Size::new(800.0, 600.0));

        p.is_device_emulation_enabled = true;
        c.set_props(p.clone());
        let layout = c.layout();
        assert!(layout.resizable);
        assert_eq!(layout.enable, ResizeEnable::all());
        assert_eq!(layout.size, Size::new(760.0, 560.0));

        // Fixed mode does not bring handles back without emulation
        c.on_resize_stop(SizeDelta::default());
        p.is_device_emulation_enabled = false;
        c.set_props(p);
        let layout = c.layout();
        assert_eq!(layout.enable, ResizeEnable::none());
        assert_eq!(layout.size, Size::new(800.0, 600.0));
        assert!(c.state().fixed_size);
    }

    #[test]
    fn test_forward_passes_through_once() {
        let bus = EventBus::new();
        let (mut c, port) = container(props(800.0, 600.0));
        c.mount(&bus, Instant::now());

        c.forward(ScreencastSignal::Interaction {
            action: "Input.dispatchMouseEvent".to_string(),
            params: json!({"type": "mousePressed", "x": 1, "y": 2}),
        });
        c.forward(ScreencastSignal::InspectHighlightRequested(json!({"position": {"x": 1, "y": 2}})));

        assert_eq!(
            port.events(),
            vec![
                ViewportEvent::Interaction {
                    action: "Input.dispatchMouseEvent".to_string(),
                    params: json!({"type": "mousePressed", "x": 1, "y": 2}),
                },
                ViewportEvent::InspectHighlightRequested {
                    params: json!({"position": {"x": 1, "y": 2}}),
                },
            ]
        );
    }
}
