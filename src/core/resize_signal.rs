//! Window-resize signal for one viewport container.
//!
//! The host emits [`WindowResizedEvent`] on the bus whenever the window or
//! frame changes size. Each attached [`ResizeSignal`] owns exactly one scoped
//! subscription that feeds a shared [`Debouncer`]; the container polls the
//! signal from its update loop and recomputes when the burst has settled.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::debounce::{Debouncer, RESIZE_DEBOUNCE_MS};
use super::event_bus::{EventBus, Subscription};
use super::sizing::Size;

/// Host window (or hosting frame) changed size.
#[derive(Clone, Debug)]
pub struct WindowResizedEvent {
    pub size: Size,
    pub at: Instant,
}

#[derive(Debug)]
pub struct ResizeSignal {
    debouncer: Arc<Mutex<Debouncer>>,
    subscription: Option<Subscription>,
}

impl Default for ResizeSignal {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_MS)
    }
}

impl ResizeSignal {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            debouncer: Arc::new(Mutex::new(Debouncer::new(delay_ms))),
            subscription: None,
        }
    }

    /// Register on the bus and arm an initial pass so layout settles even if
    /// no resize ever comes. Returns false if already attached.
    pub fn attach(&mut self, bus: &EventBus, now: Instant) -> bool {
        if self.subscription.is_some() {
            log::debug!("ResizeSignal: already attached");
            return false;
        }

        let debouncer = Arc::clone(&self.debouncer);
        let sub = bus.subscribe_scoped::<WindowResizedEvent, _>(move |ev| {
            debouncer
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .schedule_at(ev.at);
        });
        log::debug!("ResizeSignal: attached ({:?})", sub.id());
        self.subscription = Some(sub);
        self.lock().schedule_at(now);
        true
    }

    /// Release the subscription and drop any pending trigger.
    pub fn detach(&mut self) {
        if let Some(sub) = self.subscription.take() {
            log::debug!("ResizeSignal: detached ({:?})", sub.id());
        }
        self.lock().cancel();
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// True when the debounce window closed at `now`. Always false once detached.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.is_attached() {
            return false;
        }
        self.lock().tick_at(now)
    }

    /// Time until the pending trigger, for scheduling a repaint
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if !self.is_attached() {
            return None;
        }
        self.lock().remaining_at(now)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Debouncer> {
        self.debouncer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn resized(at: Instant) -> WindowResizedEvent {
        WindowResizedEvent { size: Size::new(100.0, 100.0), at }
    }

    #[test]
    fn test_attach_arms_initial_pass() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let mut signal = ResizeSignal::new(50);

        assert!(signal.attach(&bus, t0));
        assert!(!signal.poll(t0 + ms(10)));
        assert!(signal.poll(t0 + ms(50)));
        assert!(!signal.poll(t0 + ms(120)));
    }

    #[test]
    fn test_single_registration() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let mut signal = ResizeSignal::new(50);

        assert!(signal.attach(&bus, t0));
        assert!(!signal.attach(&bus, t0));
        assert_eq!(bus.subscriber_count::<WindowResizedEvent>(), 1);
    }

    #[test]
    fn test_burst_coalesces() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let mut signal = ResizeSignal::new(50);
        signal.attach(&bus, t0);
        assert!(signal.poll(t0 + ms(50)));

        for i in 0..5 {
            bus.emit(resized(t0 + ms(100 + i * 10)));
        }
        // Last notification at +140
        assert!(!signal.poll(t0 + ms(180)));
        assert!(signal.poll(t0 + ms(190)));
        assert!(!signal.poll(t0 + ms(300)));
    }

    #[test]
    fn test_detach_releases_and_silences() {
        let bus = EventBus::new();
        let t0 = Instant::now();
        let mut signal = ResizeSignal::new(50);
        signal.attach(&bus, t0);
        bus.emit(resized(t0 + ms(5)));

        signal.detach();

        assert_eq!(bus.subscriber_count::<WindowResizedEvent>(), 0);
        assert!(!signal.poll(t0 + ms(500)));
        bus.emit(resized(t0 + ms(600)));
        assert!(!signal.poll(t0 + ms(1000)));
        assert_eq!(signal.remaining(t0), None);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let bus = EventBus::new();
        {
            let mut signal = ResizeSignal::default();
            signal.attach(&bus, Instant::now());
            assert_eq!(bus.subscriber_count::<WindowResizedEvent>(), 1);
        }
        assert_eq!(bus.subscriber_count::<WindowResizedEvent>(), 0);
    }
}
