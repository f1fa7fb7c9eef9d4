//! Handlers the runner builds from `[[handlers]]` entries.

use crate::config::{HandlerKind, HandlerSettings};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tagbus::{Event, EventHandler};
use tracing::info;

/// Counters shared by every demo handler of one run.
#[derive(Debug, Default)]
pub struct RunStats {
    invocations: Mutex<BTreeMap<String, usize>>,
    panics: AtomicUsize,
}

impl RunStats {
    fn record(&self, handler: &str) {
        let mut invocations = self.invocations.lock().unwrap_or_else(PoisonError::into_inner);
        *invocations.entry(handler.to_string()).or_default() += 1;
    }

    /// Invocation count per handler name.
    pub fn invocations(&self) -> BTreeMap<String, usize> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of handler invocations that ended in a panic.
    pub fn panics(&self) -> usize {
        self.panics.load(Ordering::SeqCst)
    }
}

/// Handler behaviour configured by a [`HandlerSettings`] entry.
pub struct DemoHandler {
    name: String,
    kind: HandlerKind,
    delay: Duration,
    message: String,
    stats: Arc<RunStats>,
}

impl DemoHandler {
    pub fn new(settings: &HandlerSettings, stats: Arc<RunStats>) -> Self {
        Self {
            name: settings.name.clone(),
            kind: settings.kind,
            delay: Duration::from_millis(settings.delay_ms),
            message: settings
                .message
                .clone()
                .unwrap_or_else(|| format!("{} failed", settings.name)),
            stats,
        }
    }
}

impl EventHandler for DemoHandler {
    fn handle_event(&self, event: &Event) {
        match self.kind {
            HandlerKind::Record => {}
            HandlerKind::Sleep => std::thread::sleep(self.delay),
            HandlerKind::Panic => {
                self.stats.record(&self.name);
                self.stats.panics.fetch_add(1, Ordering::SeqCst);
                panic!("{}", self.message);
            }
        }

        self.stats.record(&self.name);
        info!("📨 {} handled {}", self.name, event);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(name: &str, kind: HandlerKind) -> HandlerSettings {
        HandlerSettings {
            name: name.to_string(),
            kind,
            delay_ms: 5,
            message: None,
        }
    }

    #[test]
    fn test_record_and_sleep_count_invocations() {
        let stats = Arc::new(RunStats::default());
        let record = DemoHandler::new(&settings("a", HandlerKind::Record), stats.clone());
        let sleep = DemoHandler::new(&settings("b", HandlerKind::Sleep), stats.clone());
        let event = Event::new("foo", None);

        record.handle_event(&event);
        record.handle_event(&event);
        sleep.handle_event(&event);

        let invocations = stats.invocations();
        assert_eq!(invocations["a"], 2);
        assert_eq!(invocations["b"], 1);
        assert_eq!(stats.panics(), 0);
    }

    #[test]
    fn test_panic_handler_counts_then_panics() {
        let stats = Arc::new(RunStats::default());
        let faulty = DemoHandler::new(&settings("f", HandlerKind::Panic), stats.clone());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            faulty.handle_event(&Event::new("foo", None))
        }));

        let payload = result.unwrap_err();
        assert_eq!(tagbus::panic_message(payload.as_ref()), "f failed");
        assert_eq!(stats.panics(), 1);
        assert_eq!(stats.invocations()["f"], 1);
        assert_eq!(faulty.name(), "f");
    }
}
