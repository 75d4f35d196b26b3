//! Fire-and-forget analytics events.

use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

/// A single analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsEvent {
    pub category: String,
    pub action: String,
    pub name: Option<String>,
}

impl AnalyticsEvent {
    pub fn new(category: &str, action: impl Into<String>, name: Option<String>) -> Self {
        Self {
            category: category.to_string(),
            action: action.into(),
            name,
        }
    }
}

/// Receives analytics events. Emitting never fails and returns nothing.
pub trait AnalyticsEmitter: Send + Sync {
    fn emit(&self, event: AnalyticsEvent);
}

/// Emits events as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

impl AnalyticsEmitter for TracingEmitter {
    fn emit(&self, event: AnalyticsEvent) {
        info!(
            target: "analytics",
            category = %event.category,
            action = %event.action,
            name = event.name.as_deref().unwrap_or(""),
            "analytics event"
        );
    }
}

/// Keeps emitted events in memory.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AnalyticsEmitter for RecordingEmitter {
    fn emit(&self, event: AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_emitter_keeps_order() {
        let emitter = RecordingEmitter::new();
        emitter.emit(AnalyticsEvent::new("ItinerarySettings", "A", None));
        emitter.emit(AnalyticsEvent::new("ItinerarySettings", "B", Some("x".into())));

        let events = emitter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, "A");
        assert_eq!(events[1].name.as_deref(), Some("x"));
    }

    #[test]
    fn tracing_emitter_does_not_panic_without_subscriber() {
        TracingEmitter.emit(AnalyticsEvent::new("ItinerarySettings", "A", None));
    }
}
