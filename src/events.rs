use crate::media::MediaKind;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Severity of a user-facing notification, mirroring the toast variants
/// the front-end renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Destructive,
}

/// Events that can occur in the application core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DefakexEvent {
    /// A transient user-facing notification was raised
    Notification {
        severity: Severity,
        title: String,
        description: String,
    },
    /// An analysis request was handed to the provider
    AnalysisStarted { request: u64, kind: MediaKind },
    /// An analysis request resolved with a verdict
    AnalysisCompleted { request: u64, is_real: bool },
    /// The camera stream went live or was released
    CameraStatusChanged { live: bool },
    /// The application theme was switched
    ThemeChanged { theme: Theme },
}

impl DefakexEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            DefakexEvent::Notification {
                title, description, ..
            } => {
                format!("{}: {}", title, description)
            }
            DefakexEvent::AnalysisStarted { request, kind } => {
                format!("Analysis {} started for {}", request, kind)
            }
            DefakexEvent::AnalysisCompleted { request, is_real } => {
                format!(
                    "Analysis {} completed: {}",
                    request,
                    if *is_real { "authentic" } else { "manipulated" }
                )
            }
            DefakexEvent::CameraStatusChanged { live } => {
                format!("Camera {}", if *live { "live" } else { "stopped" })
            }
            DefakexEvent::ThemeChanged { theme } => {
                format!("Theme changed to {}", theme.name())
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            DefakexEvent::Notification { .. } => "notification",
            DefakexEvent::AnalysisStarted { .. } => "analysis_started",
            DefakexEvent::AnalysisCompleted { .. } => "analysis_completed",
            DefakexEvent::CameraStatusChanged { .. } => "camera_status_changed",
            DefakexEvent::ThemeChanged { .. } => "theme_changed",
        }
    }
}

/// Broadcast event bus connecting widgets, the analysis client, and
/// whatever front-end is listening
pub struct EventBus {
    sender: broadcast::Sender<DefakexEvent>,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<DefakexEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers. Returns the number of
    /// receivers that saw it; publishing with no subscribers is not an
    /// error.
    pub fn publish(&self, event: DefakexEvent) -> usize {
        match &event {
            DefakexEvent::Notification {
                severity: Severity::Destructive,
                title,
                description,
            } => {
                warn!("{}: {}", title, description);
            }
            DefakexEvent::Notification {
                title, description, ..
            } => {
                info!("{}: {}", title, description);
            }
            other => {
                debug!("Event: {}", other.description());
            }
        }

        self.sender.send(event).unwrap_or(0)
    }

    /// Raise an informational notification
    pub fn notify_info(&self, title: &str, description: &str) {
        self.publish(DefakexEvent::Notification {
            severity: Severity::Info,
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    /// Raise an error notification
    pub fn notify_error(&self, title: &str, description: &str) {
        self.publish(DefakexEvent::Notification {
            severity: Severity::Destructive,
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Check if there are any active subscribers
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Event filter for selective event handling
#[derive(Debug, Clone)]
pub enum EventFilter {
    /// Accept all events
    All,
    /// Accept only specific event types
    EventTypes(Vec<&'static str>),
}

impl EventFilter {
    /// Check if an event passes this filter
    pub fn matches(&self, event: &DefakexEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::EventTypes(types) => types.contains(&event.event_type()),
        }
    }
}

/// Event receiver that only yields events passing its filter
pub struct EventReceiver {
    receiver: broadcast::Receiver<DefakexEvent>,
    filter: EventFilter,
}

impl EventReceiver {
    pub fn new(receiver: broadcast::Receiver<DefakexEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next filtered event. Returns `None` once the bus is
    /// closed; lagged receivers skip ahead with a warning.
    pub async fn recv(&mut self) -> Option<DefakexEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.filter.matches(&event) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Event receiver lagged behind by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed");
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_publish_and_receive_notification() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe();

        bus.notify_error("Analysis Failed", "Error connecting to ML model");

        let event = receiver.recv().await.unwrap();
        match event {
            DefakexEvent::Notification {
                severity,
                title,
                description,
            } => {
                assert_eq!(severity, Severity::Destructive);
                assert_eq!(title, "Analysis Failed");
                assert!(description.contains("ML model"));
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new(10);
        assert_eq!(
            bus.publish(DefakexEvent::CameraStatusChanged { live: true }),
            0
        );
        assert!(!bus.has_subscribers());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(10);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(bus.publish(DefakexEvent::CameraStatusChanged { live: true }), 2);

        for receiver in [&mut first, &mut second] {
            let event = timeout(Duration::from_millis(100), receiver.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(event.event_type(), "camera_status_changed");
        }
    }

    #[tokio::test]
    async fn test_filtered_receiver() {
        let bus = EventBus::new(10);
        let mut filtered = EventReceiver::new(
            bus.subscribe(),
            EventFilter::EventTypes(vec!["notification"]),
        );

        bus.publish(DefakexEvent::CameraStatusChanged { live: true });
        bus.notify_info("Camera Started", "Your camera is now active");

        let event = timeout(Duration::from_millis(100), filtered.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.event_type(), "notification");
    }

    #[test]
    fn test_event_filter_matches() {
        let filter = EventFilter::EventTypes(vec!["theme_changed"]);
        assert!(filter.matches(&DefakexEvent::ThemeChanged {
            theme: crate::theme::Theme::Dark
        }));
        assert!(!filter.matches(&DefakexEvent::CameraStatusChanged { live: false }));
        assert!(EventFilter::All.matches(&DefakexEvent::CameraStatusChanged { live: false }));
    }
}
