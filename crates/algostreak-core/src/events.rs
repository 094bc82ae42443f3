use serde::{Deserialize, Serialize};

/// Side-channel signal produced by a streak transition.
/// Hosts forward these to whatever surface shows banners or toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreakEvent {
    /// The new streak is an exact multiple of the milestone interval.
    MilestoneReached { streak: u32 },
    /// A streak longer than one day was broken.
    StreakReset { previous: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Destructive,
}

/// User-facing rendering of a [`StreakEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl StreakEvent {
    pub fn notification(&self) -> Notification {
        match self {
            StreakEvent::MilestoneReached { streak } => Notification {
                title: "Streak Milestone!".into(),
                body: format!("You've reached a {streak} day streak! Keep it up!"),
                severity: Severity::Info,
            },
            StreakEvent::StreakReset { .. } => Notification {
                title: "Streak Reset".into(),
                body: "Your streak has been reset. Keep practicing daily to build it back up!"
                    .into(),
                severity: Severity::Destructive,
            },
        }
    }
}

/// Sink for streak events.
pub trait Notifier: Send + Sync {
    fn notify(&self, user_id: &str, event: &StreakEvent);
}

/// Notifier that writes every event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, user_id: &str, event: &StreakEvent) {
        let note = event.notification();
        match note.severity {
            Severity::Info => tracing::info!(user_id, title = %note.title, "{}", note.body),
            Severity::Destructive => tracing::warn!(user_id, title = %note.title, "{}", note.body),
        }
    }
}
