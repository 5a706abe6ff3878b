//! Session context: participant metadata decoding and the cumulative
//! app-usage record shared between the voice agent and the tool facade.
//!
//! Metadata extraction is a pure best-effort read: any absent, malformed
//! or incomplete input degrades to an empty context and the default
//! session identifier. Nothing here errors past its boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session identifier used when metadata carries none.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Context decoded from an opaque per-participant metadata string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantMetadata {
    /// Free-text context usable directly in a prompt.
    pub user_context: String,
    /// Opaque key correlating the voice session with stored app usage.
    pub session_id: String,
}

impl Default for ParticipantMetadata {
    fn default() -> Self {
        Self {
            user_context: String::new(),
            session_id: DEFAULT_SESSION_ID.to_owned(),
        }
    }
}

/// Wire shape of the metadata blob. Both fields are optional; extra
/// fields are ignored.
#[derive(Debug, Deserialize)]
struct MetadataBlob {
    #[serde(rename = "userContext")]
    user_context: Option<String>,
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

impl ParticipantMetadata {
    /// Decode a raw metadata string.
    ///
    /// Missing input, non-JSON input and JSON without the expected keys
    /// all yield the default (empty context, `"default"` session id).
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        if raw.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<MetadataBlob>(raw) {
            Ok(blob) => Self {
                user_context: blob.user_context.unwrap_or_default(),
                session_id: blob
                    .session_id
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_SESSION_ID.to_owned()),
            },
            Err(e) => {
                debug!("participant metadata did not parse, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// A recorded page visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageVisit {
    /// Page/section name.
    pub page: String,
    /// When the visit happened.
    pub timestamp: Option<DateTime<Utc>>,
}

/// A recorded app activity event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityEvent {
    /// Event kind, e.g. `task_completed`, `voice_session_started`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description.
    pub description: String,
    /// When the event happened.
    pub timestamp: Option<DateTime<Utc>>,
    /// Duration in minutes, when the event represents timed effort.
    pub duration_minutes: Option<u32>,
}

/// Stored user preferences, captured from conversation or settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Topics the user cares about.
    pub interests: Vec<String>,
    /// Causes the user prefers to support.
    pub causes: Vec<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Free-text availability, e.g. "weekends".
    pub available_hours: Option<String>,
}

impl UserPreferences {
    /// Whether nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interests.is_empty()
            && self.causes.is_empty()
            && self.location.is_none()
            && self.available_hours.is_none()
    }
}

/// Cumulative gamification state for one session. Created on first
/// write, process lifetime only; last write wins per session key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    /// Total experience points earned.
    pub total_xp: u64,
    /// Titles of completed tasks.
    pub completed_tasks: Vec<String>,
    /// Titles of tasks currently in progress.
    pub tasks_in_progress: Vec<String>,
    /// Activity event log.
    pub activities: Vec<ActivityEvent>,
    /// Page visit log.
    pub page_visits: Vec<PageVisit>,
    /// Consecutive-day streak counter.
    pub current_streak: u32,
    /// Captured preferences, if any.
    pub user_preferences: UserPreferences,
    /// When this session was first seen.
    pub session_start_time: DateTime<Utc>,
    /// Last write, used by the TTL sweeper.
    pub last_updated: DateTime<Utc>,
}

impl Default for SessionContext {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            total_xp: 0,
            completed_tasks: Vec::new(),
            tasks_in_progress: Vec::new(),
            activities: Vec::new(),
            page_visits: Vec::new(),
            current_streak: 0,
            user_preferences: UserPreferences::default(),
            session_start_time: now,
            last_updated: now,
        }
    }
}

impl SessionContext {
    /// Record a completed task, credit XP and log the event.
    pub fn record_completion(&mut self, title: &str, duration_minutes: u32, xp: u64) {
        self.completed_tasks.push(title.to_owned());
        self.tasks_in_progress.retain(|t| t != title);
        self.total_xp += xp;
        self.activities.push(ActivityEvent {
            kind: "task_completed".to_owned(),
            description: title.to_owned(),
            timestamp: Some(Utc::now()),
            duration_minutes: Some(duration_minutes),
        });
        self.touch();
    }

    /// Record a page visit.
    pub fn record_page_visit(&mut self, page: &str) {
        self.page_visits.push(PageVisit {
            page: page.to_owned(),
            timestamp: Some(Utc::now()),
        });
        self.touch();
    }

    /// Bump the last-write timestamp.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Render a plain-text summary usable as prompt context.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::from("User Session Context:\n\n");

        if !self.user_preferences.is_empty() {
            out.push_str("User Preferences:\n");
            if !self.user_preferences.interests.is_empty() {
                out.push_str(&format!(
                    "- Interests: {}\n",
                    self.user_preferences.interests.join(", ")
                ));
            }
            if let Some(location) = &self.user_preferences.location {
                out.push_str(&format!("- Location: {location}\n"));
            }
            if !self.user_preferences.causes.is_empty() {
                out.push_str(&format!(
                    "- Causes: {}\n",
                    self.user_preferences.causes.join(", ")
                ));
            }
            out.push('\n');
        }

        out.push_str("User Stats:\n");
        out.push_str(&format!("- Total XP: {}\n", self.total_xp));
        out.push_str(&format!("- Completed Tasks: {}\n", self.completed_tasks.len()));
        out.push_str(&format!(
            "- Tasks in Progress: {}\n",
            self.tasks_in_progress.len()
        ));
        out.push_str(&format!("- Current Streak: {}\n\n", self.current_streak));

        let recent_pages: Vec<&PageVisit> =
            self.page_visits.iter().rev().take(10).collect();
        if !recent_pages.is_empty() {
            out.push_str("Recent Pages Visited:\n");
            for visit in recent_pages.iter().rev() {
                out.push_str(&format!("- {}\n", visit.page));
            }
            out.push('\n');
        }

        let recent_activities: Vec<&ActivityEvent> =
            self.activities.iter().rev().take(15).collect();
        if !recent_activities.is_empty() {
            out.push_str("Recent Activities:\n");
            for event in recent_activities.iter().rev() {
                out.push_str(&format!("- [{}] {}\n", event.kind, event.description));
            }
        }

        out
    }
}
