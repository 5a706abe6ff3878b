//! Tool facade: named operations the client app (or an MCP-style
//! caller) invokes over HTTP.
//!
//! Every tool call is total: bad arguments and downstream failures come
//! back as a structured `success: false` result, never a transport
//! error. Results carry a human-readable `message` plus tool-specific
//! fields flattened alongside it.

pub mod activities;
pub mod notify;
pub mod stats;
pub mod tasks;

use crate::context::DEFAULT_SESSION_ID;
use crate::reasoning::ReasoningClient;
use crate::session::SessionStore;
use notify::Notifier;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Default card count for productivity task requests.
const DEFAULT_MAX_TASKS: usize = 7;

/// Uniform result envelope for every tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the call did what was asked.
    pub success: bool,
    /// Human-readable outcome line.
    pub message: String,
    /// Tool-specific payload, flattened into the envelope.
    #[serde(flatten)]
    pub data: Value,
}

impl ToolResult {
    /// Successful result with a payload.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Failed result. Failures are data, not errors.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Value::Object(serde_json::Map::new()),
        }
    }
}

/// The tool facade: dispatches named calls against shared state.
///
/// The reasoning client and notifier are optional; tools that need them
/// degrade (static fallbacks, skipped notifications) when absent.
#[derive(Clone)]
pub struct ToolFacade {
    store: SessionStore,
    reasoning: Option<ReasoningClient>,
    notifier: Option<Notifier>,
}

impl ToolFacade {
    /// Build a facade over a session store.
    #[must_use]
    pub fn new(
        store: SessionStore,
        reasoning: Option<ReasoningClient>,
        notifier: Option<Notifier>,
    ) -> Self {
        Self {
            store,
            reasoning,
            notifier,
        }
    }

    /// Access the underlying session store.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Dispatch one tool call by name.
    ///
    /// Unknown names and malformed arguments yield a failed
    /// [`ToolResult`], never an `Err`.
    pub async fn call(&self, name: &str, args: &Value) -> ToolResult {
        info!("tool call: {name}");
        match name {
            "suggest_activities" => self.suggest_activities(args),
            "record_completion" => self.record_completion(args).await,
            "get_stats" => self.get_stats(args).await,
            "get_productivity_tasks" => self.get_productivity_tasks(args).await,
            "get_self_improvement_tasks" => self.get_self_improvement_tasks(args).await,
            "add_task" => self.add_task(args).await,
            "schedule_reminder" => self.schedule_reminder(args).await,
            "send_notification" => self.send_notification(args).await,
            "server_info" => Self::server_info(),
            other => ToolResult::err(format!("unknown tool: {other}")),
        }
    }

    fn suggest_activities(&self, args: &Value) -> ToolResult {
        let interests = str_arg(args, "interests").unwrap_or("general");
        let time_available = u64_arg(args, "time_available").unwrap_or(60);
        let location = str_arg(args, "location").unwrap_or("your area");

        let time = u32::try_from(time_available).unwrap_or(u32::MAX);
        let suggestions = activities::suggest(interests, time, location);
        let count = suggestions.suggested_activities.len();

        match serde_json::to_value(&suggestions) {
            Ok(data) => ToolResult::ok(
                format!("Found {count} activities matching your interests"),
                data,
            ),
            Err(e) => ToolResult::err(format!("suggestion encoding failed: {e}")),
        }
    }

    async fn record_completion(&self, args: &Value) -> ToolResult {
        let Some(activity_name) = str_arg(args, "activity_name") else {
            return ToolResult::err("activity_name is required");
        };
        let duration = u64_arg(args, "duration_minutes").unwrap_or(0);
        let duration = u32::try_from(duration).unwrap_or(u32::MAX);
        let photo_verified = bool_arg(args, "photo_verified", false);
        let notes = str_arg(args, "notes");
        let user_id = str_arg(args, "user_id").unwrap_or(DEFAULT_SESSION_ID);

        let breakdown = activities::completion_xp(duration, photo_verified);
        let title = activity_name.to_owned();
        let xp = breakdown.total_xp;
        self.store
            .update(user_id, move |ctx| ctx.record_completion(&title, duration, xp))
            .await;

        ToolResult::ok(
            format!("Awesome! You earned {xp} XP for completing {activity_name}!"),
            json!({
                "activity": activity_name,
                "base_xp": breakdown.base_xp,
                "verification_bonus": breakdown.verification_bonus,
                "total_xp": breakdown.total_xp,
                "photo_verified": photo_verified,
                "notes": notes,
            }),
        )
    }

    async fn get_stats(&self, args: &Value) -> ToolResult {
        let user_id = str_arg(args, "user_id").unwrap_or(DEFAULT_SESSION_ID);

        let snapshot = match self.store.get(user_id).await {
            Some(context) => stats::from_context(user_id, &context),
            None => stats::demo_snapshot(user_id),
        };

        match serde_json::to_value(&snapshot) {
            Ok(data) => ToolResult::ok(
                format!("Level {} with {} XP", snapshot.level, snapshot.total_xp),
                data,
            ),
            Err(e) => ToolResult::err(format!("stats encoding failed: {e}")),
        }
    }

    async fn get_productivity_tasks(&self, args: &Value) -> ToolResult {
        let session_id = session_id_arg(args);
        let max_tasks = u64_arg(args, "max_tasks")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_MAX_TASKS);
        let use_ai = bool_arg(args, "use_ai", true);
        let filter = tasks::ProductivityFilter {
            include_work: bool_arg(args, "include_work", true),
            include_personal: bool_arg(args, "include_personal", true),
        };

        let context = self.store.get(session_id).await;
        let reasoning = if use_ai { self.reasoning.as_ref() } else { None };
        let result =
            tasks::productivity_tasks(reasoning, context.as_ref(), filter, max_tasks).await;

        let count = result.tasks.len();
        match serde_json::to_value(&result) {
            Ok(data) => ToolResult::ok(format!("{count} productivity tasks ready"), data),
            Err(e) => ToolResult::err(format!("task encoding failed: {e}")),
        }
    }

    async fn get_self_improvement_tasks(&self, args: &Value) -> ToolResult {
        let session_id = session_id_arg(args);
        let use_ai = bool_arg(args, "use_ai", true);
        let include_daily = bool_arg(args, "include_daily_tasks", true);
        let include_weekly = bool_arg(args, "include_weekly_goals", true);

        let context = self.store.get(session_id).await;
        let reasoning = if use_ai { self.reasoning.as_ref() } else { None };
        let result = tasks::self_improvement_tasks(
            reasoning,
            context.as_ref(),
            include_daily,
            include_weekly,
        )
        .await;

        match serde_json::to_value(&result) {
            Ok(data) => ToolResult::ok("Self-improvement plan ready", data),
            Err(e) => ToolResult::err(format!("task encoding failed: {e}")),
        }
    }

    async fn add_task(&self, args: &Value) -> ToolResult {
        let Some(title) = str_arg(args, "title") else {
            return ToolResult::err("title is required");
        };
        let xp = u64_arg(args, "xp")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(50);
        let category = str_arg(args, "category").unwrap_or("Personal");
        let user_id = str_arg(args, "user_id").unwrap_or(DEFAULT_SESSION_ID);
        let notify = bool_arg(args, "notify", false);

        let task = tasks::new_task(title, xp, category);
        let task_title = task.title.clone();
        self.store
            .update(user_id, move |ctx| ctx.tasks_in_progress.push(task_title))
            .await;

        if notify {
            if let Some(notifier) = &self.notifier {
                let message = format!("New task added: {title} ({xp} XP)");
                if let Err(e) = notifier.send(&message).await {
                    warn!("add_task notification failed: {e}");
                }
            }
        }

        match serde_json::to_value(&task) {
            Ok(data) => ToolResult::ok(format!("Added task: {title}"), json!({ "task": data })),
            Err(e) => ToolResult::err(format!("task encoding failed: {e}")),
        }
    }

    async fn schedule_reminder(&self, args: &Value) -> ToolResult {
        let Some(activity_name) = str_arg(args, "activity_name") else {
            return ToolResult::err("activity_name is required");
        };
        let Some(scheduled_time) = str_arg(args, "scheduled_time") else {
            return ToolResult::err("scheduled_time is required");
        };
        let notify = bool_arg(args, "notify", true);

        // The reminder itself always gets created; the notification is
        // best-effort and its outcome rides along in the result.
        let message = tasks::reminder_message(activity_name, scheduled_time);
        let mut notification_sent = false;
        if notify {
            match &self.notifier {
                Some(notifier) => match notifier.send(&message).await {
                    Ok(()) => notification_sent = true,
                    Err(e) => warn!("reminder notification failed: {e}"),
                },
                None => warn!("reminder notification skipped, notifications not configured"),
            }
        }

        ToolResult::ok(
            format!("Reminder set for '{activity_name}' at {scheduled_time}"),
            json!({
                "reminder_created": true,
                "activity_name": activity_name,
                "scheduled_time": scheduled_time,
                "notification_sent": notification_sent,
            }),
        )
    }

    async fn send_notification(&self, args: &Value) -> ToolResult {
        let Some(message) = str_arg(args, "message") else {
            return ToolResult::err("message is required");
        };

        match &self.notifier {
            Some(notifier) => match notifier.send(message).await {
                Ok(()) => ToolResult::ok("Notification sent", json!({ "delivered": true })),
                Err(e) => {
                    warn!("notification delivery failed: {e}");
                    ToolResult::err(format!("notification delivery failed: {e}"))
                }
            },
            None => ToolResult::err("notifications are not configured"),
        }
    }

    fn server_info() -> ToolResult {
        ToolResult::ok(
            "DoGood tool server",
            json!({
                "name": "dogood-tools",
                "version": env!("CARGO_PKG_VERSION"),
                "tools": [
                    "suggest_activities",
                    "record_completion",
                    "get_stats",
                    "get_productivity_tasks",
                    "get_self_improvement_tasks",
                    "add_task",
                    "schedule_reminder",
                    "send_notification",
                    "server_info",
                ],
            }),
        )
    }
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Session key for the task tools. The client sends `session_id`;
/// `user_id` is accepted as an alias.
fn session_id_arg(args: &Value) -> &str {
    str_arg(args, "session_id")
        .or_else(|| str_arg(args, "user_id"))
        .unwrap_or(DEFAULT_SESSION_ID)
}

fn u64_arg(args: &Value, key: &str) -> Option<u64> {
    args.get(key).and_then(Value::as_u64)
}

fn bool_arg(args: &Value, key: &str, default: bool) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(default)
}
