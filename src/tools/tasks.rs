//! Task card generation for the productivity and self-improvement
//! sections.
//!
//! Two paths produce cards: a static default set, and an AI path that
//! asks the reasoning service for personalized cards and falls back to
//! the defaults on any failure. AI generation never errors outward.

use crate::context::SessionContext;
use crate::extract::extract_and_parse;
use crate::reasoning::{self, ReasoningClient};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

const COLOR_WORK: &str = "#3B3766";
const COLOR_PERSONAL: &str = "#4A5A3C";
const COLOR_FITNESS: &str = "#9D5C45";
const COLOR_MINDFULNESS: &str = "#4A3B35";
const COLOR_SOCIAL: &str = "#3B3766";
const COLOR_LEARNING: &str = "#4A5A3C";

/// A renderable task card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCard {
    /// Stable card id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Free-text recency, e.g. `"3 days ago"`.
    #[serde(rename = "lastDone")]
    pub last_done: String,
    /// XP reward.
    pub xp: u32,
    /// Display category.
    pub category: String,
    /// Hex display color.
    pub color: String,
}

fn card(id: &str, title: &str, last_done: &str, xp: u32, category: &str, color: &str) -> TaskCard {
    TaskCard {
        id: id.to_owned(),
        title: title.to_owned(),
        last_done: last_done.to_owned(),
        xp,
        category: category.to_owned(),
        color: color.to_owned(),
    }
}

/// The static productivity defaults, most-neglected first.
#[must_use]
pub fn default_productivity_tasks() -> Vec<TaskCard> {
    let mut tasks = vec![
        card("w1", "Review Q4 Budget Report", "12 days ago", 80, "Work", COLOR_WORK),
        card("w2", "Team 1-on-1 Meetings", "8 days ago", 100, "Work", COLOR_WORK),
        card("w3", "Clear Email Backlog", "5 days ago", 60, "Work", COLOR_WORK),
        card("w4", "Update Project Roadmap", "3 days ago", 90, "Work", COLOR_WORK),
        card("p1", "Meal Prep for the Week", "10 days ago", 70, "Personal", COLOR_PERSONAL),
        card("p2", "Organize Digital Files", "6 days ago", 50, "Personal", COLOR_PERSONAL),
        card("p3", "Plan Weekend Errands", "2 days ago", 40, "Personal", COLOR_PERSONAL),
    ];
    sort_by_neglect(&mut tasks);
    tasks
}

/// The static self-improvement defaults.
#[must_use]
pub fn default_self_improvement() -> SelfImprovementPlan {
    SelfImprovementPlan {
        daily_tasks: vec![
            card("d1", "Morning Stretch Routine", "1 days ago", 30, "Fitness", COLOR_FITNESS),
            card("d2", "Read 20 Pages", "2 days ago", 40, "Learning", COLOR_LEARNING),
            card("d3", "Practice Meditation", "3 days ago", 35, "Mindfulness", COLOR_MINDFULNESS),
            card("d4", "Connect with a Friend", "4 days ago", 30, "Social", COLOR_SOCIAL),
        ],
        weekly_goals: vec![
            card("g1", "Complete 3 Workouts", "5 days ago", 120, "Fitness", COLOR_FITNESS),
            card("g2", "Finish a Book Chapter", "7 days ago", 100, "Learning", COLOR_LEARNING),
            card("g3", "Journal 3 Evenings", "6 days ago", 90, "Mindfulness", COLOR_MINDFULNESS),
        ],
    }
}

/// Daily tasks plus weekly goals for the self-improvement section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfImprovementPlan {
    /// Daily habit cards.
    pub daily_tasks: Vec<TaskCard>,
    /// Weekly goal cards.
    pub weekly_goals: Vec<TaskCard>,
}

/// Parse the leading integer of a `"N days ago"` string. Anything
/// unparseable sorts as never done.
fn days_ago(last_done: &str) -> i64 {
    let digits: String = last_done
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(i64::MAX)
}

/// Sort cards most-neglected first (descending days since last done).
pub fn sort_by_neglect(tasks: &mut [TaskCard]) {
    tasks.sort_by(|a, b| days_ago(&b.last_done).cmp(&days_ago(&a.last_done)));
}

/// Result of a productivity-task request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityTasks {
    /// Cards, most-neglected first.
    pub tasks: Vec<TaskCard>,
    /// Whether the reasoning service produced these cards.
    pub ai_generated: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedTasks {
    #[serde(default)]
    tasks: Vec<TaskCard>,
}

/// Category selection for productivity requests.
#[derive(Debug, Clone, Copy)]
pub struct ProductivityFilter {
    /// Keep `Work` cards.
    pub include_work: bool,
    /// Keep `Personal` cards.
    pub include_personal: bool,
}

impl Default for ProductivityFilter {
    fn default() -> Self {
        Self {
            include_work: true,
            include_personal: true,
        }
    }
}

impl ProductivityFilter {
    fn keeps(self, card: &TaskCard) -> bool {
        match card.category.to_lowercase().as_str() {
            "work" => self.include_work,
            "personal" => self.include_personal,
            _ => true,
        }
    }
}

/// Produce up to `max_tasks` productivity cards.
///
/// When `reasoning` is available and session context exists, ask the
/// reasoning service for personalized cards; on any failure (transport,
/// no JSON, empty list) fall back to the defaults silently. The filter
/// applies before truncation on both paths.
pub async fn productivity_tasks(
    reasoning: Option<&ReasoningClient>,
    context: Option<&SessionContext>,
    filter: ProductivityFilter,
    max_tasks: usize,
) -> ProductivityTasks {
    if let (Some(client), Some(context)) = (reasoning, context) {
        let prompt = reasoning::productivity_tasks_prompt(&context.summary(), max_tasks);
        match client.complete(&prompt).await {
            Ok(raw) => {
                if let Some(generated) = extract_and_parse::<GeneratedTasks>(&raw) {
                    let mut tasks = generated.tasks;
                    tasks.retain(|t| filter.keeps(t));
                    if !tasks.is_empty() {
                        sort_by_neglect(&mut tasks);
                        tasks.truncate(max_tasks);
                        return ProductivityTasks {
                            tasks,
                            ai_generated: true,
                        };
                    }
                }
                warn!("task generation returned no usable cards, using defaults");
            }
            Err(e) => warn!("task generation failed, using defaults: {e}"),
        }
    }

    let mut tasks = default_productivity_tasks();
    tasks.retain(|t| filter.keeps(t));
    tasks.truncate(max_tasks);
    ProductivityTasks {
        tasks,
        ai_generated: false,
    }
}

/// Result of a self-improvement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfImprovementTasks {
    /// Daily habit cards.
    pub daily_tasks: Vec<TaskCard>,
    /// Weekly goal cards.
    pub weekly_goals: Vec<TaskCard>,
    /// Whether the reasoning service produced these cards.
    pub ai_generated: bool,
}

/// Produce self-improvement daily tasks and weekly goals, with the same
/// AI-then-fallback shape as [`productivity_tasks`]. The include flags
/// clear the corresponding list on either path.
pub async fn self_improvement_tasks(
    reasoning: Option<&ReasoningClient>,
    context: Option<&SessionContext>,
    include_daily_tasks: bool,
    include_weekly_goals: bool,
) -> SelfImprovementTasks {
    let mut result = if let Some(plan) = generated_plan(reasoning, context).await {
        SelfImprovementTasks {
            daily_tasks: plan.daily_tasks,
            weekly_goals: plan.weekly_goals,
            ai_generated: true,
        }
    } else {
        let plan = default_self_improvement();
        SelfImprovementTasks {
            daily_tasks: plan.daily_tasks,
            weekly_goals: plan.weekly_goals,
            ai_generated: false,
        }
    };

    if !include_daily_tasks {
        result.daily_tasks.clear();
    }
    if !include_weekly_goals {
        result.weekly_goals.clear();
    }
    result
}

async fn generated_plan(
    reasoning: Option<&ReasoningClient>,
    context: Option<&SessionContext>,
) -> Option<SelfImprovementPlan> {
    let (client, context) = (reasoning?, context?);
    let prompt = reasoning::self_improvement_prompt(&context.summary());
    match client.complete(&prompt).await {
        Ok(raw) => {
            if let Some(plan) = extract_and_parse::<SelfImprovementPlan>(&raw) {
                if !plan.daily_tasks.is_empty() || !plan.weekly_goals.is_empty() {
                    return Some(plan);
                }
            }
            warn!("self-improvement generation returned no cards, using defaults");
            None
        }
        Err(e) => {
            warn!("self-improvement generation failed, using defaults: {e}");
            None
        }
    }
}

/// Build a freshly-added task card with a generated id.
#[must_use]
pub fn new_task(title: &str, xp: u32, category: &str) -> TaskCard {
    let color = match category.to_lowercase().as_str() {
        "work" => COLOR_WORK,
        "fitness" => COLOR_FITNESS,
        "mindfulness" => COLOR_MINDFULNESS,
        "social" => COLOR_SOCIAL,
        "learning" => COLOR_LEARNING,
        _ => COLOR_PERSONAL,
    };
    TaskCard {
        id: Uuid::new_v4().to_string(),
        title: title.to_owned(),
        last_done: "0 days ago".to_owned(),
        xp,
        category: category.to_owned(),
        color: color.to_owned(),
    }
}

/// Reminder message sent through the notification webhook.
#[must_use]
pub fn reminder_message(activity_name: &str, scheduled_time: &str) -> String {
    format!(
        "Reminder: You have '{activity_name}' scheduled for {scheduled_time}. Don't forget to DoGood!"
    )
}
