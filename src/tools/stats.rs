//! User stats snapshots.
//!
//! Backed by the shared session store; an unknown user id returns the
//! demo snapshot so the operation stays total.

use crate::context::SessionContext;
use serde::{Deserialize, Serialize};

/// XP span of one level.
const XP_PER_LEVEL: u64 = 100;

/// A stats snapshot for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// The queried user/session id.
    pub user_id: String,
    /// Total experience points.
    pub total_xp: u64,
    /// Current level (1-based).
    pub level: u64,
    /// Completed activity count.
    pub activities_completed: usize,
    /// Hours of recorded effort.
    pub total_hours: f64,
    /// Consecutive-day streak.
    pub current_streak: u32,
    /// Earned badges.
    pub badges: Vec<String>,
    /// XP boundary of the next level.
    pub next_level_xp: u64,
    /// XP remaining until the next level.
    pub xp_to_next_level: u64,
}

/// Compute a snapshot from stored session context.
#[must_use]
pub fn from_context(user_id: &str, context: &SessionContext) -> UserStats {
    let total_xp = context.total_xp;
    let level = total_xp / XP_PER_LEVEL + 1;
    let next_level_xp = level * XP_PER_LEVEL;

    let minutes: u64 = context
        .activities
        .iter()
        .filter_map(|a| a.duration_minutes)
        .map(u64::from)
        .sum();
    let total_hours = (minutes as f64 / 60.0 * 10.0).round() / 10.0;

    UserStats {
        user_id: user_id.to_owned(),
        total_xp,
        level,
        activities_completed: context.completed_tasks.len(),
        total_hours,
        current_streak: context.current_streak,
        badges: badges_for(context),
        next_level_xp,
        xp_to_next_level: next_level_xp - total_xp,
    }
}

/// The static demo snapshot for users with no stored context.
#[must_use]
pub fn demo_snapshot(user_id: &str) -> UserStats {
    UserStats {
        user_id: user_id.to_owned(),
        total_xp: 450,
        level: 5,
        activities_completed: 12,
        total_hours: 18.5,
        current_streak: 5,
        badges: vec![
            "Tree Hugger".to_owned(),
            "Community Champion".to_owned(),
            "First Steps".to_owned(),
        ],
        next_level_xp: 500,
        xp_to_next_level: 50,
    }
}

fn badges_for(context: &SessionContext) -> Vec<String> {
    let mut badges = Vec::new();
    if !context.completed_tasks.is_empty() {
        badges.push("First Steps".to_owned());
    }
    if context.completed_tasks.len() >= 10 {
        badges.push("Community Champion".to_owned());
    }
    if context.current_streak >= 5 {
        badges.push("Streak Keeper".to_owned());
    }
    badges
}
