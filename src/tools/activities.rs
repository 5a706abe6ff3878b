//! Community-service activity suggestions and completion rewards.
//!
//! The activity table is static presentation data; the only logic is
//! the time filter and the deterministic XP formula.

use serde::{Deserialize, Serialize};

/// Time threshold above which every activity qualifies regardless of
/// its own duration.
const LONG_SESSION_MINUTES: u32 = 60;

/// Maximum suggestions returned per call.
const MAX_SUGGESTIONS: usize = 3;

/// XP awarded on top of the duration-based reward when a photo
/// verified the completion.
pub const VERIFICATION_BONUS: u64 = 20;

/// A suggestible community-service activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Display name.
    pub name: String,
    /// Expected duration in minutes.
    pub duration: u32,
    /// XP reward for completion.
    pub xp: u32,
    /// One-line description.
    pub description: String,
}

fn activity(name: &str, duration: u32, xp: u32, description: &str) -> Activity {
    Activity {
        name: name.to_owned(),
        duration,
        xp,
        description: description.to_owned(),
    }
}

/// The static category table. Unrecognized interests fall back to
/// `general`.
#[must_use]
pub fn activities_for(interests: &str) -> (String, Vec<Activity>) {
    let category = interests.to_lowercase();
    let activities = match category.as_str() {
        "environment" => vec![
            activity("Beach Cleanup", 60, 50, "Help clean local beaches"),
            activity("Tree Planting", 120, 100, "Plant trees in your community"),
            activity("Recycling Drive", 30, 30, "Organize a recycling collection"),
        ],
        "education" => vec![
            activity("Tutor Students", 60, 75, "Help students with homework"),
            activity("Read to Kids", 30, 40, "Read stories at local library"),
            activity("Teach Tech Skills", 90, 80, "Teach basic computer skills"),
        ],
        "community" => vec![
            activity("Food Bank Volunteer", 120, 90, "Help sort and distribute food"),
            activity("Senior Center Visit", 60, 60, "Spend time with seniors"),
            activity("Community Garden", 90, 70, "Help maintain community garden"),
        ],
        _ => {
            return (
                "general".to_owned(),
                vec![
                    activity("Litter Pickup Walk", 30, 35, "Pick up litter in your neighborhood"),
                    activity("Charity Event Helper", 180, 120, "Assist at charity events"),
                    activity("Animal Shelter Support", 60, 65, "Help care for shelter animals"),
                ],
            );
        }
    };
    (category, activities)
}

/// Filtered suggestion set for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestions {
    /// Resolved category (post-fallback).
    pub category: String,
    /// Echo of the requested location.
    pub location: String,
    /// Echo of the requested time budget in minutes.
    pub time_available: u32,
    /// Up to three matching activities.
    pub suggested_activities: Vec<Activity>,
    /// Total matches before truncation.
    pub total_suggestions: usize,
}

/// Suggest activities for the given interests and time budget.
///
/// An activity qualifies if it fits in the available time, or the
/// budget is at least an hour (long sessions can be split).
#[must_use]
pub fn suggest(interests: &str, time_available: u32, location: &str) -> Suggestions {
    let (category, all) = activities_for(interests);
    let matching: Vec<Activity> = all
        .into_iter()
        .filter(|a| a.duration <= time_available || time_available >= LONG_SESSION_MINUTES)
        .collect();
    let total_suggestions = matching.len();

    Suggestions {
        category,
        location: location.to_owned(),
        time_available,
        suggested_activities: matching.into_iter().take(MAX_SUGGESTIONS).collect(),
        total_suggestions,
    }
}

/// XP breakdown for a completed activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBreakdown {
    /// 1 XP per 2 minutes.
    pub base_xp: u64,
    /// Fixed bonus when photo-verified.
    pub verification_bonus: u64,
    /// Sum of the above.
    pub total_xp: u64,
}

/// Deterministic completion reward.
#[must_use]
pub fn completion_xp(duration_minutes: u32, photo_verified: bool) -> XpBreakdown {
    let base_xp = u64::from(duration_minutes) / 2;
    let verification_bonus = if photo_verified { VERIFICATION_BONUS } else { 0 };
    XpBreakdown {
        base_xp,
        verification_bonus,
        total_xp: base_xp + verification_bonus,
    }
}
