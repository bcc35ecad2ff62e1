//! User Context Aggregator: reduces a user's profile, preferences and recent
//! per-aspect activity into a `UserContextSummary` for one request.
//!
//! A missing profile or preferences row aborts with `UserNotFound` before any
//! external call is made.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::aspect::{normalize_priorities, AspectId};
use crate::models::user::{FriendRow, ProviderKind, ToneStyle, TransactionRow, WorkoutRow};
use crate::repository::Repositories;

pub const WORKOUT_HISTORY_LIMIT: i64 = 10;
pub const TRANSACTION_HISTORY_LIMIT: i64 = 20;
/// Friends not contacted for longer than this need a nudge.
pub const CONTACT_GAP_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivitySnapshot {
    Training {
        recent_workouts: usize,
        days_since_last_workout: Option<i64>,
        last_workout_type: Option<String>,
        total_minutes: i64,
    },
    Finance {
        recent_transactions: usize,
        total_spent: f64,
        total_income: f64,
        top_spending_category: Option<String>,
    },
    Friends {
        total_friends: usize,
        friends_needing_contact: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct UserContextSummary {
    pub user_id: Uuid,
    pub display_name: String,
    pub tone_style: ToneStyle,
    pub aspect_priorities: Vec<AspectId>,
    pub llm_provider: ProviderKind,
    pub per_aspect_activity: BTreeMap<AspectId, ActivitySnapshot>,
}

pub async fn aggregate_user_context(
    repos: &Repositories,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<UserContextSummary, AppError> {
    let profile = repos
        .profiles
        .profile(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound(format!("No profile for user {user_id}")))?;
    let preferences = repos
        .profiles
        .preferences(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound(format!("No preferences for user {user_id}")))?;

    let tone_style = preferences.tone_style.parse().unwrap_or_else(|e| {
        warn!("User {user_id}: {e}; defaulting to friendly");
        ToneStyle::Friendly
    });
    let llm_provider = preferences.llm_provider.parse().unwrap_or_else(|e| {
        warn!("User {user_id}: {e}; defaulting to anthropic");
        ProviderKind::Anthropic
    });

    let workouts = repos
        .training
        .recent_workouts(user_id, WORKOUT_HISTORY_LIMIT)
        .await?;
    let transactions = repos
        .finance
        .recent_transactions(user_id, TRANSACTION_HISTORY_LIMIT)
        .await?;
    let friends = repos.friends.friends(user_id).await?;

    let mut per_aspect_activity = BTreeMap::new();
    per_aspect_activity.insert(AspectId::Training, summarize_training(&workouts, now));
    per_aspect_activity.insert(AspectId::Finance, summarize_finance(&transactions));
    per_aspect_activity.insert(AspectId::Friends, summarize_friends(&friends, now));

    Ok(UserContextSummary {
        user_id,
        display_name: profile.display_name,
        tone_style,
        aspect_priorities: normalize_priorities(&preferences.aspect_priorities),
        llm_provider,
        per_aspect_activity,
    })
}

/// `workouts` must be newest first.
pub fn summarize_training(workouts: &[WorkoutRow], now: DateTime<Utc>) -> ActivitySnapshot {
    let latest = workouts.first();
    ActivitySnapshot::Training {
        recent_workouts: workouts.len(),
        days_since_last_workout: latest.map(|w| (now - w.performed_at).num_days().max(0)),
        last_workout_type: latest.map(|w| w.workout_type.clone()),
        total_minutes: workouts.iter().map(|w| w.duration_minutes as i64).sum(),
    }
}

pub fn summarize_finance(transactions: &[TransactionRow]) -> ActivitySnapshot {
    let mut spent_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total_spent = 0.0;
    let mut total_income = 0.0;

    for t in transactions {
        if t.amount < 0.0 {
            total_spent += -t.amount;
            *spent_by_category.entry(t.category.as_str()).or_default() += -t.amount;
        } else {
            total_income += t.amount;
        }
    }

    // Strictly-greater keeps the alphabetically first category on ties.
    let top_spending_category = spent_by_category
        .into_iter()
        .fold(None::<(&str, f64)>, |best, (category, amount)| match best {
            Some((_, best_amount)) if best_amount >= amount => best,
            _ => Some((category, amount)),
        })
        .map(|(category, _)| category.to_string());

    ActivitySnapshot::Finance {
        recent_transactions: transactions.len(),
        total_spent: round_cents(total_spent),
        total_income: round_cents(total_income),
        top_spending_category,
    }
}

pub fn summarize_friends(friends: &[FriendRow], now: DateTime<Utc>) -> ActivitySnapshot {
    let friends_needing_contact = friends
        .iter()
        .filter(|f| match f.last_contact_at {
            Some(at) => (now - at).num_days() > CONTACT_GAP_DAYS,
            None => true,
        })
        .map(|f| f.name.clone())
        .collect();

    ActivitySnapshot::Friends {
        total_friends: friends.len(),
        friends_needing_contact,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
