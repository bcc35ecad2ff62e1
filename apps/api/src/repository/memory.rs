//! In-process store. Used when no database is configured and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    FinanceRepository, FriendsRepository, ProfileRepository, RecommendationRepository,
    RepoResult, TrainingRepository, TrendRepository,
};
use crate::models::recommendation::Recommendation;
use crate::models::trend::TrendRecord;
use crate::models::user::{FriendRow, TransactionRow, UserPreferences, UserProfile, WorkoutRow};

/// User seeded by `MemoryStore::with_demo_data`.
pub const DEMO_USER_ID: Uuid = Uuid::from_u128(0x6c1f_8e2a_4b3d_4f00_9a11_0000_0000_0001);

#[derive(Default)]
struct MemoryData {
    profiles: HashMap<Uuid, UserProfile>,
    preferences: HashMap<Uuid, UserPreferences>,
    workouts: Vec<WorkoutRow>,
    transactions: Vec<TransactionRow>,
    friends: Vec<FriendRow>,
    recommendations: Vec<Recommendation>,
    trends: HashMap<String, TrendRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_profile(&self, profile: UserProfile) {
        self.data
            .write()
            .await
            .profiles
            .insert(profile.user_id, profile);
    }

    pub async fn put_preferences(&self, preferences: UserPreferences) {
        self.data
            .write()
            .await
            .preferences
            .insert(preferences.user_id, preferences);
    }

    pub async fn add_workout(&self, workout: WorkoutRow) {
        self.data.write().await.workouts.push(workout);
    }

    pub async fn add_transaction(&self, transaction: TransactionRow) {
        self.data.write().await.transactions.push(transaction);
    }

    pub async fn add_friend(&self, friend: FriendRow) {
        self.data.write().await.friends.push(friend);
    }

    #[cfg(test)]
    pub async fn stored_trend(&self, topic: &str) -> Option<TrendRecord> {
        self.data.read().await.trends.get(topic).cloned()
    }

    #[cfg(test)]
    pub async fn trend_count(&self) -> usize {
        self.data.read().await.trends.len()
    }

    /// A store holding one demo user with a little history in every tracked aspect.
    pub async fn with_demo_data() -> Self {
        let store = Self::new();
        let now = Utc::now();
        let user_id = DEMO_USER_ID;

        store
            .put_profile(UserProfile {
                user_id,
                display_name: "Alex".to_string(),
            })
            .await;
        store
            .put_preferences(UserPreferences {
                user_id,
                tone_style: "friendly".to_string(),
                aspect_priorities: vec![
                    "training".to_string(),
                    "finance".to_string(),
                    "friends".to_string(),
                    "films".to_string(),
                ],
                llm_provider: "anthropic".to_string(),
            })
            .await;

        for (workout_type, minutes, days_ago) in
            [("run", 35, 3), ("strength", 50, 6), ("yoga", 30, 10)]
        {
            store
                .add_workout(WorkoutRow {
                    user_id,
                    workout_type: workout_type.to_string(),
                    duration_minutes: minutes,
                    performed_at: now - Duration::days(days_ago),
                })
                .await;
        }

        for (category, amount, days_ago) in [
            ("income", 4200.0, 12),
            ("food", -86.4, 2),
            ("food", -54.0, 4),
            ("entertainment", -15.99, 9),
        ] {
            store
                .add_transaction(TransactionRow {
                    user_id,
                    category: category.to_string(),
                    amount,
                    occurred_at: now - Duration::days(days_ago),
                })
                .await;
        }

        for (name, days_ago) in [("Sam", Some(2)), ("Jordan", Some(21)), ("Riley", None)] {
            store
                .add_friend(FriendRow {
                    user_id,
                    name: name.to_string(),
                    last_contact_at: days_ago.map(|d| now - Duration::days(d)),
                })
                .await;
        }

        store
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn profile(&self, user_id: Uuid) -> RepoResult<Option<UserProfile>> {
        Ok(self.data.read().await.profiles.get(&user_id).cloned())
    }

    async fn preferences(&self, user_id: Uuid) -> RepoResult<Option<UserPreferences>> {
        Ok(self.data.read().await.preferences.get(&user_id).cloned())
    }
}

#[async_trait]
impl TrainingRepository for MemoryStore {
    async fn recent_workouts(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<WorkoutRow>> {
        let data = self.data.read().await;
        let mut rows: Vec<WorkoutRow> = data
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[async_trait]
impl FinanceRepository for MemoryStore {
    async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> RepoResult<Vec<TransactionRow>> {
        let data = self.data.read().await;
        let mut rows: Vec<TransactionRow> = data
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[async_trait]
impl FriendsRepository for MemoryStore {
    async fn friends(&self, user_id: Uuid) -> RepoResult<Vec<FriendRow>> {
        let data = self.data.read().await;
        let mut rows: Vec<FriendRow> = data
            .friends
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[async_trait]
impl RecommendationRepository for MemoryStore {
    async fn insert_many(&self, recommendations: &[Recommendation]) -> RepoResult<()> {
        self.data
            .write()
            .await
            .recommendations
            .extend_from_slice(recommendations);
        Ok(())
    }

    async fn list(
        &self,
        user_id: Uuid,
        include_dismissed: bool,
    ) -> RepoResult<Vec<Recommendation>> {
        let data = self.data.read().await;
        // Reverse insertion order keeps same-timestamp batches newest first.
        let mut rows: Vec<Recommendation> = data
            .recommendations
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id && (include_dismissed || !r.dismissed))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn recent_titles(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<String>> {
        let mut rows = self.list(user_id, false).await?;
        rows.truncate(limit.max(0) as usize);
        Ok(rows.into_iter().map(|r| r.title).collect())
    }

    async fn update_flags(
        &self,
        user_id: Uuid,
        id: Uuid,
        acted_on: Option<bool>,
        dismissed: Option<bool>,
    ) -> RepoResult<bool> {
        let mut data = self.data.write().await;
        let Some(rec) = data
            .recommendations
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
        else {
            return Ok(false);
        };
        if let Some(flag) = acted_on {
            rec.acted_on = flag;
        }
        if let Some(flag) = dismissed {
            rec.dismissed = flag;
        }
        Ok(true)
    }
}

#[async_trait]
impl TrendRepository for MemoryStore {
    async fn upsert_many(&self, trends: &[TrendRecord]) -> RepoResult<()> {
        let mut data = self.data.write().await;
        for trend in trends {
            data.trends.insert(trend.topic.clone(), trend.clone());
        }
        Ok(())
    }
}
