//! Storage seams. Each life-aspect reads through its own trait so the
//! Postgres store and the in-memory store are interchangeable.
//!
//! `AppState` carries a `Repositories` bundle of `Arc<dyn …>` handles.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::recommendation::Recommendation;
use crate::models::trend::TrendRecord;
use crate::models::user::{FriendRow, TransactionRow, UserPreferences, UserProfile, WorkoutRow};

pub mod memory;
pub mod postgres;

pub type RepoResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn profile(&self, user_id: Uuid) -> RepoResult<Option<UserProfile>>;
    async fn preferences(&self, user_id: Uuid) -> RepoResult<Option<UserPreferences>>;
}

#[async_trait]
pub trait TrainingRepository: Send + Sync {
    /// Newest first.
    async fn recent_workouts(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<WorkoutRow>>;
}

#[async_trait]
pub trait FinanceRepository: Send + Sync {
    /// Newest first.
    async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> RepoResult<Vec<TransactionRow>>;
}

#[async_trait]
pub trait FriendsRepository: Send + Sync {
    async fn friends(&self, user_id: Uuid) -> RepoResult<Vec<FriendRow>>;
}

#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    async fn insert_many(&self, recommendations: &[Recommendation]) -> RepoResult<()>;

    /// Newest first.
    async fn list(&self, user_id: Uuid, include_dismissed: bool)
        -> RepoResult<Vec<Recommendation>>;

    /// Titles of the newest non-dismissed recommendations.
    async fn recent_titles(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<String>>;

    /// Sets whichever flags are given. Returns false when the recommendation
    /// does not exist or belongs to another user.
    async fn update_flags(
        &self,
        user_id: Uuid,
        id: Uuid,
        acted_on: Option<bool>,
        dismissed: Option<bool>,
    ) -> RepoResult<bool>;
}

#[async_trait]
pub trait TrendRepository: Send + Sync {
    /// Insert-or-replace keyed by `topic`.
    async fn upsert_many(&self, trends: &[TrendRecord]) -> RepoResult<()>;
}

#[derive(Clone)]
pub struct Repositories {
    pub profiles: Arc<dyn ProfileRepository>,
    pub training: Arc<dyn TrainingRepository>,
    pub finance: Arc<dyn FinanceRepository>,
    pub friends: Arc<dyn FriendsRepository>,
    pub recommendations: Arc<dyn RecommendationRepository>,
    pub trends: Arc<dyn TrendRepository>,
}

impl Repositories {
    /// Uses one store for every aspect.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProfileRepository
            + TrainingRepository
            + FinanceRepository
            + FriendsRepository
            + RecommendationRepository
            + TrendRepository
            + 'static,
    {
        Self {
            profiles: store.clone(),
            training: store.clone(),
            finance: store.clone(),
            friends: store.clone(),
            recommendations: store.clone(),
            trends: store,
        }
    }
}
