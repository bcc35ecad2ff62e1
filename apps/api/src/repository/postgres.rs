//! Postgres-backed repositories.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    FinanceRepository, FriendsRepository, ProfileRepository, RecommendationRepository,
    RepoResult, TrainingRepository, TrendRepository,
};
use crate::models::recommendation::{Recommendation, RecommendationRow};
use crate::models::trend::TrendRecord;
use crate::models::user::{FriendRow, TransactionRow, UserPreferences, UserProfile, WorkoutRow};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn profile(&self, user_id: Uuid) -> RepoResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, display_name FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn preferences(&self, user_id: Uuid) -> RepoResult<Option<UserPreferences>> {
        sqlx::query_as::<_, UserPreferences>(
            r#"
            SELECT user_id, tone_style, aspect_priorities, llm_provider
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl TrainingRepository for PgStore {
    async fn recent_workouts(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<WorkoutRow>> {
        sqlx::query_as::<_, WorkoutRow>(
            r#"
            SELECT user_id, workout_type, duration_minutes, performed_at
            FROM workouts
            WHERE user_id = $1
            ORDER BY performed_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[async_trait]
impl FinanceRepository for PgStore {
    async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> RepoResult<Vec<TransactionRow>> {
        sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT user_id, category, amount, occurred_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY occurred_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[async_trait]
impl FriendsRepository for PgStore {
    async fn friends(&self, user_id: Uuid) -> RepoResult<Vec<FriendRow>> {
        sqlx::query_as::<_, FriendRow>(
            r#"
            SELECT user_id, name, last_contact_at
            FROM friends
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[async_trait]
impl RecommendationRepository for PgStore {
    async fn insert_many(&self, recommendations: &[Recommendation]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        for rec in recommendations {
            sqlx::query(
                r#"
                INSERT INTO recommendations
                    (id, user_id, aspect, title, content, action_type, priority,
                     action_url, trend_context, source, acted_on, dismissed, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(rec.id)
            .bind(rec.user_id)
            .bind(rec.aspect.as_str())
            .bind(&rec.title)
            .bind(&rec.content)
            .bind(rec.action_type.as_str())
            .bind(rec.priority.as_str())
            .bind(&rec.action_url)
            .bind(&rec.trend_context)
            .bind(rec.source.as_str())
            .bind(rec.acted_on)
            .bind(rec.dismissed)
            .bind(rec.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }

    async fn list(
        &self,
        user_id: Uuid,
        include_dismissed: bool,
    ) -> RepoResult<Vec<Recommendation>> {
        let rows = sqlx::query_as::<_, RecommendationRow>(
            r#"
            SELECT id, user_id, aspect, title, content, action_type, priority,
                   action_url, trend_context, source, acted_on, dismissed, created_at
            FROM recommendations
            WHERE user_id = $1 AND ($2 OR NOT dismissed)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(include_dismissed)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Recommendation::from).collect())
    }

    async fn recent_titles(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT title
            FROM recommendations
            WHERE user_id = $1 AND NOT dismissed
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_flags(
        &self,
        user_id: Uuid,
        id: Uuid,
        acted_on: Option<bool>,
        dismissed: Option<bool>,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recommendations
            SET acted_on = COALESCE($3, acted_on),
                dismissed = COALESCE($4, dismissed)
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(acted_on)
        .bind(dismissed)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TrendRepository for PgStore {
    async fn upsert_many(&self, trends: &[TrendRecord]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        for trend in trends {
            let aspects: Vec<String> = trend
                .related_aspects
                .iter()
                .map(|a| a.as_str().to_string())
                .collect();

            sqlx::query(
                r#"
                INSERT INTO trends
                    (topic, category, relevance_score, engagement_volume, sentiment,
                     related_aspects, is_emerging, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, now())
                ON CONFLICT (topic) DO UPDATE SET
                    category = EXCLUDED.category,
                    relevance_score = EXCLUDED.relevance_score,
                    engagement_volume = EXCLUDED.engagement_volume,
                    sentiment = EXCLUDED.sentiment,
                    related_aspects = EXCLUDED.related_aspects,
                    is_emerging = EXCLUDED.is_emerging,
                    updated_at = now()
                "#,
            )
            .bind(&trend.topic)
            .bind(trend.category.as_str())
            .bind(trend.relevance_score as i32)
            .bind(trend.engagement_volume)
            .bind(trend.sentiment.as_str())
            .bind(&aspects)
            .bind(trend.is_emerging)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }
}
