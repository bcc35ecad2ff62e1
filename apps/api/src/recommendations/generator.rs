//! Recommendation generation: orchestrates one refresh cycle for one user.
//!
//! Flow: aggregate user context → trend snapshot → existing titles →
//!       build prompt → LLM gateway → parse → persist → respond.
//!
//! Fatal: `UserNotFound` (before any external call), `GenerationFailed`,
//! storage errors. Everything else degrades and the cycle still succeeds.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CompletionRequest, LlmGateway};
use crate::models::recommendation::Recommendation;
use crate::recommendations::context::aggregate_user_context;
use crate::recommendations::parser::parse_recommendations;
use crate::recommendations::prompt::{build_prompt, MAX_AVOID_TITLES};
use crate::recommendations::prompts::RECOMMENDATION_SYSTEM;
use crate::repository::Repositories;
use crate::trends::service::TrendService;

/// Token budget and sampling temperature shared by both providers.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
    pub trends_analyzed: usize,
}

pub async fn generate_recommendations(
    repos: &Repositories,
    trends: &TrendService,
    llm: &LlmGateway,
    settings: GenerationSettings,
    request: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    let user_id = request.user_id;

    // Step 1: user context (aborts on incomplete profiles)
    let summary = aggregate_user_context(repos, user_id, Utc::now()).await?;

    // Step 2: ranked trends (cached)
    let snapshot = trends.current(request.force_refresh).await;

    // Step 3: titles the model must not repeat
    let existing_titles = repos
        .recommendations
        .recent_titles(user_id, MAX_AVOID_TITLES as i64)
        .await?;

    // Step 4: prompt
    let prompt = build_prompt(&summary, &snapshot.trends, &existing_titles)?;
    info!(
        "Built prompt for user {user_id}: {} trends, {} existing titles, provider={}",
        prompt.trends.len(),
        existing_titles.len(),
        summary.llm_provider.as_str()
    );

    // Step 5: generate
    let completion = CompletionRequest {
        system_prompt: format!("{RECOMMENDATION_SYSTEM} {JSON_ONLY_SYSTEM}"),
        user_prompt: prompt.text,
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    };
    let raw = llm.generate(summary.llm_provider, &completion).await?;

    // Step 6: parse (never fatal)
    let recommendations = parse_recommendations(&raw, user_id, &prompt.trends);
    if recommendations.is_empty() {
        warn!("Generation for user {user_id} produced no usable recommendations");
    }

    // Step 7: persist
    if !recommendations.is_empty() {
        repos.recommendations.insert_many(&recommendations).await?;
    }

    info!(
        "Generated {} recommendations for user {user_id}",
        recommendations.len()
    );

    Ok(GenerateResponse {
        success: true,
        recommendations,
        trends_analyzed: snapshot.trends.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::testing::ScriptedProvider;
    use crate::models::aspect::AspectId;
    use crate::models::recommendation::RecommendationSource;
    use crate::models::trend::RawTrend;
    use crate::models::user::{ProviderKind, UserPreferences, UserProfile};
    use crate::repository::memory::MemoryStore;
    use crate::repository::{RecommendationRepository, RepoResult};
    use crate::trends::source::{TrendSource, TrendSourceError};

    const SETTINGS: GenerationSettings = GenerationSettings {
        max_tokens: 1500,
        temperature: 0.7,
    };

    struct FixedSource(Vec<RawTrend>);

    #[async_trait]
    impl TrendSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self) -> Result<Vec<RawTrend>, TrendSourceError> {
            Ok(self.0.clone())
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        repos: Repositories,
        trends: TrendService,
        user_id: Uuid,
    }

    async fn fixture(provider: &str) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();
        store
            .put_profile(UserProfile {
                user_id,
                display_name: "Alex".to_string(),
            })
            .await;
        store
            .put_preferences(UserPreferences {
                user_id,
                tone_style: "chill".to_string(),
                aspect_priorities: vec!["finance".to_string(), "training".to_string()],
                llm_provider: provider.to_string(),
            })
            .await;

        let repos = Repositories::from_store(store.clone());
        let source = Arc::new(FixedSource(vec![
            RawTrend::new("Bitcoin ETF", Some(120_000)),
            RawTrend::new("NBA Finals", Some(400_000)),
            RawTrend::new("Oscar Nominations", Some(90_000)),
            RawTrend::new("Random Meme", Some(1_000)),
        ]));
        let trends = TrendService::new(source, store.clone(), Duration::from_secs(900));

        Fixture {
            store,
            repos,
            trends,
            user_id,
        }
    }

    const GOOD_REPLY: &str = r#"{"recommendations":[
        {"aspect":"finance","title":"Bitcoin ETF sanity check","content":"Skim your allocation before the hype peaks.","action_type":"action","priority":"medium","trend_context":"Bitcoin ETF"},
        {"aspect":"training","title":"Easy run tonight","content":"Twenty minutes keeps the habit alive.","priority":"low"},
        {"aspect":"finance","title":"Crypto headlines","content":"Lots of noise this week; no action needed.","trend_context":"crypto"}
    ]}"#;

    #[tokio::test]
    async fn test_full_cycle_persists_and_tags_sources() {
        let f = fixture("openai").await;
        let provider = ScriptedProvider::replying("openai", GOOD_REPLY);
        let llm = LlmGateway::new().with_provider(ProviderKind::OpenAi, provider.clone());

        let response = generate_recommendations(
            &f.repos,
            &f.trends,
            &llm,
            SETTINGS,
            GenerateRequest {
                user_id: f.user_id,
                force_refresh: false,
            },
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(response.trends_analyzed, 3);
        assert_eq!(response.recommendations.len(), 3);
        assert_eq!(
            response.recommendations[0].source,
            RecommendationSource::TwitterTrend
        );
        assert_eq!(
            response.recommendations[1].source,
            RecommendationSource::UserData
        );
        assert_eq!(
            response.recommendations[2].source,
            RecommendationSource::Hybrid
        );
        assert_eq!(response.recommendations[1].aspect, AspectId::Training);

        let stored = f.store.list(f.user_id, false).await.unwrap();
        assert_eq!(stored.len(), 3);

        // Prompt: finance + sports trends are in scope, entertainment is not
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("\"Bitcoin ETF\""));
        assert!(prompt.contains("\"NBA Finals\""));
        assert!(!prompt.contains("Oscar Nominations"));
        let request = provider.requests.lock().unwrap()[0].clone();
        assert_eq!(request.max_tokens, 1500);
        assert!(request.system_prompt.contains("valid JSON only"));
    }

    #[tokio::test]
    async fn test_second_cycle_lists_previous_titles_to_avoid() {
        let f = fixture("openai").await;
        let provider = ScriptedProvider::replying("openai", GOOD_REPLY);
        let llm = LlmGateway::new().with_provider(ProviderKind::OpenAi, provider.clone());
        let request = GenerateRequest {
            user_id: f.user_id,
            force_refresh: false,
        };

        generate_recommendations(&f.repos, &f.trends, &llm, SETTINGS, request.clone())
            .await
            .unwrap();
        generate_recommendations(&f.repos, &f.trends, &llm, SETTINGS, request)
            .await
            .unwrap();

        let prompt = provider.last_prompt().unwrap();
        let avoid = &prompt[prompt.find("EXISTING RECOMMENDATIONS").unwrap()..];
        assert!(avoid.contains("- Bitcoin ETF sanity check"));
        assert!(avoid.contains("- Easy run tonight"));
    }

    #[tokio::test]
    async fn test_unknown_user_aborts_before_llm_call() {
        let f = fixture("openai").await;
        let provider = ScriptedProvider::replying("openai", GOOD_REPLY);
        let llm = LlmGateway::new().with_provider(ProviderKind::OpenAi, provider.clone());

        let err = generate_recommendations(
            &f.repos,
            &f.trends,
            &llm,
            SETTINGS,
            GenerateRequest {
                user_id: Uuid::new_v4(),
                force_refresh: false,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::UserNotFound(_)));
        assert_eq!(provider.calls(), 0);
        assert_eq!(f.store.trend_count().await, 0, "no trend fetch either");
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal_and_not_retried_elsewhere() {
        let f = fixture("anthropic").await;
        let anthropic = ScriptedProvider::failing("anthropic", "overloaded");
        let openai = ScriptedProvider::replying("openai", GOOD_REPLY);
        let llm = LlmGateway::new()
            .with_provider(ProviderKind::Anthropic, anthropic.clone())
            .with_provider(ProviderKind::OpenAi, openai.clone());

        let err = generate_recommendations(
            &f.repos,
            &f.trends,
            &llm,
            SETTINGS,
            GenerateRequest {
                user_id: f.user_id,
                force_refresh: false,
            },
        )
        .await
        .unwrap_err();

        assert!(
            matches!(err, AppError::GenerationFailed { ref provider, .. } if provider == "anthropic")
        );
        assert_eq!(openai.calls(), 0);
        assert!(f.store.list(f.user_id, true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_output_is_an_empty_success() {
        let f = fixture("openai").await;
        let provider = ScriptedProvider::replying("openai", "Sorry, I can't help with that.");
        let llm = LlmGateway::new().with_provider(ProviderKind::OpenAi, provider);

        let response = generate_recommendations(
            &f.repos,
            &f.trends,
            &llm,
            SETTINGS,
            GenerateRequest {
                user_id: f.user_id,
                force_refresh: true,
            },
        )
        .await
        .unwrap();

        assert!(response.success);
        assert!(response.recommendations.is_empty());
        assert_eq!(response.trends_analyzed, 3);
        // Trend records were still persisted
        assert_eq!(f.store.trend_count().await, 3);
    }

    struct BrokenRecommendations;

    #[async_trait]
    impl RecommendationRepository for BrokenRecommendations {
        async fn insert_many(&self, _recommendations: &[Recommendation]) -> RepoResult<()> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn list(&self, _user_id: Uuid, _include_dismissed: bool) -> RepoResult<Vec<Recommendation>> {
            Ok(Vec::new())
        }

        async fn recent_titles(&self, _user_id: Uuid, _limit: i64) -> RepoResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn update_flags(
            &self,
            _user_id: Uuid,
            _id: Uuid,
            _acted_on: Option<bool>,
            _dismissed: Option<bool>,
        ) -> RepoResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_surfaced() {
        let mut f = fixture("openai").await;
        f.repos.recommendations = Arc::new(BrokenRecommendations);
        let llm = LlmGateway::new()
            .with_provider(ProviderKind::OpenAi, ScriptedProvider::replying("openai", GOOD_REPLY));

        let err = generate_recommendations(
            &f.repos,
            &f.trends,
            &llm,
            SETTINGS,
            GenerateRequest {
                user_id: f.user_id,
                force_refresh: false,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }
}
