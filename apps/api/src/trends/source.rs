//! Trend source adapters. A source that is unconfigured or failing is not an
//! error for the pipeline: callers substitute `fallback_trends()`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::trend::RawTrend;

const TWITTER_API_URL: &str = "https://api.twitter.com";

#[derive(Debug, Error)]
pub enum TrendSourceError {
    #[error("trend source is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("trend API returned status {0}")]
    Api(u16),

    #[error("trend API returned no trends")]
    Empty,
}

#[async_trait]
pub trait TrendSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<RawTrend>, TrendSourceError>;
}

#[derive(Debug, Deserialize)]
struct TwitterTrendsResponse {
    #[serde(default)]
    data: Vec<TwitterTrend>,
}

#[derive(Debug, Deserialize)]
struct TwitterTrend {
    trend_name: String,
    tweet_count: Option<i64>,
}

/// X/Twitter API v2 trends for a WOEID location.
#[derive(Clone)]
pub struct TwitterTrendSource {
    client: Client,
    bearer_token: Option<String>,
    woeid: u32,
    base_url: String,
}

impl TwitterTrendSource {
    pub fn new(bearer_token: Option<String>, woeid: u32) -> Result<Self, TrendSourceError> {
        Self::with_base_url(bearer_token, woeid, TWITTER_API_URL)
    }

    pub fn with_base_url(
        bearer_token: Option<String>,
        woeid: u32,
        base_url: &str,
    ) -> Result<Self, TrendSourceError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(10)).build()?,
            bearer_token,
            woeid,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TrendSource for TwitterTrendSource {
    fn name(&self) -> &'static str {
        "twitter"
    }

    async fn fetch(&self) -> Result<Vec<RawTrend>, TrendSourceError> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or(TrendSourceError::NotConfigured)?;

        let response = self
            .client
            .get(format!("{}/2/trends/by/woeid/{}", self.base_url, self.woeid))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrendSourceError::Api(status.as_u16()));
        }

        let body: TwitterTrendsResponse = response.json().await?;
        let trends: Vec<RawTrend> = body
            .data
            .into_iter()
            .filter(|t| !t.trend_name.trim().is_empty())
            .map(|t| RawTrend {
                name: t.trend_name.trim().to_string(),
                engagement_volume: t.tweet_count,
            })
            .collect();

        if trends.is_empty() {
            return Err(TrendSourceError::Empty);
        }
        Ok(trends)
    }
}

/// Canned trends used whenever the live source is unavailable.
pub fn fallback_trends() -> Vec<RawTrend> {
    vec![
        RawTrend::new("Bitcoin ETF", Some(125_000)),
        RawTrend::new("Interest Rate Decision", Some(98_000)),
        RawTrend::new("Cold Plunge", Some(42_000)),
        RawTrend::new("Zone 2 Cardio", Some(31_000)),
        RawTrend::new("OpenAI DevDay", Some(87_000)),
        RawTrend::new("Remote Work Policies", Some(54_000)),
        RawTrend::new("Hidden Gem Travel Spots", Some(38_000)),
        RawTrend::new("Oscar Nominations", Some(150_000)),
        RawTrend::new("Champions League Final", Some(210_000)),
        RawTrend::new("Meal Prep Sunday", Some(27_000)),
        RawTrend::new("New Year Resolutions 2026", None),
    ]
}
