//! X API v2 client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    de_count, http_client, read_json, ClientError, ClientResult, PlatformClient,
    PlatformSnapshot, DEFAULT_TIMEOUT,
};
use crate::config::XConfig;
use crate::models::{AccountStats, Platform, PlatformContent, Tweet, XUserStats};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// Page size bounds accepted by the timeline endpoint
const MIN_RESULTS: usize = 5;
const MAX_RESULTS: usize = 100;

#[derive(Debug, Deserialize)]
struct UserResponse {
    data: UserData,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    username: String,
    #[serde(default)]
    public_metrics: UserMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetrics {
    #[serde(default, deserialize_with = "de_count")]
    followers_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    following_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    tweet_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    listed_count: u64,
}

/// Timeline page; `data` is omitted when the account has no posts
#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    data: Vec<TweetData>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    text: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    public_metrics: TweetMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct TweetMetrics {
    #[serde(default, deserialize_with = "de_count")]
    impression_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    like_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    reply_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    retweet_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    quote_count: u64,
}

impl TweetData {
    fn into_tweet(self, fetched_at: DateTime<Utc>) -> Tweet {
        Tweet {
            id: self.id,
            text: self.text,
            created_at: self.created_at,
            impression_count: self.public_metrics.impression_count,
            like_count: self.public_metrics.like_count,
            reply_count: self.public_metrics.reply_count,
            retweet_count: self.public_metrics.retweet_count,
            quote_count: self.public_metrics.quote_count,
            fetched_at,
        }
    }
}

/// X account client authenticated with an app bearer token
pub struct XClient {
    client: Client,
    config: XConfig,
    base_url: String,
}

impl XClient {
    pub fn new(config: XConfig) -> ClientResult<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another server (for testing)
    pub fn with_base_url(config: XConfig, base_url: &str) -> ClientResult<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url.trim_end_matches('/').to_string();
        Ok(client)
    }

    fn ensure_configured(&self) -> ClientResult<()> {
        if self.config.bearer_token.is_empty() {
            return Err(ClientError::missing_credentials(Platform::X, "bearer_token"));
        }
        if self.config.user_id.is_empty() {
            return Err(ClientError::missing_credentials(Platform::X, "user_id"));
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response = self
            .client
            .get(format!("{}{endpoint}", self.base_url))
            .bearer_auth(&self.config.bearer_token)
            .query(query)
            .send()
            .await?;
        read_json(Platform::X, endpoint, response).await
    }

    pub async fn fetch_user_stats(&self) -> ClientResult<XUserStats> {
        let endpoint = format!("/2/users/{}", self.config.user_id);
        let user: UserResponse = self
            .get(&endpoint, &[("user.fields", "public_metrics")])
            .await?;

        Ok(XUserStats {
            user_id: user.data.id,
            username: user.data.username,
            followers_count: user.data.public_metrics.followers_count,
            following_count: user.data.public_metrics.following_count,
            tweet_count: user.data.public_metrics.tweet_count,
            listed_count: user.data.public_metrics.listed_count,
            recorded_at: Utc::now(),
        })
    }

    /// Original posts only; retweets and replies are excluded
    pub async fn fetch_recent_tweets(&self, max_items: usize) -> ClientResult<Vec<Tweet>> {
        let endpoint = format!("/2/users/{}/tweets", self.config.user_id);
        let max_results = max_items.clamp(MIN_RESULTS, MAX_RESULTS).to_string();
        let timeline: TimelineResponse = self
            .get(
                &endpoint,
                &[
                    ("max_results", max_results.as_str()),
                    ("tweet.fields", "public_metrics,created_at"),
                    ("exclude", "retweets,replies"),
                ],
            )
            .await?;

        let fetched_at = Utc::now();
        Ok(timeline
            .data
            .into_iter()
            .take(max_items)
            .map(|t| t.into_tweet(fetched_at))
            .collect())
    }
}

#[async_trait]
impl PlatformClient for XClient {
    fn platform(&self) -> Platform {
        Platform::X
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn fetch_snapshot(&self, max_items: usize) -> ClientResult<PlatformSnapshot> {
        self.ensure_configured()?;

        let stats = self.fetch_user_stats().await?;
        let tweets = self.fetch_recent_tweets(max_items).await?;

        tracing::debug!(user = %stats.username, tweets = tweets.len(), "Fetched X snapshot");

        Ok(PlatformSnapshot {
            stats: AccountStats::X(stats),
            content: PlatformContent::X(tweets),
        })
    }
}
