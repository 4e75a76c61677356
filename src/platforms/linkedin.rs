//! LinkedIn client
//!
//! Follower counts come from the v2 `networkSizes` endpoint, posts from the
//! versioned `rest/posts` finder, and per-post likes and comments from
//! `socialActions`. Impressions need organization analytics scopes that a
//! member token does not carry, so they are stored as 0.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    de_count, http_client, read_json, ClientError, ClientResult, PlatformClient,
    PlatformSnapshot, DEFAULT_TIMEOUT,
};
use crate::config::LinkedInConfig;
use crate::models::{AccountStats, LinkedInPost, LinkedInProfileStats, Platform, PlatformContent};

const DEFAULT_BASE_URL: &str = "https://api.linkedin.com";

/// Monthly version header required by the `rest/` endpoints
const API_VERSION: &str = "202401";

const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkSize {
    #[serde(default, deserialize_with = "de_count")]
    first_degree_size: u64,
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    elements: Vec<PostElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostElement {
    id: String,
    #[serde(default)]
    commentary: String,
    /// Epoch milliseconds
    created_at: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialActions {
    #[serde(default)]
    likes_summary: LikesSummary,
    #[serde(default)]
    comments_summary: CommentsSummary,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikesSummary {
    #[serde(default, deserialize_with = "de_count")]
    total_likes: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentsSummary {
    #[serde(default, deserialize_with = "de_count")]
    aggregated_total_comments: u64,
}

/// URNs contain `:` which must be escaped inside a path segment
fn encode_urn(urn: &str) -> String {
    urn.replace(':', "%3A")
}

fn millis_to_datetime(millis: i64) -> ClientResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        ClientError::invalid_response(Platform::LinkedIn, format!("invalid createdAt {millis}"))
    })
}

/// LinkedIn member client authenticated with an OAuth access token
pub struct LinkedInClient {
    client: Client,
    config: LinkedInConfig,
    base_url: String,
}

impl LinkedInClient {
    pub fn new(config: LinkedInConfig) -> ClientResult<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another server (for testing)
    pub fn with_base_url(config: LinkedInConfig, base_url: &str) -> ClientResult<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url.trim_end_matches('/').to_string();
        Ok(client)
    }

    fn ensure_configured(&self) -> ClientResult<()> {
        if self.config.access_token.is_empty() {
            return Err(ClientError::missing_credentials(
                Platform::LinkedIn,
                "access_token",
            ));
        }
        if self.config.person_urn.is_empty() {
            return Err(ClientError::missing_credentials(
                Platform::LinkedIn,
                "person_urn",
            ));
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
            .bearer_auth(&self.config.access_token)
            .header("LinkedIn-Version", API_VERSION)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .query(query)
            .send()
            .await?;
        read_json(Platform::LinkedIn, endpoint, response).await
    }

    pub async fn fetch_profile_stats(&self) -> ClientResult<LinkedInProfileStats> {
        let endpoint = format!("/v2/networkSizes/{}", encode_urn(&self.config.person_urn));
        let size: NetworkSize = self
            .get(&endpoint, &[("edgeType", "CompanyFollowedByMember")])
            .await?;

        Ok(LinkedInProfileStats {
            person_urn: self.config.person_urn.clone(),
            follower_count: size.first_degree_size,
            recorded_at: Utc::now(),
        })
    }

    async fn fetch_social_actions(&self, post_urn: &str) -> ClientResult<SocialActions> {
        let endpoint = format!("/v2/socialActions/{}", encode_urn(post_urn));
        self.get(&endpoint, &[]).await
    }

    /// Recent posts by the configured member with like and comment totals
    pub async fn fetch_recent_posts(&self, max_items: usize) -> ClientResult<Vec<LinkedInPost>> {
        let count = max_items.clamp(1, MAX_PAGE_SIZE).to_string();
        let posts: PostsResponse = self
            .get(
                "/rest/posts",
                &[
                    ("author", self.config.person_urn.as_str()),
                    ("q", "author"),
                    ("count", count.as_str()),
                ],
            )
            .await?;

        let fetched_at = Utc::now();
        let mut result = Vec::with_capacity(posts.elements.len());
        for element in posts.elements.into_iter().take(max_items) {
            let actions = match self.fetch_social_actions(&element.id).await {
                Ok(actions) => actions,
                Err(e) => {
                    tracing::warn!(post = %element.id, error = %e, "Failed to fetch social actions");
                    SocialActions::default()
                }
            };

            result.push(LinkedInPost {
                created_at: millis_to_datetime(element.created_at)?,
                id: element.id,
                text: element.commentary,
                impression_count: 0,
                like_count: actions.likes_summary.total_likes,
                comment_count: actions.comments_summary.aggregated_total_comments,
                share_count: 0,
                click_count: 0,
                fetched_at,
            });
        }

        Ok(result)
    }
}

#[async_trait]
impl PlatformClient for LinkedInClient {
    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn fetch_snapshot(&self, max_items: usize) -> ClientResult<PlatformSnapshot> {
        self.ensure_configured()?;

        let stats = self.fetch_profile_stats().await?;
        let posts = self.fetch_recent_posts(max_items).await?;

        tracing::debug!(posts = posts.len(), "Fetched LinkedIn snapshot");

        Ok(PlatformSnapshot {
            stats: AccountStats::LinkedIn(stats),
            content: PlatformContent::LinkedIn(posts),
        })
    }
}
