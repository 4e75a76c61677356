//! YouTube Data API v3 client
//!
//! A snapshot takes three calls:
//! 1. `channels` for statistics and the uploads playlist id
//! 2. `playlistItems` for the most recent upload ids
//! 3. `videos` for per-video statistics

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::{
    de_count, http_client, read_json, ClientError, ClientResult, PlatformClient,
    PlatformSnapshot, DEFAULT_TIMEOUT,
};
use crate::config::YouTubeConfig;
use crate::models::{AccountStats, ChannelStats, Platform, PlatformContent, Video};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// The API caps page size at 50
const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
    statistics: ChannelStatistics,
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    #[serde(default, deserialize_with = "de_count")]
    view_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    subscriber_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    video_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    content_details: PlaylistItemDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    published_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    #[serde(default, deserialize_with = "de_count")]
    view_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    like_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    comment_count: u64,
}

/// YouTube channel client authenticated with an API key
pub struct YouTubeClient {
    client: Client,
    config: YouTubeConfig,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> ClientResult<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another server (for testing)
    pub fn with_base_url(config: YouTubeConfig, base_url: &str) -> ClientResult<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url.trim_end_matches('/').to_string();
        Ok(client)
    }

    fn ensure_configured(&self) -> ClientResult<()> {
        if self.config.api_key.is_empty() {
            return Err(ClientError::missing_credentials(Platform::YouTube, "api_key"));
        }
        if self.config.channel_id.is_empty() {
            return Err(ClientError::missing_credentials(Platform::YouTube, "channel_id"));
        }
        Ok(())
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response = self
            .client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(query)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;
        read_json(Platform::YouTube, endpoint, response).await
    }

    async fn fetch_channel(&self) -> ClientResult<ChannelItem> {
        let response: ListResponse<ChannelItem> = self
            .get(
                "channels",
                &[
                    ("part", "snippet,statistics,contentDetails"),
                    ("id", self.config.channel_id.as_str()),
                ],
            )
            .await?;

        response.items.into_iter().next().ok_or_else(|| {
            ClientError::invalid_response(
                Platform::YouTube,
                format!("channel {} not found", self.config.channel_id),
            )
        })
    }

    /// Most recent uploads, newest first
    pub async fn fetch_recent_videos(
        &self,
        uploads_playlist: &str,
        max_items: usize,
    ) -> ClientResult<Vec<Video>> {
        let page_size = max_items.clamp(1, MAX_PAGE_SIZE).to_string();
        let playlist: ListResponse<PlaylistItem> = self
            .get(
                "playlistItems",
                &[
                    ("part", "contentDetails"),
                    ("playlistId", uploads_playlist),
                    ("maxResults", page_size.as_str()),
                ],
            )
            .await?;

        if playlist.items.is_empty() {
            return Ok(Vec::new());
        }

        let ids = playlist
            .items
            .iter()
            .map(|item| item.content_details.video_id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let videos: ListResponse<VideoItem> = self
            .get("videos", &[("part", "snippet,statistics"), ("id", ids.as_str())])
            .await?;

        let fetched_at = Utc::now();
        Ok(videos
            .items
            .into_iter()
            .map(|item| Video {
                id: item.id,
                title: item.snippet.title,
                description: item.snippet.description,
                published_at: item.snippet.published_at,
                view_count: item.statistics.view_count,
                like_count: item.statistics.like_count,
                comment_count: item.statistics.comment_count,
                fetched_at,
            })
            .collect())
    }
}

#[async_trait]
impl PlatformClient for YouTubeClient {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn fetch_snapshot(&self, max_items: usize) -> ClientResult<PlatformSnapshot> {
        self.ensure_configured()?;

        let channel = self.fetch_channel().await?;
        let videos = self
            .fetch_recent_videos(&channel.content_details.related_playlists.uploads, max_items)
            .await?;

        tracing::debug!(
            channel = %channel.id,
            videos = videos.len(),
            "Fetched YouTube snapshot"
        );

        Ok(PlatformSnapshot {
            stats: AccountStats::YouTube(ChannelStats {
                channel_id: channel.id,
                title: channel.snippet.title,
                subscriber_count: channel.statistics.subscriber_count,
                view_count: channel.statistics.view_count,
                video_count: channel.statistics.video_count,
                recorded_at: Utc::now(),
            }),
            content: PlatformContent::YouTube(videos),
        })
    }
}
