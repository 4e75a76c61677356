//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use crossforge::error::{Error, Result};
use crossforge::models::{
    AccountStats, Comment, DataPoint, DateRange, Insight, LinkedInPost, Platform, Tweet, Video,
};
use crossforge::storage::{MemoryStore, SharedStore, Store};

/// Empty shared in-memory store
pub fn memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

/// Shared store whose every operation fails
pub fn failing_store() -> SharedStore {
    Arc::new(FailingStore)
}

/// Store that rejects every call, as an unreachable database would
pub struct FailingStore;

fn offline<T>() -> Result<T> {
    Err(Error::Database(rusqlite::Error::InvalidQuery))
}

#[async_trait]
impl Store for FailingStore {
    async fn save_video(&self, _video: &Video) -> Result<()> {
        offline()
    }

    async fn get_video(&self, _id: &str) -> Result<Option<Video>> {
        offline()
    }

    async fn get_videos(&self, _limit: usize, _offset: usize) -> Result<Vec<Video>> {
        offline()
    }

    async fn get_videos_by_date_range(&self, _range: &DateRange) -> Result<Vec<Video>> {
        offline()
    }

    async fn save_tweet(&self, _tweet: &Tweet) -> Result<()> {
        offline()
    }

    async fn get_tweet(&self, _id: &str) -> Result<Option<Tweet>> {
        offline()
    }

    async fn get_tweets(&self, _limit: usize, _offset: usize) -> Result<Vec<Tweet>> {
        offline()
    }

    async fn get_tweets_by_date_range(&self, _range: &DateRange) -> Result<Vec<Tweet>> {
        offline()
    }

    async fn save_linkedin_post(&self, _post: &LinkedInPost) -> Result<()> {
        offline()
    }

    async fn get_linkedin_post(&self, _id: &str) -> Result<Option<LinkedInPost>> {
        offline()
    }

    async fn get_linkedin_posts(&self, _limit: usize, _offset: usize) -> Result<Vec<LinkedInPost>> {
        offline()
    }

    async fn get_linkedin_posts_by_date_range(
        &self,
        _range: &DateRange,
    ) -> Result<Vec<LinkedInPost>> {
        offline()
    }

    async fn save_comment(&self, _comment: &Comment) -> Result<()> {
        offline()
    }

    async fn get_comments(&self, _platform: Platform, _content_id: &str) -> Result<Vec<Comment>> {
        offline()
    }

    async fn save_account_stats(&self, _stats: &AccountStats) -> Result<()> {
        offline()
    }

    async fn get_latest_account_stats(&self, _platform: Platform) -> Result<Option<AccountStats>> {
        offline()
    }

    async fn save_insight(&self, _insight: &Insight) -> Result<()> {
        offline()
    }

    async fn get_insights(&self, _platform: Platform, _limit: usize) -> Result<Vec<Insight>> {
        offline()
    }

    async fn get_recent_insights(&self, _limit: usize) -> Result<Vec<Insight>> {
        offline()
    }

    async fn record_metric(
        &self,
        _platform: Platform,
        _metric: &str,
        _point: DataPoint,
    ) -> Result<()> {
        offline()
    }

    async fn get_metric_points(
        &self,
        _platform: Platform,
        _metric: &str,
        _range: &DateRange,
    ) -> Result<Vec<DataPoint>> {
        offline()
    }
}

/// Timestamp `hours` hours before now
pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

/// Record `values` as hourly points ending one hour ago
pub async fn seed_series(store: &SharedStore, platform: Platform, metric: &str, values: &[f64]) {
    let count = values.len() as i64;
    for (i, value) in values.iter().enumerate() {
        store
            .record_metric(
                platform,
                metric,
                DataPoint::new(hours_ago(count - i as i64), *value),
            )
            .await
            .unwrap();
    }
}

pub fn video(id: &str, views: u64, likes: u64, published: DateTime<Utc>) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        description: String::new(),
        published_at: published,
        view_count: views,
        like_count: likes,
        comment_count: 0,
        fetched_at: Utc::now(),
    }
}

pub fn tweet(id: &str, impressions: u64, likes: u64, created: DateTime<Utc>) -> Tweet {
    Tweet {
        id: id.to_string(),
        text: format!("Post {id}"),
        created_at: created,
        impression_count: impressions,
        like_count: likes,
        reply_count: 0,
        retweet_count: 0,
        quote_count: 0,
        fetched_at: Utc::now(),
    }
}

pub fn linkedin_post(id: &str, impressions: u64, likes: u64, created: DateTime<Utc>) -> LinkedInPost {
    LinkedInPost {
        id: id.to_string(),
        text: format!("Update {id}"),
        created_at: created,
        impression_count: impressions,
        like_count: likes,
        comment_count: 0,
        share_count: 0,
        click_count: 0,
        fetched_at: Utc::now(),
    }
}
