//! In-process [`Store`] used by tests and as a fallback when no database is configured

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::error::Result;
use crate::models::{
    AccountStats, Comment, DataPoint, DateRange, Insight, LinkedInPost, Platform, PlatformMap,
    Tweet, Video,
};

#[derive(Default)]
struct Tables {
    videos: HashMap<String, Video>,
    tweets: HashMap<String, Tweet>,
    linkedin_posts: HashMap<String, LinkedInPost>,
    comments: Vec<Comment>,
    account_stats: PlatformMap<Vec<AccountStats>>,
    insights: Vec<Insight>,
    metrics: HashMap<(Platform, String), Vec<DataPoint>>,
}

/// In-memory implementation of [`Store`]
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored content items across all platforms
    pub async fn content_len(&self) -> usize {
        let t = self.tables.read().await;
        t.videos.len() + t.tweets.len() + t.linkedin_posts.len()
    }

    /// Drop everything
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

/// Newest first, then paginate
fn page<T: Clone>(
    items: &HashMap<String, T>,
    published: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
    limit: usize,
    offset: usize,
) -> Vec<T> {
    let mut all: Vec<&T> = items.values().collect();
    all.sort_by_key(|item| std::cmp::Reverse(published(item)));
    all.into_iter().skip(offset).take(limit).cloned().collect()
}

fn in_range<T: Clone>(
    items: &HashMap<String, T>,
    published: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
    range: &DateRange,
) -> Vec<T> {
    let mut matching: Vec<&T> = items
        .values()
        .filter(|item| range.contains(published(item)))
        .collect();
    matching.sort_by_key(|item| std::cmp::Reverse(published(item)));
    matching.into_iter().cloned().collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn save_video(&self, video: &Video) -> Result<()> {
        self.tables
            .write()
            .await
            .videos
            .insert(video.id.clone(), video.clone());
        Ok(())
    }

    async fn get_video(&self, id: &str) -> Result<Option<Video>> {
        Ok(self.tables.read().await.videos.get(id).cloned())
    }

    async fn get_videos(&self, limit: usize, offset: usize) -> Result<Vec<Video>> {
        let t = self.tables.read().await;
        Ok(page(&t.videos, |v| v.published_at, limit, offset))
    }

    async fn get_videos_by_date_range(&self, range: &DateRange) -> Result<Vec<Video>> {
        let t = self.tables.read().await;
        Ok(in_range(&t.videos, |v| v.published_at, range))
    }

    async fn save_tweet(&self, tweet: &Tweet) -> Result<()> {
        self.tables
            .write()
            .await
            .tweets
            .insert(tweet.id.clone(), tweet.clone());
        Ok(())
    }

    async fn get_tweet(&self, id: &str) -> Result<Option<Tweet>> {
        Ok(self.tables.read().await.tweets.get(id).cloned())
    }

    async fn get_tweets(&self, limit: usize, offset: usize) -> Result<Vec<Tweet>> {
        let t = self.tables.read().await;
        Ok(page(&t.tweets, |tw| tw.created_at, limit, offset))
    }

    async fn get_tweets_by_date_range(&self, range: &DateRange) -> Result<Vec<Tweet>> {
        let t = self.tables.read().await;
        Ok(in_range(&t.tweets, |tw| tw.created_at, range))
    }

    async fn save_linkedin_post(&self, post: &LinkedInPost) -> Result<()> {
        self.tables
            .write()
            .await
            .linkedin_posts
            .insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn get_linkedin_post(&self, id: &str) -> Result<Option<LinkedInPost>> {
        Ok(self.tables.read().await.linkedin_posts.get(id).cloned())
    }

    async fn get_linkedin_posts(&self, limit: usize, offset: usize) -> Result<Vec<LinkedInPost>> {
        let t = self.tables.read().await;
        Ok(page(&t.linkedin_posts, |p| p.created_at, limit, offset))
    }

    async fn get_linkedin_posts_by_date_range(
        &self,
        range: &DateRange,
    ) -> Result<Vec<LinkedInPost>> {
        let t = self.tables.read().await;
        Ok(in_range(&t.linkedin_posts, |p| p.created_at, range))
    }

    async fn save_comment(&self, comment: &Comment) -> Result<()> {
        let mut t = self.tables.write().await;
        t.comments
            .retain(|c| !(c.platform == comment.platform && c.id == comment.id));
        t.comments.push(comment.clone());
        Ok(())
    }

    async fn get_comments(&self, platform: Platform, content_id: &str) -> Result<Vec<Comment>> {
        let t = self.tables.read().await;
        let mut comments: Vec<Comment> = t
            .comments
            .iter()
            .filter(|c| c.platform == platform && c.content_id == content_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.published_at);
        Ok(comments)
    }

    async fn save_account_stats(&self, stats: &AccountStats) -> Result<()> {
        self.tables
            .write()
            .await
            .account_stats
            .get_mut(stats.platform())
            .push(stats.clone());
        Ok(())
    }

    async fn get_latest_account_stats(&self, platform: Platform) -> Result<Option<AccountStats>> {
        let t = self.tables.read().await;
        Ok(t.account_stats
            .get(platform)
            .iter()
            .max_by_key(|s| s.recorded_at())
            .cloned())
    }

    async fn save_insight(&self, insight: &Insight) -> Result<()> {
        let mut t = self.tables.write().await;
        t.insights.retain(|i| i.id != insight.id);
        t.insights.push(insight.clone());
        Ok(())
    }

    async fn get_insights(&self, platform: Platform, limit: usize) -> Result<Vec<Insight>> {
        let t = self.tables.read().await;
        let mut insights: Vec<Insight> = t
            .insights
            .iter()
            .filter(|i| i.platform == Some(platform))
            .cloned()
            .collect();
        insights.sort_by_key(|i| std::cmp::Reverse(i.generated_at));
        insights.truncate(limit);
        Ok(insights)
    }

    async fn get_recent_insights(&self, limit: usize) -> Result<Vec<Insight>> {
        let t = self.tables.read().await;
        let mut insights = t.insights.clone();
        insights.sort_by_key(|i| std::cmp::Reverse(i.generated_at));
        insights.truncate(limit);
        Ok(insights)
    }

    async fn record_metric(&self, platform: Platform, metric: &str, point: DataPoint) -> Result<()> {
        self.tables
            .write()
            .await
            .metrics
            .entry((platform, metric.to_string()))
            .or_default()
            .push(point);
        Ok(())
    }

    async fn get_metric_points(
        &self,
        platform: Platform,
        metric: &str,
        range: &DateRange,
    ) -> Result<Vec<DataPoint>> {
        let t = self.tables.read().await;
        let mut points: Vec<DataPoint> = t
            .metrics
            .get(&(platform, metric.to_string()))
            .map(|series| {
                series
                    .iter()
                    .filter(|p| range.contains(p.timestamp))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_clear_and_len() {
        let store = MemoryStore::new();
        assert_eq!(store.content_len().await, 0);

        store
            .save_video(&Video {
                id: "v".to_string(),
                title: "t".to_string(),
                description: String::new(),
                published_at: Utc::now(),
                view_count: 1,
                like_count: 0,
                comment_count: 0,
                fetched_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(store.content_len().await, 1);

        store.clear().await;
        assert_eq!(store.content_len().await, 0);
    }
}
