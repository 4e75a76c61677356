//! Persistence for content, account snapshots, metric points and insights
//!
//! Business logic talks to the [`Store`] trait only, so the analytics engine
//! and the jobs can run against SQLite in production and an in-process store
//! in tests.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │   jobs / TrendAnalyzer / Aggregator / API     │
//! └───────────────────────┬───────────────────────┘
//!                         ▼
//!                  ┌─────────────┐
//!                  │ Store trait │
//!                  └──────┬──────┘
//!              ┌──────────┴──────────┐
//!              ▼                     ▼
//!       ┌─────────────┐       ┌─────────────┐
//!       │ SqliteStore │       │ MemoryStore │
//!       └─────────────┘       └─────────────┘
//! ```

pub mod memory;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AccountStats, AnalyticsSummary, Comment, DataPoint, DateRange, Insight, LinkedInPost,
    Platform, PlatformContent, PlatformMap, PlatformSummary, Tweet, Video,
};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage collaborator used by the jobs, the analytics engine and the API
///
/// Content listings are most recent first. Metric points are returned in
/// ascending timestamp order.
#[async_trait]
pub trait Store: Send + Sync {
    // --- YouTube videos -----------------------------------------------------

    /// Insert or replace a video by id
    async fn save_video(&self, video: &Video) -> Result<()>;

    async fn get_video(&self, id: &str) -> Result<Option<Video>>;

    async fn get_videos(&self, limit: usize, offset: usize) -> Result<Vec<Video>>;

    /// Videos published inside `range`
    async fn get_videos_by_date_range(&self, range: &DateRange) -> Result<Vec<Video>>;

    // --- X posts ------------------------------------------------------------

    async fn save_tweet(&self, tweet: &Tweet) -> Result<()>;

    async fn get_tweet(&self, id: &str) -> Result<Option<Tweet>>;

    async fn get_tweets(&self, limit: usize, offset: usize) -> Result<Vec<Tweet>>;

    async fn get_tweets_by_date_range(&self, range: &DateRange) -> Result<Vec<Tweet>>;

    // --- LinkedIn posts -----------------------------------------------------

    async fn save_linkedin_post(&self, post: &LinkedInPost) -> Result<()>;

    async fn get_linkedin_post(&self, id: &str) -> Result<Option<LinkedInPost>>;

    async fn get_linkedin_posts(&self, limit: usize, offset: usize)
        -> Result<Vec<LinkedInPost>>;

    async fn get_linkedin_posts_by_date_range(
        &self,
        range: &DateRange,
    ) -> Result<Vec<LinkedInPost>>;

    // --- Comments -----------------------------------------------------------

    async fn save_comment(&self, comment: &Comment) -> Result<()>;

    /// Comments on one content item, oldest first
    async fn get_comments(&self, platform: Platform, content_id: &str) -> Result<Vec<Comment>>;

    // --- Account statistics -------------------------------------------------

    /// Append an account snapshot
    async fn save_account_stats(&self, stats: &AccountStats) -> Result<()>;

    /// Most recently recorded snapshot for `platform`
    async fn get_latest_account_stats(&self, platform: Platform) -> Result<Option<AccountStats>>;

    // --- Insights -----------------------------------------------------------

    async fn save_insight(&self, insight: &Insight) -> Result<()>;

    /// Insights about `platform`, newest first
    async fn get_insights(&self, platform: Platform, limit: usize) -> Result<Vec<Insight>>;

    /// Insights of any platform, newest first
    async fn get_recent_insights(&self, limit: usize) -> Result<Vec<Insight>>;

    // --- Metric series ------------------------------------------------------

    /// Append one observation of `metric` for `platform`
    async fn record_metric(&self, platform: Platform, metric: &str, point: DataPoint)
        -> Result<()>;

    /// Points recorded inside `range`, ascending by timestamp
    async fn get_metric_points(
        &self,
        platform: Platform,
        metric: &str,
        range: &DateRange,
    ) -> Result<Vec<DataPoint>>;

    /// Points recorded over the trailing `days` days
    async fn get_trend_data(
        &self,
        platform: Platform,
        metric: &str,
        days: u32,
    ) -> Result<Vec<DataPoint>> {
        self.get_metric_points(platform, metric, &DateRange::last_days(days)?)
            .await
    }

    // --- Aggregates ---------------------------------------------------------

    /// Per-platform totals over content published inside `range`
    async fn get_analytics_summary(&self, range: &DateRange) -> Result<AnalyticsSummary> {
        let mut platforms = PlatformMap::<PlatformSummary>::default();

        for platform in Platform::ALL {
            let mut summary = self
                .get_content_by_date_range(platform, range)
                .await?
                .summary();
            summary.followers = self
                .get_latest_account_stats(platform)
                .await?
                .map(|s| s.followers());
            platforms.set(platform, summary);
        }

        Ok(AnalyticsSummary {
            date_range: *range,
            platforms,
        })
    }

    // --- Per-platform helpers -----------------------------------------------

    /// Save every item of a content list
    async fn save_content(&self, content: &PlatformContent) -> Result<()> {
        match content {
            PlatformContent::YouTube(items) => {
                for item in items {
                    self.save_video(item).await?;
                }
            }
            PlatformContent::X(items) => {
                for item in items {
                    self.save_tweet(item).await?;
                }
            }
            PlatformContent::LinkedIn(items) => {
                for item in items {
                    self.save_linkedin_post(item).await?;
                }
            }
        }
        Ok(())
    }

    /// Most recent content of one platform
    async fn get_content(&self, platform: Platform, limit: usize) -> Result<PlatformContent> {
        Ok(match platform {
            Platform::YouTube => PlatformContent::YouTube(self.get_videos(limit, 0).await?),
            Platform::X => PlatformContent::X(self.get_tweets(limit, 0).await?),
            Platform::LinkedIn => {
                PlatformContent::LinkedIn(self.get_linkedin_posts(limit, 0).await?)
            }
        })
    }

    /// Content of one platform published inside `range`
    async fn get_content_by_date_range(
        &self,
        platform: Platform,
        range: &DateRange,
    ) -> Result<PlatformContent> {
        Ok(match platform {
            Platform::YouTube => {
                PlatformContent::YouTube(self.get_videos_by_date_range(range).await?)
            }
            Platform::X => PlatformContent::X(self.get_tweets_by_date_range(range).await?),
            Platform::LinkedIn => {
                PlatformContent::LinkedIn(self.get_linkedin_posts_by_date_range(range).await?)
            }
        })
    }
}

/// Thread-safe shared store
pub type SharedStore = Arc<dyn Store>;

/// Open (or create) a shared SQLite store
pub fn create_sqlite_store(path: impl AsRef<Path>) -> Result<SharedStore> {
    Ok(Arc::new(SqliteStore::new(path)?))
}

/// Create a shared in-memory store
pub fn create_memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).unwrap()
    }

    fn create_test_stores() -> Vec<Box<dyn Store>> {
        vec![
            Box::new(SqliteStore::in_memory().unwrap()),
            Box::new(MemoryStore::new()),
        ]
    }

    fn video(id: &str, day: u32, views: u64, likes: u64) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            description: String::new(),
            published_at: ts(day),
            view_count: views,
            like_count: likes,
            comment_count: 1,
            fetched_at: ts(day),
        }
    }

    fn tweet(id: &str, day: u32, impressions: u64) -> Tweet {
        Tweet {
            id: id.to_string(),
            text: "hello".to_string(),
            created_at: ts(day),
            impression_count: impressions,
            like_count: 4,
            reply_count: 1,
            retweet_count: 2,
            quote_count: 1,
            fetched_at: ts(day),
        }
    }

    fn post(id: &str, day: u32) -> LinkedInPost {
        LinkedInPost {
            id: id.to_string(),
            text: "update".to_string(),
            created_at: ts(day),
            impression_count: 0,
            like_count: 3,
            comment_count: 0,
            share_count: 0,
            click_count: 7,
            fetched_at: ts(day),
        }
    }

    #[tokio::test]
    async fn test_video_roundtrip_and_ordering() {
        for store in create_test_stores() {
            store.save_video(&video("a", 1, 100, 5)).await.unwrap();
            store.save_video(&video("b", 3, 200, 9)).await.unwrap();
            store.save_video(&video("c", 2, 50, 1)).await.unwrap();

            let all = store.get_videos(10, 0).await.unwrap();
            let ids: Vec<_> = all.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(ids, vec!["b", "c", "a"]);

            let page = store.get_videos(1, 1).await.unwrap();
            assert_eq!(page[0].id, "c");

            let fetched = store.get_video("a").await.unwrap().unwrap();
            assert_eq!(fetched, video("a", 1, 100, 5));
            assert!(store.get_video("zzz").await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_save_replaces_existing_item() {
        for store in create_test_stores() {
            store.save_tweet(&tweet("t1", 1, 10)).await.unwrap();
            store.save_tweet(&tweet("t1", 1, 99)).await.unwrap();

            let tweets = store.get_tweets(10, 0).await.unwrap();
            assert_eq!(tweets.len(), 1);
            assert_eq!(tweets[0].impression_count, 99);
        }
    }

    #[tokio::test]
    async fn test_content_by_date_range() {
        for store in create_test_stores() {
            for day in 1..=5 {
                store.save_linkedin_post(&post(&format!("p{day}"), day)).await.unwrap();
            }
            let range = DateRange::new(ts(2), ts(4));
            let posts = store.get_linkedin_posts_by_date_range(&range).await.unwrap();
            assert_eq!(posts.len(), 3);
            assert!(posts.iter().all(|p| range.contains(p.created_at)));
        }
    }

    #[tokio::test]
    async fn test_comments_per_content_item() {
        for store in create_test_stores() {
            for (i, content_id) in ["v1", "v1", "v2"].iter().enumerate() {
                store
                    .save_comment(&Comment {
                        id: format!("c{i}"),
                        platform: Platform::YouTube,
                        content_id: content_id.to_string(),
                        author: "viewer".to_string(),
                        text: "nice".to_string(),
                        like_count: i as u64,
                        published_at: ts(i as u32 + 1),
                    })
                    .await
                    .unwrap();
            }

            let comments = store.get_comments(Platform::YouTube, "v1").await.unwrap();
            assert_eq!(comments.len(), 2);
            assert_eq!(comments[0].id, "c0");
            assert!(store.get_comments(Platform::X, "v1").await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_latest_account_stats() {
        for store in create_test_stores() {
            assert!(store
                .get_latest_account_stats(Platform::X)
                .await
                .unwrap()
                .is_none());

            for (day, followers) in [(1, 100), (3, 130), (2, 120)] {
                store
                    .save_account_stats(&AccountStats::X(crate::models::XUserStats {
                        user_id: "42".to_string(),
                        username: "forge".to_string(),
                        followers_count: followers,
                        following_count: 10,
                        tweet_count: 5,
                        listed_count: 0,
                        recorded_at: ts(day),
                    }))
                    .await
                    .unwrap();
            }

            let latest = store
                .get_latest_account_stats(Platform::X)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(latest.followers(), 130);
            assert!(store
                .get_latest_account_stats(Platform::YouTube)
                .await
                .unwrap()
                .is_none());
        }
    }

    #[tokio::test]
    async fn test_insights_newest_first() {
        for store in create_test_stores() {
            let range = DateRange::new(ts(1), ts(7));
            let mut first = Insight::new(
                Some(Platform::YouTube),
                crate::models::InsightType::Trend,
                "Views up",
                "Views grew",
                0.7,
                range,
            );
            first.generated_at = ts(2);
            let mut second = Insight::new(
                None,
                crate::models::InsightType::Summary,
                "Weekly summary",
                "All good",
                0.8,
                range,
            );
            second.generated_at = ts(3);

            store.save_insight(&first).await.unwrap();
            store.save_insight(&second).await.unwrap();

            let recent = store.get_recent_insights(10).await.unwrap();
            assert_eq!(recent.len(), 2);
            assert_eq!(recent[0].id, second.id);
            assert_eq!(recent[1], first);

            let yt = store.get_insights(Platform::YouTube, 10).await.unwrap();
            assert_eq!(yt.len(), 1);
            assert!(store.get_insights(Platform::X, 10).await.unwrap().is_empty());
            assert_eq!(store.get_recent_insights(1).await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_metric_points_sorted_and_filtered() {
        for store in create_test_stores() {
            for (day, value) in [(3, 30.0), (1, 10.0), (2, 20.0), (6, 60.0)] {
                store
                    .record_metric(Platform::X, "impressions", DataPoint::new(ts(day), value))
                    .await
                    .unwrap();
            }
            store
                .record_metric(Platform::X, "followers", DataPoint::new(ts(2), 5.0))
                .await
                .unwrap();

            let points = store
                .get_metric_points(Platform::X, "impressions", &DateRange::new(ts(1), ts(3)))
                .await
                .unwrap();
            let values: Vec<_> = points.iter().map(|p| p.value).collect();
            assert_eq!(values, vec![10.0, 20.0, 30.0]);
        }
    }

    #[tokio::test]
    async fn test_trend_data_uses_trailing_window() {
        for store in create_test_stores() {
            let now = Utc::now();
            store
                .record_metric(
                    Platform::LinkedIn,
                    "impressions",
                    DataPoint::new(now - chrono::Duration::days(40), 1.0),
                )
                .await
                .unwrap();
            store
                .record_metric(
                    Platform::LinkedIn,
                    "impressions",
                    DataPoint::new(now - chrono::Duration::days(2), 2.0),
                )
                .await
                .unwrap();

            let points = store
                .get_trend_data(Platform::LinkedIn, "impressions", 30)
                .await
                .unwrap();
            assert_eq!(points.len(), 1);
            assert_eq!(points[0].value, 2.0);
        }
    }

    #[tokio::test]
    async fn test_analytics_summary() {
        for store in create_test_stores() {
            store.save_video(&video("a", 2, 1000, 40)).await.unwrap();
            store.save_video(&video("b", 3, 500, 10)).await.unwrap();
            store.save_video(&video("old", 20, 9999, 999)).await.unwrap();
            store.save_tweet(&tweet("t", 2, 200)).await.unwrap();
            store.save_linkedin_post(&post("p", 2)).await.unwrap();

            let summary = store
                .get_analytics_summary(&DateRange::new(ts(1), ts(10)))
                .await
                .unwrap();

            let yt = summary.platform(Platform::YouTube);
            assert_eq!(yt.impressions, 1500);
            assert_eq!(yt.likes, 50);
            assert_eq!(yt.comments, 2);
            assert_eq!(yt.content_count, 2);
            assert!(yt.followers.is_none());

            let x = summary.platform(Platform::X);
            assert_eq!(x.shares, 3);
            assert!((x.engagement_rate() - 8.0 / 200.0).abs() < 1e-12);

            let li = summary.platform(Platform::LinkedIn);
            assert_eq!(li.impressions, 0);
            assert_eq!(li.engagement_rate(), 0.0);
        }
    }

    #[tokio::test]
    async fn test_save_and_get_content() {
        for store in create_test_stores() {
            let content = PlatformContent::X(vec![tweet("1", 1, 10), tweet("2", 2, 20)]);
            store.save_content(&content).await.unwrap();

            let loaded = store.get_content(Platform::X, 1).await.unwrap();
            assert_eq!(loaded.platform(), Platform::X);
            assert_eq!(loaded.len(), 1);
            assert!(store.get_content(Platform::YouTube, 5).await.unwrap().is_empty());
        }
    }
}
