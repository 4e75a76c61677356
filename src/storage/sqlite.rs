//! SQLite-backed [`Store`]
//!
//! One table per record type. Timestamps are stored as RFC 3339 text with a
//! fixed nanosecond precision so that string comparison orders them
//! chronologically.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Store;
use crate::error::{Error, Result};
use crate::models::{
    AccountStats, AnalyticsSummary, ChannelStats, Comment, DataPoint, DateRange, Insight,
    InsightType, LinkedInPost, LinkedInProfileStats, Platform, PlatformMap, PlatformSummary,
    Tweet, Video, XUserStats,
};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS videos (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        published_at TEXT NOT NULL,
        view_count INTEGER NOT NULL,
        like_count INTEGER NOT NULL,
        comment_count INTEGER NOT NULL,
        fetched_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_videos_published ON videos(published_at);

    CREATE TABLE IF NOT EXISTS tweets (
        id TEXT PRIMARY KEY,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        impression_count INTEGER NOT NULL,
        like_count INTEGER NOT NULL,
        reply_count INTEGER NOT NULL,
        retweet_count INTEGER NOT NULL,
        quote_count INTEGER NOT NULL,
        fetched_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_tweets_created ON tweets(created_at);

    CREATE TABLE IF NOT EXISTS linkedin_posts (
        id TEXT PRIMARY KEY,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        impression_count INTEGER NOT NULL,
        like_count INTEGER NOT NULL,
        comment_count INTEGER NOT NULL,
        share_count INTEGER NOT NULL,
        click_count INTEGER NOT NULL,
        fetched_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_linkedin_posts_created ON linkedin_posts(created_at);

    CREATE TABLE IF NOT EXISTS comments (
        id TEXT NOT NULL,
        platform TEXT NOT NULL,
        content_id TEXT NOT NULL,
        author TEXT NOT NULL,
        text TEXT NOT NULL,
        like_count INTEGER NOT NULL,
        published_at TEXT NOT NULL,
        PRIMARY KEY (platform, id)
    );
    CREATE INDEX IF NOT EXISTS idx_comments_content ON comments(platform, content_id);

    CREATE TABLE IF NOT EXISTS channel_stats (
        channel_id TEXT NOT NULL,
        title TEXT NOT NULL,
        subscriber_count INTEGER NOT NULL,
        view_count INTEGER NOT NULL,
        video_count INTEGER NOT NULL,
        recorded_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS x_user_stats (
        user_id TEXT NOT NULL,
        username TEXT NOT NULL,
        followers_count INTEGER NOT NULL,
        following_count INTEGER NOT NULL,
        tweet_count INTEGER NOT NULL,
        listed_count INTEGER NOT NULL,
        recorded_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS linkedin_profile_stats (
        person_urn TEXT NOT NULL,
        follower_count INTEGER NOT NULL,
        recorded_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS insights (
        id TEXT PRIMARY KEY,
        platform TEXT,
        insight_type TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        confidence REAL NOT NULL,
        generated_at TEXT NOT NULL,
        range_start TEXT NOT NULL,
        range_end TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_insights_generated ON insights(generated_at);

    CREATE TABLE IF NOT EXISTS metric_points (
        platform TEXT NOT NULL,
        metric TEXT NOT NULL,
        recorded_at TEXT NOT NULL,
        value REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_metric_points_series
        ON metric_points(platform, metric, recorded_at);
"#;

/// SQLite implementation of [`Store`]
///
/// Uses `Mutex` to serialize access to the single connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self::with_connection(conn)?;
        tracing::info!(path = %path.display(), "SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::other("SQLite connection mutex poisoned"))
    }

    fn query_list<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let items = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn content_totals(&self, sql: &str, range: &DateRange) -> Result<PlatformSummary> {
        let conn = self.conn()?;
        let summary = conn.query_row(
            sql,
            params![ts_to_sql(range.start), ts_to_sql(range.end)],
            |row| {
                Ok(PlatformSummary {
                    impressions: get_u64(row, 0)?,
                    likes: get_u64(row, 1)?,
                    comments: get_u64(row, 2)?,
                    shares: get_u64(row, 3)?,
                    content_count: get_u64(row, 4)?,
                    followers: None,
                })
            },
        )?;
        Ok(summary)
    }
}

// ============================================================================
// Column helpers
// ============================================================================

fn ts_to_sql(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn get_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn get_u64(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    Ok(value.max(0) as u64)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn parse_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

fn video_from_row(row: &Row<'_>) -> rusqlite::Result<Video> {
    Ok(Video {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        published_at: get_ts(row, 3)?,
        view_count: get_u64(row, 4)?,
        like_count: get_u64(row, 5)?,
        comment_count: get_u64(row, 6)?,
        fetched_at: get_ts(row, 7)?,
    })
}

fn tweet_from_row(row: &Row<'_>) -> rusqlite::Result<Tweet> {
    Ok(Tweet {
        id: row.get(0)?,
        text: row.get(1)?,
        created_at: get_ts(row, 2)?,
        impression_count: get_u64(row, 3)?,
        like_count: get_u64(row, 4)?,
        reply_count: get_u64(row, 5)?,
        retweet_count: get_u64(row, 6)?,
        quote_count: get_u64(row, 7)?,
        fetched_at: get_ts(row, 8)?,
    })
}

fn linkedin_post_from_row(row: &Row<'_>) -> rusqlite::Result<LinkedInPost> {
    Ok(LinkedInPost {
        id: row.get(0)?,
        text: row.get(1)?,
        created_at: get_ts(row, 2)?,
        impression_count: get_u64(row, 3)?,
        like_count: get_u64(row, 4)?,
        comment_count: get_u64(row, 5)?,
        share_count: get_u64(row, 6)?,
        click_count: get_u64(row, 7)?,
        fetched_at: get_ts(row, 8)?,
    })
}

fn insight_from_row(row: &Row<'_>) -> rusqlite::Result<Insight> {
    let platform: Option<String> = row.get(1)?;
    let platform = platform
        .map(|p| {
            p.parse::<Platform>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
            })
        })
        .transpose()?;

    Ok(Insight {
        id: row.get(0)?,
        platform,
        insight_type: parse_text::<InsightType>(row, 2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        confidence: row.get(5)?,
        generated_at: get_ts(row, 6)?,
        date_range: DateRange::new(get_ts(row, 7)?, get_ts(row, 8)?),
    })
}

const VIDEO_COLUMNS: &str =
    "id, title, description, published_at, view_count, like_count, comment_count, fetched_at";
const TWEET_COLUMNS: &str = "id, text, created_at, impression_count, like_count, reply_count, \
     retweet_count, quote_count, fetched_at";
const LINKEDIN_POST_COLUMNS: &str = "id, text, created_at, impression_count, like_count, \
     comment_count, share_count, click_count, fetched_at";
const INSIGHT_COLUMNS: &str = "id, platform, insight_type, title, description, confidence, \
     generated_at, range_start, range_end";

#[async_trait]
impl Store for SqliteStore {
    async fn save_video(&self, video: &Video) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT OR REPLACE INTO videos ({VIDEO_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                video.id,
                video.title,
                video.description,
                ts_to_sql(video.published_at),
                to_i64(video.view_count),
                to_i64(video.like_count),
                to_i64(video.comment_count),
                ts_to_sql(video.fetched_at),
            ],
        )?;
        Ok(())
    }

    async fn get_video(&self, id: &str) -> Result<Option<Video>> {
        let conn = self.conn()?;
        let video = conn
            .query_row(
                &format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1"),
                params![id],
                video_from_row,
            )
            .optional()?;
        Ok(video)
    }

    async fn get_videos(&self, limit: usize, offset: usize) -> Result<Vec<Video>> {
        self.query_list(
            &format!(
                "SELECT {VIDEO_COLUMNS} FROM videos ORDER BY published_at DESC LIMIT ?1 OFFSET ?2"
            ),
            params![limit as i64, offset as i64],
            video_from_row,
        )
    }

    async fn get_videos_by_date_range(&self, range: &DateRange) -> Result<Vec<Video>> {
        self.query_list(
            &format!(
                "SELECT {VIDEO_COLUMNS} FROM videos WHERE published_at BETWEEN ?1 AND ?2 \
                 ORDER BY published_at DESC"
            ),
            params![ts_to_sql(range.start), ts_to_sql(range.end)],
            video_from_row,
        )
    }

    async fn save_tweet(&self, tweet: &Tweet) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT OR REPLACE INTO tweets ({TWEET_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                tweet.id,
                tweet.text,
                ts_to_sql(tweet.created_at),
                to_i64(tweet.impression_count),
                to_i64(tweet.like_count),
                to_i64(tweet.reply_count),
                to_i64(tweet.retweet_count),
                to_i64(tweet.quote_count),
                ts_to_sql(tweet.fetched_at),
            ],
        )?;
        Ok(())
    }

    async fn get_tweet(&self, id: &str) -> Result<Option<Tweet>> {
        let conn = self.conn()?;
        let tweet = conn
            .query_row(
                &format!("SELECT {TWEET_COLUMNS} FROM tweets WHERE id = ?1"),
                params![id],
                tweet_from_row,
            )
            .optional()?;
        Ok(tweet)
    }

    async fn get_tweets(&self, limit: usize, offset: usize) -> Result<Vec<Tweet>> {
        self.query_list(
            &format!(
                "SELECT {TWEET_COLUMNS} FROM tweets ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
            ),
            params![limit as i64, offset as i64],
            tweet_from_row,
        )
    }

    async fn get_tweets_by_date_range(&self, range: &DateRange) -> Result<Vec<Tweet>> {
        self.query_list(
            &format!(
                "SELECT {TWEET_COLUMNS} FROM tweets WHERE created_at BETWEEN ?1 AND ?2 \
                 ORDER BY created_at DESC"
            ),
            params![ts_to_sql(range.start), ts_to_sql(range.end)],
            tweet_from_row,
        )
    }

    async fn save_linkedin_post(&self, post: &LinkedInPost) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT OR REPLACE INTO linkedin_posts ({LINKEDIN_POST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                post.id,
                post.text,
                ts_to_sql(post.created_at),
                to_i64(post.impression_count),
                to_i64(post.like_count),
                to_i64(post.comment_count),
                to_i64(post.share_count),
                to_i64(post.click_count),
                ts_to_sql(post.fetched_at),
            ],
        )?;
        Ok(())
    }

    async fn get_linkedin_post(&self, id: &str) -> Result<Option<LinkedInPost>> {
        let conn = self.conn()?;
        let post = conn
            .query_row(
                &format!("SELECT {LINKEDIN_POST_COLUMNS} FROM linkedin_posts WHERE id = ?1"),
                params![id],
                linkedin_post_from_row,
            )
            .optional()?;
        Ok(post)
    }

    async fn get_linkedin_posts(&self, limit: usize, offset: usize) -> Result<Vec<LinkedInPost>> {
        self.query_list(
            &format!(
                "SELECT {LINKEDIN_POST_COLUMNS} FROM linkedin_posts \
                 ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
            ),
            params![limit as i64, offset as i64],
            linkedin_post_from_row,
        )
    }

    async fn get_linkedin_posts_by_date_range(
        &self,
        range: &DateRange,
    ) -> Result<Vec<LinkedInPost>> {
        self.query_list(
            &format!(
                "SELECT {LINKEDIN_POST_COLUMNS} FROM linkedin_posts \
                 WHERE created_at BETWEEN ?1 AND ?2 ORDER BY created_at DESC"
            ),
            params![ts_to_sql(range.start), ts_to_sql(range.end)],
            linkedin_post_from_row,
        )
    }

    async fn save_comment(&self, comment: &Comment) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO comments \
             (id, platform, content_id, author, text, like_count, published_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                comment.id,
                comment.platform.as_str(),
                comment.content_id,
                comment.author,
                comment.text,
                to_i64(comment.like_count),
                ts_to_sql(comment.published_at),
            ],
        )?;
        Ok(())
    }

    async fn get_comments(&self, platform: Platform, content_id: &str) -> Result<Vec<Comment>> {
        self.query_list(
            "SELECT id, platform, content_id, author, text, like_count, published_at \
             FROM comments WHERE platform = ?1 AND content_id = ?2 ORDER BY published_at ASC",
            params![platform.as_str(), content_id],
            |row| {
                Ok(Comment {
                    id: row.get(0)?,
                    platform: parse_text(row, 1)?,
                    content_id: row.get(2)?,
                    author: row.get(3)?,
                    text: row.get(4)?,
                    like_count: get_u64(row, 5)?,
                    published_at: get_ts(row, 6)?,
                })
            },
        )
    }

    async fn save_account_stats(&self, stats: &AccountStats) -> Result<()> {
        let conn = self.conn()?;
        match stats {
            AccountStats::YouTube(s) => conn.execute(
                "INSERT INTO channel_stats \
                 (channel_id, title, subscriber_count, view_count, video_count, recorded_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    s.channel_id,
                    s.title,
                    to_i64(s.subscriber_count),
                    to_i64(s.view_count),
                    to_i64(s.video_count),
                    ts_to_sql(s.recorded_at),
                ],
            )?,
            AccountStats::X(s) => conn.execute(
                "INSERT INTO x_user_stats \
                 (user_id, username, followers_count, following_count, tweet_count, listed_count, recorded_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    s.user_id,
                    s.username,
                    to_i64(s.followers_count),
                    to_i64(s.following_count),
                    to_i64(s.tweet_count),
                    to_i64(s.listed_count),
                    ts_to_sql(s.recorded_at),
                ],
            )?,
            AccountStats::LinkedIn(s) => conn.execute(
                "INSERT INTO linkedin_profile_stats (person_urn, follower_count, recorded_at) \
                 VALUES (?1, ?2, ?3)",
                params![s.person_urn, to_i64(s.follower_count), ts_to_sql(s.recorded_at)],
            )?,
        };
        Ok(())
    }

    async fn get_latest_account_stats(&self, platform: Platform) -> Result<Option<AccountStats>> {
        let conn = self.conn()?;
        let stats = match platform {
            Platform::YouTube => conn
                .query_row(
                    "SELECT channel_id, title, subscriber_count, view_count, video_count, recorded_at \
                     FROM channel_stats ORDER BY recorded_at DESC LIMIT 1",
                    [],
                    |row| {
                        Ok(AccountStats::YouTube(ChannelStats {
                            channel_id: row.get(0)?,
                            title: row.get(1)?,
                            subscriber_count: get_u64(row, 2)?,
                            view_count: get_u64(row, 3)?,
                            video_count: get_u64(row, 4)?,
                            recorded_at: get_ts(row, 5)?,
                        }))
                    },
                )
                .optional()?,
            Platform::X => conn
                .query_row(
                    "SELECT user_id, username, followers_count, following_count, tweet_count, \
                     listed_count, recorded_at FROM x_user_stats ORDER BY recorded_at DESC LIMIT 1",
                    [],
                    |row| {
                        Ok(AccountStats::X(XUserStats {
                            user_id: row.get(0)?,
                            username: row.get(1)?,
                            followers_count: get_u64(row, 2)?,
                            following_count: get_u64(row, 3)?,
                            tweet_count: get_u64(row, 4)?,
                            listed_count: get_u64(row, 5)?,
                            recorded_at: get_ts(row, 6)?,
                        }))
                    },
                )
                .optional()?,
            Platform::LinkedIn => conn
                .query_row(
                    "SELECT person_urn, follower_count, recorded_at FROM linkedin_profile_stats \
                     ORDER BY recorded_at DESC LIMIT 1",
                    [],
                    |row| {
                        Ok(AccountStats::LinkedIn(LinkedInProfileStats {
                            person_urn: row.get(0)?,
                            follower_count: get_u64(row, 1)?,
                            recorded_at: get_ts(row, 2)?,
                        }))
                    },
                )
                .optional()?,
        };
        Ok(stats)
    }

    async fn save_insight(&self, insight: &Insight) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT OR REPLACE INTO insights ({INSIGHT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                insight.id,
                insight.platform.map(|p| p.as_str()),
                insight.insight_type.as_str(),
                insight.title,
                insight.description,
                insight.confidence,
                ts_to_sql(insight.generated_at),
                ts_to_sql(insight.date_range.start),
                ts_to_sql(insight.date_range.end),
            ],
        )?;
        Ok(())
    }

    async fn get_insights(&self, platform: Platform, limit: usize) -> Result<Vec<Insight>> {
        self.query_list(
            &format!(
                "SELECT {INSIGHT_COLUMNS} FROM insights WHERE platform = ?1 \
                 ORDER BY generated_at DESC LIMIT ?2"
            ),
            params![platform.as_str(), limit as i64],
            insight_from_row,
        )
    }

    async fn get_recent_insights(&self, limit: usize) -> Result<Vec<Insight>> {
        self.query_list(
            &format!("SELECT {INSIGHT_COLUMNS} FROM insights ORDER BY generated_at DESC LIMIT ?1"),
            params![limit as i64],
            insight_from_row,
        )
    }

    async fn record_metric(&self, platform: Platform, metric: &str, point: DataPoint) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO metric_points (platform, metric, recorded_at, value) VALUES (?1, ?2, ?3, ?4)",
            params![platform.as_str(), metric, ts_to_sql(point.timestamp), point.value],
        )?;
        Ok(())
    }

    async fn get_metric_points(
        &self,
        platform: Platform,
        metric: &str,
        range: &DateRange,
    ) -> Result<Vec<DataPoint>> {
        self.query_list(
            "SELECT recorded_at, value FROM metric_points \
             WHERE platform = ?1 AND metric = ?2 AND recorded_at BETWEEN ?3 AND ?4 \
             ORDER BY recorded_at ASC",
            params![
                platform.as_str(),
                metric,
                ts_to_sql(range.start),
                ts_to_sql(range.end)
            ],
            |row| Ok(DataPoint::new(get_ts(row, 0)?, row.get(1)?)),
        )
    }

    async fn get_analytics_summary(&self, range: &DateRange) -> Result<AnalyticsSummary> {
        let mut platforms = PlatformMap::<PlatformSummary>::default();

        platforms.set(
            Platform::YouTube,
            self.content_totals(
                "SELECT COALESCE(SUM(view_count), 0), COALESCE(SUM(like_count), 0), \
                 COALESCE(SUM(comment_count), 0), 0, COUNT(*) \
                 FROM videos WHERE published_at BETWEEN ?1 AND ?2",
                range,
            )?,
        );
        platforms.set(
            Platform::X,
            self.content_totals(
                "SELECT COALESCE(SUM(impression_count), 0), COALESCE(SUM(like_count), 0), \
                 COALESCE(SUM(reply_count), 0), COALESCE(SUM(retweet_count + quote_count), 0), \
                 COUNT(*) FROM tweets WHERE created_at BETWEEN ?1 AND ?2",
                range,
            )?,
        );
        platforms.set(
            Platform::LinkedIn,
            self.content_totals(
                "SELECT COALESCE(SUM(impression_count), 0), COALESCE(SUM(like_count), 0), \
                 COALESCE(SUM(comment_count), 0), COALESCE(SUM(share_count), 0), COUNT(*) \
                 FROM linkedin_posts WHERE created_at BETWEEN ?1 AND ?2",
                range,
            )?,
        );

        for platform in Platform::ALL {
            platforms.get_mut(platform).followers = self
                .get_latest_account_stats(platform)
                .await?
                .map(|s| s.followers());
        }

        Ok(AnalyticsSummary {
            date_range: *range,
            platforms,
        })
    }
}
