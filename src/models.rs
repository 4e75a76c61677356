// Core data structures shared by the collectors, storage and analytics

use chrono::{DateTime, Duration, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Metric name for YouTube view counts
pub const METRIC_VIEWS: &str = "views";
/// Metric name for X / LinkedIn impression counts
pub const METRIC_IMPRESSIONS: &str = "impressions";
/// Metric name for follower / subscriber counts
pub const METRIC_FOLLOWERS: &str = "followers";
/// Metric name for the engagement rate (0.0 - 1.0)
pub const METRIC_ENGAGEMENT: &str = "engagement";

/// Content platform
///
/// The declaration order is significant: it is the tiebreak order used by
/// cross-platform comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    X,
    LinkedIn,
}

impl Platform {
    /// All platforms in enum order
    pub const ALL: [Platform; 3] = [Platform::YouTube, Platform::X, Platform::LinkedIn];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::X => "x",
            Self::LinkedIn => "linkedin",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::X => "X",
            Self::LinkedIn => "LinkedIn",
        }
    }

    /// Position in [`Platform::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Metric that drives the dashboard trend for this platform
    pub fn primary_metric(&self) -> &'static str {
        match self {
            Self::YouTube => METRIC_VIEWS,
            Self::X | Self::LinkedIn => METRIC_IMPRESSIONS,
        }
    }

    /// Metrics shown on the platform detail view
    pub fn key_metrics(&self) -> [&'static str; 3] {
        [self.primary_metric(), METRIC_FOLLOWERS, METRIC_ENGAGEMENT]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" | "yt" => Ok(Self::YouTube),
            "x" | "twitter" => Ok(Self::X),
            "linkedin" => Ok(Self::LinkedIn),
            other => Err(format!(
                "Unknown platform '{other}'. Valid options: youtube, x, linkedin"
            )),
        }
    }
}

/// Fixed-size map keyed by [`Platform`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformMap<T> {
    values: [T; 3],
}

impl<T> PlatformMap<T> {
    /// Build a map by evaluating `f` for every platform
    pub fn from_fn(f: impl FnMut(Platform) -> T) -> Self {
        Self {
            values: Platform::ALL.map(f),
        }
    }

    pub fn get(&self, platform: Platform) -> &T {
        &self.values[platform.index()]
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut T {
        &mut self.values[platform.index()]
    }

    pub fn set(&mut self, platform: Platform, value: T) {
        self.values[platform.index()] = value;
    }

    /// Iterate in enum order
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &T)> {
        Platform::ALL.into_iter().zip(self.values.iter())
    }
}

impl<T: Serialize> Serialize for PlatformMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Platform::ALL.len()))?;
        for (platform, value) in self.iter() {
            map.serialize_entry(platform.as_str(), value)?;
        }
        map.end()
    }
}

/// Single observation of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Inclusive time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Trailing window of `days` ending now
    ///
    /// Fails with [`crate::error::Error::InvalidInput`] when the start would fall outside
    /// the representable date range.
    pub fn last_days(days: u32) -> crate::error::Result<Self> {
        let end = Utc::now();
        let start = Duration::try_days(i64::from(days))
            .and_then(|window| end.checked_sub_signed(window))
            .ok_or_else(|| {
                crate::error::Error::invalid_input(format!("window of {days} days is out of range"))
            })?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// Engagement rate: interactions per impression, 0 when nothing was shown
pub fn engagement_rate(interactions: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    interactions as f64 / impressions as f64
}

/// Engagement counters common to every content type
pub trait EngagementMetrics {
    fn published_at(&self) -> DateTime<Utc>;

    /// Views for YouTube, impressions elsewhere
    fn impressions(&self) -> u64;

    fn likes(&self) -> u64;

    fn comments(&self) -> u64;

    fn shares(&self) -> u64;

    fn interactions(&self) -> u64 {
        self.likes() + self.comments() + self.shares()
    }
}

/// YouTube video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub fetched_at: DateTime<Utc>,
}

impl EngagementMetrics for Video {
    fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
    fn impressions(&self) -> u64 {
        self.view_count
    }
    fn likes(&self) -> u64 {
        self.like_count
    }
    fn comments(&self) -> u64 {
        self.comment_count
    }
    fn shares(&self) -> u64 {
        0
    }
}

/// X post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub impression_count: u64,
    pub like_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
    pub quote_count: u64,
    pub fetched_at: DateTime<Utc>,
}

impl EngagementMetrics for Tweet {
    fn published_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn impressions(&self) -> u64 {
        self.impression_count
    }
    fn likes(&self) -> u64 {
        self.like_count
    }
    fn comments(&self) -> u64 {
        self.reply_count
    }
    fn shares(&self) -> u64 {
        self.retweet_count + self.quote_count
    }
}

/// LinkedIn post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedInPost {
    /// Post URN (e.g. `urn:li:share:123`)
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub impression_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub click_count: u64,
    pub fetched_at: DateTime<Utc>,
}

impl EngagementMetrics for LinkedInPost {
    fn published_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn impressions(&self) -> u64 {
        self.impression_count
    }
    fn likes(&self) -> u64 {
        self.like_count
    }
    fn comments(&self) -> u64 {
        self.comment_count
    }
    fn shares(&self) -> u64 {
        self.share_count
    }
}

/// Per-platform content list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "platform", content = "items", rename_all = "lowercase")]
pub enum PlatformContent {
    YouTube(Vec<Video>),
    X(Vec<Tweet>),
    LinkedIn(Vec<LinkedInPost>),
}

impl PlatformContent {
    /// Empty list for a platform
    pub fn empty(platform: Platform) -> Self {
        match platform {
            Platform::YouTube => Self::YouTube(Vec::new()),
            Platform::X => Self::X(Vec::new()),
            Platform::LinkedIn => Self::LinkedIn(Vec::new()),
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::YouTube(_) => Platform::YouTube,
            Self::X(_) => Platform::X,
            Self::LinkedIn(_) => Platform::LinkedIn,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::YouTube(items) => items.len(),
            Self::X(items) => items.len(),
            Self::LinkedIn(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Engagement totals over every item; `followers` is left unset
    pub fn summary(&self) -> PlatformSummary {
        match self {
            Self::YouTube(items) => PlatformSummary::from_content(items),
            Self::X(items) => PlatformSummary::from_content(items),
            Self::LinkedIn(items) => PlatformSummary::from_content(items),
        }
    }

    /// Keep the `limit` items with the most interactions, most recent first on ties
    #[must_use]
    pub fn top_by_engagement(self, limit: usize) -> Self {
        match self {
            Self::YouTube(items) => Self::YouTube(rank_by_engagement(items, limit)),
            Self::X(items) => Self::X(rank_by_engagement(items, limit)),
            Self::LinkedIn(items) => Self::LinkedIn(rank_by_engagement(items, limit)),
        }
    }
}

fn rank_by_engagement<T: EngagementMetrics>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.sort_by(|a, b| {
        b.interactions()
            .cmp(&a.interactions())
            .then_with(|| b.published_at().cmp(&a.published_at()))
    });
    items.truncate(limit);
    items
}

/// Comment on a piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub platform: Platform,
    pub content_id: String,
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: DateTime<Utc>,
}

/// YouTube channel statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel_id: String,
    pub title: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
    pub recorded_at: DateTime<Utc>,
}

/// X account statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XUserStats {
    pub user_id: String,
    pub username: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub tweet_count: u64,
    pub listed_count: u64,
    pub recorded_at: DateTime<Utc>,
}

/// LinkedIn profile statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedInProfileStats {
    pub person_urn: String,
    pub follower_count: u64,
    pub recorded_at: DateTime<Utc>,
}

/// Account-level statistics for any platform
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "platform", content = "stats", rename_all = "lowercase")]
pub enum AccountStats {
    YouTube(ChannelStats),
    X(XUserStats),
    LinkedIn(LinkedInProfileStats),
}

impl AccountStats {
    pub fn platform(&self) -> Platform {
        match self {
            Self::YouTube(_) => Platform::YouTube,
            Self::X(_) => Platform::X,
            Self::LinkedIn(_) => Platform::LinkedIn,
        }
    }

    /// Subscribers for YouTube, followers elsewhere
    pub fn followers(&self) -> u64 {
        match self {
            Self::YouTube(s) => s.subscriber_count,
            Self::X(s) => s.followers_count,
            Self::LinkedIn(s) => s.follower_count,
        }
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            Self::YouTube(s) => s.recorded_at,
            Self::X(s) => s.recorded_at,
            Self::LinkedIn(s) => s.recorded_at,
        }
    }
}

/// Aggregate totals for one platform over a date range
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlatformSummary {
    /// Views for YouTube, impressions elsewhere
    pub impressions: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub content_count: u64,
    /// Latest known follower / subscriber count
    pub followers: Option<u64>,
}

impl PlatformSummary {
    /// Sum the engagement counters of `items`
    pub fn from_content<T: EngagementMetrics>(items: &[T]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            acc.impressions += item.impressions();
            acc.likes += item.likes();
            acc.comments += item.comments();
            acc.shares += item.shares();
            acc.content_count += 1;
            acc
        })
    }

    pub fn interactions(&self) -> u64 {
        self.likes + self.comments + self.shares
    }

    pub fn engagement_rate(&self) -> f64 {
        engagement_rate(self.interactions(), self.impressions)
    }
}

/// Cross-platform totals over a date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub date_range: DateRange,
    pub platforms: PlatformMap<PlatformSummary>,
}

impl AnalyticsSummary {
    pub fn platform(&self, platform: Platform) -> &PlatformSummary {
        self.platforms.get(platform)
    }

    pub fn total_impressions(&self) -> u64 {
        self.platforms.iter().map(|(_, s)| s.impressions).sum()
    }
}

/// Kind of insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Summary,
    Trend,
    Anomaly,
    Suggestion,
    Comparison,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Trend => "trend",
            Self::Anomaly => "anomaly",
            Self::Suggestion => "suggestion",
            Self::Comparison => "comparison",
        }
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Self::Summary),
            "trend" => Ok(Self::Trend),
            "anomaly" => Ok(Self::Anomaly),
            "suggestion" => Ok(Self::Suggestion),
            "comparison" => Ok(Self::Comparison),
            other => Err(format!("Unknown insight type '{other}'")),
        }
    }
}

/// Generated observation about the analytics data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    /// `None` for cross-platform insights
    pub platform: Option<Platform>,
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
    pub date_range: DateRange,
}

impl Insight {
    /// Create an insight with a fresh id, clamping confidence into [0, 1]
    pub fn new(
        platform: Option<Platform>,
        insight_type: InsightType,
        title: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
        date_range: DateRange,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            platform,
            insight_type,
            title: title.into(),
            description: description.into(),
            confidence: confidence.clamp(0.0, 1.0),
            generated_at: Utc::now(),
            date_range,
        }
    }
}
