//! Integration tests for the platform clients using wiremock

use crossforge::config::{LinkedInConfig, XConfig, YouTubeConfig};
use crossforge::error::{CrossforgeErrorTrait, ErrorCategory};
use crossforge::models::{AccountStats, PlatformContent};
use crossforge::platforms::{ClientError, LinkedInClient, PlatformClient, XClient, YouTubeClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// YouTube
// ============================================================================

fn youtube_config() -> YouTubeConfig {
    YouTubeConfig {
        api_key: "yt-key".to_string(),
        channel_id: "UC123".to_string(),
    }
}

#[tokio::test]
async fn test_youtube_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "UC123"))
        .and(query_param("key", "yt-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "UC123",
                "snippet": {"title": "Forge Channel"},
                "statistics": {"viewCount": "50000", "subscriberCount": "1200", "videoCount": "2"},
                "contentDetails": {"relatedPlaylists": {"uploads": "UU123"}}
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU123"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"contentDetails": {"videoId": "v1"}},
                {"contentDetails": {"videoId": "v2"}}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "v1,v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "v1",
                    "snippet": {"title": "First", "description": "d", "publishedAt": "2024-03-01T10:00:00Z"},
                    "statistics": {"viewCount": "900", "likeCount": "45", "commentCount": "5"}
                },
                {
                    "id": "v2",
                    "snippet": {"title": "Second", "publishedAt": "2024-03-02T10:00:00Z"},
                    "statistics": {"viewCount": "300"}
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = YouTubeClient::with_base_url(youtube_config(), &server.uri()).unwrap();
    let snapshot = client.fetch_snapshot(10).await.unwrap();

    let AccountStats::YouTube(stats) = &snapshot.stats else {
        panic!("expected channel stats");
    };
    assert_eq!(stats.subscriber_count, 1200);
    assert_eq!(stats.view_count, 50_000);

    let PlatformContent::YouTube(videos) = &snapshot.content else {
        panic!("expected videos");
    };
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].like_count, 45);
    assert_eq!(videos[1].like_count, 0);
}

#[tokio::test]
async fn test_youtube_unknown_channel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let client = YouTubeClient::with_base_url(youtube_config(), &server.uri()).unwrap();
    let err = client.fetch_snapshot(10).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_youtube_quota_exceeded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = YouTubeClient::with_base_url(youtube_config(), &server.uri()).unwrap();
    let err = client.fetch_snapshot(10).await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
    assert_eq!(err.category(), ErrorCategory::Config);
    assert!(!err.is_recoverable());
}

// ============================================================================
// X
// ============================================================================

fn x_config() -> XConfig {
    XConfig {
        bearer_token: "x-token".to_string(),
        user_id: "42".to_string(),
    }
}

#[tokio::test]
async fn test_x_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/42"))
        .and(header("authorization", "Bearer x-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "42",
                "username": "forge",
                "public_metrics": {
                    "followers_count": 880,
                    "following_count": 12,
                    "tweet_count": 310,
                    "listed_count": 4
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/42/tweets"))
        .and(query_param("max_results", "5"))
        .and(query_param("exclude", "retweets,replies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "t1",
                "text": "shipping",
                "created_at": "2024-03-01T12:00:00.000Z",
                "public_metrics": {
                    "impression_count": 1500,
                    "like_count": 30,
                    "reply_count": 3,
                    "retweet_count": 6,
                    "quote_count": 1
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = XClient::with_base_url(x_config(), &server.uri()).unwrap();
    let snapshot = client.fetch_snapshot(3).await.unwrap();

    assert_eq!(snapshot.stats.followers(), 880);
    let PlatformContent::X(tweets) = &snapshot.content else {
        panic!("expected tweets");
    };
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].impression_count, 1500);
}

#[tokio::test]
async fn test_x_empty_timeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "42", "username": "forge", "public_metrics": {"followers_count": 1}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/42/tweets"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"meta": {"result_count": 0}})),
        )
        .mount(&server)
        .await;

    let client = XClient::with_base_url(x_config(), &server.uri()).unwrap();
    let snapshot = client.fetch_snapshot(10).await.unwrap();
    assert!(snapshot.content.is_empty());
}

#[tokio::test]
async fn test_x_rate_limit_is_recoverable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = XClient::with_base_url(x_config(), &server.uri()).unwrap();
    let err = client.fetch_snapshot(10).await.unwrap_err();
    assert_eq!(err.status_code(), Some(429));
    assert_eq!(err.category(), ErrorCategory::Network);
    assert!(err.is_recoverable());
}

// ============================================================================
// LinkedIn
// ============================================================================

#[tokio::test]
async fn test_linkedin_snapshot() {
    let server = MockServer::start().await;
    let config = LinkedInConfig {
        access_token: "li-token".to_string(),
        person_urn: "urn:li:person:abc".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/v2/networkSizes/urn%3Ali%3Aperson%3Aabc"))
        .and(header("x-restli-protocol-version", "2.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"firstDegreeSize": 640})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/posts"))
        .and(query_param("q", "author"))
        .and(query_param("author", "urn:li:person:abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                {"id": "urn:li:share:1", "commentary": "launch", "createdAt": 1709294400000i64}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/socialActions/urn%3Ali%3Ashare%3A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "likesSummary": {"totalLikes": 25},
            "commentsSummary": {"aggregatedTotalComments": 4}
        })))
        .mount(&server)
        .await;

    let client = LinkedInClient::with_base_url(config, &server.uri()).unwrap();
    let snapshot = client.fetch_snapshot(10).await.unwrap();

    assert_eq!(snapshot.stats.followers(), 640);
    let PlatformContent::LinkedIn(posts) = &snapshot.content else {
        panic!("expected posts");
    };
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].like_count, 25);
    assert_eq!(posts[0].comment_count, 4);
    assert_eq!(posts[0].text, "launch");
}

#[tokio::test]
async fn test_linkedin_without_token() {
    let client = LinkedInClient::new(LinkedInConfig::default()).unwrap();
    assert!(!client.is_configured());

    let err = client.fetch_snapshot(10).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Config);
}
