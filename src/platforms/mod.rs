//! Platform API clients
//!
//! Each client turns one platform's REST API into an account snapshot plus the
//! most recent content items. The fetch jobs only see the [`PlatformClient`]
//! trait.
//!
//! | Client | API | Auth |
//! |--------|-----|------|
//! | [`YouTubeClient`] | YouTube Data API v3 | API key |
//! | [`XClient`] | X API v2 | Bearer token |
//! | [`LinkedInClient`] | LinkedIn REST / v2 | OAuth access token |

pub mod error;
pub mod linkedin;
pub mod x;
pub mod youtube;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::config::Config;
use crate::models::{AccountStats, Platform, PlatformContent};

pub use error::ClientError;
pub use linkedin::LinkedInClient;
pub use x::XClient;
pub use youtube::YouTubeClient;

/// Result type for platform client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Default request timeout for platform APIs
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Account statistics and recent content captured in one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSnapshot {
    pub stats: AccountStats,
    pub content: PlatformContent,
}

/// Client for one content platform
#[async_trait]
pub trait PlatformClient: Send + Sync {
    fn platform(&self) -> Platform;

    /// Whether every credential the client needs is present
    fn is_configured(&self) -> bool;

    /// Fetch account statistics and up to `max_items` recent content items
    async fn fetch_snapshot(&self, max_items: usize) -> ClientResult<PlatformSnapshot>;
}

/// Thread-safe shared client
pub type SharedClient = Arc<dyn PlatformClient>;

/// One client per platform, built from configuration
///
/// Clients are created even without credentials; the fetch job reports the
/// missing configuration when it runs.
pub fn build_clients(config: &Config) -> ClientResult<Vec<SharedClient>> {
    Ok(vec![
        Arc::new(YouTubeClient::new(config.youtube.clone())?),
        Arc::new(XClient::new(config.x.clone())?),
        Arc::new(LinkedInClient::new(config.linkedin.clone())?),
    ])
}

pub(crate) fn http_client(timeout: Duration) -> ClientResult<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .gzip(true)
        .user_agent(concat!("crossforge/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Map a non-success status to [`ClientError::Status`], otherwise decode the JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(
    platform: Platform,
    endpoint: &str,
    response: Response,
) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            platform = %platform,
            endpoint,
            status = status.as_u16(),
            "Platform API request failed"
        );
        return Err(ClientError::status(platform, endpoint, status.as_u16()));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| ClientError::invalid_response(platform, format!("{endpoint}: {e}")))
}

/// Count that may arrive as a JSON number or a decimal string; absent means 0
pub(crate) fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Count::Number(n)) => Ok(n),
        Some(Count::Text(s)) => s.parse().map_err(serde::de::Error::custom),
    }
}
