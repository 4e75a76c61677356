//! LLM client for insight generation
//!
//! This module talks to a local Ollama server to turn analytics summaries
//! into short written insights. The insight job only depends on the
//! [`InsightGenerator`] trait so tests can swap in a canned generator.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

use crate::analytics::TrendData;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::models::{AnalyticsSummary, Platform};

/// Sampling temperature for insight text
const TEMPERATURE: f32 = 0.3;

/// Upper bound on generated tokens
const MAX_TOKENS: u32 = 512;

/// Ollama generate request
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama generate response
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Produces insight text from a prompt
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate_insight(&self, prompt: &str) -> Result<String>;
}

/// Ollama-backed insight generator
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client with custom config
    pub fn with_config(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Check if Ollama is reachable
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.endpoint.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));

        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: TEMPERATURE,
                num_predict: MAX_TOKENS,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Failed to send request to Ollama: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!("Ollama request failed: {status} - {body}")));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Ollama response: {e}")))?;

        let text = ollama_response.response.trim();
        if text.is_empty() {
            return Err(Error::llm("Ollama returned an empty response"));
        }

        tracing::debug!(model = %self.config.model, chars = text.len(), "Generated insight text");
        Ok(text.to_string())
    }
}

#[async_trait]
impl InsightGenerator for LlmClient {
    async fn generate_insight(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }
}

/// Prompt asking for observations on a cross-platform summary
pub fn build_analytics_prompt(summary: &AnalyticsSummary) -> String {
    let mut prompt = format!(
        "Analyze the following social media analytics for {} to {} and provide insights:\n",
        summary.date_range.start.format("%Y-%m-%d"),
        summary.date_range.end.format("%Y-%m-%d"),
    );

    for (platform, stats) in summary.platforms.iter() {
        let reach = match platform {
            Platform::YouTube => "views",
            Platform::X | Platform::LinkedIn => "impressions",
        };
        let _ = write!(
            prompt,
            "\n{}:\n- Total {reach}: {}\n- Posts: {}\n- Engagement rate: {:.2}%\n",
            platform.display_name(),
            stats.impressions,
            stats.content_count,
            stats.engagement_rate() * 100.0,
        );
        if let Some(followers) = stats.followers {
            let _ = writeln!(prompt, "- Followers: {followers}");
        }
    }

    prompt.push_str(
        "\nPlease provide:\n\
         1. Key observations\n\
         2. Areas of strength\n\
         3. Areas needing improvement\n\
         4. Recommended actions\n\n\
         Keep the response concise and actionable.",
    );
    prompt
}

/// Prompt asking for content ideas given recent metric trends
pub fn build_content_suggestion_prompt(platform: Platform, trends: &[TrendData]) -> String {
    let mut prompt = format!(
        "Based on recent performance trends on {}, suggest 3 content ideas that could improve engagement.\n",
        platform.display_name()
    );

    if !trends.is_empty() {
        prompt.push_str("\nRecent trends:\n");
        for trend in trends {
            let _ = writeln!(
                prompt,
                "- {}: {} ({:+.2}%)",
                trend.metric(),
                trend.trend(),
                trend.change_percent()
            );
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataPoint, DateRange, PlatformMap, PlatformSummary};
    use chrono::{Duration as ChronoDuration, Utc};

    fn summary() -> AnalyticsSummary {
        let mut platforms = PlatformMap::<PlatformSummary>::default();
        platforms.set(
            Platform::YouTube,
            PlatformSummary {
                impressions: 1000,
                likes: 40,
                comments: 10,
                shares: 0,
                content_count: 3,
                followers: Some(250),
            },
        );
        AnalyticsSummary {
            date_range: DateRange::last_days(7).unwrap(),
            platforms,
        }
    }

    #[test]
    fn test_analytics_prompt_lists_every_platform() {
        let prompt = build_analytics_prompt(&summary());
        assert!(prompt.contains("YouTube:"));
        assert!(prompt.contains("- Total views: 1000"));
        assert!(prompt.contains("- Engagement rate: 5.00%"));
        assert!(prompt.contains("- Followers: 250"));
        assert!(prompt.contains("X:"));
        assert!(prompt.contains("LinkedIn:"));
    }

    #[test]
    fn test_suggestion_prompt_includes_trends() {
        let now = Utc::now();
        let trend = TrendData::from_points(
            Platform::X,
            "impressions",
            vec![
                DataPoint::new(now - ChronoDuration::days(1), 100.0),
                DataPoint::new(now, 150.0),
            ],
        )
        .unwrap();

        let prompt = build_content_suggestion_prompt(Platform::X, &[trend]);
        assert!(prompt.contains("trends on X"));
        assert!(prompt.contains("- impressions: up (+50.00%)"));
    }

    #[test]
    fn test_request_serialization() {
        let request = OllamaRequest {
            model: "llama3",
            prompt: "hi",
            stream: false,
            options: OllamaOptions {
                temperature: TEMPERATURE,
                num_predict: MAX_TOKENS,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 512);
    }
}
