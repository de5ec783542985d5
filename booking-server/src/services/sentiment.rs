//! External sentiment classification
//!
//! Reviews are labelled by a generative language model over HTTP. The
//! classifier sits behind a trait so that tests can substitute a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::db::models::reservation::Sentiment;
use crate::utils::{AppError, ErrorCode};

/// Classifier configuration
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Base URL of the generative language API
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("SENTIMENT_API_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            api_key: std::env::var("SENTIMENT_API_KEY").unwrap_or_default(),
            model: std::env::var("SENTIMENT_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            timeout_ms: std::env::var("SENTIMENT_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),
        }
    }
}

/// Classifier failures
#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("sentiment service unavailable: {0}")]
    Unavailable(String),

    #[error("sentiment service returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("sentiment service timed out")]
    Timeout,
}

impl From<SentimentError> for AppError {
    fn from(e: SentimentError) -> Self {
        let code = match e {
            SentimentError::Unavailable(_) => ErrorCode::SentimentUnavailable,
            SentimentError::InvalidResponse(_) => ErrorCode::SentimentInvalidResponse,
            SentimentError::Timeout => ErrorCode::SentimentTimeout,
        };
        AppError::with_message(code, e.to_string())
    }
}

/// One completed review, as shown to the summarizer
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSnapshot {
    pub rating: u8,
    pub text: String,
}

/// Generated analysis of an option's reviews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionInsights {
    pub analysis: String,
    pub recommendation: String,
}

/// Classification collaborator
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Label one review text as positive, neutral or negative
    async fn classify(&self, text: &str) -> Result<Sentiment, SentimentError>;

    /// Summarize a set of reviews into analysis and recommendation text
    async fn summarize_reviews(
        &self,
        option_name: &str,
        reviews: &[ReviewSnapshot],
    ) -> Result<OptionInsights, SentimentError>;
}

/// HTTP-backed classifier (generateContent API with constrained JSON output)
pub struct HttpSentimentService {
    config: SentimentConfig,
    client: reqwest::Client,
}

impl HttpSentimentService {
    pub fn new(config: SentimentConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("http client setup failed: {}", e)))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, body: serde_json::Value) -> Result<String, SentimentError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SentimentError::Timeout
                } else {
                    SentimentError::Unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(SentimentError::Unavailable(format!(
                "upstream status {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SentimentError::InvalidResponse(e.to_string()))?;

        extract_generated_text(&payload)
    }
}

/// Pull the generated text out of a generateContent response
fn extract_generated_text(payload: &serde_json::Value) -> Result<String, SentimentError> {
    payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| SentimentError::InvalidResponse("no generated text in response".into()))
}

/// Parse a sentiment label out of constrained model output
fn parse_sentiment_label(text: &str) -> Result<Sentiment, SentimentError> {
    let label = text.trim().trim_matches('"').to_lowercase();
    match label.as_str() {
        "positive" => Ok(Sentiment::Positive),
        "neutral" => Ok(Sentiment::Neutral),
        "negative" => Ok(Sentiment::Negative),
        other => Err(SentimentError::InvalidResponse(format!(
            "unexpected sentiment label: {}",
            other
        ))),
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentService {
    async fn classify(&self, text: &str) -> Result<Sentiment, SentimentError> {
        let body = json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "Classify the sentiment of this customer review as positive, \
                         neutral or negative.\n\nReview: {}",
                        text
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "STRING",
                    "enum": ["positive", "neutral", "negative"]
                }
            }
        });

        let generated = self.generate(body).await?;
        parse_sentiment_label(&generated)
    }

    async fn summarize_reviews(
        &self,
        option_name: &str,
        reviews: &[ReviewSnapshot],
    ) -> Result<OptionInsights, SentimentError> {
        let review_lines: Vec<String> = reviews
            .iter()
            .map(|r| format!("[{}/5] {}", r.rating, r.text))
            .collect();

        let body = json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "You are analysing customer reviews for the service option \
                         \"{}\". Summarize the overall feedback as 'analysis' and \
                         suggest one concrete improvement as 'recommendation'.\n\n{}",
                        option_name,
                        review_lines.join("\n")
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "analysis": {"type": "STRING"},
                        "recommendation": {"type": "STRING"}
                    },
                    "required": ["analysis", "recommendation"]
                }
            }
        });

        let generated = self.generate(body).await?;
        serde_json::from_str(&generated)
            .map_err(|e| SentimentError::InvalidResponse(e.to_string()))
    }
}
