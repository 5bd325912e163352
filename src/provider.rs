//! Vision-model provider abstraction and implementations.
//!
//! Defines the [`VisionProvider`] trait and concrete implementations:
//! - **[`DisabledProvider`]** — returns errors; used when no model is configured.
//! - **[`GeminiProvider`]** — calls the Gemini `generateContent` API with
//!   retry and backoff.
//!
//! # Provider Selection
//!
//! Use [`create_provider`] to instantiate the appropriate provider based
//! on the configuration:
//!
//! ```rust
//! # use ceres_context::config::ModelConfig;
//! # use ceres_context::provider::create_provider;
//! let config = ModelConfig::default(); // provider = "disabled"
//! let provider = create_provider(&config).unwrap();
//! assert_eq!(provider.model_name(), "disabled");
//! ```
//!
//! # Retry Strategy
//!
//! The Gemini provider uses exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use std::path::Path;
use std::time::Duration;

use crate::config::ModelConfig;
use crate::models::Diagnosis;

/// An image attached to an analysis request, ready for the wire.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// MIME type (e.g. `"image/jpeg"`).
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImagePayload {
    /// Parse a `data:<mime>;base64,<payload>` URL, the upload format the
    /// app frontend produces. A bare base64 string is accepted too and
    /// assumed to be JPEG.
    pub fn from_data_url(url: &str) -> Result<Self> {
        match url.split_once(',') {
            Some((header, data)) => {
                let mime_type = header
                    .strip_prefix("data:")
                    .and_then(|h| h.split(';').next())
                    .filter(|m| !m.is_empty())
                    .unwrap_or("image/jpeg");
                Ok(Self {
                    mime_type: mime_type.to_string(),
                    data: data.to_string(),
                })
            }
            None => Ok(Self {
                mime_type: "image/jpeg".to_string(),
                data: url.to_string(),
            }),
        }
    }

    /// Read and base64-encode an image file from disk.
    ///
    /// The MIME type is inferred from the file extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image file: {}", path.display()))?;

        let mime_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            other => bail!(
                "Unsupported image extension: {:?}. Use jpg, jpeg, png, or webp.",
                other
            ),
        };

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        })
    }
}

/// Trait for vision-language model backends.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"gemini-2.5-flash"`).
    fn model_name(&self) -> &str;

    /// Analyze an image in the context of the given prompt and return the
    /// parsed structured diagnosis.
    async fn analyze(&self, prompt: &str, image: &ImagePayload) -> Result<Diagnosis>;
}

// ============ Disabled Provider ============

/// A no-op provider that always returns errors.
///
/// Used when `model.provider = "disabled"` in the configuration.
pub struct DisabledProvider;

#[async_trait]
impl VisionProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn analyze(&self, _prompt: &str, _image: &ImagePayload) -> Result<Diagnosis> {
        bail!("Model provider is disabled. Set [model] provider in config.")
    }
}

// ============ Gemini Provider ============

/// Vision provider using the Gemini API.
///
/// Calls the `generateContent` endpoint with the configured model and an
/// inline base64 image part. Requires the `GEMINI_API_KEY` environment
/// variable to be set.
pub struct GeminiProvider {
    model: String,
    timeout_secs: u64,
    max_retries: u32,
}

impl GeminiProvider {
    /// Create a new Gemini provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `model` is not set in config, or if
    /// `GEMINI_API_KEY` is not in the environment.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("model.model required for Gemini provider"))?;

        // Verify API key is available
        if std::env::var("GEMINI_API_KEY").is_err() {
            bail!("GEMINI_API_KEY environment variable not set");
        }

        Ok(Self {
            model,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, prompt: &str, image: &ImagePayload) -> Result<Diagnosis> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": image.mime_type, "data": image.data } }
                ]
            }]
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = client
                .post(&url)
                .header("x-goog-api-key", &api_key)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_gemini_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!(
                            "Gemini API error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Gemini API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Analysis failed after retries")))
    }
}

/// Extract the model's text reply from a `generateContent` response.
fn parse_gemini_response(json: &serde_json::Value) -> Result<Diagnosis> {
    let text = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid Gemini response: missing candidate text"))?;

    parse_diagnosis_text(text)
}

/// Parse the model's reply into a [`Diagnosis`].
///
/// The model is instructed to emit bare JSON but sometimes wraps it in
/// markdown code fences anyway; those are stripped before parsing.
fn parse_diagnosis_text(text: &str) -> Result<Diagnosis> {
    let cleaned = text.trim().replace("```json", "").replace("```", "");

    serde_json::from_str(cleaned.trim())
        .with_context(|| "Model response was not a valid diagnosis JSON object")
}

/// Create the appropriate [`VisionProvider`] based on configuration.
///
/// # Supported Providers
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledProvider`] |
/// | `"gemini"` | [`GeminiProvider`] |
///
/// # Errors
///
/// Returns an error for unknown provider names or if the Gemini provider
/// cannot be initialized (missing config or API key).
pub fn create_provider(config: &ModelConfig) -> Result<Box<dyn VisionProvider>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledProvider)),
        "gemini" => Ok(Box::new(GeminiProvider::new(config)?)),
        other => bail!("Unknown model provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGNOSIS_JSON: &str = r#"{
        "diseaseName": "Coffee Leaf Rust",
        "severity": "High",
        "summary": "Orange powdery spots on the underside of leaves.",
        "recommendedActions": ["1. Prune affected leaves.", "2. Apply Bordeaux mixture."],
        "scientificReason": "Hemileia vastatrix thrives in high humidity.",
        "preventativeMeasures": ["Improve shade management.", "Monitor during monsoon."]
    }"#;

    #[test]
    fn test_parse_diagnosis_bare_json() {
        let diagnosis = parse_diagnosis_text(DIAGNOSIS_JSON).unwrap();
        assert_eq!(diagnosis.disease_name, "Coffee Leaf Rust");
        assert_eq!(diagnosis.severity, "High");
        assert_eq!(diagnosis.recommended_actions.len(), 2);
    }

    #[test]
    fn test_parse_diagnosis_strips_code_fences() {
        let fenced = format!("```json\n{}\n```", DIAGNOSIS_JSON);
        let diagnosis = parse_diagnosis_text(&fenced).unwrap();
        assert_eq!(diagnosis.disease_name, "Coffee Leaf Rust");
    }

    #[test]
    fn test_parse_diagnosis_rejects_garbage() {
        assert!(parse_diagnosis_text("I could not analyze this image.").is_err());
    }

    #[test]
    fn test_parse_gemini_response_happy_path() {
        let response = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": DIAGNOSIS_JSON }] }
            }]
        });
        let diagnosis = parse_gemini_response(&response).unwrap();
        assert_eq!(diagnosis.severity, "High");
    }

    #[test]
    fn test_parse_gemini_response_missing_candidates() {
        let response = serde_json::json!({ "candidates": [] });
        assert!(parse_gemini_response(&response).is_err());
    }

    #[test]
    fn test_image_payload_from_data_url() {
        let image = ImagePayload::from_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "aGVsbG8=");
    }

    #[test]
    fn test_image_payload_bare_base64_defaults_to_jpeg() {
        let image = ImagePayload::from_data_url("aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "aGVsbG8=");
    }

    #[test]
    fn test_create_provider_disabled() {
        let provider = create_provider(&ModelConfig::default()).unwrap();
        assert_eq!(provider.model_name(), "disabled");
    }

    #[test]
    fn test_create_provider_unknown() {
        let config = ModelConfig {
            provider: "palm".to_string(),
            ..ModelConfig::default()
        };
        assert!(create_provider(&config).is_err());
    }
}
