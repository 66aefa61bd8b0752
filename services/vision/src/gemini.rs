//! Gemini-backed provider with Google-Search grounding.
//!
//! Sends the prompt and inline base64 image data to the
//! `generateContent` endpoint with the `google_search` tool enabled, and
//! extracts grounding attributions into citations. Attributions missing
//! either a uri or a title are dropped.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{AnalysisRequest, AnalysisResponse, Citation, InferenceProvider, ProviderError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

const SYSTEM_INSTRUCTION: &str = "You are a friendly and conversational chatbot AI designed to \
    analyze images. Respond directly to the user's query about the image. Use Google Search \
    grounding to incorporate real-time, relevant information into your chat response. Keep the \
    tone helpful and engaging.";

/// Connection configuration for [`GeminiClient`].
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

/// HTTP client for the Gemini `generateContent` API.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        )
    }
}

impl InferenceProvider for GeminiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ProviderError> {
        let image_data = general_purpose::STANDARD.encode(&request.image_bytes);
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": request.prompt },
                    { "inlineData": { "mimeType": request.mime_type, "data": image_data } },
                ],
            }],
            "tools": [{ "google_search": {} }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        });

        debug!(model = %self.config.model, prompt_len = request.prompt.len(), "calling gemini");
        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|err| ProviderError::Network(err.to_string()))?;

        let status = response.status().as_u16();
        if let Some(err) = classify_status(status) {
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|err| ProviderError::Network(err.to_string()))?;
        parse_generate_response(&body)
    }
}

/// Map a non-success HTTP status to its typed failure.
fn classify_status(status: u16) -> Option<ProviderError> {
    match status {
        200..=299 => None,
        403 => Some(ProviderError::Authorization(
            "API key rejected (403 Forbidden)".into(),
        )),
        429 => Some(ProviderError::RateLimited),
        500..=599 => Some(ProviderError::Server { status }),
        _ => Some(ProviderError::Malformed(format!(
            "unexpected status {status}"
        ))),
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_attributions: Option<Vec<Attribution>>,
}

#[derive(Deserialize)]
struct Attribution {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

/// Parse a `generateContent` body into text plus citations.
fn parse_generate_response(body: &str) -> Result<AnalysisResponse, ProviderError> {
    let decoded: GenerateResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::Malformed(format!("undecodable body: {err}")))?;

    let candidate = decoded
        .candidates
        .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
        .ok_or_else(|| ProviderError::Malformed("no candidates in response".into()))?;

    let text = candidate
        .content
        .and_then(|c| c.parts)
        .and_then(|mut p| if p.is_empty() { None } else { p.remove(0).text })
        .ok_or_else(|| ProviderError::Malformed("no generated text in candidate".into()))?;

    let sources = candidate
        .grounding_metadata
        .and_then(|m| m.grounding_attributions)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|attribution| {
            let web = attribution.web?;
            Some(Citation {
                uri: web.uri?,
                title: web.title?,
            })
        })
        .collect();

    Ok(AnalysisResponse { text, sources })
}
