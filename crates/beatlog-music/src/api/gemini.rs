use beatlog_core::{BeatlogError, BeatlogResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    /// Sends one `generateContent` call constrained to JSON output and returns
    /// the raw candidate text. The caller owns parsing that text.
    pub async fn generate(&self, prompt: &str, schema: Value) -> BeatlogResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .client
            .post(format!("{API_BASE}/models/{}:generateContent", self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| BeatlogError::Network(format!("gemini request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BeatlogError::Api(format!(
                "gemini error: status={status} body={body}"
            )));
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| BeatlogError::Parse(format!("gemini response decode failed: {err}")))?;

        candidate_text(payload)
    }
}

fn candidate_text(payload: GenerateContentResponse) -> BeatlogResult<String> {
    if let Some(feedback) = &payload.prompt_feedback
        && let Some(reason) = &feedback.block_reason
    {
        return Err(BeatlogError::Api(format!("gemini blocked the prompt: {reason}")));
    }

    let candidate = payload
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| BeatlogError::Api("gemini returned no candidates".to_string()))?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(BeatlogError::Api(
            "gemini candidate contained no text".to_string(),
        ));
    }
    Ok(text)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    block_reason: Option<String>,
}
