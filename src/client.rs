//! Wire client for the hosted generative-AI chat service.
//!
//! Speaks the `models/{model}:generateContent` REST protocol. The client
//! owns the mapping from the in-memory [`ChatRequest`] contract to the wire
//! format; context turns are forwarded in their original order.

use serde::{Deserialize, Serialize};

use crate::error::{MentorError, Result};
use crate::policy::ChatRequest;
use crate::prompts;
use crate::types::{ModelTier, TutorConfig};

/// Production endpoint; overridden in tests and for self-hosted gateways
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// HTTP client for the chat-completion collaborator
#[derive(Debug, Clone)]
pub struct GenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    fast_model: String,
    reasoning_model: String,
}

impl GenAiClient {
    /// Build a client from config, resolving the API key from the config or
    /// the `GEMINI_API_KEY` / `API_KEY` environment variables.
    pub fn new(config: &TutorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .ok_or(MentorError::MissingApiKey)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            fast_model: config.fast_model.clone(),
            reasoning_model: config.reasoning_model.clone(),
        })
    }

    fn model_id(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::HighCapability => &self.reasoning_model,
        }
    }

    /// Execute one chat turn against the remote service.
    ///
    /// An empty candidate list degrades to a fixed apology text rather than
    /// an error; non-2xx statuses map to [`MentorError::Api`].
    pub async fn generate(&self, request: &ChatRequest) -> Result<String> {
        let model = self.model_id(request.model);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );

        let mut contents: Vec<Content> = request
            .context
            .iter()
            .map(|turn| Content {
                role: Some(turn.speaker.as_str().to_string()),
                parts: vec![Part {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: request.latest_user_text.clone(),
            }],
        });

        let body = GenerateContentBody {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.instruction.clone(),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                thinking_config: request
                    .reasoning_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MentorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Ok(prompts::EMPTY_REPLY_TEXT.to_string());
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ContextTurn, Speaker};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GenAiClient {
        let config = TutorConfig::new()
            .with_base_url(server.uri())
            .with_api_key("test-key");
        GenAiClient::new(&config).unwrap()
    }

    fn request(model: ModelTier, reasoning_budget: Option<u32>) -> ChatRequest {
        ChatRequest {
            instruction: "instrucción".to_string(),
            model,
            temperature: 0.7,
            reasoning_budget,
            context: vec![
                ContextTurn {
                    speaker: Speaker::Model,
                    text: "hola".to_string(),
                },
                ContextTurn {
                    speaker: Speaker::User,
                    text: "primera".to_string(),
                },
            ],
            latest_user_text: "segunda".to_string(),
        }
    }

    fn reply_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": text }] } }
            ]
        })
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("una derivada mide…")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server)
            .generate(&request(ModelTier::Fast, None))
            .await
            .unwrap();
        assert_eq!(reply, "una derivada mide…");
    }

    #[tokio::test]
    async fn test_generate_targets_reasoning_model_for_high_capability() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-pro-preview:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .generate(&request(ModelTier::HighCapability, Some(2048)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generate_preserves_turn_order_and_roles() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
            .mount(&server)
            .await;

        client(&server)
            .generate(&request(ModelTier::Fast, None))
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[0]["parts"][0]["text"], "hola");
        assert_eq!(contents[1]["role"], "user");
        assert_eq!(contents[1]["parts"][0]["text"], "primera");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "segunda");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "instrucción");
    }

    #[tokio::test]
    async fn test_thinking_config_present_only_with_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
            .mount(&server)
            .await;

        let c = client(&server);
        c.generate(&request(ModelTier::HighCapability, Some(2048))).await.unwrap();
        c.generate(&request(ModelTier::Fast, None)).await.unwrap();

        let received = server.received_requests().await.unwrap();
        let with_budget: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        let without: serde_json::Value = serde_json::from_slice(&received[1].body).unwrap();

        assert_eq!(with_budget["generationConfig"]["thinkingConfig"]["thinkingBudget"], 2048);
        assert!(without["generationConfig"].get("thinkingConfig").is_none());
    }

    #[tokio::test]
    async fn test_empty_candidates_degrade_to_apology() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let reply = client(&server)
            .generate(&request(ModelTier::Fast, None))
            .await
            .unwrap();
        assert_eq!(reply, prompts::EMPTY_REPLY_TEXT);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate(&request(ModelTier::Fast, None))
            .await
            .unwrap_err();
        match err {
            MentorError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        // Construct without key material in the config; if the environment
        // carries one the check is skipped.
        if std::env::var("GEMINI_API_KEY").is_ok() || std::env::var("API_KEY").is_ok() {
            return;
        }
        let err = GenAiClient::new(&TutorConfig::new()).unwrap_err();
        assert!(matches!(err, MentorError::MissingApiKey));
    }
}
