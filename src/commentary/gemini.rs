//! Google Generative Language backend for pit boss chatter
//!
//! Speaks the REST `generateContent` API over the browser's `fetch`. The
//! API key is baked in at build time from `GEMINI_API_KEY`.

use serde::{Deserialize, Serialize};

use super::{CommentaryError, TextFuture, TextGenerator};
use crate::consts::COMMENTARY_TIMEOUT_MS;

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    pub fn new(prompt: String, config: &GeminiConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Text of the first candidate (empty if the model returned nothing)
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Decode a raw response body
pub fn parse_response(body: &str) -> Result<String, CommentaryError> {
    serde_json::from_str::<GenerateResponse>(body)
        .map(|response| response.text())
        .map_err(|e| CommentaryError::Decode(e.to_string()))
}

// ============================================================================
// CLIENT
// ============================================================================

/// Backend settings
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_ms: i32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: option_env!("GEMINI_API_KEY")
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.8,
            max_output_tokens: 30,
            timeout_ms: COMMENTARY_TIMEOUT_MS,
        }
    }
}

impl GeminiConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        if config.api_key.is_none() {
            log::warn!("GEMINI_API_KEY not set at build time, pit boss will use canned lines");
        }
        Self { config }
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: String) -> TextFuture {
        let Some(api_key) = self.config.api_key.clone() else {
            return Box::pin(std::future::ready(Err(CommentaryError::MissingApiKey)));
        };
        let body = match serde_json::to_string(&GenerateRequest::new(prompt, &self.config)) {
            Ok(body) => body,
            Err(e) => {
                return Box::pin(std::future::ready(Err(CommentaryError::Decode(e.to_string()))));
            }
        };
        Box::pin(send(
            self.config.endpoint(),
            api_key,
            body,
            self.config.timeout_ms,
        ))
    }
}

#[cfg(target_arch = "wasm32")]
async fn send(
    url: String,
    api_key: String,
    body: String,
    timeout_ms: i32,
) -> Result<String, CommentaryError> {
    let raw = fetch::post_json(&url, &api_key, &body, timeout_ms).await?;
    parse_response(&raw)
}

#[cfg(not(target_arch = "wasm32"))]
async fn send(
    _url: String,
    _api_key: String,
    _body: String,
    _timeout_ms: i32,
) -> Result<String, CommentaryError> {
    Err(CommentaryError::Unsupported)
}

#[cfg(target_arch = "wasm32")]
mod fetch {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AbortController, Headers, Request, RequestInit, Response};

    use super::CommentaryError;

    fn js_err(value: JsValue) -> CommentaryError {
        CommentaryError::Network(format!("{value:?}"))
    }

    /// POST a JSON body, aborting if no response arrives within `timeout_ms`
    pub async fn post_json(
        url: &str,
        api_key: &str,
        body: &str,
        timeout_ms: i32,
    ) -> Result<String, CommentaryError> {
        let window = web_sys::window().ok_or_else(|| CommentaryError::Network("no window".into()))?;

        let headers = Headers::new().map_err(js_err)?;
        headers.set("Content-Type", "application/json").map_err(js_err)?;
        headers.set("x-goog-api-key", api_key).map_err(js_err)?;

        let controller = AbortController::new().map_err(js_err)?;
        let signal = controller.signal();

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));
        init.set_signal(Some(&signal));
        let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;

        let abort = Closure::<dyn FnMut()>::new(move || controller.abort());
        let timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                abort.as_ref().unchecked_ref(),
                timeout_ms,
            )
            .map_err(js_err)?;

        let result = JsFuture::from(window.fetch_with_request(&request)).await;
        window.clear_timeout_with_handle(timer);
        drop(abort);

        let response: Response = result
            .map_err(|e| {
                if signal.aborted() {
                    CommentaryError::Timeout
                } else {
                    js_err(e)
                }
            })?
            .dyn_into()
            .map_err(js_err)?;

        if !response.ok() {
            return Err(CommentaryError::Http(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        text.as_string()
            .ok_or_else(|| CommentaryError::Decode("response body is not text".into()))
    }
}
