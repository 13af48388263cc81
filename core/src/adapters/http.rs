use crate::adapters::interface::{OracleClient, OracleRequest};
use crate::config::OracleSettings;
use crate::error::{CoreError, CoreResult, OracleError};
use crate::oracle::response::truncate_chars;
use serde::Deserialize;
use std::time::Duration;

const ERROR_BODY_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions oracle over blocking HTTP.
pub struct HttpOracleClient {
    endpoint: String,
    api_key: String,
    model: String,
    fallback_model: String,
    timeout_secs: u64,
    http: reqwest::blocking::Client,
}

impl HttpOracleClient {
    pub fn from_settings(settings: &OracleSettings) -> CoreResult<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CoreError::Config(
                    "oracle API key is not set (APPRAISAL_ORACLE_API_KEY or OPENAI_API_KEY)"
                        .to_string(),
                )
            })?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            fallback_model: settings.fallback_model.clone(),
            timeout_secs: settings.timeout_secs,
            http,
        })
    }

    fn post_chat(&self, req: &OracleRequest, model: &str) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "system", "content": req.system},
                {"role": "user", "content": req.prompt}
            ],
            "max_tokens": req.max_tokens,
            "temperature": req.temperature
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(OracleError::ModelNotFound(model.to_string()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let text = resp.text().unwrap_or_default();
            return Err(OracleError::RateLimited(truncate_chars(
                &text,
                ERROR_BODY_PREVIEW_CHARS,
            )));
        }
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(OracleError::Http {
                status: status.as_u16(),
                body: truncate_chars(&text, ERROR_BODY_PREVIEW_CHARS),
            });
        }

        let parsed: ChatResponse = resp.json().map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout(self.timeout_secs)
            } else {
                OracleError::InvalidEnvelope(e.to_string())
            }
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or(OracleError::EmptyResponse)
    }

    fn transport_error(&self, e: reqwest::Error) -> OracleError {
        if e.is_timeout() {
            OracleError::Timeout(self.timeout_secs)
        } else {
            OracleError::Unavailable(e.to_string())
        }
    }
}

impl OracleClient for HttpOracleClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn complete(&self, req: &OracleRequest) -> Result<String, OracleError> {
        match self.post_chat(req, &req.model) {
            Err(OracleError::ModelNotFound(model)) if self.fallback_model != req.model => {
                tracing::warn!(
                    requested = %model,
                    fallback = %self.fallback_model,
                    "model not found, retrying with fallback model"
                );
                self.post_chat(req, &self.fallback_model)
            }
            other => other,
        }
    }
}
