// SPDX-License-Identifier: MIT

//! HTTP client for the résumé evaluation backend

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::session::ResumeFile;
use crate::{CvRankError, Result};

const EVALUATE_PATH: &str = "/evaluacion/evaluar";

/// Transport seam for submitting an evaluation request.
///
/// The session talks to this trait so it can be driven by a mock in tests;
/// [`EvalClient`] is the real implementation.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Submit files and keywords, returning the raw response payload
    async fn evaluate(&self, files: &[ResumeFile], keywords: &[String]) -> Result<Value>;
}

/// Evaluation backend API client
pub struct EvalClient {
    client: Client,
    base_url: String,
}

impl EvalClient {
    /// Create a new client for the given base URL.
    ///
    /// `timeout_secs` of 0 disables the request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| CvRankError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EVALUATE_PATH)
    }
}

/// Normalize a configured base URL: strip trailing slashes and an
/// accidentally included endpoint path.
fn normalize_base_url(base_url: &str) -> String {
    base_url
        .trim_end_matches('/')
        .trim_end_matches(EVALUATE_PATH)
        .trim_end_matches('/')
        .to_string()
}

/// Pull a human-readable message out of an error payload, if the server
/// sent one (`message` at the top level or under `error`).
fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(String::from)
}

#[async_trait]
impl Evaluator for EvalClient {
    async fn evaluate(&self, files: &[ResumeFile], keywords: &[String]) -> Result<Value> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            form = form.part("files", part);
        }
        form = form.text("keywords", serde_json::to_string(keywords)?);

        let url = self.endpoint();
        debug!("Submitting {} file(s), {} keyword(s) to {}", files.len(), keywords.len(), url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Evaluation request failed: {}", e);
                CvRankError::Backend(format!("Could not reach the evaluation server at {}", url))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<Value>(&body).ok())
                .and_then(|body| server_message(&body))
                .unwrap_or_else(|| format!("Evaluation server returned status {}", status));
            return Err(CvRankError::Backend(message));
        }

        let text = response
            .text()
            .await
            .map_err(|_| CvRankError::UnreadableResponse)?;

        // A body that is not valid JSON is kept as a string; the normalizer
        // owns the nested-parse attempt.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(normalize_base_url("http://api.example.com"), "http://api.example.com");
        assert_eq!(normalize_base_url("http://api.example.com/"), "http://api.example.com");
        assert_eq!(
            normalize_base_url("http://api.example.com/evaluacion/evaluar"),
            "http://api.example.com"
        );
        assert_eq!(
            normalize_base_url("http://api.example.com/evaluacion/evaluar/"),
            "http://api.example.com"
        );
    }

    #[test]
    fn test_endpoint_url() {
        let client = EvalClient::new("http://localhost:8000/", 0).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/evaluacion/evaluar");
    }

    #[test]
    fn test_server_message_top_level() {
        let body = json!({"message": "Model overloaded"});
        assert_eq!(server_message(&body), Some("Model overloaded".to_string()));
    }

    #[test]
    fn test_server_message_nested_under_error() {
        let body = json!({"error": {"code": "LLM_ERROR", "message": "quota exceeded"}});
        assert_eq!(server_message(&body), Some("quota exceeded".to_string()));
    }

    #[test]
    fn test_server_message_absent() {
        assert_eq!(server_message(&json!({"status": 500})), None);
        assert_eq!(server_message(&json!({"message": 42})), None);
    }
}
