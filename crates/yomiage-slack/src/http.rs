//! HTTP backend abstraction for the Slack Web API.
//!
//! Every Web API method is a form-encoded `POST {base}/{method}` with a
//! bearer token. Backends return the raw status and body; the client checks
//! the `{ok, error}` envelope.

use async_trait::async_trait;
use url::Url;

use crate::config::SlackConfig;
use crate::error::SlackResult;

/// One Web API call.
#[derive(Debug, Clone)]
pub struct ApiCall {
    /// Method name, e.g. `users.info`.
    pub method: &'static str,
    /// Bearer token for this call.
    pub token: String,
    pub form: Vec<(&'static str, String)>,
}

impl ApiCall {
    pub fn new(method: &'static str, token: &str) -> Self {
        Self {
            method,
            token: token.to_string(),
            form: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.form.push((key, value.into()));
        self
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn encoded_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Sends Web API calls.
///
/// This is an implementation detail - external code uses the client through
/// the core ports.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn call(&self, call: ApiCall) -> SlackResult<ApiResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production backend using reqwest. No retries.
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestBackend {
    pub fn new(config: &SlackConfig) -> SlackResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        let mut base_url = Url::parse(&config.api_base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn call(&self, call: ApiCall) -> SlackResult<ApiResponse> {
        let url = self.base_url.join(call.method)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&call.token)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(call.encoded_form())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Answers by method name with canned JSON and records every call.
    #[derive(Clone, Default)]
    pub struct FakeBackend {
        responses: Arc<Mutex<HashMap<&'static str, ApiResponse>>>,
        calls: Arc<Mutex<Vec<ApiCall>>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `method` with a 200 and the given JSON body.
        pub fn with_json(self, method: &'static str, body: serde_json::Value) -> Self {
            self.with_status(method, 200, body.to_string())
        }

        pub fn with_status(self, method: &'static str, status: u16, body: impl Into<String>) -> Self {
            self.responses.lock().unwrap().insert(
                method,
                ApiResponse {
                    status,
                    body: body.into(),
                },
            );
            self
        }

        pub fn calls(&self) -> Vec<ApiCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn call(&self, call: ApiCall) -> SlackResult<ApiResponse> {
            let method = call.method;
            self.calls.lock().unwrap().push(call);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .get(method)
                .cloned()
                .unwrap_or_else(|| ApiResponse {
                    status: 200,
                    body: r#"{"ok":false,"error":"unknown_method"}"#.to_string(),
                }))
        }
    }
}
