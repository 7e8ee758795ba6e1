//! HTTP backend abstraction for the VOICEVOX engine.
//!
//! The client builds requests as plain values and hands them to an
//! [`HttpBackend`]. Production uses reqwest; tests use [`testing::FakeBackend`].
//! Backends never interpret status codes, the client does.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::config::VoicevoxConfig;
use crate::error::VoicevoxResult;

// ============================================================================
// Request / Response values
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// An outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Value of the `Accept` header, if any.
    pub accept: Option<&'static str>,
    /// JSON body. Sent with `Content-Type: application/json`.
    pub json_body: Option<Bytes>,
}

impl HttpRequest {
    pub const fn post(url: Url) -> Self {
        Self {
            method: Method::Post,
            url,
            accept: None,
            json_body: None,
        }
    }

    pub const fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            accept: None,
            json_body: None,
        }
    }

    #[must_use]
    pub const fn accept(mut self, media_type: &'static str) -> Self {
        self.accept = Some(media_type);
        self
    }

    #[must_use]
    pub fn json(mut self, body: Bytes) -> Self {
        self.json_body = Some(body);
        self
    }
}

/// A received response, body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Sends a request and returns the raw response.
///
/// This is an implementation detail - external code talks to the client
/// through the `SpeechSynthesizer` port.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn send(&self, request: HttpRequest) -> VoicevoxResult<HttpResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest. No retries.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(config: &VoicevoxConfig) -> VoicevoxResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> VoicevoxResult<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(request.url.as_str()),
            Method::Post => self.client.post(request.url.as_str()),
        };
        if let Some(accept) = request.accept {
            builder = builder.header(reqwest::header::ACCEPT, accept);
        }
        if let Some(body) = request.json_body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
