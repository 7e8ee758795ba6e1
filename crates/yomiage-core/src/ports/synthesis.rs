//! Speech synthesis port.
//!
//! Synthesis is two sequential calls: a query-generation call that turns
//! text into an opaque query document, and a rendering call that turns the
//! query into a WAV document. The pipeline owns the deadline and the header
//! validation; implementations only move bytes.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Which of the two synthesis calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisCall {
    AudioQuery,
    Synthesis,
}

impl fmt::Display for SynthesisCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AudioQuery => "audio_query",
            Self::Synthesis => "synthesis",
        })
    }
}

/// Port-level synthesis errors.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    /// Non-200 answer; carries status and body for diagnostics.
    #[error("synthesis API error ({call}): status {status}, body: {body}")]
    Api {
        call: SynthesisCall,
        status: u16,
        body: String,
    },

    /// The request could not be sent or its body could not be read.
    #[error("{call} request failed: {message}")]
    Transport { call: SynthesisCall, message: String },

    /// The endpoint URL could not be built.
    #[error("invalid synthesis endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Opaque query document produced by the first call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisQuery(Bytes);

impl SynthesisQuery {
    pub const fn new(document: Bytes) -> Self {
        Self(document)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }
}

/// Remote text-to-speech service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Generate the query document for `text`.
    async fn audio_query(&self, text: &str) -> Result<SynthesisQuery, SynthesisError>;

    /// Render a query document into a WAV document (header + PCM).
    async fn synthesis(&self, query: &SynthesisQuery) -> Result<Bytes, SynthesisError>;
}
