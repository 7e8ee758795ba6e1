//! `SpeechSynthesizer` implementation for `VoicevoxClient`.

use async_trait::async_trait;
use bytes::Bytes;
use yomiage_core::ports::{SpeechSynthesizer, SynthesisCall, SynthesisError, SynthesisQuery};

use crate::client::VoicevoxClient;
use crate::error::VoicevoxError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `VoicevoxError` to the core `SynthesisError`.
fn map_error(call: SynthesisCall, err: VoicevoxError) -> SynthesisError {
    match err {
        VoicevoxError::Status { status, body } => SynthesisError::Api { call, status, body },
        VoicevoxError::Network(e) => SynthesisError::Transport {
            call,
            message: e.to_string(),
        },
        VoicevoxError::InvalidUrl(e) => SynthesisError::InvalidEndpoint(e.to_string()),
        VoicevoxError::InvalidResponse { message } => SynthesisError::Transport { call, message },
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> SpeechSynthesizer for VoicevoxClient<B> {
    async fn audio_query(&self, text: &str) -> Result<SynthesisQuery, SynthesisError> {
        self.post_audio_query(text)
            .await
            .map(SynthesisQuery::new)
            .map_err(|e| map_error(SynthesisCall::AudioQuery, e))
    }

    async fn synthesis(&self, query: &SynthesisQuery) -> Result<Bytes, SynthesisError> {
        self.post_synthesis(query.to_bytes())
            .await
            .map_err(|e| map_error(SynthesisCall::Synthesis, e))
    }
}
