//! VOICEVOX client.

use bytes::Bytes;
use url::Url;

use crate::config::VoicevoxConfig;
use crate::error::{VoicevoxError, VoicevoxResult};
use crate::http::{HttpBackend, HttpRequest, HttpResponse, ReqwestBackend};
use crate::url::Endpoints;

/// Default VOICEVOX client using the reqwest HTTP backend.
pub type DefaultVoicevoxClient = VoicevoxClient<ReqwestBackend>;

/// Client for one VOICEVOX engine and one speaker.
///
/// Generic over the HTTP backend for testing. Production code uses
/// [`DefaultVoicevoxClient::new`].
pub struct VoicevoxClient<B: HttpBackend> {
    pub(crate) backend: B,
    endpoints: Endpoints,
    speaker_id: String,
}

impl DefaultVoicevoxClient {
    /// Create a client. Fails if the endpoint is not a usable base URL.
    pub fn new(config: &VoicevoxConfig) -> VoicevoxResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        Self::with_backend(config, backend)
    }
}

impl<B: HttpBackend> VoicevoxClient<B> {
    pub(crate) fn with_backend(config: &VoicevoxConfig, backend: B) -> VoicevoxResult<Self> {
        Ok(Self {
            backend,
            endpoints: Endpoints::parse(&config.endpoint)?,
            speaker_id: config.speaker_id.clone(),
        })
    }

    pub const fn endpoint(&self) -> &Url {
        self.endpoints.base()
    }

    pub fn speaker_id(&self) -> &str {
        &self.speaker_id
    }

    /// `POST /audio_query`: text in, query document out.
    pub async fn post_audio_query(&self, text: &str) -> VoicevoxResult<Bytes> {
        let url = self.endpoints.audio_query(&self.speaker_id, text)?;
        tracing::debug!(speaker = %self.speaker_id, chars = text.chars().count(), "POST audio_query");

        let response = self.backend.send(HttpRequest::post(url)).await?;
        expect_ok(response)
    }

    /// `POST /synthesis`: query document in, WAV document out.
    pub async fn post_synthesis(&self, query: Bytes) -> VoicevoxResult<Bytes> {
        let url = self.endpoints.synthesis(&self.speaker_id)?;
        tracing::debug!(speaker = %self.speaker_id, query_bytes = query.len(), "POST synthesis");

        let request = HttpRequest::post(url).accept("audio/wav").json(query);
        let response = self.backend.send(request).await?;
        let document = expect_ok(response)?;
        tracing::debug!(wav_bytes = document.len(), "Synthesis complete");
        Ok(document)
    }

    /// `GET /version`: the engine version string.
    pub async fn version(&self) -> VoicevoxResult<String> {
        let url = self.endpoints.version()?;
        let body = expect_ok(self.backend.send(HttpRequest::get(url)).await?)?;
        serde_json::from_slice::<String>(&body).map_err(|e| VoicevoxError::InvalidResponse {
            message: format!("version is not a JSON string: {e}"),
        })
    }
}

fn expect_ok(response: HttpResponse) -> VoicevoxResult<Bytes> {
    if response.status == 200 {
        Ok(response.body)
    } else {
        Err(VoicevoxError::Status {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}
