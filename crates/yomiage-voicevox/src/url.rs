//! Endpoint URL construction.

use url::Url;

use crate::error::{VoicevoxError, VoicevoxResult};

/// Resolved engine endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the configured base URL.
    ///
    /// A trailing slash is added so relative joins keep any path prefix
    /// (engines behind a reverse proxy are often mounted under one).
    pub fn parse(endpoint: &str) -> VoicevoxResult<Self> {
        let mut base = Url::parse(endpoint.trim())?;
        if base.cannot_be_a_base() {
            return Err(VoicevoxError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        Ok(Self { base })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// `POST /audio_query?speaker={id}&text={text}`
    pub fn audio_query(&self, speaker_id: &str, text: &str) -> VoicevoxResult<Url> {
        let mut url = self.base.join("audio_query")?;
        url.query_pairs_mut()
            .append_pair("speaker", speaker_id)
            .append_pair("text", text);
        Ok(url)
    }

    /// `POST /synthesis?speaker={id}`
    pub fn synthesis(&self, speaker_id: &str) -> VoicevoxResult<Url> {
        let mut url = self.base.join("synthesis")?;
        url.query_pairs_mut().append_pair("speaker", speaker_id);
        Ok(url)
    }

    /// `GET /version`
    pub fn version(&self) -> VoicevoxResult<Url> {
        Ok(self.base.join("version")?)
    }
}
