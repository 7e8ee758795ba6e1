//! Playback serializer: exclusive access to the single output device.
//!
//! Every pipeline run that reaches playback goes through [`PlaybackSerializer::play`].
//! The gate is a `tokio::sync::Mutex<()>`: runs queue on it while synthesis
//! of other messages continues freely. Release happens by guard drop, so
//! success, device errors, annotation errors and task cancellation all give
//! the device back.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{MessageRef, PcmAudio};
use crate::ports::{AudioError, AudioOutput, MessageAnnotator};
use crate::settings::DEFAULT_PLAYBACK_POLL_INTERVAL;

/// Playback failures. Fatal to the current run only.
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("audio device error: {0}")]
    Device(#[from] AudioError),
}

/// "Speaking" marker shown on the originating message during playback.
#[derive(Clone)]
pub struct SpeakingIndicator {
    annotator: Arc<dyn MessageAnnotator>,
    name: String,
}

impl SpeakingIndicator {
    pub fn new(annotator: Arc<dyn MessageAnnotator>, name: impl Into<String>) -> Self {
        Self {
            annotator,
            name: name.into(),
        }
    }

    async fn show(&self, target: &MessageRef) {
        match self.annotator.add_marker(target, &self.name).await {
            Ok(()) => tracing::info!(
                reaction = %self.name,
                channel = %target.channel,
                ts = %target.ts,
                "Added speaking reaction"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                channel = %target.channel,
                ts = %target.ts,
                "Failed to add speaking reaction"
            ),
        }
    }

    async fn clear(&self, target: &MessageRef) {
        match self.annotator.remove_marker(target, &self.name).await {
            Ok(()) => tracing::info!(
                reaction = %self.name,
                channel = %target.channel,
                ts = %target.ts,
                "Removed speaking reaction"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                channel = %target.channel,
                ts = %target.ts,
                "Failed to remove speaking reaction"
            ),
        }
    }
}

/// Releases the device when dropped.
struct DeviceLease<'a> {
    output: &'a dyn AudioOutput,
}

impl Drop for DeviceLease<'_> {
    fn drop(&mut self) {
        self.output.release();
    }
}

/// Serializes playback on the shared output device.
pub struct PlaybackSerializer {
    output: Arc<dyn AudioOutput>,
    indicator: Option<SpeakingIndicator>,
    poll_interval: Duration,
    /// Held for the whole critical section, indicator cleanup included.
    gate: Mutex<()>,
}

impl PlaybackSerializer {
    pub fn new(output: Arc<dyn AudioOutput>) -> Self {
        Self {
            output,
            indicator: None,
            poll_interval: DEFAULT_PLAYBACK_POLL_INTERVAL,
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_indicator(mut self, indicator: SpeakingIndicator) -> Self {
        self.indicator = Some(indicator);
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Play `pcm` to completion while holding exclusive device ownership.
    ///
    /// Returns only after the device reports idle (or submission failed).
    pub async fn play(&self, pcm: &PcmAudio, origin: &MessageRef) -> Result<(), PlaybackError> {
        tracing::debug!(channel = %origin.channel, ts = %origin.ts, "Waiting for audio device");
        let _gate = self.gate.lock().await;

        if let Some(indicator) = &self.indicator {
            indicator.show(origin).await;
        }

        let result = self.drive(pcm).await;

        if let Some(indicator) = &self.indicator {
            indicator.clear(origin).await;
        }

        result
    }

    async fn drive(&self, pcm: &PcmAudio) -> Result<(), PlaybackError> {
        let _lease = DeviceLease {
            output: self.output.as_ref(),
        };

        self.output.submit(pcm)?;
        tracing::debug!(bytes = pcm.len(), "Audio submitted");

        while self.output.is_playing() {
            tokio::time::sleep(self.poll_interval).await;
        }
        Ok(())
    }
}
