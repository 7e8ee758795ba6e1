//! Audio output device port.

use thiserror::Error;

use crate::domain::PcmAudio;

/// Device errors.
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    /// The device could not be opened. Startup-fatal.
    #[error("failed to open audio output: {0}")]
    DeviceUnavailable(String),

    /// The payload could not be handed to the device.
    #[error("failed to submit audio: {0}")]
    Submit(String),

    /// The thread owning the device is gone.
    #[error("audio thread died unexpectedly")]
    AudioThreadDied,
}

/// The single shared output device.
///
/// Methods are synchronous and cheap: `submit` starts playback and returns,
/// `is_playing` reports whether queued audio remains, `release` stops and
/// frees the current player. Callers serialize access themselves (see
/// [`PlaybackSerializer`](crate::services::PlaybackSerializer)).
pub trait AudioOutput: Send + Sync {
    fn submit(&self, pcm: &PcmAudio) -> Result<(), AudioError>;

    fn is_playing(&self) -> bool;

    /// Must be safe to call when nothing is playing.
    fn release(&self);
}
