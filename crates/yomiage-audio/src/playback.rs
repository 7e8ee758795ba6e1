//! Audio playback on the default output device via `rodio`.

use rodio::{OutputStream, OutputStreamHandle, Sink};
use yomiage_core::AudioError;

use crate::audio_thread::Player;

/// rodio output stream plus the sink of the clip currently playing.
///
/// `!Send` on some platforms: construct and use it on the audio thread only.
pub struct DevicePlayer {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    /// Sink of the current clip, dropped on release.
    sink: Option<Sink>,

    sample_rate: u32,
}

impl DevicePlayer {
    /// Open the default output device for mono 16-bit PCM at `sample_rate`.
    pub fn open(sample_rate: u32) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;

        tracing::info!(sample_rate, "Audio output initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            sample_rate,
        })
    }
}

impl Player for DevicePlayer {
    fn submit(&mut self, samples: Vec<i16>) -> Result<(), AudioError> {
        self.release();

        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| AudioError::Submit(e.to_string()))?;
        let source = rodio::buffer::SamplesBuffer::new(1, self.sample_rate, samples);
        sink.append(source);
        self.sink = Some(sink);

        tracing::debug!(sample_rate = self.sample_rate, "Audio playback started");
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Drop for DevicePlayer {
    fn drop(&mut self) {
        self.release();
    }
}
