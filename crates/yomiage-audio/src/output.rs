//! `AudioOutput` port implementation.

use yomiage_core::{AudioError, AudioOutput, PcmAudio};

use crate::audio_thread::AudioThreadHandle;
use crate::playback::DevicePlayer;

/// The local default output device, driven from its own thread.
pub struct LocalAudioOutput {
    handle: AudioThreadHandle,
    sample_rate: u32,
}

impl LocalAudioOutput {
    /// Open the default output device. Startup-fatal on failure.
    pub fn open(sample_rate: u32) -> Result<Self, AudioError> {
        let handle = AudioThreadHandle::spawn(move || DevicePlayer::open(sample_rate))?;
        Ok(Self::from_handle(handle, sample_rate))
    }

    /// Wrap an already running audio thread.
    pub const fn from_handle(handle: AudioThreadHandle, sample_rate: u32) -> Self {
        Self {
            handle,
            sample_rate,
        }
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioOutput for LocalAudioOutput {
    fn submit(&self, pcm: &PcmAudio) -> Result<(), AudioError> {
        tracing::debug!(
            bytes = pcm.len(),
            duration_ms = pcm.duration(self.sample_rate).as_millis(),
            "Submitting audio"
        );
        self.handle.submit(pcm.samples())
    }

    fn is_playing(&self) -> bool {
        self.handle.is_playing()
    }

    fn release(&self) {
        self.handle.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_thread::Player;
    use std::sync::{Arc, Mutex};

    struct CapturePlayer {
        samples: Arc<Mutex<Vec<i16>>>,
    }

    impl Player for CapturePlayer {
        fn submit(&mut self, samples: Vec<i16>) -> Result<(), AudioError> {
            *self.samples.lock().unwrap() = samples;
            Ok(())
        }

        fn is_playing(&self) -> bool {
            false
        }

        fn release(&mut self) {}
    }

    #[test]
    fn submit_decodes_little_endian_samples() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let player_samples = captured.clone();
        let handle = AudioThreadHandle::spawn(move || {
            Ok(CapturePlayer {
                samples: player_samples,
            })
        })
        .unwrap();
        let output = LocalAudioOutput::from_handle(handle, 24_000);

        let pcm = PcmAudio::from_pcm(bytes_le(&[1, -1, 256, i16::MIN]));
        output.submit(&pcm).unwrap();

        assert_eq!(*captured.lock().unwrap(), vec![1, -1, 256, i16::MIN]);
        assert!(!output.is_playing());
        assert_eq!(output.sample_rate(), 24_000);
    }

    fn bytes_le(samples: &[i16]) -> bytes::Bytes {
        samples
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect::<Vec<u8>>()
            .into()
    }
}
