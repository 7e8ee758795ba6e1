//! Audio documents returned by the synthesis service.
//!
//! The synthesis call answers with a canonical 44-byte RIFF/WAVE header
//! followed by little-endian signed 16-bit mono PCM. Only the PCM payload is
//! handed to the output device.

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

/// Size of the fixed WAV container header.
pub const WAV_HEADER_SIZE: usize = 44;

/// Bytes per sample (16-bit mono).
pub const BYTES_PER_SAMPLE: usize = 2;

/// The document cannot contain any audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("synthesized WAV data is too short ({len} bytes, header alone is 44)")]
pub struct TruncatedAudio {
    pub len: usize,
}

/// Raw PCM payload ready for the output device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmAudio {
    data: Bytes,
}

impl PcmAudio {
    /// Strip the container header from a synthesis response.
    ///
    /// Documents of `WAV_HEADER_SIZE` bytes or fewer are rejected.
    pub fn from_wav_document(document: Bytes) -> Result<Self, TruncatedAudio> {
        if document.len() <= WAV_HEADER_SIZE {
            return Err(TruncatedAudio {
                len: document.len(),
            });
        }
        Ok(Self {
            data: document.slice(WAV_HEADER_SIZE..),
        })
    }

    /// Wrap an already header-less payload.
    pub const fn from_pcm(data: Bytes) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode into signed 16-bit samples. A trailing odd byte is dropped.
    pub fn samples(&self) -> Vec<i16> {
        self.data
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    /// Playback length at the given rate.
    pub fn duration(&self, sample_rate: u32) -> Duration {
        if sample_rate == 0 {
            return Duration::ZERO;
        }
        let samples = (self.data.len() / BYTES_PER_SAMPLE) as u64;
        Duration::from_micros(samples * 1_000_000 / u64::from(sample_rate))
    }
}
