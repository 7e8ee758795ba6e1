//! Local audio output for yomiage.
//!
//! [`LocalAudioOutput`] implements [`yomiage_core::AudioOutput`] on the
//! default output device. The rodio stream lives on a dedicated OS thread
//! (see [`audio_thread`]); the output itself is a `Send + Sync` proxy.

#![deny(unused_crate_dependencies)]

pub mod audio_thread;
mod output;
mod playback;

pub use audio_thread::{AudioThreadHandle, Player};
pub use output::LocalAudioOutput;
pub use playback::DevicePlayer;
