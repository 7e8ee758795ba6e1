//! Domain types, ports and the message-to-speech pipeline of yomiage.
//!
//! This crate knows nothing about Slack, VOICEVOX or rodio. Adapters live in
//! `yomiage-slack`, `yomiage-voicevox` and `yomiage-audio`, and are wired
//! together by `yomiage-cli`.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;

pub use domain::{
    FilterDecision, InboundMessageEvent, MessageFilter, MessageRef, PcmAudio, RejectReason,
    TruncatedAudio, UserProfile, Utterance, WAV_HEADER_SIZE, normalize_markup,
    resolve_display_name,
};
pub use ports::{
    AnnotationError, AudioError, AudioOutput, IdentityError, IdentityLookup, MessageAnnotator,
    MessageHandler, SpeechSynthesizer, SynthesisCall, SynthesisError, SynthesisQuery,
};
pub use services::{
    PipelineError, PlaybackError, PlaybackSerializer, RunOutcome, RunStage, SpeakingIndicator,
    SpeechPipeline,
};
pub use settings::{
    AllowLists, RuntimeOptions, Secret, Settings, SettingsError, SlackCredentials,
    VoicevoxSettings,
};
