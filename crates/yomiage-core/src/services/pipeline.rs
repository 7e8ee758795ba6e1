//! Message-to-speech pipeline.
//!
//! One run per inbound message:
//!
//! ```text
//!   filter ─reject─▶ (dropped)
//!     │
//!   resolve name ─▶ Querying ─▶ Synthesizing ─▶ WaitingForDevice ─▶ Playing ─▶ Done
//!                      │             │                                  │
//!                      └─────────────┴──────────────▶ Failed ◀──────────┘
//! ```
//!
//! The identity lookup and both synthesis calls share one deadline. Playback
//! is not subject to it. Nothing is retried and errors never leave the run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;

use crate::domain::{
    FilterDecision, InboundMessageEvent, MessageFilter, PcmAudio, RejectReason, TruncatedAudio,
    Utterance, normalize_markup, resolve_display_name,
};
use crate::ports::{
    IdentityError, IdentityLookup, MessageHandler, SpeechSynthesizer, SynthesisCall, SynthesisError,
};
use crate::services::playback::{PlaybackError, PlaybackSerializer};
use crate::settings::{DEFAULT_RUN_DEADLINE, Settings};

// ── Run state machine ──────────────────────────────────────────────

/// Stage of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Generating the synthesis query.
    Querying,
    /// Rendering the query into audio.
    Synthesizing,
    /// Waiting for exclusive access to the output device.
    WaitingForDevice,
    /// Audio is playing.
    Playing,
    /// Playback finished.
    Done,
    /// The run aborted.
    Failed,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Querying => "querying",
            Self::Synthesizing => "synthesizing",
            Self::WaitingForDevice => "waiting_for_device",
            Self::Playing => "playing",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

// ── Errors and outcomes ────────────────────────────────────────────

/// Per-run failures. Logged with the utterance and dropped.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The shared deadline expired.
    #[error("run deadline of {deadline:?} expired while {stage}")]
    Timeout { stage: RunStage, deadline: Duration },

    /// One of the synthesis calls failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The synthesis response cannot contain audio.
    #[error(transparent)]
    TruncatedAudio(#[from] TruncatedAudio),

    /// The output device rejected the audio.
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

impl PipelineError {
    /// Stage the run was in when it failed.
    pub const fn stage(&self) -> RunStage {
        match self {
            Self::Timeout { stage, .. } => *stage,
            Self::Synthesis(
                SynthesisError::Api { call, .. } | SynthesisError::Transport { call, .. },
            ) => match call {
                SynthesisCall::AudioQuery => RunStage::Querying,
                SynthesisCall::Synthesis => RunStage::Synthesizing,
            },
            Self::Synthesis(SynthesisError::InvalidEndpoint(_)) => RunStage::Querying,
            Self::TruncatedAudio(_) => RunStage::Synthesizing,
            Self::Playback(_) => RunStage::Playing,
        }
    }
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The filter dropped the message.
    Rejected(RejectReason),
    /// The utterance was played to completion.
    Spoken {
        utterance: Utterance,
        pcm_bytes: usize,
    },
}

// ── Pipeline ───────────────────────────────────────────────────────

/// Filter → enrich → synthesize → play, for one message at a time per call.
///
/// Shared behind an `Arc` by every spawned run; the only mutable state is
/// the playback gate inside [`PlaybackSerializer`].
pub struct SpeechPipeline {
    filter: MessageFilter,
    identity: Arc<dyn IdentityLookup>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    playback: PlaybackSerializer,
    deadline: Duration,
}

impl SpeechPipeline {
    pub fn new(
        filter: MessageFilter,
        identity: Arc<dyn IdentityLookup>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        playback: PlaybackSerializer,
    ) -> Self {
        Self {
            filter,
            identity,
            synthesizer,
            playback,
            deadline: DEFAULT_RUN_DEADLINE,
        }
    }

    /// Build from settings: allow-lists and the run deadline.
    pub fn from_settings(
        settings: &Settings,
        identity: Arc<dyn IdentityLookup>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        playback: PlaybackSerializer,
    ) -> Self {
        Self::new(
            MessageFilter::from_allow_lists(&settings.allow),
            identity,
            synthesizer,
            playback,
        )
        .with_deadline(settings.runtime.run_deadline)
    }

    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run one message through the whole pipeline.
    pub async fn process(&self, event: InboundMessageEvent) -> Result<RunOutcome, PipelineError> {
        if let FilterDecision::Reject(reason) = self.filter.evaluate(&event) {
            tracing::debug!(
                user = %event.user,
                channel = %event.channel,
                reason = %reason,
                "Message filtered out"
            );
            return Ok(RunOutcome::Rejected(reason));
        }

        let deadline = Instant::now() + self.deadline;

        let display_name = self.resolve_name(&event.user, deadline).await;
        let utterance = Utterance::compose(&display_name, &normalize_markup(&event.text));
        tracing::info!(utterance = %utterance, "Preparing to speak");

        match self.speak(&event, &utterance, deadline).await {
            Ok(pcm_bytes) => {
                tracing::info!(utterance = %utterance, stage = %RunStage::Done, "Finished playing audio");
                Ok(RunOutcome::Spoken {
                    utterance,
                    pcm_bytes,
                })
            }
            Err(e) => {
                tracing::error!(
                    utterance = %utterance,
                    stage = %RunStage::Failed,
                    failed_at = %e.stage(),
                    error = %e,
                    "Dropping message"
                );
                Err(e)
            }
        }
    }

    async fn resolve_name(&self, user_id: &str, deadline: Instant) -> String {
        let lookup = tokio::time::timeout_at(deadline, self.identity.lookup_user(user_id))
            .await
            .unwrap_or_else(|_| Err(IdentityError::Unavailable("deadline expired".into())));

        if let Err(e) = &lookup {
            tracing::warn!(
                user = %user_id,
                error = %e,
                "Failed to get user info; using user id as fallback name"
            );
        }
        resolve_display_name(user_id, &lookup)
    }

    async fn speak(
        &self,
        event: &InboundMessageEvent,
        utterance: &Utterance,
        deadline: Instant,
    ) -> Result<usize, PipelineError> {
        let pcm = self.synthesize(utterance, deadline).await?;

        tracing::info!(
            utterance = %utterance,
            pcm_bytes = pcm.len(),
            stage = %RunStage::WaitingForDevice,
            "Audio ready"
        );
        self.playback.play(&pcm, &event.message_ref()).await?;
        Ok(pcm.len())
    }

    async fn synthesize(&self, utterance: &Utterance, deadline: Instant) -> Result<PcmAudio, PipelineError> {
        let expired = |stage| PipelineError::Timeout {
            stage,
            deadline: self.deadline,
        };

        tracing::debug!(stage = %RunStage::Querying, "Requesting audio query");
        let query = tokio::time::timeout_at(deadline, self.synthesizer.audio_query(utterance.as_str()))
            .await
            .map_err(|_| expired(RunStage::Querying))??;

        tracing::debug!(stage = %RunStage::Synthesizing, "Requesting synthesis");
        let document = tokio::time::timeout_at(deadline, self.synthesizer.synthesis(&query))
            .await
            .map_err(|_| expired(RunStage::Synthesizing))??;

        Ok(PcmAudio::from_wav_document(document)?)
    }
}

#[async_trait]
impl MessageHandler for SpeechPipeline {
    async fn handle(&self, event: InboundMessageEvent) {
        // Failures are already logged with their utterance inside `process`.
        let _ = self.process(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserProfile, WAV_HEADER_SIZE};
    use crate::ports::{
        AudioError, AudioOutput, MockIdentityLookup, MockSpeechSynthesizer, SynthesisQuery,
    };
    use bytes::Bytes;
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Default)]
    struct RecordingOutput {
        submitted: Mutex<Vec<Vec<u8>>>,
    }

    impl AudioOutput for RecordingOutput {
        fn submit(&self, pcm: &PcmAudio) -> Result<(), AudioError> {
            self.submitted.lock().unwrap().push(pcm.as_bytes().to_vec());
            Ok(())
        }

        fn is_playing(&self) -> bool {
            false
        }

        fn release(&self) {}
    }

    fn wav(payload: &[u8]) -> Bytes {
        let mut bytes = vec![0u8; WAV_HEADER_SIZE];
        bytes.extend_from_slice(payload);
        Bytes::from(bytes)
    }

    fn message(user: &str, text: &str) -> InboundMessageEvent {
        InboundMessageEvent {
            user: user.into(),
            channel: "C1".into(),
            text: text.into(),
            ts: "1.0".into(),
            ..InboundMessageEvent::default()
        }
    }

    fn identity_named(display: &'static str) -> MockIdentityLookup {
        let mut identity = MockIdentityLookup::new();
        identity.expect_lookup_user().returning(move |id| {
            Ok(UserProfile {
                id: id.to_string(),
                display_name: display.to_string(),
                ..UserProfile::default()
            })
        });
        identity
    }

    fn pipeline(
        identity: MockIdentityLookup,
        synthesizer: MockSpeechSynthesizer,
        output: Arc<RecordingOutput>,
    ) -> SpeechPipeline {
        SpeechPipeline::new(
            MessageFilter::default(),
            Arc::new(identity),
            Arc::new(synthesizer),
            PlaybackSerializer::new(output),
        )
    }

    #[tokio::test]
    async fn speaks_normalized_text_with_resolved_name() {
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_query()
            .withf(|text| text == "Aliceさんからのメッセージ。Bob hi")
            .times(1)
            .returning(|_| Ok(SynthesisQuery::new(Bytes::from_static(b"{}"))));
        synth
            .expect_synthesis()
            .times(1)
            .returning(|_| Ok(wav(&[9, 8, 7, 6])));

        let output = Arc::new(RecordingOutput::default());
        let outcome = assert_ok!(
            pipeline(identity_named("Alice"), synth, output.clone())
                .process(message("U1", "<U2|Bob> hi"))
                .await
        );

        assert_eq!(
            outcome,
            RunOutcome::Spoken {
                utterance: Utterance::compose("Alice", "Bob hi"),
                pcm_bytes: 4
            }
        );
        assert_eq!(*output.submitted.lock().unwrap(), vec![vec![9, 8, 7, 6]]);
    }

    #[tokio::test]
    async fn rejected_message_never_reaches_synthesis() {
        let mut synth = MockSpeechSynthesizer::new();
        synth.expect_audio_query().never();
        synth.expect_synthesis().never();
        let mut identity = MockIdentityLookup::new();
        identity.expect_lookup_user().never();

        let mut bot = message("U1", "beep");
        bot.bot_id = Some("B1".into());

        let output = Arc::new(RecordingOutput::default());
        let outcome = pipeline(identity, synth, output.clone()).process(bot).await.unwrap();

        assert_eq!(outcome, RunOutcome::Rejected(RejectReason::BotMessage));
        assert!(output.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn identity_failure_falls_back_to_user_id() {
        let mut identity = MockIdentityLookup::new();
        identity
            .expect_lookup_user()
            .returning(|_| Err(IdentityError::Lookup("user_not_found".into())));
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_query()
            .withf(|text| text.starts_with("U42さんからのメッセージ。"))
            .times(1)
            .returning(|_| Ok(SynthesisQuery::new(Bytes::from_static(b"{}"))));
        synth.expect_synthesis().returning(|_| Ok(wav(&[1, 0])));

        let output = Arc::new(RecordingOutput::default());
        assert_ok!(pipeline(identity, synth, output).process(message("U42", "hi")).await);
    }

    #[tokio::test]
    async fn query_error_aborts_before_synthesis() {
        let mut synth = MockSpeechSynthesizer::new();
        synth.expect_audio_query().returning(|_| {
            Err(SynthesisError::Api {
                call: SynthesisCall::AudioQuery,
                status: 422,
                body: "{\"detail\":\"bad speaker\"}".into(),
            })
        });
        synth.expect_synthesis().never();

        let output = Arc::new(RecordingOutput::default());
        let err = assert_err!(
            pipeline(identity_named("Alice"), synth, output.clone())
                .process(message("U1", "hi"))
                .await
        );

        assert_eq!(err.stage(), RunStage::Querying);
        assert!(err.to_string().contains("422"));
        assert!(output.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn header_only_document_is_rejected_before_playback() {
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_query()
            .returning(|_| Ok(SynthesisQuery::new(Bytes::from_static(b"{}"))));
        synth.expect_synthesis().returning(|_| Ok(wav(&[])));

        let output = Arc::new(RecordingOutput::default());
        let err = pipeline(identity_named("Alice"), synth, output.clone())
            .process(message("U1", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::TruncatedAudio(TruncatedAudio { len: 44 })));
        assert_eq!(err.stage(), RunStage::Synthesizing);
        assert!(output.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_consumes_the_shared_deadline() {
        struct SlowIdentity;

        #[async_trait]
        impl IdentityLookup for SlowIdentity {
            async fn lookup_user(&self, _user_id: &str) -> Result<UserProfile, IdentityError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(UserProfile::default())
            }
        }

        struct SlowSynth;

        #[async_trait]
        impl SpeechSynthesizer for SlowSynth {
            async fn audio_query(&self, _text: &str) -> Result<SynthesisQuery, SynthesisError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(SynthesisQuery::new(Bytes::new()))
            }

            async fn synthesis(&self, _query: &SynthesisQuery) -> Result<Bytes, SynthesisError> {
                Ok(wav(&[1, 0]))
            }
        }

        let output = Arc::new(RecordingOutput::default());
        let pipeline = SpeechPipeline::new(
            MessageFilter::default(),
            Arc::new(SlowIdentity),
            Arc::new(SlowSynth),
            PlaybackSerializer::new(output.clone()),
        )
        .with_deadline(Duration::from_secs(5));

        let err = pipeline.process(message("U1", "hi")).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Timeout {
                stage: RunStage::Querying,
                ..
            }
        ));
        assert!(output.submitted.lock().unwrap().is_empty());
    }

    /// Collects formatted log lines written while a test runs.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_run_logs_terminal_stage_and_where_it_failed() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_query()
            .returning(|_| Ok(SynthesisQuery::new(Bytes::from_static(b"{}"))));
        synth.expect_synthesis().returning(|_| {
            Err(SynthesisError::Api {
                call: SynthesisCall::Synthesis,
                status: 500,
                body: String::new(),
            })
        });

        let output = Arc::new(RecordingOutput::default());
        let err = assert_err!(
            pipeline(identity_named("Alice"), synth, output)
                .process(message("U1", "hi"))
                .await
        );
        assert_eq!(err.stage(), RunStage::Synthesizing);

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let line = text
            .lines()
            .find(|line| line.contains("Dropping message"))
            .expect("failure is logged");
        assert!(line.contains("stage=failed"), "{line}");
        assert!(line.contains("failed_at=synthesizing"), "{line}");
    }
}
