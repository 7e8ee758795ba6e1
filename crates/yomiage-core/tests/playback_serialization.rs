//! Playback mutual exclusion under concurrent pipeline runs.
//!
//! Runs execute on tokio's paused clock. The fake device plays each clip for
//! a fixed virtual duration and records when it was taken and given back, so
//! overlap is checked on exact instants.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;
use yomiage_core::{
    AudioError, AudioOutput, IdentityError, IdentityLookup, InboundMessageEvent, MessageFilter,
    MessageHandler, PcmAudio, PlaybackSerializer, RunOutcome, SpeechPipeline, SpeechSynthesizer,
    SynthesisError, SynthesisQuery, UserProfile, WAV_HEADER_SIZE,
};

const CLIP: Duration = Duration::from_millis(300);

// ── Fakes ──────────────────────────────────────────────────────────

struct NoIdentity;

#[async_trait]
impl IdentityLookup for NoIdentity {
    async fn lookup_user(&self, _user_id: &str) -> Result<UserProfile, IdentityError> {
        Err(IdentityError::Unavailable("offline".into()))
    }
}

/// Synthesizes instantly after a short per-call latency.
struct QuickSynthesizer;

#[async_trait]
impl SpeechSynthesizer for QuickSynthesizer {
    async fn audio_query(&self, _text: &str) -> Result<SynthesisQuery, SynthesisError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(SynthesisQuery::new(Bytes::from_static(b"{}")))
    }

    async fn synthesis(&self, _query: &SynthesisQuery) -> Result<Bytes, SynthesisError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let mut document = vec![0u8; WAV_HEADER_SIZE];
        document.extend_from_slice(&[0, 0, 1, 0]);
        Ok(Bytes::from(document))
    }
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    start: Instant,
    end: Instant,
}

#[derive(Default)]
struct DeviceState {
    busy_until: Option<Instant>,
    taken_at: Option<Instant>,
    intervals: Vec<Interval>,
    overlapping_submits: usize,
    failures_left: usize,
    releases: usize,
}

/// Single-clip device driven by the paused tokio clock.
#[derive(Default)]
struct TimedOutput {
    state: Mutex<DeviceState>,
}

impl TimedOutput {
    fn failing_first(n: usize) -> Self {
        let output = Self::default();
        output.state.lock().unwrap().failures_left = n;
        output
    }
}

impl AudioOutput for TimedOutput {
    fn submit(&self, _pcm: &PcmAudio) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();
        let now = Instant::now();
        if state.taken_at.is_some() {
            state.overlapping_submits += 1;
        }
        state.taken_at = Some(now);
        if state.failures_left > 0 {
            state.failures_left -= 1;
            return Err(AudioError::Submit("underrun".into()));
        }
        state.busy_until = Some(now + CLIP);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.busy_until.is_some_and(|until| Instant::now() < until)
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.releases += 1;
        state.busy_until = None;
        if let Some(start) = state.taken_at.take() {
            state.intervals.push(Interval {
                start,
                end: Instant::now(),
            });
        }
    }
}

fn message(n: usize) -> InboundMessageEvent {
    InboundMessageEvent {
        user: format!("U{n}"),
        channel: "C1".into(),
        text: format!("message {n}"),
        ts: format!("1700000000.{n:06}"),
        ..InboundMessageEvent::default()
    }
}

fn pipeline(output: Arc<TimedOutput>) -> Arc<SpeechPipeline> {
    Arc::new(SpeechPipeline::new(
        MessageFilter::default(),
        Arc::new(NoIdentity),
        Arc::new(QuickSynthesizer),
        PlaybackSerializer::new(output).with_poll_interval(Duration::from_millis(10)),
    ))
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn concurrent_runs_never_overlap_on_the_device() {
    const RUNS: usize = 6;
    let output = Arc::new(TimedOutput::default());
    let pipeline = pipeline(output.clone());

    let tasks: Vec<_> = (0..RUNS)
        .map(|n| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.process(message(n)).await })
        })
        .collect();
    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, RunOutcome::Spoken { .. }));
    }

    let state = output.state.lock().unwrap();
    assert_eq!(state.overlapping_submits, 0);
    assert_eq!(state.releases, RUNS);

    let mut intervals = state.intervals.clone();
    assert_eq!(intervals.len(), RUNS);
    intervals.sort_by_key(|i| i.start);
    for pair in intervals.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "playback intervals overlap: {pair:?}"
        );
    }
    for interval in &intervals {
        assert!(interval.end - interval.start >= CLIP);
    }
}

#[tokio::test(start_paused = true)]
async fn failed_submit_releases_the_device_for_the_next_run() {
    let output = Arc::new(TimedOutput::failing_first(1));
    let pipeline = pipeline(output.clone());

    let first = pipeline.process(message(1)).await;
    assert!(first.is_err());

    let second = tokio::time::timeout(Duration::from_secs(5), pipeline.process(message(2)))
        .await
        .expect("second run was starved");
    assert!(matches!(second, Ok(RunOutcome::Spoken { .. })));

    let state = output.state.lock().unwrap();
    assert_eq!(state.releases, 2);
    assert_eq!(state.intervals.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn synthesis_proceeds_while_another_run_plays() {
    let output = Arc::new(TimedOutput::default());
    let pipeline = pipeline(output.clone());

    let started = Instant::now();
    let a = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.handle(message(1)).await })
    };
    let b = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.handle(message(2)).await })
    };
    a.await.unwrap();
    b.await.unwrap();

    // Synthesis of the second run overlapped the first playback, so the
    // total is two clips plus one synthesis round, not two of each.
    let elapsed = Instant::now() - started;
    assert!(elapsed >= CLIP * 2);
    assert!(elapsed < CLIP * 2 + Duration::from_millis(100));
}
