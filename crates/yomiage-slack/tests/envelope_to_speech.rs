//! Socket Mode envelopes through the router into a real `SpeechPipeline`.
//!
//! The transport, identity lookup, synthesizer and device are in-memory
//! fakes; everything between them is production code.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use tokio::sync::Notify;
use yomiage_core::{
    AudioError, AudioOutput, IdentityError, IdentityLookup, MessageFilter, PcmAudio,
    PlaybackSerializer, SpeechPipeline, SpeechSynthesizer, SynthesisError, SynthesisQuery,
    UserProfile, WAV_HEADER_SIZE,
};
use yomiage_slack::{EnvelopeSource, EventRouter, RouterError, SlackResult, TransportEvent};

struct ScriptedSource {
    events: VecDeque<TransportEvent>,
    acked: Vec<String>,
}

#[async_trait]
impl EnvelopeSource for ScriptedSource {
    async fn next(&mut self) -> Option<TransportEvent> {
        self.events.pop_front()
    }

    async fn ack(&mut self, envelope_id: &str) -> SlackResult<()> {
        self.acked.push(envelope_id.to_string());
        Ok(())
    }
}

struct Directory;

#[async_trait]
impl IdentityLookup for Directory {
    async fn lookup_user(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        Ok(UserProfile {
            id: user_id.to_string(),
            display_name: "Alice".into(),
            ..UserProfile::default()
        })
    }
}

#[derive(Default)]
struct Engine {
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSynthesizer for Engine {
    async fn audio_query(&self, text: &str) -> Result<SynthesisQuery, SynthesisError> {
        self.queries.lock().unwrap().push(text.to_string());
        Ok(SynthesisQuery::new(Bytes::from_static(b"{}")))
    }

    async fn synthesis(&self, _query: &SynthesisQuery) -> Result<Bytes, SynthesisError> {
        let mut document = vec![0x52u8; WAV_HEADER_SIZE];
        document.extend_from_slice(&[0x34, 0x12]);
        Ok(Bytes::from(document))
    }
}

#[derive(Default)]
struct Speaker {
    played: Mutex<Vec<Vec<u8>>>,
    done: Notify,
}

impl AudioOutput for Speaker {
    fn submit(&self, pcm: &PcmAudio) -> Result<(), AudioError> {
        self.played.lock().unwrap().push(pcm.as_bytes().to_vec());
        self.done.notify_one();
        Ok(())
    }

    fn is_playing(&self) -> bool {
        false
    }

    fn release(&self) {}
}

fn message(id: &str, user: &str, text: &str) -> TransportEvent {
    TransportEvent::Envelope(
        serde_json::from_value(json!({
            "type": "events_api",
            "envelope_id": id,
            "payload": {
                "type": "event_callback",
                "event": {
                    "type": "message",
                    "user": user,
                    "channel": "C1",
                    "text": text,
                    "ts": "1700000000.000100"
                }
            }
        }))
        .unwrap(),
    )
}

#[tokio::test]
async fn allowed_message_is_spoken_and_others_are_acked_only() {
    let engine = Arc::new(Engine::default());
    let speaker = Arc::new(Speaker::default());
    let pipeline = SpeechPipeline::new(
        MessageFilter::new(["U1"], Vec::<String>::new()),
        Arc::new(Directory),
        engine.clone(),
        PlaybackSerializer::new(speaker.clone()),
    );
    let router = EventRouter::new(Arc::new(pipeline));

    let mut source = ScriptedSource {
        events: VecDeque::from(vec![
            TransportEvent::Connecting,
            TransportEvent::Connected,
            message("e-1", "U3", "not for me"),
            message("e-2", "U1", "<U2|Bob> hi"),
        ]),
        acked: Vec::new(),
    };

    let closed = router.run(&mut source).await;
    assert!(matches!(closed, Err(RouterError::TransportClosed)));
    assert_eq!(source.acked, vec!["e-1", "e-2"]);

    tokio::time::timeout(Duration::from_secs(5), speaker.done.notified())
        .await
        .expect("allowed message was never played");

    assert_eq!(
        *engine.queries.lock().unwrap(),
        vec!["Aliceさんからのメッセージ。Bob hi"]
    );
    assert_eq!(*speaker.played.lock().unwrap(), vec![vec![0x34, 0x12]]);
}
