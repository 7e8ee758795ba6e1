//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the pipeline expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest`, `rodio` or websocket types in any signature
//! - Each port owns its error type; adapters map their own errors at the boundary
//! - `Send + Sync` everywhere so ports can be shared through `Arc<dyn …>`

pub mod annotation;
pub mod audio_output;
pub mod handler;
pub mod identity;
pub mod synthesis;

pub use annotation::{AnnotationError, MessageAnnotator};
pub use audio_output::{AudioError, AudioOutput};
pub use handler::MessageHandler;
pub use identity::{IdentityError, IdentityLookup};
pub use synthesis::{SpeechSynthesizer, SynthesisCall, SynthesisError, SynthesisQuery};

#[cfg(test)]
pub use annotation::MockMessageAnnotator;
#[cfg(test)]
pub use identity::MockIdentityLookup;
#[cfg(test)]
pub use synthesis::MockSpeechSynthesizer;
