//! Domain types: messages, filtering, identity, text and audio documents.
//!
//! Pure values with no I/O. Everything that talks to the outside world goes
//! through [`crate::ports`].

pub mod audio;
pub mod filter;
pub mod identity;
pub mod message;
pub mod text;

pub use audio::{PcmAudio, TruncatedAudio, WAV_HEADER_SIZE};
pub use filter::{AUTOMATED_SUBTYPES, FilterDecision, MessageFilter, RejectReason};
pub use identity::{PLACEHOLDER_NAME, UserProfile, resolve_display_name};
pub use message::{InboundMessageEvent, MessageRef};
pub use text::{MESSAGE_FROM_SUFFIX, Utterance, normalize_markup};
