//! Core services: the pipeline and its playback serializer.
//!
//! Services orchestrate ports and domain logic. They never see a concrete
//! adapter.

mod pipeline;
mod playback;

pub use pipeline::{PipelineError, RunOutcome, RunStage, SpeechPipeline};
pub use playback::{PlaybackError, PlaybackSerializer, SpeakingIndicator};
