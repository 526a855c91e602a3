//! View controllers
//!
//! Per-view composition of the arbiter, capture session, event feed and
//! remote contracts. These hold no hard logic of their own: they sequence
//! the underlying components and turn denials/failures into user-facing
//! messages.

pub mod recognition;
pub mod recording;
pub mod training;

pub use recognition::RecognitionController;
pub use recording::RecordingController;
pub use training::TrainingController;
