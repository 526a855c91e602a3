//! Remote collaborator contracts
//!
//! Request/response seams for the services the core talks to: the
//! face-recognition microservice, the residents upload endpoint, and the
//! training backend. All three are black boxes here; the host application
//! implements the traits over its HTTP stack and tests use recording fakes.

pub mod recognition;
pub mod residents;
pub mod training;

pub use recognition::{CameraStartResponse, CameraStartStatus, RecognitionService};
pub use residents::{NewResidentForm, ResidentsApi};
pub use training::{TrainDatasetRequest, TrainingApi, TrainingCandidate};
