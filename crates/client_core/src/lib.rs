//! Client side of the grievance reporter: the submission pipeline, its
//! collaborators and the view model a front end renders.

pub mod asset;
pub mod config;
pub mod error;
pub mod feed;
pub mod location;
pub mod processing;
pub mod upload;
pub mod validation;
pub mod view_state;
pub mod workflow;

pub use asset::{BinaryAsset, SubmissionInput};
pub use config::{load_settings, ClientConfig, FeedEndpoint, Settings};
pub use error::SubmissionError;
pub use feed::{FeedState, TicketFeedLoader};
pub use location::{
    LocationProvider, PositionReply, PositionSensor, SensorLocationProvider, StaticPositionSensor,
};
pub use processing::ProcessingClient;
pub use upload::{NegotiatedUploads, UploadCoordinator, UploadDestination, UploadedPaths};
pub use view_state::{TicketSummary, ViewEvent, ViewState, ViewStateController};
pub use workflow::{Step, SubmissionWorkflow, SubmitOutcome, WorkflowStage};

#[cfg(test)]
#[path = "tests/support.rs"]
mod support;
