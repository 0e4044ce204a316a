//! Failure taxonomy for the submission pipeline and the ticket feed.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an image file.")]
    MissingImage,
    #[error("Please provide either a voice note or a written description.")]
    MissingNarrative,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported.")]
    Unsupported,
    #[error("Unable to retrieve location.")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("Could not get upload URLs.")]
    Status { status: StatusCode },
    #[error("upload service returned an invalid {kind} destination: {url}")]
    InvalidDestination { kind: &'static str, url: String },
    #[error("could not reach upload service: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("File upload failed: {asset_name}.")]
    Status {
        asset_name: String,
        status: StatusCode,
    },
    #[error("File upload failed: {asset_name}. {source}")]
    Http {
        asset_name: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransferError {
    pub fn asset_name(&self) -> &str {
        match self {
            Self::Status { asset_name, .. } | Self::Http { asset_name, .. } => asset_name,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("AI processing failed: {server_message}")]
    Rejected {
        status: StatusCode,
        server_message: String,
    },
    #[error("AI processing failed with status {status}")]
    UnreadableFailure { status: StatusCode },
    #[error("could not reach processing service: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed endpoint is not configured")]
    Unconfigured,
    #[error("Could not fetch recent issues.")]
    Status { status: StatusCode },
    #[error("could not load recent issues: {0}")]
    Http(#[from] reqwest::Error),
}

/// Any failure that ends a submission run.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl SubmissionError {
    /// Text shown to the reporter once the run has failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            other => format!("An error occurred: {other}"),
        }
    }
}
