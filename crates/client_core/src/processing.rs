use reqwest::Client;
use shared::{
    domain::{GeoPosition, Ticket},
    error::ServiceError,
    protocol::{ProcessGrievanceRequest, ProcessGrievanceResponse},
};
use tracing::{info, warn};
use url::Url;

use crate::{config::ClientConfig, error::ProcessingError};

/// Client for the analysis service that turns uploaded assets into a ticket.
pub struct ProcessingClient {
    http: Client,
    endpoint: Url,
}

impl ProcessingClient {
    pub fn new(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.process_endpoint.clone(),
        }
    }

    pub async fn process(
        &self,
        image_path: &str,
        audio_path: Option<&str>,
        location: GeoPosition,
        text_description: Option<&str>,
    ) -> Result<Ticket, ProcessingError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ProcessGrievanceRequest {
                image_path: image_path.to_string(),
                audio_path: audio_path.map(str::to_string),
                location,
                text_description: text_description.map(str::to_string),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(match serde_json::from_slice::<ServiceError>(&body) {
                Ok(service_error) => {
                    warn!(%status, error = %service_error.error, "processing: request rejected");
                    ProcessingError::Rejected {
                        status,
                        server_message: service_error.error,
                    }
                }
                Err(err) => {
                    warn!(%status, "processing: unreadable failure body: {err}");
                    ProcessingError::UnreadableFailure { status }
                }
            });
        }

        let body: ProcessGrievanceResponse = response.json().await?;
        let ticket = body.into_ticket();
        info!(
            ticket_id = ticket.id.as_ref().map(|id| id.0.as_str()).unwrap_or(""),
            category = %ticket.image.category,
            status = ticket.status.as_str(),
            "processing: ticket created"
        );
        Ok(ticket)
    }
}

#[cfg(test)]
#[path = "tests/processing_tests.rs"]
mod tests;
