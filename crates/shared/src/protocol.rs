use serde::{Deserialize, Serialize};

use crate::domain::{GeoPosition, Ticket, TicketId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadUrlsRequest {
    pub image_filename: String,
    pub audio_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadUrlsResponse {
    pub image_signed_url: String,
    pub image_gs_path: String,
    #[serde(default)]
    pub audio_signed_url: Option<String>,
    #[serde(default)]
    pub audio_gs_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessGrievanceRequest {
    pub image_path: String,
    pub audio_path: Option<String>,
    pub location: GeoPosition,
    pub text_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessGrievanceResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<TicketId>,
    pub ticket_data: Ticket,
}

impl ProcessGrievanceResponse {
    /// The ticket with the server-assigned id folded in when the payload lacks one.
    pub fn into_ticket(self) -> Ticket {
        let mut ticket = self.ticket_data;
        if ticket.id.is_none() {
            ticket.id = self.ticket_id;
        }
        ticket
    }
}
