use reqwest::Client;
use shared::domain::Ticket;
use tracing::{info, warn};

use crate::{
    config::{ClientConfig, FeedEndpoint},
    error::FeedError,
};

/// What the recent-reports panel should show.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    Loading,
    Unconfigured,
    Empty,
    Loaded(Vec<Ticket>),
    Error,
}

impl FeedState {
    /// Placeholder text for the states that carry no tickets.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading recent reports..."),
            Self::Unconfigured => Some("Admin: 'feed_endpoint' is not configured."),
            Self::Empty => Some("No reports filed yet."),
            Self::Error => Some("Error loading reports."),
            Self::Loaded(_) => None,
        }
    }
}

pub struct TicketFeedLoader {
    http: Client,
    endpoint: FeedEndpoint,
}

impl TicketFeedLoader {
    pub fn new(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.feed_endpoint.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.endpoint, FeedEndpoint::Configured(_))
    }

    /// Tickets in the order the service returned them.
    pub async fn load_feed(&self) -> Result<Vec<Ticket>, FeedError> {
        let FeedEndpoint::Configured(url) = &self.endpoint else {
            return Err(FeedError::Unconfigured);
        };

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { status });
        }
        Ok(response.json().await?)
    }

    /// Loads the feed and folds the outcome into a renderable state.
    pub async fn refresh(&self) -> FeedState {
        if !self.is_configured() {
            warn!("feed: endpoint not configured; skipping fetch");
            return FeedState::Unconfigured;
        }

        match self.load_feed().await {
            Ok(tickets) if tickets.is_empty() => {
                info!("feed: no reports yet");
                FeedState::Empty
            }
            Ok(tickets) => {
                info!(count = tickets.len(), "feed: loaded recent reports");
                FeedState::Loaded(tickets)
            }
            Err(err) => {
                warn!("feed: {err}");
                FeedState::Error
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
