//! Presentation-agnostic view model, broadcast to whatever renders it.

use chrono::Local;
use shared::domain::Ticket;
use tokio::sync::broadcast;

use crate::feed::FeedState;

const SUCCESS_PLACEHOLDER: &str = "Your report is being processed.";
const FEED_PLACEHOLDER: &str = "No description provided.";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Form,
    Loading { step_label: &'static str },
    Success { ticket: Ticket },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    StateChanged(ViewState),
    SubmitEnabled(bool),
    FormCleared,
    FeedChanged(FeedState),
}

/// Text a renderer needs to show one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    pub status_badge: String,
    pub headline: String,
    pub description: String,
    pub ai_description: String,
    pub reported_at: String,
}

impl TicketSummary {
    /// Summary for the confirmation card shown after a successful submission.
    pub fn for_success(ticket: &Ticket) -> Self {
        Self::build(ticket, SUCCESS_PLACEHOLDER)
    }

    /// Summary for one entry of the recent-reports feed.
    pub fn for_feed(ticket: &Ticket) -> Self {
        Self::build(ticket, FEED_PLACEHOLDER)
    }

    fn build(ticket: &Ticket, placeholder: &str) -> Self {
        Self {
            status_badge: ticket.status.as_str().to_uppercase(),
            headline: ticket.headline(),
            description: ticket.narrative().unwrap_or(placeholder).to_string(),
            ai_description: ticket.image.ai_description.clone(),
            reported_at: ticket
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        }
    }
}

/// Holds the single active [`ViewState`], the submit-trigger flag and the feed panel.
pub struct ViewStateController {
    current: ViewState,
    submit_enabled: bool,
    feed: FeedState,
    events: broadcast::Sender<ViewEvent>,
}

impl ViewStateController {
    pub fn new(events: broadcast::Sender<ViewEvent>) -> Self {
        Self {
            current: ViewState::Form,
            submit_enabled: true,
            feed: FeedState::Loading,
            events,
        }
    }

    pub fn current(&self) -> &ViewState {
        &self.current
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn feed(&self) -> &FeedState {
        &self.feed
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub fn show(&mut self, state: ViewState) {
        if self.current == state {
            return;
        }
        self.current = state.clone();
        self.emit(ViewEvent::StateChanged(state));
    }

    pub fn set_submit_enabled(&mut self, enabled: bool) {
        if self.submit_enabled == enabled {
            return;
        }
        self.submit_enabled = enabled;
        self.emit(ViewEvent::SubmitEnabled(enabled));
    }

    pub fn clear_form(&mut self) {
        self.emit(ViewEvent::FormCleared);
    }

    pub fn set_feed(&mut self, feed: FeedState) {
        self.feed = feed.clone();
        self.emit(ViewEvent::FeedChanged(feed));
    }

    fn emit(&self, event: ViewEvent) {
        // No subscribers is fine; the state is still readable through the accessors.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/view_state_tests.rs"]
mod tests;
