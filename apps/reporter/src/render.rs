//! Terminal rendering of view events.

use client_core::{FeedState, TicketSummary, ViewEvent, ViewState};
use tokio::{sync::broadcast, task::JoinHandle};

pub fn spawn_renderer(mut events: broadcast::Receiver<ViewEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => render(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "renderer fell behind view events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn render(event: &ViewEvent) {
    match event {
        ViewEvent::StateChanged(ViewState::Loading { step_label }) => println!("{step_label}"),
        ViewEvent::StateChanged(ViewState::Success { ticket }) => {
            let summary = TicketSummary::for_success(ticket);
            println!();
            println!("Report filed: {}", summary.headline);
            println!(
                "A formal inspection request has been initiated. The AI-generated description is: \"{}\"",
                summary.ai_description
            );
            println!("{}", summary.description);
        }
        ViewEvent::StateChanged(ViewState::Error { message }) => eprintln!("{message}"),
        ViewEvent::StateChanged(ViewState::Form) | ViewEvent::FormCleared => {}
        ViewEvent::SubmitEnabled(enabled) => tracing::debug!(enabled, "submit trigger toggled"),
        ViewEvent::FeedChanged(feed) => render_feed(feed),
    }
}

fn render_feed(feed: &FeedState) {
    if let Some(notice) = feed.notice() {
        println!("{notice}");
        return;
    }
    let FeedState::Loaded(tickets) = feed else {
        return;
    };

    println!();
    println!("Recent reports:");
    for ticket in tickets {
        let summary = TicketSummary::for_feed(ticket);
        println!("[{}] {}", summary.status_badge, summary.headline);
        println!("    {}", summary.description);
        println!("    Reported: {}", summary.reported_at);
    }
}
