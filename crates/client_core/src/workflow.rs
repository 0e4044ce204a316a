//! End-to-end submission run: validate, locate, negotiate, upload, process, refresh.

use std::sync::Arc;

use reqwest::Client;
use shared::domain::Ticket;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

use crate::{
    asset::SubmissionInput,
    config::ClientConfig,
    error::SubmissionError,
    feed::{FeedState, TicketFeedLoader},
    location::LocationProvider,
    processing::ProcessingClient,
    upload::UploadCoordinator,
    validation::validate,
    view_state::{ViewEvent, ViewState, ViewStateController},
};

const VIEW_EVENT_CAPACITY: usize = 64;

/// In-flight stages of a submission run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Validating,
    AcquiringLocation,
    NegotiatingUpload,
    Uploading,
    Processing,
}

impl Step {
    /// Progress text shown while the step runs; validation is too quick to announce.
    pub fn progress_label(self) -> Option<&'static str> {
        match self {
            Self::Validating => None,
            Self::AcquiringLocation => Some("1/4: Getting your location..."),
            Self::NegotiatingUpload => Some("2/4: Preparing secure file upload..."),
            Self::Uploading => Some("3/4: Uploading files..."),
            Self::Processing => Some("4/4: Analyzing grievance with AI..."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStage {
    Idle,
    Running(Step),
    Succeeded,
    Failed { step: Step, message: String },
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Succeeded(Ticket),
    Failed(SubmissionError),
    /// A run was already in flight, or the success card is still showing.
    Ignored,
}

struct WorkflowInner {
    stage: WorkflowStage,
    view: ViewStateController,
}

impl WorkflowInner {
    fn enter(&mut self, step: Step) {
        debug!(?step, "workflow: entering step");
        self.stage = WorkflowStage::Running(step);
        match step.progress_label() {
            Some(step_label) => self.view.show(ViewState::Loading { step_label }),
            None => self.view.set_submit_enabled(false),
        }
    }
}

pub struct SubmissionWorkflow {
    location: Arc<dyn LocationProvider>,
    uploads: UploadCoordinator,
    processing: ProcessingClient,
    feed: TicketFeedLoader,
    events: broadcast::Sender<ViewEvent>,
    inner: Mutex<WorkflowInner>,
}

impl SubmissionWorkflow {
    pub fn new(config: &ClientConfig, location: Arc<dyn LocationProvider>) -> Self {
        Self::with_http(Client::new(), config, location)
    }

    pub fn with_http(
        http: Client,
        config: &ClientConfig,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        let (events, _) = broadcast::channel(VIEW_EVENT_CAPACITY);
        Self {
            location,
            uploads: UploadCoordinator::new(http.clone(), config),
            processing: ProcessingClient::new(http.clone(), config),
            feed: TicketFeedLoader::new(http, config),
            inner: Mutex::new(WorkflowInner {
                stage: WorkflowStage::Idle,
                view: ViewStateController::new(events.clone()),
            }),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub async fn stage(&self) -> WorkflowStage {
        self.inner.lock().await.stage.clone()
    }

    pub async fn view_state(&self) -> ViewState {
        self.inner.lock().await.view.current().clone()
    }

    pub async fn submit_enabled(&self) -> bool {
        self.inner.lock().await.view.submit_enabled()
    }

    pub async fn feed_state(&self) -> FeedState {
        self.inner.lock().await.view.feed().clone()
    }

    /// Reloads the recent-reports panel. Failures stay local to the panel.
    pub async fn load_feed(&self) -> FeedState {
        self.inner.lock().await.view.set_feed(FeedState::Loading);
        let feed = self.feed.refresh().await;
        self.inner.lock().await.view.set_feed(feed.clone());
        feed
    }

    /// Runs one submission. Ignored while another run is in flight or while the
    /// success card is showing.
    pub async fn submit(&self, input: SubmissionInput) -> SubmitOutcome {
        {
            let mut inner = self.inner.lock().await;
            match inner.stage {
                WorkflowStage::Idle | WorkflowStage::Failed { .. } => {}
                WorkflowStage::Running(_) | WorkflowStage::Succeeded => {
                    debug!(stage = ?inner.stage, "workflow: submit ignored");
                    return SubmitOutcome::Ignored;
                }
            }
            inner.enter(Step::Validating);
        }

        match self.run(input).await {
            Ok(ticket) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.stage = WorkflowStage::Succeeded;
                    inner.view.show(ViewState::Success {
                        ticket: ticket.clone(),
                    });
                    inner.view.clear_form();
                    inner.view.set_submit_enabled(true);
                }
                info!(headline = %ticket.headline(), "workflow: submission succeeded");
                self.load_feed().await;
                SubmitOutcome::Succeeded(ticket)
            }
            Err((step, err)) => {
                let message = err.user_message();
                error!(?step, "workflow: submission failed: {err}");
                let mut inner = self.inner.lock().await;
                inner.stage = WorkflowStage::Failed {
                    step,
                    message: message.clone(),
                };
                inner.view.show(ViewState::Error { message });
                inner.view.set_submit_enabled(true);
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// "Report another": leaves a terminal stage and shows the form again.
    pub async fn report_another(&self) {
        let mut inner = self.inner.lock().await;
        if !matches!(
            inner.stage,
            WorkflowStage::Succeeded | WorkflowStage::Failed { .. }
        ) {
            return;
        }
        inner.stage = WorkflowStage::Idle;
        inner.view.show(ViewState::Form);
    }

    async fn advance(&self, step: Step) {
        self.inner.lock().await.enter(step);
    }

    async fn run(&self, input: SubmissionInput) -> Result<Ticket, (Step, SubmissionError)> {
        let submission =
            validate(input).map_err(|err| (Step::Validating, SubmissionError::from(err)))?;

        self.advance(Step::AcquiringLocation).await;
        let location = self
            .location
            .acquire()
            .await
            .map_err(|err| (Step::AcquiringLocation, SubmissionError::from(err)))?;

        self.advance(Step::NegotiatingUpload).await;
        let audio_name = submission.audio.as_ref().map(|audio| audio.name());
        let destinations = self
            .uploads
            .negotiate(submission.image.name(), audio_name)
            .await
            .map_err(|err| (Step::NegotiatingUpload, SubmissionError::from(err)))?;

        self.advance(Step::Uploading).await;
        let paths = self
            .uploads
            .upload_all(&destinations, &submission.image, submission.audio.as_ref())
            .await
            .map_err(|err| (Step::Uploading, SubmissionError::from(err)))?;

        self.advance(Step::Processing).await;
        self.processing
            .process(
                &paths.image_path,
                paths.audio_path.as_deref(),
                location,
                submission.text_description.as_deref(),
            )
            .await
            .map_err(|err| (Step::Processing, SubmissionError::from(err)))
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
