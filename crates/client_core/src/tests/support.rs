//! In-process stand-in for the grievance services and the signed upload targets.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use shared::protocol::{ProcessGrievanceRequest, UploadUrlsRequest};
use tokio::{
    net::TcpListener,
    sync::{Barrier, Mutex, MutexGuard},
};

pub const BUCKET: &str = "grievance-uploads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub kind: String,
    pub name: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum FeedReply {
    Tickets(Value),
    Status(StatusCode),
}

#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub negotiate_status: StatusCode,
    pub omit_audio_destination: bool,
    pub failing_upload_kind: Option<&'static str>,
    /// Holds each PUT until both image and audio have arrived.
    pub rendezvous_uploads: bool,
    pub process_failure: Option<(StatusCode, String)>,
    pub ticket_status: &'static str,
    pub feed: FeedReply,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            negotiate_status: StatusCode::OK,
            omit_audio_destination: false,
            failing_upload_kind: None,
            rendezvous_uploads: false,
            process_failure: None,
            ticket_status: "new",
            feed: FeedReply::Tickets(json!([])),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockLog {
    pub negotiations: Vec<UploadUrlsRequest>,
    pub uploads: Vec<ReceivedUpload>,
    pub processed: Vec<ProcessGrievanceRequest>,
    pub feed_requests: usize,
}

impl MockLog {
    pub fn network_calls(&self) -> usize {
        self.negotiations.len() + self.uploads.len() + self.processed.len() + self.feed_requests
    }
}

#[derive(Clone)]
struct MockState {
    base_url: String,
    behavior: MockBehavior,
    log: Arc<Mutex<MockLog>>,
    rendezvous: Arc<Barrier>,
}

pub struct MockServices {
    pub base_url: String,
    log: Arc<Mutex<MockLog>>,
}

impl MockServices {
    pub async fn spawn(behavior: MockBehavior) -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let base_url = format!("http://{addr}");
        let log = Arc::new(Mutex::new(MockLog::default()));

        let state = MockState {
            base_url: base_url.clone(),
            behavior,
            log: log.clone(),
            rendezvous: Arc::new(Barrier::new(2)),
        };
        let app = Router::new()
            .route("/getUploadURLs", post(negotiate))
            .route("/signed/:kind/:name", put(receive_upload))
            .route("/processGrievance", post(process))
            .route("/getGrievances", get(feed))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base_url, log }
    }

    pub fn upload_endpoint(&self) -> String {
        format!("{}/getUploadURLs", self.base_url)
    }

    pub fn process_endpoint(&self) -> String {
        format!("{}/processGrievance", self.base_url)
    }

    pub fn feed_endpoint(&self) -> String {
        format!("{}/getGrievances", self.base_url)
    }

    pub fn signed_url(&self, kind: &str, name: &str) -> String {
        format!("{}/signed/{kind}/{name}", self.base_url)
    }

    pub async fn log(&self) -> MutexGuard<'_, MockLog> {
        self.log.lock().await
    }
}

pub fn storage_path(name: &str) -> String {
    format!("gs://{BUCKET}/uploads/{name}")
}

pub fn feed_ticket(id: &str, category: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "image": {
            "url": storage_path("photo.jpg"),
            "category": category,
            "ai_description": format!("{category} reported by a resident.")
        },
        "audio": { "url": "", "transcription": "", "language": "" },
        "text_description": "",
        "location": { "lat": 12.34, "lng": 56.78 },
        "timestamp": "2024-05-01T10:15:30+00:00"
    })
}

async fn negotiate(
    State(state): State<MockState>,
    Json(request): Json<UploadUrlsRequest>,
) -> Response {
    state.log.lock().await.negotiations.push(request.clone());

    let status = state.behavior.negotiate_status;
    if !status.is_success() {
        return (status, Json(json!({ "error": "bucket unavailable" }))).into_response();
    }

    let image_name = &request.image_filename;
    let mut body = json!({
        "image_signed_url": format!("{}/signed/image/{image_name}", state.base_url),
        "image_gs_path": storage_path(image_name),
        "audio_signed_url": null,
        "audio_gs_path": null,
    });
    if let Some(audio_name) = request
        .audio_filename
        .as_deref()
        .filter(|_| !state.behavior.omit_audio_destination)
    {
        body["audio_signed_url"] = json!(format!("{}/signed/audio/{audio_name}", state.base_url));
        body["audio_gs_path"] = json!(storage_path(audio_name));
    }
    Json(body).into_response()
}

async fn receive_upload(
    State(state): State<MockState>,
    Path((kind, name)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if state.behavior.rendezvous_uploads {
        state.rendezvous.wait().await;
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let failing = state.behavior.failing_upload_kind == Some(kind.as_str());
    state.log.lock().await.uploads.push(ReceivedUpload {
        kind,
        name,
        content_type,
        body: body.to_vec(),
    });

    if failing {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::OK
    }
}

async fn process(
    State(state): State<MockState>,
    Json(request): Json<ProcessGrievanceRequest>,
) -> Response {
    state.log.lock().await.processed.push(request.clone());

    if let Some((status, body)) = &state.behavior.process_failure {
        return (
            *status,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response();
    }

    let transcription = if request.audio_path.is_some() {
        "The road near the school is broken."
    } else {
        ""
    };
    let body = json!({
        "status": "success",
        "ticket_id": "ticket-1",
        "ticket_data": {
            "timestamp": 1_714_558_530_123.0_f64,
            "status": state.behavior.ticket_status,
            "location": request.location,
            "image": {
                "url": request.image_path,
                "category": "Pothole",
                "ai_description": "A deep pothole across the left lane."
            },
            "audio": {
                "url": request.audio_path.clone().unwrap_or_default(),
                "transcription": transcription,
                "language": ""
            },
            "text_description": request.text_description.clone().unwrap_or_default()
        }
    });
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn feed(State(state): State<MockState>) -> Response {
    state.log.lock().await.feed_requests += 1;
    match &state.behavior.feed {
        FeedReply::Tickets(tickets) => Json(tickets.clone()).into_response(),
        FeedReply::Status(status) => {
            (*status, Json(json!({ "error": "firestore unavailable" }))).into_response()
        }
    }
}
