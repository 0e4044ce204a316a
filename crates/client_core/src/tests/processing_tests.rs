use super::*;
use crate::{
    config::Settings,
    support::{storage_path, MockBehavior, MockServices},
};
use reqwest::StatusCode;
use shared::domain::{TicketId, TicketStatus};

fn client(mock: &MockServices) -> ProcessingClient {
    let config = Settings {
        upload_endpoint: mock.upload_endpoint(),
        process_endpoint: mock.process_endpoint(),
        feed_endpoint: mock.feed_endpoint(),
    }
    .into_config()
    .expect("config");
    ProcessingClient::new(Client::new(), &config)
}

#[tokio::test]
async fn process_returns_ticket_with_assigned_id() {
    let mock = MockServices::spawn(MockBehavior::default()).await;
    let ticket = client(&mock)
        .process(
            &storage_path("pothole.jpg"),
            None,
            GeoPosition::new(12.34, 56.78),
            Some("Deep pothole by the school"),
        )
        .await
        .expect("ticket");

    assert_eq!(ticket.id, Some(TicketId("ticket-1".into())));
    assert_eq!(ticket.status, TicketStatus::New);
    assert_eq!(ticket.image.category, "Pothole");
    assert_eq!(ticket.location, GeoPosition::new(12.34, 56.78));
    assert_eq!(ticket.timestamp.timestamp_millis(), 1_714_558_530_123);

    let log = mock.log().await;
    let request = &log.processed[0];
    assert_eq!(request.image_path, storage_path("pothole.jpg"));
    assert_eq!(request.audio_path, None);
    assert_eq!(
        request.text_description.as_deref(),
        Some("Deep pothole by the school")
    );
}

#[tokio::test]
async fn process_surfaces_server_error_message_verbatim() {
    let mock = MockServices::spawn(MockBehavior {
        process_failure: Some((
            StatusCode::BAD_REQUEST,
            r#"{"error": "Missing image_path or location."}"#.into(),
        )),
        ..MockBehavior::default()
    })
    .await;

    let err = client(&mock)
        .process(&storage_path("a.jpg"), None, GeoPosition::new(0.0, 0.0), None)
        .await
        .expect_err("must fail");
    match &err {
        ProcessingError::Rejected {
            status,
            server_message,
        } => {
            assert_eq!(*status, StatusCode::BAD_REQUEST);
            assert_eq!(server_message, "Missing image_path or location.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "AI processing failed: Missing image_path or location."
    );
}

#[tokio::test]
async fn unparseable_failure_body_becomes_generic_error() {
    let mock = MockServices::spawn(MockBehavior {
        process_failure: Some((StatusCode::BAD_GATEWAY, "<html>upstream timeout</html>".into())),
        ..MockBehavior::default()
    })
    .await;

    let err = client(&mock)
        .process(&storage_path("a.jpg"), None, GeoPosition::new(0.0, 0.0), None)
        .await
        .expect_err("must fail");
    assert!(matches!(
        err,
        ProcessingError::UnreadableFailure { status } if status == StatusCode::BAD_GATEWAY
    ));
}
