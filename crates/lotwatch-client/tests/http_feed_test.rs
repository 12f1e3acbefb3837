//! Integration tests for `HttpFeed` using wiremock.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use lotwatch_client::{ClientError, HttpFeed, LotFeed, Synchronizer};
use lotwatch_core::ConnectionState;
use lotwatch_types::{LotId, PermitClass, RequesterClass, default_catalog};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HttpFeed) {
    let server = MockServer::start().await;
    let feed = HttpFeed::new(&server.uri(), Duration::from_millis(500)).unwrap();
    (server, feed)
}

fn lot_json(id: &str, total: u32, occupied: u32, permit: &str) -> serde_json::Value {
    json!({
        "lot_id": id,
        "name": format!("Lot {id}"),
        "total_spaces": total,
        "occupied_spaces": occupied,
        "available_spaces": total.saturating_sub(occupied),
        "permit_type": permit,
        "drive_time": 2,
        "walk_time": 4,
        "last_update": "2024-03-01T15:04:05Z",
    })
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_decodes_lot_list() {
    let (server, feed) = setup().await;

    let body = json!([
        lot_json("17", 35, 30, "Student"),
        lot_json("19", 60, 12, "Both"),
    ]);

    Mock::given(method("GET"))
        .and(path("/api/lots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let lots = feed.fetch().await.unwrap();

    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].lot_id.as_str(), "17");
    assert_eq!(lots[0].occupied_spaces, 30);
    assert_eq!(lots[1].permit_type, PermitClass::StudentOrStaff);
}

#[tokio::test]
async fn test_timestamp_without_offset_is_accepted() {
    let (server, feed) = setup().await;

    let mut lot = lot_json("18", 45, 40, "Staff");
    lot["last_update"] = json!("2026-01-01T08:00:00.123456");

    Mock::given(method("GET"))
        .and(path("/api/lots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([lot])))
        .mount(&server)
        .await;

    let lots = feed.fetch().await.unwrap();
    assert_eq!(
        lots[0].last_update.to_rfc3339(),
        "2026-01-01T08:00:00.123456+00:00"
    );

    let sync = Synchronizer::new(feed, default_catalog(), RequesterClass::Staff);
    assert!(sync.refresh_now().await.used_live_data);
    assert_eq!(sync.connection_state(), ConnectionState::Connected);
    assert_eq!(
        sync.snapshot().lot(&LotId::from("18")).unwrap().occupied(),
        40
    );
}

// ── Failure modes ───────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_is_status() {
    let (server, feed) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/lots"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, ClientError::Status(500)), "got {err:?}");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (server, feed) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/lots"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&server)
        .await;

    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let (server, feed) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/lots"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, ClientError::Unreachable(_)), "got {err:?}");
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let feed = HttpFeed::new(&format!("http://{addr}"), Duration::from_millis(500)).unwrap();
    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, ClientError::Unreachable(_)), "got {err:?}");
}
