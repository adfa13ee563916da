// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete chat pipeline: inbound events
//! through the workflow engine, attribution fetch (wiremock), the
//! analytics pipeline, and artifact packaging.

use std::sync::Arc;

use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use traffika_attribution::AttributionClient;
use traffika_config::model::{AttributionConfig, StorageConfig};
use traffika_core::{EntityStore, Role};
use traffika_storage::SqliteStore;
use traffika_telegram::handler::{handle_callback, handle_text, BotDeps, Outbound};

const ADMIN: i64 = 1;
const APP_ID: &str = "com.example.dragons";
const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

struct Harness {
    deps: BotDeps,
    server: MockServer,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("e2e.db");
    let store = SqliteStore::new(StorageConfig {
        database_path: db_path.to_str().unwrap().to_string(),
    });
    store.initialize().await.unwrap();
    store.seed_admin(ADMIN, "root").await.unwrap();
    let store: Arc<dyn EntityStore> = Arc::new(store);

    let server = MockServer::start().await;
    let client = AttributionClient::new(&AttributionConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.uri(),
        timezone: "Europe/Moscow".to_string(),
        timeout_secs: 5,
    })
    .unwrap();

    let deps = BotDeps::new(store, Some(client));
    let harness = Harness {
        deps,
        server,
        _dir: dir,
    };
    create_offer(&harness.deps).await;
    harness
}

async fn create_offer(deps: &BotDeps) {
    handle_text(deps, ADMIN, Some("root"), "Root", "/addoffer").await;
    for input in [
        "Dragon Saga",
        "Match-3 game",
        "2.0",
        "US, CA",
        "Games",
        "ret d7",
        "appsflyer",
        "protect360",
        APP_ID,
        "purchase",
        "500",
    ] {
        handle_text(deps, ADMIN, Some("root"), "Root", input).await;
    }
}

async fn offer_id(deps: &BotDeps) -> i64 {
    deps.store.list_offers().await.unwrap()[0].id
}

fn installs_csv() -> String {
    let mut csv = String::from("app_id,install_time,media_source\n");
    for day in 1..=5 {
        for i in 0..10 {
            csv.push_str(&format!("{APP_ID},2024-01-0{day} 10:{i:02}:00,facebook\n"));
        }
    }
    csv
}

fn events_csv() -> String {
    let mut csv = String::from("app_id,name,value,event_time\n");
    for day in 1..=5 {
        csv.push_str(&format!("{APP_ID},purchase,1,2024-01-0{day} 12:00:00\n"));
    }
    csv
}

/// Drive /analyze up to the source-choice menu.
async fn drive_analysis(deps: &BotDeps, kind: &str, dates: &str) -> Outbound {
    handle_text(deps, ADMIN, Some("root"), "Root", "/analyze").await;
    handle_callback(deps, ADMIN, kind).await;
    let id = offer_id(deps).await;
    handle_callback(deps, ADMIN, &id.to_string()).await;
    handle_text(deps, ADMIN, Some("root"), "Root", dates).await;
    handle_callback(deps, ADMIN, "all").await
}

#[tokio::test]
async fn conversion_analysis_delivers_a_chart_photo() {
    let h = harness().await;

    Mock::given(method("GET"))
        .and(path(format!("/{APP_ID}/installs_report/v5")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(installs_csv(), "text/csv"))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/{APP_ID}/in_app_events_report/v5")))
        .and(query_param("event_name", "purchase"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(events_csv(), "text/csv"))
        .expect(1)
        .mount(&h.server)
        .await;

    let reply = drive_analysis(&h.deps, "conversion", "2024-01-01 2024-01-05").await;
    match reply {
        Outbound::Photo { bytes, caption } => {
            assert_eq!(&bytes[..4], &PNG_MAGIC);
            assert!(caption.contains("Dragon Saga"));
            assert!(caption.contains("conversion"));
            assert!(caption.contains("2024-01-01 - 2024-01-05"));
        }
        other => panic!("expected Photo, got {other:?}"),
    }
    assert!(!h.deps.engine.has_active(ADMIN));
}

#[tokio::test]
async fn forecast_with_short_range_reports_insufficient_data() {
    let h = harness().await;

    Mock::given(method("GET"))
        .and(path(format!("/{APP_ID}/in_app_events_report/v5")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(events_csv(), "text/csv"))
        .mount(&h.server)
        .await;

    // A 4-day range is a domain error, not a re-prompt.
    let reply = drive_analysis(&h.deps, "forecast", "2024-01-01 2024-01-04").await;
    match reply {
        Outbound::Text(text) => assert!(text.contains("at least 5 days")),
        other => panic!("expected Text, got {other:?}"),
    }
    assert!(!h.deps.engine.has_active(ADMIN));
}

#[tokio::test]
async fn forecast_analysis_delivers_a_chart_photo() {
    let h = harness().await;

    Mock::given(method("GET"))
        .and(path(format!("/{APP_ID}/in_app_events_report/v5")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(events_csv(), "text/csv"))
        .expect(1)
        .mount(&h.server)
        .await;

    let reply = drive_analysis(&h.deps, "forecast", "2024-01-01 2024-01-05").await;
    match reply {
        Outbound::Photo { bytes, .. } => assert_eq!(&bytes[..4], &PNG_MAGIC),
        other => panic!("expected Photo, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_failure_ends_the_flow_with_a_generic_message() {
    let h = harness().await;

    Mock::given(method("GET"))
        .and(path(format!("/{APP_ID}/installs_report/v5")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1) // no retry
        .mount(&h.server)
        .await;

    let reply = drive_analysis(&h.deps, "trend", "2024-01-01 2024-01-10").await;
    match reply {
        Outbound::Text(text) => {
            assert!(text.contains("attribution service"));
            assert!(!text.contains("boom"));
        }
        other => panic!("expected Text, got {other:?}"),
    }
    assert!(!h.deps.engine.has_active(ADMIN));
}

#[tokio::test]
async fn installs_report_passes_the_raw_csv_through() {
    let h = harness().await;
    let body = installs_csv();

    Mock::given(method("GET"))
        .and(path(format!("/{APP_ID}/installs_report/v5")))
        .and(query_param("from", "2024-01-01"))
        .and(query_param("to", "2024-01-05"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.clone(), "text/csv"))
        .expect(1)
        .mount(&h.server)
        .await;

    handle_text(&h.deps, ADMIN, Some("root"), "Root", "/report").await;
    handle_callback(&h.deps, ADMIN, "installs").await;
    handle_text(&h.deps, ADMIN, Some("root"), "Root", "2024-01-01 2024-01-05").await;
    let id = offer_id(&h.deps).await;
    let reply = handle_callback(&h.deps, ADMIN, &id.to_string()).await;

    match reply {
        Outbound::Document {
            bytes, filename, ..
        } => {
            assert_eq!(bytes, body.into_bytes());
            assert_eq!(filename, "installs_2024-01-01_to_2024-01-05.csv");
        }
        other => panic!("expected Document, got {other:?}"),
    }
}

#[tokio::test]
async fn summary_report_renders_paginated_text() {
    let h = harness().await;

    Mock::given(method("GET"))
        .and(path(format!("/{APP_ID}/installs_report/v5")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(installs_csv(), "text/csv"))
        .expect(1)
        .mount(&h.server)
        .await;

    handle_text(&h.deps, ADMIN, Some("root"), "Root", "/report").await;
    handle_callback(&h.deps, ADMIN, "summary").await;
    handle_text(&h.deps, ADMIN, Some("root"), "Root", "2024-01-01 2024-01-05").await;
    let id = offer_id(&h.deps).await;
    let reply = handle_callback(&h.deps, ADMIN, &id.to_string()).await;

    match reply {
        Outbound::Document { bytes, filename, .. } => {
            let text = String::from_utf8(bytes).unwrap();
            assert!(text.contains("MARKETING REPORT"));
            assert!(text.contains("Dragon Saga"));
            assert!(text.contains("Records: 50"));
            assert!(filename.ends_with(".txt"));
        }
        other => panic!("expected Document, got {other:?}"),
    }
}

#[tokio::test]
async fn partner_can_run_analysis_but_not_reports() {
    let h = harness().await;
    h.deps
        .store
        .create_user(7, "partner_kate", Role::Partner)
        .await
        .unwrap();

    let reply = handle_text(&h.deps, 7, Some("partner_kate"), "Kate", "/report").await;
    match reply {
        Outbound::Text(text) => assert!(text.contains("permission")),
        other => panic!("expected rejection, got {other:?}"),
    }

    let reply = handle_text(&h.deps, 7, Some("partner_kate"), "Kate", "/analyze").await;
    assert!(matches!(reply, Outbound::Keyboard { .. }));
}
