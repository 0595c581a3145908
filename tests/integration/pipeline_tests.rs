//! End-to-end extraction runs against mock sites

use crate::common::{mount_page, mount_robots, write_config, LOCATION_PAGE};
use monagent::bot::ChatBot;
use monagent::config::{load_named_config, ParseMode, DEFAULT_CONFIG_NAME};
use monagent::events::{RecordingSink, ScrapeEvent};
use monagent::pipeline::{run_with_config, run_with_sink, RunState};
use monagent::storage::{load_knowledge, open_store, RecordStore};
use monagent::{RecordKind, RecordType, ScrapeError};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_static_run_end_to_end() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/scottsdale", 200, LOCATION_PAGE).await;

    let dir = TempDir::new().unwrap();
    let target = format!("{}/scottsdale?utm_source=google&gclid=abc", server.uri());
    let storage = write_config(dir.path(), "site", &target);

    let result = run_with_config(dir.path(), "site").await.unwrap();
    assert_eq!(result.rows, 8);
    assert_eq!(result.path, storage);
    assert_eq!(result.sample.len(), 3);
    assert_eq!(result.source_url, format!("{}/scottsdale", server.uri()));
    assert!(result.config_hash.is_some());

    let rows = open_store(&storage).load_rows().unwrap();
    let types: Vec<_> = rows.iter().map(|r| r.record_type()).collect();
    assert_eq!(
        types,
        vec![
            RecordType::Service,
            RecordType::Service,
            RecordType::About,
            RecordType::PricingSummary,
            RecordType::JoinInfo,
            RecordType::Testimonial,
            RecordType::Link,
            RecordType::Link,
        ]
    );
    assert!(rows.iter().all(|r| r.source_url == result.source_url));
    assert_eq!(&rows[..3], &result.sample[..]);

    match &rows[1].kind {
        RecordKind::Service {
            units,
            price,
            member_fee_month,
            contact,
            ..
        } => {
            assert_eq!(*units, 40);
            assert_eq!(*price, 280.0);
            assert_eq!(*member_fee_month, Some(9.72));
            assert_eq!(
                contact.address.as_deref(),
                Some("7001 N Scottsdale Rd, Scottsdale, AZ 85253")
            );
            assert_eq!(contact.phone.as_deref(), Some("(480) 555-0100"));
            assert_eq!(contact.hours.as_deref(), Some("Mon-Sat 9AM-6PM"));
        }
        other => panic!("expected a service row, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stored_rows_answer_questions() {
    let server = MockServer::start().await;
    mount_robots(&server, 404, "").await;
    mount_page(&server, "/scottsdale", 200, LOCATION_PAGE).await;

    let dir = TempDir::new().unwrap();
    let storage = write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));
    run_with_config(dir.path(), "site").await.unwrap();

    let knowledge = load_knowledge(&storage).unwrap();
    assert_eq!(knowledge.services.len(), 2);
    assert_eq!(knowledge.email.as_deref(), Some("scottsdale@clubinject.com"));
    assert_eq!(knowledge.testimonials.len(), 1);

    let bot = ChatBot::new(knowledge);
    assert_eq!(
        bot.reply("How much are 20 units?"),
        "20 units cost $150.80. Membership is $9.72/month."
    );
    assert_eq!(
        bot.reply("botox price"),
        "We charge $7.54 per unit of Botox for members."
    );
    assert_eq!(bot.reply("會員"), "Memberships are just $9.72 a month.");
}

#[tokio::test]
async fn test_consent_denied_leaves_storage_untouched() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: MonAgentCrawler\nDisallow: /scottsdale").await;
    Mock::given(method("GET"))
        .and(path("/scottsdale"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOCATION_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let storage = write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));

    let sink = Arc::new(RecordingSink::new());
    let err = run_with_sink(dir.path(), "site", sink.clone())
        .await
        .unwrap_err();
    assert!(err.is_consent_denied());
    assert!(!storage.exists());

    let events = sink.events();
    assert!(events.contains(&ScrapeEvent::ConsentChecked {
        url: format!("{}/scottsdale", server.uri()),
        allowed: false,
    }));
    assert!(events.contains(&ScrapeEvent::StateChanged {
        from: RunState::Idle,
        to: RunState::Failed,
    }));
    server.verify().await;
}

#[tokio::test]
async fn test_unreadable_robots_fails_closed() {
    let server = MockServer::start().await;
    mount_robots(&server, 503, "").await;
    mount_page(&server, "/scottsdale", 200, LOCATION_PAGE).await;

    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));

    let sink = Arc::new(RecordingSink::new());
    let err = run_with_sink(dir.path(), "site", sink.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::ConsentDenied { .. }));
    assert!(sink.events().contains(&ScrapeEvent::PolicyResolved {
        robots_url: format!("{}/robots.txt", server.uri()),
        status: Some(503),
        policy: "deny-all",
        error: None,
    }));
}

#[tokio::test]
async fn test_http_error_keeps_previous_rows() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/scottsdale", 200, LOCATION_PAGE).await;
    mount_page(&server, "/gone", 404, "").await;

    let dir = TempDir::new().unwrap();
    let storage = write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));
    run_with_config(dir.path(), "site").await.unwrap();
    let before = std::fs::read(&storage).unwrap();

    // Same storage path, dead target
    let content = std::fs::read_to_string(dir.path().join("site.toml"))
        .unwrap()
        .replace("/scottsdale", "/gone");
    std::fs::write(dir.path().join("site.toml"), content).unwrap();

    let err = run_with_config(dir.path(), "site").await.unwrap_err();
    assert!(matches!(err, ScrapeError::HttpStatus { status: 404, .. }));
    assert!(err.is_fetch_failure());
    assert_eq!(std::fs::read(&storage).unwrap(), before);
}

#[tokio::test]
async fn test_page_without_matches_stores_empty_table() {
    let server = MockServer::start().await;
    mount_robots(&server, 200, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/scottsdale", 200, "<html><body><p>Closed</p></body></html>").await;

    let dir = TempDir::new().unwrap();
    let storage = write_config(dir.path(), "site", &format!("{}/scottsdale", server.uri()));

    let result = run_with_config(dir.path(), "site").await.unwrap();
    assert_eq!(result.rows, 0);
    assert!(result.sample.is_empty());
    assert!(load_knowledge(&storage).unwrap().is_empty());
}

#[test]
fn test_shipped_config_is_valid() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    let config = load_named_config(&dir, DEFAULT_CONFIG_NAME).unwrap();
    assert_eq!(config.parse_mode, ParseMode::Structured);
    assert_eq!(config.retry, 2);
    assert_eq!(config.structured.locality.as_deref(), Some("Scottsdale"));
}
