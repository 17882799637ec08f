//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! crawl loop end-to-end, including checkpointing and resumption.

use bfs_crawler::checkpoint::{CheckpointManager, StartupDecision};
use bfs_crawler::config::{Config, CrawlerConfig};
use bfs_crawler::crawler::{
    run_crawl, shutdown_channel, CrawlController, ShutdownSignal, TerminationReason,
};
use bfs_crawler::state::{hash_url, CrawlState};
use bfs_crawler::storage::{DocumentSink, SqliteSink};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings with no delay so tests run quickly
fn create_test_settings(budget: u64) -> CrawlerConfig {
    CrawlerConfig {
        budget,
        request_delay_ms: 0,
        fetch_timeout_secs: 2,
        checkpoint_interval: 0,
        ..CrawlerConfig::default()
    }
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Seed page `/a` linking to `/b` and `/c`, both leaves
async fn mount_three_page_site(server: &MockServer) {
    let base = server.uri();
    mount_html(
        server,
        "/a",
        format!(
            r#"<html><head><title>A</title></head><body>
            <a href="{0}/b">B</a>
            <a href="{0}/c">C</a>
            </body></html>"#,
            base
        ),
    )
    .await;
    mount_html(
        server,
        "/b",
        "<html><body><p>Page B</p></body></html>".to_string(),
    )
    .await;
    mount_html(
        server,
        "/c",
        "<html><body><p>Page C</p></body></html>".to_string(),
    )
    .await;
}

fn open_controller(
    dir: &TempDir,
    state: CrawlState,
    budget: u64,
    shutdown: ShutdownSignal,
) -> CrawlController<SqliteSink> {
    let sink = SqliteSink::new(&dir.path().join("pages.db")).expect("Failed to open sink");
    CrawlController::new(
        create_test_settings(budget),
        state,
        sink,
        CheckpointManager::new(dir.path()),
        shutdown,
    )
    .expect("Failed to create controller")
}

#[tokio::test]
async fn test_budget_stops_after_two_pages() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let base = server.uri();

    let dir = tempfile::tempdir().unwrap();
    let seed = format!("{}/a", base);
    let mut controller = open_controller(
        &dir,
        CrawlState::fresh(seed.clone()),
        2,
        ShutdownSignal::never(),
    );

    let report = controller.run().await.expect("Crawl failed");

    assert_eq!(report.reason, TerminationReason::BudgetReached);
    assert_eq!(controller.state().processed_count, 2);
    assert_eq!(
        controller.sink().stored_urls().unwrap(),
        vec![seed.clone(), format!("{}/b", base)]
    );

    // The unvisited sibling is still waiting
    let remaining: Vec<&str> = controller.state().frontier.iter().collect();
    assert_eq!(remaining, vec![format!("{}/c", base)]);

    let docs = controller.sink().documents_for_url(&seed).unwrap();
    assert_eq!(docs[0].text, "A B C");
}

#[tokio::test]
async fn test_seed_returning_500_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let seed = format!("{}/", server.uri());
    let mut controller = open_controller(
        &dir,
        CrawlState::fresh(seed.clone()),
        5000,
        ShutdownSignal::never(),
    );

    let report = controller.run().await.expect("Crawl should end cleanly");

    assert_eq!(report.reason, TerminationReason::QueueEmpty);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(controller.sink().count().unwrap(), 0);
    assert_eq!(controller.state().processed_count, 1);
    assert!(controller.state().seen.contains(&seed));
    assert!(controller.state().frontier.is_empty());

    let crawled = CheckpointManager::new(dir.path()).read_crawled().unwrap();
    assert_eq!(crawled.number, 1);
    assert_eq!(crawled.data.get(&hash_url(&seed).to_string()), Some(&true));
}

#[tokio::test]
async fn test_resume_continues_from_checkpoint() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    // First run stops on the budget with /c still queued
    {
        let mut controller = open_controller(
            &dir,
            CrawlState::fresh(format!("{}/a", base)),
            2,
            ShutdownSignal::never(),
        );
        controller.run().await.unwrap();
    }

    let checkpoints = CheckpointManager::new(dir.path());
    assert_eq!(checkpoints.decide(false), StartupDecision::Resume);
    let saved = checkpoints.read_queue().unwrap();
    assert_eq!(saved.total_qued, 3);
    assert_eq!(saved.number, 1);

    let state = checkpoints
        .initialize(StartupDecision::Resume, None)
        .expect("Failed to resume");
    assert_eq!(state.processed_count, 2);

    let mut controller = open_controller(&dir, state, 10, ShutdownSignal::never());
    let report = controller.run().await.unwrap();

    assert_eq!(report.reason, TerminationReason::QueueEmpty);
    assert_eq!(report.processed, 1);
    assert_eq!(controller.state().processed_count, 3);
    assert_eq!(controller.sink().count().unwrap(), 3);
    assert_eq!(
        controller.sink().stored_urls().unwrap().last().cloned(),
        Some(format!("{}/c", base))
    );
}

#[tokio::test]
async fn test_budget_bounds_an_endless_site() {
    let server = MockServer::start().await;
    // Every page links to two deeper relative pages, so the frontier never empties
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="x/">x</a><a href="y/">y</a>"#),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut controller = open_controller(
        &dir,
        CrawlState::fresh(format!("{}/", server.uri())),
        5,
        ShutdownSignal::never(),
    );

    let report = controller.run().await.unwrap();

    assert_eq!(report.reason, TerminationReason::BudgetReached);
    assert_eq!(report.processed, 5);
    assert_eq!(controller.state().seen.len(), 5);
    assert!(!controller.state().frontier.is_empty());

    // Breadth first: the first level is visited before anything deeper
    let stored = controller.sink().stored_urls().unwrap();
    let base = server.uri();
    assert_eq!(
        stored,
        vec![
            format!("{}/", base),
            format!("{}/x/", base),
            format!("{}/y/", base),
            format!("{}/x/x/", base),
            format!("{}/x/y/", base),
        ]
    );
}

#[tokio::test]
async fn test_shutdown_checkpoints_and_stops() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let sink = SqliteSink::new(&dir.path().join("pages.db")).unwrap();
    let settings = CrawlerConfig {
        request_delay_ms: 10_000,
        ..create_test_settings(100)
    };
    let (handle, signal) = shutdown_channel();
    let mut controller = CrawlController::new(
        settings,
        CrawlState::fresh(format!("{}/a", base)),
        sink,
        CheckpointManager::new(dir.path()),
        signal,
    )
    .unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.trigger();
    });

    let report = tokio::time::timeout(Duration::from_secs(5), controller.run())
        .await
        .expect("shutdown should interrupt the delay")
        .unwrap();

    assert_eq!(report.reason, TerminationReason::Cancelled);
    assert_eq!(report.processed, 1);

    let saved = CheckpointManager::new(dir.path()).read_queue().unwrap();
    assert_eq!(
        saved.urls,
        vec![format!("{}/b", base), format!("{}/c", base)]
    );
}

#[tokio::test]
async fn test_run_crawl_with_config() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.crawler = create_test_settings(10);
    config.checkpoint.directory = dir.path().join("checkpoints");
    config.output.database_path = dir.path().join("pages.db").display().to_string();

    let state = CrawlState::fresh(format!("{}/a", server.uri()));
    let report = run_crawl(&config, state, ShutdownSignal::never())
        .await
        .expect("Crawl failed");

    assert_eq!(report.processed, 3);
    assert_eq!(report.documents_stored, 3);

    let sink = SqliteSink::new(std::path::Path::new(&config.output.database_path)).unwrap();
    assert_eq!(sink.count().unwrap(), 3);
    assert!(CheckpointManager::new(&config.checkpoint.directory).has_checkpoint());
}

#[tokio::test]
async fn test_unwritable_checkpoint_does_not_stop_crawl() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let dir = tempfile::tempdir().unwrap();

    // A regular file where the checkpoint directory's parent should be
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").unwrap();
    let checkpoints = CheckpointManager::new(blocker.join("cp"));

    let sink = SqliteSink::new(&dir.path().join("pages.db")).unwrap();
    let settings = CrawlerConfig {
        checkpoint_interval: 1,
        ..create_test_settings(10)
    };
    let mut controller = CrawlController::new(
        settings,
        CrawlState::fresh(format!("{}/a", server.uri())),
        sink,
        checkpoints.clone(),
        ShutdownSignal::never(),
    )
    .unwrap();

    let report = controller.run().await.expect("checkpoint failures are not fatal");

    assert_eq!(report.reason, TerminationReason::QueueEmpty);
    assert_eq!(report.processed, 3);
    assert_eq!(controller.sink().count().unwrap(), 3);
    assert!(!checkpoints.has_checkpoint());
    assert!(checkpoints.save(controller.state()).is_err());
}
