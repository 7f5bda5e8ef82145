//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use linkwalk::config::Config;
use linkwalk::crawler::{event_channel, CrawlEvent, CrawlOptions, Crawler};
use linkwalk::{CancellationToken, LinkwalkError};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that only uses direct requests
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.access.routes = vec!["direct".to_string()];
    config.checker.link_timeout_ms = 2_000;
    config.checker.page_timeout_ms = 2_000;
    config
}

fn html_page(links: &[String]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, links: &[&str]) {
    let links: Vec<String> = links.iter().map(|l| l.to_string()).collect();
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(&links))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_head_ok(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn single_page() -> CrawlOptions {
    CrawlOptions {
        recursive: false,
        max_depth: 0,
    }
}

fn recursive(max_depth: u32) -> CrawlOptions {
    CrawlOptions {
        recursive: true,
        max_depth,
    }
}

#[tokio::test]
async fn test_single_page_statuses_in_input_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/a", "/b", "/c"]).await;
    Mock::given(method("HEAD"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/c"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.checker.link_timeout_ms = 300;
    let crawler = Crawler::new(config).unwrap();
    let token = CancellationToken::new();

    let report = crawler
        .crawl(&format!("{}/", base), single_page(), None, &token)
        .await
        .unwrap();

    assert_eq!(report.pages_checked, 1);
    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base)
        ]
    );

    assert!(report.results[0].is_working);
    assert_eq!(report.results[0].status_code, Some(200));

    assert!(!report.results[1].is_working);
    assert_eq!(report.results[1].status_code, Some(404));
    assert_eq!(report.results[1].error.as_deref(), Some("404 Not Found"));

    assert!(!report.results[2].is_working);
    assert_eq!(report.results[2].status_code, None);
    assert_eq!(report.results[2].error.as_deref(), Some("Request timeout"));

    let source = format!("{}/", base);
    assert!(report
        .results
        .iter()
        .all(|r| r.source_page.as_deref() == Some(source.as_str())));
}

#[tokio::test]
async fn test_recursive_follows_same_site_only() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let external_link = format!("{}/ext", external.uri());

    mount_page(&site, "/", &["/about", &external_link]).await;
    mount_page(&site, "/about", &["/deep"]).await;
    Mock::given(method("GET"))
        .and(path("/deep"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&site)
        .await;
    mount_head_ok(&site).await;

    Mock::given(method("HEAD"))
        .and(path("/ext"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .and(path("/ext"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&external)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl(&format!("{}/", site.uri()), recursive(1), None, &token)
        .await
        .unwrap();

    assert_eq!(report.pages_checked, 2);
    assert_eq!(report.results.len(), 3);
    assert!(report.results.iter().all(|r| r.is_working));

    let deep = report
        .results
        .iter()
        .find(|r| r.url.ends_with("/deep"))
        .unwrap();
    assert_eq!(
        deep.source_page.as_deref(),
        Some(format!("{}/about", site.uri()).as_str())
    );
}

#[tokio::test]
async fn test_max_depth_zero_visits_start_only() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/a", "/b"]).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl(&format!("{}/", server.uri()), recursive(0), None, &token)
        .await
        .unwrap();

    assert_eq!(report.pages_checked, 1);
    assert_eq!(report.results.len(), 2);
}

#[tokio::test]
async fn test_cyclic_links_visit_each_page_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/a"]).await;
    mount_page(&server, "/a", &["/", "/a", "/b"]).await;
    mount_page(&server, "/b", &["/a", "/"]).await;
    mount_head_ok(&server).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl(&format!("{}/", server.uri()), recursive(5), None, &token)
        .await
        .unwrap();

    // Mock expectations verify each page was fetched exactly once
    assert_eq!(report.pages_checked, 3);
    assert_eq!(report.results.len(), 6);
}

#[tokio::test]
async fn test_unfetchable_page_is_recorded_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/gone", "/fine"]).await;
    mount_page(&server, "/fine", &[]).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl(&format!("{}/", base), recursive(2), None, &token)
        .await
        .unwrap();

    assert_eq!(report.pages_checked, 2);
    assert_eq!(report.page_errors.len(), 1);
    assert_eq!(report.page_errors[0].url, format!("{}/gone", base));
}

#[tokio::test]
async fn test_unreachable_start_page_yields_empty_report() {
    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl("http://127.0.0.1:1/", single_page(), None, &token)
        .await
        .unwrap();

    assert_eq!(report.pages_checked, 0);
    assert!(report.results.is_empty());
    assert_eq!(report.page_errors.len(), 1);
}

#[tokio::test]
async fn test_binary_assets_are_checked_but_not_crawled() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/brochure.pdf", "/photo.JPG"]).await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photo.JPG"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl(&format!("{}/", server.uri()), recursive(3), None, &token)
        .await
        .unwrap();

    assert_eq!(report.pages_checked, 1);
    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.is_working));
}

#[tokio::test]
async fn test_broken_same_site_links_are_not_crawled() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/missing"]).await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl(&format!("{}/", server.uri()), recursive(3), None, &token)
        .await
        .unwrap();

    assert_eq!(report.pages_checked, 1);
    assert_eq!(report.broken_count(), 1);
}

#[tokio::test]
async fn test_single_page_mode_caps_link_count() {
    let server = MockServer::start().await;
    let links: Vec<String> = (0..30).map(|i| format!("/l{}", i)).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&links))
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let start = format!("{}/", server.uri());

    let capped = crawler
        .crawl(&start, single_page(), None, &token)
        .await
        .unwrap();
    assert_eq!(capped.results.len(), 25);
    assert_eq!(capped.results[0].url, format!("{}/l0", server.uri()));
    assert_eq!(capped.results[24].url, format!("{}/l24", server.uri()));

    // Recursive mode checks every link on a page
    let full = crawler.crawl(&start, recursive(0), None, &token).await.unwrap();
    assert_eq!(full.results.len(), 30);
}

#[tokio::test]
async fn test_duplicate_links_checked_once_per_page() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/a", "/a#section", "/a", "mailto:someone@site.test"]).await;
    Mock::given(method("HEAD"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    let report = crawler
        .crawl(&format!("{}/", server.uri()), single_page(), None, &token)
        .await
        .unwrap();

    // Fragments make distinct link strings
    assert_eq!(report.results.len(), 2);
}

#[tokio::test]
async fn test_progress_events() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/a", "/b", "/c"]).await;
    mount_head_ok(&server).await;

    let mut config = create_test_config();
    config.checker.batch_size = 2;
    let crawler = Crawler::new(config).unwrap();
    let token = CancellationToken::new();
    let (tx, mut rx) = event_channel();

    let consumer = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });

    let report = crawler
        .crawl(&format!("{}/", server.uri()), single_page(), Some(tx), &token)
        .await
        .unwrap();
    let events = consumer.await.unwrap();

    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], CrawlEvent::PageStarted { depth: 0, .. }));
    match &events[1] {
        CrawlEvent::BatchChecked {
            results,
            checked,
            total,
            ..
        } => {
            assert_eq!(results.len(), 2);
            assert_eq!((*checked, *total), (2, 3));
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(events[2].percent(), Some(100.0));
    assert!(matches!(
        events[3],
        CrawlEvent::PageChecked {
            pages_checked: 1,
            links_found: 3,
            ..
        }
    ));

    // Incremental results add up to the final report
    let streamed: usize = events
        .iter()
        .map(|e| match e {
            CrawlEvent::BatchChecked { results, .. } => results.len(),
            _ => 0,
        })
        .sum();
    assert_eq!(streamed, report.results.len());
}

#[tokio::test]
async fn test_cancelled_before_start_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let result = crawler
        .crawl(&format!("{}/", server.uri()), recursive(3), None, &token)
        .await;
    assert!(matches!(result, Err(LinkwalkError::Cancelled)));
}

#[tokio::test]
async fn test_cancel_during_link_checks_stops_promptly() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/slow", "/later"]).await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/later"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.checker.batch_size = 1;
    config.checker.link_timeout_ms = 10_000;
    let crawler = Crawler::new(config).unwrap();
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let result = crawler
        .crawl(&format!("{}/", server.uri()), single_page(), None, &token)
        .await;

    assert!(matches!(result, Err(LinkwalkError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_cancel_with_stalled_event_consumer() {
    let server = MockServer::start().await;
    let links: Vec<String> = (0..10).map(|i| format!("/l{}", i)).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&links))
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let token = CancellationToken::new();

    // The receiver stays alive but is never read, so the channel fills up
    let (tx, _rx) = tokio::sync::mpsc::channel(1);

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        crawler.crawl(&format!("{}/", server.uri()), single_page(), Some(tx), &token),
    )
    .await
    .expect("crawl should stop once the token fires");

    assert!(matches!(result, Err(LinkwalkError::Cancelled)));
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html_page(&[]))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.user_agent.name = "TestBot".to_string();
    config.user_agent.version = "1.0.0".to_string();
    let crawler = Crawler::new(config).unwrap();
    let token = CancellationToken::new();

    let report = crawler
        .crawl(&format!("{}/", server.uri()), single_page(), None, &token)
        .await
        .unwrap();
    assert_eq!(report.pages_checked, 1);
    assert!(report.results.is_empty());
}
