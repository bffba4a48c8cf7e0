//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use quick_xml::events::Event;
use quick_xml::Reader;
use sitemap_ripple::config::{Config, UserAgentConfig};
use sitemap_ripple::crawler::{build_http_client, crawl, BatchExecutor, Fetcher, SitemapWalker};
use sitemap_ripple::output::SitemapEmitter;
use sitemap_ripple::service::{CrawlRequest, CrawlResponse, SitemapService};
use sitemap_ripple::state::SkipReason;
use sitemap_ripple::url::seed_scope;
use std::collections::BTreeSet;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling to the given depth
fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.request_timeout = 2;
    config.crawler.max_concurrent_requests = 4;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn html_head() -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("content-type", "text/html")
}

async fn mount_get(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

/// Mounts a catch-all HEAD responder and an empty page for unmatched GETs
async fn mount_fallbacks(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(html_head())
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page(""))
        .mount(server)
        .await;
}

fn urls(visited: &std::collections::HashSet<sitemap_ripple::PageDescriptor>) -> BTreeSet<String> {
    visited.iter().map(|page| page.url().to_string()).collect()
}

/// Counts `url` elements of a sitemap document, failing on malformed XML
fn count_url_entries(xml: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"url" => count += 1,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed sitemap: {}", e),
        }
    }
    count
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The shared page is linked from three places but validated once
    Mock::given(method("HEAD"))
        .and(path("/shared"))
        .respond_with(html_head())
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_get(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/a">A</a> <a href="{}/b#top">B</a> <a href="/shared">Shared</a>
            <a href="https://elsewhere.example/">Elsewhere</a>"#,
            base_url
        ),
    )
    .await;
    mount_get(&mock_server, "/a", r#"<a href="/shared">S</a> <a href="/c">C</a>"#).await;
    mount_get(&mock_server, "/b", r#"<a href="/shared">S</a> <a href="/">Home</a>"#).await;
    mount_get(&mock_server, "/c", r#"<a href="/too-deep">Deep</a>"#).await;
    mount_fallbacks(&mock_server).await;

    let scope = seed_scope(&base_url).unwrap();
    let outcome = crawl(scope, &create_test_config(2)).await.unwrap();

    let expected: BTreeSet<String> = ["/", "/a", "/b", "/shared", "/c"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    assert_eq!(urls(&outcome.visited), expected);
    assert_eq!(outcome.domain, base_url);
    assert!(outcome.seed_skip.is_none());

    // Level 2 is validated but never expanded
    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests.iter().any(|r| r.url.path() == "/too-deep"));
    let get_c = requests
        .iter()
        .filter(|r| r.method == wiremock::http::Method::Get && r.url.path() == "/c")
        .count();
    assert_eq!(get_c, 0);

    assert_eq!(outcome.stats.levels, 3);
    assert_eq!(outcome.stats.accepted, 5);
}

#[tokio::test]
async fn test_depth_zero_issues_no_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page(r#"<a href="/a">A</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(html_head())
        .expect(1)
        .mount(&mock_server)
        .await;

    let scope = seed_scope(&mock_server.uri()).unwrap();
    let outcome = crawl(scope, &create_test_config(0)).await.unwrap();

    assert_eq!(outcome.visited.len(), 1);
    assert_eq!(outcome.stats.get_requests, 0);
}

#[tokio::test]
async fn test_seed_redirect_retargets_domain() {
    let old_host = MockServer::start().await;
    let new_host = MockServer::start().await;
    let new_url = new_host.uri();

    Mock::given(method("HEAD"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/", new_url).as_str()),
        )
        .mount(&old_host)
        .await;

    mount_get(
        &new_host,
        "/",
        &format!(
            r#"<a href="/x">X</a> <a href="{}/y">Old host</a> <a href="{}/z">Z</a>"#,
            old_host.uri(),
            new_url
        ),
    )
    .await;
    mount_fallbacks(&new_host).await;

    let scope = seed_scope(&old_host.uri()).unwrap();
    let outcome = crawl(scope, &create_test_config(1)).await.unwrap();

    assert_eq!(outcome.domain, new_url);
    let expected: BTreeSet<String> = ["/", "/x", "/z"]
        .iter()
        .map(|p| format!("{}{}", new_url, p))
        .collect();
    assert_eq!(urls(&outcome.visited), expected);
}

#[tokio::test]
async fn test_seed_timeout_yields_empty_sitemap() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(html_head().set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let fetcher = Fetcher::new(client, Duration::from_millis(200), 3);
    let scope = seed_scope(&mock_server.uri()).unwrap();
    let walker = SitemapWalker::new(scope, fetcher, BatchExecutor::new(4), 3);

    let outcome = walker.traverse().await;

    assert!(outcome.visited.is_empty());
    assert_eq!(outcome.seed_skip, Some(SkipReason::RequestFailed));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);

    let dir = TempDir::new().unwrap();
    let path = SitemapEmitter::default()
        .emit(&outcome.visited, &outcome.domain, &dir.path().join("empty"))
        .unwrap();
    let xml = std::fs::read_to_string(path).unwrap();
    assert!(xml.contains("<urlset"));
    assert_eq!(count_url_entries(&xml), 0);
}

#[tokio::test]
async fn test_unsupported_pages_are_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_get(
        &mock_server,
        "/",
        r#"<a href="/report.pdf">PDF</a> <a href="/missing">Gone</a> <a href="/ok">OK</a>"#,
    )
    .await;
    mount_fallbacks(&mock_server).await;

    let scope = seed_scope(&mock_server.uri()).unwrap();
    let outcome = crawl(scope, &create_test_config(1)).await.unwrap();

    let expected: BTreeSet<String> = ["/", "/ok"]
        .iter()
        .map(|p| format!("{}{}", mock_server.uri(), p))
        .collect();
    assert_eq!(urls(&outcome.visited), expected);
    assert_eq!(outcome.stats.skipped.get("unsupported_content_type"), Some(&1));
    assert_eq!(outcome.stats.skipped.get("unsupported_status"), Some(&1));
    assert_eq!(outcome.stats.total_skipped(), 2);
}

#[tokio::test]
async fn test_last_modified_becomes_lastmod() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(html_head().insert_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT"))
        .mount(&mock_server)
        .await;

    let scope = seed_scope(&mock_server.uri()).unwrap();
    let outcome = crawl(scope, &create_test_config(0)).await.unwrap();

    let page = outcome.visited.iter().next().unwrap();
    assert_eq!(page.lastmod().as_deref(), Some("2015-10-21"));
}

#[tokio::test]
async fn test_requests_carry_identity_and_cache_headers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .and(header("user-agent", "TestBot/1.0.0 (+https://www.sitemaps.org/protocol.html)"))
        .respond_with(html_head())
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(0);
    config.user_agent.crawler_version = "1.0.0".to_string();
    let scope = seed_scope(&mock_server.uri()).unwrap();
    let outcome = crawl(scope, &config).await.unwrap();

    assert_eq!(outcome.visited.len(), 1);
}

#[tokio::test]
async fn test_service_generates_sitemap() {
    let mock_server = MockServer::start().await;
    mount_get(&mock_server, "/", r#"<a href="/about">About</a> <a href="/blog">Blog</a>"#).await;
    mount_fallbacks(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(1);
    config.output.directory = dir.path().to_path_buf();
    let service = SitemapService::new(config);

    let response = service.generate(CrawlRequest::new(mock_server.uri())).await;

    let CrawlResponse::Ok {
        file_path,
        url,
        pages,
        seed_skip,
        retention_seconds,
        ..
    } = response
    else {
        panic!("expected an ok response, got {:?}", response);
    };

    assert_eq!(pages, 3);
    assert!(seed_skip.is_none());
    assert_eq!(retention_seconds, 1800);
    assert!(url.starts_with("/xml/"));
    assert!(url.ends_with(".xml"));
    assert_eq!(url.len(), "/xml/".len() + 12 + ".xml".len());

    let xml = std::fs::read_to_string(&file_path).unwrap();
    assert_eq!(count_url_entries(&xml), 3);
    assert!(xml.contains(&format!("<loc>{}/about</loc>", mock_server.uri())));
    assert!(xml.contains(&format!("<loc>{}/blog</loc>", mock_server.uri())));
}

#[tokio::test]
async fn test_service_unreachable_seed_is_ok() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(2);
    config.output.directory = dir.path().to_path_buf();
    let service = SitemapService::new(config);

    let response = service.generate(CrawlRequest::new(mock_server.uri())).await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["pages"], 0);
    assert_eq!(json["seed_skip"], "status code 503 unsupported");
}

#[tokio::test]
async fn test_service_rejects_bad_requests() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(1);
    config.output.directory = dir.path().to_path_buf();
    let service = SitemapService::new(config);

    let missing = serde_json::to_value(service.generate(CrawlRequest::default()).await).unwrap();
    assert_eq!(missing["status"], "error");
    assert_eq!(missing["message"], "Please specify URL");

    let invalid = serde_json::to_value(service.generate(CrawlRequest::new("not a url")).await).unwrap();
    assert_eq!(invalid["status"], "error");
    assert_eq!(invalid["message"], "Incorrect URL specified \"not a url\"");

    // Nothing was written for rejected requests
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
