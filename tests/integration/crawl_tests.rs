//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a listing, its discussion pages and the
//! linked resources, and run complete crawl cycles against it.

use newsreel::config::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use newsreel::crawler::{run_crawl, Coordinator, STAGING_PREFIX};
use newsreel::CrawlError;
use std::fs;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"<html><body><table>
<tr class="athing" id="101">
  <td class="title"><span class="titleline"><a href="articles/alpha.html">Alpha: a story</a></span></td>
</tr>
<tr><td class="subtext">12 points</td></tr>
<tr class="athing" id="102">
  <td class="title"><span class="titleline"><a href="articles/foo.html">Foo</a></span></td>
</tr>
<tr class="athing" id="103">
  <td class="title"><span class="titleline"><a href="articles/third.html">Third</a></span></td>
</tr>
</table></body></html>"#;

const ALPHA_DISCUSSION: &str = r##"<html><body>
<a href="news">back to the front page</a>
<div class="comment"><div class="commtext c00">Notes are
  <a href="/files/notes.txt" rel="nofollow">here</a> and
  <a href="#top">up</a>, mail <a href="mailto:someone@example.com">me</a>.</div></div>
<div class="comment"><span class="commtext c5a">Same notes:
  <a href="/files/notes.txt">again</a></span></div>
</body></html>"##;

/// Creates a test configuration polling the mock server's front page
fn create_test_config(server: &MockServer, output: &Path, cycles: u32) -> Config {
    let root = format!("{}/", server.uri());
    Config {
        crawler: CrawlerConfig {
            listing_url: root.clone(),
            base_url: Some(root),
            max_items: 2,
            wait_secs: 0,
            max_concurrent_detail_fetches: 2,
            cycles: Some(cycles),
        },
        http: HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            ..HttpConfig::default()
        },
        output: OutputConfig {
            folder: output.to_path_buf(),
        },
    }
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_site(server: &MockServer, listing_fetches: u64) {
    mount_page(server, "/", LISTING, listing_fetches).await;
    mount_page(server, "/articles/alpha.html", "<h1>Alpha</h1>", 1).await;
    mount_page(server, "/files/notes.txt", "plain notes", 1).await;

    Mock::given(method("GET"))
        .and(path("/articles/foo.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(query_param("id", "101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALPHA_DISCUSSION))
        .expect(1)
        .mount(server)
        .await;

    // Beyond the per-cycle cap
    Mock::given(method("GET"))
        .and(path("/articles/third.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("third"))
        .expect(0)
        .mount(server)
        .await;
}

fn folder_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_cycle_publishes_items() {
    let server = MockServer::start().await;
    mount_site(&server, 1).await;
    let output = tempfile::tempdir().unwrap();

    run_crawl(create_test_config(&server, output.path(), 1))
        .await
        .expect("crawl should succeed");

    // The failed item leaves nothing behind, and no staging folder survives
    assert_eq!(folder_names(output.path()), vec!["Alpha_ a story".to_string()]);

    let item = output.path().join("Alpha_ a story");
    assert_eq!(
        fs::read_to_string(item.join("alpha.html")).unwrap(),
        "<h1>Alpha</h1>"
    );
    assert_eq!(
        fs::read_to_string(item.join("notes.txt")).unwrap(),
        "plain notes"
    );
    assert_eq!(folder_names(&item).len(), 2);
}

#[tokio::test]
async fn test_published_items_are_not_fetched_again() {
    let server = MockServer::start().await;
    // Listing twice; primary, discussion and notes once (checked on drop)
    mount_site(&server, 2).await;
    let output = tempfile::tempdir().unwrap();

    let mut coordinator =
        Coordinator::new(create_test_config(&server, output.path(), 2)).unwrap();
    coordinator.run().await.expect("crawl should succeed");

    let scheduler = coordinator.scheduler();
    assert_eq!(scheduler.cycles_run(), 2);
    assert_eq!(scheduler.dedup().len(), 1);
    assert!(scheduler
        .dedup()
        .contains(&format!("{}/articles/alpha.html", server.uri())));
}

#[tokio::test]
async fn test_listing_failure_ends_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    let output = tempfile::tempdir().unwrap();

    let result = run_crawl(create_test_config(&server, output.path(), 3)).await;

    match result {
        Err(CrawlError::Listing(e)) => assert_eq!(e.status(), Some(503)),
        other => panic!("expected a listing failure, got {:?}", other),
    }
    assert!(folder_names(output.path()).is_empty());
}

#[tokio::test]
async fn test_startup_sweeps_stale_staging() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let stale = output.path().join(format!("{}Old-deadbeef", STAGING_PREFIX));
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("partial.html"), "half").unwrap();
    fs::create_dir_all(output.path().join("Kept")).unwrap();

    let _coordinator = Coordinator::new(create_test_config(&server, output.path(), 1)).unwrap();

    assert!(!stale.exists());
    assert_eq!(folder_names(output.path()), vec!["Kept".to_string()]);
}
