//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock sites and run the full
//! seed, drain and persist cycle over real HTTP.

use lexi_crawl::config::Config;
use lexi_crawl::crawler::crawl;
use lexi_crawl::shell::{Command, Reply, Shell};
use lexi_crawl::state::StopHandle;
use lexi_crawl::storage::load_index;
use lexi_crawl::InvertedIndex;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `root` and writing into `dir`
fn create_test_config(root: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.root_url = format!("{}/", root);
    config.crawler.timeout_secs = 2;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.index_path = dir.join("index.json").to_string_lossy().into_owned();
    config
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
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

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn pages_for(index: &InvertedIndex, term: &str) -> Vec<String> {
    index
        .get(term)
        .unwrap_or_default()
        .iter()
        .map(|posting| posting.page.clone())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title><script>var hidden = 1;</script></head><body>
        <a href="/page1">Page 1</a>
        <a href="page2?sort=asc">Page 2</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/page1", "<p>Area: (Population) Area</p>").await;
    mount_page(&server, "/page2", r#"<p>Population, <a href="/page1">back</a></p>"#).await;

    let outcome = crawl(create_test_config(&base, dir.path()), None)
        .await
        .expect("crawl should succeed");

    assert_eq!(outcome.stats.pages_indexed, 3);
    assert_eq!(outcome.stats.failures(), 0);

    let index = &outcome.index;
    assert_eq!(
        pages_for(index, "Population"),
        vec![format!("{}/page1", base), format!("{}/page2", base)]
    );
    assert_eq!(index.get("Area").unwrap()[0].frequency, 2);
    assert!(index.contains("Home"));
    assert!(!index.contains("hidden"));

    // Persisted file matches the returned index
    let saved = load_index(&dir.path().join("index.json")).unwrap();
    assert_eq!(&saved, index);
}

#[tokio::test]
async fn test_robots_disallow_is_respected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&server, "User-agent: *\nDisallow: /private").await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private/data">secret</a> <a href="/public">public</a>"#,
    )
    .await;
    mount_page(&server, "/public", "open").await;

    Mock::given(method("GET"))
        .and(path("/private/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("classified"))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = crawl(create_test_config(&server.uri(), dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.disallowed, 1);
    assert_eq!(outcome.stats.failures(), 0);
    assert!(outcome.index.contains("open"));
    assert!(!outcome.index.contains("classified"));
}

#[tokio::test]
async fn test_crawl_delay_paces_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&server, "User-agent: *\nCrawl-delay: 1").await;
    mount_page(&server, "/", r#"<a href="/next">next</a>"#).await;
    mount_page(&server, "/next", "done").await;

    let start = Instant::now();
    let outcome = crawl(create_test_config(&server.uri(), dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.pages_indexed, 2);
    // robots.txt -> / -> /next, each page request waits out the delay
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_sitemap_seeds_unlinked_pages() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_robots(
        &server,
        &format!("User-agent: *\nDisallow: /hidden\nSitemap: {}/sitemap.xml", base),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>{base}/orphan</loc></url>
              <url><loc>{base}/hidden/page</loc></url>
            </urlset>"#
        )))
        .mount(&server)
        .await;
    mount_page(&server, "/", "home").await;
    mount_page(&server, "/orphan", "lonely").await;

    let outcome = crawl(create_test_config(&base, dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.sitemap_seeds, 1);
    assert_eq!(pages_for(&outcome.index, "lonely"), vec![format!("{}/orphan", base)]);
    assert_eq!(outcome.stats.disallowed, 0);
}

#[tokio::test]
async fn test_unavailable_sitemap_does_not_abort() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_robots(&server, &format!("Sitemap: {}/sitemap.xml", base)).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/", "still here").await;

    let outcome = crawl(create_test_config(&base, dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.sitemap_seeds, 0);
    assert!(outcome.index.contains("still"));
}

#[tokio::test]
async fn test_unavailable_robots_allows_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/a">a</a> root"#).await;
    mount_page(&server, "/a", "reachable").await;

    let outcome = crawl(create_test_config(&server.uri(), dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.pages_indexed, 2);
    assert!(outcome.index.contains("reachable"));
}

#[tokio::test]
async fn test_redirect_to_visited_page_is_not_indexed_twice() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/target">target</a> <a href="/alias">alias</a>"#,
    )
    .await;
    mount_page(&server, "/target", "destination").await;
    Mock::given(method("GET"))
        .and(path("/alias"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/target?via=alias", base).as_str()),
        )
        .mount(&server)
        .await;

    let outcome = crawl(create_test_config(&base, dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.duplicate_redirects, 1);
    assert_eq!(
        pages_for(&outcome.index, "destination"),
        vec![format!("{}/target", base)]
    );
}

#[tokio::test]
async fn test_failed_pages_do_not_abort_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/slow">slow</a> <a href="/broken">broken</a> <a href="/fine">fine</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/fine", "survivor").await;

    let outcome = crawl(create_test_config(&server.uri(), dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.timeouts, 1);
    assert_eq!(outcome.stats.network_failures, 1);
    assert_eq!(outcome.stats.pages_indexed, 2);
    assert!(outcome.index.contains("survivor"));
    assert!(!outcome.index.contains("late"));
}

#[tokio::test]
async fn test_other_sites_are_not_crawled() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        &format!(r#"<a href="{}/elsewhere">elsewhere</a> local"#, other.uri()),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("foreign"))
        .expect(0)
        .mount(&other)
        .await;

    let outcome = crawl(create_test_config(&server.uri(), dir.path()), None)
        .await
        .unwrap();

    assert_eq!(outcome.stats.pages_indexed, 1);
    assert!(!outcome.index.contains("foreign"));
}

#[tokio::test]
async fn test_stopped_crawl_still_persists() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", "never fetched").await;

    let stop = StopHandle::new();
    stop.stop();

    let outcome = crawl(create_test_config(&server.uri(), dir.path()), Some(stop))
        .await
        .unwrap();

    assert!(outcome.stats.stopped_early);
    assert!(outcome.index.is_empty());
    assert!(load_index(&dir.path().join("index.json")).unwrap().is_empty());
}

#[tokio::test]
async fn test_shell_build_then_search() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/cats">cats</a> cat dog"#).await;
    mount_page(&server, "/cats", "cat cat cat").await;

    let config = create_test_config(&base, dir.path());

    let mut shell = Shell::new(config.clone());
    let reply = shell
        .execute(Command::parse("build"), StopHandle::new())
        .await
        .unwrap();
    assert!(matches!(reply, Reply::Output(text) if text.contains("saved successfully")));

    // A fresh shell sees the same index after `load`
    let mut fresh = Shell::new(config);
    fresh
        .execute(Command::parse("load"), StopHandle::new())
        .await
        .unwrap();
    assert_eq!(fresh.index(), shell.index());

    let Reply::Output(results) = fresh
        .execute(Command::parse("find cat dog"), StopHandle::new())
        .await
        .unwrap()
    else {
        panic!("find should not exit the shell");
    };
    let ranked: Vec<&str> = results.lines().filter(|l| l.starts_with("http")).collect();
    assert_eq!(ranked, vec![format!("{}/cats", base), format!("{}/", base)]);
}
