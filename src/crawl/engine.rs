// src/crawl/engine.rs
// =============================================================================
// This module implements the two crawl strategies.
//
// Recursive mode (breadth-first crawl):
// 1. Seed the frontier with the site's URL plus every discovered endpoint
// 2. Dequeue a page, skip it if we've seen it, otherwise fetch it
// 3. Download every <img> the site policy accepts
// 4. Enqueue every root-relative <a> link the policy accepts (once each)
// 5. Repeat until the frontier is empty
//
// Direct mode (flat endpoint-list download):
// - The policy's endpoint list IS the set of downloads; entries that don't
//   name an image file are dropped without a request, everything else goes
//   straight to the image fetcher. No frontier, no link-following.
//
// Termination needs no depth limit: the visited sets guarantee every page
// and every distinct endpoint string is processed at most once, so any
// finite link graph - cycles included - runs out of new work.
//
// Politeness:
// - Small delay between page fetches to avoid overwhelming servers
// - Image downloads run concurrently, but bounded
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - buffer_unordered: Bounded concurrency over a stream of futures
// =============================================================================

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::images::{save_image_from_url, ImageExt, SaveOutcome};
use crate::sites::SitePolicy;

use super::progress::Progress;

// Per-request timeout so one hung server can't stall the whole crawl
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// How many image downloads may be in flight at once
const MAX_CONCURRENT_DOWNLOADS: usize = 8;

// Polite crawling: pause between page fetches
const CRAWL_DELAY: Duration = Duration::from_millis(100);

// A destination that fails this many writes in a row is not coming back
const MAX_CONSECUTIVE_FS_FAILURES: usize = 5;

// What one crawl invocation was asked to do
//
// Built once by the dispatcher and never mutated while the crawl runs.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    /// Folder the images land in (created if missing)
    pub dest: PathBuf,
    /// Direct mode: download the endpoint list instead of crawling pages
    pub direct: bool,
    /// Replace files that already exist under their derived name
    pub overwrite: bool,
    /// Follow links found on pages (recursive mode only)
    pub recursive: bool,
}

// Counters for what a crawl did, returned to the dispatcher
//
// Serialize so `--json` runs can emit these directly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    /// Pages fetched and parsed successfully
    pub pages_visited: usize,
    /// Images downloaded and written
    pub images_saved: usize,
    /// Images skipped (already on disk, or nothing at the URL)
    pub images_skipped: usize,
    /// Failed page fetches, failed downloads, failed writes
    pub fetch_failures: usize,
}

// The working state of one recursive crawl
//
// Owned exclusively by a single invocation - nothing here outlives or is
// shared across crawls.
struct CrawlState {
    /// FIFO queue of page URLs waiting to be visited (breadth-first)
    frontier: VecDeque<String>,
    /// Absolute URLs already dequeued and processed
    visited: HashSet<String>,
    /// Raw href strings already enqueued, so a link that appears on many
    /// pages still only spawns one visit
    visited_endpoints: HashSet<String>,
}

impl CrawlState {
    fn new(seed: &str, endpoints: &[String]) -> Self {
        // The frontier starts out holding the seed plus every discovered
        // endpoint resolved against it
        let mut frontier = VecDeque::with_capacity(endpoints.len() + 1);
        frontier.push_back(seed.to_string());
        for endpoint in endpoints {
            frontier.push_back(join_url(seed, endpoint));
        }

        CrawlState {
            frontier,
            visited: HashSet::new(),
            visited_endpoints: HashSet::new(),
        }
    }
}

// One crawl invocation: a policy, a progress sink, and an HTTP client
pub struct Crawler<'a> {
    client: Client,
    policy: &'a dyn SitePolicy,
    progress: &'a dyn Progress,
}

impl<'a> Crawler<'a> {
    pub fn new(policy: &'a dyn SitePolicy, progress: &'a dyn Progress) -> Result<Self> {
        // One client for the whole crawl: connection pooling + shared timeout
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Crawler {
            client,
            policy,
            progress,
        })
    }

    // Runs the crawl described by `target` and reports what happened
    //
    // Endpoint discovery runs first, eagerly; if IT fails the site is
    // misconfigured or unreachable and the whole run is an error. Anything
    // that goes wrong after this point only skips individual pages/images.
    pub async fn scrape(&self, target: &CrawlTarget) -> Result<CrawlReport> {
        let endpoints = self.policy.list_endpoints(&self.client).await?;

        tokio::fs::create_dir_all(&target.dest)
            .await
            .with_context(|| {
                format!("Failed to create destination folder {}", target.dest.display())
            })?;

        let report = if target.direct {
            self.scrape_directly(endpoints, target).await?
        } else {
            self.scrape_pages(endpoints, target).await?
        };

        self.progress.done();
        Ok(report)
    }

    // Recursive mode: breadth-first traversal of the site's link graph
    async fn scrape_pages(
        &self,
        endpoints: Vec<String>,
        target: &CrawlTarget,
    ) -> Result<CrawlReport> {
        let seed = self.policy.seed_url();
        let mut state = CrawlState::new(seed, &endpoints);
        let mut report = CrawlReport::default();
        let mut fs_failures = 0usize;

        while let Some(curr_url) = state.frontier.pop_front() {
            // Every page is fetched at most once per crawl; insert returns
            // false when the URL was already in the set
            if !state.visited.insert(curr_url.clone()) {
                continue;
            }

            self.progress.page_visited(&curr_url);

            let html = match self.fetch_page(&curr_url).await {
                Ok(html) => html,
                Err(e) => {
                    // Dead page: move on to the next frontier entry, no retry
                    eprintln!("  Warning: Failed to fetch {}: {}", curr_url, e);
                    report.fetch_failures += 1;
                    continue;
                }
            };
            report.pages_visited += 1;

            let refs = extract_page_refs(&html);

            // Image tags: filter through the policy, rewrite, resolve
            // against THIS page, then download
            let downloads: Vec<String> = refs
                .images
                .iter()
                .filter(|src| self.policy.accepts_image_url(src))
                .map(|src| self.policy.rewrite_image_url(src))
                .filter_map(|src| resolve_image_url(&curr_url, &src))
                .collect();

            self.download_batch(downloads, target, &mut report, &mut fs_failures)
                .await?;

            // Anchor tags: only root-relative links spawn new crawl work,
            // and each distinct href string is enqueued at most once
            for href in refs.links {
                if !self.policy.accepts_link(&href) {
                    continue;
                }

                if target.recursive
                    && href.starts_with('/')
                    && state.visited_endpoints.insert(href.clone())
                {
                    let endpoint = self.policy.rewrite_link(&href);
                    // Resolved against the CURRENT page, not the seed
                    state.frontier.push_back(join_url(&curr_url, &endpoint));
                }
            }

            // Polite crawling: small delay between page fetches
            tokio::time::sleep(CRAWL_DELAY).await;
        }

        Ok(report)
    }

    // Direct mode: the endpoint list is the complete set of downloads
    async fn scrape_directly(
        &self,
        endpoints: Vec<String>,
        target: &CrawlTarget,
    ) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();
        let mut fs_failures = 0usize;

        // Preprocess each endpoint, then keep only entries that actually
        // name an image file - the rest are dropped without a request
        let downloads: Vec<String> = endpoints
            .iter()
            .map(|endpoint| self.policy.rewrite_link(endpoint))
            .filter(|endpoint| ImageExt::from_name_or_url(endpoint).is_some())
            .collect();

        self.download_batch(downloads, target, &mut report, &mut fs_failures)
            .await?;

        Ok(report)
    }

    // Downloads a batch of image URLs with bounded concurrency and folds
    // the outcomes into the report
    async fn download_batch(
        &self,
        urls: Vec<String>,
        target: &CrawlTarget,
        report: &mut CrawlReport,
        fs_failures: &mut usize,
    ) -> Result<()> {
        // Each future downloads one image; buffer_unordered keeps at most
        // MAX_CONCURRENT_DOWNLOADS of them in flight
        let results: Vec<(String, Result<SaveOutcome>)> =
            stream::iter(urls.into_iter().map(|url| {
                let client = self.client.clone();
                let dest = target.dest.clone();
                let overwrite = target.overwrite;
                async move {
                    let outcome = save_image_from_url(&client, &url, &dest, overwrite).await;
                    (url, outcome)
                }
            }))
            .buffer_unordered(MAX_CONCURRENT_DOWNLOADS)
            .collect()
            .await;

        for (url, outcome) in results {
            match outcome {
                Ok(outcome) => {
                    *fs_failures = 0;
                    self.progress.image_outcome(&url, &outcome);
                    match outcome {
                        SaveOutcome::Saved { .. } => report.images_saved += 1,
                        SaveOutcome::SkippedExisting | SaveOutcome::SkippedNotFound => {
                            report.images_skipped += 1
                        }
                        SaveOutcome::TransportFailed { .. } => report.fetch_failures += 1,
                    }
                }
                Err(e) => {
                    // Filesystem trouble. One bad write is survivable; a
                    // destination that keeps failing aborts the site run.
                    eprintln!("  Warning: {:#}", e);
                    report.fetch_failures += 1;
                    *fs_failures += 1;
                    if *fs_failures >= MAX_CONSECUTIVE_FS_FAILURES {
                        return Err(anyhow!(
                            "Aborting {}: {} filesystem failures in a row writing to {}",
                            self.policy.name(),
                            fs_failures,
                            target.dest.display()
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    // Fetches a web page and returns its HTML content
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {}", response.status()));
        }

        let html = response.text().await?;
        Ok(html)
    }
}

// The references one page contributes to the crawl
struct PageRefs {
    images: Vec<String>,
    links: Vec<String>,
}

// Extracts image sources and anchor hrefs from HTML
//
// Image tags are checked for src first, then the data-src attribute that
// lazy-loading sites use instead. Malformed markup is html5ever's problem;
// whatever it can make sense of, we take.
//
// Kept synchronous on purpose: scraper's Html isn't thread-safe, so it
// must be dropped before the next await point.
fn extract_page_refs(html: &str) -> PageRefs {
    let document = Html::parse_document(html);

    // Both selectors are constant and known to be valid
    let img_selector = Selector::parse("img").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let images = document
        .select(&img_selector)
        .filter_map(|element| {
            element
                .value()
                .attr("src")
                .or_else(|| element.value().attr("data-src"))
        })
        .map(str::to_string)
        .collect();

    let links = document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    PageRefs { images, links }
}

// Resolves a (possibly relative) image source against the page it was on
//
// Absolute sources pass through unchanged; root-relative and
// protocol-relative ones are resolved the way a browser would.
fn resolve_image_url(page_url: &str, src: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    base.join(src).ok().map(|url| url.to_string())
}

// Joins a base URL and an endpoint with exactly one '/' between them
//
// Works for every trailing/leading slash combination, replacing the
// fragile endswith('/') checks this logic tends to accumulate:
//   join_url("https://a.com",  "b")  -> "https://a.com/b"
//   join_url("https://a.com/", "b")  -> "https://a.com/b"
//   join_url("https://a.com",  "/b") -> "https://a.com/b"
//   join_url("https://a.com/", "/b") -> "https://a.com/b"
pub fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');

    if endpoint.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::SilentProgress;
    use crate::sites::LolPolicy;
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Accept-everything policy with a canned endpoint list
    struct TestPolicy {
        seed: String,
        endpoints: Vec<String>,
    }

    #[async_trait]
    impl SitePolicy for TestPolicy {
        fn name(&self) -> &str {
            "Test"
        }

        fn seed_url(&self) -> &str {
            &self.seed
        }

        async fn list_endpoints(&self, _client: &Client) -> Result<Vec<String>> {
            Ok(self.endpoints.clone())
        }

        fn accepts_image_url(&self, _url: &str) -> bool {
            true
        }

        fn accepts_link(&self, _url: &str) -> bool {
            true
        }
    }

    fn target(dest: &std::path::Path, direct: bool) -> CrawlTarget {
        CrawlTarget {
            dest: dest.to_path_buf(),
            direct,
            overwrite: false,
            recursive: true,
        }
    }

    #[tokio::test]
    async fn test_cyclic_graph_fetches_every_page_exactly_once() {
        let server = MockServer::start().await;

        // Three pages linking in a cycle; .expect(1) makes the mock server
        // itself verify the dedup property when it's dropped
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="/page-a">a</a> <a href="/page-b">b</a>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page-a"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="/page-b">b</a> <a href="/page-a">self</a>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page-b"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"<a href="/page-a">back</a>"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let policy = TestPolicy {
            seed: server.uri(),
            endpoints: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(&policy, &SilentProgress).unwrap();

        let report = crawler.scrape(&target(dir.path(), false)).await.unwrap();

        // Terminated despite the cycle, and visited each page once
        assert_eq!(report.pages_visited, 3);
    }

    #[tokio::test]
    async fn test_failed_page_skips_that_page_only() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="/dead">dead</a> <a href="/alive">alive</a>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dead"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alive"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>fine</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let policy = TestPolicy {
            seed: server.uri(),
            endpoints: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(&policy, &SilentProgress).unwrap();

        let report = crawler.scrape(&target(dir.path(), false)).await.unwrap();

        assert_eq!(report.pages_visited, 2);
        assert_eq!(report.fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_policy_filters_images_end_to_end() {
        let server = MockServer::start().await;

        let page = r#"
            <img src="/assets/abilities/foo.png">
            <img src="/icons/spell1.png">
        "#;
        Mock::given(method("GET"))
            .and(path("/en-us/champions/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        // The accepted icon must be downloaded...
        Mock::given(method("GET"))
            .and(path("/icons/spell1.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"icon".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        // ...and the rejected one must never even be requested
        Mock::given(method("GET"))
            .and(path("/assets/abilities/foo.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let policy = LolPolicy::new(format!("{}/en-us/champions/", server.uri()));
        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(&policy, &SilentProgress).unwrap();

        let report = crawler.scrape(&target(dir.path(), false)).await.unwrap();

        assert_eq!(report.images_saved, 1);
        assert!(dir.path().join("spell1.png").exists());
        assert!(!dir.path().join("foo.png").exists());
    }

    #[tokio::test]
    async fn test_direct_mode_skips_non_image_endpoints() {
        let server = MockServer::start().await;

        for name in ["a.png", "b.jpg", "c.bmp"] {
            Mock::given(method("GET"))
                .and(path(format!("/icons/{}", name)))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
                .expect(1)
                .mount(&server)
                .await;
        }
        // The non-image endpoint must be dropped without a network call
        Mock::given(method("GET"))
            .and(path("/icons/readme.txt"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let policy = TestPolicy {
            seed: server.uri(),
            endpoints: vec![
                format!("{}/icons/a.png", server.uri()),
                format!("{}/icons/b.jpg", server.uri()),
                format!("{}/icons/c.bmp", server.uri()),
                format!("{}/icons/readme.txt", server.uri()),
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let crawler = Crawler::new(&policy, &SilentProgress).unwrap();

        let report = crawler.scrape(&target(dir.path(), true)).await.unwrap();

        assert_eq!(report.images_saved, 3);
        assert_eq!(report.fetch_failures, 0);
    }

    #[test]
    fn test_join_url_slash_combinations() {
        assert_eq!(join_url("https://a.com", "b"), "https://a.com/b");
        assert_eq!(join_url("https://a.com/", "b"), "https://a.com/b");
        assert_eq!(join_url("https://a.com", "/b"), "https://a.com/b");
        assert_eq!(join_url("https://a.com/", "/b"), "https://a.com/b");
        assert_eq!(join_url("https://a.com/", ""), "https://a.com");
    }

    #[test]
    fn test_extract_page_refs_src_and_data_src() {
        let html = r#"
            <img src="/a.png">
            <img data-src="/lazy.png">
            <img alt="no source at all">
            <a href="/next">next</a>
            <a>no href</a>
        "#;
        let refs = extract_page_refs(html);
        assert_eq!(refs.images, vec!["/a.png", "/lazy.png"]);
        assert_eq!(refs.links, vec!["/next"]);
    }

    #[test]
    fn test_resolve_image_url() {
        assert_eq!(
            resolve_image_url("https://example.com/page/", "/icons/a.png"),
            Some("https://example.com/icons/a.png".to_string())
        );
        assert_eq!(
            resolve_image_url("https://example.com/page/", "https://cdn.example.com/a.png"),
            Some("https://cdn.example.com/a.png".to_string())
        );
        assert_eq!(resolve_image_url("not a url", "/icons/a.png"), None);
    }
}
