// src/crawl/engine.rs
// =============================================================================
// The crawl engine: fetch -> parse -> analyze -> extract links -> enqueue.
//
// How a run works:
// 1. Validate the seed URL, claim it, and queue it at depth 0
// 2. Start a fixed pool of `max_concurrency` workers
// 3. Each worker takes a task from the frontier and visits it:
//      wait the per-task delay (not for the seed)
//      take a limiter slot, fetch, give the slot back
//      parse, analyze, store the record
//      resolve links, claim the new ones, queue them at depth + 1
// 4. When the frontier's outstanding count reaches zero the workers exit
//    and the run returns the result store
//
// Per-URL failures (bad status, unparsable body, unresolvable link) are
// logged and counted. They end that branch of the crawl, never the crawl.
// A failed URL stays claimed, so it is not fetched again.
// =============================================================================

use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use url::Url;

use super::fetch::{FetchedPage, Fetcher, HttpFetcher};
use super::frontier::{CrawlTask, Frontier};
use super::limiter::Limiter;
use super::store::ResultStore;
use super::visited::VisitedSet;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::page::links::is_web_scheme;
use crate::page::{extract_links, resolve_url, DefaultAnalyzer, PageAnalyzer, ParsedPage};

pub struct CrawlEngine {
    config: Arc<CrawlConfig>,
    fetcher: Arc<dyn Fetcher>,
    analyzer: Arc<dyn PageAnalyzer>,
}

// Counters collected during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    pub links_skipped: usize,
    pub peak_in_flight: usize,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub store: ResultStore,
    pub stats: CrawlStats,
}

impl CrawlEngine {
    /// Engine with the HTTP fetcher and the default page analyzer.
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout)?;
        Self::with_parts(config, Arc::new(fetcher), Arc::new(DefaultAnalyzer))
    }

    pub fn with_parts(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        analyzer: Arc<dyn PageAnalyzer>,
    ) -> Result<Self, CrawlError> {
        config.validate()?;
        Ok(CrawlEngine {
            config: Arc::new(config),
            fetcher,
            analyzer,
        })
    }

    // Crawls from `seed` until every reachable page within the depth limit
    // has been visited
    //
    // Fails only when the seed URL is unusable. Fetch and parse failures are
    // logged and simply leave their URL out of the store.
    pub async fn run(&self, seed: &str) -> Result<ResultStore, CrawlError> {
        let outcome = self.run_until(seed, std::future::pending::<()>()).await?;
        Ok(outcome.store)
    }

    // Same as run(), but stops early when `shutdown` completes
    //
    // On shutdown the queue is dropped, tasks waiting for a slot or sleeping
    // are woken and abandoned, and in-flight fetches are cut off. Whatever was
    // stored so far is returned, with `stats.cancelled` set.
    pub async fn run_until<S>(&self, seed: &str, shutdown: S) -> Result<CrawlOutcome, CrawlError>
    where
        S: Future<Output = ()>,
    {
        let seed = parse_seed(seed)?;
        let started = Instant::now();

        let run = Arc::new(Run::new(
            seed.clone(),
            self.config.clone(),
            self.fetcher.clone(),
            self.analyzer.clone(),
        ));
        run.visited.claim_if_new(seed.as_str());
        let queued = run.frontier.push(CrawlTask {
            url: seed.clone(),
            depth: 0,
        });
        debug_assert!(queued, "a fresh frontier accepts the seed");

        info!(
            "Crawling {} (max depth {}, {} workers)",
            seed, self.config.max_depth, self.config.max_concurrency
        );

        let mut workers = JoinSet::new();
        for id in 0..self.config.max_concurrency {
            workers.spawn(run.clone().work(id));
        }

        tokio::pin!(shutdown);
        let mut cancelled = false;
        loop {
            tokio::select! {
                joined = workers.join_next() => match joined {
                    Some(Ok(())) => {}
                    Some(Err(e)) => error!("crawl worker failed: {}", e),
                    None => break,
                },
                _ = &mut shutdown, if !cancelled => {
                    warn!(
                        "Shutdown requested, abandoning {} outstanding tasks",
                        run.frontier.outstanding()
                    );
                    cancelled = true;
                    run.cancel();
                }
            }
        }

        let mut stats = run.stats();
        stats.cancelled = cancelled;
        stats.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            "Crawl finished: {} URLs claimed, {} pages stored, {} fetch failures, {} parse failures in {:?}",
            run.visited.len(),
            run.store.len(),
            stats.fetch_failures,
            stats.parse_failures,
            Duration::from_millis(stats.elapsed_ms)
        );

        Ok(CrawlOutcome {
            store: run.store.clone(),
            stats,
        })
    }
}

fn parse_seed(seed: &str) -> Result<Url, CrawlError> {
    let mut url = Url::parse(seed.trim())
        .map_err(|e| CrawlError::config(format!("invalid seed URL '{}': {}", seed, e)))?;
    if !is_web_scheme(&url) {
        return Err(CrawlError::config(format!(
            "seed URL must be http or https, got '{}'",
            seed
        )));
    }
    // Same rule as for discovered links, so /#top and / are one page
    url.set_fragment(None);
    Ok(url)
}

// Everything one crawl shares between its workers. Created per run and
// dropped when the run returns.
struct Run {
    base: Url,
    config: Arc<CrawlConfig>,
    fetcher: Arc<dyn Fetcher>,
    analyzer: Arc<dyn PageAnalyzer>,
    visited: VisitedSet,
    store: ResultStore,
    limiter: Limiter,
    frontier: Frontier,
    cancel: watch::Sender<bool>,
    counters: Counters,
}

#[derive(Default)]
struct Counters {
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    parse_failures: AtomicUsize,
    links_skipped: AtomicUsize,
}

impl Run {
    fn new(
        base: Url,
        config: Arc<CrawlConfig>,
        fetcher: Arc<dyn Fetcher>,
        analyzer: Arc<dyn PageAnalyzer>,
    ) -> Self {
        let limiter = Limiter::new(config.max_concurrency);
        Run {
            base,
            config,
            fetcher,
            analyzer,
            visited: VisitedSet::new(),
            store: ResultStore::new(),
            limiter,
            frontier: Frontier::new(),
            cancel: watch::channel(false).0,
            counters: Counters::default(),
        }
    }

    async fn work(self: Arc<Self>, id: usize) {
        debug!("worker {} started", id);
        while let Some(guard) = self.frontier.next().await {
            self.visit(guard.task()).await;
        }
        debug!("worker {} done", id);
    }

    async fn visit(&self, task: &CrawlTask) {
        if task.depth > 0 && !self.config.per_task_delay.is_zero() {
            let delay = tokio::time::sleep(self.config.per_task_delay);
            if self.unless_cancelled(delay).await.is_none() {
                return;
            }
        }

        let Some(slot) = self.limiter.acquire().await else {
            return;
        };
        debug!("fetching {} ({} in flight)", task.url, self.limiter.in_flight());
        let fetched = self.unless_cancelled(self.fetcher.fetch(&task.url)).await;
        drop(slot);

        let page = match fetched {
            None => return,
            Some(Ok(page)) => page,
            Some(Err(e)) => {
                warn!("{}", e);
                self.counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        self.counters.pages_fetched.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Fetched {} [depth {}, HTTP {}, {} bytes]",
            task.url,
            task.depth,
            page.status,
            page.body.len()
        );

        match self.process(&task.url, &page) {
            Ok(links) => {
                for href in links {
                    self.schedule(task, &href);
                }
            }
            Err(e) => {
                warn!("{}", e);
                self.counters.parse_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    // Parses, analyzes and stores a page, returning the links to follow.
    // Synchronous on purpose: the parsed document is not Send.
    fn process(&self, url: &Url, fetched: &FetchedPage) -> Result<Vec<String>, CrawlError> {
        let page = ParsedPage::parse(&fetched.body, fetched.content_type.as_deref())
            .map_err(|e| e.at_url(url.as_str()))?;

        let record = self.analyzer.analyze(&self.base, url, &page);
        self.store.append_record(url.as_str(), record);
        info!("Processed page: {}", url);

        Ok(extract_links(&page, url, self.config.link_scope))
    }

    fn schedule(&self, parent: &CrawlTask, href: &str) {
        let depth = parent.depth + 1;
        if depth >= self.config.max_depth {
            return;
        }

        let mut url = match resolve_url(&parent.url, href) {
            Ok(url) => url,
            Err(e) => {
                debug!("skipping link on {}: {}", parent.url, e);
                self.counters.links_skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        // Fragments never reach the server; /a and /a#top are one page
        url.set_fragment(None);

        if self.visited.claim_if_new(url.as_str()) {
            if !self.frontier.push(CrawlTask { url, depth }) {
                debug!("crawl is stopping, dropped a link found on {}", parent.url);
            }
        }
    }

    async fn unless_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        let mut cancelled = self.cancel.subscribe();
        tokio::select! {
            out = fut => Some(out),
            _ = async { let _ = cancelled.wait_for(|c| *c).await; } => None,
        }
    }

    fn cancel(&self) {
        self.cancel.send_replace(true);
        self.frontier.close();
        self.limiter.close();
    }

    fn stats(&self) -> CrawlStats {
        CrawlStats {
            pages_fetched: self.counters.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.counters.fetch_failures.load(Ordering::Relaxed),
            parse_failures: self.counters.parse_failures.load(Ordering::Relaxed),
            links_skipped: self.counters.links_skipped.load(Ordering::Relaxed),
            peak_in_flight: self.limiter.peak(),
            cancelled: false,
            elapsed_ms: 0,
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why Arc<Run>?
//    - Each worker is a separate tokio task and tokio::spawn needs 'static data
//    - Arc gives every worker shared ownership of the same Run
//    - The Run is dropped once the last worker and run_until are done with it
//
// 2. What is JoinSet?
//    - A collection of spawned tasks you can await one by one
//    - join_next() returns None once every task has finished
//    - A panicking worker shows up as Some(Err(..)) instead of taking the
//      whole crawl down
//
// 3. What does tokio::select! do here?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first; the other futures are dropped
//    - In unless_cancelled() that means a fetch or a sleep is abandoned as
//      soon as the cancel flag flips
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    // An in-memory website. Every fetch is counted, takes `latency`, and
    // updates a gauge of concurrent fetches.
    struct FakeSite {
        pages: HashMap<String, (u16, String)>,
        latency: Duration,
        fetches: Mutex<HashMap<String, usize>>,
        started: Mutex<HashMap<String, Instant>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeSite {
        fn new(latency: Duration) -> Self {
            FakeSite {
                pages: HashMap::new(),
                latency,
                fetches: Mutex::new(HashMap::new()),
                started: Mutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        // A page whose body is just links to `links`
        fn page(mut self, url: &str, links: &[&str]) -> Self {
            let body: String = links
                .iter()
                .map(|l| format!(r#"<a href="{}">{}</a>"#, l, l))
                .collect();
            let html = format!("<html><head><title>{}</title></head><body>{}</body></html>", url, body);
            self.pages.insert(url.to_string(), (200, html));
            self
        }

        fn status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), (status, String::new()));
            self
        }

        fn fetch_count(&self, url: &str) -> usize {
            self.fetches.lock().get(url).copied().unwrap_or(0)
        }

        fn total_fetches(&self) -> usize {
            self.fetches.lock().values().sum()
        }

        // When the first fetch of `url` began
        fn started_at(&self, url: &str) -> Option<Instant> {
            self.started.lock().get(url).copied()
        }
    }

    #[async_trait]
    impl Fetcher for FakeSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
            *self.fetches.lock().entry(url.to_string()).or_default() += 1;
            self.started.lock().entry(url.to_string()).or_insert_with(Instant::now);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.pages.get(url.as_str()) {
                Some((200, html)) => Ok(FetchedPage {
                    status: 200,
                    content_type: Some("text/html".to_string()),
                    body: html.clone().into_bytes(),
                }),
                Some((status, _)) => Err(CrawlError::fetch(url.as_str(), format!("HTTP {}", status))),
                None => Err(CrawlError::fetch(url.as_str(), "HTTP 404")),
            }
        }
    }

    fn config(max_depth: usize, max_concurrency: usize) -> CrawlConfig {
        CrawlConfig {
            max_depth,
            max_concurrency,
            per_task_delay: Duration::ZERO,
            ..CrawlConfig::default()
        }
    }

    fn engine(site: &Arc<FakeSite>, config: CrawlConfig) -> CrawlEngine {
        CrawlEngine::with_parts(config, site.clone(), Arc::new(DefaultAnalyzer)).unwrap()
    }

    fn small_site() -> FakeSite {
        FakeSite::new(Duration::from_millis(10))
            .page("http://a.test/", &["/b", "/c"])
            .page("http://a.test/b", &["/"])
            .page("http://a.test/c", &[])
    }

    #[tokio::test]
    async fn test_small_site_is_crawled_once_per_page() {
        let site = Arc::new(small_site());
        let store = engine(&site, config(2, 5)).run("http://a.test/").await.unwrap();

        let urls: Vec<_> = store.snapshot().into_keys().collect();
        assert_eq!(urls, vec!["http://a.test/", "http://a.test/b", "http://a.test/c"]);
        assert_eq!(site.fetch_count("http://a.test/"), 1);
        assert_eq!(site.total_fetches(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_no_record() {
        let site = Arc::new(
            FakeSite::new(Duration::from_millis(5))
                .page("http://a.test/", &["/b", "/c"])
                .page("http://a.test/b", &["/"])
                .status("http://a.test/c", 500),
        );
        let outcome = engine(&site, config(2, 5))
            .run_until("http://a.test/", std::future::pending())
            .await
            .unwrap();

        assert!(outcome.store.contains("http://a.test/"));
        assert!(outcome.store.contains("http://a.test/b"));
        assert!(!outcome.store.contains("http://a.test/c"));
        assert_eq!(outcome.stats.fetch_failures, 1);
        assert_eq!(outcome.stats.pages_fetched, 2);
        assert!(!outcome.stats.cancelled);
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_only_the_seed() {
        let site = Arc::new(small_site());
        let store = engine(&site, config(0, 5)).run("http://a.test/").await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(site.total_fetches(), 1);
    }

    #[tokio::test]
    async fn test_depth_limit_cuts_chain() {
        let site = Arc::new(
            FakeSite::new(Duration::from_millis(1))
                .page("http://a.test/", &["/1"])
                .page("http://a.test/1", &["/2"])
                .page("http://a.test/2", &["/3"])
                .page("http://a.test/3", &["/4"]),
        );
        let store = engine(&site, config(3, 2)).run("http://a.test/").await.unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.contains("http://a.test/2"));
        assert_eq!(site.fetch_count("http://a.test/3"), 0);
    }

    #[tokio::test]
    async fn test_many_paths_to_one_page_fetch_it_once() {
        // Every hub page links to every other hub page and to /shared.
        let hubs: Vec<String> = (0..8).map(|i| format!("/hub{}", i)).collect();
        let mut links: Vec<&str> = hubs.iter().map(|h| h.as_str()).collect();
        links.push("/shared");
        links.push("/shared#anchor");

        let mut site = FakeSite::new(Duration::from_millis(2)).page("http://a.test/", &links);
        for hub in &hubs {
            site = site.page(&format!("http://a.test{}", hub), &links);
        }
        let site = Arc::new(site.page("http://a.test/shared", &["/"]));

        let store = engine(&site, config(4, 4)).run("http://a.test/").await.unwrap();

        assert_eq!(store.len(), 10);
        assert_eq!(site.fetch_count("http://a.test/shared"), 1);
        for hub in &hubs {
            assert_eq!(site.fetch_count(&format!("http://a.test{}", hub)), 1);
        }
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let children: Vec<String> = (0..30).map(|i| format!("/p{}", i)).collect();
        let child_refs: Vec<&str> = children.iter().map(|c| c.as_str()).collect();

        let mut site = FakeSite::new(Duration::from_millis(15)).page("http://a.test/", &child_refs);
        for child in &children {
            site = site.page(&format!("http://a.test{}", child), &child_refs);
        }
        let site = Arc::new(site);

        let outcome = engine(&site, config(3, 3))
            .run_until("http://a.test/", std::future::pending())
            .await
            .unwrap();

        assert_eq!(outcome.store.len(), 31);
        assert!(site.peak.load(Ordering::SeqCst) <= 3);
        assert!(outcome.stats.peak_in_flight <= 3);
        assert!(outcome.stats.peak_in_flight >= 1);
    }

    #[tokio::test]
    async fn test_single_slot_serializes_fetches() {
        let latency = Duration::from_millis(30);
        let site = Arc::new(
            FakeSite::new(latency)
                .page("http://a.test/", &["/b", "/c"])
                .page("http://a.test/b", &["/"])
                .page("http://a.test/c", &[]),
        );

        let started = Instant::now();
        let store = engine(&site, config(2, 1)).run("http://a.test/").await.unwrap();

        assert_eq!(store.len(), 3);
        assert!(started.elapsed() >= latency * 3);
        assert_eq!(site.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cyclic_graph_terminates() {
        let site = Arc::new(
            FakeSite::new(Duration::from_millis(1))
                .page("http://a.test/", &["/x"])
                .page("http://a.test/x", &["/y"])
                .page("http://a.test/y", &["/", "/x"]),
        );
        let engine = engine(&site, config(100, 2));
        let run = engine.run("http://a.test/");
        let store = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("crawl did not terminate")
            .unwrap();

        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_seed_fragment_does_not_cause_a_second_fetch() {
        let site = Arc::new(
            FakeSite::new(Duration::from_millis(1))
                .page("http://a.test/", &["/b"])
                .page("http://a.test/b", &["/"]),
        );
        let store = engine(&site, config(3, 2)).run("http://a.test/#top").await.unwrap();

        let urls: Vec<_> = store.snapshot().into_keys().collect();
        assert_eq!(urls, vec!["http://a.test/", "http://a.test/b"]);
        assert_eq!(site.fetch_count("http://a.test/"), 1);
        assert_eq!(site.total_fetches(), 2);
    }

    #[tokio::test]
    async fn test_unresolvable_link_is_skipped_but_siblings_are_followed() {
        let site = Arc::new(
            FakeSite::new(Duration::from_millis(1))
                .page("http://a.test/", &["http://[::1", "/ok"])
                .page("http://a.test/ok", &[]),
        );
        let outcome = engine(&site, config(2, 2))
            .run_until("http://a.test/", std::future::pending())
            .await
            .unwrap();

        assert!(outcome.store.contains("http://a.test/ok"));
        assert_eq!(site.total_fetches(), 2);
        assert_eq!(outcome.stats.links_skipped, 1);
        assert_eq!(outcome.stats.fetch_failures, 0);
    }

    #[tokio::test]
    async fn test_unparsable_page_is_skipped() {
        struct BinarySite;

        #[async_trait]
        impl Fetcher for BinarySite {
            async fn fetch(&self, _url: &Url) -> Result<FetchedPage, CrawlError> {
                Ok(FetchedPage {
                    status: 200,
                    content_type: Some("application/pdf".to_string()),
                    body: b"%PDF-1.4".to_vec(),
                })
            }
        }

        let engine =
            CrawlEngine::with_parts(config(2, 1), Arc::new(BinarySite), Arc::new(DefaultAnalyzer))
                .unwrap();
        let outcome = engine
            .run_until("http://a.test/doc.pdf", std::future::pending())
            .await
            .unwrap();

        assert!(outcome.store.is_empty());
        assert_eq!(outcome.stats.parse_failures, 1);
    }

    #[tokio::test]
    async fn test_bad_seed_is_config_error() {
        let site = Arc::new(small_site());
        let engine = engine(&site, config(2, 1));

        assert!(matches!(engine.run("not a url").await, Err(CrawlError::Config(_))));
        assert!(matches!(engine.run("ftp://a.test/").await, Err(CrawlError::Config(_))));
        assert_eq!(site.total_fetches(), 0);
    }

    #[test]
    fn test_zero_concurrency_engine_is_rejected() {
        let site = Arc::new(small_site());
        let result = CrawlEngine::with_parts(config(2, 0), site, Arc::new(DefaultAnalyzer));
        assert!(matches!(result, Err(CrawlError::Config(_))));
    }

    #[tokio::test]
    async fn test_delay_applies_to_children_only() {
        let site = Arc::new(small_site());
        let delayed = CrawlConfig {
            per_task_delay: Duration::from_millis(40),
            ..config(2, 5)
        };

        let started = Instant::now();
        let store = engine(&site, delayed).run("http://a.test/").await.unwrap();
        assert_eq!(store.len(), 3);

        let seed_wait = site.started_at("http://a.test/").unwrap() - started;
        assert!(seed_wait < Duration::from_millis(40), "seed waited {:?}", seed_wait);
        for child in ["http://a.test/b", "http://a.test/c"] {
            let child_wait = site.started_at(child).unwrap() - started;
            assert!(child_wait >= Duration::from_millis(40), "{} waited {:?}", child, child_wait);
        }
    }

    #[tokio::test]
    async fn test_http_crawl_against_local_server() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        // set_body_string would force text/plain
        let html = |body: &str| ResponseTemplate::new(200).set_body_raw(body, "text/html");
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html(r#"<title>Home</title><a href="/b">b</a><a href="/c">c</a>"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(html(r#"<title>B</title><a href="/">home</a>"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/c"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let engine = CrawlEngine::new(config(2, 5)).unwrap();
        let store = engine.run(&format!("{}/", server.uri())).await.unwrap();

        let titles: Vec<String> = store
            .snapshot()
            .into_values()
            .map(|record| record[0].clone())
            .collect();
        assert_eq!(titles, vec!["Home".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_shutdown_stops_a_slow_crawl() {
        let children: Vec<String> = (0..20).map(|i| format!("/slow{}", i)).collect();
        let child_refs: Vec<&str> = children.iter().map(|c| c.as_str()).collect();
        let mut site = FakeSite::new(Duration::from_millis(200)).page("http://a.test/", &child_refs);
        for child in &children {
            site = site.page(&format!("http://a.test{}", child), &[]);
        }
        let site = Arc::new(site);

        let shutdown = tokio::time::sleep(Duration::from_millis(300));
        let started = Instant::now();
        let outcome = engine(&site, config(3, 2))
            .run_until("http://a.test/", shutdown)
            .await
            .unwrap();

        assert!(outcome.stats.cancelled);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(outcome.store.contains("http://a.test/"));
        assert!(outcome.store.len() < 21);
    }
}
