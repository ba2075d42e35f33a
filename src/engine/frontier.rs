// * Frontier & Visited Set - the mutable state of one crawl run.
// * Crawl-scoped by construction: every run builds its own Frontier, so
// * concurrent crawl requests on a long-lived server never share state.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};

use crate::engine::normalization::NormalizedUrl;

// * A pending URL plus the page that discovered it. The origin is used only
// * for scope decisions and is not part of the final output.
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: NormalizedUrl,
    pub origin: NormalizedUrl,
    pub depth: usize,
}

pub struct Frontier {
    queue: Mutex<VecDeque<FrontierEntry>>,
    visited: Mutex<HashSet<NormalizedUrl>>,
    in_flight: AtomicUsize,
    cancelled: AtomicBool,
    page_cap_logged: AtomicBool,
    wakeup: Notify,
    max_pages: usize,
    max_depth: usize,
}

impl Frontier {
    pub fn new(max_pages: usize, max_depth: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            visited: Mutex::new(HashSet::new()),
            in_flight: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            page_cap_logged: AtomicBool::new(false),
            wakeup: Notify::new(),
            max_pages,
            max_depth,
        }
    }

    // * Adds a URL to the pending queue without claiming it. Entries past the
    // * depth cap and URLs already claimed are dropped here as a cheap
    // * pre-filter; try_claim stays the single authoritative dedup point.
    pub async fn enqueue(&self, entry: FrontierEntry) {
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }
        if entry.depth > self.max_depth {
            debug!(url = %entry.url, depth = entry.depth, "depth cap reached, dropping link");
            return;
        }
        {
            let visited = self.visited.lock().await;
            if visited.contains(&entry.url) {
                return;
            }
        }
        self.queue.lock().await.push_back(entry);
        self.wakeup.notify_waiters();
    }

    // * Atomic check-and-insert into the visited set. Returns true iff the
    // * caller won the race and owns the fetch for this URL. Claiming happens
    // * before the fetch, so two workers can never double-fetch a page.
    pub async fn try_claim(&self, url: &NormalizedUrl) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return false;
        }
        let mut visited = self.visited.lock().await;
        if visited.len() >= self.max_pages {
            if !self.page_cap_logged.swap(true, Ordering::SeqCst) {
                warn!(max_pages = self.max_pages, "page cap reached, refusing further claims");
            }
            return false;
        }
        visited.insert(url.clone())
    }

    // * Pops the next pending URL, waiting cooperatively when nothing is
    // * pending. Returns None only once the crawl has converged: the queue is
    // * empty AND no worker is in flight (an in-flight worker may still
    // * enqueue more links), or the run was cancelled.
    pub async fn next(&self) -> Option<FrontierEntry> {
        loop {
            // * Register for a wakeup before inspecting state, otherwise a
            // * notify between the check and the await would be lost.
            let wakeup = self.wakeup.notified();
            tokio::pin!(wakeup);
            wakeup.as_mut().enable();

            if self.cancelled.load(Ordering::SeqCst) {
                self.wakeup.notify_waiters();
                return None;
            }

            {
                let mut queue = self.queue.lock().await;
                if let Some(entry) = queue.pop_front() {
                    self.in_flight.fetch_add(1, Ordering::SeqCst);
                    return Some(entry);
                }
            }

            if self.in_flight.load(Ordering::SeqCst) == 0 {
                // * Converged. Wake everyone else so they observe it too.
                self.wakeup.notify_waiters();
                return None;
            }

            wakeup.await;
        }
    }

    // * Marks the entry returned by next() as fully processed. Must be called
    // * after any enqueues for that page, or convergence could be declared
    // * while links are still on the way.
    pub fn complete(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.wakeup.notify_waiters();
    }

    // * Stops handing out work. In-flight fetches drain; waiters return None.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.wakeup.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub async fn visited_count(&self) -> usize {
        self.visited.lock().await.len()
    }
}

// * Decides which discovered links may enter the frontier. A link is in
// * scope when it shares a host with the page that discovered it, or when
// * its origin is one of the original seeds. Everything else is dropped,
// * which bounds the crawl to the supplied domains.
pub struct ScopePolicy {
    seed_origins: HashSet<String>,
}

impl ScopePolicy {
    pub fn new(seeds: &[NormalizedUrl]) -> Self {
        Self {
            seed_origins: seeds.iter().map(|s| s.origin()).collect(),
        }
    }

    pub fn allows(&self, origin_page: &NormalizedUrl, link: &NormalizedUrl) -> bool {
        if link.host_str().is_some() && link.host_str() == origin_page.host_str() {
            return true;
        }
        self.seed_origins.contains(&link.origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalization::normalize_seed;
    use std::sync::Arc;
    use std::time::Duration;

    fn url(s: &str) -> NormalizedUrl {
        normalize_seed(s).unwrap()
    }

    fn entry(s: &str) -> FrontierEntry {
        let u = url(s);
        FrontierEntry {
            origin: u.clone(),
            url: u,
            depth: 0,
        }
    }

    #[tokio::test]
    async fn test_claim_is_exclusive() {
        let frontier = Frontier::new(100, 10);
        let page = url("https://shop.test/a");
        assert!(frontier.try_claim(&page).await);
        assert!(!frontier.try_claim(&page).await);
    }

    #[tokio::test]
    async fn test_concurrent_claims_have_one_winner() {
        let frontier = Arc::new(Frontier::new(100, 10));
        let page = url("https://shop.test/contested");

        let mut handles = Vec::new();
        for _ in 0..16 {
            let frontier = Arc::clone(&frontier);
            let page = page.clone();
            handles.push(tokio::spawn(
                async move { frontier.try_claim(&page).await },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_empty_frontier_converges_immediately() {
        let frontier = Frontier::new(100, 10);
        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_next_returns_pending_entry() {
        let frontier = Frontier::new(100, 10);
        frontier.enqueue(entry("https://shop.test/")).await;

        let got = frontier.next().await.expect("entry should be pending");
        assert_eq!(got.url.as_str(), "https://shop.test/");

        // * The entry is in flight; completing it converges the frontier.
        frontier.complete();
        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_waiter_wakes_on_enqueue_from_in_flight_worker() {
        let frontier = Arc::new(Frontier::new(100, 10));
        frontier.enqueue(entry("https://shop.test/")).await;

        let first = frontier.next().await.unwrap();
        assert!(frontier.try_claim(&first.url).await);

        // * A second worker blocks: queue empty but one entry is in flight.
        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.next().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.enqueue(entry("https://shop.test/next")).await;
        frontier.complete();

        let woken = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert_eq!(woken.unwrap().url.as_str(), "https://shop.test/next");
    }

    #[tokio::test]
    async fn test_all_waiters_released_on_convergence() {
        let frontier = Arc::new(Frontier::new(100, 10));
        frontier.enqueue(entry("https://shop.test/")).await;
        let _busy = frontier.next().await.unwrap();

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let frontier = Arc::clone(&frontier);
            waiters.push(tokio::spawn(async move { frontier.next().await }));
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.complete();

        for waiter in waiters {
            let got = tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("no deadlock on convergence")
                .unwrap();
            assert!(got.is_none());
        }
    }

    #[tokio::test]
    async fn test_page_cap_blocks_claims() {
        let frontier = Frontier::new(2, 10);
        assert!(frontier.try_claim(&url("https://shop.test/1")).await);
        assert!(frontier.try_claim(&url("https://shop.test/2")).await);
        assert!(!frontier.try_claim(&url("https://shop.test/3")).await);
        assert_eq!(frontier.visited_count().await, 2);
    }

    #[tokio::test]
    async fn test_depth_cap_drops_enqueue() {
        let frontier = Frontier::new(100, 1);
        let mut deep = entry("https://shop.test/deep");
        deep.depth = 2;
        frontier.enqueue(deep).await;
        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_releases_waiters_and_refuses_claims() {
        let frontier = Arc::new(Frontier::new(100, 10));
        frontier.enqueue(entry("https://shop.test/")).await;
        let _busy = frontier.next().await.unwrap();

        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.next().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.cancel();

        let got = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancel must release waiters")
            .unwrap();
        assert!(got.is_none());
        assert!(!frontier.try_claim(&url("https://shop.test/late")).await);
    }

    #[tokio::test]
    async fn test_scope_policy() {
        let seeds = vec![url("https://shop.test/"), url("https://store.test/")];
        let scope = ScopePolicy::new(&seeds);

        let page = url("https://shop.test/category");
        // * Same host as the discovering page
        assert!(scope.allows(&page, &url("https://shop.test/about")));
        // * Different host, but an original seed origin
        assert!(scope.allows(&page, &url("https://store.test/deals")));
        // * Cross-domain and not a seed
        assert!(!scope.allows(&page, &url("https://elsewhere.test/x")));
    }
}
