// src/crawl/limiter.rs
// =============================================================================
// Bounds how many fetches are in flight at once.
//
// A thin wrapper around tokio's Semaphore that also keeps two gauges: how
// many slots are held right now, and the highest that number ever got.
// The peak ends up in the crawl stats, which is how tests check that the
// bound was never exceeded.
//
// A slot is an RAII guard. Dropping it (on success, error, or panic)
// returns the permit, so every acquire is released exactly once.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

#[derive(Debug)]
pub struct Limiter {
    permits: Semaphore,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

pub struct Slot<'a> {
    limiter: &'a Limiter,
    _permit: SemaphorePermit<'a>,
}

impl Limiter {
    pub fn new(max_concurrency: usize) -> Self {
        Limiter {
            permits: Semaphore::new(max_concurrency),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    // Waits for a free slot
    //
    // Returns None once the limiter has been closed, which is how a cancelled
    // crawl wakes every task still waiting here.
    pub async fn acquire(&self) -> Option<Slot<'_>> {
        let permit = self.permits.acquire().await.ok()?;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Some(Slot {
            limiter: self,
            _permit: permit,
        })
    }

    pub fn close(&self) {
        self.permits.close();
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        self.limiter.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
