//! Cache-busting stamps for image URLs.
//!
//! Browsers and proxies cache image bytes by URL, but rotate and re-crop
//! rewrite the same path on the backend. Appending a fresh `random=` stamp
//! forces a refetch.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Produces strictly increasing millisecond stamps.
///
/// Stamps track wall-clock milliseconds; when two calls land in the same
/// millisecond (or the clock steps back) the previous stamp plus one is used.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicU64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp.
    pub fn next(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let mut prev = self.last.load(Ordering::Relaxed);

        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_stamps_strictly_increase() {
        let buster = CacheBuster::new();
        let mut prev = buster.next();
        for _ in 0..1000 {
            let next = buster.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_stamps_track_wall_clock() {
        let before = Utc::now().timestamp_millis() as u64;
        let stamp = CacheBuster::new().next();
        assert!(stamp >= before);
    }

    #[test]
    fn test_stamps_unique_across_threads() {
        let buster = Arc::new(CacheBuster::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let buster = Arc::clone(&buster);
                std::thread::spawn(move || (0..250).map(|_| buster.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for stamp in handle.join().unwrap() {
                assert!(seen.insert(stamp), "duplicate stamp {}", stamp);
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
