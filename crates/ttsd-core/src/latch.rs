//! One-shot readiness latch.
//!
//! The latch starts unset and can be set exactly once. There is no way to
//! reset it: once readers observe `true` they observe `true` for the rest of
//! the process lifetime. The asset poller is the single writer; every
//! generation and health request is a reader.

use std::sync::atomic::{AtomicBool, Ordering};

/// Monotonic false→true flag shared between the asset poller and request handlers.
#[derive(Debug, Default)]
pub struct AtomicLatch {
    set: AtomicBool,
}

impl AtomicLatch {
    /// Create an unset latch.
    pub const fn new() -> Self {
        Self {
            set: AtomicBool::new(false),
        }
    }

    /// Set the latch.
    ///
    /// Idempotent. Returns `true` only for the call that performed the
    /// transition, so callers can log the moment of readiness once.
    pub fn set(&self) -> bool {
        self.set
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether the latch has been set.
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_unset() {
        assert!(!AtomicLatch::new().is_set());
    }

    #[test]
    fn set_reports_transition_once() {
        let latch = AtomicLatch::new();
        assert!(latch.set());
        assert!(!latch.set());
        assert!(latch.is_set());
    }

    #[test]
    fn never_observed_unset_after_set_under_concurrent_readers() {
        let latch = Arc::new(AtomicLatch::new());
        let stop = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let latch = Arc::clone(&latch);
                let stop = Arc::clone(&stop);
                std::thread::spawn(move || {
                    let mut seen_set = false;
                    while !stop.load(Ordering::Acquire) {
                        let now = latch.is_set();
                        assert!(!(seen_set && !now), "latch reverted to unset");
                        seen_set |= now;
                    }
                    seen_set || latch.is_set()
                })
            })
            .collect();

        std::thread::sleep(std::time::Duration::from_millis(10));
        latch.set();
        std::thread::sleep(std::time::Duration::from_millis(10));
        stop.store(true, Ordering::Release);

        for reader in readers {
            assert!(reader.join().unwrap());
        }
    }
}
