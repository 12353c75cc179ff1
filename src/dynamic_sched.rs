//! The dynamic policy: a shared cursor advanced a fixed amount per claim.
//!
//! Workers race on a single cursor; whoever advances it owns the iterations
//! it moved over. Load balances itself first-come-first-served at the cost of
//! one atomic op per claim.

use std::sync::atomic::Ordering;

#[cfg(feature = "atomics")]
use crate::range::past_end;
use crate::workshare::WorkShare;

impl WorkShare {
    /// Claim up to `chunk_size` iterations from the shared cursor.
    #[cfg(feature = "atomics")]
    pub fn dynamic_next(&self) -> Option<(i64, i64)> {
        if self.mode {
            // the cursor may overshoot the bound, but the init-time screen
            // guarantees it cannot wrap; losers observe an exhausted cursor
            let start = self.next.fetch_add(self.chunk_incr, Ordering::SeqCst);
            if past_end(start, self.end, self.incr) {
                return None;
            }
            let mut nend = start + self.chunk_incr;
            if self.incr > 0 {
                if nend > self.end {
                    nend = self.end;
                }
            } else if nend < self.end {
                nend = self.end;
            }
            return Some((start, nend));
        }

        let mut start = self.next.load(Ordering::SeqCst);
        loop {
            if start == self.end {
                return None;
            }
            let nend = start + self.claim_toward_end(start);
            match self
                .next
                .compare_exchange(start, nend, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Some((start, nend)),
                Err(observed) => start = observed,
            }
        }
    }

    /// Like [`dynamic_next`](Self::dynamic_next), but claims under the
    /// share's lock instead of racing on the cursor.
    pub fn dynamic_next_locked(&self) -> Option<(i64, i64)> {
        let _held = self.lock.lock();
        let start = self.next.load(Ordering::Relaxed);
        if start == self.end {
            return None;
        }
        let nend = start + self.claim_toward_end(start);
        self.next.store(nend, Ordering::Relaxed);
        Some((start, nend))
    }

    /// One claim's signed cursor advance from `start`, clamped to the
    /// remaining distance.
    fn claim_toward_end(&self, start: i64) -> i64 {
        let left = self.end - start;
        let mut advance = self.chunk_incr;
        if self.incr > 0 {
            if advance > left {
                advance = left;
            }
        } else if advance < left {
            advance = left;
        }
        advance
    }
}
