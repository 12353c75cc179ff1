//! The guided policy: claims shrink as the loop drains.
//!
//! Each claim takes an `nthreads`-th of whatever remains, floored at the
//! configured chunk size. Early claims are large and amortize the cursor
//! contention; late claims are small and smooth out the tail. Every
//! successful claim strictly advances the cursor, so the loop converges.

use std::sync::atomic::Ordering;

use crate::range::ceil_div;
use crate::workshare::WorkShare;

impl WorkShare {
    /// Claim roughly `remaining / nthreads` iterations, never fewer than the
    /// chunk floor.
    #[cfg(feature = "atomics")]
    pub fn guided_next(&self) -> Option<(i64, i64)> {
        let mut start = self.next.load(Ordering::SeqCst);
        loop {
            if start == self.end {
                return None;
            }
            let nend = self.guided_claim_end(start);
            match self
                .next
                .compare_exchange(start, nend, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Some((start, nend)),
                Err(observed) => start = observed,
            }
        }
    }

    /// Like [`guided_next`](Self::guided_next), but claims under the share's
    /// lock instead of racing on the cursor.
    pub fn guided_next_locked(&self) -> Option<(i64, i64)> {
        let _held = self.lock.lock();
        let start = self.next.load(Ordering::Relaxed);
        if start == self.end {
            return None;
        }
        let nend = self.guided_claim_end(start);
        self.next.store(nend, Ordering::Relaxed);
        Some((start, nend))
    }

    /// Where a guided claim starting at `start` ends: an `nthreads`-th of
    /// what remains, floored at `chunk_size` and capped at the remainder.
    fn guided_claim_end(&self, start: i64) -> i64 {
        // exact: the bound is aligned and the cursor moves in whole steps
        let n = (self.end - start) / self.incr;
        let mut q = ceil_div(n, self.nthreads as i64);
        if q < self.chunk_size {
            q = self.chunk_size;
        }
        if q <= n {
            start + q * self.incr
        } else {
            self.end
        }
    }
}
