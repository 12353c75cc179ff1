//! The static policy: closed-form partitioning.
//!
//! Every worker computes its ranges from the immutable loop bounds and its
//! own team index, so claims are wait-free and two workers never contend.
//! The price is that the split is fixed before the first iteration runs.

use crate::range::{ceil_div, trip_count};
use crate::worker::Worker;
use crate::workshare::WorkShare;

/// Outcome of one static claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticNext {
    /// A range was produced and more may follow for this worker.
    More(i64, i64),
    /// A range was produced and it is the team-wide final one.
    Last(i64, i64),
    /// No range was produced; this worker's share is exhausted.
    Done,
}

impl WorkShare {
    /// Claim this worker's next statically assigned range.
    ///
    /// With a chunk hint of 0 each worker receives a single even block of the
    /// loop. With a positive hint, chunks rotate across the team round-robin,
    /// one per distribution round.
    pub fn static_next(&self, worker: &mut Worker) -> StaticNext {
        debug_assert!(worker.team_id() < self.nthreads);

        if worker.static_trip == -1 {
            return StaticNext::Done;
        }

        // degenerate team: the sole worker owns the whole loop
        if self.nthreads == 1 {
            worker.static_trip = -1;
            if self.start == self.end {
                return StaticNext::Done;
            }
            return StaticNext::Last(self.start, self.end);
        }

        let n = trip_count(self.start, self.end, self.incr);
        let i = worker.team_id() as i64;

        if self.chunk_size == 0 {
            // one even block per worker, zero-based [q*i, q*(i+1)) clamped
            let q = ceil_div(n, self.nthreads as i64);
            let s0 = (q * i).min(n);
            let e0 = (q * (i + 1)).min(n);

            worker.static_trip = -1;
            if s0 >= e0 {
                return StaticNext::Done;
            }

            let s = self.start + s0 * self.incr;
            let e = self.start + e0 * self.incr;
            if e0 == n {
                StaticNext::Last(s, e)
            } else {
                StaticNext::More(s, e)
            }
        } else {
            // on round t, worker i owns zero-based
            // [(t*nthreads + i)*c, (t*nthreads + i + 1)*c) clamped
            let c = self.chunk_size;
            let s0 = (worker.static_trip * self.nthreads as i64 + i) * c;
            if s0 >= n {
                worker.static_trip = -1;
                return StaticNext::Done;
            }
            let e0 = (s0 + c).min(n);

            let s = self.start + s0 * self.incr;
            let e = self.start + e0 * self.incr;
            if e0 == n {
                worker.static_trip = -1;
                StaticNext::Last(s, e)
            } else {
                worker.static_trip += 1;
                StaticNext::More(s, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workshare::Policy;

    /// Drain one worker's share, reporting its ranges and whether it saw the
    /// team-wide final range.
    fn collect(ws: &WorkShare, team_id: usize) -> (Vec<(i64, i64)>, bool) {
        let mut worker = Worker::new(team_id);
        let mut ranges = Vec::new();
        let mut saw_last = false;
        loop {
            match ws.static_next(&mut worker) {
                StaticNext::More(s, e) => ranges.push((s, e)),
                StaticNext::Last(s, e) => {
                    ranges.push((s, e));
                    saw_last = true;
                }
                StaticNext::Done => break,
            }
        }
        (ranges, saw_last)
    }

    #[test]
    fn test_even_blocks() {
        let ws = WorkShare::new(Policy::Static, 4, 0, 10, 1, 0);
        assert_eq!(collect(&ws, 0), (vec![(0, 3)], false));
        assert_eq!(collect(&ws, 1), (vec![(3, 6)], false));
        assert_eq!(collect(&ws, 2), (vec![(6, 9)], false));
        assert_eq!(collect(&ws, 3), (vec![(9, 10)], true));
    }

    #[test]
    fn test_round_robin_chunks() {
        let ws = WorkShare::new(Policy::Static, 3, 0, 13, 1, 2);
        assert_eq!(collect(&ws, 0), (vec![(0, 2), (6, 8), (12, 13)], true));
        assert_eq!(collect(&ws, 1), (vec![(2, 4), (8, 10)], false));
        assert_eq!(collect(&ws, 2), (vec![(4, 6), (10, 12)], false));
    }

    #[test]
    fn test_descending_blocks() {
        // ten iterations 9, 8, ..., 0 split across two workers
        let ws = WorkShare::new(Policy::Static, 2, 9, -1, -1, 0);
        assert_eq!(collect(&ws, 0), (vec![(9, 4)], false));
        assert_eq!(collect(&ws, 1), (vec![(4, -1)], true));
    }

    #[test]
    fn test_descending_chunks() {
        let ws = WorkShare::new(Policy::Static, 2, 10, 0, -2, 2);
        assert_eq!(collect(&ws, 0), (vec![(10, 6), (2, 0)], true));
        assert_eq!(collect(&ws, 1), (vec![(6, 2)], false));
    }

    #[test]
    fn test_single_worker_team() {
        // the bound is aligned up to a whole step
        let ws = WorkShare::new(Policy::Static, 1, 0, 10, 3, 0);
        assert_eq!(collect(&ws, 0), (vec![(0, 12)], true));
    }

    #[test]
    fn test_empty_loop() {
        let ws = WorkShare::new(Policy::Static, 4, 5, 5, 1, 0);
        for team_id in 0..4 {
            assert_eq!(collect(&ws, team_id), (vec![], false));
        }

        // bounds inverted against the step also run zero times
        let ws = WorkShare::new(Policy::Static, 4, 10, 0, 1, 2);
        assert_eq!(collect(&ws, 0), (vec![], false));
    }

    #[test]
    fn test_terminal_is_sticky() {
        let ws = WorkShare::new(Policy::Static, 2, 0, 4, 1, 0);
        let mut worker = Worker::new(0);
        assert_eq!(ws.static_next(&mut worker), StaticNext::More(0, 2));
        assert_eq!(ws.static_next(&mut worker), StaticNext::Done);
        assert_eq!(ws.static_next(&mut worker), StaticNext::Done);
    }

    #[test]
    fn test_more_workers_than_iterations() {
        let ws = WorkShare::new(Policy::Static, 8, 0, 3, 1, 0);
        assert_eq!(collect(&ws, 0), (vec![(0, 1)], false));
        assert_eq!(collect(&ws, 2), (vec![(2, 3)], true));
        assert_eq!(collect(&ws, 5), (vec![], false));
    }
}
