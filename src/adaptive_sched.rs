//! The adaptive policy: per-worker deques with random-victim stealing.
//!
//! Each worker starts with an even share of the iteration space and drains it
//! from the front of a private deque; workers that run dry steal the back
//! half of a random victim's deque. Deques hold zero-based iteration indices
//! and are a pair of bounds, not a buffer: `begin` belongs to the owner,
//! `end` to thieves.
//!
//! Neither side locks on its fast path. The owner publishes a speculative
//! front advance, fences, and validates against the back bound; a thief
//! publishes a speculative back retreat, fences, and validates against the
//! front. The fences make it impossible for both sides of a crossing race to
//! read the other's stale bound, so at least one of them observes
//! `begin > end`, retracts, and resolves the collision under the deque's
//! lock. Per-iteration cost only matters to the caller; from here the loop is
//! finished when every claimed iteration has been folded back into the
//! share-wide countdown.

use std::sync::atomic::{fence, AtomicBool, AtomicI64, Ordering};

use parking_lot::Mutex;

use crate::range::{ceil_div, trip_count};
use crate::worker::Worker;
use crate::workshare::WorkShare;

/// One worker's deque of remaining iterations, as zero-based bounds. The
/// owner takes from `begin`; thieves take from `end`.
pub(crate) struct AdaptiveChunk {
    /// Front bound. Written only by the owning worker.
    begin: AtomicI64,
    /// Back bound. Only mutated with `lock` held.
    end: AtomicI64,
    /// Serializes back-bound resizing and the owner's collision slow path.
    lock: Mutex<()>,
    /// Iterations the owner has claimed since it last reconciled with the
    /// share-wide countdown. Only the owner touches it.
    nb_exec: AtomicI64,
    /// Whether the owner has installed its initial share yet.
    is_init: AtomicBool,
}

impl AdaptiveChunk {
    pub(crate) fn new() -> Self {
        Self {
            begin: AtomicI64::new(0),
            end: AtomicI64::new(0),
            lock: Mutex::new(()),
            nb_exec: AtomicI64::new(0),
            is_init: AtomicBool::new(false),
        }
    }

    /// Owner-side claim of up to `chunk` iterations from the front.
    fn pop_front(&self, chunk: i64) -> Option<(i64, i64)> {
        let begin = self.begin.load(Ordering::Relaxed);
        let target = begin + chunk;

        // speculate: publish the advanced front, then look at the back
        self.begin.store(target, Ordering::Relaxed);
        fence(Ordering::SeqCst);
        if target <= self.end.load(Ordering::Relaxed) {
            return Some((begin, target));
        }

        // either a thief moved the back bound under us or only scraps remain;
        // retract and settle under the lock, where the back bound is stable
        self.begin.store(begin, Ordering::Relaxed);
        let _held = self.lock.lock();
        let size = self.end.load(Ordering::Relaxed) - begin;
        if size <= 0 {
            return None;
        }
        let take = size.min(chunk);
        self.begin.store(begin + take, Ordering::Relaxed);
        Some((begin, begin + take))
    }
}

impl WorkShare {
    /// Claim a range under the adaptive policy.
    ///
    /// Drains the calling worker's own deque first; once that runs dry, the
    /// worker reconciles its claim count with the share-wide countdown and
    /// turns thief until either a steal lands or the countdown reaches zero.
    pub fn adaptive_next(&self, worker: &mut Worker) -> Option<(i64, i64)> {
        let me = worker.team_id();
        let mine = &self.chunks[me];

        if !mine.is_init.load(Ordering::Relaxed) {
            self.install_initial_share(me);
        }

        loop {
            if let Some((s0, e0)) = mine.pop_front(self.chunk_size) {
                mine.nb_exec.fetch_add(e0 - s0, Ordering::Relaxed);
                return Some(self.range_of(s0, e0));
            }

            // our deque is dry: fold what we've claimed into the countdown
            // before going hunting
            let claimed = mine.nb_exec.swap(0, Ordering::Relaxed);
            if claimed != 0 {
                self.iterations_left.fetch_sub(claimed, Ordering::SeqCst);
            }
            if self.iterations_left.load(Ordering::SeqCst) == 0 {
                return None;
            }

            if let Some((s0, e0)) = self.steal(worker) {
                mine.nb_exec.fetch_add(e0 - s0, Ordering::Relaxed);
                return Some(self.range_of(s0, e0));
            }

            // somebody still holds unclaimed iterations; wait for a chance
            // to steal them
            std::hint::spin_loop();
            std::thread::yield_now();
        }
    }

    /// Install this worker's even share of the loop. Runs once per worker, on
    /// its first claim.
    fn install_initial_share(&self, team_id: usize) {
        let n = trip_count(self.start, self.end, self.incr);
        let q = ceil_div(n, self.nthreads as i64);
        let begin = (q * team_id as i64).min(n);
        let end = (q * (team_id as i64 + 1)).min(n);

        let chunk = &self.chunks[team_id];
        chunk.begin.store(begin, Ordering::Relaxed);
        chunk.end.store(end, Ordering::Relaxed);
        // thieves check the flag before looking at the bounds
        chunk.is_init.store(true, Ordering::Release);
    }

    /// Map a zero-based index range back into loop space.
    fn range_of(&self, s0: i64, e0: i64) -> (i64, i64) {
        (self.start + s0 * self.incr, self.start + e0 * self.incr)
    }

    /// One round of victim selection. Returns a claimed range on success.
    fn steal(&self, worker: &mut Worker) -> Option<(i64, i64)> {
        if self.nthreads < 2 {
            return None;
        }

        #[cfg(feature = "numa")]
        if let Some(topology) = &self.topology {
            let me = worker.team_id();
            let node = topology.node_of(me);
            let peers = topology.node_members(node);

            if peers.len() > 1 {
                // a few tries close to home before looking across the machine
                let my_index = topology.index_in_node(me);
                for _ in 0..(1 + peers.len() / 2) {
                    // a draw over the node's members, excluding ourselves
                    let mut pick = worker.rng.below(peers.len() as u32 - 1) as usize;
                    if pick >= my_index {
                        pick += 1;
                    }
                    if let Some(claim) = self.steal_half(peers[pick], me) {
                        return Some(claim);
                    }
                }
            }

            #[cfg(feature = "numa-strict")]
            return None;
        }

        self.steal_anywhere(worker)
    }

    /// Steal from one uniformly drawn victim anywhere in the team.
    fn steal_anywhere(&self, worker: &mut Worker) -> Option<(i64, i64)> {
        let me = worker.team_id();
        let victim = loop {
            let draw = worker.rng.below(self.nthreads as u32) as usize;
            if draw != me {
                break draw;
            }
        };
        self.steal_half(victim, me)
    }

    /// Take the back half of `victim`'s deque. The front of the stolen region
    /// is returned as the thief's claim; the rest is banked in the thief's
    /// own (empty) deque.
    fn steal_half(&self, victim: usize, thief: usize) -> Option<(i64, i64)> {
        let chunk = &self.chunks[victim];

        if !chunk.is_init.load(Ordering::Acquire) {
            return None;
        }
        // racy pre-screen so empty victims cost no lock
        if chunk.end.load(Ordering::Relaxed) <= chunk.begin.load(Ordering::Relaxed) {
            return None;
        }

        let (stolen_begin, stolen_end) = {
            let _held = chunk.lock.lock();

            let end = chunk.end.load(Ordering::Relaxed);
            let size = (end - chunk.begin.load(Ordering::Relaxed)) / 2;
            if size <= 0 {
                return None;
            }

            // speculate: publish the retreated back, then look at the front
            let cut = end - size;
            chunk.end.store(cut, Ordering::Relaxed);
            fence(Ordering::SeqCst);
            if cut < chunk.begin.load(Ordering::Relaxed) {
                // the owner advanced past our cut; give the region back
                chunk.end.store(end, Ordering::Relaxed);
                return None;
            }
            (cut, end)
        };

        log::trace!("worker {thief} stole [{stolen_begin}, {stolen_end}) from worker {victim}");

        // keep one claim's worth; bank the rest for later local pops
        let take = (stolen_end - stolen_begin).min(self.chunk_size);
        let mine = &self.chunks[thief];
        {
            let _held = mine.lock.lock();
            mine.begin.store(stolen_begin + take, Ordering::Relaxed);
            mine.end.store(stolen_end, Ordering::Relaxed);
        }

        Some((stolen_begin, stolen_begin + take))
    }
}
