//! The shared work-share descriptor.

use std::sync::atomic::AtomicI64;

use crossbeam::utils::CachePadded;
use parking_lot::Mutex;

#[cfg(feature = "adaptive")]
use crate::adaptive_sched::AdaptiveChunk;
#[cfg(feature = "numa")]
use crate::numa::NumaTopology;
use crate::range::trip_count;
use crate::static_sched::StaticNext;
use crate::worker::Worker;

/// Which policy hands out iterations for a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Closed-form partitioning; no shared writes while the loop runs.
    Static,
    /// A shared cursor advanced by a fixed chunk per claim.
    Dynamic,
    /// A shared cursor advanced by an exponentially shrinking claim.
    Guided,
    /// Per-worker deques with random-victim stealing.
    #[cfg(feature = "adaptive")]
    Adaptive,
}

/// Shared descriptor of one parallel loop.
///
/// A `WorkShare` is created when a team enters a loop, published to all team
/// members, drained by [`next`](Self::next) calls, and dropped after the team
/// barrier that follows the loop. Everything other than the claim cursors is
/// immutable once published, which is what lets the claim paths read the
/// bounds without synchronization.
pub struct WorkShare {
    pub(crate) policy: Policy,
    pub(crate) nthreads: usize,
    /// Original loop lower bound.
    pub(crate) start: i64,
    /// Upper bound, aligned to a whole number of steps past `start` so that
    /// `start == end` exactly when no iterations remain.
    pub(crate) end: i64,
    /// Signed step. Nonzero; its sign fixes the loop direction.
    pub(crate) incr: i64,
    /// Chunk hint. 0 means "one even block per worker" and is only
    /// meaningful for [`Policy::Static`].
    pub(crate) chunk_size: i64,
    /// `chunk_size * incr`, the signed cursor advance of one dynamic claim.
    pub(crate) chunk_incr: i64,
    /// Whether dynamic claims may use a bare fetch-add; see
    /// [`fetch_add_safe`].
    #[cfg(feature = "atomics")]
    pub(crate) mode: bool,
    /// The next iteration not yet handed out (dynamic and guided).
    pub(crate) next: CachePadded<AtomicI64>,
    /// Serializes claims when the lock-free paths are unavailable.
    pub(crate) lock: Mutex<()>,
    /// One deque of remaining iterations per worker (adaptive).
    #[cfg(feature = "adaptive")]
    pub(crate) chunks: Vec<CachePadded<AdaptiveChunk>>,
    /// Iterations no worker has claimed yet; the adaptive termination
    /// counter.
    #[cfg(feature = "adaptive")]
    pub(crate) iterations_left: AtomicI64,
    #[cfg(feature = "numa")]
    pub(crate) topology: Option<NumaTopology>,
}

impl WorkShare {
    /// Describe the loop `for (i = start; i != end; i += incr)` for a team of
    /// `nthreads` workers.
    ///
    /// `incr` must be nonzero. `chunk_size` must be positive for the dynamic,
    /// guided and adaptive policies; for the static policy a chunk of 0
    /// requests one even block per worker. Bounds inverted with respect to
    /// the step direction describe a loop with zero iterations.
    pub fn new(
        policy: Policy,
        nthreads: usize,
        start: i64,
        end: i64,
        incr: i64,
        chunk_size: i64,
    ) -> Self {
        assert!(nthreads >= 1, "a team has at least one worker");
        assert_ne!(incr, 0, "the loop step must be nonzero");
        match policy {
            Policy::Static => assert!(chunk_size >= 0, "negative chunk size"),
            _ => assert!(
                chunk_size >= 1,
                "this policy hands out at least one iteration per claim"
            ),
        }

        let n = trip_count(start, end, incr);
        // align the bound so every range is a whole number of steps and an
        // empty loop is exactly `start == end`
        let end = start + n * incr;
        let chunk_incr = chunk_size
            .checked_mul(incr)
            .expect("chunk size overflows when scaled by the step");

        log::debug!(
            "new {policy:?} work share: [{start}, {end}) step {incr}, \
             {n} iterations, {nthreads} workers, chunk {chunk_size}"
        );

        Self {
            policy,
            nthreads,
            start,
            end,
            incr,
            chunk_size,
            chunk_incr,
            #[cfg(feature = "atomics")]
            mode: fetch_add_safe(end, incr, chunk_incr, nthreads),
            next: CachePadded::new(AtomicI64::new(start)),
            lock: Mutex::new(()),
            #[cfg(feature = "adaptive")]
            chunks: match policy {
                Policy::Adaptive => (0..nthreads)
                    .map(|_| CachePadded::new(AdaptiveChunk::new()))
                    .collect(),
                _ => Vec::new(),
            },
            #[cfg(feature = "adaptive")]
            iterations_left: AtomicI64::new(n),
            #[cfg(feature = "numa")]
            topology: None,
        }
    }

    /// Attach the team's NUMA placement so stealing prefers nearby victims.
    #[cfg(feature = "numa")]
    pub fn with_topology(mut self, topology: NumaTopology) -> Self {
        assert_eq!(
            topology.team_size(),
            self.nthreads,
            "the topology must cover the whole team"
        );
        self.topology = Some(topology);
        self
    }

    /// The number of workers in the team this loop was published to.
    pub fn nthreads(&self) -> usize {
        self.nthreads
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Hand the calling worker its next range under this share's policy.
    /// `None` means the worker is finished with this loop.
    pub fn next(&self, worker: &mut Worker) -> Option<(i64, i64)> {
        match self.policy {
            Policy::Static => match self.static_next(worker) {
                StaticNext::More(s, e) | StaticNext::Last(s, e) => Some((s, e)),
                StaticNext::Done => None,
            },
            #[cfg(feature = "atomics")]
            Policy::Dynamic => self.dynamic_next(),
            #[cfg(not(feature = "atomics"))]
            Policy::Dynamic => self.dynamic_next_locked(),
            #[cfg(feature = "atomics")]
            Policy::Guided => self.guided_next(),
            #[cfg(not(feature = "atomics"))]
            Policy::Guided => self.guided_next_locked(),
            #[cfg(feature = "adaptive")]
            Policy::Adaptive => self.adaptive_next(worker),
        }
    }
}

/// Whether dynamic claims may use a bare fetch-add. Losers of the claim race
/// still advance the cursor, so it can overshoot `end` by up to one claim per
/// worker; the fast path is only usable when that overshoot cannot wrap. A
/// half-word screen rejects huge teams and huge chunks before the bound test.
#[cfg(feature = "atomics")]
fn fetch_add_safe(end: i64, incr: i64, chunk_incr: i64, nthreads: usize) -> bool {
    const HALF_WORD: i64 = 1 << (i64::BITS / 2 - 1);
    let nthreads = nthreads as i64;

    if incr > 0 {
        if (nthreads | chunk_incr) >= HALF_WORD {
            return false;
        }
        end < i64::MAX - (nthreads + 1) * chunk_incr
    } else {
        if nthreads >= HALF_WORD || chunk_incr <= -HALF_WORD {
            return false;
        }
        end > (nthreads + 1) * -chunk_incr + i64::MIN
    }
}
