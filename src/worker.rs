//! Per-worker scheduling state.

/// One team member's private view of the scheduling state.
///
/// The work-share descriptor is shared by the whole team; everything a worker
/// mutates without synchronization lives here. A `Worker` is keyed by the
/// team index it was created with and must only be used with shares published
/// to that team.
pub struct Worker {
    team_id: usize,
    /// Distribution round counter for the static policy; -1 once this
    /// worker's share is exhausted.
    pub(crate) static_trip: i64,
    /// Private generator for victim selection. Each worker draws from its own
    /// state so picking a victim never touches shared memory.
    #[cfg(feature = "adaptive")]
    pub(crate) rng: Lcg,
}

impl Worker {
    /// A new worker with the given team index (`0..nthreads`).
    pub fn new(team_id: usize) -> Self {
        Self {
            team_id,
            static_trip: 0,
            #[cfg(feature = "adaptive")]
            rng: Lcg::new(team_id as u32),
        }
    }

    /// The index this worker holds within its team.
    pub fn team_id(&self) -> usize {
        self.team_id
    }

    /// Rearm the worker for the next loop. Call between loops, after the team
    /// barrier that retires the previous work share. The generator state is
    /// kept; only the static round counter is reset.
    pub fn reset(&mut self) {
        self.static_trip = 0;
    }
}

/// A 32-bit linear congruential generator (glibc constants). Cheap enough to
/// sit on the steal path, and deterministic per worker.
#[cfg(feature = "adaptive")]
pub(crate) struct Lcg(u32);

#[cfg(feature = "adaptive")]
impl Lcg {
    pub(crate) fn new(seed: u32) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1103515245).wrapping_add(12345);
        self.0
    }

    /// A draw in `0..n`. Uses the high half of the state word; the low bits
    /// of an LCG cycle with short periods.
    pub(crate) fn below(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0);
        (self.next() >> 16) % n
    }
}
