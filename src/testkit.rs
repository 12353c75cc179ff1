//! Test helpers: drive a team of workers on real threads and check what came
//! back against the loop's iteration space.

use crate::worker::Worker;
use crate::workshare::WorkShare;

/// Every iteration of `for (i = start; i != end; i += incr)`, in order.
pub(crate) fn expected_iterations(start: i64, end: i64, incr: i64) -> Vec<i64> {
    let mut out = Vec::new();
    let mut i = start;
    while if incr > 0 { i < end } else { i > end } {
        out.push(i);
        i += incr;
    }
    out
}

/// Flatten claimed ranges into iteration values, checking along the way that
/// each range is a whole number of steps in the right direction.
pub(crate) fn iterations_of(ranges: &[(i64, i64)], incr: i64) -> Vec<i64> {
    let mut out = Vec::new();
    for &(s, e) in ranges {
        assert_eq!((e - s) % incr, 0, "range [{s}, {e}) is not whole steps of {incr}");
        assert!((e - s) / incr >= 0, "range [{s}, {e}) runs against step {incr}");
        let mut i = s;
        while i != e {
            out.push(i);
            i += incr;
        }
    }
    out
}

/// Run one worker per team slot on its own thread, each claiming through `f`
/// until it reports done. Returns each worker's claimed ranges.
pub(crate) fn drain_with<F>(nthreads: usize, f: F) -> Vec<Vec<(i64, i64)>>
where
    F: Fn(&mut Worker) -> Option<(i64, i64)> + Sync,
{
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..nthreads)
            .map(|team_id| {
                let f = &f;
                s.spawn(move || {
                    let mut worker = Worker::new(team_id);
                    let mut ranges = Vec::new();
                    while let Some(range) = f(&mut worker) {
                        ranges.push(range);
                    }
                    ranges
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

pub(crate) fn drain(ws: &WorkShare, nthreads: usize) -> Vec<Vec<(i64, i64)>> {
    drain_with(nthreads, |worker| ws.next(worker))
}

/// Drain `ws` with a full team and assert the universal properties: exact
/// coverage of the iteration space, no duplicates, well-formed ranges, and
/// (outside of stealing) per-worker monotone progress.
pub(crate) fn check_coverage(ws: &WorkShare, nthreads: usize) {
    check_ranges(ws, drain(ws, nthreads));
}

pub(crate) fn check_coverage_with<F>(ws: &WorkShare, nthreads: usize, f: F)
where
    F: Fn(&mut Worker) -> Option<(i64, i64)> + Sync,
{
    check_ranges(ws, drain_with(nthreads, f));
}

fn check_ranges(ws: &WorkShare, per_worker: Vec<Vec<(i64, i64)>>) {
    // a thief's claims can jump backward to wherever its victim was, so only
    // the cursor-based policies promise per-worker monotone starts
    #[cfg(feature = "adaptive")]
    let monotone = ws.policy != crate::workshare::Policy::Adaptive;
    #[cfg(not(feature = "adaptive"))]
    let monotone = true;

    let mut all = Vec::new();
    for ranges in &per_worker {
        all.extend(iterations_of(ranges, ws.incr));
        if monotone {
            for pair in ranges.windows(2) {
                let (a, b) = (pair[0].0, pair[1].0);
                if ws.incr > 0 {
                    assert!(a < b, "claims went backward: {a} then {b}");
                } else {
                    assert!(a > b, "claims went backward: {a} then {b}");
                }
            }
        }
    }

    all.sort_unstable();
    let mut want = expected_iterations(ws.start, ws.end, ws.incr);
    want.sort_unstable();
    assert_eq!(all, want, "claimed iterations differ from the loop space");
}
