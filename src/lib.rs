//! Loop iteration scheduling for shared-memory worker teams.
//!
//! When a team of threads executes a counted loop together, something has to
//! decide which thread runs which iterations. This crate is that something: a
//! [`WorkShare`] describes one parallel loop `for (i = start; i != end;
//! i += incr)`, and each team member repeatedly asks it for the next subrange
//! `[pstart, pend)` to run until the share is drained. The loop body itself,
//! thread creation, and the barrier that retires the loop belong to the
//! caller; this crate only partitions the iteration space.
//!
//! Four policies trade load balance against synchronization cost:
//!
//! - [`Policy::Static`]: every worker computes its ranges from its team index
//!   alone. Wait-free and contention-free, but blind to imbalance.
//! - [`Policy::Dynamic`]: a shared cursor advanced by a fixed chunk per
//!   claim. One atomic op per claim buys first-come load balance.
//! - [`Policy::Guided`]: like dynamic, but claims start large and shrink as
//!   the loop drains, so early claims amortize the contention and late
//!   claims smooth out the tail.
//! - [`Policy::Adaptive`]: every worker drains a private deque and steals
//!   half of a random victim's remainder when it runs dry. Built for loops
//!   whose iterations vary wildly in cost. Victim selection can be biased
//!   toward the thief's NUMA node with a `NumaTopology` table (the `numa`
//!   feature).
//!
//! ```
//! use workshare::{Policy, WorkShare, Worker};
//!
//! // two workers share the loop `for (i = 0; i != 100; i += 1)`
//! let ws = WorkShare::new(Policy::Dynamic, 2, 0, 100, 1, 8);
//!
//! let total: i64 = std::thread::scope(|s| {
//!     let handles: Vec<_> = (0..2)
//!         .map(|team_id| {
//!             let ws = &ws;
//!             s.spawn(move || {
//!                 let mut worker = Worker::new(team_id);
//!                 let mut ran = 0;
//!                 while let Some((pstart, pend)) = ws.next(&mut worker) {
//!                     // the caller's loop body runs [pstart, pend) here
//!                     ran += pend - pstart;
//!                 }
//!                 ran
//!             })
//!         })
//!         .collect();
//!     handles.into_iter().map(|h| h.join().unwrap()).sum()
//! });
//!
//! assert_eq!(total, 100);
//! ```
//!
//! Claims are short and lock-light: the static policy never writes shared
//! state, dynamic and guided are a single fetch-add or compare-exchange (the
//! `atomics` feature; without it they serialize on the share's lock), and the
//! adaptive owner path is two cache-line touches around a fence. The only
//! blocking anywhere is a per-deque lock held for a handful of arithmetic
//! ops. Iteration ranges never overlap, and draining the share hands out
//! every iteration exactly once across the team.

#[cfg(feature = "numa")]
pub use crate::numa::NumaTopology;
pub use crate::static_sched::StaticNext;
pub use crate::worker::Worker;
pub use crate::workshare::{Policy, WorkShare};

#[cfg(feature = "adaptive")]
mod adaptive_sched;
mod dynamic_sched;
mod guided_sched;
#[cfg(feature = "numa")]
mod numa;
mod range;
mod static_sched;
#[cfg(test)]
mod testkit;
mod worker;
mod workshare;
