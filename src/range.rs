//! Iteration-space arithmetic shared by the scheduling policies.
//!
//! Loop bounds are signed and the step may run in either direction, so the
//! helpers here take the step sign into account rather than assuming an
//! ascending space.

/// Ceiling division for signed numerators. `b` must be positive.
pub(crate) fn ceil_div(a: i64, b: i64) -> i64 {
    debug_assert!(b > 0);
    (a + b - 1).div_euclid(b)
}

/// The number of iterations in the loop `for (i = start; i != end; i += incr)`,
/// counting in the direction of `incr`. Bounds that are inverted with respect
/// to the step direction describe zero iterations.
pub(crate) fn trip_count(start: i64, end: i64, incr: i64) -> i64 {
    debug_assert_ne!(incr, 0);
    let n = if incr > 0 {
        ceil_div(end - start, incr)
    } else {
        ceil_div(start - end, -incr)
    };
    n.max(0)
}

/// True when `pos` lies at or past `end` in the direction of `incr`.
pub(crate) fn past_end(pos: i64, end: i64, incr: i64) -> bool {
    if incr > 0 {
        pos >= end
    } else {
        pos <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(10, 4), 3);
        assert_eq!(ceil_div(8, 4), 2);
        assert_eq!(ceil_div(1, 7), 1);
        assert_eq!(ceil_div(0, 4), 0);
        assert_eq!(ceil_div(-1, 4), 0);
        assert_eq!(ceil_div(-3, 2), -1);
        assert_eq!(ceil_div(-4, 2), -2);
    }

    #[test]
    fn test_trip_count() {
        assert_eq!(trip_count(0, 10, 1), 10);
        assert_eq!(trip_count(0, 10, 3), 4);
        assert_eq!(trip_count(9, -1, -1), 10);
        assert_eq!(trip_count(10, 0, -3), 4);
        assert_eq!(trip_count(5, 5, 1), 0);
        // bounds inverted against the step run zero times
        assert_eq!(trip_count(0, 10, -1), 0);
        assert_eq!(trip_count(10, 0, 2), 0);
    }

    #[test]
    fn test_past_end() {
        assert!(past_end(10, 10, 1));
        assert!(past_end(11, 10, 1));
        assert!(!past_end(9, 10, 1));
        assert!(past_end(0, 0, -1));
        assert!(past_end(-1, 0, -1));
        assert!(!past_end(1, 0, -1));
    }
}
