use tracing::debug;

use super::local_minimum::LocalMinimum;
use super::Eval;
use crate::error::{LfResult, LweForgeError};

/// Searches the inclusive range `[start, stop]` for the candidate minimizing
/// `f` under the natural ordering and returns the best (candidate, result)
/// pair. Errors from the cost function abort the search immediately.
pub fn binary_search<T, F>(f: F, start: i64, stop: i64) -> LfResult<(i64, Eval<T>)>
where
    T: PartialOrd,
    F: FnMut(i64) -> LfResult<Eval<T>>,
{
    binary_search_with(f, start, stop, 1, |a: &T, b: &T| a <= b)
}

/// [`binary_search`] with an explicit probe step size and improvement
/// predicate.
pub fn binary_search_with<T, F, C>(
    mut f: F,
    start: i64,
    stop: i64,
    step: i64,
    smallerf: C,
) -> LfResult<(i64, Eval<T>)>
where
    F: FnMut(i64) -> LfResult<Eval<T>>,
    C: FnMut(&T, &T) -> bool,
{
    if stop < start {
        return Err(LweForgeError::SearchRange { start, stop });
    }
    let mut search = LocalMinimum::with_comparator(start, stop + 1, smallerf)?.step_size(step);
    while let Some(x) = search.next_candidate() {
        search.update(f(x)?);
    }
    search
        .into_best()
        .ok_or(LweForgeError::SearchRange { start, stop })
}

/// Coarse-then-fine search over `[start, stop)` for cost functions with
/// local irregularity.
///
/// Phase 1 locates an approximate basin by searching every `step`-th
/// integer; phase 2 scans the window of radius `2 * step` around the coarse
/// optimum exhaustively and returns the minimum under the natural ordering.
/// The window absorbs both the in-block offset of the true minimum and a
/// coarse result one block off it. Ranges spanning no more than one step
/// skip phase 1 and scan around the midpoint instead.
pub fn binary_search_robust<T, F>(f: F, start: i64, stop: i64, step: i64) -> LfResult<Eval<T>>
where
    T: PartialOrd,
    F: FnMut(i64) -> LfResult<Eval<T>>,
{
    binary_search_robust_with(f, start, stop, step, |a: &T, b: &T| a <= b)
}

/// [`binary_search_robust`] with an explicit phase-1 improvement predicate.
pub fn binary_search_robust_with<T, F, C>(
    mut f: F,
    start: i64,
    stop: i64,
    step: i64,
    smallerf: C,
) -> LfResult<Eval<T>>
where
    T: PartialOrd,
    F: FnMut(i64) -> LfResult<Eval<T>>,
    C: FnMut(&T, &T) -> bool,
{
    if stop <= start {
        return Err(LweForgeError::SearchRange { start, stop });
    }
    let step = step.max(1);

    // Coarse phase over the down-sampled domain, every multiple of `step`
    // inside [start, stop); the midpoint stands in whenever that domain has
    // nothing to offer. Tail gaps at either end stay below `step`, so the
    // fine window always reaches the true basin.
    let coarse = if stop - start > step {
        let lo = start.div_euclid(step) + i64::from(start.rem_euclid(step) != 0);
        let hi = stop.div_euclid(step) + i64::from(stop.rem_euclid(step) != 0);
        if lo < hi {
            // a bound hit here is no cause for alarm, the fine window
            // reaches past the coarse domain
            let mut search =
                LocalMinimum::with_comparator(lo, hi, smallerf)?.suppress_bounds_warning();
            while let Some(x) = search.next_candidate() {
                search.update(f(step * x)?);
            }
            search.into_best().map(|(x, y)| (step * x, y))
        } else {
            None
        }
    } else {
        None
    };
    let (center, fallback) = match coarse {
        Some((p, y)) => (p, y),
        None => {
            let p = (start + stop).div_euclid(2);
            (p, f(p)?)
        }
    };
    debug!("refining around x={} with radius {}", center, 2 * step);

    let lower = start.max(center - 2 * step);
    let upper = stop.min(center + 2 * step);
    if lower >= upper {
        return Ok(fallback);
    }

    let mut best: Option<T> = None;
    for x in lower..upper {
        if let Eval::Feasible(y) = f(x)? {
            best = Some(match best {
                Some(b) if b <= y => b,
                _ => y,
            });
        }
    }
    Ok(best.map_or(Eval::Infeasible, Eval::Feasible))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feasible(v: i64) -> LfResult<Eval<i64>> {
        Ok(Eval::Feasible(v))
    }

    #[test]
    fn inclusive_upper_bound_is_probed_first() {
        let mut seen = Vec::new();
        let (x, _) = binary_search(
            |x| {
                seen.push(x);
                feasible((x - 25).abs())
            },
            10,
            30,
        )
        .unwrap();
        assert_eq!(seen[0], 30);
        assert_eq!(x, 25);
    }

    #[test]
    fn error_from_cost_function_aborts() {
        let res = binary_search(
            |x: i64| -> LfResult<Eval<i64>> {
                if x < 25 {
                    Err(LweForgeError::InsufficientSamples { required: 1e6 })
                } else {
                    Ok(Eval::Feasible(x))
                }
            },
            10,
            30,
        );
        assert!(matches!(
            res,
            Err(LweForgeError::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn inverted_range_is_a_configuration_error() {
        let res = binary_search(|x| feasible(x), 10, 9);
        assert!(matches!(res, Err(LweForgeError::SearchRange { .. })));
    }

    #[test]
    fn robust_scan_covers_the_fine_window() {
        // Coarse blocks decrease toward 60, with an in-block wiggle the
        // coarse pass cannot see.
        let f = |x: i64| feasible((x - 60).abs() * 10 + (x % 3));
        let y = binary_search_robust(f, 0, 100, 10).unwrap();
        assert_eq!(y, Eval::Feasible(0));
    }

    #[test]
    fn robust_degenerate_range_scans_around_midpoint() {
        let mut seen = Vec::new();
        let y = binary_search_robust(
            |x| {
                seen.push(x);
                feasible((x - 12).abs())
            },
            10,
            14,
            10,
        )
        .unwrap();
        assert_eq!(y, Eval::Feasible(0));
        assert!(seen.contains(&12));
    }

    #[test]
    fn robust_empty_range_is_rejected() {
        let res = binary_search_robust(|x| feasible(x), 5, 5, 2);
        assert!(matches!(res, Err(LweForgeError::SearchRange { .. })));
    }
}
