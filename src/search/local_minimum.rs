use std::collections::HashSet;

use tracing::{debug, warn};

use super::Eval;
use crate::error::{LfResult, LweForgeError};

/// Walk phase. Probe modes take single steps, bisect modes halve the
/// remaining interval after a successful long jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    ProbeDown,
    ProbeUp,
    BisectDown,
    BisectUp,
}

/// Stateful candidate generator for a unimodal cost function over the
/// half-open integer interval `[start, stop)`.
///
/// The caller alternates strictly between [`next_candidate`] and [`update`]:
/// each produced candidate must have its evaluation reported before the next
/// one is requested. Requesting twice without a report ends the sequence.
/// Unimodality is assumed, never checked; on non-unimodal input the walk
/// settles on some local optimum.
///
/// ```
/// use lweforge::search::{Eval, LocalMinimum};
///
/// let mut search = LocalMinimum::new(10, 30).unwrap();
/// while let Some(x) = search.next_candidate() {
///     search.update(Eval::Feasible((x - 17).abs()));
/// }
/// assert_eq!(search.x(), Some(17));
/// ```
///
/// [`next_candidate`]: LocalMinimum::next_candidate
/// [`update`]: LocalMinimum::update
pub struct LocalMinimum<T, F = fn(&T, &T) -> bool> {
    initial: (i64, i64),
    start: i64,
    stop: i64,
    step: i64,
    direction: Direction,
    smallerf: F,
    suppress_bounds_warning: bool,
    last_x: Option<i64>,
    next_x: Option<i64>,
    best: Option<(i64, Eval<T>)>,
    visited: HashSet<i64>,
    exhausted: bool,
}

impl<T: PartialOrd> LocalMinimum<T> {
    /// Search state over `[start, stop)` with the natural "smaller or equal
    /// is better" ordering. Among equally good results the most recently
    /// visited candidate wins.
    pub fn new(start: i64, stop: i64) -> LfResult<Self> {
        Self::with_comparator(start, stop, |a: &T, b: &T| a <= b)
    }
}

impl<T, F> LocalMinimum<T, F>
where
    F: FnMut(&T, &T) -> bool,
{
    /// Search state with a caller-supplied improvement predicate
    /// `smallerf(candidate_result, best_result)`. The predicate should be
    /// reflexive for the first probe to count as an improvement.
    pub fn with_comparator(start: i64, stop: i64, smallerf: F) -> LfResult<Self> {
        if stop < start {
            return Err(LweForgeError::SearchRange { start, stop });
        }
        Ok(Self {
            initial: (start, stop - 1),
            start,
            stop: stop - 1,
            step: 1,
            direction: Direction::ProbeDown,
            smallerf,
            suppress_bounds_warning: false,
            last_x: None,
            next_x: Some(stop - 1),
            best: None,
            visited: HashSet::new(),
            exhausted: false,
        })
    }

    /// Neighbor-probe step size (default 1).
    pub fn step_size(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Disables the advisory emitted when the optimum sits on a bound.
    pub fn suppress_bounds_warning(mut self) -> Self {
        self.suppress_bounds_warning = true;
        self
    }

    /// The next candidate to evaluate, or `None` once the search is
    /// exhausted. Must be followed by exactly one [`update`] call before the
    /// next request.
    ///
    /// [`update`]: LocalMinimum::update
    pub fn next_candidate(&mut self) -> Option<i64> {
        let abort = match self.next_x {
            None => true,
            Some(x) => self.visited.contains(&x) || x < self.initial.0 || self.initial.1 < x,
        };
        if !abort {
            self.last_x = self.next_x.take();
            return self.last_x;
        }
        if !self.exhausted {
            self.exhausted = true;
            if !self.suppress_bounds_warning {
                if let Some((x, _)) = &self.best {
                    if *x == self.initial.0 || *x == self.initial.1 {
                        warn!(
                            "optimum x={} matches a bound of [{}, {}], the true minimum may lie outside",
                            x, self.initial.0, self.initial.1
                        );
                    }
                }
            }
        }
        None
    }

    /// Reports the evaluation of the last produced candidate and advances
    /// the walk. Ignored when no candidate is outstanding.
    pub fn update(&mut self, res: Eval<T>) {
        let Some(last) = self.last_x else {
            return;
        };
        debug!("x={}, feasible={}", last, res.is_feasible());
        self.visited.insert(last);

        // The very first report always becomes the best-so-far, feasible or
        // not; afterwards a feasible result improves on an infeasible best
        // unconditionally.
        let improved = match &res {
            Eval::Infeasible => false,
            Eval::Feasible(y) => match &self.best {
                None => (self.smallerf)(y, y),
                Some((_, Eval::Infeasible)) => true,
                Some((_, Eval::Feasible(b))) => (self.smallerf)(y, b),
            },
        };

        if improved {
            self.best = Some((last, res));
            match self.direction {
                Direction::BisectDown | Direction::BisectUp => {
                    // A long jump paid off: refine around the new best.
                    self.direction = Direction::ProbeDown;
                    self.next_x = Some(last - self.step);
                }
                Direction::ProbeDown => {
                    self.direction = Direction::BisectDown;
                    self.stop = last;
                    self.next_x = Some(mid_ceil(self.start, self.stop));
                }
                Direction::ProbeUp => {
                    self.direction = Direction::BisectUp;
                    self.start = last;
                    self.next_x = Some(mid_floor(self.start, self.stop));
                }
            }
        } else {
            if self.best.is_none() {
                self.best = Some((last, res));
            }
            match self.direction {
                Direction::ProbeDown => {
                    // The minimum may lie on the other side of the entry
                    // point.
                    self.direction = Direction::ProbeUp;
                    self.next_x = Some(last + 2 * self.step);
                }
                Direction::ProbeUp => {
                    self.next_x = None;
                }
                Direction::BisectDown => {
                    self.start = last;
                    self.next_x = Some(mid_ceil(self.start, self.stop));
                }
                Direction::BisectUp => {
                    self.stop = last;
                    self.next_x = Some(mid_floor(self.start, self.stop));
                }
            }
        }

        if self.next_x == self.last_x {
            self.next_x = None;
        }
    }

    /// Best candidate seen so far.
    pub fn x(&self) -> Option<i64> {
        self.best.as_ref().map(|(x, _)| *x)
    }

    /// Result of the best candidate seen so far.
    pub fn y(&self) -> Option<Eval<&T>> {
        self.best.as_ref().map(|(_, y)| y.as_ref())
    }

    /// Number of candidates evaluated.
    pub fn evaluated(&self) -> usize {
        self.visited.len()
    }

    /// Consumes the state, returning the best (candidate, result) pair.
    pub fn into_best(self) -> Option<(i64, Eval<T>)> {
        self.best
    }
}

// Integer midpoints that round like mathematical ceil/floor for negative
// operands as well.
fn mid_ceil(a: i64, b: i64) -> i64 {
    (a + b + 1).div_euclid(2)
}

fn mid_floor(a: i64, b: i64) -> i64 {
    (a + b).div_euclid(2)
}
