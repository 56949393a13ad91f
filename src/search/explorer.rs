//! Breadth-first enumeration of paths through a [`TransitionSystem`].
//!
//! The explorer yields every path whose end state has not been reached by an earlier path,
//! shortest first:
//! - generation 0 is the empty path;
//! - generation `d + 1` extends every generation-`d` path by every move (in move order), keeps
//!   the candidates whose state is not in the explored set, and of several candidates reaching
//!   the same new state keeps the first.
//!
//! The explored set is folded forward once per generation: candidates are filtered against the
//! states of all earlier generations, never against a partially built current one.
//!
//! Expansion is pull-driven. A call to `next` either hands out the next path of the current
//! generation or computes exactly one new generation. When a generation comes out empty, every
//! reachable state has been found and the explorer is exhausted.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::path::{Path, PathOf};
use crate::puzzle::TransitionSystem;
use crate::scenario::{ResourceLimits, SearchError};
use crate::search::resources::ResourceTracker;

pub struct Explorer<T: TransitionSystem> {
    system: Rc<T>,
    /// The most recently completed generation.
    frontier: Vec<PathOf<T>>,
    /// Next index of `frontier` to hand out.
    cursor: usize,
    explored: FxHashSet<T::State>,
    generation: usize,
    exhausted: bool,
    tracker: Rc<RefCell<ResourceTracker>>,
}

impl<T: TransitionSystem> Explorer<T> {
    pub fn new(system: Rc<T>) -> Self {
        Self::with_limits(system, ResourceLimits::default())
    }

    pub fn with_limits(system: Rc<T>, limits: ResourceLimits) -> Self {
        let initial = system.initial();
        let mut explored = FxHashSet::default();
        explored.insert(initial.clone());

        let mut tracker = ResourceTracker::new(limits);
        tracker.set_explored(explored.len());

        // The empty path counts against the path budget like any other.
        let (frontier, exhausted) = match tracker.bump_paths("init", 1) {
            Ok(()) => (vec![Path::empty(initial)], false),
            Err(err) => {
                warn!(%err, "exploration stopped before the first path");
                tracker.stop(err);
                (Vec::new(), true)
            }
        };

        Self {
            system,
            frontier,
            cursor: 0,
            explored,
            generation: 0,
            exhausted,
            tracker: Rc::new(RefCell::new(tracker)),
        }
    }

    /// Shared handle to the budget tracker; stays valid after the explorer is moved away.
    pub fn tracker(&self) -> Rc<RefCell<ResourceTracker>> {
        Rc::clone(&self.tracker)
    }

    #[inline]
    pub fn system(&self) -> &T {
        &self.system
    }

    /// Index of the generation currently being handed out.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }

    #[inline]
    pub fn is_explored(&self, state: &T::State) -> bool {
        self.explored.contains(state)
    }

    /// Compute the next generation from `frontier`.
    fn expand(&mut self) -> Result<(), SearchError> {
        let mut tracker = self.tracker.borrow_mut();
        tracker.bump_generations("expand", 1)?;

        let moves = self.system.moves();
        let mut fresh: FxHashSet<T::State> = FxHashSet::default();
        let mut next: Vec<PathOf<T>> = Vec::new();
        tracker.try_reserve_vec("expand", "next_generation", &mut next, self.frontier.len())?;

        for path in &self.frontier {
            tracker.bump_candidates("expand", moves.len())?;
            for mv in moves {
                let state = self.system.apply(mv, path.state());
                if self.explored.contains(&state) || fresh.contains(&state) {
                    continue;
                }
                fresh.insert(state.clone());
                next.push(path.push(mv.clone(), state));
            }
        }

        tracker.bump_paths("expand", next.len())?;
        tracker.try_reserve_set("expand", "explored", &mut self.explored, fresh.len())?;
        self.explored.extend(fresh);
        tracker.set_explored(self.explored.len());

        self.generation += 1;
        debug!(
            generation = self.generation,
            parents = self.frontier.len(),
            discovered = next.len(),
            explored = self.explored.len(),
            "expanded generation"
        );

        if next.is_empty() {
            debug!(
                generations = self.generation,
                explored = self.explored.len(),
                "state space exhausted"
            );
            self.exhausted = true;
        }
        self.frontier = next;
        self.cursor = 0;
        Ok(())
    }
}

impl<T: TransitionSystem> Iterator for Explorer<T> {
    type Item = PathOf<T>;

    fn next(&mut self) -> Option<PathOf<T>> {
        loop {
            if let Some(path) = self.frontier.get(self.cursor) {
                self.cursor += 1;
                return Some(path.clone());
            }
            if self.exhausted {
                return None;
            }
            if let Err(err) = self.expand() {
                warn!(%err, generation = self.generation, "exploration stopped");
                self.tracker.borrow_mut().stop(err);
                self.exhausted = true;
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pouring::{Levels, Move, Vessels};

    fn classic() -> Rc<Vessels> {
        Rc::new(Vessels::new([4, 9]).unwrap())
    }

    #[test]
    fn starts_with_the_empty_path() {
        let mut ex = Explorer::new(classic());
        let first = ex.next().unwrap();
        assert!(first.is_empty());
        assert_eq!(*first.state(), [0, 0]);
        assert_eq!(ex.generation(), 0);
    }

    #[test]
    fn first_generation_keeps_one_path_per_state() {
        let ex = Explorer::new(classic());
        let gen1: Vec<_> = ex.skip(1).take_while(|p| p.len() == 1).collect();
        // empty(*) and pour(*) from (0, 0) go nowhere new.
        let moves: Vec<Move> = gen1.iter().filter_map(|p| p.last_move().copied()).collect();
        assert_eq!(moves, vec![Move::fill(0), Move::fill(1)]);
    }

    #[test]
    fn colliding_candidates_keep_the_first_in_move_order() {
        // Two vessels of equal size: fill(0)+fill(1) and fill(1)+fill(0) both reach (2, 2).
        let ex = Explorer::new(Rc::new(Vessels::new([2, 2]).unwrap()));
        let full: Vec<_> = ex.filter(|p| *p.state() == [2, 2]).collect();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].moves(), vec![Move::fill(0), Move::fill(1)]);
    }

    #[test]
    fn finite_space_is_exhausted() {
        let mut ex = Explorer::new(classic());
        let count = ex.by_ref().count();
        assert_eq!(count, 26);
        assert_eq!(ex.explored_len(), 26);
        assert!(ex.is_explored(&Levels::from([2, 0])));
        assert!(ex.next().is_none());
        assert!(ex.tracker().borrow().stopped().is_none());
    }

    #[test]
    fn generation_budget_stops_exploration() {
        let limits = ResourceLimits {
            max_generations: 2,
            ..ResourceLimits::default()
        };
        let ex = Explorer::with_limits(classic(), limits);
        let tracker = ex.tracker();
        let lengths: Vec<usize> = ex.map(|p| p.len()).collect();

        assert_eq!(lengths, vec![0, 1, 1, 2, 2, 2]);
        let t = tracker.borrow();
        assert!(matches!(
            t.stopped(),
            Some(SearchError::LimitExceeded { metric: "generations", .. })
        ));
    }

    #[test]
    fn zero_path_budget_emits_nothing() {
        let limits = ResourceLimits {
            max_paths: 0,
            ..ResourceLimits::default()
        };
        let mut ex = Explorer::with_limits(classic(), limits);
        assert!(ex.next().is_none());
        assert!(matches!(
            ex.tracker().borrow().stopped(),
            Some(SearchError::LimitExceeded { stage: "init", metric: "paths", limit: 0, observed: 1, .. })
        ));
    }

    #[test]
    fn candidate_budget_stops_exploration() {
        // (4, 9) has six moves; generation 1 examines 6 candidates, generation 2 another 12.
        let limits = ResourceLimits {
            max_candidates: 10,
            ..ResourceLimits::default()
        };
        let ex = Explorer::with_limits(classic(), limits);
        let tracker = ex.tracker();
        let lengths: Vec<usize> = ex.map(|p| p.len()).collect();

        assert_eq!(lengths, vec![0, 1, 1]);
        assert!(matches!(
            tracker.borrow().stopped(),
            Some(SearchError::LimitExceeded { metric: "candidates", limit: 10, observed: 12, .. })
        ));
    }
}
