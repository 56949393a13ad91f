//! A search session: one exploration shared by every query made against it.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::lazy::LazySeq;
use crate::path::PathOf;
use crate::pouring::Vessels;
use crate::puzzle::TransitionSystem;
use crate::scenario::{ResourceCounts, ResourceLimits, SearchError};
use crate::search::explorer::Explorer;
use crate::search::resources::ResourceTracker;

/// Owns an [`Explorer`] behind a [`LazySeq`], so queries share its progress.
///
/// Each query reads through a fresh cursor: asking for the same target twice returns the same
/// path, and a query never skips paths an earlier query already pulled.
pub struct Search<T: TransitionSystem + 'static> {
    system: Rc<T>,
    paths: LazySeq<PathOf<T>>,
    tracker: Rc<RefCell<ResourceTracker>>,
}

impl<T: TransitionSystem + 'static> Search<T> {
    pub fn new(system: T) -> Self {
        Self::with_limits(system, ResourceLimits::default())
    }

    pub fn with_limits(system: T, limits: ResourceLimits) -> Self {
        let system = Rc::new(system);
        let explorer = Explorer::with_limits(Rc::clone(&system), limits);
        let tracker = explorer.tracker();
        Self {
            system,
            paths: LazySeq::new(explorer),
            tracker,
        }
    }

    #[inline]
    pub fn system(&self) -> &T {
        &self.system
    }

    /// Every path the explorer yields, shortest first.
    #[inline]
    pub fn paths(&self) -> &LazySeq<PathOf<T>> {
        &self.paths
    }

    /// Paths whose end state satisfies `pred`, lazily filtered from [`Search::paths`].
    pub fn solutions_by<F>(&self, mut pred: F) -> LazySeq<PathOf<T>>
    where
        F: FnMut(&T::State) -> bool + 'static,
    {
        self.paths.filter(move |p| pred(p.state()))
    }

    /// The shortest path whose end state satisfies `pred`.
    ///
    /// `Ok(None)` means every reachable state was explored without a match; an error means a
    /// budget stopped the exploration first.
    pub fn first_by<F>(&self, pred: F) -> Result<Option<PathOf<T>>, SearchError>
    where
        F: FnMut(&T::State) -> bool + 'static,
    {
        match self.solutions_by(pred).first() {
            Some(path) => {
                info!(moves = path.len(), explored = self.progress().explored, "solution found");
                Ok(Some(path))
            }
            None => match self.tracker.borrow().stopped() {
                Some(err) => Err(err.clone()),
                None => {
                    info!(explored = self.progress().explored, "no reachable state matches");
                    Ok(None)
                }
            },
        }
    }

    /// Counters of the exploration so far.
    pub fn progress(&self) -> ResourceCounts {
        self.tracker.borrow().counts()
    }

    /// Why exploration stopped early, if a budget stopped it.
    pub fn stopped(&self) -> Option<SearchError> {
        self.tracker.borrow().stopped().cloned()
    }
}

impl Search<Vessels> {
    /// Paths ending with `target` in any vessel.
    pub fn solutions(&self, target: u32) -> LazySeq<PathOf<Vessels>> {
        self.solutions_by(move |levels| levels.contains(target))
    }

    /// The shortest path ending with `target` in any vessel; ties go to the earlier moves.
    pub fn solution(&self, target: u32) -> Result<Option<PathOf<Vessels>>, SearchError> {
        self.first_by(move |levels| levels.contains(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_queries_agree() {
        let search = Search::new(Vessels::new([4, 9]).unwrap());
        let a = search.solution(1).unwrap().unwrap();
        let b = search.solution(1).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn later_query_reuses_explored_paths() {
        let search = Search::new(Vessels::new([4, 9]).unwrap());
        search.solution(6).unwrap();
        let cached = search.paths().cached_len();

        // (4, 5) was produced on the way to 6; finding it needs no new expansion.
        let five = search.solution(5).unwrap().unwrap();
        assert_eq!(*five.state(), [4, 5]);
        assert_eq!(search.paths().cached_len(), cached);
    }

    #[test]
    fn solutions_are_lazy_and_shortest_first() {
        let search = Search::new(Vessels::new([3, 5, 8]).unwrap());
        let fours = search.solutions(4);
        let first_two = fours.slice(0, 2);
        assert_eq!(first_two.len(), 2);
        assert!(first_two[0].len() <= first_two[1].len());
        assert!(!search.paths().is_finished());
    }
}
