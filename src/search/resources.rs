//! Resource tracking and allocation guards for exploration.
//!
//! Breadth-first exploration keeps every path it has produced, so memory only grows. To avoid
//! hard OOM aborts on large state spaces the explorer uses:
//! - counter-based budgets ([`crate::scenario::ResourceLimits`])
//! - `try_reserve` wrappers to surface allocation failures as [`crate::scenario::SearchError`]
//!
//! A tracker is shared between an explorer and the session that owns it, so the session can
//! tell "no more paths" apart from "stopped by a budget".

use std::hash::{BuildHasher, Hash};

use crate::scenario::{ResourceCounts, ResourceLimits, SearchError};

#[derive(Debug, Clone)]
/// Tracks budgets/counters during a search.
pub struct ResourceTracker {
    limits: ResourceLimits,
    counts: ResourceCounts,
    stopped: Option<SearchError>,
}

impl ResourceTracker {
    #[inline]
    pub fn new(limits: ResourceLimits) -> Self {
        Self {
            limits,
            counts: ResourceCounts::default(),
            stopped: None,
        }
    }

    #[inline]
    pub fn limits(&self) -> ResourceLimits {
        self.limits
    }

    #[inline]
    pub fn counts(&self) -> ResourceCounts {
        self.counts
    }

    /// The error that ended exploration, if a budget did.
    #[inline]
    pub fn stopped(&self) -> Option<&SearchError> {
        self.stopped.as_ref()
    }

    pub(crate) fn stop(&mut self, err: SearchError) {
        if self.stopped.is_none() {
            self.stopped = Some(err);
        }
    }

    #[inline]
    pub fn bump_generations(&mut self, stage: &'static str, delta: u64) -> Result<(), SearchError> {
        self.bump(
            stage,
            "generations",
            delta,
            self.limits.max_generations as u64,
            |c| &mut c.generations,
        )
    }

    #[inline]
    pub fn bump_paths(&mut self, stage: &'static str, delta: usize) -> Result<(), SearchError> {
        self.bump(
            stage,
            "paths",
            delta as u64,
            self.limits.max_paths as u64,
            |c| &mut c.paths,
        )
    }

    #[inline]
    pub fn bump_candidates(&mut self, stage: &'static str, delta: usize) -> Result<(), SearchError> {
        self.bump(
            stage,
            "candidates",
            delta as u64,
            self.limits.max_candidates as u64,
            |c| &mut c.candidates,
        )
    }

    #[inline]
    pub fn set_explored(&mut self, explored: usize) {
        self.counts.explored = explored as u64;
    }

    fn bump(
        &mut self,
        stage: &'static str,
        metric: &'static str,
        delta: u64,
        limit: u64,
        field: impl FnOnce(&mut ResourceCounts) -> &mut u64,
    ) -> Result<(), SearchError> {
        let observed = {
            let v = field(&mut self.counts);
            *v = v.saturating_add(delta);
            *v
        };

        if observed > limit {
            return Err(SearchError::LimitExceeded {
                stage,
                metric,
                limit,
                observed,
                counts: self.counts,
            });
        }

        Ok(())
    }

    pub fn try_reserve_vec<T>(
        &self,
        stage: &'static str,
        structure: &'static str,
        v: &mut Vec<T>,
        additional: usize,
    ) -> Result<(), SearchError> {
        v.try_reserve(additional)
            .map_err(|_| SearchError::AllocationFailed {
                stage,
                structure,
                counts: self.counts,
            })
    }

    pub fn try_reserve_set<K, H>(
        &self,
        stage: &'static str,
        structure: &'static str,
        set: &mut std::collections::HashSet<K, H>,
        additional: usize,
    ) -> Result<(), SearchError>
    where
        K: Hash + Eq,
        H: BuildHasher,
    {
        set.try_reserve(additional)
            .map_err(|_| SearchError::AllocationFailed {
                stage,
                structure,
                counts: self.counts,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_reports_the_metric_that_overflowed() {
        let mut t = ResourceTracker::new(ResourceLimits {
            max_paths: 10,
            max_generations: 2,
            max_candidates: 100,
        });
        assert!(t.bump_generations("expand", 1).is_ok());
        assert!(t.bump_generations("expand", 1).is_ok());
        match t.bump_generations("expand", 1) {
            Err(SearchError::LimitExceeded {
                metric,
                limit,
                observed,
                ..
            }) => {
                assert_eq!(metric, "generations");
                assert_eq!(limit, 2);
                assert_eq!(observed, 3);
            }
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn first_stop_reason_wins() {
        let mut t = ResourceTracker::new(ResourceLimits::default());
        t.stop(SearchError::InvalidScenario {
            reason: "first".to_string(),
        });
        t.stop(SearchError::InvalidScenario {
            reason: "second".to_string(),
        });
        assert!(t.stopped().unwrap().to_string().contains("first"));
    }
}
