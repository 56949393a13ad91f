//! Scenario layer: glue between a puzzle definition and a search session.
//!
//! A [`ScenarioSpec`] bundles:
//! - the vessel capacities (the puzzle itself)
//! - an optional target amount to search for
//! - explicit budgets via [`ResourceLimits`]
//!
//! Specs are plain data: built-ins live in [`crate::scenarios`], and any spec can be loaded
//! from JSON.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pouring::Vessels;
use crate::search::Search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Search budgets used to bound memory/time consumption.
///
/// An exploration of a finite puzzle ends by itself once no new state is reachable; the
/// budgets matter for large or infinite transition systems, where it never would.
/// - `max_paths`: number of paths admitted to the explored history
/// - `max_generations`: number of breadth-first expansion steps
/// - `max_candidates`: number of candidate extensions examined
pub struct ResourceLimits {
    pub max_paths: usize,
    pub max_generations: usize,
    pub max_candidates: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_paths: 5_000_000,
            max_generations: 100_000,
            max_candidates: 200_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Running counters tracked during a search.
pub struct ResourceCounts {
    pub generations: u64,
    pub paths: u64,
    pub candidates: u64,
    pub explored: u64,
}

impl fmt::Display for ResourceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generations={}, paths={}, candidates={}, explored={}",
            self.generations, self.paths, self.candidates, self.explored
        )
    }
}

#[derive(Debug, Clone, Error)]
/// Structured errors returned by search routines.
pub enum SearchError {
    /// The scenario is internally inconsistent (e.g. no vessels).
    #[error("invalid scenario: {reason}")]
    InvalidScenario { reason: String },
    /// A hand-built move names a vessel that does not exist.
    #[error("invalid move {mv}: vessel {vessel} does not exist ({vessels} vessels)")]
    InvalidMove {
        mv: String,
        vessel: usize,
        vessels: usize,
    },
    /// A configured resource limit was exceeded.
    #[error("limit exceeded at {stage}: {metric} (limit={limit}, observed={observed}); counts({counts})")]
    LimitExceeded {
        stage: &'static str,
        metric: &'static str,
        limit: u64,
        observed: u64,
        counts: ResourceCounts,
    },
    /// A `try_reserve` allocation failed for a large structure.
    #[error("allocation failed at {stage} for {structure}; counts({counts})")]
    AllocationFailed {
        stage: &'static str,
        structure: &'static str,
        counts: ResourceCounts,
    },
    /// I/O failure (used by file-backed scenarios).
    #[error("io error at {stage} for {path}: {error}")]
    Io {
        stage: &'static str,
        path: String,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A fully specified pouring scenario.
///
/// `ScenarioSpec::validate()` checks invariants such as a non-empty vessel list.
pub struct ScenarioSpec {
    pub name: String,
    pub capacities: Vec<u32>,
    #[serde(default)]
    pub target: Option<u32>,
    #[serde(default)]
    pub limits: ResourceLimits,
}

impl ScenarioSpec {
    pub fn new(name: impl Into<String>, capacities: impl Into<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            capacities: capacities.into(),
            target: None,
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_target(mut self, target: u32) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validate scenario invariants. Intended to be called by CLIs/tests before searching.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.capacities.is_empty() {
            return Err(SearchError::InvalidScenario {
                reason: format!("scenario {} has no vessels", self.name),
            });
        }

        if let Some(target) = self.target {
            let largest = self.capacities.iter().copied().max().unwrap_or(0);
            if target > largest {
                return Err(SearchError::InvalidScenario {
                    reason: format!(
                        "target {target} exceeds the largest capacity {largest} and can never be measured"
                    ),
                });
            }
        }

        let budgets = [
            ("max_paths", self.limits.max_paths),
            ("max_generations", self.limits.max_generations),
            ("max_candidates", self.limits.max_candidates),
        ];
        if let Some((name, _)) = budgets.iter().find(|(_, limit)| *limit == 0) {
            return Err(SearchError::InvalidScenario {
                reason: format!("{name} must be at least 1"),
            });
        }

        Ok(())
    }

    pub fn vessels(&self) -> Result<Vessels, SearchError> {
        self.validate()?;
        Vessels::new(self.capacities.clone())
    }

    /// A fresh search session over this scenario's vessels and budgets.
    pub fn search(&self) -> Result<Search<Vessels>, SearchError> {
        Ok(Search::with_limits(self.vessels()?, self.limits))
    }

    pub fn from_json_str(json: &str) -> Result<Self, SearchError> {
        serde_json::from_str(json).map_err(|e| SearchError::InvalidScenario {
            reason: format!("invalid scenario JSON: {e}"),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SearchError> {
        let bytes = fs::read(path).map_err(|e| SearchError::Io {
            stage: "scenario_load_read",
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| SearchError::Io {
            stage: "scenario_load_parse",
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    pub fn to_json_pretty(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
