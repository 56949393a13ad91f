//! Built-in scenarios (compile-time configs).

use crate::scenario::{ResourceLimits, ScenarioSpec};

fn demo_limits() -> ResourceLimits {
    ResourceLimits {
        max_paths: 1_000_000,
        max_generations: 10_000,
        max_candidates: 50_000_000,
    }
}

/// Vessels of 4 and 9, measure 6.
///
/// The reference puzzle: small enough for tests and fast demos.
pub fn classic() -> ScenarioSpec {
    ScenarioSpec::new("classic", [4, 9])
        .with_target(6)
        .with_limits(demo_limits())
}

/// Vessels of 3, 5 and 8, measure 4.
pub fn three_vessels() -> ScenarioSpec {
    ScenarioSpec::new("three_vessels", [3, 5, 8])
        .with_target(4)
        .with_limits(demo_limits())
}

pub fn available_names() -> Vec<&'static str> {
    vec!["classic", "three_vessels"]
}

/// Return a config by name.
pub fn by_name(name: &str) -> Option<ScenarioSpec> {
    match name {
        "classic" => Some(classic()),
        "three_vessels" => Some(three_vessels()),
        _ => None,
    }
}
