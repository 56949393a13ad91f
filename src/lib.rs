//! Lazy, memoizing sequences and a breadth-first path explorer built on them, demonstrated on
//! the water-pouring puzzle.

pub mod lazy;
pub mod path;
pub mod pouring;
pub mod puzzle;
pub mod scenario;
pub mod scenarios;
pub mod search;
pub mod telemetry;
