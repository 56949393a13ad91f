//! The water-pouring puzzle: vessels with fixed capacities, all empty at the start.
//!
//! Moves are [`Move::Empty`], [`Move::Fill`] and [`Move::Pour`]; a state is the fill level of
//! every vessel ([`Levels`]). The move set is enumerated as all empties, then all fills, then
//! all pours ordered by `(from, to)`, which is the tie-break order for equally short paths.

use std::fmt;

use crate::puzzle::TransitionSystem;
use crate::scenario::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Empty(usize),
    Fill(usize),
    Pour { from: usize, to: usize },
}

impl Move {
    #[inline]
    pub const fn empty(vessel: usize) -> Self {
        Move::Empty(vessel)
    }

    #[inline]
    pub const fn fill(vessel: usize) -> Self {
        Move::Fill(vessel)
    }

    #[inline]
    pub const fn pour(from: usize, to: usize) -> Self {
        Move::Pour { from, to }
    }

    /// Largest vessel index this move touches.
    fn max_vessel(self) -> usize {
        match self {
            Move::Empty(v) | Move::Fill(v) => v,
            Move::Pour { from, to } => from.max(to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Empty(v) => write!(f, "empty({v})"),
            Move::Fill(v) => write!(f, "fill({v})"),
            Move::Pour { from, to } => write!(f, "pour({from}, {to})"),
        }
    }
}

/// Fill levels, one per vessel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Levels(Vec<u32>);

impl Levels {
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Whether any vessel holds exactly `amount`.
    #[inline]
    pub fn contains(&self, amount: u32) -> bool {
        self.0.contains(&amount)
    }
}

impl From<Vec<u32>> for Levels {
    fn from(v: Vec<u32>) -> Self {
        Levels(v)
    }
}

impl<const N: usize> From<[u32; N]> for Levels {
    fn from(v: [u32; N]) -> Self {
        Levels(v.to_vec())
    }
}

impl<const N: usize> PartialEq<[u32; N]> for Levels {
    fn eq(&self, other: &[u32; N]) -> bool {
        self.0.as_slice() == other.as_slice()
    }
}

impl fmt::Display for Levels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, level) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{level}")?;
        }
        f.write_str(")")
    }
}

/// A set of vessels and the moves available on them.
#[derive(Debug, Clone)]
pub struct Vessels {
    capacities: Vec<u32>,
    moves: Vec<Move>,
}

impl Vessels {
    pub fn new(capacities: impl Into<Vec<u32>>) -> Result<Self, SearchError> {
        let capacities = capacities.into();
        if capacities.is_empty() {
            return Err(SearchError::InvalidScenario {
                reason: "at least one vessel is required".to_string(),
            });
        }

        let n = capacities.len();
        let mut moves = Vec::with_capacity(2 * n + n * (n - 1));
        moves.extend((0..n).map(Move::empty));
        moves.extend((0..n).map(Move::fill));
        for from in 0..n {
            for to in 0..n {
                if from != to {
                    moves.push(Move::pour(from, to));
                }
            }
        }

        Ok(Self { capacities, moves })
    }

    #[inline]
    pub fn capacities(&self) -> &[u32] {
        &self.capacities
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.capacities.len()
    }

    /// Reject moves naming a vessel that does not exist.
    pub fn check(&self, mv: Move) -> Result<(), SearchError> {
        let vessel = mv.max_vessel();
        if vessel >= self.count() {
            return Err(SearchError::InvalidMove {
                mv: mv.to_string(),
                vessel,
                vessels: self.count(),
            });
        }
        Ok(())
    }

    /// [`TransitionSystem::lead_to`] for moves that did not come from [`Vessels::moves`].
    pub fn try_lead_to(&self, moves: &[Move]) -> Result<Levels, SearchError> {
        for &mv in moves {
            self.check(mv)?;
        }
        Ok(self.lead_to(moves))
    }

    /// Whether every level is within its vessel's capacity.
    pub fn admits(&self, levels: &Levels) -> bool {
        levels.0.len() == self.count()
            && levels
                .0
                .iter()
                .zip(&self.capacities)
                .all(|(level, cap)| level <= cap)
    }
}

impl TransitionSystem for Vessels {
    type State = Levels;
    type Move = Move;

    fn initial(&self) -> Levels {
        Levels(vec![0; self.count()])
    }

    fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Moves naming a missing vessel leave the state unchanged; see [`Vessels::check`].
    fn apply(&self, mv: &Move, state: &Levels) -> Levels {
        let mut levels = state.0.clone();
        if mv.max_vessel() >= levels.len() {
            return Levels(levels);
        }
        match *mv {
            Move::Empty(v) => levels[v] = 0,
            Move::Fill(v) => levels[v] = self.capacities[v],
            Move::Pour { from, to } => {
                let amount = levels[from].min(self.capacities[to].saturating_sub(levels[to]));
                levels[from] -= amount;
                levels[to] += amount;
            }
        }
        Levels(levels)
    }
}
