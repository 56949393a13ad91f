//! The vocabulary a breadth-first explorer needs from a puzzle.

use std::fmt::Debug;
use std::hash::Hash;

/// A deterministic state-transition system with a fixed, ordered move set.
///
/// The order of [`TransitionSystem::moves`] is significant: when two candidate paths of the same
/// length reach the same state, the explorer keeps the one whose moves come first.
pub trait TransitionSystem {
    type State: Clone + Eq + Hash + Debug;
    type Move: Clone + Debug;

    fn initial(&self) -> Self::State;

    fn moves(&self) -> &[Self::Move];

    /// Apply one move. Must be pure: the same inputs always give the same state.
    fn apply(&self, mv: &Self::Move, state: &Self::State) -> Self::State;

    /// Fold `moves` over the initial state.
    fn lead_to<'a, I>(&self, moves: I) -> Self::State
    where
        I: IntoIterator<Item = &'a Self::Move>,
        Self::Move: 'a,
    {
        moves
            .into_iter()
            .fold(self.initial(), |state, mv| self.apply(mv, &state))
    }
}
