use std::fmt;
use std::rc::Rc;

use crate::puzzle::TransitionSystem;

/// The path type produced for a given transition system.
pub type PathOf<T> = Path<<T as TransitionSystem>::Move, <T as TransitionSystem>::State>;

struct Node<M, S> {
    parent: Option<Path<M, S>>,
    last: Option<M>,
    state: S,
    len: usize,
}

// Unlink uniquely owned ancestors in a loop; the default drop recurses once per move.
impl<M, S> Drop for Node<M, S> {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(path) = parent {
            match Rc::try_unwrap(path.node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// An immutable sequence of moves from the initial state, with its end state cached.
///
/// Paths are persistent: [`Path::extend`] shares the parent instead of copying it, so the
/// explorer can keep every path it ever produced for the price of one node per path.
pub struct Path<M, S> {
    node: Rc<Node<M, S>>,
}

impl<M, S> Clone for Path<M, S> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<M, S> Path<M, S> {
    /// The path with no moves, ending where it starts.
    pub fn empty(initial: S) -> Self {
        Self {
            node: Rc::new(Node {
                parent: None,
                last: None,
                state: initial,
                len: 0,
            }),
        }
    }

    /// A new path: this one followed by `mv`. `self` is left untouched.
    pub fn extend<T>(&self, system: &T, mv: &M) -> Self
    where
        T: TransitionSystem<Move = M, State = S> + ?Sized,
        M: Clone,
    {
        let state = system.apply(mv, &self.node.state);
        self.push(mv.clone(), state)
    }

    /// Extension with an end state the caller already computed from `self.state()` and `mv`.
    pub(crate) fn push(&self, mv: M, state: S) -> Self {
        Self {
            node: Rc::new(Node {
                parent: Some(self.clone()),
                last: Some(mv),
                state,
                len: self.node.len + 1,
            }),
        }
    }

    /// Number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.node.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node.len == 0
    }

    /// The state this path leads to.
    #[inline]
    pub fn state(&self) -> &S {
        &self.node.state
    }

    #[inline]
    pub fn last_move(&self) -> Option<&M> {
        self.node.last.as_ref()
    }

    fn nodes(&self) -> impl Iterator<Item = &Node<M, S>> {
        std::iter::successors(Some(&*self.node), |n| n.parent.as_ref().map(|p| &*p.node))
    }

    /// The moves, first to last.
    pub fn moves(&self) -> Vec<M>
    where
        M: Clone,
    {
        let mut out: Vec<M> = self.nodes().filter_map(|n| n.last.clone()).collect();
        out.reverse();
        out
    }

    /// Every state visited, the initial state included (`len() + 1` entries).
    pub fn states(&self) -> Vec<S>
    where
        S: Clone,
    {
        let mut out: Vec<S> = self.nodes().map(|n| n.state.clone()).collect();
        out.reverse();
        out
    }
}

impl<M: PartialEq, S: PartialEq> PartialEq for Path<M, S> {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        self.len() == other.len()
            && self.state() == other.state()
            && self
                .nodes()
                .zip(other.nodes())
                .all(|(a, b)| a.last == b.last)
    }
}

impl<M: Eq, S: Eq> Eq for Path<M, S> {}

impl<M: fmt::Debug, S: fmt::Debug> fmt::Debug for Path<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut moves: Vec<&M> = self.nodes().filter_map(|n| n.last.as_ref()).collect();
        moves.reverse();
        f.debug_struct("Path")
            .field("moves", &moves)
            .field("state", self.state())
            .finish()
    }
}

/// Renders as `fill(1), pour(1, 0) ==> (4, 5)`.
impl<M: fmt::Display, S: fmt::Display> fmt::Display for Path<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut moves: Vec<&M> = self.nodes().filter_map(|n| n.last.as_ref()).collect();
        moves.reverse();
        for (i, mv) in moves.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{mv}")?;
        }
        if !moves.is_empty() {
            f.write_str(" ")?;
        }
        write!(f, "==> {}", self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counter that can add one or double.
    struct Counter {
        moves: [char; 2],
    }

    impl TransitionSystem for Counter {
        type State = u32;
        type Move = char;

        fn initial(&self) -> u32 {
            1
        }

        fn moves(&self) -> &[char] {
            &self.moves
        }

        fn apply(&self, mv: &char, state: &u32) -> u32 {
            match mv {
                '+' => state + 1,
                _ => state * 2,
            }
        }
    }

    const COUNTER: Counter = Counter { moves: ['+', '*'] };

    #[test]
    fn extend_leaves_parent_untouched() {
        let root = Path::empty(COUNTER.initial());
        let a = root.extend(&COUNTER, &'+');
        let b = a.extend(&COUNTER, &'*');
        let c = a.extend(&COUNTER, &'+');

        assert_eq!(root.len(), 0);
        assert_eq!(a.moves(), vec!['+']);
        assert_eq!(*b.state(), 4);
        assert_eq!(*c.state(), 3);
        assert_eq!(b.states(), vec![1, 2, 4]);
        assert_eq!(b.last_move(), Some(&'*'));
    }

    #[test]
    fn cached_state_matches_fold() {
        let mut p = Path::empty(COUNTER.initial());
        for mv in ['*', '+', '*', '*', '+'] {
            p = p.extend(&COUNTER, &mv);
        }
        assert_eq!(*p.state(), COUNTER.lead_to(&p.moves()));
    }

    #[test]
    fn renders_moves_then_state() {
        let p = Path::empty(COUNTER.initial())
            .extend(&COUNTER, &'+')
            .extend(&COUNTER, &'*');
        assert_eq!(p.to_string(), "+, * ==> 4");
        assert_eq!(Path::<char, u32>::empty(1).to_string(), "==> 1");
    }

    #[test]
    fn equality_compares_moves() {
        let x = Path::empty(1u32).extend(&COUNTER, &'+').extend(&COUNTER, &'+');
        let y = Path::empty(1u32).extend(&COUNTER, &'*').extend(&COUNTER, &'+');
        assert_eq!(*x.state(), *y.state());
        assert_ne!(x, y);
        assert_eq!(x, x.clone());
    }
}
