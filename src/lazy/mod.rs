//! Memoizing lazy sequences.
//!
//! A [`LazySeq`] wraps a producer (any iterator, finite or infinite) and remembers every value
//! it has produced. Cursors created by [`LazySeq::iter`] share that cache:
//! - positions already cached are replayed without touching the producer,
//! - positions past the cache pull one value from the producer and append it for everyone.
//!
//! Once the producer is exhausted the sequence is finished for good and every later cursor only
//! replays the cache.
//!
//! Handles are `Rc`-shared and no borrow is held while a producer runs, so a producer may keep
//! a handle to the very sequence it feeds and read positions that are already cached. That is
//! how the self-referential streams in [`stream`] are built.

pub mod stream;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

pub use stream::{fibonacci, Stream, StreamError};

type Producer<T> = Box<dyn Iterator<Item = T>>;

pub(crate) struct Shared<T> {
    cache: Vec<T>,
    /// Producers still able to yield, front first.
    producers: VecDeque<Producer<T>>,
    /// The front producer is checked out and currently running.
    busy: bool,
}

/// Outcome of forcing production up to an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    Ready,
    Exhausted,
    /// The position is not cached and the producer is already running further up the stack.
    Reentrant,
}

fn fill_to<T>(shared: &RefCell<Shared<T>>, index: usize) -> Fill {
    loop {
        let mut producer = {
            let mut s = shared.borrow_mut();
            if index < s.cache.len() {
                return Fill::Ready;
            }
            if s.busy {
                return Fill::Reentrant;
            }
            match s.producers.pop_front() {
                Some(p) => {
                    s.busy = true;
                    p
                }
                None => return Fill::Exhausted,
            }
        };

        // No borrow is held here: the producer may read this same sequence.
        let next = producer.next();

        let mut s = shared.borrow_mut();
        s.busy = false;
        match next {
            Some(value) => {
                s.cache.push(value);
                s.producers.push_front(producer);
            }
            None => {
                trace!(cached = s.cache.len(), "producer exhausted");
                drop(s);
                // Dropped outside the borrow: it may own handles to this sequence.
                drop(producer);
            }
        }
    }
}

/// A cache-backed, possibly infinite sequence that can be iterated any number of times.
///
/// Cloning a `LazySeq` clones the handle, not the values: all clones share one cache and one
/// producer.
pub struct LazySeq<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for LazySeq<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for LazySeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.shared.borrow();
        f.debug_struct("LazySeq")
            .field("cached", &s.cache.len())
            .field("producers", &s.producers.len())
            .field("busy", &s.busy)
            .finish()
    }
}

impl<T: 'static> LazySeq<T> {
    /// Wrap a producer. Nothing is pulled until a cursor asks for it.
    pub fn new<I>(producer: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let seq = Self::empty();
        seq.append_producer(Box::new(producer.into_iter()));
        seq
    }

    /// A sequence with no producer: already finished and empty.
    pub fn empty() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                cache: Vec::new(),
                producers: VecDeque::new(),
                busy: false,
            })),
        }
    }

    pub(crate) fn append_producer(&self, producer: Producer<T>) {
        self.shared.borrow_mut().producers.push_back(producer);
    }
}

impl<T> LazySeq<T> {
    /// True once the producer has signalled exhaustion.
    pub fn is_finished(&self) -> bool {
        let s = self.shared.borrow();
        s.producers.is_empty() && !s.busy
    }

    /// Number of values produced so far.
    pub fn cached_len(&self) -> usize {
        self.shared.borrow().cache.len()
    }

    pub(crate) fn force(&self, index: usize) -> Fill {
        fill_to(&self.shared, index)
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Shared<T>>> {
        Rc::downgrade(&self.shared)
    }
}

impl<T: Clone> LazySeq<T> {
    /// A fresh cursor positioned at the start of the sequence.
    pub fn iter(&self) -> Cursor<T> {
        Cursor {
            handle: Handle::Strong(Rc::clone(&self.shared)),
            position: 0,
        }
    }

    /// The value at `index`, producing values up to it if needed.
    ///
    /// Returns `None` if the producer is exhausted before reaching `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        match self.force(index) {
            Fill::Ready => self.shared.borrow().cache.get(index).cloned(),
            Fill::Exhausted | Fill::Reentrant => None,
        }
    }

    #[inline]
    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    /// Snapshot of the values produced so far, without producing more.
    pub fn cached(&self) -> Vec<T> {
        self.shared.borrow().cache.clone()
    }

    /// Values in `start..end`, producing up to `end - 1` and truncating at exhaustion.
    ///
    /// A read from inside the sequence's own producer also truncates, to what is cached; see
    /// [`Stream::try_slice`] for the checked form.
    pub fn slice(&self, start: usize, end: usize) -> Vec<T> {
        if start >= end {
            return Vec::new();
        }
        if let Fill::Reentrant = self.force(end - 1) {
            trace!(end, "slice truncated by a read from inside its own producer");
        }
        let s = self.shared.borrow();
        let end = end.min(s.cache.len());
        if start >= end {
            return Vec::new();
        }
        s.cache[start..end].to_vec()
    }
}

impl<T: Clone + 'static> LazySeq<T> {
    /// A new lazy sequence over a fresh cursor of this one, keeping values matching `pred`.
    ///
    /// The filtered sequence has its own cache; pulling from it pulls from `self` as needed.
    pub fn filter<F>(&self, mut pred: F) -> LazySeq<T>
    where
        F: FnMut(&T) -> bool + 'static,
    {
        LazySeq::new(self.iter().filter(move |v| pred(v)))
    }
}

impl<'a, T: Clone> IntoIterator for &'a LazySeq<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

enum Handle<T> {
    Strong(Rc<RefCell<Shared<T>>>),
    Weak(Weak<RefCell<Shared<T>>>),
}

/// A read position over a [`LazySeq`].
///
/// A cursor only advances when it yields a value, so a cursor over a [`Stream`] that ran dry
/// picks up again after more producers are pushed.
pub struct Cursor<T> {
    handle: Handle<T>,
    position: usize,
}

impl<T> Cursor<T> {
    pub(crate) fn weak(shared: Weak<RefCell<Shared<T>>>) -> Self {
        Self {
            handle: Handle::Weak(shared),
            position: 0,
        }
    }

    /// Index of the next value this cursor will yield.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let shared = match &self.handle {
            Handle::Strong(rc) => Rc::clone(rc),
            Handle::Weak(weak) => weak.upgrade()?,
        };
        match fill_to(&shared, self.position) {
            Fill::Ready => {
                let value = shared.borrow().cache.get(self.position).cloned();
                if value.is_some() {
                    self.position += 1;
                }
                value
            }
            Fill::Exhausted | Fill::Reentrant => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting(limit: u32, calls: Rc<Cell<u32>>) -> impl Iterator<Item = u32> {
        (0..limit).inspect(move |_| calls.set(calls.get() + 1))
    }

    #[test]
    fn replays_cache_without_rerunning_producer() {
        let calls = Rc::new(Cell::new(0));
        let seq = LazySeq::new(counting(5, calls.clone()));

        let first: Vec<u32> = seq.iter().collect();
        let second: Vec<u32> = seq.iter().collect();

        assert_eq!(first, vec![0, 1, 2, 3, 4]);
        assert_eq!(first, second);
        assert_eq!(calls.get(), 5);
        assert!(seq.is_finished());
    }

    #[test]
    fn cursors_share_forward_progress() {
        let calls = Rc::new(Cell::new(0));
        let seq = LazySeq::new(counting(100, calls.clone()));

        let mut a = seq.iter();
        assert_eq!(a.next(), Some(0));
        assert_eq!(a.next(), Some(1));
        assert_eq!(a.next(), Some(2));
        assert_eq!(calls.get(), 3);

        // A new cursor replays the cache first, then continues into live production.
        let b: Vec<u32> = seq.iter().take(5).collect();
        assert_eq!(b, vec![0, 1, 2, 3, 4]);
        assert_eq!(calls.get(), 5);

        assert_eq!(a.next(), Some(3));
        assert_eq!(calls.get(), 5);
        assert!(!seq.is_finished());
    }

    #[test]
    fn empty_sequence_yields_nothing() {
        let seq: LazySeq<u8> = LazySeq::new(std::iter::empty());
        assert_eq!(seq.iter().next(), None);
        assert!(seq.is_finished());
        assert_eq!(seq.iter().count(), 0);

        let none: LazySeq<u8> = LazySeq::empty();
        assert!(none.is_finished());
        assert_eq!(none.first(), None);
    }

    #[test]
    fn get_forces_only_up_to_index() {
        let seq = LazySeq::new(0u64..);
        assert_eq!(seq.get(9), Some(9));
        assert_eq!(seq.cached_len(), 10);
        assert_eq!(seq.get(3), Some(3));
        assert_eq!(seq.cached_len(), 10);
    }

    #[test]
    fn slice_truncates_at_exhaustion() {
        let seq = LazySeq::new(vec!['a', 'b', 'c']);
        assert_eq!(seq.slice(1, 10), vec!['b', 'c']);
        assert_eq!(seq.slice(2, 1), Vec::<char>::new());
        assert_eq!(seq.slice(5, 7), Vec::<char>::new());
    }

    #[test]
    fn filter_pulls_lazily_from_source() {
        let source = LazySeq::new(1u32..);
        let evens = source.filter(|n| n % 2 == 0);

        assert_eq!(evens.get(2), Some(6));
        assert_eq!(source.cached_len(), 6);
        assert_eq!(evens.cached(), vec![2, 4, 6]);
    }
}
