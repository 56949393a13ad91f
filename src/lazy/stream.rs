//! Push-composed streams.
//!
//! A [`Stream`] is a [`LazySeq`] that accepts more producers after construction. Values come
//! out in push order: everything from the first producer, then everything from the second, and
//! so on. Indexing and slicing force production only as far as they need.
//!
//! A producer may read the stream it feeds, as long as it only reads positions that are already
//! produced. This is how infinite, self-referential definitions are written:
//!
//! ```
//! use lazy_pour::lazy::Stream;
//!
//! let fib: Stream<u64> = Stream::new();
//! fib.push([0, 1]);
//! fib.push(
//!     fib.weak_iter()
//!         .zip(fib.weak_iter().skip(1))
//!         .map(|(a, b)| a + b),
//! );
//! assert_eq!(fib.get(20), Some(6765));
//! ```
//!
//! The producer above holds *weak* cursors, so the stream does not keep itself alive.

use std::ops::Range;

use thiserror::Error;

use super::{Cursor, Fill, LazySeq};

/// Contract violations when reading a [`Stream`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("negative stream index {index}")]
    NegativeIndex { index: i64 },
    /// A producer asked for a position of its own stream that it has not produced yet.
    #[error("stream position {index} read from inside its own producer before it was produced")]
    Reentrant { index: usize },
}

/// A lazily produced stream extended by pushing producers.
pub struct Stream<T> {
    seq: LazySeq<T>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Stream").field(&self.seq).finish()
    }
}

impl<T: 'static> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Stream<T> {
    pub fn new() -> Self {
        Self {
            seq: LazySeq::empty(),
        }
    }

    /// Append a producer; its values follow everything pushed before it.
    pub fn push<I>(&self, producer: I) -> &Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        self.seq.append_producer(Box::new(producer.into_iter()));
        self
    }

    /// Builder form of [`Stream::push`].
    pub fn with<I>(self, producer: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        self.push(producer);
        self
    }
}

impl<T> Stream<T> {
    /// Number of values produced so far.
    #[inline]
    pub fn cached_len(&self) -> usize {
        self.seq.cached_len()
    }

    /// True when every pushed producer has run dry. Pushing again reopens the stream.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.seq.is_finished()
    }
}

impl<T: Clone> Stream<T> {
    pub fn iter(&self) -> Cursor<T> {
        self.seq.iter()
    }

    /// A cursor that does not keep the stream alive; use it inside the stream's own producers.
    pub fn weak_iter(&self) -> Cursor<T> {
        Cursor::weak(self.seq.downgrade())
    }

    /// The value at `index`, or `None` if the stream ends first.
    pub fn get(&self, index: usize) -> Option<T> {
        self.seq.get(index)
    }

    /// Like [`Stream::get`], but reports a premature self-read instead of folding it into `None`.
    pub fn try_get(&self, index: usize) -> Result<Option<T>, StreamError> {
        match self.seq.force(index) {
            Fill::Ready | Fill::Exhausted => Ok(self.seq.get(index)),
            Fill::Reentrant => Err(StreamError::Reentrant { index }),
        }
    }

    /// Signed indexing; negative positions are rejected rather than counted from the end.
    pub fn at(&self, index: i64) -> Result<Option<T>, StreamError> {
        let index = usize::try_from(index).map_err(|_| StreamError::NegativeIndex { index })?;
        self.try_get(index)
    }

    /// Materialize `range`, producing up to its upper bound and truncating at exhaustion.
    pub fn slice(&self, range: Range<usize>) -> Vec<T> {
        self.seq.slice(range.start, range.end)
    }

    /// Like [`Stream::slice`], but reports a premature self-read instead of truncating.
    pub fn try_slice(&self, range: Range<usize>) -> Result<Vec<T>, StreamError> {
        if range.start < range.end {
            if let Fill::Reentrant = self.seq.force(range.end - 1) {
                return Err(StreamError::Reentrant {
                    index: range.end - 1,
                });
            }
        }
        Ok(self.slice(range))
    }

    /// The first `n` values.
    pub fn take(&self, n: usize) -> Vec<T> {
        self.slice(0..n)
    }
}

impl<'a, T: Clone> IntoIterator for &'a Stream<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The Fibonacci numbers `0, 1, 1, 2, 3, ...`, defined in terms of the stream itself.
///
/// Ends at the last value that fits in a `u64` (index 93).
pub fn fibonacci() -> Stream<u64> {
    let fib: Stream<u64> = Stream::new();
    fib.push([0, 1]);
    fib.push(
        fib.weak_iter()
            .zip(fib.weak_iter().skip(1))
            .map_while(|(a, b)| a.checked_add(b)),
    );
    fib
}
