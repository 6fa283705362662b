use crate::Error;
use std::io::BufRead;

pub(crate) mod private {
    pub trait Sealed {}
}

/// A trait used by [`Decoder`](crate::Decoder) to abstract over input types.
///
/// Shared strings refer back into the already consumed input, so every implementation can seek to any position it
/// has already reached.
///
/// This trait is sealed and cannot be implemented outside of `binpack`. The contents of the trait are not
/// considered part of the crate's public API and are subject to change at any time.
pub trait Read: private::Sealed {
    #[doc(hidden)]
    fn next(&mut self) -> Result<Option<u8>, Error>;

    #[doc(hidden)]
    fn peek(&mut self) -> Result<Option<u8>, Error>;

    #[doc(hidden)]
    fn read(&mut self, n: usize) -> Result<Option<&[u8]>, Error>;

    #[doc(hidden)]
    fn position(&self) -> usize;

    /// Moves the cursor to a position at or before the furthest position read so far.
    #[doc(hidden)]
    fn seek(&mut self, position: usize);
}

/// A [`Read`] implementation for shared slices.
pub struct SliceRead<'a> {
    slice: &'a [u8],
    index: usize,
}

impl<'a> SliceRead<'a> {
    /// Creates a new `SliceRead`.
    pub fn new(slice: &'a [u8]) -> Self {
        SliceRead { slice, index: 0 }
    }
}

impl private::Sealed for SliceRead<'_> {}

impl Read for SliceRead<'_> {
    #[inline]
    fn next(&mut self) -> Result<Option<u8>, Error> {
        if self.index < self.slice.len() {
            let ch = self.slice[self.index];
            self.index += 1;
            Ok(Some(ch))
        } else {
            Ok(None)
        }
    }

    #[inline]
    fn peek(&mut self) -> Result<Option<u8>, Error> {
        Ok(self.slice.get(self.index).copied())
    }

    #[inline]
    fn read(&mut self, n: usize) -> Result<Option<&[u8]>, Error> {
        let s = &self.slice[self.index..];
        if n <= s.len() {
            self.index += n;
            Ok(Some(&s[..n]))
        } else {
            Ok(None)
        }
    }

    #[inline]
    fn position(&self) -> usize {
        self.index
    }

    fn seek(&mut self, position: usize) {
        assert!(position <= self.slice.len());
        self.index = position;
    }
}

/// A [`Read`] implementation for buffered IO streams.
///
/// Every consumed byte is kept in memory so that back-references can be resolved.
pub struct IoRead<R> {
    reader: R,
    history: Vec<u8>,
    index: usize,
}

impl<R> IoRead<R>
where
    R: BufRead,
{
    /// Creates a new `IoRead`.
    pub fn new(reader: R) -> Self {
        IoRead {
            reader,
            history: vec![],
            index: 0,
        }
    }

    /// Returns a shared reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Returns a mutable reference to the inner reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes the `IoRead`, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    // Makes sure `n` bytes past the cursor are in the history, returning `false` on a premature EOF.
    fn fill(&mut self, n: usize) -> Result<bool, Error> {
        let target = match self.index.checked_add(n) {
            Some(target) => target,
            None => return Ok(false),
        };
        if target <= self.history.len() {
            return Ok(true);
        }

        // limit growth up front so a bogus length can't allocate unbounded memory
        self.history
            .reserve(usize::min(target - self.history.len(), 16 * 1024));

        while self.history.len() < target {
            let buf = self.reader.fill_buf().map_err(Error::io)?;
            if buf.is_empty() {
                return Ok(false);
            }

            let len = usize::min(target - self.history.len(), buf.len());
            self.history.extend_from_slice(&buf[..len]);
            self.reader.consume(len);
        }

        Ok(true)
    }
}

impl<R> private::Sealed for IoRead<R> {}

impl<R> Read for IoRead<R>
where
    R: BufRead,
{
    fn next(&mut self) -> Result<Option<u8>, Error> {
        let r = self.peek();
        if let Ok(Some(_)) = r {
            self.index += 1;
        }
        r
    }

    fn peek(&mut self) -> Result<Option<u8>, Error> {
        if self.fill(1)? {
            Ok(Some(self.history[self.index]))
        } else {
            Ok(None)
        }
    }

    fn read(&mut self, n: usize) -> Result<Option<&[u8]>, Error> {
        if self.fill(n)? {
            let start = self.index;
            self.index += n;
            Ok(Some(&self.history[start..self.index]))
        } else {
            Ok(None)
        }
    }

    fn position(&self) -> usize {
        self.index
    }

    fn seek(&mut self, position: usize) {
        assert!(position <= self.history.len());
        self.index = position;
    }
}
