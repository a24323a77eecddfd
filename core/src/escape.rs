//! Escaping of the bytes that are special in the notation, so that arbitrary
//! bytes can be given as atomic arguments.
//!
//! Only `\`, `(`, `)`, and `|` are ever escaped, each by preceding it with
//! `\`.  These are adapters over byte iterators, so they need no allocation;
//! the `callex` crate builds owned or borrowed buffers from them.

use core::iter::FusedIterator;

use crate::{OPEN, CLOSE, PIPE, ESCAPE};


/// Whether the byte must be escaped to appear literally.
#[inline]
pub fn is_special(byte: u8) -> bool {
    matches!(byte, OPEN | CLOSE | PIPE | ESCAPE)
}

/// Whether escaping the bytes would change them.
#[inline]
pub fn needs_escape(bytes: &[u8]) -> bool {
    bytes.iter().any(|&b| is_special(b))
}

/// Whether unescaping the bytes would change them.
#[inline]
pub fn needs_unescape(bytes: &[u8]) -> bool {
    bytes.contains(&ESCAPE)
}

/// The length the bytes have once escaped.
#[inline]
pub fn escaped_len(bytes: &[u8]) -> usize {
    bytes.len() + bytes.iter().filter(|&&b| is_special(b)).count()
}


/// Iterator that escapes the bytes of its inner iterator.
#[derive(Clone, Debug)]
pub struct Escaped<I> {
    inner: I,
    pending: Option<u8>,
}

impl<I> Escaped<I> {
    /// Make a new one that escapes the bytes of the given iterator.
    #[inline]
    pub fn new<II>(bytes: II) -> Self
        where II: IntoIterator<IntoIter = I>,
    {
        Self { inner: bytes.into_iter(), pending: None }
    }
}

impl<I> Iterator for Escaped<I>
    where I: Iterator<Item = u8>,
{
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(byte) = self.pending.take() {
            return Some(byte);
        }
        let byte = self.inner.next()?;
        if is_special(byte) {
            self.pending = Some(byte);
            Some(ESCAPE)
        } else {
            Some(byte)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.inner.size_hint();
        let extra = usize::from(self.pending.is_some());
        (lo.saturating_add(extra),
         hi.and_then(|hi| hi.checked_mul(2)).and_then(|hi| hi.checked_add(extra)))
    }
}

impl<I> FusedIterator for Escaped<I>
    where I: FusedIterator<Item = u8>,
{}


/// Iterator that unescapes the bytes of its inner iterator.  An escape byte
/// is dropped and the byte after it is always taken literally, whether or not
/// it is special.  An escape byte at the very end is dropped.
#[derive(Clone, Debug)]
pub struct Unescaped<I> {
    inner: I,
}

impl<I> Unescaped<I> {
    /// Make a new one that unescapes the bytes of the given iterator.
    #[inline]
    pub fn new<II>(bytes: II) -> Self
        where II: IntoIterator<IntoIter = I>,
    {
        Self { inner: bytes.into_iter() }
    }
}

impl<I> Iterator for Unescaped<I>
    where I: Iterator<Item = u8>,
{
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            ESCAPE => self.inner.next(),
            byte => Some(byte),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // A trailing escape byte yields nothing.
        let (lo, hi) = self.inner.size_hint();
        (lo / 2, hi)
    }
}

impl<I> FusedIterator for Unescaped<I>
    where I: FusedIterator<Item = u8>,
{}
