//! Additional, more convenient, functionality, which leverages the Rust
//! standard library, layered on top of [`callex_core`].
//!
//! This crate:
//!
//! * Re-exports all of [`callex_core`].
//!
//! * Provides [`evaluate_args`], for handlers that want all of their arguments
//! evaluated at once into a `Vec`.
//!
//! * Provides [`escape`](escape/fn.escape.html) and
//! [`unescape`](escape/fn.unescape.html) functions that only allocate when the
//! bytes actually change.
//!
//! * Provides a [`HashMapResolver`](resolver/struct.HashMapResolver.html), for
//! binding handlers by name when there are many of them or when they are
//! bound dynamically.
//!
//! Unlike [`callex_core`], this crate's premade items are placed at the top of
//! their respective modules, including the premade items re-exported from
//! `callex_core`.
//!
//! [`callex_core`]: ../callex_core/index.html


#![forbid(unsafe_code)]


pub use callex_core::*;

/// Resolvers, with the premade ones at the top.
pub mod resolver {
    pub use callex_core::resolver::{*, premade::*};

    mod hashmap_resolver;
    pub use hashmap_resolver::HashMapResolver;
}

pub mod escape;


/// Evaluate all of the given unevaluated arguments, in order, and collect
/// their values.
///
/// `None`, i.e. the absence of arguments, gives an empty `Vec`.  Otherwise
/// there is always one more value than there are top-level pipes, and empty
/// bytes give a single empty atomic value.  Stops at, and returns, the first
/// error, which may be a structural error of the argument list itself.
///
/// Use [`iter_args`](fn.iter_args.html) instead to evaluate only some of the
/// arguments, or to avoid allocation.
pub fn evaluate_args<'s, R>(resolver: &R, args: Option<&'s [u8]>)
                            -> Result<Vec<ValueOf<'s, R>>, ErrorOf<'s, R>>
    where R: Resolver<'s> + ?Sized,
{
    iter_args(resolver, args).collect()
}
