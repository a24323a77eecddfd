use std::{
    collections::{HashMap, hash_map::RandomState},
    fmt,
    hash::BuildHasher,
};

use tracing::trace;

use crate::{
    Error, Handler, HandlerFn, DEFAULT_NESTING_LIMIT,
    resolver::{Resolver, HandlerOf},
    show::Lossy,
};


/// A [`Resolver`] that binds names to handler functions using a `HashMap`.
///
/// You are responsible for populating the `hashmap` field with the desired
/// bindings, and it may be dynamically mutated inbetween evaluations, if
/// desired.  Names are compared exactly, as the bytes appear in the input.
///
/// Names without a binding resolve to a handler that fails with
/// [`Error::Handler`] holding whatever the `unbound` function makes of the
/// name.
///
/// [`Resolver`]: ../../callex_core/resolver/trait.Resolver.html
/// [`Error::Handler`]: ../../callex_core/enum.Error.html#variant.Handler
pub struct HashMapResolver<'s, Extra, HandlerError, S = RandomState> {
    /// The handler functions bound to names.  You must populate and manage
    /// this yourself.
    pub hashmap: HashMap<Vec<u8>,
                         HandlerFn<'s, HashMapResolver<'s, Extra, HandlerError, S>,
                                   Extra, HandlerError>,
                         S>,
    /// Makes the error for a name that has no binding.
    pub unbound: fn(&[u8]) -> HandlerError,
    /// See [`Resolver::nesting_limit`](trait.Resolver.html#method.nesting_limit).
    pub nesting_limit: usize,
}

impl<'s, E, HE> HashMapResolver<'s, E, HE> {
    /// Make a new instance of `Self` with an empty `HashMap`, that uses the
    /// given function to make errors for unbound names, and the default
    /// nesting limit.
    #[inline]
    pub fn new(unbound: fn(&[u8]) -> HE) -> Self {
        Self::with_hasher(unbound, RandomState::new())
    }
}

impl<'s, E, HE, S> HashMapResolver<'s, E, HE, S>
    where S: BuildHasher,
{
    /// Like [`new`](#method.new) but the `HashMap` uses the given hash
    /// builder.
    #[inline]
    pub fn with_hasher(unbound: fn(&[u8]) -> HE, hash_builder: S) -> Self {
        Self {
            hashmap: HashMap::with_hasher(hash_builder),
            unbound,
            nesting_limit: DEFAULT_NESTING_LIMIT,
        }
    }

    /// Bind the given name to the given handler function.  Returns the handler
    /// function previously bound to the name, if any.
    #[inline]
    pub fn bind<N>(&mut self, name: N, func: HandlerFn<'s, Self, E, HE>)
                   -> Option<HandlerFn<'s, Self, E, HE>>
        where N: Into<Vec<u8>>,
    {
        self.hashmap.insert(name.into(), func)
    }
}

impl<'s, E, HE, S> Resolver<'s> for HashMapResolver<'s, E, HE, S>
    where S: BuildHasher,
{
    type Extra = E;
    type HandlerError = HE;

    fn lookup(&self, name: &'s [u8]) -> HandlerOf<'s, Self> {
        match self.hashmap.get(name) {
            Some(&func) => Handler::Func(func),
            None => {
                trace!(name = %Lossy(name), "unbound");
                Handler::Fail(Error::Handler((self.unbound)(name)))
            }
        }
    }

    #[inline]
    fn nesting_limit(&self) -> usize {
        self.nesting_limit
    }
}

impl<E, HE, S> fmt::Debug for HashMapResolver<'_, E, HE, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> =
            self.hashmap.keys().map(|name| String::from_utf8_lossy(name)).collect();
        names.sort_unstable();
        f.debug_struct("HashMapResolver")
         .field("names", &names)
         .field("nesting_limit", &self.nesting_limit)
         .finish_non_exhaustive()
    }
}
