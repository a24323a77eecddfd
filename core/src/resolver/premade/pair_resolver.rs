use core::fmt;

use crate::{
    Error, Handler, HandlerFn, DEFAULT_NESTING_LIMIT,
    resolver::{Resolver, HandlerOf},
};


/// A name paired with the handler function bound to it, as held by
/// [`PairResolver`](struct.PairResolver.html).
pub type PairBinding<'p, 's, Extra, HandlerError>
    = (&'p [u8],
       HandlerFn<'s, PairResolver<'p, 's, Extra, HandlerError>, Extra, HandlerError>);


/// A [`Resolver`] that binds names to handler functions using a slice of
/// pairs (2-tuples) of them.
///
/// You are responsible for initializing the slice with the desired bindings.
/// It may be replaced in between evaluations, if desired.  Names are compared
/// exactly, as the bytes appear in the input, and the first matching pair
/// wins.
///
/// Names without a binding resolve to a handler that fails with
/// [`Error::Handler`] holding whatever the `unbound` function makes of the
/// name.
///
/// [`Resolver`]: ../trait.Resolver.html
/// [`Error::Handler`]: ../../enum.Error.html#variant.Handler
pub struct PairResolver<'p, 's, Extra, HandlerError> {
    /// The bindings of names to handler functions.  You must initialize and
    /// manage this yourself.
    pub pairs: &'p [PairBinding<'p, 's, Extra, HandlerError>],
    /// Makes the error for a name that has no binding.
    pub unbound: fn(&[u8]) -> HandlerError,
    /// See [`Resolver::nesting_limit`](../trait.Resolver.html#method.nesting_limit).
    pub nesting_limit: usize,
}

impl<'p, 's, E, HE> PairResolver<'p, 's, E, HE> {
    /// Given a slice of pairs of names with handler functions, and a function
    /// that makes errors for unbound names, make a new instance of `Self` that
    /// uses them and the default nesting limit.
    #[inline]
    pub fn new(pairs: &'p [PairBinding<'p, 's, E, HE>], unbound: fn(&[u8]) -> HE) -> Self {
        Self {
            pairs,
            unbound,
            nesting_limit: DEFAULT_NESTING_LIMIT,
        }
    }
}

impl<'p, 's, E, HE> Resolver<'s> for PairResolver<'p, 's, E, HE> {
    type Extra = E;
    type HandlerError = HE;

    fn lookup(&self, name: &'s [u8]) -> HandlerOf<'s, Self> {
        self.pairs.iter().find_map(
            |&(bound, func)|
            if bound == name {
                Some(Handler::Func(func))
            } else {
                None
            })
            .unwrap_or_else(|| Handler::Fail(Error::Handler((self.unbound)(name))))
    }

    #[inline]
    fn nesting_limit(&self) -> usize {
        self.nesting_limit
    }
}

impl<E, HE> fmt::Debug for PairResolver<'_, '_, E, HE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairResolver")
         .field("pairs", &self.pairs.len())
         .field("nesting_limit", &self.nesting_limit)
         .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Value, Outcome, evaluate};

    type PR<'p, 's> = PairResolver<'p, 's, u32, &'static str>;

    fn one<'p, 's>(_: &PR<'p, 's>, _: Option<&'s [u8]>) -> Outcome<'s, PR<'p, 's>, u32, &'static str> {
        Ok(Value::Extra(1))
    }

    fn two<'p, 's>(_: &PR<'p, 's>, _: Option<&'s [u8]>) -> Outcome<'s, PR<'p, 's>, u32, &'static str> {
        Ok(Value::Extra(2))
    }

    fn unbound(_: &[u8]) -> &'static str {
        "unbound"
    }

    #[test]
    fn empty_slice() {
        let r = PR::new(&[], unbound);
        assert!(matches!(r.lookup(b"foo"), Handler::Fail(Error::Handler("unbound"))));
        assert!(matches!(evaluate(&r, b"(foo)"), Err(Error::Handler("unbound"))));
    }

    #[test]
    fn first_match_wins() {
        let pairs: [PairBinding<'_, '_, u32, &'static str>; 3] = [
            (b"one", one),
            (b"two", two),
            (b"one", two),
        ];
        let r = PR::new(&pairs, unbound);
        assert!(matches!(evaluate(&r, b"(one)"), Ok(Value::Extra(1))));
        assert!(matches!(evaluate(&r, b"(two|x)"), Ok(Value::Extra(2))));
        assert!(matches!(evaluate(&r, b"(three)"), Err(Error::Handler("unbound"))));
        // Names are compared as they appear, still escaped.
        assert!(matches!(evaluate(&r, br"(o\ne)"), Err(Error::Handler("unbound"))));
    }

    #[test]
    fn replace_pairs() {
        let first: [PairBinding<'_, '_, u32, &'static str>; 1] = [(b"n", one)];
        let second: [PairBinding<'_, '_, u32, &'static str>; 1] = [(b"n", two)];
        let mut r = PR::new(&first, unbound);
        assert!(matches!(evaluate(&r, b"(n)"), Ok(Value::Extra(1))));
        r.pairs = &second;
        assert!(matches!(evaluate(&r, b"(n)"), Ok(Value::Extra(2))));
    }

    #[test]
    fn nesting_limit_field() {
        let mut r = PR::new(&[], unbound);
        assert_eq!(r.nesting_limit(), DEFAULT_NESTING_LIMIT);
        r.nesting_limit = 1;
        assert!(matches!(evaluate(&r, b"(((x)))"),
                         Err(Error::NestingTooDeep { limit: 1 })));
    }
}
