//! Positional evaluation.  Nothing is parsed ahead of time: each call site is
//! scanned only as far as its first top-level pipe, and each argument list is
//! scanned one argument at a time, as the handler asks for them.

use core::{convert::Infallible, fmt, iter::FusedIterator};

use tracing::{debug, trace};

use crate::{
    Error, Value, OPEN, CLOSE, PIPE, ESCAPE,
    resolver::{Resolver, OutcomeOf},
    show::Lossy,
};


/// Whether the given expression is a call, as opposed to atomic.
#[inline]
pub fn is_call(expression: &[u8]) -> bool {
    expression.first() == Some(&OPEN)
}

/// Evaluate the given expression with the given resolver.
///
/// An atomic expression, i.e. one that is empty or does not begin with `(`,
/// is returned as [`Value::Raw`] and this never fails.
///
/// A call is scanned until its first unescaped `|` that is not inside nested
/// brackets.  The bytes before that are the name, which is given to
/// [`Resolver::resolve`], and the bytes after it, up to the final `)`, are the
/// arguments, which are given to the resolved handler without being
/// evaluated.  If there is no such `|`, the whole inside of the brackets is the
/// name and the handler is given `None` as its arguments.  Whatever the
/// handler returns is returned.
///
/// The rest of a call, after the first top-level `|`, is not checked here.  A
/// handler that never evaluates some of its arguments never causes errors for
/// them to be detected.
pub fn evaluate<'s, R>(resolver: &R, expression: &'s [u8]) -> OutcomeOf<'s, R>
    where R: Resolver<'s> + ?Sized,
{
    if !is_call(expression) {
        return Ok(Value::Raw(expression));
    }
    let (name, args) = split_call(expression, resolver.nesting_limit())
        .map_err(|error| {
            debug!(expression = %Lossy(expression), ?error, "malformed call");
            widen::<R::HandlerError>(error)
        })?;
    trace!(name = %Lossy(name), args = ?args.map(Lossy), "invoking");
    resolver.resolve(name).invoke(resolver, args)
}

/// Make an iterator that evaluates, one at a time, the arguments in the given
/// unevaluated bytes that a handler was given.
///
/// `None`, i.e. the absence of arguments as in `(name)`, yields nothing.
/// Otherwise the bytes are split at every unescaped `|` that is not inside
/// nested brackets, and each part is [evaluated](fn.evaluate.html), so there
/// is always one more item than such pipes.  Empty bytes, as in `(name|)`, are
/// a single empty atomic argument.
///
/// An error is yielded for an unmatched `)` as soon as it is reached, and for
/// an unmatched `(` when the end is reached, and then the iterator is done.
/// Errors from evaluating an argument are yielded in its place.  Collecting
/// into a `Result` stops at the first error.
#[inline]
pub fn iter_args<'r, 's, R>(resolver: &'r R, args: Option<&'s [u8]>) -> Args<'r, 's, R>
    where R: Resolver<'s> + ?Sized,
{
    Args { resolver, rest: args }
}


/// The iterator returned by [`iter_args`](fn.iter_args.html).
pub struct Args<'r, 's, R: ?Sized> {
    resolver: &'r R,
    /// What remains to be split and evaluated.  `None` once done.
    rest: Option<&'s [u8]>,
}

impl<'r, 's, R> Args<'r, 's, R>
    where R: Resolver<'s> + ?Sized,
{
    /// The bytes of the arguments not yet evaluated, if any remain.
    #[inline]
    pub fn remaining(&self) -> Option<&'s [u8]> {
        self.rest
    }
}

impl<'r, 's, R> Iterator for Args<'r, 's, R>
    where R: Resolver<'s> + ?Sized,
{
    type Item = OutcomeOf<'s, R>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.take()?;
        match find_top_level_pipe(rest, self.resolver.nesting_limit()) {
            Ok(Some(pipe)) => {
                self.rest = Some(&rest[pipe + 1 ..]);
                Some(evaluate(self.resolver, &rest[.. pipe]))
            }
            Ok(None) => Some(evaluate(self.resolver, rest)),
            Err(error) => {
                debug!(args = %Lossy(rest), ?error, "malformed arguments");
                Some(Err(widen(error)))
            }
        }
    }
}

impl<'r, 's, R> FusedIterator for Args<'r, 's, R>
    where R: Resolver<'s> + ?Sized,
{}

impl<R: ?Sized> fmt::Debug for Args<'_, '_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
         .field("rest", &self.rest.map(Lossy))
         .finish_non_exhaustive()
    }
}


/// The errors that scanning finds, which are never handler errors.
type ScanError = Error<Infallible>;

fn widen<HE>(error: ScanError) -> Error<HE> {
    match error {
        Error::MissingCloseBracket => Error::MissingCloseBracket,
        Error::MismatchedCloseBracket => Error::MismatchedCloseBracket,
        Error::MismatchedOpenBracket => Error::MismatchedOpenBracket,
        Error::NotAFunction => Error::NotAFunction,
        Error::NestingTooDeep { limit } => Error::NestingTooDeep { limit },
        Error::Handler(never) => match never {},
    }
}

/// Split a call into its name and its unevaluated arguments.  The call must
/// begin with `(`.
fn split_call(call: &[u8], limit: usize) -> Result<(&[u8], Option<&[u8]>), ScanError> {
    debug_assert!(is_call(call));
    let last = call.len() - 1;
    if last == 0 || call[last] != CLOSE {
        return Err(Error::MissingCloseBracket);
    }
    let inside = &call[1 .. last];
    Ok(match find_top_level_pipe(inside, limit)? {
        Some(pipe) => (&inside[.. pipe], Some(&inside[pipe + 1 ..])),
        None => (inside, None),
    })
}

/// Scan for the first unescaped `|` that is not inside brackets.  Brackets are
/// only tracked as far as the scan goes, so when one is found, nothing after
/// it has been checked.  When none is found, the brackets of the whole input
/// must balance.
fn find_top_level_pipe(bytes: &[u8], limit: usize) -> Result<Option<usize>, ScanError> {
    let mut nesting: usize = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            // Skip whatever is escaped, even past the end.
            ESCAPE => pos += 1,
            PIPE if nesting == 0 => return Ok(Some(pos)),
            OPEN => {
                nesting += 1;
                if nesting > limit {
                    return Err(Error::NestingTooDeep { limit });
                }
            }
            CLOSE => {
                if nesting == 0 {
                    return Err(Error::MismatchedCloseBracket);
                }
                nesting -= 1;
            }
            _ => {}
        }
        pos += 1;
    }
    if nesting == 0 {
        Ok(None)
    } else {
        Err(Error::MismatchedOpenBracket)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Handler, HandlerOf, Outcome};

    /// Resolves `id` to a handler that evaluates its single argument, `nth`
    /// to one that counts its evaluated arguments, `quote` to one that returns
    /// its arguments unevaluated, and `head` to one that evaluates only its
    /// first argument.  Anything else fails.
    struct Basic;

    type BasicOutcome<'s> = Outcome<'s, Basic, usize, &'static str>;

    fn id<'s>(r: &Basic, args: Option<&'s [u8]>) -> BasicOutcome<'s> {
        let mut args = iter_args(r, args);
        match (args.next(), args.next()) {
            (Some(value), None) => value,
            _ => Err(Error::Handler("id takes one argument")),
        }
    }

    fn count<'s>(r: &Basic, args: Option<&'s [u8]>) -> BasicOutcome<'s> {
        let mut n = 0;
        for value in iter_args(r, args) {
            let _ = value?;
            n += 1;
        }
        Ok(Value::Extra(n))
    }

    fn quote<'s>(_: &Basic, args: Option<&'s [u8]>) -> BasicOutcome<'s> {
        args.map(Value::Raw).ok_or(Error::Handler("nothing to quote"))
    }

    fn head<'s>(r: &Basic, args: Option<&'s [u8]>) -> BasicOutcome<'s> {
        iter_args(r, args).next().unwrap_or(Err(Error::Handler("no head")))
    }

    fn itself<'s>(_: &Basic, _: Option<&'s [u8]>) -> BasicOutcome<'s> {
        Ok(Value::Handler(Handler::Func(count)))
    }

    impl<'s> Resolver<'s> for Basic {
        type Extra = usize;
        type HandlerError = &'static str;

        fn lookup(&self, name: &'s [u8]) -> HandlerOf<'s, Self> {
            match name {
                b"id" => Handler::Func(id),
                b"count" => Handler::Func(count),
                b"quote" => Handler::Func(quote),
                b"head" => Handler::Func(head),
                b"counter" => Handler::Func(itself),
                _ => Handler::Fail(Error::Handler("unbound")),
            }
        }
    }

    fn raw(outcome: BasicOutcome<'_>) -> Result<&[u8], Error<&'static str>> {
        outcome.map(|v| v.as_raw().unwrap_or(&b"<not raw>"[..]))
    }

    fn extra(outcome: BasicOutcome<'_>) -> Result<usize, Error<&'static str>> {
        outcome.map(|v| v.into_extra().unwrap_or(usize::MAX))
    }

    #[test]
    fn atomic() {
        assert_eq!(raw(evaluate(&Basic, b"")), Ok(&b""[..]));
        assert_eq!(raw(evaluate(&Basic, b"abc")), Ok(&b"abc"[..]));
        assert_eq!(raw(evaluate(&Basic, b"a(b|c)")), Ok(&b"a(b|c)"[..]));
        assert_eq!(raw(evaluate(&Basic, b")")), Ok(&b")"[..]));
        assert_eq!(raw(evaluate(&Basic, br"\(x")), Ok(&br"\(x"[..]));
    }

    #[test]
    fn call() {
        assert_eq!(raw(evaluate(&Basic, b"(id|abc)")), Ok(&b"abc"[..]));
        assert_eq!(raw(evaluate(&Basic, b"(id|(id|(id|deep)))")), Ok(&b"deep"[..]));
        assert_eq!(raw(evaluate(&Basic, br"(id|a\|b)")), Ok(&br"a\|b"[..]));
        assert_eq!(raw(evaluate(&Basic, br"(id|a\)b)")), Ok(&br"a\)b"[..]));
        assert_eq!(raw(evaluate(&Basic, br"(id|\\)")), Ok(&br"\\"[..]));
        assert_eq!(evaluate(&Basic, b"(nope|x)").map(|_| ()),
                   Err(Error::Handler("unbound")));
    }

    #[test]
    fn absent_versus_empty() {
        assert_eq!(extra(evaluate(&Basic, b"(count)")), Ok(0));
        assert_eq!(extra(evaluate(&Basic, b"(count|)")), Ok(1));
        assert_eq!(extra(evaluate(&Basic, b"(count||)")), Ok(2));
        assert_eq!(raw(evaluate(&Basic, b"(id|)")), Ok(&b""[..]));
        assert_eq!(evaluate(&Basic, b"(quote)").map(|_| ()),
                   Err(Error::Handler("nothing to quote")));
    }

    #[test]
    fn arguments_are_unevaluated() {
        assert_eq!(raw(evaluate(&Basic, b"(quote|(nope)|x)")), Ok(&b"(nope)|x"[..]));
        assert_eq!(raw(evaluate(&Basic, b"(quote|(x|y))")), Ok(&b"(x|y)"[..]));
        // Malformed arguments that are never evaluated never fail.
        assert_eq!(raw(evaluate(&Basic, b"(quote|))")), Ok(&b")"[..]));
        assert_eq!(raw(evaluate(&Basic, b"(head|a|))")), Ok(&b"a"[..]));
        assert_eq!(raw(evaluate(&Basic, b"(head|a|(nope)|(()")), Ok(&b"a"[..]));
    }

    #[test]
    fn argument_count() {
        assert_eq!(extra(evaluate(&Basic, b"(count|a|b|c)")), Ok(3));
        assert_eq!(extra(evaluate(&Basic, b"(count|(id|a|b)|c)")),
                   Err(Error::Handler("id takes one argument")));
        assert_eq!(extra(evaluate(&Basic, b"(count|(quote|a|b)|c)")), Ok(2));
        assert_eq!(extra(evaluate(&Basic, br"(count|a\|b|c)")), Ok(2));
        assert_eq!(extra(evaluate(&Basic, b"(count|(count|a|b)||)")), Ok(3));
    }

    #[test]
    fn name_is_call() {
        assert_eq!(extra(evaluate(&Basic, b"((counter)|a|b)")), Ok(2));
        assert_eq!(extra(evaluate(&Basic, b"(((counter)))")),
                   Err(Error::NotAFunction));
        assert_eq!(evaluate(&Basic, b"((id|x)|y)").map(|_| ()), Err(Error::NotAFunction));
        assert_eq!(evaluate(&Basic, b"((nope)|y)").map(|_| ()),
                   Err(Error::Handler("unbound")));
        assert_eq!(evaluate(&Basic, b"((id|(x)|y)").map(|_| ()),
                   Err(Error::MismatchedOpenBracket));
    }

    #[test]
    fn missing_close() {
        assert_eq!(evaluate(&Basic, b"(").map(|_| ()), Err(Error::MissingCloseBracket));
        assert_eq!(evaluate(&Basic, b"(x").map(|_| ()), Err(Error::MissingCloseBracket));
        assert_eq!(evaluate(&Basic, br"(x\)").map(|_| ()), Err(Error::Handler("unbound")));
        assert_eq!(evaluate(&Basic, b"(x|y").map(|_| ()), Err(Error::MissingCloseBracket));
    }

    #[test]
    fn mismatched() {
        assert_eq!(evaluate(&Basic, b"(x))").map(|_| ()), Err(Error::MismatchedCloseBracket));
        assert_eq!(evaluate(&Basic, b"((x)").map(|_| ()), Err(Error::MismatchedOpenBracket));
        assert_eq!(evaluate(&Basic, b"(id|(x)))").map(|_| ()),
                   Err(Error::MismatchedCloseBracket));
        assert_eq!(evaluate(&Basic, b"(id|()").map(|_| ()),
                   Err(Error::MismatchedOpenBracket));
        assert_eq!(evaluate(&Basic, b"(count|a)|b)").map(|_| ()),
                   Err(Error::MismatchedCloseBracket));
    }

    #[test]
    fn args_iterator() {
        let mut it = iter_args(&Basic, Some(&b"a|(id|b)|"[..]));
        assert_eq!(raw(it.next().unwrap()), Ok(&b"a"[..]));
        assert_eq!(it.remaining(), Some(&b"(id|b)|"[..]));
        assert_eq!(raw(it.next().unwrap()), Ok(&b"b"[..]));
        assert_eq!(raw(it.next().unwrap()), Ok(&b""[..]));
        assert!(it.next().is_none());
        assert!(it.next().is_none());

        assert!(iter_args(&Basic, None).next().is_none());

        let mut it = iter_args(&Basic, Some(&b"a|b)|c"[..]));
        assert_eq!(raw(it.next().unwrap()), Ok(&b"a"[..]));
        assert_eq!(it.next().map(|r| r.map(|_| ())), Some(Err(Error::MismatchedCloseBracket)));
        assert!(it.next().is_none());
    }

    #[test]
    fn nesting_limit() {
        struct Shallow;

        impl<'s> Resolver<'s> for Shallow {
            type Extra = ();
            type HandlerError = ();

            fn lookup(&self, _name: &'s [u8]) -> HandlerOf<'s, Self> {
                Handler::Func(|r, args| iter_args(r, args).last().unwrap_or(Ok(Value::Extra(()))))
            }

            fn nesting_limit(&self) -> usize {
                2
            }
        }

        assert!(evaluate(&Shallow, b"(f|(g|(h)))").is_ok());
        assert!(matches!(evaluate(&Shallow, b"(f|(g|(h|(i))))"),
                         Err(Error::NestingTooDeep { limit: 2 })));
        assert!(matches!(evaluate(&Shallow, b"((((f))))"),
                         Err(Error::NestingTooDeep { limit: 2 })));
    }

    #[test]
    fn split() {
        assert_eq!(split_call(b"()", 8), Ok((&b""[..], None)));
        assert_eq!(split_call(b"(a|)", 8), Ok((&b"a"[..], Some(&b""[..]))));
        assert_eq!(split_call(b"((a|b)|c|d)", 8),
                   Ok((&b"(a|b)"[..], Some(&b"c|d"[..]))));
        assert_eq!(split_call(br"(\||\()", 8), Ok((&br"\|"[..], Some(&br"\("[..]))));
        assert_eq!(find_top_level_pipe(b"", 8), Ok(None));
        assert_eq!(find_top_level_pipe(b"|", 8), Ok(Some(0)));
        assert_eq!(find_top_level_pipe(br"\", 8), Ok(None));
        assert_eq!(find_top_level_pipe(br"\\|", 8), Ok(Some(2)));
    }
}
