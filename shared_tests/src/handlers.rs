//! Handler functions that are generic over the resolver type, so the same ones
//! can be bound in every type of resolver under test.
//!
//! Numbers are `i64`s, given as atomic arguments in decimal.

use callex::{Error, Handler, Value, Resolver, HandlerFn, OutcomeOf, iter_args, escape::unescape};


/// The errors of our handlers.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum TestError {
    /// A name with no binding
    #[error("unbound: {0}")]
    Unbound(String),
    /// An atomic argument that is not a number
    #[error("not a number: {0}")]
    NotANumber(String),
    /// A handler given the wrong number of arguments
    #[error("expected {expected} arguments but got {got}")]
    Arity {
        /// How many the handler takes
        expected: usize,
        /// How many it was given
        got: usize,
    },
    /// An argument that is a handler where a number is expected
    #[error("not a number: handler")]
    HandlerArg,
    /// From `fail`
    #[error("boom")]
    Boom,
}

/// What our resolvers are given for making errors for unbound names.
pub fn unbound(name: &[u8]) -> TestError {
    TestError::Unbound(String::from_utf8_lossy(name).into_owned())
}

/// The form of bindings of our handlers, for any resolver type.
pub type Bindings<'s, R> = Vec<(&'static [u8], HandlerFn<'s, R, i64, TestError>)>;

/// All of our handlers, paired with the names they are bound to in the test
/// suites.
pub fn bindings<'s, R>() -> Bindings<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    let bindings: [(&'static [u8], HandlerFn<'s, R, i64, TestError>); 8] = [
        (b"add", add),
        (b"num", num),
        (b"id", id),
        (b"count", count),
        (b"quote", quote),
        (b"first", first),
        (b"adder", adder),
        (b"fail", fail),
    ];
    bindings.into()
}


fn number<'s, R>(value: OutcomeOf<'s, R>) -> Result<i64, Error<TestError>>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    match value? {
        Value::Extra(n) => Ok(n),
        Value::Raw(raw) => {
            let text = String::from_utf8_lossy(&unescape(raw)).into_owned();
            text.parse().map_err(|_| Error::Handler(TestError::NotANumber(text)))
        }
        Value::Handler(_) => Err(Error::Handler(TestError::HandlerArg)),
    }
}

/// The sum of all the arguments, evaluated as numbers.  `(add)` is zero.
pub fn add<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    let mut sum = 0;
    for value in iter_args(resolver, args) {
        sum += number::<R>(value)?;
    }
    Ok(Value::Extra(sum))
}

/// The single argument, evaluated as a number.
pub fn num<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    Ok(Value::Extra(number::<R>(id(resolver, args))?))
}

/// The single argument, evaluated.
pub fn id<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    let mut values = iter_args(resolver, args);
    match (values.next(), values.next()) {
        (Some(value), None) => value,
        (None, _) => Err(Error::Handler(TestError::Arity { expected: 1, got: 0 })),
        (Some(_), Some(_)) => Err(Error::Handler(TestError::Arity {
            expected: 1,
            got: 2 + values.count(),
        })),
    }
}

/// How many arguments there are, after evaluating all of them.
pub fn count<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    let mut n = 0;
    for value in iter_args(resolver, args) {
        let _ = value?;
        n += 1;
    }
    Ok(Value::Extra(n))
}

/// The arguments, unevaluated, as one atomic value.  `(quote)` is empty.
pub fn quote<'s, R>(_: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    Ok(Value::Raw(args.unwrap_or_default()))
}

/// The first argument, evaluated, without evaluating or even checking the
/// rest.  `(first)` fails.
pub fn first<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    iter_args(resolver, args)
        .next()
        .unwrap_or(Err(Error::Handler(TestError::Arity { expected: 1, got: 0 })))
}

/// The `add` handler, as a value, ignoring any arguments.
pub fn adder<'s, R>(_: &R, _: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    Ok(Value::Handler(Handler::Func(add)))
}

/// Always fails, without evaluating any arguments.
pub fn fail<'s, R>(_: &R, _: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    Err(Error::Handler(TestError::Boom))
}
