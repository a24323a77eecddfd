//! Parts for handlers and the values they produce.

use core::fmt;

use crate::Error;


/// The type of handler functions.  The first argument is the resolver that
/// the evaluation is using, which is also where a handler finds any state it
/// needs.  The second argument is the unevaluated bytes between the first
/// top-level pipe and the closing bracket of the call, or `None` when the call
/// has no pipe at all, e.g. `(name)` as opposed to `(name|)`.
pub type HandlerFn<'s, R, Extra, HandlerError>
    = fn(&R, Option<&'s [u8]>) -> Outcome<'s, R, Extra, HandlerError>;

/// The type returned by evaluation and by handler functions.
pub type Outcome<'s, R, Extra, HandlerError>
    = Result<Value<'s, R, Extra, HandlerError>, Error<HandlerError>>;


/// What a name resolves to, and what a call site invokes with its unevaluated
/// arguments.
///
/// The `R` type parameter is the resolver type that handler functions are
/// given.  It is usually implied by [`HandlerOf`](../type.HandlerOf.html).
pub enum Handler<'s, R: ?Sized, Extra, HandlerError> {
    /// A handler function
    Func(HandlerFn<'s, R, Extra, HandlerError>),
    /// A handler that ignores its arguments and always fails with the error
    Fail(Error<HandlerError>),
}

impl<'s, R: ?Sized, E, HE> Handler<'s, R, E, HE> {
    /// Call the handler with the given resolver and unevaluated arguments.
    #[inline]
    pub fn invoke(self, resolver: &R, args: Option<&'s [u8]>) -> Outcome<'s, R, E, HE> {
        match self {
            Handler::Func(func) => func(resolver, args),
            Handler::Fail(error) => Err(error),
        }
    }
}

/// Make a handler that ignores its arguments and always returns the given
/// error.  Useful as the result of looking up a name that is not bound.
#[inline]
pub fn error_handler<'s, R: ?Sized, E, HE>(error: Error<HE>) -> Handler<'s, R, E, HE> {
    Handler::Fail(error)
}

// Note: Must implement these manually instead of using `derive` because
// `derive` would place bounds on the `R` type parameter.

impl<'s, R: ?Sized, E, HE> Clone for Handler<'s, R, E, HE>
    where HE: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Handler::Func(func) => Handler::Func(*func),
            Handler::Fail(error) => Handler::Fail(error.clone()),
        }
    }
}

impl<'s, R: ?Sized, E, HE> fmt::Debug for Handler<'s, R, E, HE>
    where HE: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Func(_) => f.write_str("Func(..)"),
            Handler::Fail(error) => f.debug_tuple("Fail").field(error).finish(),
        }
    }
}


/// The result of evaluating an expression.  It is extensible by the `Extra`
/// type parameter, which is whatever the handlers of an application produce.
pub enum Value<'s, R: ?Sized, Extra, HandlerError> {
    /// An atomic expression, as its bytes still escaped.  Handlers usually
    /// unescape this when they want the literal bytes.
    Raw(&'s [u8]),
    /// A value that can itself be invoked, which is what a name that is a
    /// call must evaluate to.
    Handler(Handler<'s, R, Extra, HandlerError>),
    /// Whatever else handlers produce
    Extra(Extra),
}

impl<'s, R: ?Sized, E, HE> Value<'s, R, E, HE> {
    /// The bytes, if this is an atomic value.
    #[inline]
    pub fn as_raw(&self) -> Option<&'s [u8]> {
        if let Value::Raw(raw) = self { Some(*raw) } else { None }
    }

    /// The handler, if this is one.
    #[inline]
    pub fn into_handler(self) -> Option<Handler<'s, R, E, HE>> {
        if let Value::Handler(handler) = self { Some(handler) } else { None }
    }

    /// The application's value, if this is one.
    #[inline]
    pub fn into_extra(self) -> Option<E> {
        if let Value::Extra(extra) = self { Some(extra) } else { None }
    }

    /// Whether this can be invoked.
    #[inline]
    pub fn is_handler(&self) -> bool {
        matches!(self, Value::Handler(_))
    }
}

impl<'s, R: ?Sized, E, HE> Clone for Value<'s, R, E, HE>
    where E: Clone,
          HE: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Value::Raw(raw) => Value::Raw(*raw),
            Value::Handler(handler) => Value::Handler(handler.clone()),
            Value::Extra(extra) => Value::Extra(extra.clone()),
        }
    }
}

impl<'s, R: ?Sized, E, HE> fmt::Debug for Value<'s, R, E, HE>
    where E: fmt::Debug,
          HE: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Raw(raw) =>
                f.debug_tuple("Raw").field(&crate::show::Lossy(raw)).finish(),
            Value::Handler(handler) => f.debug_tuple("Handler").field(handler).finish(),
            Value::Extra(extra) => f.debug_tuple("Extra").field(extra).finish(),
        }
    }
}
