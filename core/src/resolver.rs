//! The trait that gives names their meaning, and the types named after it.

use tracing::debug;

use crate::{
    Error, Handler, Value, Outcome, DEFAULT_NESTING_LIMIT,
    eval::{evaluate, is_call},
    show::Lossy,
};


/// Implementations provided for ready use.
pub mod premade
{
    mod pair_resolver;
    pub use pair_resolver::{PairResolver, PairBinding};
}


/// The [`Handler`] type of a [`Resolver`].
pub type HandlerOf<'s, R>
    = Handler<'s, R, <R as Resolver<'s>>::Extra, <R as Resolver<'s>>::HandlerError>;

/// The [`Value`] type of a [`Resolver`].
pub type ValueOf<'s, R>
    = Value<'s, R, <R as Resolver<'s>>::Extra, <R as Resolver<'s>>::HandlerError>;

/// The [`Outcome`] type of a [`Resolver`], i.e. what evaluating with it gives.
pub type OutcomeOf<'s, R>
    = Outcome<'s, R, <R as Resolver<'s>>::Extra, <R as Resolver<'s>>::HandlerError>;

/// The [`Error`] type of a [`Resolver`].
pub type ErrorOf<'s, R> = Error<<R as Resolver<'s>>::HandlerError>;


/// Maps the names of calls to the handlers that are invoked for them.
///
/// The `'s` lifetime is that of the input being evaluated, which atomic
/// values and unevaluated arguments borrow from.
///
/// Evaluation is synchronous and keeps no state of its own, so a resolver that
/// is `Sync` may be shared by concurrent evaluations.  Resolvers should not
/// have side effects from looking up names.
pub trait Resolver<'s> {
    /// The type of the values, beyond atomic ones and handlers, that our
    /// handlers produce.
    type Extra;
    /// The [handler error extension](../enum.Error.html#variant.Handler) type.
    type HandlerError;

    /// Look up the handler bound to the given name.  This only ever sees names
    /// that are not themselves calls.  Names that are not bound should be
    /// given an [`error_handler`](../fn.error_handler.html).
    fn lookup(&self, name: &'s [u8]) -> HandlerOf<'s, Self>;

    /// Resolve the given name, which might itself be a call, to a handler.
    ///
    /// A name that is not a call is given to [`lookup`](#tymethod.lookup).  A
    /// name that is a call is evaluated with `self`, and it must produce a
    /// handler, else the returned handler fails with
    /// [`Error::NotAFunction`].  Errors from evaluating the name are returned
    /// by the returned handler unchanged.
    ///
    /// This is what all evaluation goes through.  Override it only to not
    /// support names that are calls.
    fn resolve(&self, name: &'s [u8]) -> HandlerOf<'s, Self> {
        if !is_call(name) {
            return self.lookup(name);
        }
        match evaluate(self, name) {
            Ok(Value::Handler(handler)) => handler,
            Ok(_) => {
                debug!(name = %Lossy(name), "name did not evaluate to a handler");
                Handler::Fail(Error::NotAFunction)
            }
            Err(error) => Handler::Fail(error),
        }
    }

    /// How deeply brackets may nest within any one scan of a call or of an
    /// argument list.  This bounds how deeply evaluation recurses.
    #[inline]
    fn nesting_limit(&self) -> usize {
        DEFAULT_NESTING_LIMIT
    }
}
