//! Used by the tests of both the [core](../callex_core/index.html) and the
//! [full](../callex/index.html) crates.  It provides test suites that can be
//! run against any type of [`Resolver`](../callex_core/trait.Resolver.html)
//! that binds our [handlers](handlers/index.html), and a JSON-like codec that
//! exercises the crates the way a consumer would.
//!
//! Evaluation results borrow the input and may hold handlers, so they are
//! summarized as [`Shape`]s for comparing against expected results.

use callex::{Value, Resolver, ErrorOf, OutcomeOf};


pub mod handlers;
pub mod json;
pub mod suites;


/// An owned summary of a `Value`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Shape<X> {
    /// An atomic value's bytes, still escaped, as lossy UTF-8
    Raw(String),
    /// Any handler
    Handler,
    /// The extra value itself
    Extra(X),
}

/// Summarize the outcome of an evaluation.
pub fn shape<'s, R>(outcome: OutcomeOf<'s, R>) -> Result<Shape<R::Extra>, ErrorOf<'s, R>>
    where R: Resolver<'s> + ?Sized,
{
    outcome.map(|value| match value {
        Value::Raw(raw) => Shape::Raw(String::from_utf8_lossy(raw).into_owned()),
        Value::Handler(_) => Shape::Handler,
        Value::Extra(extra) => Shape::Extra(extra),
    })
}

/// Shorthand for an expected atomic value.
pub fn raw<X>(s: &str) -> Shape<X> {
    Shape::Raw(s.to_owned())
}
