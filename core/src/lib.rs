//! The core of an evaluator for a minimal lisp-like call-expression notation
//! over byte sequences.  It can be used both as a data-interchange format and
//! as a way to embed domain-specific languages.
//!
//! An expression is either atomic, any byte sequence that does not begin with
//! `(`, or a call of the form `(name|arg|arg|...)` where the name and each
//! argument are themselves expressions.  The four bytes `(`, `)`, `|`, and `\`
//! are special, and `\` escapes whichever byte follows it.
//!
//! There is no parse tree.  Evaluating a call positionally scans for the first
//! top-level pipe, resolves the bytes before it to a [`Handler`] via a
//! [`Resolver`], and invokes that handler with the remaining argument bytes
//! still unevaluated.  Handlers decide for themselves whether and when to
//! evaluate their arguments, usually with [`iter_args`].  Because of this
//! laziness, a malformed argument that a handler never evaluates never causes
//! an error.
//!
//! As in Lisp, when the name of a call is itself a call, it is evaluated first
//! and must produce a handler.  This is done by the provided
//! [`Resolver::resolve`] method, which all evaluation goes through.
//!
//! This core crate is `no_std` and does no heap allocation.  Evaluation borrows
//! sub-slices of the input, and escaping is offered as byte iterators.  The
//! `callex` crate layers allocating conveniences on top of this.

#![no_std]

pub mod error;
pub use error::Error;

pub mod value;
pub use value::{Value, Handler, HandlerFn, Outcome, error_handler};

pub mod resolver;
pub use resolver::{Resolver, ValueOf, HandlerOf, OutcomeOf, ErrorOf};

mod eval;
pub use eval::{evaluate, iter_args, is_call, Args};

pub mod escape;

#[doc(hidden)]
pub mod show;


/// Opens a call.
pub const OPEN: u8 = b'(';
/// Closes a call.
pub const CLOSE: u8 = b')';
/// Separates the name and the arguments of a call.
pub const PIPE: u8 = b'|';
/// Makes the byte after it literal.
pub const ESCAPE: u8 = b'\\';

/// The nesting depth beyond which scanning gives up with
/// [`Error::NestingTooDeep`], unless a [`Resolver`] chooses otherwise.
pub const DEFAULT_NESTING_LIMIT: usize = 128;
