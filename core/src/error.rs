//! Errors that might be returned by evaluation.


/// The possible errors that might be returned by evaluation.
///
/// It is generic over the `HandlerError` type parameter so that the handlers
/// of different applications can fail in their own terms.  Those errors are
/// passed through unchanged.
#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum Error<HandlerError> {
    /// A call does not end with a close-bracket
    #[error("missing )")]
    MissingCloseBracket,
    /// Close-bracket without matching open-bracket
    #[error("mismatched )")]
    MismatchedCloseBracket,
    /// Open-bracket that is never closed
    #[error("mismatched (")]
    MismatchedOpenBracket,
    /// A name that is a call evaluated to something other than a handler
    #[error("not a function")]
    NotAFunction,
    /// Brackets nested deeper than the resolver's nesting limit
    #[error("nesting deeper than {limit}")]
    NestingTooDeep {
        /// The limit that was exceeded
        limit: usize,
    },
    /// Whatever a handler failed with
    #[error("{0}")]
    Handler(HandlerError),
}

impl<HE> Error<HE> {
    /// Whether this error was classified by the scanner, as opposed to being
    /// returned by some handler.
    pub fn is_syntax(&self) -> bool {
        !matches!(self, Error::Handler(_))
    }
}

impl<HE> From<HE> for Error<HE> {
    #[inline]
    fn from(he: HE) -> Self {
        Error::Handler(he)
    }
}
