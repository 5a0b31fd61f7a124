//! The defined error value.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::family::Case;
use crate::payload::Payload;
use crate::scope::Scope;
use crate::trace::CallerTrace;

/// Boxed cause stored on a defined error.
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// An error built by a case constructor of a defined family.
///
/// Values of this type only come out of [`Case::build`] and
/// `Family::translate`; every field is crate-private, which is the brand:
/// an error value that downcasts to `DefinedError` is proof of construction
/// by this library, and no hand-assembled look-alike can pass
/// [`is_defined_error`](crate::is_defined_error).
///
/// The case's identity lives in `code` plus the family [`Scope`]; the
/// positional `payload` and the rendered `message` are frozen at
/// construction time. An optional `cause` keeps the upstream error
/// reachable through [`StdError::source`].
pub struct DefinedError {
    pub(crate) code: Arc<str>,
    pub(crate) payload: Payload,
    pub(crate) scope: Scope,
    pub(crate) message: String,
    pub(crate) cause: Option<BoxedCause>,
    pub(crate) trace: CallerTrace,
}

impl DefinedError {
    /// Case name this error was built from.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Positional payload captured at construction.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Owning family's scope token.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Rendered message; identical to the `Display` output.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped upstream error, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Some(boxed) => {
                let cause: &(dyn StdError + 'static) = &**boxed;
                Some(cause)
            }
            None => None,
        }
    }

    /// Anchored construction trace.
    pub fn trace(&self) -> &CallerTrace {
        &self.trace
    }

    /// True iff this error was built by `case`: same family scope, same
    /// case name.
    pub fn is(&self, case: &Case) -> bool {
        self.scope == case.scope() && self.code.as_ref() == case.name()
    }
}

impl fmt::Display for DefinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for DefinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinedError")
            .field("code", &self.code)
            .field("scope", &self.scope)
            .field("payload", &self.payload)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .field("origin", &self.trace)
            .finish()
    }
}

impl StdError for DefinedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::family::define;
    use crate::payload;
    use crate::spec::ErrorSpec;

    fn sample() -> crate::family::Family {
        define([
            ("NotFound", ErrorSpec::template(1, |p| format!("Resource {} not found", p[0]))),
            ("Unauthorized", ErrorSpec::fixed("User is not logged in")),
        ])
        .expect("sample family")
    }

    #[test]
    fn display_is_the_rendered_message() {
        let family = sample();
        let err = family.case("NotFound").unwrap().build(payload![404], None);
        assert_eq!(err.to_string(), "Resource 404 not found");
        assert_eq!(err.message(), "Resource 404 not found");
    }

    #[test]
    fn source_exposes_the_cause() {
        let family = sample();
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err = family
            .case("Unauthorized")
            .unwrap()
            .build((), Some(Box::new(io_err)));

        let source = err.source().expect("cause present");
        let io_err = source.downcast_ref::<io::Error>().expect("io cause");
        assert_eq!(io_err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn source_is_none_without_a_cause() {
        let family = sample();
        let err = family.case("Unauthorized").unwrap().build((), None);
        assert!(err.source().is_none());
    }

    #[test]
    fn debug_names_the_code_and_origin() {
        let family = sample();
        let err = family.case("Unauthorized").unwrap().build((), None);
        let debug = format!("{err:?}");
        assert!(debug.contains("Unauthorized"), "got: {debug}");
        assert!(debug.contains("error.rs"), "got: {debug}");
    }
}
