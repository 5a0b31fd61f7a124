//! Case message specs and definition-time defects.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::payload::Payload;

/// Render function of a template case.
pub type TemplateFn = Arc<dyn Fn(&Payload) -> String + Send + Sync>;

/// How a case renders its message.
///
/// A bare string (or [`ErrorSpec::fixed`]) declares a case whose message
/// never changes and whose errors record no payload. A template declares
/// `arity` positional values and renders the message from whatever payload
/// the constructor received.
#[derive(Clone)]
pub enum ErrorSpec {
    /// A fixed message; errors of this case carry an empty payload.
    Fixed(Arc<str>),
    /// A message template over `arity` positional payload values.
    Template {
        /// Declared number of payload values.
        arity: usize,
        /// Renders the message from the captured payload.
        render: TemplateFn,
    },
}

impl ErrorSpec {
    /// Declare a fixed-message case.
    pub fn fixed(message: impl Into<Arc<str>>) -> Self {
        Self::Fixed(message.into())
    }

    /// Declare a template case over `arity` positional values.
    ///
    /// The template is called with exactly the payload given at
    /// construction time, which may be shorter than `arity`; index with
    /// `Payload::get` when that matters.
    pub fn template<F>(arity: usize, render: F) -> Self
    where
        F: Fn(&Payload) -> String + Send + Sync + 'static,
    {
        Self::Template {
            arity,
            render: Arc::new(render),
        }
    }

    /// Declared payload arity; zero for fixed messages.
    pub fn arity(&self) -> usize {
        match self {
            Self::Fixed(_) => 0,
            Self::Template { arity, .. } => *arity,
        }
    }

    pub(crate) fn render(&self, payload: &Payload) -> String {
        match self {
            Self::Fixed(message) => message.as_ref().to_owned(),
            Self::Template { render, .. } => render(payload),
        }
    }
}

impl From<&str> for ErrorSpec {
    fn from(message: &str) -> Self {
        Self::fixed(message)
    }
}

impl From<String> for ErrorSpec {
    fn from(message: String) -> Self {
        Self::fixed(message)
    }
}

impl fmt::Debug for ErrorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(message) => f.debug_tuple("Fixed").field(message).finish(),
            Self::Template { arity, .. } => f
                .debug_struct("Template")
                .field("arity", arity)
                .finish_non_exhaustive(),
        }
    }
}

/// Defects raised while defining a family or registering translation rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// Two cases with the same name appeared in one definition.
    #[error("duplicate case name `{0}` in family definition")]
    DuplicateCase(String),

    /// A case was declared with an empty name.
    #[error("empty case name in family definition")]
    EmptyCaseName,

    /// `enroll` targeted a case whose template declares payload values.
    #[error("case `{case}` declares {arity} payload value(s); enroll it with a transformer")]
    TransformerRequired {
        /// Target case name.
        case: String,
        /// Its declared arity.
        arity: usize,
    },

    /// The target case belongs to a different family.
    #[error("case `{case}` does not belong to this family")]
    ForeignCase {
        /// Target case name.
        case: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;

    #[test]
    fn fixed_spec_has_zero_arity() {
        let spec = ErrorSpec::from("User is not logged in");
        assert_eq!(spec.arity(), 0);
        assert_eq!(spec.render(&payload![1, 2]), "User is not logged in");
    }

    #[test]
    fn template_renders_from_payload() {
        let spec = ErrorSpec::template(1, |p| format!("Resource {} not found", p[0]));
        assert_eq!(spec.arity(), 1);
        assert_eq!(spec.render(&payload![404]), "Resource 404 not found");
    }

    #[test]
    fn debug_elides_the_render_fn() {
        let spec = ErrorSpec::template(2, |_| String::new());
        assert_eq!(format!("{spec:?}"), "Template { arity: 2, .. }");
    }

    #[test]
    fn spec_error_messages() {
        assert_eq!(
            SpecError::DuplicateCase("NotFound".into()).to_string(),
            "duplicate case name `NotFound` in family definition"
        );
        assert_eq!(
            SpecError::TransformerRequired {
                case: "NotFound".into(),
                arity: 1,
            }
            .to_string(),
            "case `NotFound` declares 1 payload value(s); enroll it with a transformer"
        );
    }
}
