//! errfamily-core: declared error families with nominal identity,
//! caller-site anchored traces, and a foreign-error translation registry.
//!
//! This crate defines:
//! - [`define`] / [`Family`]: build a closed set of error cases from an
//!   ordered list of `(name, spec)` pairs
//! - [`Case`]: one constructor per case, stamped with the family's
//!   [`Scope`] token
//! - [`DefinedError`]: the branded error value, with payload, cause, and
//!   an anchored [`CallerTrace`]
//! - [`is_defined_error`] / [`is`] / [`code_of`] / [`payload_of`] /
//!   [`scope_of`]: guards and projections over unknown error values
//! - [`Family::enroll`] / [`Family::bridge`] / [`Family::translate`]: the
//!   copy-on-write registry that turns foreign errors into family
//!   variants
//!
//! # Quick Start
//!
//! ```rust
//! use errfamily_core::{define, payload, ErrorSpec};
//!
//! let api = define([
//!     ("NotFound", ErrorSpec::template(1, |p| format!("Resource {} not found", p[0]))),
//!     ("Unauthorized", ErrorSpec::fixed("User is not logged in")),
//! ])
//! .unwrap();
//!
//! let err = api.case("NotFound").unwrap().build(payload![404], None);
//! assert_eq!(err.to_string(), "Resource 404 not found");
//! assert_eq!(err.code(), "NotFound");
//! ```

pub mod error;
pub mod family;
pub mod guard;
pub mod payload;
pub mod registry;
pub mod scope;
pub mod spec;
pub mod trace;

pub use error::{BoxedCause, DefinedError};
pub use family::{define, Case, Family};
pub use guard::{code_of, is, is_defined_error, payload_of, scope_of, Scoped};
pub use payload::{Payload, PayloadValue};
pub use registry::{CaseTable, TranslationMiss};
pub use scope::Scope;
pub use spec::{ErrorSpec, SpecError, TemplateFn};
pub use trace::CallerTrace;
