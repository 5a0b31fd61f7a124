//! Classification guards and pure projections.
//!
//! All predicates are total over any `dyn Error` value: foreign errors
//! and hand-assembled look-alikes simply fail the downcast. None of these
//! functions allocate or mutate anything.

use std::error::Error as StdError;

use crate::error::DefinedError;
use crate::family::{Case, Family};
use crate::payload::Payload;
use crate::scope::Scope;

/// True iff `value` was built by a case constructor; with a `scope`, only
/// for errors of that family.
pub fn is_defined_error(value: &(dyn StdError + 'static), scope: Option<Scope>) -> bool {
    match value.downcast_ref::<DefinedError>() {
        Some(err) => scope.map_or(true, |token| err.scope() == token),
        None => false,
    }
}

/// True iff `value` was built by exactly `case`: brand present, scope and
/// case name both matching.
pub fn is(value: &(dyn StdError + 'static), case: &Case) -> bool {
    value
        .downcast_ref::<DefinedError>()
        .is_some_and(|err| err.is(case))
}

/// Case name of a defined error.
pub fn code_of(error: &DefinedError) -> &str {
    error.code()
}

/// Positional payload captured at construction.
pub fn payload_of(error: &DefinedError) -> &Payload {
    error.payload()
}

/// Anything stamped with a family scope token: errors, families, and case
/// constructors.
pub trait Scoped {
    /// The owning family's token.
    fn scope(&self) -> Scope;
}

impl Scoped for DefinedError {
    fn scope(&self) -> Scope {
        DefinedError::scope(self)
    }
}

impl Scoped for Family {
    fn scope(&self) -> Scope {
        Family::scope(self)
    }
}

impl Scoped for Case {
    fn scope(&self) -> Scope {
        Case::scope(self)
    }
}

/// Scope token of any scoped value.
pub fn scope_of<T: Scoped + ?Sized>(target: &T) -> Scope {
    target.scope()
}
