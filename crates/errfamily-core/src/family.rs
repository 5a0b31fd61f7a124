//! Family definition and case constructors.
//!
//! [`define`] turns an ordered list of `(name, spec)` pairs into a
//! [`Family`]: one [`Case`] constructor per declared case, all stamped
//! with a freshly minted [`Scope`]. Families and cases are cheap clones
//! over shared immutable state, so handles travel freely across threads.

use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::error::{BoxedCause, DefinedError};
use crate::payload::Payload;
use crate::registry::RuleSet;
use crate::scope::Scope;
use crate::spec::{ErrorSpec, SpecError};
use crate::trace::CallerTrace;

pub(crate) struct CaseDef {
    name: Arc<str>,
    spec: ErrorSpec,
    scope: Scope,
}

impl CaseDef {
    fn construct(
        &self,
        origin: &'static Location<'static>,
        payload: Payload,
        cause: Option<BoxedCause>,
    ) -> DefinedError {
        let message = self.spec.render(&payload);
        // fixed-message cases record no payload, whatever was passed
        let payload = match self.spec {
            ErrorSpec::Fixed(_) => Payload::empty(),
            ErrorSpec::Template { .. } => payload,
        };
        DefinedError {
            code: Arc::clone(&self.name),
            payload,
            scope: self.scope,
            message,
            cause,
            trace: CallerTrace::capture(origin),
        }
    }
}

/// One case constructor of a defined family.
///
/// Cheap to clone; carries the case name, its declared arity, and the
/// owning family's scope token.
#[derive(Clone)]
pub struct Case {
    def: Arc<CaseDef>,
}

impl Case {
    /// Case name; becomes the `code` of every error built here.
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Declared payload arity; zero for fixed-message cases.
    pub fn arity(&self) -> usize {
        self.def.spec.arity()
    }

    /// Owning family's scope token.
    pub fn scope(&self) -> Scope {
        self.def.scope
    }

    /// Build an error of this case.
    ///
    /// `payload` carries the positional template arguments; pass `()` (or
    /// `payload![]`) when there are none. Values passed to a fixed-message
    /// case are not recorded. A payload shorter than the declared arity
    /// does not fail construction: the template alone decides what it
    /// renders over the missing positions.
    ///
    /// The error's trace anchors at the caller of this method, never
    /// inside the library.
    #[track_caller]
    pub fn build(&self, payload: impl Into<Payload>, cause: Option<BoxedCause>) -> DefinedError {
        self.def.construct(Location::caller(), payload.into(), cause)
    }

    pub(crate) fn construct_at(
        &self,
        origin: &'static Location<'static>,
        payload: Payload,
        cause: Option<BoxedCause>,
    ) -> DefinedError {
        self.def.construct(origin, payload, cause)
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .field("scope", &self.scope())
            .finish()
    }
}

pub(crate) struct FamilyInner {
    cases: Vec<Case>,
    index: HashMap<Arc<str>, usize>,
    scope: Scope,
}

impl FamilyInner {
    pub(crate) fn case(&self, name: &str) -> Option<&Case> {
        self.index.get(name).map(|position| &self.cases[*position])
    }

    pub(crate) fn case_at(&self, position: usize) -> &Case {
        &self.cases[position]
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub(crate) fn scope(&self) -> Scope {
        self.scope
    }
}

/// A defined error family: case constructors plus its translation rules.
///
/// `Family` is a cheap handle over immutable shared state. Registering a
/// translation rule returns a new handle layered over the old rule list;
/// existing handles are never affected.
#[derive(Clone)]
pub struct Family {
    pub(crate) inner: Arc<FamilyInner>,
    pub(crate) rules: Arc<RuleSet>,
}

/// Define a family from `(name, spec)` pairs in declaration order.
///
/// Rejects empty and duplicate case names. Every definition mints a fresh
/// [`Scope`], so two families built from identical pairs are still
/// mutually foreign.
pub fn define<I, N>(cases: I) -> Result<Family, SpecError>
where
    I: IntoIterator<Item = (N, ErrorSpec)>,
    N: Into<Arc<str>>,
{
    Family::define(cases)
}

impl Family {
    /// See [`define`].
    pub fn define<I, N>(cases: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = (N, ErrorSpec)>,
        N: Into<Arc<str>>,
    {
        let scope = Scope::mint();
        let mut defs: Vec<Case> = Vec::new();
        let mut index = HashMap::new();
        for (name, spec) in cases {
            let name: Arc<str> = name.into();
            if name.is_empty() {
                return Err(SpecError::EmptyCaseName);
            }
            if index.contains_key(&name) {
                return Err(SpecError::DuplicateCase(name.as_ref().to_owned()));
            }
            index.insert(Arc::clone(&name), defs.len());
            defs.push(Case {
                def: Arc::new(CaseDef { name, spec, scope }),
            });
        }
        Ok(Self {
            inner: Arc::new(FamilyInner {
                cases: defs,
                index,
                scope,
            }),
            rules: Arc::new(RuleSet::empty()),
        })
    }

    /// Look up a case constructor by name.
    pub fn case(&self, name: &str) -> Option<Case> {
        self.inner.case(name).cloned()
    }

    /// Case constructors in declaration order.
    pub fn cases(&self) -> impl Iterator<Item = &Case> + '_ {
        self.inner.cases().iter()
    }

    /// Number of declared cases.
    pub fn len(&self) -> usize {
        self.inner.cases().len()
    }

    /// True for a family with no cases.
    pub fn is_empty(&self) -> bool {
        self.inner.cases().is_empty()
    }

    /// This family's scope token.
    pub fn scope(&self) -> Scope {
        self.inner.scope()
    }
}
