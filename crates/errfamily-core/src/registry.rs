//! Foreign-error translation rules.
//!
//! A family's rule list is immutable and shared; [`Family::enroll`],
//! [`Family::enroll_with`], and [`Family::bridge`] each return a new
//! handle layered over the previous list, and [`Family::translate`] scans
//! newest-first. A later rule therefore takes precedence over an older one
//! for the same foreign type without mutating any prior handle, and a
//! declining bridge falls through to whatever older rule matches.
//!
//! Matching is nominal: a rule fires only for values of exactly the
//! registered Rust type, checked by downcast. Structural look-alikes do
//! not match.

use std::any::{type_name, TypeId};
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use thiserror::Error;

use crate::error::DefinedError;
use crate::family::{Case, Family, FamilyInner};
use crate::payload::Payload;
use crate::spec::SpecError;
use crate::trace::CallerTrace;

type ErasedExtract = Arc<dyn Fn(&(dyn StdError + 'static)) -> Option<Payload> + Send + Sync>;
type ErasedMapper =
    Arc<dyn Fn(&(dyn StdError + 'static), &CaseTable) -> Option<DefinedError> + Send + Sync>;

#[derive(Clone)]
enum RuleAction {
    Enroll {
        case: usize,
        extract: ErasedExtract,
    },
    Bridge {
        map: ErasedMapper,
    },
}

#[derive(Clone)]
struct Rule {
    foreign: TypeId,
    foreign_type: &'static str,
    action: RuleAction,
}

/// Append-only list of translation rules; scanned newest-first.
pub(crate) struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub(crate) fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    fn appended(&self, rule: Rule) -> Self {
        let mut rules = self.rules.clone();
        rules.push(rule);
        Self { rules }
    }

    fn newest_first(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().rev()
    }
}

/// Case constructors handed to a bridge mapper.
///
/// Exposes every case of the family the bridge was registered on. A name
/// that does not exist yields `None`, which, propagated with `?`, makes
/// the mapper decline.
pub struct CaseTable {
    inner: Arc<FamilyInner>,
}

impl CaseTable {
    /// Look up a case constructor by name.
    pub fn case(&self, name: &str) -> Option<Case> {
        self.inner.case(name).cloned()
    }

    /// Case constructors in declaration order.
    pub fn cases(&self) -> impl Iterator<Item = &Case> + '_ {
        self.inner.cases().iter()
    }
}

/// No registered rule produced a variant for the submitted foreign error.
///
/// Translation takes ownership of the foreign value (a produced variant
/// wires it in as its cause), so a miss carries the value back out:
/// recover it with [`TranslationMiss::into_foreign`].
#[derive(Debug, Error)]
#[error("no translation rule matched foreign error type `{foreign_type}`")]
pub struct TranslationMiss<E: StdError + 'static> {
    foreign_type: &'static str,
    #[source]
    foreign: E,
}

impl<E: StdError + 'static> TranslationMiss<E> {
    fn new(foreign: E) -> Self {
        Self {
            foreign_type: type_name::<E>(),
            foreign,
        }
    }

    /// The untranslated foreign error.
    pub fn foreign(&self) -> &E {
        &self.foreign
    }

    /// Recover ownership of the foreign error.
    pub fn into_foreign(self) -> E {
        self.foreign
    }
}

impl Family {
    /// Route foreign errors of type `E` to a fixed-message case.
    ///
    /// Returns a new family handle; the receiver keeps its current rules.
    /// A case that declares payload values needs
    /// [`enroll_with`](Family::enroll_with) instead, so the payload has a
    /// source.
    pub fn enroll<E>(&self, target: &Case) -> Result<Family, SpecError>
    where
        E: StdError + Send + Sync + 'static,
    {
        let arity = target.arity();
        if arity != 0 {
            return Err(SpecError::TransformerRequired {
                case: target.name().to_owned(),
                arity,
            });
        }
        let extract: ErasedExtract =
            Arc::new(|foreign| foreign.downcast_ref::<E>().map(|_| Payload::empty()));
        self.enroll_rule::<E>(target, extract)
    }

    /// Route foreign errors of type `E` to `target`, building the target's
    /// payload from the matched foreign value.
    pub fn enroll_with<E, F>(&self, target: &Case, transform: F) -> Result<Family, SpecError>
    where
        E: StdError + Send + Sync + 'static,
        F: Fn(&E) -> Payload + Send + Sync + 'static,
    {
        let extract: ErasedExtract = Arc::new(move |foreign| {
            foreign.downcast_ref::<E>().map(|typed| transform(typed))
        });
        self.enroll_rule::<E>(target, extract)
    }

    fn enroll_rule<E>(&self, target: &Case, extract: ErasedExtract) -> Result<Family, SpecError>
    where
        E: StdError + Send + Sync + 'static,
    {
        if target.scope() != self.scope() {
            return Err(SpecError::ForeignCase {
                case: target.name().to_owned(),
            });
        }
        let Some(case) = self.inner.position(target.name()) else {
            return Err(SpecError::ForeignCase {
                case: target.name().to_owned(),
            });
        };
        Ok(self.with_rule(Rule {
            foreign: TypeId::of::<E>(),
            foreign_type: type_name::<E>(),
            action: RuleAction::Enroll { case, extract },
        }))
    }

    /// Route foreign errors of type `E` through a mapper that picks the
    /// variant at runtime.
    ///
    /// The mapper can fan one foreign type out to several cases, for
    /// example by dispatching on an embedded status code. Returning `None`
    /// declines the value: [`translate`](Family::translate) keeps scanning
    /// older rules, so a declining bridge never shadows an earlier
    /// registration.
    pub fn bridge<E, F>(&self, mapper: F) -> Family
    where
        E: StdError + Send + Sync + 'static,
        F: Fn(&E, &CaseTable) -> Option<DefinedError> + Send + Sync + 'static,
    {
        let map: ErasedMapper = Arc::new(move |foreign, table| {
            let typed = foreign.downcast_ref::<E>()?;
            mapper(typed, table)
        });
        self.with_rule(Rule {
            foreign: TypeId::of::<E>(),
            foreign_type: type_name::<E>(),
            action: RuleAction::Bridge { map },
        })
    }

    /// Whether any rule is registered for foreign type `E`.
    ///
    /// Bridges count even though they may still decline at runtime.
    pub fn translates<E>(&self) -> bool
    where
        E: StdError + Send + Sync + 'static,
    {
        let id = TypeId::of::<E>();
        self.rules.rules.iter().any(|rule| rule.foreign == id)
    }

    /// Translate a foreign error into a variant of this family.
    ///
    /// Rules are scanned newest-first and the first produced variant wins.
    /// The variant carries `foreign` as its cause and its trace anchors at
    /// the caller of this method. When no rule produces, the foreign value
    /// comes back inside the [`TranslationMiss`].
    #[track_caller]
    pub fn translate<E>(&self, foreign: E) -> Result<DefinedError, TranslationMiss<E>>
    where
        E: StdError + Send + Sync + 'static,
    {
        let origin = Location::caller();
        let table = CaseTable {
            inner: Arc::clone(&self.inner),
        };

        let mut produced: Option<DefinedError> = None;
        for rule in self.rules.newest_first() {
            produced = match &rule.action {
                RuleAction::Enroll { case, extract } => extract(&foreign).map(|payload| {
                    self.inner
                        .case_at(*case)
                        .construct_at(origin, payload, None)
                }),
                RuleAction::Bridge { map } => map(&foreign, &table).map(|mut variant| {
                    // re-anchor: the mapper built it inside the scan
                    variant.trace = CallerTrace::capture(origin);
                    variant
                }),
            };
            if produced.is_some() {
                break;
            }
        }

        match produced {
            Some(mut variant) => {
                variant.cause = Some(Box::new(foreign));
                Ok(variant)
            }
            None => Err(TranslationMiss::new(foreign)),
        }
    }

    fn with_rule(&self, rule: Rule) -> Family {
        Family {
            inner: Arc::clone(&self.inner),
            rules: Arc::new(self.rules.appended(rule)),
        }
    }
}

impl fmt::Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cases: Vec<&str> = self.inner.cases().iter().map(Case::name).collect();
        let rules: Vec<String> = self
            .rules
            .rules
            .iter()
            .map(|rule| match &rule.action {
                RuleAction::Enroll { case, .. } => format!(
                    "enroll {} -> {}",
                    rule.foreign_type,
                    self.inner.case_at(*case).name()
                ),
                RuleAction::Bridge { .. } => format!("bridge {}", rule.foreign_type),
            })
            .collect();
        f.debug_struct("Family")
            .field("scope", &self.scope())
            .field("cases", &cases)
            .field("rules", &rules)
            .finish()
    }
}
