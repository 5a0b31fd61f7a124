//! Per-family identity tokens.
//!
//! A [`Scope`] is minted once per family definition from a process-global
//! counter and afterwards compared only by identity. It is never derived
//! from the shape of the case map, so two families declared with identical
//! cases still carry distinct tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token stamped on every case and error of one family.
///
/// `Scope` is `Copy` and has no public constructor; obtain one through
/// `Family::scope`, `Case::scope`, or [`scope_of`](crate::scope_of).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope(u64);

impl Scope {
    /// Mint a fresh token. Called exactly once per family definition.
    pub(crate) fn mint() -> Self {
        Self(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope(#{})", self.0)
    }
}
