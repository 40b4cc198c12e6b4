//! Structural faults raised at the cycle boundary.

use thiserror::Error;

use crate::SlotKey;

/// A violation of the structural-consistency invariant.
///
/// Slot position (or slot key) is the only identity a selector value has, so
/// once the shape of the lazy-step sequence changes between cycles every
/// later comparison would be meaningless. These are programming-contract
/// violations: the session that raised one is consumed and must not be reused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleFault {
    #[error(
        "session `{label}`: previous cycle ran {previous} lazy steps but this cycle ran \
         {current}; lazy-step declarations must be invariant in count and order across cycles"
    )]
    SlotCountMismatch {
        label: &'static str,
        previous: usize,
        current: usize,
    },

    #[error(
        "session `{label}`: lazy step at slot {position} selected `{found}` but the previous \
         cycle recorded `{expected}` there; lazy-step declarations must be invariant in count \
         and order across cycles"
    )]
    SlotTypeMismatch {
        label: &'static str,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error(
        "session `{label}`: keyed step `{key}` selected `{found}` but the previous cycle \
         recorded `{expected}` under that key; a key must always select the same type"
    )]
    KeyedTypeMismatch {
        label: &'static str,
        key: SlotKey,
        expected: &'static str,
        found: &'static str,
    },

    #[error(
        "session `{label}`: keyed step `{key}` ran more than once in one cycle; \
         slot keys must be unique within a cycle"
    )]
    DuplicateKey { label: &'static str, key: SlotKey },
}

impl CycleFault {
    /// Label of the session that raised the fault.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CycleFault::SlotCountMismatch { label, .. }
            | CycleFault::SlotTypeMismatch { label, .. }
            | CycleFault::KeyedTypeMismatch { label, .. }
            | CycleFault::DuplicateKey { label, .. } => *label,
        }
    }
}
