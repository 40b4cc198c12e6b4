//! Type-erased selector records.

use std::any::{Any, type_name};
use std::fmt;

use reflow_types::unchanged;

/// One lazy step's selector output, kept until the next cycle compares
/// against it.
pub(crate) struct Slot {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl Slot {
    pub(crate) fn new<K: 'static>(value: K) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<K>(),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn get<K: 'static>(&self) -> Option<&K> {
        self.value.downcast_ref()
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Decision for a lazy step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// Nothing recorded at this slot yet.
    Fresh,
    Changed,
    Unchanged,
}

impl Gate {
    pub(crate) fn runs(self) -> bool {
        !matches!(self, Gate::Unchanged)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Gate::Fresh => "fresh",
            Gate::Changed => "changed",
            Gate::Unchanged => "unchanged",
        }
    }
}

/// Compare a selector output against the slot recorded for the same step.
///
/// `Err` carries the recorded type name when the slot holds a different type,
/// which means the step sequence was reshaped.
pub(crate) fn gate<K>(recorded: Option<&Slot>, selected: &K) -> Result<Gate, &'static str>
where
    K: PartialEq + 'static,
{
    let Some(slot) = recorded else {
        return Ok(Gate::Fresh);
    };
    match slot.get::<K>() {
        Some(previous) if unchanged(previous, selected) => Ok(Gate::Unchanged),
        Some(_) => Ok(Gate::Changed),
        None => Err(slot.type_name()),
    }
}
