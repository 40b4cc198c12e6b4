//! The in-cycle handle that runs declared steps.

use std::any::type_name;
use std::collections::HashMap;

use tracing::{error, trace};

use reflow_types::{CycleFault, Effects, SlotKey};

use crate::session::CycleStats;
use crate::slots::{Slot, gate};

/// Where a lazy step's selector output is recorded.
#[derive(Debug, Clone, Copy)]
enum Place {
    /// Next execution position.
    Next,
    Key(SlotKey),
}

/// A cycle in progress.
///
/// Only lent to the body of [`Session::try_cycle`](crate::Session::try_cycle);
/// it cannot outlive the cycle, so nothing can observe half-derived state.
/// Steps run in call order. After a structural fault every later step is
/// inert: no selector, compute, or produce function is called.
#[derive(Debug)]
pub struct Cycle<R, D, E> {
    label: &'static str,
    raw: R,
    derived: D,
    previous: Vec<Slot>,
    current: Vec<Slot>,
    previous_keyed: HashMap<SlotKey, Slot>,
    current_keyed: HashMap<SlotKey, Slot>,
    pending: Effects<E>,
    stats: CycleStats,
    fault: Option<CycleFault>,
}

/// Everything a finished cycle hands back to the session.
pub(crate) struct Committed<R, D, E> {
    pub(crate) raw: R,
    pub(crate) derived: D,
    pub(crate) slots: Vec<Slot>,
    pub(crate) keyed: HashMap<SlotKey, Slot>,
    pub(crate) effects: Effects<E>,
    pub(crate) stats: CycleStats,
}

impl<R, D, E> Cycle<R, D, E> {
    pub(crate) fn begin(
        label: &'static str,
        raw: R,
        derived: D,
        previous: Vec<Slot>,
        previous_keyed: HashMap<SlotKey, Slot>,
        transition_effect: Effects<E>,
        slot_capacity: usize,
    ) -> Self {
        let capacity = slot_capacity.max(previous.len());
        Self {
            label,
            raw,
            derived,
            previous,
            current: Vec::with_capacity(capacity),
            previous_keyed,
            current_keyed: HashMap::new(),
            pending: transition_effect,
            stats: CycleStats::default(),
            fault: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn raw(&self) -> &R {
        &self.raw
    }

    #[inline]
    #[must_use]
    pub fn derived(&self) -> &D {
        &self.derived
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Number of positional lazy steps executed so far this cycle.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current.len()
    }

    /// Whether a structural fault has already aborted this cycle.
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Unconditional derivation: `compute` runs every cycle and its output
    /// replaces the derived state. Consumes no slot.
    pub fn derive<F>(&mut self, compute: F) -> &mut Self
    where
        F: FnOnce(&R, &D) -> D,
    {
        if self.fault.is_none() {
            self.derived = compute(&self.raw, &self.derived);
        }
        self
    }

    /// Unconditional effect scheduling: `produce` runs every cycle and its
    /// output is appended to the cycle's effects. Consumes no slot.
    pub fn schedule<X, F>(&mut self, produce: F) -> &mut Self
    where
        F: FnOnce(&R, &D) -> X,
        X: Into<Effects<E>>,
    {
        if self.fault.is_none() {
            let effect = produce(&self.raw, &self.derived);
            self.pending.append(effect);
        }
        self
    }

    /// Selector-gated derivation.
    ///
    /// `select` runs every cycle and its output takes the next slot. `compute`
    /// runs only when that output differs from the value recorded at the same
    /// position last cycle, or when there is no such value yet.
    pub fn derive_lazy<K, S, F>(&mut self, select: S, compute: F) -> &mut Self
    where
        K: PartialEq + 'static,
        S: FnOnce(&R) -> K,
        F: FnOnce(&R, &D, &K) -> D,
    {
        self.gated(Place::Next, select, |cycle, selected| {
            cycle.derived = compute(&cycle.raw, &cycle.derived, selected);
        });
        self
    }

    /// Selector-gated effect scheduling. Same gating as
    /// [`derive_lazy`](Self::derive_lazy); an unchanged selection appends
    /// nothing.
    pub fn schedule_lazy<K, X, S, F>(&mut self, select: S, produce: F) -> &mut Self
    where
        K: PartialEq + 'static,
        S: FnOnce(&R) -> K,
        F: FnOnce(&R, &D, &K) -> X,
        X: Into<Effects<E>>,
    {
        self.gated(Place::Next, select, |cycle, selected| {
            let effect = produce(&cycle.raw, &cycle.derived, selected);
            cycle.pending.append(effect);
        });
        self
    }

    /// Selector-gated derivation addressed by `key` instead of position.
    ///
    /// Keyed steps may run conditionally or move around: they are compared
    /// against the value recorded under the same key in the previous cycle and
    /// do not count toward the positional slot sequence. A key that did not run
    /// last cycle starts fresh.
    pub fn derive_keyed<K, S, F>(&mut self, key: SlotKey, select: S, compute: F) -> &mut Self
    where
        K: PartialEq + 'static,
        S: FnOnce(&R) -> K,
        F: FnOnce(&R, &D, &K) -> D,
    {
        self.gated(Place::Key(key), select, |cycle, selected| {
            cycle.derived = compute(&cycle.raw, &cycle.derived, selected);
        });
        self
    }

    /// Selector-gated effect scheduling addressed by `key`.
    pub fn schedule_keyed<K, X, S, F>(&mut self, key: SlotKey, select: S, produce: F) -> &mut Self
    where
        K: PartialEq + 'static,
        S: FnOnce(&R) -> K,
        F: FnOnce(&R, &D, &K) -> X,
        X: Into<Effects<E>>,
    {
        self.gated(Place::Key(key), select, |cycle, selected| {
            let effect = produce(&cycle.raw, &cycle.derived, selected);
            cycle.pending.append(effect);
        });
        self
    }

    fn gated<K, S, W>(&mut self, place: Place, select: S, work: W)
    where
        K: PartialEq + 'static,
        S: FnOnce(&R) -> K,
        W: FnOnce(&mut Self, &K),
    {
        if self.fault.is_some() {
            return;
        }

        if let Place::Key(key) = place
            && self.current_keyed.contains_key(&key)
        {
            self.raise(CycleFault::DuplicateKey {
                label: self.label,
                key,
            });
            return;
        }

        let selected = select(&self.raw);
        let position = self.current.len();
        let recorded = match place {
            Place::Next => self.previous.get(position),
            Place::Key(key) => self.previous_keyed.get(&key),
        };

        let verdict = match gate(recorded, &selected) {
            Ok(verdict) => verdict,
            Err(expected) => {
                let found = type_name::<K>();
                let fault = match place {
                    Place::Next => CycleFault::SlotTypeMismatch {
                        label: self.label,
                        position,
                        expected,
                        found,
                    },
                    Place::Key(key) => CycleFault::KeyedTypeMismatch {
                        label: self.label,
                        key,
                        expected,
                        found,
                    },
                };
                self.raise(fault);
                return;
            }
        };

        match place {
            Place::Next => trace!(
                session = self.label,
                slot = position,
                gate = verdict.as_str(),
                "lazy step"
            ),
            Place::Key(key) => trace!(
                session = self.label,
                key = key.as_str(),
                gate = verdict.as_str(),
                "keyed step"
            ),
        }

        if verdict.runs() {
            self.stats.computed += 1;
            work(self, &selected);
        } else {
            self.stats.skipped += 1;
        }

        let slot = Slot::new(selected);
        match place {
            Place::Next => self.current.push(slot),
            Place::Key(key) => {
                self.current_keyed.insert(key, slot);
            }
        }
    }

    fn raise(&mut self, fault: CycleFault) {
        error!(session = self.label, %fault, "structural fault; aborting cycle");
        if self.fault.is_none() {
            self.fault = Some(fault);
        }
    }

    /// Enforce the structural-consistency invariant and hand back the
    /// committed parts. `previous_count` is the slot count recorded before the
    /// transition ran.
    pub(crate) fn finish(mut self, previous_count: usize) -> Result<Committed<R, D, E>, CycleFault> {
        if let Some(fault) = self.fault.take() {
            return Err(fault);
        }

        let current_count = self.current.len();
        if previous_count != 0 && previous_count != current_count {
            let fault = CycleFault::SlotCountMismatch {
                label: self.label,
                previous: previous_count,
                current: current_count,
            };
            error!(session = self.label, %fault, "structural fault; aborting cycle");
            return Err(fault);
        }

        self.stats.effects = self.pending.len();
        Ok(Committed {
            raw: self.raw,
            derived: self.derived,
            slots: self.current,
            keyed: self.current_keyed,
            effects: self.pending,
            stats: self.stats,
        })
    }
}
