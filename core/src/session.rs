//! The cycle session and its boundary operation.

use std::collections::HashMap;

use tracing::debug;

use reflow_types::{CycleFault, Effects, SlotKey};

use crate::cycle::Cycle;
use crate::slots::Slot;

/// Construction options for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Tags log records and faults, so composed sessions are distinguishable.
    pub label: &'static str,
    /// Slots preallocated for the first cycle. Later cycles size from the
    /// committed history.
    pub slot_capacity: usize,
}

impl SessionOptions {
    pub const DEFAULT_LABEL: &'static str = "session";

    #[must_use]
    pub const fn labeled(label: &'static str) -> Self {
        Self {
            label,
            slot_capacity: 0,
        }
    }

    #[must_use]
    pub const fn with_slot_capacity(mut self, slot_capacity: usize) -> Self {
        self.slot_capacity = slot_capacity;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::labeled(Self::DEFAULT_LABEL)
    }
}

/// Bookkeeping of the last committed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Lazy and keyed steps whose compute/produce function ran.
    pub computed: usize,
    /// Lazy and keyed steps skipped because their selection was unchanged.
    pub skipped: usize,
    /// Effect descriptors returned, the transition's included.
    pub effects: usize,
}

/// One independent derivation pipeline.
///
/// Holds the raw state (written only by transitions), the derived state
/// (written only by declared steps) and the selector history committed by the
/// last cycle. Fields are private: the only way to change a session is to run
/// a cycle, which consumes it and returns its successor.
#[derive(Debug)]
pub struct Session<R, D> {
    raw: R,
    derived: D,
    slots: Vec<Slot>,
    keyed: HashMap<SlotKey, Slot>,
    options: SessionOptions,
    cycles: u64,
    last: CycleStats,
}

impl<R, D> Session<R, D> {
    /// A session with empty selector history. Its first cycle runs every lazy
    /// step.
    pub fn new(raw: R, derived: D) -> Self {
        Self::with_options(raw, derived, SessionOptions::default())
    }

    pub fn with_options(raw: R, derived: D, options: SessionOptions) -> Self {
        Self {
            raw,
            derived,
            slots: Vec::new(),
            keyed: HashMap::new(),
            options,
            cycles: 0,
            last: CycleStats::default(),
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

    /// Read-only view for renderers.
    #[inline]
    #[must_use]
    pub fn parts(&self) -> (&R, &D) {
        (&self.raw, &self.derived)
    }

    #[must_use]
    pub fn into_parts(self) -> (R, D) {
        (self.raw, self.derived)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.options.label
    }

    /// Positional slots committed by the last cycle.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Keyed slots committed by the last cycle.
    #[must_use]
    pub fn keyed_slot_count(&self) -> usize {
        self.keyed.len()
    }

    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn last_cycle(&self) -> CycleStats {
        self.last
    }

    /// Run one cycle.
    ///
    /// `transition` runs exactly once on the raw state; its effect opens the
    /// cycle's batch. `body` then runs the declared steps in order. Returns
    /// the successor session and every effect of the cycle in production
    /// order: the transition's first, then each step's.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleFault`] when the lazy-step sequence changed shape
    /// since the previous cycle. The session is consumed either way; a
    /// faulted session's history is no longer trustworthy and is dropped.
    pub fn try_cycle<E, T, B>(self, transition: T, body: B) -> Result<(Self, Effects<E>), CycleFault>
    where
        T: FnOnce(R) -> (R, Effects<E>),
        B: FnOnce(&mut Cycle<R, D, E>),
    {
        let Session {
            raw,
            derived,
            slots,
            keyed,
            options,
            cycles,
            last: _,
        } = self;
        let previous_count = slots.len();

        let (raw, effect) = transition(raw);
        let mut cycle = Cycle::begin(
            options.label,
            raw,
            derived,
            slots,
            keyed,
            effect,
            options.slot_capacity,
        );
        body(&mut cycle);
        let committed = cycle.finish(previous_count)?;

        let cycles = cycles.wrapping_add(1);
        debug!(
            session = options.label,
            cycle = cycles,
            slots = committed.slots.len(),
            keyed = committed.keyed.len(),
            computed = committed.stats.computed,
            skipped = committed.stats.skipped,
            effects = committed.stats.effects,
            "cycle committed"
        );

        let session = Session {
            raw: committed.raw,
            derived: committed.derived,
            slots: committed.slots,
            keyed: committed.keyed,
            options,
            cycles,
            last: committed.stats,
        };
        Ok((session, committed.effects))
    }

    /// Run one cycle, treating a structural fault as a bug.
    ///
    /// # Panics
    ///
    /// Panics with the fault's diagnostic when the lazy-step sequence changed
    /// shape since the previous cycle. See [`try_cycle`](Self::try_cycle).
    #[track_caller]
    pub fn cycle<E, T, B>(self, transition: T, body: B) -> (Self, Effects<E>)
    where
        T: FnOnce(R) -> (R, Effects<E>),
        B: FnOnce(&mut Cycle<R, D, E>),
    {
        match self.try_cycle(transition, body) {
            Ok(done) => done,
            Err(fault) => panic!("{fault}"),
        }
    }

    /// Run one cycle without a message: the raw state is left as is and the
    /// transition contributes no effect. Used for the initial derivation pass.
    #[track_caller]
    pub fn refresh<E, B>(self, body: B) -> (Self, Effects<E>)
    where
        B: FnOnce(&mut Cycle<R, D, E>),
    {
        self.cycle(|raw| (raw, Effects::<E>::none()), body)
    }
}
