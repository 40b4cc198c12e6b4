//! Cycle sessions for Reflow.
//!
//! A [`Session`] owns one derivation pipeline of a model/update loop: the raw
//! state written only by transitions, the derived state written only by
//! declared steps, and the selector history that decides which steps may be
//! skipped. Each message runs one cycle:
//!
//! ```text
//! Session --try_cycle(transition, body)--> (Session, Effects<E>)
//!              |
//!              +- transition(raw) -> (raw', effect)        always, exactly once
//!              +- body(&mut Cycle)
//!                   derive / schedule                       every cycle
//!                   derive_lazy / schedule_lazy             when the selector output changed
//!                   derive_keyed / schedule_keyed           same, addressed by SlotKey
//!              +- structural check, commit slots
//! ```
//!
//! # Positional memoization
//!
//! Lazy steps have no names. The Nth lazy step of a cycle is compared against
//! the Nth lazy step of the previous cycle, so the lazy-step sequence must be
//! identical on every cycle: never run a lazy step conditionally, and treat
//! adding, removing, or reordering lazy steps as a change to the session's
//! contract. A cycle that runs a different number of lazy steps than the one
//! before it raises [`CycleFault::SlotCountMismatch`]. Steps that genuinely
//! need to run conditionally should use the keyed variants instead.
//!
//! Effects are inert: the engine only collects them, in declaration order,
//! and hands the batch back to the caller.

mod compose;
mod cycle;
mod session;
mod slots;

pub use compose::{compose, try_compose};
pub use cycle::Cycle;
pub use session::{CycleStats, Session, SessionOptions};

pub use reflow_types::{CycleFault, Effects, Shared, SlotKey, unchanged};
