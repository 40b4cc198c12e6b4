//! Core value types for Reflow.
//!
//! This crate contains the inert values that flow through a cycle session:
//! effect batches, shared handles with identity-aware equality, slot keys and
//! the structural fault type. No IO, no async, no engine state.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod effects;
mod fault;
mod key;
pub mod oracle;
mod shared;

pub use effects::Effects;
pub use fault::CycleFault;
pub use key::SlotKey;
pub use oracle::unchanged;
pub use shared::Shared;
