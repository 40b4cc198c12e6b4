//! The equality oracle used to gate lazy steps.
//!
//! A lazy step reruns only when its selector output differs from the value
//! recorded at the same slot in the previous cycle. "Differs" is decided here,
//! and it is plain structural equality: `PartialEq` is already a congruence
//! over records, tuples, sequences, and trees in Rust, and it does not depend
//! on where a value lives in memory.
//!
//! The identity fast path lives in the values rather than in the oracle.
//! Selectors that project large data should return [`Shared`](crate::Shared)
//! handles; `Shared` compares pointers before pointees, and tuples compare
//! element by element, so a selector like `|raw| (raw.rows.clone(), raw.sort)`
//! costs one pointer comparison when the rows were not replaced. Values with
//! no shared allocation are compared by content only, and the answer is the
//! same either way.

/// Whether a lazy step may skip its work: `true` when `next` carries no
/// meaningful change from `previous`.
#[inline]
#[must_use]
pub fn unchanged<K>(previous: &K, next: &K) -> bool
where
    K: PartialEq + ?Sized,
{
    previous == next
}
