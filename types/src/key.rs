use std::fmt;

/// Stable name addressing a keyed lazy step's slot.
///
/// Keys are compile-time names, so they cannot drift between cycles the way a
/// formatted string could. Construction rejects the empty name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(&'static str);

impl SlotKey {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        assert!(!name.is_empty(), "SlotKey must not be empty");
        Self(name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
