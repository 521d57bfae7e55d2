//! The "(Shared with: ...)" suffix on private rolls.

use std::fmt;

/// Who a private roll was shown to.
///
/// Renders non-staff names first in sorted order, then staff names sorted
/// and highlighted. With nobody to list, it names only the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedWith {
    actor: String,
    others: Vec<String>,
    staff: Vec<String>,
}

impl SharedWith {
    /// Build the suffix. Input order does not matter.
    pub fn new(actor: impl Into<String>, mut others: Vec<String>, mut staff: Vec<String>) -> Self {
        others.sort();
        staff.sort();
        Self {
            actor: actor.into(),
            others,
            staff,
        }
    }

    /// Every listed name in display order, staff highlighted.
    pub fn names(&self) -> Vec<String> {
        self.others
            .iter()
            .cloned()
            .chain(self.staff.iter().map(|name| format!("|c{name}|n")))
            .collect()
    }

    /// Whether the fallback (actor only) is used.
    pub fn is_fallback(&self) -> bool {
        self.others.is_empty() && self.staff.is_empty()
    }
}

impl fmt::Display for SharedWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fallback() {
            write!(f, "(Shared with: {})", self.actor)
        } else {
            write!(f, "(Shared with: {})", self.names().join(", "))
        }
    }
}
