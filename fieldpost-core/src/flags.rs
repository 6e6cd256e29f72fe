use std::{fmt, ops::BitOr, ops::BitOrAssign};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// The set of sample data a postprocessor needs from the field evaluator.
///
/// Flags are the only channel through which a postprocessor tells the
/// evaluator what to compute. An evaluator handed a set without
/// [`UpdateFlags::GRADIENTS`] may skip gradient evaluation entirely, which is
/// where most of the savings in a postprocessing pass come from.
///
/// Flags combine with `|`:
///
/// ```
/// use fieldpost_core::UpdateFlags;
///
/// let flags = UpdateFlags::VALUES | UpdateFlags::GRADIENTS;
/// assert!(flags.contains(UpdateFlags::GRADIENTS));
/// assert!(!flags.contains(UpdateFlags::HESSIANS));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct UpdateFlags(u8);

impl UpdateFlags {
    /// No sample data.
    pub const NONE: Self = Self(0);
    /// Field values at each point.
    pub const VALUES: Self = Self(1);
    /// First spatial derivatives of each component.
    pub const GRADIENTS: Self = Self(1 << 1);
    /// Second spatial derivatives of each component.
    pub const HESSIANS: Self = Self(1 << 2);
    /// Outward unit normals, supplied on face batches only.
    pub const NORMALS: Self = Self(1 << 3);

    const NAMED: [(Self, &'static str); 4] = [
        (Self::VALUES, "values"),
        (Self::GRADIENTS, "gradients"),
        (Self::HESSIANS, "hessians"),
        (Self::NORMALS, "normals"),
    ];

    /// Returns `true` if every flag in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the union of two flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for UpdateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for UpdateFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for UpdateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_contains() {
        let flags = UpdateFlags::VALUES | UpdateFlags::HESSIANS;

        assert!(flags.contains(UpdateFlags::VALUES));
        assert!(flags.contains(UpdateFlags::HESSIANS));
        assert!(!flags.contains(UpdateFlags::GRADIENTS));
        assert!(!flags.contains(UpdateFlags::VALUES | UpdateFlags::NORMALS));
        assert!(flags.contains(UpdateFlags::NONE));
    }

    #[test]
    fn bitor_assign_accumulates() {
        let mut flags = UpdateFlags::NONE;
        assert!(flags.is_empty());

        flags |= UpdateFlags::GRADIENTS;
        flags |= UpdateFlags::NORMALS;

        assert_eq!(flags, UpdateFlags::GRADIENTS | UpdateFlags::NORMALS);
        assert!(!flags.is_empty());
    }

    #[test]
    fn displays_set_flags_in_order() {
        let all = UpdateFlags::NORMALS
            | UpdateFlags::VALUES
            | UpdateFlags::HESSIANS
            | UpdateFlags::GRADIENTS;

        assert_eq!(all.to_string(), "values | gradients | hessians | normals");
        assert_eq!(UpdateFlags::GRADIENTS.to_string(), "gradients");
        assert_eq!(UpdateFlags::NONE.to_string(), "none");
    }

    #[cfg(feature = "serde-derive")]
    #[test]
    fn serde_round_trip() {
        let flags = UpdateFlags::GRADIENTS | UpdateFlags::NORMALS;

        let json = serde_json::to_string(&flags).expect("serialize flags");
        let back: UpdateFlags = serde_json::from_str(&json).expect("deserialize flags");

        assert_eq!(json, "10");
        assert_eq!(back, flags);
    }
}
