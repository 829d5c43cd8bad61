//! Memory region attributes.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A bit mask of memory access attributes.
///
/// `R`/`W`/`X` gate loads, stores, and instruction fetches. `M` permits
/// misaligned data access within the region; without it, any access that is
/// not naturally aligned faults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attr(u8);

impl Attr {
    /// No access permitted.
    pub const NONE: Self = Self(0);
    /// Readable.
    pub const R: Self = Self(1);
    /// Writable.
    pub const W: Self = Self(1 << 1);
    /// Executable.
    pub const X: Self = Self(1 << 2);
    /// Misaligned access allowed.
    pub const M: Self = Self(1 << 3);

    /// Read/write.
    pub const RW: Self = Self(Self::R.0 | Self::W.0);
    /// Read/execute.
    pub const RX: Self = Self(Self::R.0 | Self::X.0);
    /// Read/write/execute.
    pub const RWX: Self = Self(Self::R.0 | Self::W.0 | Self::X.0);
    /// Read/write with misaligned access allowed.
    pub const RWM: Self = Self(Self::R.0 | Self::W.0 | Self::M.0);

    /// Returns true if every bit of `other` is set in `self`.
    pub fn has(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if `self` and `other` share any bit.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Attr {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Attr {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Attr {
    /// Renders the attribute set as an `rwxm` permission string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (Self::R, 'r'),
            (Self::W, 'w'),
            (Self::X, 'x'),
            (Self::M, 'm'),
        ];
        for (bit, c) in flags {
            write!(f, "{}", if self.has(bit) { c } else { '-' })?;
        }
        Ok(())
    }
}
