//! Memory fault types.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::common::Cause;

/// A bit mask of memory fault kinds.
///
/// A single access can fail for more than one reason at once (e.g. a
/// misaligned write to a read-only region), so the kinds compose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaultKind(u8);

impl FaultKind {
    /// Access crossed an alignment boundary the region does not allow.
    pub const ALIGN: Self = Self(1);
    /// Read of a non-readable region.
    pub const READ: Self = Self(1 << 1);
    /// Write to a non-writable region.
    pub const WRITE: Self = Self(1 << 2);
    /// Instruction fetch from a non-executable region.
    pub const EXEC: Self = Self(1 << 3);
    /// Virtual address translation failed.
    pub const PAGE: Self = Self(1 << 4);
    /// Access fell outside every mapped region.
    pub const EMPTY: Self = Self(1 << 5);
    /// A memory breakpoint triggered.
    pub const BREAK: Self = Self(1 << 6);

    /// Returns true if every bit of `other` is set in `self`.
    pub fn has(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FaultKind {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FaultKind {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::ALIGN, "align"),
            (Self::READ, "read"),
            (Self::WRITE, "write"),
            (Self::EXEC, "exec"),
            (Self::PAGE, "page"),
            (Self::EMPTY, "empty"),
            (Self::BREAK, "break"),
        ];
        let mut first = true;
        for (bit, name) in names {
            if self.has(bit) {
                if !first {
                    write!(f, "|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// A failed memory access.
///
/// Carries the fault kind, the address and name of the region the access
/// landed in, and the trap cause the fault maps to.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} fault at {addr:#x} ({region}): {cause}")]
pub struct MemFault {
    /// What went wrong.
    pub kind: FaultKind,
    /// The virtual address of the access.
    pub addr: u64,
    /// Name of the region the access resolved to.
    pub region: String,
    /// The trap cause this fault raises.
    pub cause: Cause,
}

impl MemFault {
    /// Builds a fault record for an access to `addr` within `region`.
    pub fn new(kind: FaultKind, addr: u64, region: &str, cause: Cause) -> Self {
        Self {
            kind,
            addr,
            region: region.to_owned(),
            cause,
        }
    }
}
