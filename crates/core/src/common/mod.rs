//! Common utilities and types shared across the simulator.
//!
//! This module provides the fundamental building blocks used by every other
//! component:
//! 1. **Bit-field codec:** Mask, extract, and sign-extend helpers for
//!    instruction words.
//! 2. **Trap causes:** The RISC-V exception cause codes carried by faults.
//! 3. **Hart parameters:** Register width and privilege mode enums shared
//!    by the memory and CSR layers.

/// Bit-field extraction and sign-extension helpers.
pub mod bits;

/// RISC-V trap cause codes.
pub mod cause;

pub use cause::Cause;

/// Integer register width of a simulated hart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Xlen {
    /// 32-bit registers and addresses.
    Rv32,
    /// 64-bit registers and addresses.
    Rv64,
}

impl Xlen {
    /// Register width in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::Rv32 => 32,
            Self::Rv64 => 64,
        }
    }

    /// Mask applied to addresses and the program counter.
    pub fn addr_mask(self) -> u64 {
        match self {
            Self::Rv32 => 0xFFFF_FFFF,
            Self::Rv64 => u64::MAX,
        }
    }
}

/// Privilege mode of a hart.
///
/// The numeric values match the encoding used by `mstatus.MPP`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum PrivMode {
    /// User mode.
    User = 0,
    /// Supervisor mode.
    Supervisor = 1,
    /// Machine mode.
    Machine = 3,
}

impl PrivMode {
    /// Decodes a 2-bit privilege encoding, mapping the reserved value to
    /// machine mode.
    pub fn from_bits(x: u64) -> Self {
        match x & 3 {
            0 => Self::User,
            1 => Self::Supervisor,
            _ => Self::Machine,
        }
    }
}

impl std::fmt::Display for PrivMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "U"),
            Self::Supervisor => write!(f, "S"),
            Self::Machine => write!(f, "M"),
        }
    }
}

impl std::fmt::Display for Xlen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rv32 => write!(f, "rv32"),
            Self::Rv64 => write!(f, "rv64"),
        }
    }
}
