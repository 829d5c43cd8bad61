//! RISC-V trap cause codes.
//!
//! The synchronous exception causes defined by the privileged specification,
//! as carried by memory faults and surfaced to trap handlers. Interrupt
//! causes are out of scope for this core.

/// A synchronous exception cause (`mcause`/`scause` encoding).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum Cause {
    /// Instruction fetch from a misaligned address.
    InstructionAddressMisaligned = 0,
    /// Instruction fetch violating region attributes or unmapped memory.
    InstructionAccessFault = 1,
    /// No descriptor matched the instruction word.
    IllegalInstruction = 2,
    /// EBREAK, or a triggered memory breakpoint.
    Breakpoint = 3,
    /// Load from a misaligned address.
    LoadAddressMisaligned = 4,
    /// Load violating region attributes or unmapped memory.
    LoadAccessFault = 5,
    /// Store to a misaligned address.
    StoreAddressMisaligned = 6,
    /// Store violating region attributes or unmapped memory.
    StoreAccessFault = 7,
    /// ECALL executed in user mode.
    EcallFromU = 8,
    /// ECALL executed in supervisor mode.
    EcallFromS = 9,
    /// ECALL executed in machine mode.
    EcallFromM = 11,
    /// Page fault on instruction fetch.
    InstructionPageFault = 12,
    /// Page fault on load.
    LoadPageFault = 13,
    /// Page fault on store.
    StorePageFault = 15,
}

impl Cause {
    /// The numeric cause code written to `mcause`/`scause`.
    pub fn code(self) -> u64 {
        self as u64
    }
}

impl std::fmt::Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InstructionAddressMisaligned => "instruction address misaligned",
            Self::InstructionAccessFault => "instruction access fault",
            Self::IllegalInstruction => "illegal instruction",
            Self::Breakpoint => "breakpoint",
            Self::LoadAddressMisaligned => "load address misaligned",
            Self::LoadAccessFault => "load access fault",
            Self::StoreAddressMisaligned => "store address misaligned",
            Self::StoreAccessFault => "store access fault",
            Self::EcallFromU => "environment call from U-mode",
            Self::EcallFromS => "environment call from S-mode",
            Self::EcallFromM => "environment call from M-mode",
            Self::InstructionPageFault => "instruction page fault",
            Self::LoadPageFault => "load page fault",
            Self::StorePageFault => "store page fault",
        };
        f.write_str(s)
    }
}
