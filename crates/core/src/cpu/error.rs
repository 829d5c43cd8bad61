//! Step outcomes and the fault log.

use std::collections::VecDeque;

use crate::csr::CsrError;
use crate::mem::MemFault;

/// Why a step did not complete normally.
///
/// A step either succeeds or reports exactly one of these. Faults carry
/// the PC of the faulting instruction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// No configured descriptor matched the fetched word.
    #[error("illegal instruction {word:#010x} at {pc:#x}")]
    Illegal {
        /// PC of the instruction.
        pc: u64,
        /// The unmatched instruction word.
        word: u32,
    },
    /// A fetch, load, or store faulted.
    #[error("at {pc:#x}: {fault}")]
    Memory {
        /// PC of the instruction.
        pc: u64,
        /// The underlying memory fault.
        #[source]
        fault: MemFault,
    },
    /// ECALL with no system-call dispatcher installed.
    #[error("environment call at {pc:#x}")]
    Ecall {
        /// PC of the ECALL.
        pc: u64,
    },
    /// EBREAK.
    #[error("breakpoint at {pc:#x}")]
    Ebreak {
        /// PC of the EBREAK.
        pc: u64,
    },
    /// A CSR instruction was refused.
    #[error("at {pc:#x}: {source}")]
    Csr {
        /// PC of the instruction.
        pc: u64,
        /// The underlying CSR error.
        #[source]
        source: CsrError,
    },
    /// The instruction matched but its semantics are not implemented.
    #[error("unimplemented instruction '{name}' at {pc:#x}")]
    Unimplemented {
        /// PC of the instruction.
        pc: u64,
        /// Mnemonic of the instruction.
        name: String,
    },
    /// The PC did not change across a full step.
    #[error("stuck pc at {pc:#x}")]
    StuckPc {
        /// The unchanged PC.
        pc: u64,
    },
}

impl StepError {
    /// PC of the instruction that produced this outcome.
    pub fn pc(&self) -> u64 {
        match self {
            Self::Illegal { pc, .. }
            | Self::Memory { pc, .. }
            | Self::Ecall { pc }
            | Self::Ebreak { pc }
            | Self::Csr { pc, .. }
            | Self::Unimplemented { pc, .. }
            | Self::StuckPc { pc } => *pc,
        }
    }
}

/// A bounded ring of recent step faults, kept for diagnostics.
pub struct FaultLog {
    entries: VecDeque<StepError>,
    capacity: usize,
}

impl FaultLog {
    /// Creates a log holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a fault, evicting the oldest entry when full.
    pub fn push(&mut self, err: StepError) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(err);
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &StepError> {
        self.entries.iter()
    }

    /// Number of recorded faults.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
