//! Page table entry flag decoding.
//!
//! The low 8 bits of a PTE carry the same flags in SV32 and SV39; only the
//! physical page number layout differs, so PPN slicing lives with each
//! walker while the flag logic is shared here.

/// A raw page table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pte(pub u64);

impl Pte {
    /// Valid.
    pub const V: u64 = 1;
    /// Readable.
    pub const R: u64 = 1 << 1;
    /// Writable.
    pub const W: u64 = 1 << 2;
    /// Executable.
    pub const X: u64 = 1 << 3;
    /// Accessible in user mode.
    pub const U: u64 = 1 << 4;
    /// Global mapping.
    pub const G: u64 = 1 << 5;
    /// Accessed.
    pub const A: u64 = 1 << 6;
    /// Dirty.
    pub const D: u64 = 1 << 7;

    /// Valid per the walk rules: `V` set, and not the reserved
    /// writable-but-not-readable combination.
    pub fn is_valid(self) -> bool {
        self.0 & Self::V != 0 && !(self.0 & Self::W != 0 && self.0 & Self::R == 0)
    }

    /// Points to a next-level table (valid with `R`, `W`, `X` all clear).
    pub fn is_pointer(self) -> bool {
        self.0 & (Self::X | Self::W | Self::R | Self::V) == Self::V
    }

    /// Readable leaf.
    pub fn readable(self) -> bool {
        self.0 & Self::R != 0
    }

    /// Writable leaf.
    pub fn writable(self) -> bool {
        self.0 & Self::W != 0
    }

    /// Executable leaf.
    pub fn executable(self) -> bool {
        self.0 & Self::X != 0
    }

    /// User-accessible leaf.
    pub fn user(self) -> bool {
        self.0 & Self::U != 0
    }

    /// Accessed bit set.
    pub fn accessed(self) -> bool {
        self.0 & Self::A != 0
    }

    /// Dirty bit set.
    pub fn dirty(self) -> bool {
        self.0 & Self::D != 0
    }

    /// Effective readability under `mstatus.MXR`: executable pages read as
    /// readable.
    pub fn readable_with_mxr(self, mxr: bool) -> bool {
        self.readable() || (mxr && self.executable())
    }

    /// Extracts bits `hi..=lo`.
    pub fn bits(self, hi: u32, lo: u32) -> u64 {
        (self.0 >> lo) & ((1u64 << (hi - lo + 1)) - 1)
    }
}
