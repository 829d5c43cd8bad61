//! Virtual address translation context and dispatch.

use crate::common::{Cause, PrivMode};

use super::attr::Attr;
use super::error::{FaultKind, MemFault};
use super::pte::Pte;
use super::Memory;

/// Page size used by every supported translation scheme.
pub const PAGE_SHIFT: u32 = 12;
/// Offset mask within a page.
pub const PAGE_MASK: u64 = (1 << PAGE_SHIFT) - 1;

/// Address translation scheme selected by `satp`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VmMode {
    /// No translation.
    #[default]
    Bare,
    /// Two-level 32-bit scheme (34-bit physical addresses).
    Sv32,
    /// Three-level 39-bit scheme (56-bit physical addresses).
    Sv39,
}

/// Everything a page walk needs to know about the access being translated.
///
/// Built per-access by the CPU from its CSR state, so the memory subsystem
/// never reads CSRs itself.
#[derive(Clone, Copy, Debug)]
pub struct TranslationCtx {
    /// The virtual address.
    pub vaddr: u64,
    /// The access kind: exactly one of [`Attr::R`], [`Attr::W`], [`Attr::X`].
    pub access: Attr,
    /// Effective privilege mode (after `mstatus.MPRV` substitution).
    pub mode: PrivMode,
    /// `mstatus.MXR`: executable pages become readable.
    pub mxr: bool,
    /// `mstatus.SUM`: supervisor may access user pages.
    pub sum: bool,
    /// Active translation scheme.
    pub vm: VmMode,
    /// Root page table PPN from `satp`.
    pub root_ppn: u64,
}

impl TranslationCtx {
    /// A page-fault for this access, with the cause matching the access
    /// kind.
    pub(super) fn page_fault(&self) -> MemFault {
        let cause = if self.access.has(Attr::X) {
            Cause::InstructionPageFault
        } else if self.access.has(Attr::W) {
            Cause::StorePageFault
        } else {
            Cause::LoadPageFault
        };
        MemFault::new(FaultKind::PAGE, self.vaddr, "vm", cause)
    }

    /// Leaf-PTE permission and privilege check, shared by the SV32 and SV39
    /// walkers.
    pub(super) fn check_leaf(&self, pte: Pte) -> Result<(), MemFault> {
        if self.access.has(Attr::R) && !pte.readable_with_mxr(self.mxr) {
            return Err(self.page_fault());
        }
        if self.access.has(Attr::W) && !pte.writable() {
            return Err(self.page_fault());
        }
        if self.access.has(Attr::X) && !pte.executable() {
            return Err(self.page_fault());
        }
        match self.mode {
            PrivMode::User => {
                if !pte.user() {
                    return Err(self.page_fault());
                }
            }
            PrivMode::Supervisor => {
                if pte.user() {
                    if !self.sum {
                        return Err(self.page_fault());
                    }
                    // The supervisor may never execute from user pages,
                    // regardless of SUM.
                    if self.access.has(Attr::X) {
                        return Err(self.page_fault());
                    }
                }
            }
            PrivMode::Machine => {}
        }
        Ok(())
    }
}

impl Memory {
    /// Translates a virtual address under `ctx`.
    ///
    /// Machine mode and bare mode pass addresses through untranslated;
    /// otherwise the SV32 or SV39 walker runs, updating A/D bits in the
    /// page tables as a side effect.
    pub fn translate(&mut self, ctx: &TranslationCtx) -> Result<u64, MemFault> {
        if ctx.mode == PrivMode::Machine {
            return Ok(ctx.vaddr);
        }
        match ctx.vm {
            VmMode::Bare => Ok(ctx.vaddr),
            VmMode::Sv32 => self.walk_sv32(ctx),
            VmMode::Sv39 => self.walk_sv39(ctx),
        }
    }
}
