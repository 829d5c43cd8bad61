//! SV32 virtual memory translation.
//!
//! A 32-bit virtual address maps through a two-level page table to a
//! 34-bit physical address. Page table entries are 4 bytes.

use tracing::trace;

use super::attr::Attr;
use super::error::MemFault;
use super::pte::Pte;
use super::va::{TranslationCtx, PAGE_MASK, PAGE_SHIFT};
use super::Memory;

const LEVELS: i32 = 2;
const PTE_SIZE: u64 = 4;

fn vpn(va: u64, i: i32) -> u64 {
    match i {
        0 => (va >> 12) & 0x3FF,
        _ => (va >> 22) & 0x3FF,
    }
}

/// PPN bits of an SV32 entry, sliced at `lo_level`: level 0 starts at PTE
/// bit 10, level 1 at bit 20. The high end is always bit 31.
fn ppn(pte: Pte, lo_level: i32) -> u64 {
    match lo_level {
        0 => pte.bits(31, 10),
        _ => pte.bits(31, 20),
    }
}

impl Memory {
    pub(super) fn walk_sv32(&mut self, ctx: &TranslationCtx) -> Result<u64, MemFault> {
        let va = ctx.vaddr;

        // 1. Start at the root table.
        let mut base = ctx.root_ppn << PAGE_SHIFT;
        let mut i = LEVELS - 1;

        let (pte_addr, mut pte) = loop {
            // 2. Fetch the PTE for this level. A failed fetch raises a page
            // fault for the original access.
            let pte_addr = base + vpn(va, i) * PTE_SIZE;
            let raw = self
                .read_phys_u32(pte_addr)
                .map_err(|_| ctx.page_fault())?;
            let pte = Pte(u64::from(raw));
            trace!(level = i, pte_addr, pte = raw, "sv32 walk");

            // 3. Invalid entries (including W-without-R) fault.
            if !pte.is_valid() {
                return Err(ctx.page_fault());
            }

            // 4. Leaf or pointer. Running out of levels faults.
            if !pte.is_pointer() {
                break (pte_addr, pte);
            }
            i -= 1;
            if i < 0 {
                return Err(ctx.page_fault());
            }
            base = pte.bits(31, 10) << PAGE_SHIFT;
        };

        // 5. Check leaf permissions against the access, privilege mode,
        // MXR, and SUM.
        ctx.check_leaf(pte)?;

        // 6. A superpage leaf with non-zero low PPN bits is misaligned.
        if i > 0 && pte.bits(19, 10) != 0 {
            return Err(ctx.page_fault());
        }

        // 7. Update A, and D on stores. The PTE is re-read so the write-back
        // never publishes the effective bits computed above.
        let need_a = !pte.accessed();
        let need_d = ctx.access.has(Attr::W) && !pte.dirty();
        if need_a || need_d {
            let raw = self
                .read_phys_u32(pte_addr)
                .map_err(|_| ctx.page_fault())?;
            let mut updated = u64::from(raw);
            if need_a {
                updated |= Pte::A;
            }
            if need_d {
                updated |= Pte::D;
            }
            self.write_phys_u32(pte_addr, updated as u32)
                .map_err(|_| ctx.page_fault())?;
            pte = Pte(updated);
        }

        // 8. Assemble the physical address. Superpage translations keep the
        // low VPN bits of the virtual address.
        let mut pa = ppn(pte, i);
        if i == 1 {
            pa = (pa << 10) | vpn(va, 0);
        }
        Ok((pa << PAGE_SHIFT) | (va & PAGE_MASK))
    }
}
