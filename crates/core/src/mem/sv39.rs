//! SV39 virtual memory translation.
//!
//! A 39-bit virtual address maps through a three-level page table to a
//! 56-bit physical address. Page table entries are 8 bytes.

use tracing::trace;

use super::attr::Attr;
use super::error::MemFault;
use super::pte::Pte;
use super::va::{TranslationCtx, PAGE_MASK, PAGE_SHIFT};
use super::Memory;

const LEVELS: i32 = 3;
const PTE_SIZE: u64 = 8;

fn vpn(va: u64, i: i32) -> u64 {
    (va >> (12 + 9 * i as u32)) & 0x1FF
}

/// PPN bits of an SV39 entry from level `lo_level` upward. Level
/// boundaries are at PTE bits 10, 19, and 28; the high end is bit 53.
fn ppn(pte: Pte, lo_level: i32) -> u64 {
    let lo = [10, 19, 28][lo_level as usize];
    pte.bits(53, lo)
}

impl Memory {
    pub(super) fn walk_sv39(&mut self, ctx: &TranslationCtx) -> Result<u64, MemFault> {
        let va = ctx.vaddr;

        // 1. Start at the root table.
        let mut base = ctx.root_ppn << PAGE_SHIFT;
        let mut i = LEVELS - 1;

        let (pte_addr, mut pte) = loop {
            // 2. Fetch the PTE for this level. A failed fetch raises a page
            // fault for the original access.
            let pte_addr = base + vpn(va, i) * PTE_SIZE;
            let raw = self
                .read_phys_u64(pte_addr)
                .map_err(|_| ctx.page_fault())?;
            let pte = Pte(raw);
            trace!(level = i, pte_addr, pte = raw, "sv39 walk");

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
            base = pte.bits(53, 10) << PAGE_SHIFT;
        };

        // 5. Check leaf permissions against the access, privilege mode,
        // MXR, and SUM.
        ctx.check_leaf(pte)?;

        // 6. A superpage leaf with non-zero low PPN bits is misaligned.
        if i > 0 {
            let hi = [18, 27][(i - 1) as usize];
            if pte.bits(hi, 10) != 0 {
                return Err(ctx.page_fault());
            }
        }

        // 7. Update A, and D on stores. The PTE is re-read so the write-back
        // never publishes the effective bits computed above.
        let need_a = !pte.accessed();
        let need_d = ctx.access.has(Attr::W) && !pte.dirty();
        if need_a || need_d {
            let raw = self
                .read_phys_u64(pte_addr)
                .map_err(|_| ctx.page_fault())?;
            let mut updated = raw;
            if need_a {
                updated |= Pte::A;
            }
            if need_d {
                updated |= Pte::D;
            }
            self.write_phys_u64(pte_addr, updated)
                .map_err(|_| ctx.page_fault())?;
            pte = Pte(updated);
        }

        // 8. Assemble the physical address. Superpage translations keep the
        // low VPN bits of the virtual address.
        let mut pa = ppn(pte, i);
        match i {
            2 => pa = (pa << 18) | (vpn(va, 1) << 9) | vpn(va, 0),
            1 => pa = (pa << 9) | vpn(va, 0),
            _ => {}
        }
        Ok((pa << PAGE_SHIFT) | (va & PAGE_MASK))
    }
}
