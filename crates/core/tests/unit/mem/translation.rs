//! Page walk tests.
//!
//! Each test builds page tables by hand in a RAM region and drives
//! `Memory::translate` with an explicit context, so privilege, SUM, and
//! MXR can be varied without touching CSR state. One end-to-end test
//! runs an instruction through a live hart under SV39.

use pretty_assertions::assert_eq;
use rvemu_core::common::PrivMode;
use rvemu_core::csr::addr;
use rvemu_core::mem::pte::Pte;
use rvemu_core::mem::{Attr, FaultKind, Memory, Section, TranslationCtx, VmMode};

use crate::common::harness::{TestContext, RAM_BASE};

const ROOT: u64 = RAM_BASE; // level-2 (sv39) or level-1 (sv32) table
const ROOT_PPN: u64 = ROOT >> 12;
const L1: u64 = RAM_BASE + 0x1000;
const L0: u64 = RAM_BASE + 0x2000;
const DATA: u64 = RAM_BASE + 0x3000;

fn ram() -> Memory {
    let mut m = Memory::new();
    m.add(Box::new(Section::new("ram", RAM_BASE, 0x10_0000, Attr::RWX)));
    m
}

fn pte(pa: u64, flags: u64) -> u64 {
    (pa >> 12) << 10 | flags
}

fn ctx(vaddr: u64, access: Attr, vm: VmMode) -> TranslationCtx {
    TranslationCtx {
        vaddr,
        access,
        mode: PrivMode::Supervisor,
        mxr: false,
        sum: false,
        vm,
        root_ppn: ROOT_PPN,
    }
}

/// Maps virtual page 1 (VA 0x1000) to `DATA` through a full three-level
/// walk, with the given leaf flags.
fn map_sv39(m: &mut Memory, leaf_flags: u64) {
    m.write_u64(ROOT, pte(L1, Pte::V)).unwrap();
    m.write_u64(L1, pte(L0, Pte::V)).unwrap();
    m.write_u64(L0 + 8, pte(DATA, leaf_flags)).unwrap();
}

#[test]
fn sv39_three_level_walk() {
    let mut m = ram();
    map_sv39(&mut m, Pte::V | Pte::R | Pte::W);
    let pa = m.translate(&ctx(0x1080, Attr::R, VmMode::Sv39)).unwrap();
    assert_eq!(pa, DATA + 0x80);
}

#[test]
fn sv39_walk_updates_accessed_and_dirty() {
    let mut m = ram();
    map_sv39(&mut m, Pte::V | Pte::R | Pte::W);

    m.translate(&ctx(0x1000, Attr::R, VmMode::Sv39)).unwrap();
    let leaf = Pte(m.peek_u64(L0 + 8));
    assert!(leaf.accessed());
    assert!(!leaf.dirty());

    m.translate(&ctx(0x1000, Attr::W, VmMode::Sv39)).unwrap();
    let leaf = Pte(m.peek_u64(L0 + 8));
    assert!(leaf.dirty());
}

#[test]
fn sv39_invalid_pte_page_faults() {
    let mut m = ram();
    // no tables at all: the root entry reads as zero
    let err = m.translate(&ctx(0x1000, Attr::R, VmMode::Sv39)).unwrap_err();
    assert!(err.kind.has(FaultKind::PAGE));
    assert_eq!(err.region, "vm");
    assert_eq!(err.cause, rvemu_core::Cause::LoadPageFault);

    // a store faults with the store cause
    let err = m.translate(&ctx(0x1000, Attr::W, VmMode::Sv39)).unwrap_err();
    assert_eq!(err.cause, rvemu_core::Cause::StorePageFault);
}

#[test]
fn sv39_write_without_w_faults() {
    let mut m = ram();
    map_sv39(&mut m, Pte::V | Pte::R);
    assert!(m.translate(&ctx(0x1000, Attr::R, VmMode::Sv39)).is_ok());
    let err = m.translate(&ctx(0x1000, Attr::W, VmMode::Sv39)).unwrap_err();
    assert!(err.kind.has(FaultKind::PAGE));
}

#[test]
fn sv39_user_page_needs_sum() {
    let mut m = ram();
    map_sv39(&mut m, Pte::V | Pte::R | Pte::U);

    let c = ctx(0x1000, Attr::R, VmMode::Sv39);
    assert!(m.translate(&c).is_err()); // supervisor, no SUM

    let sum = TranslationCtx { sum: true, ..c };
    assert!(m.translate(&sum).is_ok());

    // SUM never permits supervisor execution from user pages
    let mut m = ram();
    map_sv39(&mut m, Pte::V | Pte::R | Pte::X | Pte::U);
    let exec = TranslationCtx {
        access: Attr::X,
        sum: true,
        ..c
    };
    assert!(m.translate(&exec).is_err());

    // and user mode requires the U bit
    let mut m = ram();
    map_sv39(&mut m, Pte::V | Pte::R);
    let user = TranslationCtx {
        mode: PrivMode::User,
        ..c
    };
    assert!(m.translate(&user).is_err());
}

#[test]
fn mxr_makes_executable_pages_readable() {
    let mut m = ram();
    map_sv39(&mut m, Pte::V | Pte::X);

    let c = ctx(0x1000, Attr::R, VmMode::Sv39);
    assert!(m.translate(&c).is_err());

    let mxr = TranslationCtx { mxr: true, ..c };
    assert!(m.translate(&mxr).is_ok());
}

#[test]
fn sv39_gigapage_translation() {
    let mut m = ram();
    // an aligned level-2 leaf covering VA 1 GiB..2 GiB, mapped onto RAM
    m.write_u64(ROOT + 8, pte(RAM_BASE, Pte::V | Pte::R)).unwrap();
    let pa = m
        .translate(&ctx(0x4000_2004, Attr::R, VmMode::Sv39))
        .unwrap();
    // the low VPN bits carry through a superpage translation
    assert_eq!(pa, RAM_BASE + 0x2004);
}

#[test]
fn sv39_misaligned_superpage_faults() {
    let mut m = ram();
    // a level-2 leaf whose low PPN bits are non-zero
    m.write_u64(ROOT + 8, pte(RAM_BASE + 0x1000, Pte::V | Pte::R))
        .unwrap();
    let err = m
        .translate(&ctx(0x4000_0000, Attr::R, VmMode::Sv39))
        .unwrap_err();
    assert!(err.kind.has(FaultKind::PAGE));
}

#[test]
fn sv32_two_level_walk() {
    let mut m = ram();
    m.write_u32(ROOT, pte(L0, Pte::V) as u32).unwrap();
    m.write_u32(L0 + 4, pte(DATA, Pte::V | Pte::R | Pte::W) as u32)
        .unwrap();

    let pa = m.translate(&ctx(0x1080, Attr::R, VmMode::Sv32)).unwrap();
    assert_eq!(pa, DATA + 0x80);

    // A/D updates work on the 4-byte entries too
    m.translate(&ctx(0x1000, Attr::W, VmMode::Sv32)).unwrap();
    let leaf = Pte(u64::from(m.peek_u32(L0 + 4)));
    assert!(leaf.accessed());
    assert!(leaf.dirty());
}

#[test]
fn sv32_megapage_translation() {
    let mut m = ram();
    // level-1 leaf: VA 4 MiB..8 MiB onto RAM
    m.write_u32(ROOT + 4, pte(RAM_BASE, Pte::V | Pte::R) as u32)
        .unwrap();
    let pa = m.translate(&ctx(0x0040_3008, Attr::R, VmMode::Sv32)).unwrap();
    assert_eq!(pa, RAM_BASE + 0x3008);
}

#[test]
fn machine_mode_bypasses_translation() {
    let mut m = ram();
    // no tables exist, but machine mode never walks
    let c = TranslationCtx {
        mode: PrivMode::Machine,
        ..ctx(0x1000, Attr::R, VmMode::Sv39)
    };
    assert_eq!(m.translate(&c).unwrap(), 0x1000);
}

#[test]
fn hart_executes_through_sv39() {
    let mut ctx = TestContext::rv64();
    // map VA 0x1000 to a code page holding `addi sp,sp,-32`
    map_sv39(&mut ctx.cpu.mem, Pte::V | Pte::R | Pte::X);
    ctx.cpu
        .mem
        .load_image(DATA, &0xFE01_0113u32.to_le_bytes())
        .unwrap();
    ctx.cpu
        .csr
        .write(addr::SATP, 8 << 60 | ROOT_PPN)
        .expect("machine mode owns satp");
    ctx.cpu.csr.set_mode(PrivMode::Supervisor);
    ctx.set_reg(2, 0x100);
    ctx.cpu.set_pc(0x1000);
    ctx.step().expect("fetch translates");
    assert_eq!(ctx.reg(2), 0x100 - 32);
    assert_eq!(ctx.cpu.pc(), 0x1004);
}
