//! Compressed-encoding execution.
//!
//! Each test runs a short parcel sequence and checks the architectural
//! effect, which exercises the scrambled immediate decodes end to end.

use pretty_assertions::assert_eq;
use rvemu_core::common::Xlen;

use crate::common::harness::{TestContext, RAM_BASE};

#[test]
fn stack_adjustment_parcels() {
    // c.addi sp,sp,-16 ; c.addi16sp sp,-64 ; c.addi4spn a2,sp,16
    let mut ctx = TestContext::rv64().load_halfwords(&[0x1141, 0x7139, 0x0830]);
    ctx.set_reg(2, 0x1000);
    ctx.step_n(3);
    assert_eq!(ctx.reg(2), 0x1000 - 16 - 64);
    assert_eq!(ctx.reg(12), 0x1000 - 16 - 64 + 16);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 6);
}

#[test]
fn register_moves_and_adds() {
    // c.mv a0,a1 ; c.add a0,a1
    let mut ctx = TestContext::rv64().load_halfwords(&[0x852E, 0x952E]);
    ctx.set_reg(11, 21);
    ctx.step_n(2);
    assert_eq!(ctx.reg(10), 42);
}

#[test]
fn stack_relative_word_store_and_load() {
    // c.swsp a0,0 ; c.lwsp a1,0
    let mut ctx = TestContext::rv32().load_halfwords(&[0xC02A, 0x4582]);
    ctx.set_reg(2, RAM_BASE + 0x100);
    ctx.set_reg(10, 0xDEAD_BEEF);
    ctx.step_n(2);
    assert_eq!(ctx.reg(11), 0xFFFF_FFFF_DEAD_BEEF); // rv32 sign extension
    assert_eq!(ctx.cpu.mem.peek_u32(RAM_BASE + 0x100), 0xDEAD_BEEF);
}

#[test]
fn doubleword_parcels_on_rv64() {
    // c.sd a4,0(a3) ; c.ld a5,0(a3)
    let mut ctx = TestContext::rv64().load_halfwords(&[0xE298, 0x629C]);
    ctx.set_reg(13, RAM_BASE + 0x200);
    ctx.set_reg(14, 0x0123_4567_89AB_CDEF);
    ctx.step_n(2);
    assert_eq!(ctx.reg(15), 0x0123_4567_89AB_CDEF);
}

#[test]
fn addiw_truncates_and_extends() {
    // c.addiw a0,-1
    let mut ctx = TestContext::rv64().load_halfwords(&[0x357D]);
    ctx.set_reg(10, 0x1_0000_0000);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), u64::MAX); // (0 - 1) sign extended from 32 bits
}

#[test]
fn register_jump() {
    // c.jr ra
    let mut ctx = TestContext::rv64().load_halfwords(&[0x8082]);
    ctx.set_reg(1, RAM_BASE + 0x40);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 0x40);
}

#[test]
fn conditional_branch() {
    // c.beqz a0,+8 twice: first not taken, then taken
    let mut ctx = TestContext::rv64().load_halfwords(&[0xC501]);
    ctx.set_reg(10, 1);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 2);

    let mut ctx = TestContext::rv64().load_halfwords(&[0xC501]);
    ctx.step_n(1);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 8);
}

#[test]
fn c_jal_links_on_rv32_only() {
    // c.jal +0x10 : offset 16 => imm[4]=1 at bit 11
    let mut ctx = TestContext::new(Xlen::Rv32, "ic").load_halfwords(&[0x2801]);
    ctx.step_n(1);
    assert_eq!(ctx.reg(1), RAM_BASE + 2);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 16);
}

#[test]
fn compressed_and_full_width_interleave() {
    // c.li a4,1 ; addi a4,a4,2 (32-bit) ; c.li a5,3
    let mut image = Vec::new();
    image.extend_from_slice(&0x4705u16.to_le_bytes());
    image.extend_from_slice(&0x0027_0713u32.to_le_bytes());
    image.extend_from_slice(&0x478Du16.to_le_bytes());
    let mut ctx = TestContext::rv64();
    ctx.cpu
        .mem
        .load_image(RAM_BASE, &image)
        .expect("program fits in ram");
    ctx.cpu.set_pc(RAM_BASE);
    ctx.step_n(3);
    assert_eq!(ctx.reg(14), 3);
    assert_eq!(ctx.reg(15), 3);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 8);
}
