//! Base integer execution.

use pretty_assertions::assert_eq;

use crate::common::builder::{i_type, r_type, s_type, u_type};
use crate::common::harness::{TestContext, RAM_BASE};

const OP: u32 = 0x33;
const OP_IMM: u32 = 0x13;
const LOAD: u32 = 0x03;
const STORE: u32 = 0x23;

#[test]
fn alu_register_ops() {
    // add/sub/and/or/xor into a0 from a1, a2
    let mut ctx = TestContext::rv64().load_program(&[
        r_type(OP, 10, 0, 11, 12, 0),    // add
        r_type(OP, 13, 0, 11, 12, 0x20), // sub
        r_type(OP, 14, 7, 11, 12, 0),    // and
        r_type(OP, 15, 6, 11, 12, 0),    // or
        r_type(OP, 16, 4, 11, 12, 0),    // xor
    ]);
    ctx.set_reg(11, 0b1100);
    ctx.set_reg(12, 0b1010);
    ctx.step_n(5);
    assert_eq!(ctx.reg(10), 0b10110);
    assert_eq!(ctx.reg(13), 0b0010);
    assert_eq!(ctx.reg(14), 0b1000);
    assert_eq!(ctx.reg(15), 0b1110);
    assert_eq!(ctx.reg(16), 0b0110);
}

#[test]
fn set_less_than_is_signed_and_unsigned() {
    let mut ctx = TestContext::rv64().load_program(&[
        r_type(OP, 10, 2, 11, 12, 0), // slt
        r_type(OP, 13, 3, 11, 12, 0), // sltu
    ]);
    ctx.set_reg(11, u64::MAX); // -1 signed, huge unsigned
    ctx.set_reg(12, 1);
    ctx.step_n(2);
    assert_eq!(ctx.reg(10), 1);
    assert_eq!(ctx.reg(13), 0);
}

#[test]
fn rv32_registers_stay_sign_extended() {
    // addi a0, zero, -1 ; srli a0, a0, 4
    let mut ctx = TestContext::rv32().load_program(&[
        i_type(OP_IMM, 10, 0, 0, -1),
        i_type(OP_IMM, 10, 5, 10, 4),
    ]);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), u64::MAX);
    // the logical shift sees the 32-bit value, not the extension bits
    ctx.step_n(1);
    assert_eq!(ctx.reg(10), 0x0FFF_FFFF);
}

#[test]
fn arithmetic_shift_keeps_the_sign() {
    // srai a0, a0, 4
    let mut ctx = TestContext::rv32().load_program(&[i_type(OP_IMM, 10, 5, 10, 4 | 0x400)]);
    ctx.set_reg(10, 0x8000_0000);
    ctx.step_n(1);
    assert_eq!(ctx.reg(10) as u32, 0xF800_0000);
}

#[test]
fn loads_sign_and_zero_extend() {
    // sw a0,0(a1) ; lb a2,0(a1) ; lbu a3,0(a1) ; lh a4,0(a1) ; lhu a5,0(a1)
    let mut ctx = TestContext::rv64().load_program(&[
        s_type(STORE, 2, 11, 10, 0),
        i_type(LOAD, 12, 0, 11, 0),
        i_type(LOAD, 13, 4, 11, 0),
        i_type(LOAD, 14, 1, 11, 0),
        i_type(LOAD, 15, 5, 11, 0),
    ]);
    ctx.set_reg(10, 0xFFFF_8080);
    ctx.set_reg(11, RAM_BASE + 0x100);
    ctx.step_n(5);
    assert_eq!(ctx.reg(12) as i64, -128);
    assert_eq!(ctx.reg(13), 0x80);
    assert_eq!(ctx.reg(14) as i64, -32640);
    assert_eq!(ctx.reg(15), 0x8080);
}

#[test]
fn rv64_word_ops_truncate_and_extend() {
    // addiw a0,a0,1 ; lwu a2,0(a1) ; ld a3,0(a1)
    let mut ctx = TestContext::rv64().load_program(&[
        i_type(0x1B, 10, 0, 10, 1),
        i_type(LOAD, 12, 6, 11, 0),
        i_type(LOAD, 13, 3, 11, 0),
    ]);
    ctx.set_reg(10, 0x7FFF_FFFF);
    ctx.set_reg(11, RAM_BASE + 0x100);
    ctx.cpu
        .mem
        .load_image(RAM_BASE + 0x100, &0xFFFF_FFFF_8000_0000u64.to_le_bytes())
        .expect("in ram");
    ctx.step_n(3);
    assert_eq!(ctx.reg(10), 0xFFFF_FFFF_8000_0000); // addiw overflowed the word
    assert_eq!(ctx.reg(12), 0x8000_0000); // lwu zero extends
    assert_eq!(ctx.reg(13), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn lui_and_auipc() {
    let mut ctx = TestContext::rv64().load_program(&[
        u_type(0x37, 10, 0x12345), // lui
        u_type(0x17, 11, 1),       // auipc
    ]);
    ctx.step_n(2);
    assert_eq!(ctx.reg(10), 0x1234_5000);
    assert_eq!(ctx.reg(11), RAM_BASE + 4 + 0x1000);
}

#[test]
fn store_fault_reports_the_region() {
    // sw to an unmapped address
    let mut ctx = TestContext::rv64().load_program(&[s_type(STORE, 2, 11, 10, 0)]);
    ctx.set_reg(11, 0x10);
    let err = ctx.step().unwrap_err();
    match err {
        rvemu_core::StepError::Memory { pc, fault } => {
            assert_eq!(pc, RAM_BASE);
            assert_eq!(fault.region, "empty");
        }
        other => panic!("expected a memory fault, got {other}"),
    }
    assert_eq!(ctx.cpu.faults.len(), 1);
}
