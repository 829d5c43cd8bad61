//! Exact disassembly output.
//!
//! The disassembler renders ABI register names, comma-separated operands
//! with no spaces, and the common pseudo spellings. Branch and jump
//! targets are absolute.

use pretty_assertions::assert_eq;

use crate::common::harness::{TestContext, RAM_BASE};

fn disasm_of(words: &[u32], offset: u64) -> String {
    let ctx = TestContext::rv64().load_program(words);
    ctx.cpu
        .disassemble(RAM_BASE + offset)
        .expect("word decodes")
}

#[test]
fn i_type_and_pseudo_spellings() {
    assert_eq!(disasm_of(&[0xFE01_0113], 0), "addi sp,sp,-32");
    assert_eq!(disasm_of(&[0x0000_0013], 0), "nop");
    // addi with a zero immediate renders as mv
    assert_eq!(disasm_of(&[0x0005_8513], 0), "mv a0,a1");
    assert_eq!(disasm_of(&[0x0000_8067], 0), "ret");
}

#[test]
fn loads_and_stores() {
    assert_eq!(disasm_of(&[0x0005_A503], 0), "lw a0,0(a1)");
    assert_eq!(disasm_of(&[0x00A5_A023], 0), "sw a0,0(a1)");
    assert_eq!(disasm_of(&[0x0005_B503], 0), "ld a0,0(a1)");
}

#[test]
fn branch_and_jump_targets_are_absolute() {
    // jal ra, +8 at the ram base
    assert_eq!(disasm_of(&[0x0080_00EF], 0), "jal ra,0x80000008");
    // beq a0, zero, +8 renders as beqz
    assert_eq!(disasm_of(&[0x0005_0463], 0), "beqz a0,0x80000008");
    // jal x0 renders as j
    assert_eq!(disasm_of(&[0x0000_006F], 0), "j 0x80000000");
}

#[test]
fn csr_names() {
    assert_eq!(disasm_of(&[0xC000_2573], 0), "csrrs a0,cycle,zero");
    assert_eq!(disasm_of(&[0x3405_9573], 0), "csrrw a0,mscratch,a1");
}

#[test]
fn atomics_and_fp() {
    assert_eq!(disasm_of(&[0x00B6_252F], 0), "amoadd.w a0,a1,(a2)");
    assert_eq!(disasm_of(&[0x1006_252F], 0), "lr.w a0,(a2)");
    assert_eq!(disasm_of(&[0x0020_8053], 0), "fadd.s ft0,ft1,ft2");
    assert_eq!(disasm_of(&[0x0005_2007], 0), "flw ft0,0(a0)");
}

#[test]
fn compressed_operands() {
    let ctx = TestContext::rv64().load_halfwords(&[0x4705, 0xC02A, 0x852E]);
    assert_eq!(ctx.cpu.disassemble(RAM_BASE).expect("decodes"), "c.li a4,1");
    assert_eq!(
        ctx.cpu.disassemble(RAM_BASE + 2).expect("decodes"),
        "c.swsp a0,0"
    );
    assert_eq!(
        ctx.cpu.disassemble(RAM_BASE + 4).expect("decodes"),
        "c.mv a0,a1"
    );
}

#[test]
fn undecodable_word_is_none() {
    let ctx = TestContext::rv64().load_program(&[0xFFFF_FFFF]);
    assert!(ctx.cpu.disassemble(RAM_BASE).is_none());
}
