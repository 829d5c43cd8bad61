//! Compressed instructions common to RV32 and RV64.
//!
//! The quadrant 0/1/2 encodings that mean the same thing at either
//! register width. The width-specific slots (C.JAL vs C.ADDIW, the
//! single-precision FP loads vs LD/SD) live in `rv32c` and `rv64c`.
//!
//! This module also owns the compressed operand decode helpers: the
//! "prime" register fields address `x8..x15`, and the immediates are the
//! scrambled bit permutations of the CI/CIW/CL/CJ/CB/CSS formats.

use crate::common::bits;
use crate::cpu::{Cpu, StepError};

use super::{disasm, InsnDefn, IsaModule, WordLen};

/// Full 5-bit rd/rs1 field of the CI and CR formats.
pub(crate) fn rd_full(ins: u32) -> usize {
    bits::unsigned(ins, 11, 7) as usize
}

/// Full 5-bit rs2 field of the CR and CSS formats.
pub(crate) fn rs2_full(ins: u32) -> usize {
    bits::unsigned(ins, 6, 2) as usize
}

/// 3-bit rs1' field (bits 9:7), addressing x8..x15.
pub(crate) fn rs1_prime(ins: u32) -> usize {
    bits::unsigned(ins, 9, 7) as usize + 8
}

/// 3-bit rs2'/rd' field (bits 4:2), addressing x8..x15.
pub(crate) fn rs2_prime(ins: u32) -> usize {
    bits::unsigned(ins, 4, 2) as usize + 8
}

/// CI-format immediate: `imm[5]` at bit 12, `imm[4:0]` at bits 6:2,
/// sign-extended.
pub(crate) fn imm_ci(ins: u32) -> i64 {
    let imm = bits::unsigned(ins, 12, 12) << 5 | bits::unsigned(ins, 6, 2);
    bits::sign_extend(u64::from(imm), 5)
}

/// C.LUI immediate, shifted into bits 17:12.
pub(crate) fn imm_ci_lui(ins: u32) -> i64 {
    imm_ci(ins) << 12
}

/// C.ADDI16SP immediate: `nzimm[9|4|6|8:7|5]`, sign-extended.
pub(crate) fn imm_addi16sp(ins: u32) -> i64 {
    let imm = bits::unsigned(ins, 12, 12) << 9
        | bits::unsigned(ins, 6, 6) << 4
        | bits::unsigned(ins, 5, 5) << 6
        | bits::unsigned(ins, 4, 3) << 7
        | bits::unsigned(ins, 2, 2) << 5;
    bits::sign_extend(u64::from(imm), 9)
}

/// C.ADDI4SPN immediate: `nzuimm[5:4|9:6|2|3]`.
pub(crate) fn uimm_addi4spn(ins: u32) -> u64 {
    u64::from(
        bits::unsigned(ins, 12, 11) << 4
            | bits::unsigned(ins, 10, 7) << 6
            | bits::unsigned(ins, 6, 6) << 2
            | bits::unsigned(ins, 5, 5) << 3,
    )
}

/// Word-scaled CL/CS offset: `uimm[5:3]` plus `uimm[2|6]`.
pub(crate) fn uimm_clw(ins: u32) -> u64 {
    u64::from(
        bits::unsigned(ins, 12, 10) << 3
            | bits::unsigned(ins, 6, 6) << 2
            | bits::unsigned(ins, 5, 5) << 6,
    )
}

/// Doubleword-scaled CL/CS offset: `uimm[5:3]` plus `uimm[7:6]`.
pub(crate) fn uimm_cld(ins: u32) -> u64 {
    u64::from(bits::unsigned(ins, 12, 10) << 3 | bits::unsigned(ins, 6, 5) << 6)
}

/// CJ-format jump offset: `imm[11|4|9:8|10|6|7|3:1|5]`, sign-extended.
pub(crate) fn imm_cj(ins: u32) -> i64 {
    let imm = bits::unsigned(ins, 12, 12) << 11
        | bits::unsigned(ins, 11, 11) << 4
        | bits::unsigned(ins, 10, 9) << 8
        | bits::unsigned(ins, 8, 8) << 10
        | bits::unsigned(ins, 7, 7) << 6
        | bits::unsigned(ins, 6, 6) << 7
        | bits::unsigned(ins, 5, 3) << 1
        | bits::unsigned(ins, 2, 2) << 5;
    bits::sign_extend(u64::from(imm), 11)
}

/// CB-format branch offset: `imm[8|4:3]` plus `imm[7:6|2:1|5]`,
/// sign-extended.
pub(crate) fn imm_cb(ins: u32) -> i64 {
    let imm = bits::unsigned(ins, 12, 12) << 8
        | bits::unsigned(ins, 11, 10) << 3
        | bits::unsigned(ins, 6, 5) << 6
        | bits::unsigned(ins, 4, 3) << 1
        | bits::unsigned(ins, 2, 2) << 5;
    bits::sign_extend(u64::from(imm), 8)
}

/// Compressed shift amount: `uimm[5]` at bit 12, `uimm[4:0]` at bits 6:2.
pub(crate) fn shamt_c(ins: u32) -> u32 {
    bits::unsigned(ins, 12, 12) << 5 | bits::unsigned(ins, 6, 2)
}

/// C.LWSP offset: `uimm[5]` plus `uimm[4:2|7:6]`.
pub(crate) fn uimm_lwsp(ins: u32) -> u64 {
    u64::from(
        bits::unsigned(ins, 12, 12) << 5
            | bits::unsigned(ins, 6, 4) << 2
            | bits::unsigned(ins, 3, 2) << 6,
    )
}

/// C.LDSP offset: `uimm[5]` plus `uimm[4:3|8:6]`.
pub(crate) fn uimm_ldsp(ins: u32) -> u64 {
    u64::from(
        bits::unsigned(ins, 12, 12) << 5
            | bits::unsigned(ins, 6, 5) << 3
            | bits::unsigned(ins, 4, 2) << 6,
    )
}

/// C.SWSP offset: `uimm[5:2|7:6]`.
pub(crate) fn uimm_swsp(ins: u32) -> u64 {
    u64::from(bits::unsigned(ins, 12, 9) << 2 | bits::unsigned(ins, 8, 7) << 6)
}

/// C.SDSP offset: `uimm[5:3|8:6]`.
pub(crate) fn uimm_sdsp(ins: u32) -> u64 {
    u64::from(bits::unsigned(ins, 12, 10) << 3 | bits::unsigned(ins, 9, 7) << 6)
}

// Quadrant 0

fn illegal(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    Err(cpu.illegal(ins))
}

fn addi4spn(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rs2_prime(ins), cpu.rd_x(2).wrapping_add(uimm_addi4spn(ins)));
    cpu.advance(2);
    Ok(())
}

fn fld(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1_prime(ins)).wrapping_add(uimm_cld(ins));
    let val = cpu.load_u64(addr)?;
    cpu.wr_f_raw(rs2_prime(ins), val);
    cpu.advance(2);
    Ok(())
}

fn lw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1_prime(ins)).wrapping_add(uimm_clw(ins));
    let val = cpu.load_u32(addr)?;
    cpu.wr_x(rs2_prime(ins), bits::sign_extend(u64::from(val), 31) as u64);
    cpu.advance(2);
    Ok(())
}

fn fsd(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1_prime(ins)).wrapping_add(uimm_cld(ins));
    cpu.store_u64(addr, cpu.rd_f_raw(rs2_prime(ins)))?;
    cpu.advance(2);
    Ok(())
}

fn sw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1_prime(ins)).wrapping_add(uimm_clw(ins));
    cpu.store_u32(addr, cpu.rd_x(rs2_prime(ins)) as u32)?;
    cpu.advance(2);
    Ok(())
}

// Quadrant 1

fn nop(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    cpu.advance(2);
    Ok(())
}

fn addi(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rd_full(ins);
    cpu.wr_x(rd, cpu.rd_x(rd).wrapping_add_signed(imm_ci(ins)));
    cpu.advance(2);
    Ok(())
}

fn li(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd_full(ins), imm_ci(ins) as u64);
    cpu.advance(2);
    Ok(())
}

fn addi16sp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(2, cpu.rd_x(2).wrapping_add_signed(imm_addi16sp(ins)));
    cpu.advance(2);
    Ok(())
}

fn lui(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd_full(ins), imm_ci_lui(ins) as u64);
    cpu.advance(2);
    Ok(())
}

fn srli(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rs1_prime(ins);
    let sh = shamt_c(ins) & (cpu.xlen().bits() - 1);
    let val = cpu.rd_x(rd) & cpu.xlen().addr_mask();
    cpu.wr_x(rd, val >> sh);
    cpu.advance(2);
    Ok(())
}

fn srai(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rs1_prime(ins);
    let sh = shamt_c(ins) & (cpu.xlen().bits() - 1);
    cpu.wr_x(rd, ((cpu.rd_x(rd) as i64) >> sh) as u64);
    cpu.advance(2);
    Ok(())
}

fn andi(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rs1_prime(ins);
    cpu.wr_x(rd, cpu.rd_x(rd) & imm_ci(ins) as u64);
    cpu.advance(2);
    Ok(())
}

fn sub(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rs1_prime(ins);
    cpu.wr_x(rd, cpu.rd_x(rd).wrapping_sub(cpu.rd_x(rs2_prime(ins))));
    cpu.advance(2);
    Ok(())
}

fn xor(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rs1_prime(ins);
    cpu.wr_x(rd, cpu.rd_x(rd) ^ cpu.rd_x(rs2_prime(ins)));
    cpu.advance(2);
    Ok(())
}

fn or(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rs1_prime(ins);
    cpu.wr_x(rd, cpu.rd_x(rd) | cpu.rd_x(rs2_prime(ins)));
    cpu.advance(2);
    Ok(())
}

fn and(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rs1_prime(ins);
    cpu.wr_x(rd, cpu.rd_x(rd) & cpu.rd_x(rs2_prime(ins)));
    cpu.advance(2);
    Ok(())
}

fn j(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.set_pc(cpu.pc().wrapping_add_signed(imm_cj(ins)));
    Ok(())
}

fn beqz(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    if cpu.rd_x(rs1_prime(ins)) == 0 {
        cpu.set_pc(cpu.pc().wrapping_add_signed(imm_cb(ins)));
    } else {
        cpu.advance(2);
    }
    Ok(())
}

fn bnez(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    if cpu.rd_x(rs1_prime(ins)) != 0 {
        cpu.set_pc(cpu.pc().wrapping_add_signed(imm_cb(ins)));
    } else {
        cpu.advance(2);
    }
    Ok(())
}

// Quadrant 2

fn slli(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rd_full(ins);
    let sh = shamt_c(ins) & (cpu.xlen().bits() - 1);
    cpu.wr_x(rd, cpu.rd_x(rd) << sh);
    cpu.advance(2);
    Ok(())
}

fn slli64(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    // RV128 encoding; a hint at this width
    Err(cpu.unimplemented("c.slli64"))
}

fn fldsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(uimm_ldsp(ins));
    let val = cpu.load_u64(addr)?;
    cpu.wr_f_raw(rd_full(ins), val);
    cpu.advance(2);
    Ok(())
}

fn lwsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(uimm_lwsp(ins));
    let val = cpu.load_u32(addr)?;
    cpu.wr_x(rd_full(ins), bits::sign_extend(u64::from(val), 31) as u64);
    cpu.advance(2);
    Ok(())
}

fn jr(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.set_pc(cpu.rd_x(rd_full(ins)) & !1);
    Ok(())
}

fn mv(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd_full(ins), cpu.rd_x(rs2_full(ins)));
    cpu.advance(2);
    Ok(())
}

fn ebreak(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    Err(StepError::Ebreak { pc: cpu.pc() })
}

fn jalr(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let link = cpu.pc().wrapping_add(2);
    cpu.set_pc(cpu.rd_x(rd_full(ins)) & !1);
    cpu.wr_x(1, link);
    Ok(())
}

fn add(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let rd = rd_full(ins);
    cpu.wr_x(rd, cpu.rd_x(rd).wrapping_add(cpu.rd_x(rs2_full(ins))));
    cpu.advance(2);
    Ok(())
}

fn fsdsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(uimm_sdsp(ins));
    cpu.store_u64(addr, cpu.rd_f_raw(rs2_full(ins)))?;
    cpu.advance(2);
    Ok(())
}

fn swsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(uimm_swsp(ins));
    cpu.store_u32(addr, cpu.rd_x(rs2_full(ins)) as u32)?;
    cpu.advance(2);
    Ok(())
}

/// Compressed instructions shared by RV32C and RV64C.
pub static RVC: IsaModule = IsaModule {
    name: "rvc",
    word_len: WordLen::W16,
    defns: &[
        // Quadrant 0
        InsnDefn { template: "000 00000000 000 00 C.ILLEGAL", da: disasm::none, emu: illegal },
        InsnDefn { template: "000 nzuimm[5:4|9:6|2|3] rd0 00 C.ADDI4SPN", da: disasm::ciw, emu: addi4spn },
        InsnDefn { template: "001 uimm[5:3] rs10 uimm[7:6] rd0 00 C.FLD", da: disasm::cl_fd, emu: fld },
        InsnDefn { template: "010 uimm[5:3] rs10 uimm[2|6] rd0 00 C.LW", da: disasm::cl_w, emu: lw },
        InsnDefn { template: "101 uimm[5:3] rs10 uimm[7:6] rs20 00 C.FSD", da: disasm::cl_fd, emu: fsd },
        InsnDefn { template: "110 uimm[5:3] rs10 uimm[2|6] rs20 00 C.SW", da: disasm::cl_w, emu: sw },
        // Quadrant 1
        InsnDefn { template: "000 nzimm[5] 00000 nzimm[4:0] 01 C.NOP", da: disasm::none, emu: nop },
        InsnDefn { template: "000 nzimm[5] rs1/rd!=0 nzimm[4:0] 01 C.ADDI", da: disasm::ci, emu: addi },
        InsnDefn { template: "010 imm[5] rd!=0 imm[4:0] 01 C.LI", da: disasm::ci, emu: li },
        InsnDefn { template: "011 nzimm[9] 00010 nzimm[4|6|8:7|5] 01 C.ADDI16SP", da: disasm::ci_addi16sp, emu: addi16sp },
        InsnDefn { template: "011 nzimm[17] rd!={0,2} nzimm[16:12] 01 C.LUI", da: disasm::ci_lui, emu: lui },
        InsnDefn { template: "100 nzuimm[5] 00 rs10/rd0 nzuimm[4:0] 01 C.SRLI", da: disasm::c_shift_prime, emu: srli },
        InsnDefn { template: "100 nzuimm[5] 01 rs10/rd0 nzuimm[4:0] 01 C.SRAI", da: disasm::c_shift_prime, emu: srai },
        InsnDefn { template: "100 imm[5] 10 rs10/rd0 imm[4:0] 01 C.ANDI", da: disasm::c_andi, emu: andi },
        InsnDefn { template: "100 0 11 rs10/rd0 00 rs20 01 C.SUB", da: disasm::cr_prime, emu: sub },
        InsnDefn { template: "100 0 11 rs10/rd0 01 rs20 01 C.XOR", da: disasm::cr_prime, emu: xor },
        InsnDefn { template: "100 0 11 rs10/rd0 10 rs20 01 C.OR", da: disasm::cr_prime, emu: or },
        InsnDefn { template: "100 0 11 rs10/rd0 11 rs20 01 C.AND", da: disasm::cr_prime, emu: and },
        InsnDefn { template: "101 imm[11|4|9:8|10|6|7|3:1|5] 01 C.J", da: disasm::cj, emu: j },
        InsnDefn { template: "110 imm[8|4:3] rs10 imm[7:6|2:1|5] 01 C.BEQZ", da: disasm::cb, emu: beqz },
        InsnDefn { template: "111 imm[8|4:3] rs10 imm[7:6|2:1|5] 01 C.BNEZ", da: disasm::cb, emu: bnez },
        // Quadrant 2
        InsnDefn { template: "000 nzuimm[5] rs1/rd!=0 nzuimm[4:0] 10 C.SLLI", da: disasm::c_shift_full, emu: slli },
        InsnDefn { template: "000 0 rs1/rd!=0 00000 10 C.SLLI64", da: disasm::none, emu: slli64 },
        InsnDefn { template: "001 uimm[5] rd uimm[4:3|8:6] 10 C.FLDSP", da: disasm::c_fldsp, emu: fldsp },
        InsnDefn { template: "010 uimm[5] rd!=0 uimm[4:2|7:6] 10 C.LWSP", da: disasm::c_lwsp, emu: lwsp },
        InsnDefn { template: "100 0 rs1!=0 00000 10 C.JR", da: disasm::cjr, emu: jr },
        InsnDefn { template: "100 0 rd!=0 rs2!=0 10 C.MV", da: disasm::cr_full, emu: mv },
        InsnDefn { template: "100 1 00000 00000 10 C.EBREAK", da: disasm::none, emu: ebreak },
        InsnDefn { template: "100 1 rs1!=0 00000 10 C.JALR", da: disasm::cjr, emu: jalr },
        InsnDefn { template: "100 1 rs1/rd!=0 rs2!=0 10 C.ADD", da: disasm::cr_full, emu: add },
        InsnDefn { template: "101 uimm[5:3|8:6] rs2 10 C.FSDSP", da: disasm::c_fsdsp, emu: fsdsp },
        InsnDefn { template: "110 uimm[5:2|7:6] rs2 10 C.SWSP", da: disasm::c_swsp, emu: swsp },
    ],
};
