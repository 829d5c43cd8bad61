//! The A standard extension: word-width atomics.
//!
//! A single hart executes one instruction at a time, so every
//! read-modify-write is atomic by construction and the aq/rl ordering
//! bits carry no weight. The LR/SC reservation is still modelled: SC
//! succeeds only against a matching, unconsumed reservation.

use crate::common::bits;
use crate::cpu::{Cpu, StepError};

use super::{disasm, rd, rs1, rs2, InsnDefn, IsaModule, WordLen};

fn lr_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins));
    let val = cpu.load_u32(addr)?;
    cpu.reserve(addr);
    cpu.wr_x(rd(ins), bits::sign_extend(u64::from(val), 31) as u64);
    cpu.advance(4);
    Ok(())
}

fn sc_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins));
    if cpu.claim_reservation(addr) {
        cpu.store_u32(addr, cpu.rd_x(rs2(ins)) as u32)?;
        cpu.wr_x(rd(ins), 0);
    } else {
        cpu.wr_x(rd(ins), 1);
    }
    cpu.advance(4);
    Ok(())
}

fn amo_w(cpu: &mut Cpu, ins: u32, op: fn(i32, i32) -> i32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins));
    let old = cpu.load_u32(addr)? as i32;
    let new = op(old, cpu.rd_x(rs2(ins)) as i32);
    cpu.store_u32(addr, new as u32)?;
    cpu.wr_x(rd(ins), bits::sign_extend(old as u32 as u64, 31) as u64);
    cpu.advance(4);
    Ok(())
}

fn amoswap_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, |_, b| b)
}

fn amoadd_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, i32::wrapping_add)
}

fn amoxor_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, |a, b| a ^ b)
}

fn amoand_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, |a, b| a & b)
}

fn amoor_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, |a, b| a | b)
}

fn amomin_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, i32::min)
}

fn amomax_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, i32::max)
}

fn amominu_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, |a, b| (a as u32).min(b as u32) as i32)
}

fn amomaxu_w(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    amo_w(cpu, ins, |a, b| (a as u32).max(b as u32) as i32)
}

/// Word-width atomic memory operations.
pub static RV32A: IsaModule = IsaModule {
    name: "rv32a",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "00010 aq rl 00000 rs1 010 rd 0101111 LR.W", da: disasm::amo, emu: lr_w },
        InsnDefn { template: "00011 aq rl rs2 rs1 010 rd 0101111 SC.W", da: disasm::amo, emu: sc_w },
        InsnDefn { template: "00001 aq rl rs2 rs1 010 rd 0101111 AMOSWAP.W", da: disasm::amo, emu: amoswap_w },
        InsnDefn { template: "00000 aq rl rs2 rs1 010 rd 0101111 AMOADD.W", da: disasm::amo, emu: amoadd_w },
        InsnDefn { template: "00100 aq rl rs2 rs1 010 rd 0101111 AMOXOR.W", da: disasm::amo, emu: amoxor_w },
        InsnDefn { template: "01100 aq rl rs2 rs1 010 rd 0101111 AMOAND.W", da: disasm::amo, emu: amoand_w },
        InsnDefn { template: "01000 aq rl rs2 rs1 010 rd 0101111 AMOOR.W", da: disasm::amo, emu: amoor_w },
        InsnDefn { template: "10000 aq rl rs2 rs1 010 rd 0101111 AMOMIN.W", da: disasm::amo, emu: amomin_w },
        InsnDefn { template: "10100 aq rl rs2 rs1 010 rd 0101111 AMOMAX.W", da: disasm::amo, emu: amomax_w },
        InsnDefn { template: "11000 aq rl rs2 rs1 010 rd 0101111 AMOMINU.W", da: disasm::amo, emu: amominu_w },
        InsnDefn { template: "11100 aq rl rs2 rs1 010 rd 0101111 AMOMAXU.W", da: disasm::amo, emu: amomaxu_w },
    ],
};
