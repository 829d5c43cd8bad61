//! RV64I: the 64-bit widenings of the base set.
//!
//! The full-width shift encodings here carry a 6-bit shift amount; the
//! 5-bit `rv32i` patterns still match when bit 25 is clear and compute
//! the same result, so declaration order is immaterial for them. The
//! word-width (`*W`) operations compute in 32 bits and sign-extend.

use crate::common::bits;
use crate::cpu::{Cpu, StepError};

use super::{disasm, imm_i, imm_s, rd, rs1, rs2, shamt, InsnDefn, IsaModule, WordLen};

fn sext32(v: u64) -> u64 {
    bits::sign_extend(v & 0xFFFF_FFFF, 31) as u64
}

fn lwu(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins));
    let val = cpu.load_u32(addr)?;
    cpu.wr_x(rd(ins), u64::from(val));
    cpu.advance(4);
    Ok(())
}

fn ld(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins));
    let val = cpu.load_u64(addr)?;
    cpu.wr_x(rd(ins), val);
    cpu.advance(4);
    Ok(())
}

fn sd(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_s(ins));
    cpu.store_u64(addr, cpu.rd_x(rs2(ins)))?;
    cpu.advance(4);
    Ok(())
}

fn slli(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) << shamt(ins));
    cpu.advance(4);
    Ok(())
}

fn srli(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), cpu.rd_x(rs1(ins)) >> shamt(ins));
    cpu.advance(4);
    Ok(())
}

fn srai(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    cpu.wr_x(rd(ins), ((cpu.rd_x(rs1(ins)) as i64) >> shamt(ins)) as u64);
    cpu.advance(4);
    Ok(())
}

fn addiw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)).wrapping_add_signed(imm_i(ins));
    cpu.wr_x(rd(ins), sext32(val));
    cpu.advance(4);
    Ok(())
}

fn slliw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = shamt(ins) & 0x1F;
    cpu.wr_x(rd(ins), sext32(cpu.rd_x(rs1(ins)) << sh));
    cpu.advance(4);
    Ok(())
}

fn srliw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = shamt(ins) & 0x1F;
    let val = cpu.rd_x(rs1(ins)) as u32 >> sh;
    cpu.wr_x(rd(ins), sext32(u64::from(val)));
    cpu.advance(4);
    Ok(())
}

fn sraiw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = shamt(ins) & 0x1F;
    let val = cpu.rd_x(rs1(ins)) as i32 >> sh;
    cpu.wr_x(rd(ins), val as i64 as u64);
    cpu.advance(4);
    Ok(())
}

fn addw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)).wrapping_add(cpu.rd_x(rs2(ins)));
    cpu.wr_x(rd(ins), sext32(val));
    cpu.advance(4);
    Ok(())
}

fn subw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let val = cpu.rd_x(rs1(ins)).wrapping_sub(cpu.rd_x(rs2(ins)));
    cpu.wr_x(rd(ins), sext32(val));
    cpu.advance(4);
    Ok(())
}

fn sllw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = cpu.rd_x(rs2(ins)) as u32 & 0x1F;
    cpu.wr_x(rd(ins), sext32(cpu.rd_x(rs1(ins)) << sh));
    cpu.advance(4);
    Ok(())
}

fn srlw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = cpu.rd_x(rs2(ins)) as u32 & 0x1F;
    let val = cpu.rd_x(rs1(ins)) as u32 >> sh;
    cpu.wr_x(rd(ins), sext32(u64::from(val)));
    cpu.advance(4);
    Ok(())
}

fn sraw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let sh = cpu.rd_x(rs2(ins)) as u32 & 0x1F;
    let val = cpu.rd_x(rs1(ins)) as i32 >> sh;
    cpu.wr_x(rd(ins), val as i64 as u64);
    cpu.advance(4);
    Ok(())
}

/// The RV64 base additions.
pub static RV64I: IsaModule = IsaModule {
    name: "rv64i",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "imm[11:0] rs1 110 rd 0000011 LWU", da: disasm::load, emu: lwu },
        InsnDefn { template: "imm[11:0] rs1 011 rd 0000011 LD", da: disasm::load, emu: ld },
        InsnDefn { template: "imm[11:5] rs2 rs1 011 imm[4:0] 0100011 SD", da: disasm::s_type, emu: sd },
        InsnDefn { template: "000000 shamt6 rs1 001 rd 0010011 SLLI", da: disasm::shift, emu: slli },
        InsnDefn { template: "000000 shamt6 rs1 101 rd 0010011 SRLI", da: disasm::shift, emu: srli },
        InsnDefn { template: "010000 shamt6 rs1 101 rd 0010011 SRAI", da: disasm::shift, emu: srai },
        InsnDefn { template: "imm[11:0] rs1 000 rd 0011011 ADDIW", da: disasm::i_type, emu: addiw },
        InsnDefn { template: "0000000 shamt5 rs1 001 rd 0011011 SLLIW", da: disasm::shift, emu: slliw },
        InsnDefn { template: "0000000 shamt5 rs1 101 rd 0011011 SRLIW", da: disasm::shift, emu: srliw },
        InsnDefn { template: "0100000 shamt5 rs1 101 rd 0011011 SRAIW", da: disasm::shift, emu: sraiw },
        InsnDefn { template: "0000000 rs2 rs1 000 rd 0111011 ADDW", da: disasm::r_type, emu: addw },
        InsnDefn { template: "0100000 rs2 rs1 000 rd 0111011 SUBW", da: disasm::r_type, emu: subw },
        InsnDefn { template: "0000000 rs2 rs1 001 rd 0111011 SLLW", da: disasm::r_type, emu: sllw },
        InsnDefn { template: "0000000 rs2 rs1 101 rd 0111011 SRLW", da: disasm::r_type, emu: srlw },
        InsnDefn { template: "0100000 rs2 rs1 101 rd 0111011 SRAW", da: disasm::r_type, emu: sraw },
    ],
};
