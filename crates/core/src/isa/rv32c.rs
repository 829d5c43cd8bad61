//! RV32-only compressed encodings.
//!
//! The quadrant slots that RV64 reuses: C.JAL occupies the C.ADDIW slot,
//! and the single-precision FP load/store pairs occupy the LD/SD slots.

use crate::cpu::{Cpu, StepError};

use super::{disasm, rvc, InsnDefn, IsaModule, WordLen};

fn jal(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let link = cpu.pc().wrapping_add(2);
    cpu.set_pc(cpu.pc().wrapping_add_signed(rvc::imm_cj(ins)));
    cpu.wr_x(1, link);
    Ok(())
}

fn flw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rvc::rs1_prime(ins)).wrapping_add(rvc::uimm_clw(ins));
    let val = cpu.load_u32(addr)?;
    cpu.wr_f32_bits(rvc::rs2_prime(ins), val);
    cpu.advance(2);
    Ok(())
}

fn fsw(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(rvc::rs1_prime(ins)).wrapping_add(rvc::uimm_clw(ins));
    cpu.store_u32(addr, cpu.rd_f32_bits(rvc::rs2_prime(ins)))?;
    cpu.advance(2);
    Ok(())
}

fn flwsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(rvc::uimm_lwsp(ins));
    let val = cpu.load_u32(addr)?;
    cpu.wr_f32_bits(rvc::rd_full(ins), val);
    cpu.advance(2);
    Ok(())
}

fn fswsp(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    let addr = cpu.rd_x(2).wrapping_add(rvc::uimm_swsp(ins));
    cpu.store_u32(addr, cpu.rd_f32_bits(rvc::rs2_full(ins)))?;
    cpu.advance(2);
    Ok(())
}

/// Compressed encodings valid only at XLEN=32.
pub static RV32C: IsaModule = IsaModule {
    name: "rv32c",
    word_len: WordLen::W16,
    defns: &[
        InsnDefn { template: "001 imm[11|4|9:8|10|6|7|3:1|5] 01 C.JAL", da: disasm::cj, emu: jal },
        InsnDefn { template: "011 uimm[5:3] rs10 uimm[2|6] rd0 00 C.FLW", da: disasm::cl_fw, emu: flw },
        InsnDefn { template: "111 uimm[5:3] rs10 uimm[2|6] rs20 00 C.FSW", da: disasm::cl_fw, emu: fsw },
        InsnDefn { template: "011 uimm[5] rd uimm[4:2|7:6] 10 C.FLWSP", da: disasm::c_flwsp, emu: flwsp },
        InsnDefn { template: "111 uimm[5:2|7:6] rs2 10 C.FSWSP", da: disasm::c_fswsp, emu: fswsp },
    ],
};
