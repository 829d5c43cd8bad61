//! Privileged instructions: trap returns, WFI and SFENCE.VMA.

use crate::common::PrivMode;
use crate::cpu::{Cpu, StepError};

use super::{disasm, InsnDefn, IsaModule, WordLen};

fn sret(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    if cpu.csr.mode() < PrivMode::Supervisor {
        return Err(cpu.illegal(ins));
    }
    let resume = cpu.csr.sret();
    cpu.set_pc(resume);
    Ok(())
}

fn mret(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    if cpu.csr.mode() < PrivMode::Machine {
        return Err(cpu.illegal(ins));
    }
    let resume = cpu.csr.mret();
    cpu.set_pc(resume);
    Ok(())
}

// Single hart, no interrupt delivery: WFI completes immediately.
fn wfi(cpu: &mut Cpu, _ins: u32) -> Result<(), StepError> {
    cpu.advance(4);
    Ok(())
}

// Translation is walked afresh on every access, so the fence has nothing
// to flush.
fn sfence_vma(cpu: &mut Cpu, ins: u32) -> Result<(), StepError> {
    if cpu.csr.mode() < PrivMode::Supervisor {
        return Err(cpu.illegal(ins));
    }
    cpu.advance(4);
    Ok(())
}

/// The privileged instruction slots of the SYSTEM opcode.
pub static SYSTEM: IsaModule = IsaModule {
    name: "system",
    word_len: WordLen::W32,
    defns: &[
        InsnDefn { template: "0001000 00010 00000 000 00000 1110011 SRET", da: disasm::none, emu: sret },
        InsnDefn { template: "0011000 00010 00000 000 00000 1110011 MRET", da: disasm::none, emu: mret },
        InsnDefn { template: "0001000 00101 00000 000 00000 1110011 WFI", da: disasm::none, emu: wfi },
        InsnDefn { template: "0001001 rs2 rs1 000 00000 1110011 SFENCE.VMA", da: disasm::none, emu: sfence_vma },
    ],
};
