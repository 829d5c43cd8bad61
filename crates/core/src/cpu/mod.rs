//! The simulated hart.
//!
//! A [`Cpu`] owns the register files, the compiled instruction set, the
//! memory map and the CSR file, and advances one instruction per
//! [`step`](Cpu::step). A step either completes, leaving the PC on the
//! next instruction, or reports exactly one [`StepError`]; every error is
//! also recorded in the hart's [`FaultLog`].
//!
//! Register convention: at XLEN=32 the integer registers hold their
//! 32-bit value sign-extended to 64 bits. Signed and unsigned compares
//! then work unchanged at either width, and [`Cpu::wr_x`] re-extends
//! after every write so the convention cannot decay.

pub mod error;

pub use error::{FaultLog, StepError};

use tracing::trace;

use crate::common::{bits, Xlen};
use crate::csr::Csr;
use crate::isa::{self, Isa};
use crate::mem::{Attr, Memory, TranslationCtx};

/// How many step faults the hart keeps for diagnostics.
const FAULT_LOG_CAPACITY: usize = 32;

/// NaN-boxing: a single-precision value is valid only when the upper
/// half of its register is all ones; anything else reads as this NaN.
const QNAN32: u32 = 0x7FC0_0000;

/// System-call dispatcher invoked when the running program executes
/// ECALL. Without one installed, ECALL surfaces as [`StepError::Ecall`].
pub trait Ecall {
    /// Handles one environment call against the hart's registers.
    /// On `Ok` the hart resumes after the ECALL.
    fn handle(&mut self, cpu: &mut Cpu) -> Result<(), StepError>;
}

/// A single hart.
pub struct Cpu {
    x: [u64; 32],
    f: [u64; 32],
    pc: u64,
    xlen: Xlen,
    isa: Isa,
    /// The physical memory map.
    pub mem: Memory,
    /// The control and status register file.
    pub csr: Csr,
    /// Recent step faults, oldest first.
    pub faults: FaultLog,
    ecall: Option<Box<dyn Ecall>>,
    reservation: Option<u64>,
}

impl Cpu {
    /// Builds a hart for the given width and extension string (e.g.
    /// `"imac"`, `"gc"`). The PC starts at the memory map's entry point,
    /// or zero if none was set.
    pub fn new(xlen: Xlen, extensions: &str, mem: Memory) -> Result<Self, isa::BuildError> {
        let mut compiled = Isa::new();
        compiled.add(&isa::modules(xlen, extensions)?)?;
        let pc = mem.entry().unwrap_or(0) & xlen.addr_mask();
        Ok(Self {
            x: [0; 32],
            f: [0; 32],
            pc,
            xlen,
            isa: compiled,
            mem,
            csr: Csr::new(xlen, extensions),
            faults: FaultLog::new(FAULT_LOG_CAPACITY),
            ecall: None,
            reservation: None,
        })
    }

    /// Installs the ECALL dispatcher.
    pub fn set_ecall(&mut self, handler: Box<dyn Ecall>) {
        self.ecall = Some(handler);
    }

    /// Register width of this hart.
    pub fn xlen(&self) -> Xlen {
        self.xlen
    }

    /// The compiled instruction set.
    pub fn isa(&self) -> &Isa {
        &self.isa
    }

    /// Current program counter.
    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// Sets the program counter, masked to the address width.
    pub fn set_pc(&mut self, pc: u64) {
        self.pc = pc & self.xlen.addr_mask();
    }

    /// Advances the program counter by `n` bytes.
    pub fn advance(&mut self, n: u64) {
        self.set_pc(self.pc.wrapping_add(n));
    }

    /// Reads integer register `i`. `x0` is always zero.
    pub fn rd_x(&self, i: usize) -> u64 {
        self.x[i]
    }

    /// Writes integer register `i`. Writes to `x0` are dropped; at
    /// XLEN=32 the value is truncated and re-sign-extended.
    pub fn wr_x(&mut self, i: usize, val: u64) {
        if i == 0 {
            return;
        }
        self.x[i] = match self.xlen {
            Xlen::Rv32 => bits::sign_extend(val & 0xFFFF_FFFF, 31) as u64,
            Xlen::Rv64 => val,
        };
    }

    /// Raw bits of FP register `i`.
    pub fn rd_f_raw(&self, i: usize) -> u64 {
        self.f[i]
    }

    /// Writes the raw bits of FP register `i`.
    pub fn wr_f_raw(&mut self, i: usize, val: u64) {
        self.f[i] = val;
    }

    /// Single-precision bits of FP register `i`, honouring NaN-boxing.
    pub fn rd_f32_bits(&self, i: usize) -> u32 {
        let raw = self.f[i];
        if raw >> 32 == 0xFFFF_FFFF {
            raw as u32
        } else {
            QNAN32
        }
    }

    /// NaN-boxes a single-precision value into FP register `i`.
    pub fn wr_f32_bits(&mut self, i: usize, val: u32) {
        self.f[i] = 0xFFFF_FFFF_0000_0000 | u64::from(val);
    }

    /// Single-precision value of FP register `i`.
    pub fn rd_f32(&self, i: usize) -> f32 {
        f32::from_bits(self.rd_f32_bits(i))
    }

    /// Writes a single-precision value to FP register `i`.
    pub fn wr_f32(&mut self, i: usize, val: f32) {
        self.wr_f32_bits(i, val.to_bits());
    }

    /// Double-precision value of FP register `i`.
    pub fn rd_f64(&self, i: usize) -> f64 {
        f64::from_bits(self.f[i])
    }

    /// Writes a double-precision value to FP register `i`.
    pub fn wr_f64(&mut self, i: usize, val: f64) {
        self.f[i] = val.to_bits();
    }

    /// An illegal-instruction error at the current PC.
    pub(crate) fn illegal(&self, word: u32) -> StepError {
        StepError::Illegal { pc: self.pc, word }
    }

    /// An unimplemented-instruction error at the current PC.
    pub(crate) fn unimplemented(&self, name: &str) -> StepError {
        StepError::Unimplemented {
            pc: self.pc,
            name: name.to_owned(),
        }
    }

    /// Places a load reservation on `addr`.
    pub(crate) fn reserve(&mut self, addr: u64) {
        self.reservation = Some(addr & self.xlen.addr_mask());
    }

    /// Consumes the reservation; true if it covered `addr`.
    pub(crate) fn claim_reservation(&mut self, addr: u64) -> bool {
        self.reservation.take() == Some(addr & self.xlen.addr_mask())
    }

    fn translate(&mut self, vaddr: u64, access: Attr) -> Result<u64, StepError> {
        let ctx = TranslationCtx {
            vaddr: vaddr & self.xlen.addr_mask(),
            access,
            // MPRV redirects loads and stores only, never fetches
            mode: if access == Attr::X {
                self.csr.mode()
            } else {
                self.csr.effective_mode()
            },
            mxr: self.csr.mxr(),
            sum: self.csr.sum(),
            vm: self.csr.vm_mode(),
            root_ppn: self.csr.root_ppn(),
        };
        let pc = self.pc;
        self.mem
            .translate(&ctx)
            .map_err(|fault| StepError::Memory { pc, fault })
    }

    fn mem_err(&self, fault: crate::mem::MemFault) -> StepError {
        StepError::Memory {
            pc: self.pc,
            fault,
        }
    }

    /// Loads a byte from a virtual address.
    pub fn load_u8(&mut self, addr: u64) -> Result<u8, StepError> {
        let pa = self.translate(addr, Attr::R)?;
        self.mem.read_u8(pa).map_err(|f| self.mem_err(f))
    }

    /// Loads a halfword from a virtual address.
    pub fn load_u16(&mut self, addr: u64) -> Result<u16, StepError> {
        let pa = self.translate(addr, Attr::R)?;
        self.mem.read_u16(pa).map_err(|f| self.mem_err(f))
    }

    /// Loads a word from a virtual address.
    pub fn load_u32(&mut self, addr: u64) -> Result<u32, StepError> {
        let pa = self.translate(addr, Attr::R)?;
        self.mem.read_u32(pa).map_err(|f| self.mem_err(f))
    }

    /// Loads a doubleword from a virtual address.
    pub fn load_u64(&mut self, addr: u64) -> Result<u64, StepError> {
        let pa = self.translate(addr, Attr::R)?;
        self.mem.read_u64(pa).map_err(|f| self.mem_err(f))
    }

    /// Stores a byte to a virtual address.
    pub fn store_u8(&mut self, addr: u64, val: u8) -> Result<(), StepError> {
        let pa = self.translate(addr, Attr::W)?;
        self.mem.write_u8(pa, val).map_err(|f| self.mem_err(f))
    }

    /// Stores a halfword to a virtual address.
    pub fn store_u16(&mut self, addr: u64, val: u16) -> Result<(), StepError> {
        let pa = self.translate(addr, Attr::W)?;
        self.mem.write_u16(pa, val).map_err(|f| self.mem_err(f))
    }

    /// Stores a word to a virtual address.
    pub fn store_u32(&mut self, addr: u64, val: u32) -> Result<(), StepError> {
        let pa = self.translate(addr, Attr::W)?;
        self.mem.write_u32(pa, val).map_err(|f| self.mem_err(f))
    }

    /// Stores a doubleword to a virtual address.
    pub fn store_u64(&mut self, addr: u64, val: u64) -> Result<(), StepError> {
        let pa = self.translate(addr, Attr::W)?;
        self.mem.write_u64(pa, val).map_err(|f| self.mem_err(f))
    }

    fn fetch(&mut self, pc: u64) -> Result<u32, StepError> {
        let pa = self.translate(pc, Attr::X)?;
        self.mem
            .read_ins(pa)
            .map_err(|fault| StepError::Memory { pc, fault })
    }

    fn exec_one(&mut self, pc: u64) -> Result<(), StepError> {
        let word = self.fetch(pc)?;
        let Some(descriptor) = self.isa.lookup(word) else {
            return Err(StepError::Illegal { pc, word });
        };
        let emu = descriptor.emu;
        trace!(pc = format_args!("{pc:#x}"), word = format_args!("{word:#010x}"), "step");
        emu(self, word)
    }

    /// Executes one instruction.
    ///
    /// The cycle counter advances whether or not the step completes; the
    /// retire counter advances only on completion. A pending memory
    /// breakpoint is surfaced here, after the instruction's effects, and
    /// a PC left unchanged by a complete instruction (a jump to itself)
    /// is reported as [`StepError::StuckPc`]. Every error is pushed onto
    /// the fault log.
    pub fn step(&mut self) -> Result<(), StepError> {
        let pc = self.pc;
        let mut result = self.exec_one(pc);
        self.csr.cycle += 1;

        if let Err(StepError::Ecall { .. }) = result {
            if let Some(mut handler) = self.ecall.take() {
                result = handler.handle(self);
                self.ecall = Some(handler);
                if result.is_ok() {
                    self.advance(4);
                }
            }
        }

        result = result.and_then(|()| {
            if let Some(fault) = self.mem.take_pending_break() {
                return Err(StepError::Memory { pc, fault });
            }
            if self.pc == pc {
                return Err(StepError::StuckPc { pc });
            }
            self.csr.instret += 1;
            Ok(())
        });

        if let Err(err) = &result {
            self.faults.push(err.clone());
        }
        result
    }

    /// Steps until an error, or for at most `max_steps` when given.
    /// Returns the number of completed steps.
    pub fn run(&mut self, max_steps: Option<u64>) -> Result<u64, StepError> {
        let mut steps = 0;
        while max_steps != Some(steps) {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Disassembles the instruction at `addr` without faulting, or
    /// `None` when no descriptor matches.
    pub fn disassemble(&self, addr: u64) -> Option<String> {
        let word = self.mem.peek_u32(addr);
        self.isa
            .lookup(word)
            .map(|d| (d.da)(&d.mnemonic, addr, word))
    }
}
