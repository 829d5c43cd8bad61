//! A small harness for driving a hart in tests.

use rvemu_core::common::Xlen;
use rvemu_core::mem::{Attr, Memory, Section};
use rvemu_core::{Cpu, StepError};

/// Base of the test RAM region.
pub const RAM_BASE: u64 = 0x8000_0000;

/// Size of the test RAM region.
pub const RAM_SIZE: u64 = 0x10_0000;

/// A hart with one read-write-execute RAM region.
pub struct TestContext {
    /// The hart under test.
    pub cpu: Cpu,
}

impl TestContext {
    /// Builds a hart of the given width and extension set with an empty
    /// RAM region and the PC at its base.
    pub fn new(xlen: Xlen, extensions: &str) -> Self {
        let mut mem = Memory::new();
        mem.add(Box::new(Section::new("ram", RAM_BASE, RAM_SIZE, Attr::RWX)));
        mem.set_entry(RAM_BASE);
        let cpu = Cpu::new(xlen, extensions, mem).expect("isa tables compile");
        Self { cpu }
    }

    /// An RV64GC hart.
    pub fn rv64() -> Self {
        Self::new(Xlen::Rv64, "gc")
    }

    /// An RV32GC hart.
    pub fn rv32() -> Self {
        Self::new(Xlen::Rv32, "gc")
    }

    /// Places 32-bit instruction words at the RAM base and points the PC
    /// there.
    pub fn load_program(mut self, words: &[u32]) -> Self {
        let mut image = Vec::new();
        for w in words {
            image.extend_from_slice(&w.to_le_bytes());
        }
        self.cpu
            .mem
            .load_image(RAM_BASE, &image)
            .expect("program fits in ram");
        self.cpu.set_pc(RAM_BASE);
        self
    }

    /// Places raw 16-bit parcels at the RAM base; for compressed
    /// sequences.
    pub fn load_halfwords(mut self, halves: &[u16]) -> Self {
        let mut image = Vec::new();
        for h in halves {
            image.extend_from_slice(&h.to_le_bytes());
        }
        self.cpu
            .mem
            .load_image(RAM_BASE, &image)
            .expect("program fits in ram");
        self.cpu.set_pc(RAM_BASE);
        self
    }

    /// Executes one instruction.
    pub fn step(&mut self) -> Result<(), StepError> {
        self.cpu.step()
    }

    /// Executes `n` instructions, panicking on any fault.
    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.cpu.step().expect("step completes");
        }
    }

    /// Sets an integer register.
    pub fn set_reg(&mut self, i: usize, val: u64) {
        self.cpu.wr_x(i, val);
    }

    /// Reads an integer register.
    pub fn reg(&self, i: usize) -> u64 {
        self.cpu.rd_x(i)
    }
}
