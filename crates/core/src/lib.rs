//! A multi-extension RISC-V RV32/RV64 instruction set simulator.
//!
//! This crate implements a cycle-stepped RISC-V hart with the following:
//! 1. **ISA:** Data-driven decode and execution for RV32/RV64 I/M/A/F/D/C,
//!    built from textual bit-pattern templates compiled at setup.
//! 2. **Memory:** A region-based physical map with permission attributes,
//!    watchpoints, and SV32/SV39 page walkers.
//! 3. **CSRs:** Machine and supervisor state, privilege transitions, and
//!    the floating-point accrued flags.
//! 4. **Loading:** ELF and flat-binary program loaders feeding the memory
//!    map and symbol table.
//!
//! Build a hart from a [`Config`], load a program, and drive it with
//! [`Cpu::step`] or [`Cpu::run`]; every failed step is a structured
//! [`StepError`] and is also recorded in the hart's [`FaultLog`].

/// Common types (bit-field helpers, trap causes, hart parameters).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// The hart: registers, stepping, and the environment-call hook.
pub mod cpu;
/// Control and status registers and privilege transitions.
pub mod csr;
/// Instruction set (templates, matcher, disassembly, per-extension tables).
pub mod isa;
/// ELF and flat-binary program loading.
pub mod loader;
/// The memory subsystem (regions, faults, translation, symbols).
pub mod mem;

/// Hart parameters shared across subsystems.
pub use crate::common::{Cause, PrivMode, Xlen};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The simulated hart; construct via [`Config::build`] or [`Cpu::new`].
pub use crate::cpu::{Cpu, Ecall, FaultLog, StepError};
/// CSR file and its error type.
pub use crate::csr::{Csr, CsrError};
/// Decode table construction error.
pub use crate::isa::BuildError;
/// Program loading entry points.
pub use crate::loader::{is_elf, load_binary, load_elf, LoadError};
/// The physical memory map and its building blocks.
pub use crate::mem::{Attr, FaultKind, MemFault, Memory, Section};
