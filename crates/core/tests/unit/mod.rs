//! Per-subsystem unit tests.

/// Instruction execution tests, one file per instruction family.
pub mod exec;

/// Decode, disassembly, and compressed-encoding tests.
pub mod isa;

/// Program loading tests.
pub mod loader;

/// Memory translation tests.
pub mod mem;
