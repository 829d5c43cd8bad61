//! Instruction execution tests.

/// LR/SC and the AMO read-modify-writes.
pub mod atomics;

/// Branches, jumps, and linkage.
pub mod control_flow;

/// CSR instruction semantics and the hardware counters.
pub mod csr_ops;

/// Floating point arithmetic, conversions, and exception flags.
pub mod float;

/// Base integer ALU, loads, and stores.
pub mod integer;

/// Multiply and divide, including the division edge cases.
pub mod mul_div;
