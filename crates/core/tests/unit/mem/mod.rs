//! Memory subsystem tests.

/// SV32/SV39 page walks, permission checks, and A/D updates.
pub mod translation;
