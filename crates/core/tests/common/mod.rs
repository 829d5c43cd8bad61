//! Shared test infrastructure.

/// Raw instruction word encoders for the 32-bit formats.
pub mod builder;

/// The hart-plus-RAM harness used by the execution tests.
pub mod harness;
