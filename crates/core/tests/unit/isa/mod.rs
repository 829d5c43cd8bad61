//! Decode and disassembly tests.

/// Compressed-encoding execution tests.
pub mod compressed;

/// Decode table lookups: known words, declaration-order ties, and
/// matcher properties.
pub mod decode_properties;

/// Exact disassembly strings, pseudo spellings included.
pub mod disasm_format;
