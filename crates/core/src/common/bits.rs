//! Bit-field codec.
//!
//! Pure helpers for extracting and sign-extending arbitrary bit ranges from
//! instruction words. Every decoder in the crate is built on these four
//! functions.

/// Returns a mask covering bits `msb..=lsb`.
pub fn mask(msb: u32, lsb: u32) -> u32 {
    debug_assert!(msb >= lsb && msb < 32);
    let n = msb - lsb + 1;
    if n == 32 {
        u32::MAX
    } else {
        ((1 << n) - 1) << lsb
    }
}

/// Extracts bits `msb..=lsb` of `x` as an unsigned value.
pub fn unsigned(x: u32, msb: u32, lsb: u32) -> u32 {
    (x & mask(msb, lsb)) >> lsb
}

/// Extracts bits `msb..=lsb` of `x` and sign-extends from the top bit of
/// the field.
pub fn signed(x: u32, msb: u32, lsb: u32) -> i64 {
    sign_extend(u64::from(unsigned(x, msb, lsb)), msb - lsb)
}

/// Sign-extends `x` using bit `sign_bit` as the sign.
pub fn sign_extend(x: u64, sign_bit: u32) -> i64 {
    let m = 1u64 << sign_bit;
    ((x ^ m) as i64).wrapping_sub(m as i64)
}
