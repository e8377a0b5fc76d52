use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of kitchen time. One tick is one logical
/// game second.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in the sim loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display, never in the sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// `part / whole` as a fraction in `[0, 1]`. A zero `whole` yields zero.
#[inline]
pub fn fraction(part: Ticks, whole: Ticks) -> Fixed64 {
    if whole == 0 {
        return Fixed64::ZERO;
    }
    let part = part.min(whole);
    Fixed64::from_num(part) / Fixed64::from_num(whole)
}
