//! Overflow-checked multiply/divide primitives.
//!
//! Every other component prices and apportions through these helpers.
//! Division never rounds implicitly: callers pick a [`Rounding`]
//! direction, and the pool always picks the one in its own favor —
//! down for amounts paid out, up for amounts required in.

/// Rounding direction for integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

/// Computes `a * b / divisor` with overflow-checked multiplication.
///
/// Returns `None` if the intermediate product overflows `u128` or if
/// `divisor` is zero.  The result never wraps.
#[must_use]
pub const fn mul_div(a: u128, b: u128, divisor: u128, rounding: Rounding) -> Option<u128> {
    if divisor == 0 {
        return None;
    }
    let product = match a.checked_mul(b) {
        Some(p) => p,
        None => return None,
    };
    let quotient = product / divisor;
    match rounding {
        Rounding::Down => Some(quotient),
        Rounding::Up => {
            if product % divisor == 0 {
                Some(quotient)
            } else {
                // quotient + 1 cannot overflow: a nonzero remainder means
                // product < u128::MAX or divisor > 1, so quotient < u128::MAX.
                Some(quotient + 1)
            }
        }
    }
}

/// Integer square root via Newton's method.
///
/// Total over all `u128` inputs; `isqrt(0) == 0`.
#[must_use]
pub const fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
