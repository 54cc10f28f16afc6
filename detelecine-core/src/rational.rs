//! Rational number type for precise time and rate representation.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul};

/// A rational number represented as a numerator and denominator.
///
/// Used for exact representation of frame rates, time bases and the
/// field-count multiplier of a cadence pattern.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    /// Numerator
    pub num: i64,
    /// Denominator (must be positive)
    pub den: i64,
}

impl Rational {
    /// Create a new rational number.
    ///
    /// # Panics
    ///
    /// Panics if denominator is zero.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "Denominator cannot be zero");
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        Self { num, den }
    }

    /// Create a rational from an integer.
    pub fn from_int(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Create a zero rational.
    pub const fn zero() -> Self {
        Self { num: 0, den: 1 }
    }

    /// Create a rational representing one.
    pub const fn one() -> Self {
        Self { num: 1, den: 1 }
    }

    /// Check if this rational is zero.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Check if this rational is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.num > 0 && self.den > 0
    }

    /// Reduce the rational to its simplest form.
    pub fn reduce(&self) -> Self {
        if self.num == 0 {
            return Self { num: 0, den: 1 };
        }
        let g = gcd(self.num.unsigned_abs(), self.den.unsigned_abs());
        Self {
            num: self.num / g as i64,
            den: self.den / g as i64,
        }
    }

    /// Get the reciprocal of this rational.
    ///
    /// # Panics
    ///
    /// Panics if the numerator is zero.
    pub fn recip(&self) -> Self {
        assert!(self.num != 0, "Cannot take reciprocal of zero");
        Self::new(self.den, self.num)
    }

    /// Get the reciprocal, or `None` if this rational is zero or its
    /// reciprocal is not representable.
    pub fn checked_recip(&self) -> Option<Self> {
        if self.num == 0 || self.num == i64::MIN {
            None
        } else {
            Some(Self::new(self.den, self.num))
        }
    }

    /// Exact product, or `None` if the reduced result does not fit in `i64`.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        try_reduce_wide(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    /// Multiply an integer by this rational and round to the nearest integer.
    ///
    /// Halfway cases round away from zero. The product is formed in 128-bit
    /// arithmetic so the result is exact for any `i64` input; results outside
    /// the `i64` range saturate.
    pub fn mul_round(&self, value: i64) -> i64 {
        let den = self.den as i128;
        let product = value as i128 * self.num as i128;
        let half = den / 2;
        let rounded = if product >= 0 {
            (product + half) / den
        } else {
            -((-product + half) / den)
        };
        i64::try_from(rounded).unwrap_or(if rounded > 0 { i64::MAX } else { i64::MIN })
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({}/{})", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        reduce_wide(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        assert!(rhs.num != 0, "Cannot divide by zero");
        reduce_wide(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_int(n)
    }
}

/// Reduce a 128-bit intermediate fraction back into an `i64` rational.
///
/// Products of two reduced `i64` rationals always fit once the common factor
/// is removed for the frame rates and time bases seen in practice; anything
/// larger is clamped.
fn reduce_wide(num: i128, den: i128) -> Rational {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num == 0 {
        return Rational::zero();
    }
    let g = gcd_wide(num.unsigned_abs(), den.unsigned_abs()) as i128;
    let (num, den) = (num / g, den / g);
    let clamp = |v: i128| v.clamp(i64::MIN as i128 + 1, i64::MAX as i128) as i64;
    Rational {
        num: clamp(num),
        den: clamp(den).max(1),
    }
}

/// Calculate the greatest common divisor using Euclidean algorithm.
fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Reduce a 128-bit intermediate fraction, failing if it does not fit.
fn try_reduce_wide(num: i128, den: i128) -> Option<Rational> {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num == 0 {
        return Some(Rational::zero());
    }
    let g = gcd_wide(num.unsigned_abs(), den.unsigned_abs()) as i128;
    let num = i64::try_from(num / g).ok().filter(|&n| n != i64::MIN)?;
    let den = i64::try_from(den / g).ok()?;
    Some(Rational { num, den })
}

fn gcd_wide(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_new() {
        let r = Rational::new(1, 2);
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_negative_den() {
        let r = Rational::new(1, -2);
        assert_eq!(r.num, -1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_reduce() {
        let r = Rational::new(4, 8).reduce();
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_mul() {
        let a = Rational::new(2, 3);
        let b = Rational::new(3, 4);
        let c = a * b;
        assert_eq!(c, Rational::new(1, 2));
    }

    #[test]
    fn test_rational_mul_large_terms() {
        // NTSC rate times its inverse reduces to one.
        let fps = Rational::new(30000, 1001);
        assert_eq!(fps * fps.recip(), Rational::one());

        let tb = Rational::new(1, 90000);
        assert_eq!(fps * tb, Rational::new(1, 3003));
    }

    #[test]
    fn test_rational_div() {
        let a = Rational::new(30000, 1001);
        let b = Rational::new(5, 4);
        assert_eq!(a / b, Rational::new(24000, 1001));
    }

    #[test]
    fn test_checked_recip() {
        assert_eq!(Rational::new(5, 4).checked_recip(), Some(Rational::new(4, 5)));
        assert_eq!(Rational::zero().checked_recip(), None);
        assert_eq!(Rational::new(-2, 3).recip(), Rational::new(-3, 2));
        assert_eq!(Rational::new(i64::MIN, 1).checked_recip(), None);
    }

    #[test]
    fn test_checked_mul() {
        let fps = Rational::new(30000, 1001);
        assert_eq!(fps.checked_mul(Rational::new(4, 5)), Some(Rational::new(24000, 1001)));
        assert_eq!(fps.checked_mul(Rational::zero()), Some(Rational::zero()));

        // 5/12000000000000000004 reduces no further and exceeds i64.
        let tb = Rational::new(1, 3_000_000_000_000_000_001);
        assert_eq!(tb.checked_mul(Rational::new(5, 4)), None);
        assert_eq!(
            Rational::new(i64::MAX, 1).checked_mul(Rational::new(2, 1)),
            None
        );
    }

    #[test]
    fn test_mul_round_nearest() {
        let r = Rational::new(5, 4);
        assert_eq!(r.mul_round(0), 0);
        assert_eq!(r.mul_round(1), 1); // 1.25
        assert_eq!(r.mul_round(2), 3); // 2.5 rounds away from zero
        assert_eq!(r.mul_round(3), 4); // 3.75
        assert_eq!(r.mul_round(-2), -3);
    }

    #[test]
    fn test_mul_round_exact_for_long_streams() {
        let unit = Rational::new(1001, 24);
        let n = 10_000_000_000_i64;
        assert_eq!(unit.mul_round(n * 24), n * 1001);
    }

    #[test]
    fn test_rational_ord() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        assert!(a > b);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rational::new(24000, 1001).to_string(), "24000/1001");
        assert_eq!(format!("{:?}", Rational::new(5, 4)), "Rational(5/4)");
    }
}
