//! Arithmetic in GF(2^8) with the AES modulus `x^8 + x^4 + x^3 + x + 1` (0x11B).
//!
//! Addition is XOR. Multiplication is carry-less and reduced without
//! data-dependent branches.

use std::ops::{Add, Div, Mul};

use zeroize::Zeroize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Gf256(u8);

impl Zeroize for Gf256 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Gf256 {
    pub(crate) const ZERO: Self = Gf256(0);
    pub(crate) const ONE: Self = Gf256(1);

    #[inline]
    pub(crate) const fn new(n: u8) -> Self {
        Gf256(n)
    }

    #[inline]
    pub(crate) const fn value(self) -> u8 {
        self.0
    }

    /// `a^254`, which equals `a^-1` for every non-zero `a`. Zero maps to zero.
    pub(crate) fn inv(self) -> Self {
        let mut result = Gf256::ONE;
        let mut base = self;
        let mut exp = 254u8;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exp >>= 1;
        }
        result
    }
}

impl Add for Gf256 {
    type Output = Self;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self {
        Gf256(self.0 ^ rhs.0)
    }
}

impl Mul for Gf256 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut a = self.0;
        let mut b = rhs.0;
        let mut p = 0u8;
        for _ in 0..8 {
            p ^= a & (b & 1).wrapping_neg();
            let carry = (a >> 7).wrapping_neg();
            a = (a << 1) ^ (0x1B & carry);
            b >>= 1;
        }
        Gf256(p)
    }
}

impl Div for Gf256 {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self {
        debug_assert!(rhs.0 != 0, "division by zero in GF(256)");
        self * rhs.inv()
    }
}

/// Evaluate `coeffs[0] + coeffs[1]·x + ...` with Horner's rule.
pub(crate) fn poly_eval(coeffs: &[Gf256], x: Gf256) -> Gf256 {
    coeffs.iter().rev().fold(Gf256::ZERO, |acc, &c| acc * x + c)
}

/// Lagrange basis weights at zero for distinct, non-zero `xs`.
///
/// `f(0) = Σ weights[i] · f(xs[i])` for any polynomial of degree below `xs.len()`.
pub(crate) fn lagrange_weights_at_zero(xs: &[Gf256]) -> Vec<Gf256> {
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let mut num = Gf256::ONE;
            let mut den = Gf256::ONE;
            for (j, &xj) in xs.iter().enumerate() {
                if i != j {
                    num = num * xj;
                    // subtraction is XOR
                    den = den * (xj + xi);
                }
            }
            num / den
        })
        .collect()
}
