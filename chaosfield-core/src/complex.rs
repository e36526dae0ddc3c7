use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A complex number represented as two `f64` components.
///
/// Lightweight and `Copy` so the Newton loop can keep values in registers.
/// Arithmetic follows IEEE-754 throughout: dividing by zero yields infinite or
/// NaN components instead of panicking, and those values propagate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// A purely real value.
    #[inline]
    pub fn from_real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Returns `√(re² + im²)`.
    ///
    /// Uses `hypot` so very large or very small components do not overflow
    /// or flush to zero before the root is taken.
    #[inline]
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Euclidean distance to `other` in the complex plane.
    #[inline]
    pub fn dist(self, other: Self) -> f64 {
        (self - other).norm()
    }

    #[inline]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// `e^{iθ}` scaled by `r`.
    #[inline]
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

// -- Arithmetic operators --

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl SubAssign for Complex {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.re -= rhs.re;
        self.im -= rhs.im;
    }
}

impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl MulAssign for Complex {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Complex division using Smith's scaling.
///
/// Dividing through by the larger component of the divisor keeps
/// intermediates in range, so finite operands near `1e154` and beyond still
/// give a finite quotient. A zero divisor yields `inf`/`NaN` component-wise;
/// the Newton step relies on this rather than branching.
impl Div for Complex {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        let (abs_re, abs_im) = (rhs.re.abs(), rhs.im.abs());
        if abs_re >= abs_im {
            if abs_re == 0.0 {
                return Self {
                    re: self.re / abs_re,
                    im: self.im / abs_im,
                };
            }
            let rat = rhs.im / rhs.re;
            let scl = 1.0 / (rhs.re + rhs.im * rat);
            Self {
                re: (self.re + self.im * rat) * scl,
                im: (self.im - self.re * rat) * scl,
            }
        } else {
            let rat = rhs.re / rhs.im;
            let scl = 1.0 / (rhs.im + rhs.re * rat);
            Self {
                re: (self.re * rat + self.im) * scl,
                im: (self.im * rat - self.re) * scl,
            }
        }
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

/// Scalar multiplication: `Complex * f64`.
impl Mul<f64> for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self {
            re: self.re * rhs,
            im: self.im * rhs,
        }
    }
}

/// Adds a real scalar to the real part.
impl Add<f64> for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self {
            re: self.re + rhs,
            im: self.im,
        }
    }
}

impl From<f64> for Complex {
    #[inline]
    fn from(re: f64) -> Self {
        Self::from_real(re)
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}
