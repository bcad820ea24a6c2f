use std::f64::EPSILON;
use std::f64::consts::PI;
use std::fmt::Formatter;

use crate::ring::*;

///
/// An approximate implementation of the complex numbers `C`, using 64 bit floating
/// point numbers.
///
/// This is used for the local factors of Artin representations, whose coefficients
/// are sums of roots of unity. Everything related to the Frobenius conjugacy classes
/// is computed exactly in finite fields instead.
///
/// # Warning
///
/// Since floating point numbers do not exactly represent the complex numbers, we cannot
/// provide any function related to equality. In particular, `Complex64.eq_el(a, b)` is
/// not supported, and will panic. Use [`Complex64::is_approx_eq()`] instead.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex64El(f64, f64);

impl Complex64 {

    pub const RING: Self = Complex64;
    pub const I: Complex64El = Complex64El(0., 1.);

    pub fn abs(&self, Complex64El(re, im): Complex64El) -> f64 {
        (re * re + im * im).sqrt()
    }

    pub fn conjugate(&self, Complex64El(re, im): Complex64El) -> Complex64El {
        Complex64El(re, -im)
    }

    pub fn exp(&self, Complex64El(exp_re, exp_im): Complex64El) -> Complex64El {
        let angle = exp_im;
        let abs = exp_re.exp();
        Complex64El(abs * angle.cos(), abs * angle.sin())
    }

    pub fn is_absolute_approx_eq(&self, lhs: Complex64El, rhs: Complex64El, absolute_threshold: f64) -> bool {
        self.abs(self.sub(lhs, rhs)) < absolute_threshold
    }

    pub fn is_relative_approx_eq(&self, lhs: Complex64El, rhs: Complex64El, relative_limit: f64) -> bool {
        self.is_absolute_approx_eq(lhs, rhs, self.abs(lhs) * relative_limit)
    }

    ///
    /// Checks whether `lhs` and `rhs` are equal up to `precision` times the machine epsilon,
    /// relative to their size if they are not close to zero.
    ///
    pub fn is_approx_eq(&self, lhs: Complex64El, rhs: Complex64El, precision: u64) -> bool {
        let scaled_precision = precision as f64 * EPSILON;
        if self.is_absolute_approx_eq(lhs, self.zero(), scaled_precision) {
            self.is_absolute_approx_eq(rhs, self.zero(), scaled_precision)
        } else {
            self.is_relative_approx_eq(lhs, rhs, scaled_precision)
        }
    }

    pub fn from_f64(&self, x: f64) -> Complex64El {
        Complex64El(x, 0.)
    }

    pub fn from_parts(&self, re: f64, im: f64) -> Complex64El {
        Complex64El(re, im)
    }

    ///
    /// Returns `exp(2 pi i * i / n)`.
    ///
    pub fn root_of_unity(&self, i: i64, n: i64) -> Complex64El {
        // reduce first, so that large exponents do not lose precision
        let i = i.rem_euclid(n);
        self.exp(self.mul(self.from_f64((i as f64 / n as f64) * (2. * PI)), Complex64::I))
    }

    pub fn re(&self, Complex64El(re, _im): Complex64El) -> f64 {
        re
    }

    pub fn im(&self, Complex64El(_re, im): Complex64El) -> f64 {
        im
    }

    pub fn div(&self, lhs: Complex64El, rhs: Complex64El) -> Complex64El {
        let abs_sqr = self.abs(rhs) * self.abs(rhs);
        let Complex64El(res_re, res_im) = self.mul(lhs, self.conjugate(rhs));
        return Complex64El(res_re / abs_sqr, res_im / abs_sqr);
    }
}

impl RingBase for Complex64 {

    type Element = Complex64El;

    fn add_assign_ref(&self, Complex64El(lhs_re, lhs_im): &mut Self::Element, Complex64El(rhs_re, rhs_im): &Self::Element) {
        *lhs_re += *rhs_re;
        *lhs_im += *rhs_im;
    }

    fn negate_inplace(&self, Complex64El(re, im): &mut Self::Element) {
        *re = -*re;
        *im = -*im;
    }

    fn mul_assign_ref(&self, Complex64El(lhs_re, lhs_im): &mut Self::Element, Complex64El(rhs_re, rhs_im): &Self::Element) {
        let new_im = *lhs_re * *rhs_im + *lhs_im * *rhs_re;
        *lhs_re = *lhs_re * *rhs_re - *lhs_im * *rhs_im;
        *lhs_im = new_im;
    }

    fn from_int(&self, value: i64) -> Self::Element {
        Complex64El(value as f64, 0.)
    }

    fn eq_el(&self, _: &Self::Element, _: &Self::Element) -> bool {
        panic!("Cannot provide equality on approximate rings")
    }

    fn is_zero(&self, Complex64El(re, im): &Self::Element) -> bool {
        *re == 0. && *im == 0.
    }

    fn dbg<'a>(&self, Complex64El(re, im): &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result {
        write!(out, "{} + {}i", re, im)
    }
}

#[test]
fn test_pow() {
    let CC = Complex64::RING;
    let i = Complex64::I;
    assert!(CC.is_approx_eq(CC.negate(i), CC.pow(i, 3), 1));
    assert!(CC.is_approx_eq(CC.negate(i), CC.pow(i, 1024 + 3), 100));
    assert!(CC.is_approx_eq(CC.exp(CC.mul(CC.from_f64(PI / 4.), i)), CC.mul(CC.add(CC.one(), i), CC.from_f64(2f64.powf(-0.5))), 1));

    let seventh_root_of_unity = CC.root_of_unity(1, 7);
    assert!(CC.is_approx_eq(CC.pow(seventh_root_of_unity, 7 * 100 + 1), seventh_root_of_unity, 1000));
}

#[test]
fn test_mul_div() {
    let CC = Complex64::RING;
    let i = Complex64::I;
    assert!(CC.is_approx_eq(CC.mul(i, i), CC.from_f64(-1.), 1));
    assert!(CC.is_approx_eq(CC.mul(CC.add(i, CC.one()), i), CC.sub(i, CC.one()), 1));
    assert!(CC.is_approx_eq(CC.div(CC.from_f64(2.), CC.add(i, CC.one())), CC.sub(CC.one(), i), 1));
}

#[test]
fn test_root_of_unity() {
    let CC = Complex64::RING;
    assert!(CC.is_approx_eq(CC.from_f64(-1.), CC.root_of_unity(3, 6), 10));
    assert!(CC.is_approx_eq(CC.root_of_unity(1, 3), CC.root_of_unity(-2, 3), 10));
    let sum = CC.sum((0..5).map(|k| CC.root_of_unity(k, 5)));
    assert!(CC.is_absolute_approx_eq(sum, CC.zero(), 1e-12));
}
