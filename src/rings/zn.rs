use std::fmt::Formatter;

use crate::algorithms::miller_rabin::is_prime;
use crate::algorithms::sqr_mul::pow_mod;
use crate::integer::IntegerCoefficient;
use crate::ring::*;

///
/// Represents the prime field `Z/pZ` for a prime `p` that fits into a `u64`.
/// 
/// Elements are stored as their smallest nonnegative representative, hence
/// equality of elements is equality of the underlying `u64`. Products are computed
/// in `u128`, which is not as fast as Barett reduction, but the finite fields we
/// work with are only used to decide equalities of algebraic numbers, so their
/// arithmetic is never the bottleneck.
/// 
/// # Example
/// ```
/// # use artin_frobenius::assert_el_eq;
/// # use artin_frobenius::ring::*;
/// # use artin_frobenius::rings::zn::*;
/// let Fp = Zn::new(7);
/// assert_el_eq!(&Fp, Fp.one(), Fp.mul(Fp.from_int(3), Fp.from_int(5)));
/// ```
/// 
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Zn {
    modulus: u64
}

impl Zn {

    ///
    /// Creates the field `Z/pZ`. Panics if `p` is not a prime.
    /// 
    pub fn new(p: u64) -> Self {
        assert!(is_prime(p), "{} is not a prime", p);
        Zn { modulus: p }
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn coerce_integer(&self, value: &IntegerCoefficient) -> u64 {
        value.reduce_mod(self.modulus)
    }

    ///
    /// Returns the element with representative `i mod p`; used for enumerating
    /// and randomly sampling elements.
    /// 
    pub fn from_u64(&self, i: u64) -> u64 {
        i % self.modulus
    }

    pub fn elements<'a>(&'a self) -> impl 'a + Iterator<Item = u64> {
        0..self.modulus
    }
}

impl RingBase for Zn {

    type Element = u64;

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        debug_assert!(*lhs < self.modulus && *rhs < self.modulus);
        // if the sum overflows, the wrapped value plus 2^64 is still below 2p
        let (sum, overflow) = lhs.overflowing_add(*rhs);
        *lhs = if overflow || sum >= self.modulus { sum.wrapping_sub(self.modulus) } else { sum };
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        if *lhs != 0 {
            *lhs = self.modulus - *lhs;
        }
    }

    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        *lhs = ((*lhs as u128 * *rhs as u128) % (self.modulus as u128)) as u64;
    }

    fn from_int(&self, value: i64) -> Self::Element {
        (value as i128).rem_euclid(self.modulus as i128) as u64
    }

    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        *lhs == *rhs
    }

    fn is_zero(&self, value: &Self::Element) -> bool {
        *value == 0
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result {
        write!(out, "{}", *value)
    }

    fn pow(&self, x: Self::Element, power: u64) -> Self::Element {
        pow_mod(x, power, self.modulus)
    }
}

impl Field for Zn {

    fn invert(&self, value: &Self::Element) -> Option<Self::Element> {
        if *value == 0 {
            return None;
        }
        // Fermat's little theorem
        return Some(pow_mod(*value, self.modulus - 2, self.modulus));
    }
}

#[cfg(test)]
use crate::assert_el_eq;

#[test]
fn test_arithmetic() {
    let Fp = Zn::new(17);
    assert_el_eq!(&Fp, Fp.from_int(16), Fp.from_int(-1));
    assert_el_eq!(&Fp, Fp.zero(), Fp.add(Fp.from_int(9), Fp.from_int(8)));
    assert_el_eq!(&Fp, Fp.from_int(2), Fp.mul(Fp.from_int(6), Fp.from_int(6)));
    assert_el_eq!(&Fp, Fp.from_int(13), Fp.sub(Fp.from_int(3), Fp.from_int(7)));
    assert_el_eq!(&Fp, Fp.from_int(8), Fp.pow(Fp.from_int(2), 3));
}

#[test]
fn test_invert() {
    let Fp = Zn::new(257);
    assert!(Fp.invert(&Fp.zero()).is_none());
    for x in Fp.elements().skip(1) {
        let x_inv = Fp.invert(&x).unwrap();
        assert_el_eq!(&Fp, Fp.one(), Fp.mul(x, x_inv));
    }
}

#[test]
fn test_large_modulus() {
    let p = (1 << 61) - 1;
    assert!(is_prime(p));
    let Fp = Zn::new(p);
    let a = Fp.from_int(-2);
    assert_el_eq!(&Fp, Fp.from_int(4), Fp.mul(a, a));
    assert_el_eq!(&Fp, Fp.one(), Fp.div(&a, &a));
    assert_eq!(p - 576, Fp.coerce_integer(&IntegerCoefficient::from(-576)));
}

#[test]
fn test_modulus_above_2_pow_63() {
    let p = 9223372036854775837;
    let Fp = Zn::new(p);
    assert_el_eq!(&Fp, Fp.from_int(-1), p - 1);
    assert_el_eq!(&Fp, Fp.from_int(1), Fp.add(p - 1, 2));
    assert_el_eq!(&Fp, Fp.from_int(-3), Fp.add(p - 1, p - 2));
    assert_el_eq!(&Fp, Fp.zero(), Fp.add(p - 5, 5));
    assert_el_eq!(&Fp, Fp.from_int(i64::MIN), Fp.negate(Fp.pow(Fp.from_int(2), 63)));
    let a = Fp.from_int(-7);
    assert_el_eq!(&Fp, Fp.one(), Fp.div(&a, &a));
    assert_el_eq!(&Fp, Fp.from_int(49), Fp.mul(a, a));
}

#[test]
#[should_panic]
fn test_not_a_prime() {
    Zn::new(91);
}
