use std::fmt::{Display, Formatter};

use crate::algorithms;

///
/// Basic trait for objects that have a ring structure.
///
/// The ring object stores all data that is shared between elements (e.g. the
/// modulus in `Z/pZ`), and elements are plain data that can only be interpreted
/// together with their ring. All arithmetic is therefore performed through the ring,
/// e.g. `ring.add(a, b)` instead of `a + b`.
///
/// Implementors have to provide the by-reference assign operations; the remaining
/// operations have default implementations in terms of these, which can be overwritten
/// if a cheaper way exists.
///
pub trait RingBase {

    type Element: Clone;

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element);
    fn negate_inplace(&self, lhs: &mut Self::Element);
    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element);
    fn from_int(&self, value: i64) -> Self::Element;
    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool;
    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result;

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) { self.add_assign_ref(lhs, &rhs) }
    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) { self.mul_assign_ref(lhs, &rhs) }
    fn zero(&self) -> Self::Element { self.from_int(0) }
    fn one(&self) -> Self::Element { self.from_int(1) }
    fn is_zero(&self, value: &Self::Element) -> bool { self.eq_el(value, &self.zero()) }
    fn is_one(&self, value: &Self::Element) -> bool { self.eq_el(value, &self.one()) }

    fn clone_el(&self, value: &Self::Element) -> Self::Element {
        value.clone()
    }

    fn negate(&self, mut value: Self::Element) -> Self::Element {
        self.negate_inplace(&mut value);
        return value;
    }

    fn sub_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        self.add_assign(lhs, self.negate(rhs.clone()));
    }

    fn sub_assign(&self, lhs: &mut Self::Element, mut rhs: Self::Element) {
        self.negate_inplace(&mut rhs);
        self.add_assign(lhs, rhs);
    }

    fn add_ref(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut result = lhs.clone();
        self.add_assign_ref(&mut result, rhs);
        return result;
    }

    fn add(&self, mut lhs: Self::Element, rhs: Self::Element) -> Self::Element {
        self.add_assign(&mut lhs, rhs);
        return lhs;
    }

    fn sub_ref(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut result = lhs.clone();
        self.sub_assign_ref(&mut result, rhs);
        return result;
    }

    fn sub(&self, mut lhs: Self::Element, rhs: Self::Element) -> Self::Element {
        self.sub_assign(&mut lhs, rhs);
        return lhs;
    }

    fn mul_ref(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut result = lhs.clone();
        self.mul_assign_ref(&mut result, rhs);
        return result;
    }

    fn mul(&self, mut lhs: Self::Element, rhs: Self::Element) -> Self::Element {
        self.mul_assign(&mut lhs, rhs);
        return lhs;
    }

    fn square(&self, value: &Self::Element) -> Self::Element {
        self.mul_ref(value, value)
    }

    fn pow(&self, x: Self::Element, power: u64) -> Self::Element {
        algorithms::sqr_mul::generic_abs_square_and_multiply(
            x,
            power,
            |a| self.square(&a),
            |a, b| self.mul_ref(a, &b),
            self.one()
        )
    }

    fn sum<I>(&self, els: I) -> Self::Element
        where I: IntoIterator<Item = Self::Element>
    {
        els.into_iter().fold(self.zero(), |a, b| self.add(a, b))
    }

    fn prod<I>(&self, els: I) -> Self::Element
        where I: IntoIterator<Item = Self::Element>
    {
        els.into_iter().fold(self.one(), |a, b| self.mul(a, b))
    }

    fn format<'a>(&'a self, value: &'a Self::Element) -> RingElementDisplayWrapper<'a, Self> {
        RingElementDisplayWrapper { ring: self, element: value }
    }
}

///
/// A [`RingBase`] in which every nonzero element has a multiplicative inverse.
///
pub trait Field: RingBase {

    fn invert(&self, value: &Self::Element) -> Option<Self::Element>;

    fn div(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let rhs_inv = self.invert(rhs).expect("division by zero");
        return self.mul_ref(lhs, &rhs_inv);
    }
}

pub type El<R> = <R as RingBase>::Element;

impl<'b, R: RingBase + ?Sized> RingBase for &'b R {

    type Element = R::Element;

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) { (**self).add_assign_ref(lhs, rhs) }
    fn negate_inplace(&self, lhs: &mut Self::Element) { (**self).negate_inplace(lhs) }
    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) { (**self).mul_assign_ref(lhs, rhs) }
    fn from_int(&self, value: i64) -> Self::Element { (**self).from_int(value) }
    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool { (**self).eq_el(lhs, rhs) }
    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result { (**self).dbg(value, out) }
}

impl<'b, R: Field + ?Sized> Field for &'b R {

    fn invert(&self, value: &Self::Element) -> Option<Self::Element> { (**self).invert(value) }
}

pub struct RingElementDisplayWrapper<'a, R: RingBase + ?Sized> {
    ring: &'a R,
    element: &'a R::Element
}

impl<'a, R: RingBase + ?Sized> Display for RingElementDisplayWrapper<'a, R> {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.ring.dbg(self.element, f)
    }
}

///
/// Asserts that two ring elements are equal, and prints them using the ring if not.
///
#[macro_export]
macro_rules! assert_el_eq {
    ($ring:expr, $lhs:expr, $rhs:expr) => {
        match (&$ring, &$lhs, &$rhs) {
            (ring_val, lhs_val, rhs_val) => {
                assert!(
                    $crate::ring::RingBase::eq_el(ring_val, lhs_val, rhs_val),
                    "Assertion failed: {} != {}",
                    $crate::ring::RingBase::format(ring_val, lhs_val),
                    $crate::ring::RingBase::format(ring_val, rhs_val)
                );
            }
        }
    };
}
