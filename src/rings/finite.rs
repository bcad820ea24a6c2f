use std::cmp::Ordering;

use crate::ring::*;
use crate::rings::zn::Zn;

///
/// Trait for finite fields `GF(q)`, `q = p^e`.
/// 
/// The algorithms for root finding never use the size `q` directly, since it might
/// not fit into a `u64`; all powers `x^q` are computed as `e`-fold iterated
/// Frobenius `x -> x^p`.
/// 
pub trait FiniteField: Field {

    ///
    /// Returns the characteristic `p`.
    /// 
    fn characteristic(&self) -> u64;

    ///
    /// Returns `e` such that this field has `p^e` elements.
    /// 
    fn degree_over_prime_field(&self) -> usize;

    ///
    /// Returns a uniformly random element from this field, using the randomness
    /// provided by `rng`.
    /// 
    fn random_element<G: FnMut() -> u64>(&self, rng: G) -> Self::Element;

    ///
    /// A total order on the elements. It has no algebraic meaning, but allows us
    /// to give results (like lists of roots) in a canonical order.
    /// 
    fn cmp_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> Ordering;

    ///
    /// Computes the image of `x` under the absolute Frobenius `x -> x^p`.
    /// 
    fn frobenius(&self, x: Self::Element) -> Self::Element {
        self.pow(x, self.characteristic())
    }

    ///
    /// Returns the number of elements in this field, if it fits into a `u128`.
    /// 
    fn size(&self) -> Option<u128> {
        (self.characteristic() as u128).checked_pow(self.degree_over_prime_field() as u32)
    }
}

impl FiniteField for Zn {

    fn characteristic(&self) -> u64 {
        self.modulus()
    }

    fn degree_over_prime_field(&self) -> usize {
        1
    }

    fn random_element<G: FnMut() -> u64>(&self, mut rng: G) -> Self::Element {
        self.from_u64(rng())
    }

    fn cmp_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> Ordering {
        lhs.cmp(rhs)
    }

    fn frobenius(&self, x: Self::Element) -> Self::Element {
        x
    }
}

impl<'b, R: FiniteField + ?Sized> FiniteField for &'b R {

    fn characteristic(&self) -> u64 { (**self).characteristic() }
    fn degree_over_prime_field(&self) -> usize { (**self).degree_over_prime_field() }
    fn random_element<G: FnMut() -> u64>(&self, rng: G) -> Self::Element { (**self).random_element(rng) }
    fn cmp_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> Ordering { (**self).cmp_el(lhs, rhs) }
    fn frobenius(&self, x: Self::Element) -> Self::Element { (**self).frobenius(x) }
}

#[test]
fn test_size() {
    assert_eq!(Some(17), Zn::new(17).size());
    assert_eq!(5, Zn::new(17).frobenius(5));
}
