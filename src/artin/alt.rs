use tracing::instrument;

use crate::artin::roots::frobenius_permutation;
use crate::error::{EngineError, Result};
use crate::permutation::{are_conjugate_in_alternating, Permutation};
use crate::ring::*;
use crate::rings::finite::FiniteField;
use crate::rings::galois_field::GaloisField;

///
/// The invariant used to distinguish two classes of `A_n` that fuse to a single class
/// of `S_n`, following Serre's trick.
///
/// If `delta = prod_(i > j) (r_i - r_j)` is the square root of the discriminant w.r.t.
/// the ordering of the roots, then `alpha = delta` if Frobenius is `A_n`-conjugate
/// to the reference permutation, and `alpha = -delta` otherwise, i.e.
/// `alpha = -(-1)^c delta` with `c = 1` for conjugate elements. Changing the order of
/// the roots by an odd permutation changes both the sign of `delta` and the `A_n`-class
/// of Frobenius, so `alpha` does not depend on the order of the roots. In particular,
/// `alpha` is the reduction of an integer that only depends on the class of Frobenius.
///
#[derive(Clone, Debug)]
pub struct AltInvariant {
    reference: Permutation
}

impl AltInvariant {

    ///
    /// Creates the invariant w.r.t. the reference permutation, given by its 1-based images.
    /// It has to be an element of the alternating group.
    ///
    pub fn new(data: &[usize]) -> Result<Self> {
        let reference = Permutation::from_images_one_based(data)
            .map_err(|_| EngineError::NotAlternating { images: data.to_vec() })?;
        if !reference.is_even() {
            return Err(EngineError::NotAlternating { images: data.to_vec() });
        }
        return Ok(AltInvariant { reference: reference });
    }

    pub fn reference(&self) -> &Permutation {
        &self.reference
    }

    ///
    /// Computes the invariant for the prime `p = field.characteristic()`, where `roots`
    /// are all roots of the defining polynomial, sorted as returned by
    /// [`crate::artin::roots::RootResolver::roots()`].
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn alpha(&self, field: &GaloisField, roots: &[El<GaloisField>]) -> Result<El<GaloisField>> {
        let delta = field.prod((0..roots.len()).flat_map(|i| (0..i).map(move |j| (i, j))).map(|(i, j)| field.sub_ref(&roots[i], &roots[j])));
        let frobenius = self.frobenius_in_alternating_group(field, roots)?;
        if are_conjugate_in_alternating(&frobenius, &self.reference) {
            return Ok(delta);
        } else {
            return Ok(field.negate(delta));
        }
    }

    fn frobenius_in_alternating_group(&self, field: &GaloisField, roots: &[El<GaloisField>]) -> Result<Permutation> {
        let frobenius = frobenius_permutation(field, roots)?;
        let not_alternating = || EngineError::FrobeniusNotAlternating { prime: field.characteristic(), images: frobenius.images_one_based() };
        if frobenius.degree() > self.reference.degree() || !frobenius.is_even() {
            return Err(not_alternating());
        }
        // consider Frobenius as element of the same alternating group as the reference
        let padded = frobenius.images_one_based().into_iter().chain((frobenius.degree() + 1)..=self.reference.degree()).collect::<Vec<_>>();
        return Permutation::from_images_one_based(&padded).map_err(|_| not_alternating());
    }
}

#[cfg(test)]
use crate::artin::roots::RootResolver;
#[cfg(test)]
use crate::integer::int_coefficients;
#[cfg(test)]
use crate::permutation::CycleType;

#[test]
fn test_new() {
    assert!(AltInvariant::new(&[2, 3, 1, 4]).is_ok());
    assert!(AltInvariant::new(&[1, 2, 3]).is_ok());
    assert_eq!(Some(EngineError::NotAlternating { images: vec![2, 1, 3, 4] }), AltInvariant::new(&[2, 1, 3, 4]).err());
    assert_eq!(Some(EngineError::NotAlternating { images: vec![2, 2, 1] }), AltInvariant::new(&[2, 2, 1]).err());
}

#[test]
fn test_alpha_squares_to_discriminant() {
    // x^4 + 8x + 12 has Galois group A_4 and discriminant 576^2
    let poly = int_coefficients([12, 8, 0, 0, 1]);
    let invariant = AltInvariant::new(&[2, 3, 1, 4]).unwrap();
    let resolver = RootResolver::new(&CycleType::new(vec![1, 3]), poly);
    for p in [5, 11, 13, 23, 29, 31] {
        let (field, roots) = resolver.roots(p).unwrap();
        let alpha = invariant.alpha(&field, &roots).unwrap();
        let square = field.square(&alpha);
        assert!(field.eq_el(&field.from_int(576 * 576), &square));
        assert!(field.eq_el(&field.from_int(576), &alpha) || field.eq_el(&field.from_int(-576), &alpha));
    }
}

#[test]
fn test_alpha_independent_of_root_order() {
    let poly = int_coefficients([12, 8, 0, 0, 1]);
    let invariant = AltInvariant::new(&[2, 3, 1, 4]).unwrap();
    let resolver = RootResolver::new(&CycleType::new(vec![1, 3]), poly);
    let (field, roots) = resolver.roots(11).unwrap();
    let alpha = invariant.alpha(&field, &roots).unwrap();
    // swapping two roots and restoring the sort order must not change alpha, even though it changes
    // the sign of delta; this computes alpha for the other order directly
    let mut swapped = roots.clone();
    swapped.swap(0, 1);
    let delta_swapped = field.prod((0..4).flat_map(|i| (0..i).map(move |j| (i, j))).map(|(i, j)| field.sub_ref(&swapped[i], &swapped[j])));
    let frobenius = frobenius_permutation(&field, &roots).unwrap();
    let transposition = Permutation::from_images_one_based(&[2, 1, 3, 4]).unwrap();
    let frobenius_swapped = frobenius.conjugate_by(&transposition);
    let alpha_swapped = if are_conjugate_in_alternating(&frobenius_swapped, invariant.reference()) {
        delta_swapped
    } else {
        field.negate(delta_swapped)
    };
    assert!(field.eq_el(&alpha, &alpha_swapped));
}

#[test]
fn test_frobenius_not_alternating() {
    // x^3 - 2 has Galois group S_3, so Frobenius is odd for p = 2 mod 3
    let poly = int_coefficients([-2, 0, 0, 1]);
    let invariant = AltInvariant::new(&[2, 3, 1]).unwrap();
    let resolver = RootResolver::new(&CycleType::new(vec![1, 2]), poly);
    let (field, roots) = resolver.roots(5).unwrap();
    assert!(matches!(invariant.alpha(&field, &roots), Err(EngineError::FrobeniusNotAlternating { prime: 5, .. })));
}
