use tracing::instrument;

use crate::algorithms::cantor_zassenhaus::find_roots;
use crate::algorithms::miller_rabin::is_prime;
use crate::error::{EngineError, Result};
use crate::integer::IntegerCoefficient;
use crate::permutation::{CycleType, Permutation};
use crate::ring::*;
use crate::rings::finite::FiniteField;
use crate::rings::galois_field::GaloisField;
use crate::rings::poly::DensePolyRing;

///
/// Finds the roots of the defining polynomial of a number field in `GF(p^d)`, where `d`
/// is the order of the Frobenius elements with a fixed cycle type. This is exactly the
/// field generated by all roots modulo a prime whose Frobenius has this cycle type.
///
#[derive(Clone, Debug)]
pub struct RootResolver {
    extension_degree: usize,
    defining_polynomial: Vec<IntegerCoefficient>
}

impl RootResolver {

    pub fn new(cycle_type: &CycleType, defining_polynomial: Vec<IntegerCoefficient>) -> Self {
        assert!(defining_polynomial.len() >= 2, "defining polynomial must have positive degree");
        RootResolver {
            extension_degree: cycle_type.order() as usize,
            defining_polynomial: defining_polynomial
        }
    }

    pub fn extension_degree(&self) -> usize {
        self.extension_degree
    }

    pub fn expected_root_count(&self) -> usize {
        self.defining_polynomial.len() - 1
    }

    ///
    /// Returns the field `GF(p^d)` together with all roots of the defining polynomial in it.
    ///
    /// The roots are sorted w.r.t. [`FiniteField::cmp_el()`], and since the field is
    /// constructed deterministically, calling this twice for the same prime gives the
    /// same roots in the same order. If the defining polynomial does not split into
    /// distinct linear factors, `p` was not a good prime of the cycle type, and an error
    /// is returned.
    ///
    #[instrument(skip_all, level = "trace", fields(p = p, d = self.extension_degree))]
    pub fn roots(&self, p: u64) -> Result<(GaloisField, Vec<El<GaloisField>>)> {
        if !is_prime(p) {
            return Err(EngineError::NotPrime { value: p });
        }
        let field = GaloisField::new(p, self.extension_degree);
        let poly_ring = DensePolyRing::new(&field);
        let poly = field.reduce_integer_poly(&poly_ring, &self.defining_polynomial);
        let roots = if poly_ring.is_zero(&poly) {
            Vec::new()
        } else {
            find_roots(&poly_ring, &poly)
        };
        if roots.len() != self.expected_root_count() {
            return Err(EngineError::RootCountMismatch { prime: p, expected: self.expected_root_count(), found: roots.len() });
        }
        return Ok((field, roots));
    }
}

///
/// Returns the permutation of the roots induced by the Frobenius `x -> x^p`, i.e. the
/// permutation mapping `i` to the index of `roots[i]^p`. The roots must be sorted as
/// returned by [`RootResolver::roots()`].
///
pub fn frobenius_permutation(field: &GaloisField, roots: &[El<GaloisField>]) -> Result<Permutation> {
    let images = roots.iter().map(|r| {
        let image = field.frobenius(r.clone());
        roots.binary_search_by(|x| field.cmp_el(x, &image))
            .map_err(|_| EngineError::FrobeniusNotPermutation { prime: field.characteristic() })
    }).collect::<Result<Vec<_>>>()?;
    return Permutation::from_images(images).map_err(|_| EngineError::FrobeniusNotPermutation { prime: field.characteristic() });
}

#[cfg(test)]
use crate::integer::int_coefficients;
#[cfg(test)]
use crate::algorithms::erathostenes::enumerate_primes;

#[cfg(test)]
fn factorization_pattern(poly: &[IntegerCoefficient], p: u64) -> CycleType {
    use crate::algorithms::cantor_zassenhaus::factor_degrees;
    use crate::rings::zn::Zn;
    let poly_ring = DensePolyRing::new(Zn::new(p));
    let f = poly_ring.from_coefficients(poly.iter().map(|c| c.reduce_mod(p)).collect());
    CycleType::new(factor_degrees(&poly_ring, f).into_iter().map(|d| d as u32).collect())
}

#[test]
fn test_root_count() {
    // x^3 - x - 1 has discriminant -23
    let poly = int_coefficients([-1, -1, 0, 1]);
    for p in [2, 3, 5, 7, 11, 13, 59] {
        let resolver = RootResolver::new(&factorization_pattern(&poly, p), poly.clone());
        let (field, roots) = resolver.roots(p).unwrap();
        assert_eq!(3, roots.len());
        for r in &roots {
            assert!(field.is_zero(&field.evaluate_integer_poly(&poly, r)));
        }
    }
    // GF(p^6) contains the roots for all factorization patterns
    let resolver = RootResolver::new(&CycleType::new(vec![1, 2, 3]), poly.clone());
    assert_eq!(6, resolver.extension_degree());
    for p in [2, 3, 5, 7, 11, 13, 59] {
        assert_eq!(3, resolver.roots(p).unwrap().1.len());
    }
}

#[test]
fn test_roots_over_too_small_field() {
    // x^3 - 2 is irreducible modulo 7, so it has no roots in F7
    let resolver = RootResolver::new(&CycleType::new(vec![1, 1, 1]), int_coefficients([-2, 0, 0, 1]));
    assert_eq!(
        Err(EngineError::RootCountMismatch { prime: 7, expected: 3, found: 0 }),
        resolver.roots(7).map(|(_, roots)| roots)
    );
    assert!(resolver.roots(31).is_ok());
}

#[test]
fn test_bad_prime() {
    // x^3 - x - 1 has discriminant -23
    let resolver = RootResolver::new(&CycleType::new(vec![1, 2]), int_coefficients([-1, -1, 0, 1]));
    assert!(matches!(resolver.roots(23), Err(EngineError::RootCountMismatch { prime: 23, expected: 3, found: 2 })));
    assert_eq!(Err(EngineError::NotPrime { value: 25 }), resolver.roots(25).map(|_| ()));
}

#[test]
fn test_frobenius_permutation() {
    let poly = int_coefficients([-2, 0, 0, 1]);
    for p in enumerate_primes(5, 200) {
        let cycle_type = factorization_pattern(&poly, p);
        let resolver = RootResolver::new(&cycle_type, poly.clone());
        let (field, roots) = resolver.roots(p).unwrap();
        let frobenius = frobenius_permutation(&field, &roots).unwrap();
        assert_eq!(cycle_type, frobenius.cycle_type());
        // computing the roots again gives the same order
        assert_eq!(roots, resolver.roots(p).unwrap().1);
    }
}

#[test]
fn test_frobenius_not_permutation() {
    let field = GaloisField::new(5, 2);
    let roots = vec![field.from_int(1), field.canonical_gen()];
    assert_eq!(Err(EngineError::FrobeniusNotPermutation { prime: 5 }), frobenius_permutation(&field, &roots));
}
