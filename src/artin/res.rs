use tracing::instrument;

use crate::artin::records::ResolventData;
use crate::integer::IntegerCoefficient;
use crate::ring::*;
use crate::rings::finite::FiniteField;
use crate::rings::galois_field::GaloisField;

///
/// The invariant `alpha = sum_r gamma(r) * sum_(j in powers) r^(p^j)` of RES records,
/// where `r` runs through the roots of the defining polynomial and `gamma` is the
/// resolvent polynomial.
///
#[derive(Clone, Debug)]
pub struct ResInvariant {
    powers: Vec<u32>,
    gamma: Vec<IntegerCoefficient>
}

impl ResInvariant {

    pub fn new(data: ResolventData) -> Self {
        ResInvariant { powers: data.powers, gamma: data.resolvent }
    }

    ///
    /// Computes `sum_(j in powers) r^(p^j)`. Since `r` lies in `GF(p^d)`, the exponents
    /// `j` only matter modulo `d`, and so we never need more than `d - 1` Frobenius
    /// iterations per root.
    ///
    pub fn powers_sum(&self, field: &GaloisField, r: &El<GaloisField>) -> El<GaloisField> {
        let d = field.degree_over_prime_field();
        let max_power = self.powers.iter().map(|j| *j as usize % d).max().unwrap_or(0);
        let mut frobenius_iterates = Vec::with_capacity(max_power + 1);
        frobenius_iterates.push(r.clone());
        for i in 0..max_power {
            let next = field.frobenius(frobenius_iterates[i].clone());
            frobenius_iterates.push(next);
        }
        return field.sum(self.powers.iter().map(|j| frobenius_iterates[*j as usize % d].clone()));
    }

    #[instrument(skip_all, level = "trace")]
    pub fn alpha(&self, field: &GaloisField, roots: &[El<GaloisField>]) -> El<GaloisField> {
        field.sum(roots.iter().map(|r| field.mul(field.evaluate_integer_poly(&self.gamma, r), self.powers_sum(field, r))))
    }
}

#[cfg(test)]
use crate::artin::roots::RootResolver;
#[cfg(test)]
use crate::integer::int_coefficients;
#[cfg(test)]
use crate::permutation::CycleType;

#[test]
fn test_powers_sum() {
    let field = GaloisField::new(3, 4);
    let a = field.canonical_gen();
    let invariant = ResInvariant::new(ResolventData { powers: vec![0, 1, 5], resolvent: int_coefficients([1]) });
    // a^(3^5) = a^(3^1) in GF(81)
    let expected = field.add(a.clone(), field.mul(field.from_int(2), field.pow(a.clone(), 3)));
    assert!(field.eq_el(&expected, &invariant.powers_sum(&field, &a)));
    let empty = ResInvariant::new(ResolventData { powers: vec![], resolvent: int_coefficients([1]) });
    assert!(field.is_zero(&empty.powers_sum(&field, &a)));
}

#[test]
fn test_alpha_cyclic_cubic() {
    // x^3 - 3x + 1 defines the cyclic cubic field of conductor 9, and for gamma = x^2, Powers = [1]
    // we get alpha = sum_r r^2 sigma(r), which is 6 resp. -3 for the two generators sigma
    let poly = int_coefficients([1, -3, 0, 1]);
    let invariant = ResInvariant::new(ResolventData { powers: vec![1], resolvent: int_coefficients([0, 0, 1]) });
    let resolver = RootResolver::new(&CycleType::new(vec![3]), poly);
    for p in [2, 5, 7, 11, 13, 23, 29, 31, 41, 43] {
        let (field, roots) = resolver.roots(p).unwrap();
        let alpha = invariant.alpha(&field, &roots);
        let expected = if p % 9 == 2 || p % 9 == 7 { 6 } else { -3 };
        assert!(field.eq_el(&field.from_int(expected), &alpha), "wrong alpha at p = {}", p);
    }
}
