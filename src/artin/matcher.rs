use crate::artin::records::{ConjugacyClassIndex, RootOfEntry};
use crate::error::{EngineError, Result};
use crate::ring::*;
use crate::rings::galois_field::GaloisField;

///
/// Matches a value of an invariant against a table of integer polynomials, and returns
/// the conjugacy class associated to the unique polynomial that vanishes on it.
///
/// The invariant is only known as an element of some finite field, so "vanishing" means
/// vanishing after reduction modulo `p`. For non-hard primes, the stored tables guarantee
/// that this still determines a unique polynomial.
///
#[derive(Clone, Debug)]
pub struct PolynomialMatcher {
    candidates: Vec<RootOfEntry>
}

impl PolynomialMatcher {

    pub fn new(candidates: Vec<RootOfEntry>) -> Self {
        PolynomialMatcher { candidates: candidates }
    }

    pub fn candidates(&self) -> &[RootOfEntry] {
        &self.candidates
    }

    ///
    /// Returns the conjugacy class of the unique candidate polynomial that has `alpha`
    /// as a root. If there is no such polynomial, or more than one, the table does not
    /// distinguish the classes at this prime, and an error is returned.
    ///
    pub fn match_alpha(&self, field: &GaloisField, alpha: &El<GaloisField>) -> Result<ConjugacyClassIndex> {
        let matches = self.candidates.iter()
            .filter(|entry| field.is_zero(&field.evaluate_integer_poly(&entry.root_of, alpha)))
            .map(|entry| entry.conjugacy_class)
            .collect::<Vec<_>>();
        match matches.len() {
            1 => Ok(matches[0]),
            0 => Err(EngineError::NoMatchingPolynomial {
                alpha: format!("{}", field.format(alpha)),
                candidates: self.candidates.clone()
            }),
            _ => Err(EngineError::MultipleMatchingPolynomials {
                alpha: format!("{}", field.format(alpha)),
                candidates: self.candidates.clone(),
                matches: matches
            })
        }
    }
}

#[cfg(test)]
use crate::integer::int_coefficients;

#[cfg(test)]
fn example_matcher() -> PolynomialMatcher {
    PolynomialMatcher::new(vec![
        RootOfEntry { root_of: int_coefficients([0, 1]), conjugacy_class: ConjugacyClassIndex::new(3) },
        RootOfEntry { root_of: int_coefficients([-7, 1]), conjugacy_class: ConjugacyClassIndex::new(4) }
    ])
}

#[test]
fn test_match_alpha() {
    let field = GaloisField::new(11, 2);
    let matcher = example_matcher();
    assert_eq!(ConjugacyClassIndex::new(3), matcher.match_alpha(&field, &field.zero()).unwrap());
    assert_eq!(ConjugacyClassIndex::new(4), matcher.match_alpha(&field, &field.from_int(7)).unwrap());
    assert_eq!(ConjugacyClassIndex::new(4), matcher.match_alpha(&field, &field.from_int(-4)).unwrap());
}

#[test]
fn test_no_match() {
    let field = GaloisField::new(11, 2);
    let matcher = example_matcher();
    match matcher.match_alpha(&field, &field.canonical_gen()) {
        Err(EngineError::NoMatchingPolynomial { candidates, .. }) => assert_eq!(matcher.candidates(), &candidates[..]),
        other => panic!("unexpected {:?}", other)
    }
    assert!(matcher.match_alpha(&field, &field.one()).is_err());
}

#[test]
fn test_multiple_matches() {
    // modulo 7, both polynomials vanish at zero
    let field = GaloisField::new(7, 1);
    let matcher = example_matcher();
    match matcher.match_alpha(&field, &field.zero()) {
        Err(EngineError::MultipleMatchingPolynomials { matches, .. }) => assert_eq!(vec![ConjugacyClassIndex::new(3), ConjugacyClassIndex::new(4)], matches),
        other => panic!("unexpected {:?}", other)
    }
}
