use std::sync::OnceLock;

use serde::{Deserialize, Deserializer};
use tracing::instrument;

use crate::algorithms::erathostenes::erathostenes;
use crate::artin::galois_group::NumberFieldGaloisGroup;
use crate::artin::records::ConjugacyClassIndex;
use crate::error::{EngineError, Result};
use crate::integer::IntegerCoefficient;
use crate::ring::*;
use crate::rings::float_complex::{Complex64, Complex64El};

fn deserialize_primes<'de, D>(deserializer: D) -> std::result::Result<Vec<u64>, D::Error>
    where D: Deserializer<'de>
{
    let values = Vec::<IntegerCoefficient>::deserialize(deserializer)?;
    values.iter().map(|value| value.to_i64()
        .and_then(|x| u64::try_from(x).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected a prime, got {}", value)))
    ).collect()
}

///
/// An Artin representation, i.e. a representation of the Galois group of a number field,
/// given by its local factors `det(1 - rho(Frob) T)` for each conjugacy class of the
/// Galois group, and by explicit local factors at the finitely many hard primes.
///
/// The coefficients of the local factors lie in `Q(zeta_N)`, where `N` is the conductor
/// of the character field. In the record, each coefficient is a list `[a_0, a_1, ...]` of
/// integers, standing for `sum a_i zeta^i` with `zeta = exp(2 pi i / N)`.
///
#[derive(Debug, Deserialize)]
pub struct ArtinRepresentation {
    #[serde(rename = "Dim")]
    dimension: usize,
    #[serde(rename = "HardPrimes", deserialize_with = "deserialize_primes")]
    hard_primes: Vec<u64>,
    #[serde(rename = "HardFactors")]
    hard_factors: Vec<ConjugacyClassIndex>,
    #[serde(rename = "BadPrimes", deserialize_with = "deserialize_primes")]
    bad_primes: Vec<u64>,
    #[serde(rename = "CharacterField")]
    character_field: u32,
    #[serde(rename = "LocalFactors")]
    local_factors: Vec<Vec<Vec<IntegerCoefficient>>>,
    #[serde(skip)]
    processed_local_factors: OnceLock<Vec<Vec<Complex64El>>>
}

impl ArtinRepresentation {

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn character_field(&self) -> u32 {
        self.character_field
    }

    pub fn hard_primes(&self) -> &[u64] {
        &self.hard_primes
    }

    pub fn is_hard_prime(&self, p: u64) -> bool {
        self.hard_primes.contains(&p)
    }

    pub fn bad_primes(&self) -> &[u64] {
        &self.bad_primes
    }

    pub fn is_bad_prime(&self, p: u64) -> bool {
        self.bad_primes.contains(&p)
    }

    pub fn hard_prime_to_conjugacy_class_index(&self, p: u64) -> Result<ConjugacyClassIndex> {
        let position = self.hard_primes.iter().position(|q| *q == p).ok_or(EngineError::NotHardPrime { prime: p })?;
        return self.hard_factors.get(position).copied().ok_or_else(|| EngineError::MalformedRecord(
            format!("hard prime {} has no entry in HardFactors", p)
        ));
    }

    ///
    /// Returns the index of the conjugacy class of Frobenius at `p`, taken from the table of
    /// hard primes if `p` is hard, and computed by `nf` otherwise.
    ///
    pub fn any_prime_to_conjugacy_class_index(&self, nf: &NumberFieldGaloisGroup, p: u64) -> Result<ConjugacyClassIndex> {
        if self.is_hard_prime(p) {
            self.hard_prime_to_conjugacy_class_index(p)
        } else {
            nf.from_prime_to_conjugacy_class_index(p)
        }
    }

    fn process_local_factors(&self) -> Vec<Vec<Complex64El>> {
        let CC = Complex64::RING;
        let N = self.character_field.max(1) as i64;
        let to_complex = |coefficient: &Vec<IntegerCoefficient>| CC.sum(
            coefficient.iter().enumerate().map(|(i, a)| CC.mul(CC.from_f64(a.to_f64_approx()), CC.root_of_unity(i as i64, N)))
        );
        self.local_factors.iter().map(|factor| {
            let mut result = factor.iter().map(&to_complex).collect::<Vec<_>>();
            // trailing coefficients that vanish identically do not count for the degree
            let degree = factor.iter().rposition(|coefficient| coefficient.iter().any(|a| !a.is_zero()));
            result.truncate(degree.map(|d| d + 1).unwrap_or(0));
            return result;
        }).collect()
    }

    ///
    /// Returns the local factor `det(1 - rho(g) T)` for `g` in the conjugacy class of the given
    /// (1-based) index, as coefficient list, constant coefficient first, without trailing zeros.
    ///
    pub fn from_conjugacy_class_index_to_polynomial(&self, index: ConjugacyClassIndex) -> Result<&[Complex64El]> {
        let table = self.processed_local_factors.get_or_init(|| self.process_local_factors());
        let position = (index.get() as usize).checked_sub(1);
        return position.and_then(|i| table.get(i)).map(|factor| &factor[..]).ok_or(EngineError::ConjugacyClassOutOfRange {
            index: index,
            class_count: table.len()
        });
    }

    pub fn hard_factor(&self, p: u64) -> Result<&[Complex64El]> {
        self.from_conjugacy_class_index_to_polynomial(self.hard_prime_to_conjugacy_class_index(p)?)
    }

    pub fn good_factor(&self, nf: &NumberFieldGaloisGroup, p: u64) -> Result<&[Complex64El]> {
        if self.is_hard_prime(p) {
            return Err(EngineError::HardPrime { prime: p });
        }
        self.from_conjugacy_class_index_to_polynomial(nf.from_prime_to_conjugacy_class_index(p)?)
    }

    ///
    /// Returns the Euler factor of the Artin L-function at `p`.
    ///
    pub fn local_factor(&self, nf: &NumberFieldGaloisGroup, p: u64) -> Result<&[Complex64El]> {
        if self.is_hard_prime(p) {
            self.hard_factor(p)
        } else {
            self.good_factor(nf, p)
        }
    }

    ///
    /// Returns the coefficient of `T^dim` in the local factor at `p`. This is `(-1)^dim` times
    /// the determinant of Frobenius, and zero if the inertia invariants are a proper subspace.
    ///
    pub fn central_character(&self, nf: &NumberFieldGaloisGroup, p: u64) -> Result<Complex64El> {
        let factor = self.local_factor(nf, p)?;
        if factor.len() <= self.dimension {
            return Ok(Complex64::RING.zero());
        }
        return Ok(factor[self.dimension]);
    }

    ///
    /// Computes the Dirichlet coefficients `a_1, ..., a_B` of the Artin L-function, where
    /// `B = upper_bound`. At index `i` of the result is `a_(i + 1)`.
    ///
    /// Every prime `p <= B` must be a good or hard prime, otherwise the error of the local
    /// factor computation is returned.
    ///
    #[instrument(skip_all, level = "trace", fields(upper_bound = upper_bound))]
    pub fn coefficients_list(&self, nf: &NumberFieldGaloisGroup, upper_bound: u64) -> Result<Vec<Complex64El>> {
        let CC = Complex64::RING;
        let mut result = (0..upper_bound).map(|_| CC.one()).collect::<Vec<_>>();
        for p in erathostenes(upper_bound + 1) {
            let factor = self.local_factor(nf, p)?;
            let mut max_power = 0;
            let mut prime_power = 1;
            while prime_power <= upper_bound / p {
                prime_power *= p;
                max_power += 1;
            }
            let series = inverse_power_series(factor, max_power).ok_or_else(|| EngineError::MalformedRecord(
                format!("local factor at {} has vanishing constant coefficient", p)
            ))?;
            tracing::trace!(p = p, max_power = max_power, "euler factor");
            let mut prime_power = 1;
            for k in 1..=max_power {
                prime_power *= p;
                for m in (1..=(upper_bound / prime_power)).filter(|m| m % p != 0) {
                    let n = (m * prime_power) as usize;
                    CC.mul_assign_ref(&mut result[n - 1], &series[k]);
                }
            }
        }
        return Ok(result);
    }
}

///
/// Computes the first `len + 1` coefficients of `1 / f` as power series, or `None` if the
/// constant coefficient of `f` is zero.
///
fn inverse_power_series(f: &[Complex64El], len: usize) -> Option<Vec<Complex64El>> {
    let CC = Complex64::RING;
    let c0 = *f.first()?;
    if CC.is_zero(&c0) {
        return None;
    }
    let mut result: Vec<Complex64El> = Vec::with_capacity(len + 1);
    result.push(CC.div(CC.one(), c0));
    for k in 1..=len {
        let sum = CC.sum((1..=k.min(f.len() - 1)).map(|i| CC.mul(f[i], result[k - i])));
        result.push(CC.negate(CC.div(sum, c0)));
    }
    return Some(result);
}

#[cfg(test)]
use crate::integer::int_coefficients;
#[cfg(test)]
use crate::artin::records::{FrobeniusResolventRecord, RecordClasses};
#[cfg(test)]
use crate::permutation::CycleType;

#[cfg(test)]
fn x3_minus_2() -> NumberFieldGaloisGroup {
    let cyc = |cycle_type: Vec<u32>, class: u32| FrobeniusResolventRecord {
        algorithm: "CYC".to_owned(),
        cycle_type: CycleType::new(cycle_type),
        data: None,
        classes: RecordClasses::Single(ConjugacyClassIndex::new(class))
    };
    NumberFieldGaloisGroup::new(int_coefficients([-2, 0, 0, 1]), vec![cyc(vec![1, 1, 1], 1), cyc(vec![1, 2], 2), cyc(vec![3], 3)])
}

#[cfg(test)]
fn two_dimensional_s3() -> ArtinRepresentation {
    // the 2-dimensional irreducible representation of S_3 = Gal(Q(2^(1/3), zeta_3)/Q);
    // the classes are identity, transpositions, 3-cycles, and the trivial factor at 2 and 3
    serde_json::from_str(r#"{
        "Dim": 2,
        "HardPrimes": [2, "3"],
        "HardFactors": [4, 4],
        "BadPrimes": [2, 3],
        "CharacterField": 1,
        "LocalFactors": [
            [[1], [-2], [1]],
            [[1], [0], [-1]],
            [[1], [1], [1]],
            [[1], [0], [0]]
        ]
    }"#).unwrap()
}

#[cfg(test)]
fn assert_approx_eq(expected: i64, actual: Complex64El) {
    let CC = Complex64::RING;
    assert!(CC.is_absolute_approx_eq(CC.from_int(expected), actual, 1e-9), "expected {}, got {}", expected, CC.format(&actual));
}

#[test]
fn test_hard_primes() {
    let rep = two_dimensional_s3();
    assert_eq!(&[2, 3], rep.hard_primes());
    assert!(rep.is_hard_prime(3));
    assert!(!rep.is_hard_prime(5));
    assert!(rep.is_bad_prime(2));
    assert_eq!(ConjugacyClassIndex::new(4), rep.hard_prime_to_conjugacy_class_index(2).unwrap());
    assert_eq!(Err(EngineError::NotHardPrime { prime: 5 }), rep.hard_prime_to_conjugacy_class_index(5));
}

#[test]
fn test_any_prime_to_conjugacy_class_index() {
    let rep = two_dimensional_s3();
    let nf = x3_minus_2();
    assert_eq!(ConjugacyClassIndex::new(4), rep.any_prime_to_conjugacy_class_index(&nf, 3).unwrap());
    assert_eq!(ConjugacyClassIndex::new(2), rep.any_prime_to_conjugacy_class_index(&nf, 5).unwrap());
    assert_eq!(ConjugacyClassIndex::new(3), rep.any_prime_to_conjugacy_class_index(&nf, 7).unwrap());
}

#[test]
fn test_from_conjugacy_class_index_to_polynomial() {
    let rep = two_dimensional_s3();
    let factor = rep.from_conjugacy_class_index_to_polynomial(ConjugacyClassIndex::new(2)).unwrap();
    assert_eq!(3, factor.len());
    assert_approx_eq(1, factor[0]);
    assert_approx_eq(0, factor[1]);
    assert_approx_eq(-1, factor[2]);
    assert_eq!(1, rep.from_conjugacy_class_index_to_polynomial(ConjugacyClassIndex::new(4)).unwrap().len());
    assert_eq!(
        Err(EngineError::ConjugacyClassOutOfRange { index: ConjugacyClassIndex::new(5), class_count: 4 }),
        rep.from_conjugacy_class_index_to_polynomial(ConjugacyClassIndex::new(5))
    );
    assert!(rep.from_conjugacy_class_index_to_polynomial(ConjugacyClassIndex::new(0)).is_err());
}

#[test]
fn test_cyclotomic_coefficients() {
    let rep: ArtinRepresentation = serde_json::from_str(r#"{
        "Dim": 1, "HardPrimes": [], "HardFactors": [], "BadPrimes": [3], "CharacterField": 3,
        "LocalFactors": [[[1], [-1]], [[1], [0, -1]], [[1], [1, 1]]]
    }"#).unwrap();
    let CC = Complex64::RING;
    let zeta = CC.root_of_unity(1, 3);
    let factor = rep.from_conjugacy_class_index_to_polynomial(ConjugacyClassIndex::new(2)).unwrap();
    assert!(CC.is_absolute_approx_eq(CC.negate(zeta), factor[1], 1e-9));
    // 1 + zeta_3 = -zeta_3^2
    let factor = rep.from_conjugacy_class_index_to_polynomial(ConjugacyClassIndex::new(3)).unwrap();
    assert!(CC.is_absolute_approx_eq(CC.negate(CC.square(&zeta)), factor[1], 1e-9));
}

#[test]
fn test_local_factor() {
    let rep = two_dimensional_s3();
    let nf = x3_minus_2();
    let factor = rep.local_factor(&nf, 7).unwrap();
    assert_approx_eq(1, factor[1]);
    assert_eq!(1, rep.local_factor(&nf, 2).unwrap().len());
    assert_eq!(Err(EngineError::HardPrime { prime: 2 }), rep.good_factor(&nf, 2).map(|_| ()));
    assert_eq!(Err(EngineError::NotHardPrime { prime: 7 }), rep.hard_factor(7).map(|_| ()));
}

#[test]
fn test_central_character() {
    let rep = two_dimensional_s3();
    let nf = x3_minus_2();
    // the determinant of the 2-dimensional representation is the sign character
    assert_approx_eq(-1, rep.central_character(&nf, 5).unwrap());
    assert_approx_eq(1, rep.central_character(&nf, 7).unwrap());
    assert_approx_eq(1, rep.central_character(&nf, 31).unwrap());
    assert_approx_eq(0, rep.central_character(&nf, 2).unwrap());
}

#[test]
fn test_coefficients_list() {
    // the L-function is the one of the weight 1 newform of level 108
    let rep = two_dimensional_s3();
    let nf = x3_minus_2();
    let coefficients = rep.coefficients_list(&nf, 50).unwrap();
    assert_eq!(50, coefficients.len());
    let a = |n: usize| coefficients[n - 1];
    assert_approx_eq(1, a(1));
    for n in [2, 3, 4, 5, 6, 8, 9, 11, 35, 49] {
        assert_approx_eq(0, a(n));
    }
    assert_approx_eq(-1, a(7));
    assert_approx_eq(-1, a(13));
    assert_approx_eq(-1, a(19));
    assert_approx_eq(1, a(25));
    assert_approx_eq(2, a(31));
    assert_approx_eq(-1, a(37));
    assert_approx_eq(2, a(43));
    assert!(rep.coefficients_list(&nf, 0).unwrap().is_empty());
}

#[test]
fn test_coefficients_list_propagates_errors() {
    let rep: ArtinRepresentation = serde_json::from_str(r#"{
        "Dim": 1, "HardPrimes": [], "HardFactors": [], "BadPrimes": [], "CharacterField": 1,
        "LocalFactors": [[[1], [-1]], [[1], [1]], [[1], [1]]]
    }"#).unwrap();
    let nf = x3_minus_2();
    assert_eq!(Err(EngineError::BadPrime { prime: 2 }), rep.coefficients_list(&nf, 10).map(|_| ()));
}

#[test]
fn test_inverse_power_series() {
    let CC = Complex64::RING;
    let f = [CC.one(), CC.one(), CC.one()];
    let inverse = inverse_power_series(&f, 4).unwrap();
    for (expected, actual) in [1, -1, 0, 1, -1].into_iter().zip(inverse) {
        assert_approx_eq(expected, actual);
    }
    assert!(inverse_power_series(&[], 2).is_none());
}
