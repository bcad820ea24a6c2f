use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Deserialize;
use tracing::instrument;

use crate::algorithms::cantor_zassenhaus::{factor_degrees, is_squarefree};
use crate::algorithms::dedekind::divides_index;
use crate::algorithms::miller_rabin::is_prime;
use crate::artin::engine::{from_cycle_type_to_conjugacy_class_index_dict, DispatchTable};
use crate::artin::records::{ConjugacyClassIndex, FrobeniusResolventRecord};
use crate::error::{EngineError, Result};
use crate::integer::IntegerCoefficient;
use crate::permutation::CycleType;
use crate::rings::poly::DensePolyRing;
use crate::rings::zn::Zn;

///
/// The Galois group of (the Galois closure of) a number field `Q[x]/(f)`, together with
/// the data that allows identifying the conjugacy class of Frobenius at good primes.
///
/// The [`DispatchTable`] is built lazily, on first use, and then reused for all primes.
/// It is built at most once, even if multiple threads use the same object concurrently.
///
/// # Example
/// ```
/// # use artin_frobenius::artin::galois_group::*;
/// # use artin_frobenius::artin::records::*;
/// # use artin_frobenius::permutation::*;
/// let nf: NumberFieldGaloisGroup = serde_json::from_str(r#"{
///     "Polynomial": ["-2", "0", "0", "1"],
///     "FrobResolvents": [
///         {"Algorithm": "CYC", "CycleType": [1, 1, 1], "Classes": 1},
///         {"Algorithm": "CYC", "CycleType": [1, 2], "Classes": 2},
///         {"Algorithm": "CYC", "CycleType": [3], "Classes": 3}
///     ]
/// }"#).unwrap();
/// assert_eq!(CycleType::new(vec![1, 2]), nf.frobenius_cycle_type(5).unwrap());
/// assert_eq!(ConjugacyClassIndex::new(3), nf.from_prime_to_conjugacy_class_index(7).unwrap());
/// assert!(nf.from_prime_to_conjugacy_class_index(3).is_err());
/// ```
///
#[derive(Debug, Deserialize)]
#[serde(try_from = "NumberFieldRecord")]
pub struct NumberFieldGaloisGroup {
    polynomial: Vec<IntegerCoefficient>,
    frobenius_resolvents: Vec<FrobeniusResolventRecord>,
    dispatch_table: OnceLock<DispatchTable>,
    construction_lock: Mutex<()>,
    /// number of times the dispatch table was successfully built
    dispatch_table_builds: AtomicUsize
}

///
/// A number field record as stored in the database, before checking that its
/// defining polynomial has positive degree.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NumberFieldRecord {
    #[serde(rename = "Polynomial")]
    pub polynomial: Vec<IntegerCoefficient>,
    #[serde(rename = "FrobResolvents")]
    pub frobenius_resolvents: Vec<FrobeniusResolventRecord>
}

impl TryFrom<NumberFieldRecord> for NumberFieldGaloisGroup {

    type Error = EngineError;

    fn try_from(record: NumberFieldRecord) -> Result<Self> {
        if record.polynomial.len() < 2 || record.polynomial.last().map_or(true, IntegerCoefficient::is_zero) {
            return Err(EngineError::MalformedRecord(format!("defining polynomial {:?} must have positive degree and nonzero leading coefficient", record.polynomial)));
        }
        return Ok(NumberFieldGaloisGroup::new(record.polynomial, record.frobenius_resolvents));
    }
}

impl NumberFieldGaloisGroup {

    pub fn new(polynomial: Vec<IntegerCoefficient>, frobenius_resolvents: Vec<FrobeniusResolventRecord>) -> Self {
        assert!(polynomial.len() >= 2, "defining polynomial must have positive degree");
        assert!(!polynomial[polynomial.len() - 1].is_zero(), "leading coefficient must be nonzero");
        NumberFieldGaloisGroup {
            polynomial: polynomial,
            frobenius_resolvents: frobenius_resolvents,
            dispatch_table: OnceLock::new(),
            construction_lock: Mutex::new(()),
            dispatch_table_builds: AtomicUsize::new(0)
        }
    }

    pub fn degree(&self) -> usize {
        self.polynomial.len() - 1
    }

    pub fn polynomial(&self) -> &[IntegerCoefficient] {
        &self.polynomial
    }

    pub fn frobenius_resolvents(&self) -> &[FrobeniusResolventRecord] {
        &self.frobenius_resolvents
    }

    ///
    /// Returns the table mapping cycle types to the functions identifying the class of
    /// Frobenius. If it has not been built yet, this builds it; errors are returned and
    /// not memoized, so a later call tries again.
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn dispatch_table(&self) -> Result<&DispatchTable> {
        if let Some(table) = self.dispatch_table.get() {
            return Ok(table);
        }
        let _guard = self.construction_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = self.dispatch_table.get() {
            return Ok(table);
        }
        let table = from_cycle_type_to_conjugacy_class_index_dict(&self.polynomial, &self.frobenius_resolvents)?;
        _ = self.dispatch_table_builds.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(cycle_types = table.len(), "built dispatch table");
        return Ok(self.dispatch_table.get_or_init(|| table));
    }

    ///
    /// Returns how often [`NumberFieldGaloisGroup::dispatch_table()`] has built the table,
    /// which is at most once.
    ///
    pub fn dispatch_table_builds(&self) -> usize {
        self.dispatch_table_builds.load(Ordering::SeqCst)
    }

    fn reduce_polynomial(&self, p: u64) -> Result<(DensePolyRing<Zn>, Vec<u64>)> {
        if !is_prime(p) {
            return Err(EngineError::NotPrime { value: p });
        }
        let poly_ring = DensePolyRing::new(Zn::new(p));
        let f = poly_ring.from_coefficients(self.polynomial.iter().map(|c| poly_ring.base_ring().coerce_integer(c)).collect());
        return Ok((poly_ring, f));
    }

    ///
    /// Reduces the defining polynomial modulo `p`, and checks that the reduction has the
    /// same degree and is squarefree.
    ///
    /// If it is not squarefree, Dedekind's criterion tells whether this is because `p`
    /// is ramified, giving [`EngineError::BadPrime`], or whether `p` divides the index
    /// of `Z[x]/(f)` in the maximal order, giving [`EngineError::IndexDivisor`]. In the
    /// latter case, `p` might be unramified, but the reduction of `f` does not determine
    /// its Frobenius.
    ///
    fn reduce_good_prime(&self, p: u64) -> Result<(DensePolyRing<Zn>, Vec<u64>)> {
        let (poly_ring, f) = self.reduce_polynomial(p)?;
        if poly_ring.degree(&f) != Some(self.degree()) {
            return Err(EngineError::BadPrime { prime: p });
        }
        if !is_squarefree(&poly_ring, &f) {
            return match divides_index(&self.polynomial, p) {
                Some(false) => Err(EngineError::BadPrime { prime: p }),
                Some(true) | None => Err(EngineError::IndexDivisor { prime: p })
            };
        }
        return Ok((poly_ring, f));
    }

    ///
    /// Returns whether `p` is a prime that does not divide the leading coefficient or the
    /// discriminant of the defining polynomial.
    ///
    /// All but finitely many primes are good. Primes dividing the index of `Z[x]/(f)` are
    /// not good, even though they might be unramified in the number field, since the
    /// factorization of `f` modulo them does not describe their splitting.
    ///
    pub fn is_good_prime(&self, p: u64) -> bool {
        self.reduce_good_prime(p).is_ok()
    }

    ///
    /// Returns the residue field degrees of the primes above `p`, i.e. the degrees of the
    /// irreducible factors of the defining polynomial modulo `p`, in increasing order.
    ///
    /// Fails with [`EngineError::BadPrime`] if `p` divides the leading coefficient or is
    /// ramified, and with [`EngineError::IndexDivisor`] if `p` divides the index of
    /// `Z[x]/(f)` and `f` is not squarefree modulo `p`.
    ///
    pub fn residue_field_degrees(&self, p: u64) -> Result<Vec<u32>> {
        let (poly_ring, f) = self.reduce_good_prime(p)?;
        return Ok(factor_degrees(&poly_ring, f).into_iter().map(|d| d as u32).collect());
    }

    ///
    /// Returns the cycle type of Frobenius at `p`, as a permutation of the roots of the
    /// defining polynomial.
    ///
    pub fn frobenius_cycle_type(&self, p: u64) -> Result<CycleType> {
        Ok(CycleType::new(self.residue_field_degrees(p)?))
    }

    pub fn from_cycle_type_to_conjugacy_class_index(&self, cycle_type: &CycleType, p: u64) -> Result<ConjugacyClassIndex> {
        self.dispatch_table()?.conjugacy_class_index(cycle_type, p)
    }

    ///
    /// Returns the index of the conjugacy class of Frobenius at `p`.
    ///
    /// `p` must be a good prime, and must not be a hard prime of the Artin representation
    /// this is used for, since for those, the techniques are not guaranteed to work.
    ///
    pub fn from_prime_to_conjugacy_class_index(&self, p: u64) -> Result<ConjugacyClassIndex> {
        let cycle_type = self.frobenius_cycle_type(p)?;
        return self.from_cycle_type_to_conjugacy_class_index(&cycle_type, p);
    }

    ///
    /// Computes [`NumberFieldGaloisGroup::from_prime_to_conjugacy_class_index()`] for
    /// each of the given primes. With the feature `parallel`, this happens concurrently.
    ///
    pub fn conjugacy_class_indices(&self, primes: &[u64]) -> Vec<Result<ConjugacyClassIndex>> {
        #[cfg(feature = "parallel")]
        let result = primes.par_iter().map(|p| self.from_prime_to_conjugacy_class_index(*p)).collect();
        #[cfg(not(feature = "parallel"))]
        let result = primes.iter().map(|p| self.from_prime_to_conjugacy_class_index(*p)).collect();
        return result;
    }
}

#[cfg(test)]
use crate::integer::int_coefficients;
#[cfg(test)]
use crate::artin::records::RecordClasses;

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

#[test]
fn test_residue_field_degrees() {
    let nf = x3_minus_2();
    assert_eq!(3, nf.degree());
    assert_eq!(vec![1, 2], nf.residue_field_degrees(5).unwrap());
    assert_eq!(vec![3], nf.residue_field_degrees(7).unwrap());
    assert_eq!(vec![1, 1, 1], nf.residue_field_degrees(31).unwrap());
    assert_eq!(Err(EngineError::BadPrime { prime: 2 }), nf.residue_field_degrees(2));
    assert_eq!(Err(EngineError::BadPrime { prime: 3 }), nf.residue_field_degrees(3));
    assert_eq!(Err(EngineError::NotPrime { value: 9 }), nf.residue_field_degrees(9));
    assert!(!nf.is_good_prime(3));
    assert!(!nf.is_good_prime(1));
    assert!(nf.is_good_prime(101));
}

#[test]
fn test_prime_above_2_pow_63() {
    // p = 1 mod 3 and 2 is a cube modulo p
    let p = 9223372036854775837;
    let nf = x3_minus_2();
    assert!(nf.is_good_prime(p));
    assert_eq!(vec![1, 1, 1], nf.residue_field_degrees(p).unwrap());
    assert_eq!(ConjugacyClassIndex::new(1), nf.from_prime_to_conjugacy_class_index(p).unwrap());
    // p = 2 mod 3
    let p = 9223372036854776063;
    assert_eq!(vec![1, 2], nf.residue_field_degrees(p).unwrap());
    assert_eq!(ConjugacyClassIndex::new(2), nf.from_prime_to_conjugacy_class_index(p).unwrap());
}

#[test]
fn test_index_divisor() {
    // 2 splits completely in the field, but X^3 - X^2 - 2X - 8 = X^2 (X + 1) mod 2
    let nf = NumberFieldGaloisGroup::new(int_coefficients([-8, -2, -1, 1]), Vec::new());
    assert!(!nf.is_good_prime(2));
    assert_eq!(Err(EngineError::IndexDivisor { prime: 2 }), nf.residue_field_degrees(2));
    assert_eq!(Err(EngineError::BadPrime { prime: 503 }), nf.residue_field_degrees(503));
    assert_eq!(vec![3], nf.residue_field_degrees(3).unwrap());

    // 2 is unramified in Q(sqrt(-3))
    let nf = NumberFieldGaloisGroup::new(int_coefficients([3, 0, 1]), Vec::new());
    assert_eq!(Err(EngineError::IndexDivisor { prime: 2 }), nf.frobenius_cycle_type(2));
    assert_eq!(Err(EngineError::BadPrime { prime: 3 }), nf.frobenius_cycle_type(3));
}

#[test]
fn test_leading_coefficient_vanishes() {
    let nf = NumberFieldGaloisGroup::new(int_coefficients([1, 0, 5]), Vec::new());
    assert!(!nf.is_good_prime(5));
    assert_eq!(Err(EngineError::BadPrime { prime: 5 }), nf.frobenius_cycle_type(5));
    assert_eq!(CycleType::new(vec![1, 1]), nf.frobenius_cycle_type(29).unwrap());
}

#[test]
fn test_from_prime_to_conjugacy_class_index() {
    let nf = x3_minus_2();
    for p in [5, 11, 17, 23, 29] {
        assert_eq!(ConjugacyClassIndex::new(2), nf.from_prime_to_conjugacy_class_index(p).unwrap());
    }
    // 2 is a cube modulo 31, 43, but not modulo 7, 13
    assert_eq!(ConjugacyClassIndex::new(1), nf.from_prime_to_conjugacy_class_index(31).unwrap());
    assert_eq!(ConjugacyClassIndex::new(1), nf.from_prime_to_conjugacy_class_index(43).unwrap());
    assert_eq!(ConjugacyClassIndex::new(3), nf.from_prime_to_conjugacy_class_index(7).unwrap());
    assert_eq!(ConjugacyClassIndex::new(3), nf.from_prime_to_conjugacy_class_index(13).unwrap());
}

#[test]
fn test_dispatch_table_memoized() {
    let nf = x3_minus_2();
    assert_eq!(0, nf.dispatch_table_builds());
    let first = nf.dispatch_table().unwrap() as *const DispatchTable;
    let second = nf.dispatch_table().unwrap() as *const DispatchTable;
    assert_eq!(first, second);
    _ = nf.from_prime_to_conjugacy_class_index(7).unwrap();
    assert_eq!(1, nf.dispatch_table_builds());
}

#[test]
fn test_dispatch_table_error_not_memoized() {
    let record = FrobeniusResolventRecord {
        algorithm: "ABC".to_owned(),
        cycle_type: CycleType::new(vec![3]),
        data: None,
        classes: RecordClasses::Single(ConjugacyClassIndex::new(1))
    };
    let nf = NumberFieldGaloisGroup::new(int_coefficients([-2, 0, 0, 1]), vec![record]);
    assert_eq!(Some(EngineError::UnknownAlgorithm("ABC".to_owned())), nf.dispatch_table().err());
    assert_eq!(Some(EngineError::UnknownAlgorithm("ABC".to_owned())), nf.from_prime_to_conjugacy_class_index(7).err());
    assert_eq!(0, nf.dispatch_table_builds());
}

#[test]
fn test_deserialize_rejects_constant_polynomial() {
    for polynomial in [r#"[]"#, r#"["1"]"#, r#"["1", "0"]"#] {
        let json = format!(r#"{{"Polynomial": {}, "FrobResolvents": []}}"#, polynomial);
        assert!(serde_json::from_str::<NumberFieldGaloisGroup>(&json).is_err(), "accepted {}", polynomial);
    }
    let record: NumberFieldRecord = serde_json::from_str(r#"{"Polynomial": [], "FrobResolvents": []}"#).unwrap();
    assert!(matches!(NumberFieldGaloisGroup::try_from(record), Err(EngineError::MalformedRecord(_))));
    let nf: NumberFieldGaloisGroup = serde_json::from_str(r#"{"Polynomial": ["1", "1"], "FrobResolvents": []}"#).unwrap();
    assert_eq!(1, nf.degree());
}
