use std::collections::HashMap;

use tracing::instrument;

use crate::artin::alt::AltInvariant;
use crate::artin::matcher::PolynomialMatcher;
use crate::artin::records::{ConjugacyClassIndex, FrobeniusResolvent, FrobeniusResolventRecord};
use crate::artin::res::ResInvariant;
use crate::artin::roots::RootResolver;
use crate::error::{EngineError, Result};
use crate::integer::IntegerCoefficient;
use crate::permutation::CycleType;

///
/// A function `p -> conjugacy class index of Frobenius at p`, valid for all good, non-hard
/// primes `p` whose Frobenius has a fixed cycle type.
///
/// Implementors only capture immutable data, so they can be called concurrently for
/// different primes.
///
pub trait ConjugacyClassFn: std::fmt::Debug + Send + Sync {

    fn conjugacy_class_index(&self, p: u64) -> Result<ConjugacyClassIndex>;
}

///
/// The CYC technique: the cycle type determines the class, so the prime is ignored.
///
#[derive(Clone, Debug)]
pub struct CycClassifier {
    class: ConjugacyClassIndex
}

impl ConjugacyClassFn for CycClassifier {

    fn conjugacy_class_index(&self, _p: u64) -> Result<ConjugacyClassIndex> {
        Ok(self.class)
    }
}

///
/// The ALT technique: the class is determined by the unique polynomial of the table
/// that vanishes on the [`AltInvariant`].
///
#[derive(Clone, Debug)]
pub struct AltClassifier {
    roots: RootResolver,
    invariant: AltInvariant,
    matcher: PolynomialMatcher
}

impl ConjugacyClassFn for AltClassifier {

    fn conjugacy_class_index(&self, p: u64) -> Result<ConjugacyClassIndex> {
        let (field, roots) = self.roots.roots(p)?;
        let alpha = self.invariant.alpha(&field, &roots)?;
        return self.matcher.match_alpha(&field, &alpha);
    }
}

///
/// The RES technique: the class is determined by the unique polynomial of the table
/// that vanishes on the [`ResInvariant`].
///
#[derive(Clone, Debug)]
pub struct ResClassifier {
    roots: RootResolver,
    invariant: ResInvariant,
    matcher: PolynomialMatcher
}

impl ConjugacyClassFn for ResClassifier {

    fn conjugacy_class_index(&self, p: u64) -> Result<ConjugacyClassIndex> {
        let (field, roots) = self.roots.roots(p)?;
        let alpha = self.invariant.alpha(&field, &roots);
        return self.matcher.match_alpha(&field, &alpha);
    }
}

///
/// Creates the function `p -> conjugacy class index` for a single technique.
///
pub fn conjugacy_class_fn(technique: FrobeniusResolvent, defining_polynomial: &[IntegerCoefficient]) -> Result<Box<dyn ConjugacyClassFn>> {
    match technique {
        FrobeniusResolvent::Cyc { class, .. } => Ok(Box::new(CycClassifier { class: class })),
        FrobeniusResolvent::Alt { cycle_type, data, classes } => Ok(Box::new(AltClassifier {
            roots: RootResolver::new(&cycle_type, defining_polynomial.to_vec()),
            invariant: AltInvariant::new(&data)?,
            matcher: PolynomialMatcher::new(classes)
        })),
        FrobeniusResolvent::Res { cycle_type, data, classes } => Ok(Box::new(ResClassifier {
            roots: RootResolver::new(&cycle_type, defining_polynomial.to_vec()),
            invariant: ResInvariant::new(data),
            matcher: PolynomialMatcher::new(classes)
        }))
    }
}

///
/// For a single number field, maps each cycle type of Frobenius to the function that
/// determines the conjugacy class of Frobenius for primes of this cycle type.
///
/// This is built once per number field, and then reused for all primes.
///
#[derive(Debug)]
pub struct DispatchTable {
    functions: HashMap<CycleType, Box<dyn ConjugacyClassFn>>
}

impl DispatchTable {

    ///
    /// Builds the table from typed techniques. If two techniques have the same cycle type,
    /// the later one wins.
    ///
    pub fn build<I>(defining_polynomial: &[IntegerCoefficient], techniques: I) -> Result<Self>
        where I: IntoIterator<Item = FrobeniusResolvent>
    {
        let mut functions = HashMap::new();
        for technique in techniques {
            let cycle_type = technique.cycle_type().clone();
            tracing::trace!(algorithm = technique.algorithm(), cycle_type = %cycle_type, "adding technique");
            if functions.insert(cycle_type.clone(), conjugacy_class_fn(technique, defining_polynomial)?).is_some() {
                tracing::warn!(cycle_type = %cycle_type, "several techniques for the same cycle type");
            }
        }
        return Ok(DispatchTable { functions: functions });
    }

    pub fn get(&self, cycle_type: &CycleType) -> Option<&dyn ConjugacyClassFn> {
        self.functions.get(cycle_type).map(|f| &**f)
    }

    ///
    /// Returns all cycle types in the table, in increasing order.
    ///
    pub fn cycle_types(&self) -> Vec<CycleType> {
        let mut result = self.functions.keys().cloned().collect::<Vec<_>>();
        result.sort();
        return result;
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    ///
    /// Returns the conjugacy class index of the Frobenius at `p`, which is assumed
    /// to have the given cycle type.
    ///
    pub fn conjugacy_class_index(&self, cycle_type: &CycleType, p: u64) -> Result<ConjugacyClassIndex> {
        let function = self.get(cycle_type).ok_or_else(|| EngineError::MissingCycleType {
            cycle_type: cycle_type.clone(),
            known: self.cycle_types()
        })?;
        let result = function.conjugacy_class_index(p)?;
        tracing::trace!(p = p, cycle_type = %cycle_type, class = result.get(), "identified frobenius");
        return Ok(result);
    }
}

///
/// Builds the dispatch table of a number field from its defining polynomial (integer
/// coefficients, constant coefficient first) and its Frobenius resolvent records as stored.
///
/// Fails if a record has an unknown algorithm, does not fit its algorithm, or the
/// reference permutation of an ALT record is not in the alternating group.
///
#[instrument(skip_all, level = "trace")]
pub fn from_cycle_type_to_conjugacy_class_index_dict(defining_polynomial: &[IntegerCoefficient], frobenius_resolvents: &[FrobeniusResolventRecord]) -> Result<DispatchTable> {
    let techniques = frobenius_resolvents.iter()
        .cloned()
        .map(FrobeniusResolvent::try_from)
        .collect::<Result<Vec<_>>>()?;
    return DispatchTable::build(defining_polynomial, techniques);
}

#[cfg(test)]
use crate::integer::int_coefficients;
#[cfg(test)]
use crate::artin::records::{RecordClasses, RootOfEntry};

#[cfg(test)]
fn cyc_record(cycle_type: Vec<u32>, class: u32) -> FrobeniusResolventRecord {
    FrobeniusResolventRecord {
        algorithm: "CYC".to_owned(),
        cycle_type: CycleType::new(cycle_type),
        data: None,
        classes: RecordClasses::Single(ConjugacyClassIndex::new(class))
    }
}

#[test]
fn test_cyc_ignores_prime() {
    let table = from_cycle_type_to_conjugacy_class_index_dict(&int_coefficients([-2, 0, 0, 1]), &[cyc_record(vec![1, 2], 2)]).unwrap();
    let cycle_type = CycleType::new(vec![1, 2]);
    for p in [0, 1, 2, 4, 5, 1 << 40] {
        assert_eq!(ConjugacyClassIndex::new(2), table.conjugacy_class_index(&cycle_type, p).unwrap());
    }
}

#[test]
fn test_cyc_x3_minus_2() {
    // the splitting field of x^3 - 2 has Galois group S_3; we number the classes
    // 1 = identity, 2 = transpositions, 3 = 3-cycles
    let poly = int_coefficients([-2, 0, 0, 1]);
    let table = from_cycle_type_to_conjugacy_class_index_dict(&poly, &[
        cyc_record(vec![1, 1, 1], 1),
        cyc_record(vec![1, 2], 2),
        cyc_record(vec![3], 3)
    ]).unwrap();
    assert_eq!(3, table.len());
    for (p, cycle_type, expected) in [(5, vec![1, 2], 2), (7, vec![3], 3), (31, vec![1, 1, 1], 1), (43, vec![1, 1, 1], 1), (13, vec![3], 3)] {
        assert_eq!(ConjugacyClassIndex::new(expected), table.conjugacy_class_index(&CycleType::new(cycle_type), p).unwrap());
    }
}

#[test]
fn test_unknown_algorithm() {
    let mut record = cyc_record(vec![3], 1);
    record.algorithm = "XYZ".to_owned();
    let error = from_cycle_type_to_conjugacy_class_index_dict(&int_coefficients([-2, 0, 0, 1]), &[record]).unwrap_err();
    assert_eq!(EngineError::UnknownAlgorithm("XYZ".to_owned()), error);
    assert!(format!("{}", error).contains("CYC, RES and ALT"));
}

#[test]
fn test_missing_cycle_type() {
    let table = from_cycle_type_to_conjugacy_class_index_dict(&int_coefficients([-2, 0, 0, 1]), &[cyc_record(vec![3], 3), cyc_record(vec![1, 2], 2)]).unwrap();
    assert_eq!(
        Err(EngineError::MissingCycleType { cycle_type: CycleType::new(vec![2, 1]), known: vec![CycleType::new(vec![1, 2]), CycleType::new(vec![3])] }),
        table.conjugacy_class_index(&CycleType::new(vec![2, 1]), 5)
    );
}

#[test]
fn test_res_cyclic_cubic() {
    // x^3 - 3x + 1, cyclic of order 3; the two generators of the Galois group are
    // distinguished by gamma = x^2, Powers = [1]
    let poly = int_coefficients([1, -3, 0, 1]);
    let table = DispatchTable::build(&poly, [
        FrobeniusResolvent::Cyc { cycle_type: CycleType::new(vec![1, 1, 1]), class: ConjugacyClassIndex::new(1) },
        FrobeniusResolvent::Res {
            cycle_type: CycleType::new(vec![3]),
            data: crate::artin::records::ResolventData { powers: vec![1], resolvent: int_coefficients([0, 0, 1]) },
            classes: vec![
                RootOfEntry { root_of: int_coefficients([-6, 1]), conjugacy_class: ConjugacyClassIndex::new(2) },
                RootOfEntry { root_of: int_coefficients([3, 1]), conjugacy_class: ConjugacyClassIndex::new(3) }
            ]
        }
    ]).unwrap();
    let cycle_type = CycleType::new(vec![3]);
    for p in [2, 5, 7, 11, 13, 23, 29, 31, 41, 43, 47, 59, 61] {
        let expected = if p % 9 == 2 || p % 9 == 7 { 2 } else { 3 };
        assert_eq!(ConjugacyClassIndex::new(expected), table.conjugacy_class_index(&cycle_type, p).unwrap());
    }
}

#[test]
fn test_alt_invalid_data() {
    let poly = int_coefficients([12, 8, 0, 0, 1]);
    let error = DispatchTable::build(&poly, [FrobeniusResolvent::Alt {
        cycle_type: CycleType::new(vec![1, 3]),
        data: vec![2, 1, 3, 4],
        classes: Vec::new()
    }]).unwrap_err();
    assert_eq!(EngineError::NotAlternating { images: vec![2, 1, 3, 4] }, error);
}
