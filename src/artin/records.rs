use std::fmt::{Display, Formatter};

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::error::EngineError;
use crate::integer::IntegerCoefficient;
use crate::permutation::CycleType;

///
/// The 1-based index of a conjugacy class of the Galois group, in the order in which
/// the classes are stored for the number field (and hence the order of the local
/// factor table of all its Artin representations).
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ConjugacyClassIndex(u32);

impl ConjugacyClassIndex {

    pub fn new(index: u32) -> Self {
        ConjugacyClassIndex(index)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Display for ConjugacyClassIndex {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// One row of the lookup table of ALT and RES records: if the invariant is a root of
/// `root_of` (integer coefficients, constant coefficient first), the Frobenius element
/// is in class `conjugacy_class`.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RootOfEntry {
    #[serde(rename = "RootOf")]
    pub root_of: Vec<IntegerCoefficient>,
    #[serde(rename = "ConjugacyClass")]
    pub conjugacy_class: ConjugacyClassIndex
}

///
/// The data of a RES record: the invariant is
/// `sum_r gamma(r) * sum_(j in powers) r^(p^j)`, where `gamma` is the resolvent.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResolventData {
    #[serde(rename = "Powers")]
    pub powers: Vec<u32>,
    #[serde(rename = "Resolvent")]
    pub resolvent: Vec<IntegerCoefficient>
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordData {
    Permutation(Vec<usize>),
    Resolvent(ResolventData),
    Other(IgnoredAny)
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordClasses {
    Single(ConjugacyClassIndex),
    Table(Vec<RootOfEntry>)
}

///
/// A Frobenius resolvent record exactly as it is stored for a number field, i.e. before
/// checking that the payload fits the algorithm.
///
/// Use [`FrobeniusResolvent::try_from()`] to convert it into the typed form.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FrobeniusResolventRecord {
    #[serde(rename = "Algorithm")]
    pub algorithm: String,
    #[serde(rename = "CycleType")]
    pub cycle_type: CycleType,
    #[serde(rename = "Data", default)]
    pub data: Option<RecordData>,
    #[serde(rename = "Classes")]
    pub classes: RecordClasses
}

///
/// A technique to identify the conjugacy class of Frobenius among those with a given
/// cycle type.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "FrobeniusResolventRecord")]
pub enum FrobeniusResolvent {
    /// The cycle type alone determines the class.
    Cyc {
        cycle_type: CycleType,
        class: ConjugacyClassIndex
    },
    /// Two classes of `S_n` that are fused from classes of `A_n`, distinguished by
    /// whether Frobenius is `A_n`-conjugate to the reference permutation `data`,
    /// given by its 1-based images.
    Alt {
        cycle_type: CycleType,
        data: Vec<usize>,
        classes: Vec<RootOfEntry>
    },
    /// Classes distinguished by the value of a resolvent summed over Frobenius orbits.
    Res {
        cycle_type: CycleType,
        data: ResolventData,
        classes: Vec<RootOfEntry>
    }
}

impl FrobeniusResolvent {

    pub fn cycle_type(&self) -> &CycleType {
        match self {
            FrobeniusResolvent::Cyc { cycle_type, .. } => cycle_type,
            FrobeniusResolvent::Alt { cycle_type, .. } => cycle_type,
            FrobeniusResolvent::Res { cycle_type, .. } => cycle_type
        }
    }

    pub fn algorithm(&self) -> &'static str {
        match self {
            FrobeniusResolvent::Cyc { .. } => "CYC",
            FrobeniusResolvent::Alt { .. } => "ALT",
            FrobeniusResolvent::Res { .. } => "RES"
        }
    }
}

impl TryFrom<FrobeniusResolventRecord> for FrobeniusResolvent {

    type Error = EngineError;

    fn try_from(record: FrobeniusResolventRecord) -> Result<Self, Self::Error> {
        let FrobeniusResolventRecord { algorithm, cycle_type, data, classes } = record;
        let malformed = |what: &str| EngineError::MalformedRecord(format!("{} record for cycle type {} {}", algorithm, cycle_type, what));
        match algorithm.as_str() {
            "CYC" => match classes {
                RecordClasses::Single(class) => Ok(FrobeniusResolvent::Cyc { cycle_type: cycle_type.clone(), class: class }),
                RecordClasses::Table(_) => Err(malformed("must have a single conjugacy class"))
            },
            "ALT" => match (data, classes) {
                (Some(RecordData::Permutation(data)), RecordClasses::Table(classes)) => Ok(FrobeniusResolvent::Alt { cycle_type: cycle_type.clone(), data: data, classes: classes }),
                (_, RecordClasses::Table(_)) => Err(malformed("must have a permutation as data")),
                (_, RecordClasses::Single(_)) => Err(malformed("must have a table of conjugacy classes"))
            },
            "RES" => match (data, classes) {
                (Some(RecordData::Resolvent(data)), RecordClasses::Table(classes)) => Ok(FrobeniusResolvent::Res { cycle_type: cycle_type.clone(), data: data, classes: classes }),
                (_, RecordClasses::Table(_)) => Err(malformed("must have powers and a resolvent as data")),
                (_, RecordClasses::Single(_)) => Err(malformed("must have a table of conjugacy classes"))
            },
            _ => Err(EngineError::UnknownAlgorithm(algorithm.clone()))
        }
    }
}

#[cfg(test)]
use crate::integer::int_coefficients;

#[test]
fn test_deserialize_cyc() {
    let record: FrobeniusResolvent = serde_json::from_str(r#"{"Algorithm": "CYC", "CycleType": [1, 2], "Data": [], "Classes": 2}"#).unwrap();
    assert_eq!(FrobeniusResolvent::Cyc { cycle_type: CycleType::new(vec![1, 2]), class: ConjugacyClassIndex::new(2) }, record);
    let record: FrobeniusResolvent = serde_json::from_str(r#"{"Algorithm": "CYC", "CycleType": [3], "Classes": 3}"#).unwrap();
    assert_eq!("CYC", record.algorithm());
    assert_eq!(&CycleType::new(vec![3]), record.cycle_type());
}

#[test]
fn test_deserialize_alt() {
    let record: FrobeniusResolvent = serde_json::from_str(r#"{
        "Algorithm": "ALT",
        "CycleType": [1, 3],
        "Data": [2, 3, 1, 4],
        "Classes": [{"RootOf": ["-576", "1"], "ConjugacyClass": 3}, {"RootOf": ["576", "1"], "ConjugacyClass": 4}]
    }"#).unwrap();
    assert_eq!(FrobeniusResolvent::Alt {
        cycle_type: CycleType::new(vec![1, 3]),
        data: vec![2, 3, 1, 4],
        classes: vec![
            RootOfEntry { root_of: int_coefficients([-576, 1]), conjugacy_class: ConjugacyClassIndex::new(3) },
            RootOfEntry { root_of: int_coefficients([576, 1]), conjugacy_class: ConjugacyClassIndex::new(4) }
        ]
    }, record);
}

#[test]
fn test_deserialize_res() {
    let record: FrobeniusResolvent = serde_json::from_str(r#"{
        "Algorithm": "RES",
        "CycleType": [3],
        "Data": {"Powers": [1], "Resolvent": [0, 0, 1]},
        "Classes": [{"RootOf": [-6, 1], "ConjugacyClass": 2}, {"RootOf": [3, 1], "ConjugacyClass": 3}]
    }"#).unwrap();
    match record {
        FrobeniusResolvent::Res { data, classes, .. } => {
            assert_eq!(vec![1], data.powers);
            assert_eq!(int_coefficients([0, 0, 1]), data.resolvent);
            assert_eq!(2, classes.len());
        },
        _ => panic!()
    }
}

#[test]
fn test_unknown_algorithm() {
    let record: FrobeniusResolventRecord = serde_json::from_str(r#"{"Algorithm": "FOO", "CycleType": [3], "Classes": 3}"#).unwrap();
    assert_eq!(Err(EngineError::UnknownAlgorithm("FOO".to_owned())), FrobeniusResolvent::try_from(record));
    assert!(serde_json::from_str::<FrobeniusResolvent>(r#"{"Algorithm": "FOO", "CycleType": [3], "Classes": 3}"#).is_err());
}

#[test]
fn test_malformed() {
    let record: FrobeniusResolventRecord = serde_json::from_str(r#"{"Algorithm": "ALT", "CycleType": [3], "Classes": 3}"#).unwrap();
    assert!(matches!(FrobeniusResolvent::try_from(record), Err(EngineError::MalformedRecord(_))));
    let record: FrobeniusResolventRecord = serde_json::from_str(r#"{"Algorithm": "RES", "CycleType": [3], "Data": [1, 2, 3], "Classes": []}"#).unwrap();
    assert!(matches!(FrobeniusResolvent::try_from(record), Err(EngineError::MalformedRecord(_))));
}
