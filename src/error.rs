use thiserror::Error;

use crate::artin::records::{ConjugacyClassIndex, RootOfEntry};
use crate::permutation::CycleType;

pub type Result<T> = std::result::Result<T, EngineError>;

///
/// Everything that can go wrong when identifying the conjugacy class of a Frobenius element.
///
/// None of these are expected at runtime if the stored data is correct and callers only
/// pass good, non-hard primes; they signal either malformed records or a violated
/// precondition, and are never recovered from within this crate.
///
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {

    #[error("unknown algorithm {0:?}, only three cases are possible: CYC, RES and ALT")]
    UnknownAlgorithm(String),

    #[error("malformed frobenius resolvent record: {0}")]
    MalformedRecord(String),

    #[error("{images:?} is not a permutation given by its 1-based images")]
    InvalidPermutation {
        images: Vec<usize>
    },

    #[error("the data element {images:?} is not an element of the alternating group")]
    NotAlternating {
        images: Vec<usize>
    },

    #[error("at p = {prime}, the Frobenius element {images:?} is not an element of the alternating group")]
    FrobeniusNotAlternating {
        prime: u64,
        images: Vec<usize>
    },

    #[error("expected {expected} roots of the defining polynomial modulo {prime}, but found {found}")]
    RootCountMismatch {
        prime: u64,
        expected: usize,
        found: usize
    },

    #[error("at p = {prime}, Frobenius does not seem to permute the roots")]
    FrobeniusNotPermutation {
        prime: u64
    },

    #[error("alpha = {alpha} is supposed to be root of one of {candidates:?}")]
    NoMatchingPolynomial {
        alpha: String,
        candidates: Vec<RootOfEntry>
    },

    #[error("alpha = {alpha} is a root of several of {candidates:?}, namely those for classes {matches:?}")]
    MultipleMatchingPolynomials {
        alpha: String,
        candidates: Vec<RootOfEntry>,
        matches: Vec<ConjugacyClassIndex>
    },

    #[error("expecting to find cycle type {cycle_type} in the dispatch table, which only contains {known:?}")]
    MissingCycleType {
        cycle_type: CycleType,
        known: Vec<CycleType>
    },

    #[error("expecting a prime not dividing the discriminant, but got {prime}")]
    BadPrime {
        prime: u64
    },

    #[error("the defining polynomial is not squarefree modulo {prime}, which might divide the index of Z[x]/(f) without being ramified")]
    IndexDivisor {
        prime: u64
    },

    #[error("{prime} is a hard prime, its conjugacy class must be looked up in the stored table")]
    HardPrime {
        prime: u64
    },

    #[error("not a hard prime: {prime}")]
    NotHardPrime {
        prime: u64
    },

    #[error("conjugacy class index {index} out of range, there are only {class_count} local factors")]
    ConjugacyClassOutOfRange {
        index: ConjugacyClassIndex,
        class_count: usize
    },

    #[error("{value} is not a prime")]
    NotPrime {
        value: u64
    }
}
