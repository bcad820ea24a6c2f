use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::error::{EngineError, Result};

///
/// The cycle type of a permutation, as a sequence of cycle lengths.
///
/// Although this mathematically describes an unordered partition, equality is
/// equality of sequences, so the stored records and the computed Frobenius cycle
/// types have to agree on the order. Everything computed in this crate is ordered
/// increasingly, including fixed points as cycles of length `1`.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct CycleType(Vec<u32>);

impl CycleType {

    pub fn new(lengths: Vec<u32>) -> Self {
        CycleType(lengths)
    }

    pub fn lengths(&self) -> &[u32] {
        &self.0
    }

    ///
    /// The number of points the permutation acts on.
    ///
    pub fn degree(&self) -> usize {
        self.0.iter().map(|l| *l as usize).sum()
    }

    ///
    /// The least common multiple of all cycle lengths, i.e. the order of any permutation
    /// with this cycle type.
    ///
    pub fn order(&self) -> u64 {
        fn gcd(a: u64, b: u64) -> u64 {
            if b == 0 { a } else { gcd(b, a % b) }
        }
        self.0.iter().fold(1, |acc, l| acc / gcd(acc, *l as u64) * *l as u64)
    }

    pub fn sorted(&self) -> CycleType {
        let mut lengths = self.0.clone();
        lengths.sort_unstable();
        return CycleType(lengths);
    }

    ///
    /// Returns whether the conjugacy class of `S_n` with this cycle type splits into two
    /// classes of `A_n`, which happens exactly when all cycles have odd and pairwise
    /// distinct lengths.
    ///
    pub fn splits_in_alternating(&self) -> bool {
        let sorted = self.sorted();
        sorted.0.iter().all(|l| l % 2 == 1) && sorted.0.windows(2).all(|w| w[0] != w[1])
    }
}

impl From<Vec<u32>> for CycleType {

    fn from(value: Vec<u32>) -> Self {
        CycleType(value)
    }
}

impl Display for CycleType {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, l) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", l)?;
        }
        write!(f, ")")
    }
}

///
/// A permutation of `{0, ..., n - 1}`, stored by its images.
///
/// Internally, all indices are 0-based. Stored records and the permutation induced by
/// Frobenius on the roots use 1-based image lists, which are only converted at
/// construction, using [`Permutation::from_images_one_based()`] and
/// [`Permutation::images_one_based()`].
///
/// # Example
/// ```
/// # use artin_frobenius::permutation::*;
/// let sigma = Permutation::from_images_one_based(&[2, 3, 1, 4]).unwrap();
/// assert_eq!(vec![vec![0, 1, 2], vec![3]], sigma.cycles());
/// assert_eq!(CycleType::new(vec![1, 3]), sigma.cycle_type());
/// assert!(sigma.is_even());
/// ```
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permutation {
    images: Vec<usize>
}

impl Permutation {

    pub fn identity(n: usize) -> Self {
        Permutation { images: (0..n).collect() }
    }

    ///
    /// Creates the permutation `i -> images[i]`, or fails if `images` is not a permutation
    /// of `{0, ..., n - 1}`.
    ///
    pub fn from_images(images: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; images.len()];
        for i in &images {
            if *i >= images.len() || seen[*i] {
                return Err(EngineError::InvalidPermutation { images: images.iter().map(|i| i + 1).collect() });
            }
            seen[*i] = true;
        }
        return Ok(Permutation { images: images });
    }

    ///
    /// Creates the permutation `i -> images[i - 1]` of `{1, ..., n}`.
    ///
    pub fn from_images_one_based(images: &[usize]) -> Result<Self> {
        if images.iter().any(|i| *i == 0) {
            return Err(EngineError::InvalidPermutation { images: images.to_vec() });
        }
        Self::from_images(images.iter().map(|i| i - 1).collect())
    }

    ///
    /// Creates the permutation of `{1, ..., n}` that is the product of the given disjoint
    /// cycles, written with 1-based points.
    ///
    pub fn from_cycles_one_based(n: usize, cycles: &[&[usize]]) -> Result<Self> {
        let mut images: Vec<usize> = (1..=n).collect();
        let mut moved = vec![false; n];
        for cycle in cycles {
            for (j, point) in cycle.iter().enumerate() {
                let next = cycle[(j + 1) % cycle.len()];
                if *point == 0 || *point > n || next == 0 || next > n || moved[point - 1] {
                    return Err(EngineError::InvalidPermutation { images: cycle.to_vec() });
                }
                moved[point - 1] = true;
                images[point - 1] = next;
            }
        }
        Self::from_images_one_based(&images)
    }

    pub fn degree(&self) -> usize {
        self.images.len()
    }

    pub fn image(&self, i: usize) -> usize {
        self.images[i]
    }

    pub fn images_one_based(&self) -> Vec<usize> {
        self.images.iter().map(|i| i + 1).collect()
    }

    ///
    /// Returns `self o other`, i.e. the permutation `i -> self(other(i))`.
    ///
    pub fn compose(&self, other: &Permutation) -> Permutation {
        assert_eq!(self.degree(), other.degree());
        Permutation { images: other.images.iter().map(|i| self.images[*i]).collect() }
    }

    pub fn inverse(&self) -> Permutation {
        let mut result = vec![0; self.degree()];
        for (i, j) in self.images.iter().enumerate() {
            result[*j] = i;
        }
        return Permutation { images: result };
    }

    ///
    /// Returns `tau o self o tau^-1`.
    ///
    pub fn conjugate_by(&self, tau: &Permutation) -> Permutation {
        tau.compose(&self.compose(&tau.inverse()))
    }

    ///
    /// Returns the cycles of this permutation, including fixed points as cycles of
    /// length one. Each cycle starts with its smallest point, and the cycles are ordered
    /// by their first point.
    ///
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.degree()];
        let mut result = Vec::new();
        for start in 0..self.degree() {
            if visited[start] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut current = start;
            while !visited[current] {
                visited[current] = true;
                cycle.push(current);
                current = self.images[current];
            }
            result.push(cycle);
        }
        return result;
    }

    pub fn cycle_type(&self) -> CycleType {
        let mut lengths: Vec<u32> = self.cycles().iter().map(|c| c.len() as u32).collect();
        lengths.sort_unstable();
        return CycleType(lengths);
    }

    ///
    /// Returns `1` for even permutations and `-1` for odd permutations.
    ///
    pub fn sign(&self) -> i32 {
        let cycle_count = self.cycles().len();
        if (self.degree() - cycle_count) % 2 == 0 { 1 } else { -1 }
    }

    pub fn is_even(&self) -> bool {
        self.sign() == 1
    }
}

///
/// Tests whether `rho` and `sigma` are conjugate in the alternating group. They do not have
/// to act on the same number of points, in which case they are never conjugate.
///
/// # Algorithm
///
/// The conjugacy classes of `A_n` are the same as those of `S_n`, except when all cycles
/// have odd and pairwise distinct lengths; in that case, the `S_n`-class splits into
/// two `A_n`-classes. Since the centralizer of such a permutation lies in `A_n`, all
/// permutations conjugating `rho` to `sigma` have the same sign, and so it suffices to
/// find one, by mapping the cycles of `rho` to the cycles of `sigma` of the same length.
///
pub fn are_conjugate_in_alternating(rho: &Permutation, sigma: &Permutation) -> bool {
    let rho_cycle_type = rho.cycle_type();
    let sigma_cycle_type = sigma.cycle_type();
    if rho_cycle_type.degree() != sigma_cycle_type.degree() {
        return false;
    }
    if rho_cycle_type != sigma_cycle_type {
        return false;
    }
    if !sigma_cycle_type.splits_in_alternating() {
        return true;
    }

    // the lengths are pairwise distinct, so sorting by length matches up the cycles
    let mut rho_cycles = rho.cycles();
    let mut sigma_cycles = sigma.cycles();
    rho_cycles.sort_by_key(|c| c.len());
    sigma_cycles.sort_by_key(|c| c.len());
    let mut conjugator = vec![0; rho.degree()];
    for (rho_cycle, sigma_cycle) in rho_cycles.iter().zip(sigma_cycles.iter()) {
        debug_assert_eq!(rho_cycle.len(), sigma_cycle.len());
        for (i, j) in rho_cycle.iter().zip(sigma_cycle.iter()) {
            conjugator[*i] = *j;
        }
    }
    let conjugator = Permutation { images: conjugator };
    debug_assert!(conjugator.inverse().compose(&sigma.compose(&conjugator)) == *rho);
    return conjugator.is_even();
}

#[cfg(test)]
fn perm(cycles: &[&[usize]], n: usize) -> Permutation {
    Permutation::from_cycles_one_based(n, cycles).unwrap()
}

#[test]
fn test_from_images() {
    assert!(Permutation::from_images_one_based(&[2, 3, 1]).is_ok());
    assert_eq!(
        Err(EngineError::InvalidPermutation { images: vec![2, 2, 1] }),
        Permutation::from_images_one_based(&[2, 2, 1])
    );
    assert!(Permutation::from_images_one_based(&[0, 1]).is_err());
    assert!(Permutation::from_images_one_based(&[1, 4, 2]).is_err());
    assert_eq!(vec![3, 1, 2], Permutation::from_images_one_based(&[3, 1, 2]).unwrap().images_one_based());
}

#[test]
fn test_cycles() {
    let sigma = perm(&[&[1, 4], &[2, 5, 3]], 6);
    assert_eq!(vec![vec![0, 3], vec![1, 4, 2], vec![5]], sigma.cycles());
    assert_eq!(CycleType::new(vec![1, 2, 3]), sigma.cycle_type());
    assert_eq!(-1, sigma.sign());
    assert_eq!(6, sigma.cycle_type().order());
    assert!(Permutation::identity(4).is_even());
}

#[test]
fn test_compose() {
    let sigma = perm(&[&[1, 2, 3]], 3);
    let tau = perm(&[&[1, 2]], 3);
    // first apply tau, then sigma
    assert_eq!(perm(&[&[1, 3]], 3), sigma.compose(&tau));
    assert_eq!(Permutation::identity(3), sigma.compose(&sigma.inverse()));
    assert_eq!(perm(&[&[1, 3, 2]], 3), sigma.conjugate_by(&tau));
}

#[test]
fn test_splits_in_alternating() {
    assert!(CycleType::new(vec![5]).splits_in_alternating());
    assert!(CycleType::new(vec![1, 3]).splits_in_alternating());
    assert!(!CycleType::new(vec![1, 1, 3]).splits_in_alternating());
    assert!(!CycleType::new(vec![2, 2]).splits_in_alternating());
    assert!(CycleType::new(vec![3, 1]).splits_in_alternating());
}

#[test]
fn test_are_conjugate_in_alternating_five_cycles() {
    let sigma = perm(&[&[1, 2, 3, 4, 5]], 5);
    let sigma_squared = perm(&[&[1, 3, 5, 2, 4]], 5);
    let sigma_inverse = perm(&[&[1, 5, 4, 3, 2]], 5);
    assert!(are_conjugate_in_alternating(&sigma, &sigma));
    assert!(!are_conjugate_in_alternating(&sigma, &sigma_squared));
    assert!(!are_conjugate_in_alternating(&sigma_squared, &sigma));
    assert!(are_conjugate_in_alternating(&sigma, &sigma_inverse));
}

#[test]
fn test_are_conjugate_in_alternating_non_split() {
    // the class of 3-cycles does not split in A_5
    assert!(are_conjugate_in_alternating(&perm(&[&[1, 2, 3]], 5), &perm(&[&[1, 3, 2]], 5)));
    assert!(are_conjugate_in_alternating(&perm(&[&[1, 2], &[3, 4]], 4), &perm(&[&[1, 3], &[2, 4]], 4)));
    assert!(!are_conjugate_in_alternating(&perm(&[&[1, 2, 3]], 5), &perm(&[&[1, 2, 3, 4, 5]], 5)));
    assert!(!are_conjugate_in_alternating(&perm(&[&[1, 2, 3]], 4), &perm(&[&[1, 2, 3]], 5)));
}

#[test]
fn test_are_conjugate_in_alternating_split_with_fixed_point() {
    // in A_4, the 3-cycles form two classes, represented by (1 2 3) and (1 3 2)
    let a = perm(&[&[1, 2, 3]], 4);
    let b = perm(&[&[1, 3, 2]], 4);
    assert!(!are_conjugate_in_alternating(&a, &b));
    let even = perm(&[&[1, 2], &[3, 4]], 4);
    let odd = perm(&[&[1, 4]], 4);
    assert!(are_conjugate_in_alternating(&a, &a.conjugate_by(&even)));
    assert!(!are_conjugate_in_alternating(&a, &a.conjugate_by(&odd)));
    assert!(are_conjugate_in_alternating(&b, &a.conjugate_by(&odd)));
}

#[test]
fn test_are_conjugate_in_alternating_symmetric() {
    let elements = [
        perm(&[&[1, 2, 3]], 4),
        perm(&[&[1, 3, 2]], 4),
        perm(&[&[2, 3, 4]], 4),
        perm(&[&[1, 2], &[3, 4]], 4),
        perm(&[&[1, 2]], 4),
        Permutation::identity(4)
    ];
    for a in &elements {
        assert!(are_conjugate_in_alternating(a, a));
        for b in &elements {
            assert_eq!(are_conjugate_in_alternating(a, b), are_conjugate_in_alternating(b, a));
            if a.cycle_type() != b.cycle_type() {
                assert!(!are_conjugate_in_alternating(a, b));
            }
        }
    }
}
