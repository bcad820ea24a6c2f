use std::cmp::Ordering;
use std::fmt::Formatter;

use crate::algorithms::cantor_zassenhaus::is_irreducible;
use crate::algorithms::eea::poly_eea;
use crate::integer::IntegerCoefficient;
use crate::ring::*;
use crate::rings::finite::FiniteField;
use crate::rings::poly::DensePolyRing;
use crate::rings::zn::Zn;

///
/// The finite field `GF(p^d)`, represented as `Fp[t]/(m(t))` for a monic irreducible
/// polynomial `m` of degree `d`.
///
/// Elements are coefficient vectors of length exactly `d` w.r.t. the basis
/// `1, t, ..., t^(d - 1)`. In particular, equality is exact and cheap, which is
/// all that is required to match roots and invariants.
///
/// # Example
/// ```
/// # use artin_frobenius::ring::*;
/// # use artin_frobenius::rings::finite::*;
/// # use artin_frobenius::rings::galois_field::*;
/// let F25 = GaloisField::new(5, 2);
/// let generator = F25.canonical_gen();
/// let norm = F25.mul_ref(&generator, &F25.pow(generator.clone(), 5));
/// // the norm must be an element of the prime field
/// assert!(F25.base_field().elements().any(|x| F25.eq_el(&norm, &F25.from_base(x))));
/// ```
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaloisField {
    base_field: Zn,
    degree: usize,
    /// monic irreducible polynomial, constant coefficient first, of length `degree + 1`
    modulus: Vec<u64>
}

impl GaloisField {

    ///
    /// Creates the finite field with `p^degree` elements. The given `p` must be a prime.
    ///
    /// The defining polynomial is chosen pseudo-randomly, but the random generator is seeded
    /// with `p` and `degree`, so calling this twice with the same parameters gives the
    /// same field, with the same representation of its elements.
    ///
    pub fn new(p: u64, degree: usize) -> Self {
        assert!(degree > 0);
        let Fp = Zn::new(p);
        if degree == 1 {
            return GaloisField { base_field: Fp, degree: 1, modulus: vec![0, 1] };
        }
        let poly_ring = DensePolyRing::new(Fp);
        let mut rng = oorandom::Rand64::new(((p as u128) << 32) | degree as u128);
        loop {
            let random_poly = poly_ring.from_terms(
                (0..degree).map(|i| (Fp.from_u64(rng.rand_u64()), i))
                    .chain([(Fp.one(), degree)])
            );
            if is_irreducible(&poly_ring, &random_poly) {
                return GaloisField { base_field: Fp, degree: degree, modulus: random_poly };
            }
        }
    }

    ///
    /// Creates the finite field `Fp[t]/(m(t))` for the given monic irreducible polynomial `m`.
    ///
    pub fn with_modulus(p: u64, modulus: Vec<u64>) -> Self {
        let Fp = Zn::new(p);
        let poly_ring = DensePolyRing::new(Fp);
        let modulus = poly_ring.from_coefficients(modulus.into_iter().map(|c| Fp.from_u64(c)).collect());
        assert!(poly_ring.lc(&modulus).map(|c| Fp.is_one(c)).unwrap_or(false), "defining polynomial must be monic");
        assert!(is_irreducible(&poly_ring, &modulus), "defining polynomial must be irreducible");
        let degree = poly_ring.degree(&modulus).unwrap();
        return GaloisField { base_field: Fp, degree: degree, modulus: modulus };
    }

    pub fn base_field(&self) -> &Zn {
        &self.base_field
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn defining_polynomial(&self) -> &[u64] {
        &self.modulus
    }

    pub fn canonical_gen(&self) -> Vec<u64> {
        self.reduce(vec![0, 1])
    }

    pub fn from_base(&self, c: u64) -> Vec<u64> {
        let mut result = vec![0; self.degree];
        result[0] = c;
        return result;
    }

    pub fn coerce_integer(&self, c: &IntegerCoefficient) -> Vec<u64> {
        self.from_base(self.base_field.coerce_integer(c))
    }

    ///
    /// Evaluates the polynomial with integer coefficients (constant coefficient first)
    /// at `x`, after reducing its coefficients modulo `p`.
    ///
    pub fn evaluate_integer_poly(&self, poly: &[IntegerCoefficient], x: &Vec<u64>) -> Vec<u64> {
        let mut result = self.zero();
        for c in poly.iter().rev() {
            self.mul_assign_ref(&mut result, x);
            self.add_assign(&mut result, self.coerce_integer(c));
        }
        return result;
    }

    ///
    /// Reduces the integer polynomial (constant coefficient first) to a polynomial over
    /// this field.
    ///
    pub fn reduce_integer_poly(&self, poly_ring: &DensePolyRing<&GaloisField>, poly: &[IntegerCoefficient]) -> Vec<Vec<u64>> {
        poly_ring.from_coefficients(poly.iter().map(|c| self.coerce_integer(c)).collect())
    }

    ///
    /// Iterates over all elements of the field. Only intended for small fields.
    ///
    pub fn elements<'a>(&'a self) -> impl 'a + Iterator<Item = Vec<u64>> {
        let p = self.base_field.modulus();
        let size = self.size().and_then(|s| u64::try_from(s).ok()).expect("field too large to enumerate");
        (0..size).map(move |mut index| (0..self.degree).map(|_| {
            let digit = index % p;
            index /= p;
            digit
        }).collect())
    }

    fn reduce(&self, mut value: Vec<u64>) -> Vec<u64> {
        let Fp = &self.base_field;
        for i in (self.degree..value.len()).rev() {
            let factor = value[i];
            if factor == 0 {
                continue;
            }
            for j in 0..self.degree {
                let subtract = Fp.mul(factor, self.modulus[j]);
                Fp.sub_assign(&mut value[i - self.degree + j], subtract);
            }
        }
        value.resize(self.degree, 0);
        return value;
    }
}

impl RingBase for GaloisField {

    type Element = Vec<u64>;

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        debug_assert_eq!(self.degree, lhs.len());
        debug_assert_eq!(self.degree, rhs.len());
        for (a, b) in lhs.iter_mut().zip(rhs.iter()) {
            self.base_field.add_assign_ref(a, b);
        }
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        for a in lhs.iter_mut() {
            self.base_field.negate_inplace(a);
        }
    }

    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        let mut result = vec![0; 2 * self.degree - 1];
        for (i, a) in lhs.iter().enumerate() {
            if *a == 0 {
                continue;
            }
            for (j, b) in rhs.iter().enumerate() {
                let prod = self.base_field.mul_ref(a, b);
                self.base_field.add_assign(&mut result[i + j], prod);
            }
        }
        *lhs = self.reduce(result);
    }

    fn from_int(&self, value: i64) -> Self::Element {
        self.from_base(self.base_field.from_int(value))
    }

    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        lhs == rhs
    }

    fn is_zero(&self, value: &Self::Element) -> bool {
        value.iter().all(|c| *c == 0)
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result {
        if self.is_zero(value) {
            return write!(out, "0");
        }
        let mut first = true;
        for (i, c) in value.iter().enumerate().rev() {
            if *c == 0 {
                continue;
            }
            if !first {
                write!(out, " + ")?;
            }
            first = false;
            match (i, *c) {
                (0, c) => write!(out, "{}", c)?,
                (1, 1) => write!(out, "a")?,
                (1, c) => write!(out, "{}*a", c)?,
                (i, 1) => write!(out, "a^{}", i)?,
                (i, c) => write!(out, "{}*a^{}", c, i)?
            }
        }
        return Ok(());
    }
}

impl Field for GaloisField {

    fn invert(&self, value: &Self::Element) -> Option<Self::Element> {
        if self.is_zero(value) {
            return None;
        }
        let poly_ring = DensePolyRing::new(self.base_field);
        let (s, _, d) = poly_eea(poly_ring.from_coefficients(value.clone()), self.modulus.clone(), &poly_ring);
        // `m` is irreducible, so the gcd is a nonzero constant
        assert_eq!(Some(0), poly_ring.degree(&d));
        let d_inv = self.base_field.invert(&d[0]).unwrap();
        let mut result: Vec<u64> = (0..self.degree).map(|i| poly_ring.coefficient_at(&s, i)).collect();
        self.mul_assign_ref(&mut result, &self.from_base(d_inv));
        return Some(result);
    }
}

impl FiniteField for GaloisField {

    fn characteristic(&self) -> u64 {
        self.base_field.modulus()
    }

    fn degree_over_prime_field(&self) -> usize {
        self.degree
    }

    fn random_element<G: FnMut() -> u64>(&self, mut rng: G) -> Self::Element {
        (0..self.degree).map(|_| self.base_field.from_u64(rng())).collect()
    }

    fn cmp_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> Ordering {
        lhs.iter().rev().cmp(rhs.iter().rev())
    }
}

#[cfg(test)]
use crate::assert_el_eq;

#[test]
fn test_field_axioms() {
    let F27 = GaloisField::new(3, 3);
    assert_eq!(27, F27.elements().count());
    for (i, a) in F27.elements().enumerate() {
        for (j, b) in F27.elements().enumerate() {
            assert!(i == j || !F27.eq_el(&a, &b));
            if !F27.is_zero(&b) {
                assert_el_eq!(&F27, a, F27.mul_ref(&b, &F27.div(&a, &b)));
            }
        }
    }
}

#[test]
fn test_frobenius_order() {
    let F16 = GaloisField::new(2, 4);
    let a = F16.canonical_gen();
    let mut current = a.clone();
    for _ in 0..4 {
        current = F16.frobenius(current);
    }
    assert_el_eq!(&F16, a, current);
    // a generates F16 over F2, so fewer Frobenius iterations do not fix it
    assert!(!F16.eq_el(&a, &F16.frobenius(F16.frobenius(a.clone()))));
}

#[test]
fn test_deterministic() {
    assert_eq!(GaloisField::new(101, 3), GaloisField::new(101, 3));
}

#[test]
fn test_evaluate_integer_poly() {
    let F49 = GaloisField::with_modulus(7, vec![1, 0, 1]);
    let a = F49.canonical_gen();
    // a^2 = -1 in F49 = F7[t]/(t^2 + 1)
    let poly = crate::integer::int_coefficients([1, 0, 1]);
    assert!(F49.is_zero(&F49.evaluate_integer_poly(&poly, &a)));
    let poly = crate::integer::int_coefficients([-10, 0, 3]);
    assert_el_eq!(&F49, F49.from_int(-13), F49.evaluate_integer_poly(&poly, &a));
}

#[test]
fn test_prime_field_case() {
    let F13 = GaloisField::new(13, 1);
    assert_eq!(13, F13.elements().count());
    assert_el_eq!(&F13, F13.from_int(1), F13.mul(F13.from_int(5), F13.from_int(8)));
    assert_el_eq!(&F13, F13.from_int(0), F13.canonical_gen());
}
