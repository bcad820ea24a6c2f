use std::fmt::Formatter;

use crate::algorithms;
use crate::ring::*;

///
/// The univariate polynomial ring `R[X]` over a field `R`, with polynomials
/// stored as dense vectors of coefficients, constant coefficient first.
///
/// Elements never have trailing zero coefficients, so the zero polynomial is
/// the empty vector, and the degree is the length minus one.
///
/// # Example
/// ```
/// # use artin_frobenius::assert_el_eq;
/// # use artin_frobenius::ring::*;
/// # use artin_frobenius::rings::zn::*;
/// # use artin_frobenius::rings::poly::*;
/// let poly_ring = DensePolyRing::new(Zn::new(7));
/// let f = poly_ring.from_terms([(1, 0), (1, 2)]);
/// let g = poly_ring.from_terms([(6, 0), (1, 1)]);
/// // (X^2 + 1) = (X - 1)(X + 1) + 2
/// let (q, r) = poly_ring.euclidean_div_rem(f, &g);
/// assert_el_eq!(&poly_ring, poly_ring.from_terms([(1, 0), (1, 1)]), q);
/// assert_el_eq!(&poly_ring, poly_ring.from_terms([(2, 0)]), r);
/// ```
///
#[derive(Clone)]
pub struct DensePolyRing<R: Field> {
    base_ring: R
}

impl<R: Field> DensePolyRing<R> {

    pub fn new(base_ring: R) -> Self {
        DensePolyRing { base_ring: base_ring }
    }

    pub fn base_ring(&self) -> &R {
        &self.base_ring
    }

    fn trim(&self, mut f: Vec<El<R>>) -> Vec<El<R>> {
        while let Some(c) = f.last() {
            if self.base_ring.is_zero(c) {
                f.pop();
            } else {
                break;
            }
        }
        return f;
    }

    pub fn from_coefficients(&self, coefficients: Vec<El<R>>) -> Vec<El<R>> {
        self.trim(coefficients)
    }

    pub fn from_terms<I>(&self, terms: I) -> Vec<El<R>>
        where I: IntoIterator<Item = (El<R>, usize)>
    {
        let mut result = Vec::new();
        for (c, i) in terms {
            if result.len() <= i {
                result.resize_with(i + 1, || self.base_ring.zero());
            }
            self.base_ring.add_assign(&mut result[i], c);
        }
        return self.trim(result);
    }

    pub fn from_base(&self, c: El<R>) -> Vec<El<R>> {
        self.trim(vec![c])
    }

    pub fn indeterminate(&self) -> Vec<El<R>> {
        vec![self.base_ring.zero(), self.base_ring.one()]
    }

    pub fn degree(&self, f: &Vec<El<R>>) -> Option<usize> {
        f.len().checked_sub(1)
    }

    pub fn coefficient_at<'a>(&self, f: &'a Vec<El<R>>, i: usize) -> El<R> {
        f.get(i).cloned().unwrap_or_else(|| self.base_ring.zero())
    }

    pub fn lc<'a>(&self, f: &'a Vec<El<R>>) -> Option<&'a El<R>> {
        f.last()
    }

    pub fn is_unit(&self, f: &Vec<El<R>>) -> bool {
        self.degree(f) == Some(0)
    }

    pub fn mul_assign_base(&self, f: &mut Vec<El<R>>, c: &El<R>) {
        for coeff in f.iter_mut() {
            self.base_ring.mul_assign_ref(coeff, c);
        }
        let trimmed = self.trim(std::mem::take(f));
        *f = trimmed;
    }

    ///
    /// Scales the polynomial such that its leading coefficient is one.
    /// The zero polynomial is returned unchanged.
    ///
    pub fn normalize(&self, mut f: Vec<El<R>>) -> Vec<El<R>> {
        if let Some(lc) = self.lc(&f) {
            let lc_inv = self.base_ring.invert(lc).unwrap();
            self.mul_assign_base(&mut f, &lc_inv);
        }
        return f;
    }

    pub fn derivative(&self, f: &Vec<El<R>>) -> Vec<El<R>> {
        self.from_terms(f.iter().enumerate().skip(1).map(|(i, c)| (
            self.base_ring.mul_ref(c, &self.base_ring.from_int(i as i64)),
            i - 1
        )))
    }

    ///
    /// Computes `q, r` such that `f = q g + r` and `deg r < deg g`.
    ///
    pub fn euclidean_div_rem(&self, mut f: Vec<El<R>>, g: &Vec<El<R>>) -> (Vec<El<R>>, Vec<El<R>>) {
        let deg_g = self.degree(g).expect("division by zero polynomial");
        let lc_g_inv = self.base_ring.invert(&g[deg_g]).unwrap();
        if f.len() <= deg_g {
            return (Vec::new(), f);
        }
        let mut quotient = Vec::new();
        quotient.resize_with(f.len() - deg_g, || self.base_ring.zero());
        for i in (deg_g..f.len()).rev() {
            let factor = self.base_ring.mul_ref(&f[i], &lc_g_inv);
            if self.base_ring.is_zero(&factor) {
                continue;
            }
            for j in 0..=deg_g {
                let subtract = self.base_ring.mul_ref(&factor, &g[j]);
                self.base_ring.sub_assign(&mut f[i - deg_g + j], subtract);
            }
            quotient[i - deg_g] = factor;
        }
        f.truncate(deg_g);
        return (self.trim(quotient), self.trim(f));
    }

    pub fn euclidean_rem(&self, f: Vec<El<R>>, g: &Vec<El<R>>) -> Vec<El<R>> {
        self.euclidean_div_rem(f, g).1
    }

    pub fn euclidean_div(&self, f: Vec<El<R>>, g: &Vec<El<R>>) -> Vec<El<R>> {
        self.euclidean_div_rem(f, g).0
    }

    ///
    /// Returns `f / g` if `g` divides `f`, otherwise `None`.
    ///
    pub fn checked_div(&self, f: &Vec<El<R>>, g: &Vec<El<R>>) -> Option<Vec<El<R>>> {
        let (q, r) = self.euclidean_div_rem(f.clone(), g);
        if self.is_zero(&r) {
            Some(q)
        } else {
            None
        }
    }

    ///
    /// Computes the monic greatest common divisor of `f` and `g`. If both are zero,
    /// zero is returned.
    ///
    pub fn gcd(&self, mut f: Vec<El<R>>, mut g: Vec<El<R>>) -> Vec<El<R>> {
        while !self.is_zero(&g) {
            let r = self.euclidean_rem(f, &g);
            f = g;
            g = r;
        }
        return self.normalize(f);
    }

    ///
    /// Computes `g^power mod f`, where `g` is assumed to be already reduced modulo `f`.
    ///
    pub fn pow_mod(&self, g: Vec<El<R>>, power: u64, f: &Vec<El<R>>) -> Vec<El<R>> {
        algorithms::sqr_mul::generic_abs_square_and_multiply(
            g,
            power,
            |a| self.euclidean_rem(self.square(&a), f),
            |a, b| self.euclidean_rem(self.mul_ref(a, &b), f),
            self.euclidean_rem(self.one(), f)
        )
    }

    pub fn evaluate(&self, f: &Vec<El<R>>, x: &El<R>) -> El<R> {
        let mut result = self.base_ring.zero();
        for c in f.iter().rev() {
            self.base_ring.mul_assign_ref(&mut result, x);
            self.base_ring.add_assign_ref(&mut result, c);
        }
        return result;
    }
}

impl<R: Field> RingBase for DensePolyRing<R> {

    type Element = Vec<El<R>>;

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        if lhs.len() < rhs.len() {
            lhs.resize_with(rhs.len(), || self.base_ring.zero());
        }
        for (i, c) in rhs.iter().enumerate() {
            self.base_ring.add_assign_ref(&mut lhs[i], c);
        }
        let trimmed = self.trim(std::mem::take(lhs));
        *lhs = trimmed;
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        for c in lhs.iter_mut() {
            self.base_ring.negate_inplace(c);
        }
    }

    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        if lhs.is_empty() || rhs.is_empty() {
            lhs.clear();
            return;
        }
        let mut result = Vec::new();
        result.resize_with(lhs.len() + rhs.len() - 1, || self.base_ring.zero());
        for (i, a) in lhs.iter().enumerate() {
            for (j, b) in rhs.iter().enumerate() {
                let prod = self.base_ring.mul_ref(a, b);
                self.base_ring.add_assign(&mut result[i + j], prod);
            }
        }
        *lhs = self.trim(result);
    }

    fn from_int(&self, value: i64) -> Self::Element {
        self.from_base(self.base_ring.from_int(value))
    }

    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        lhs.len() == rhs.len() && lhs.iter().zip(rhs.iter()).all(|(a, b)| self.base_ring.eq_el(a, b))
    }

    fn is_zero(&self, value: &Self::Element) -> bool {
        value.is_empty()
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result {
        if value.is_empty() {
            return write!(out, "0");
        }
        let mut first = true;
        for (i, c) in value.iter().enumerate().rev() {
            if self.base_ring.is_zero(c) {
                continue;
            }
            if !first {
                write!(out, " + ")?;
            }
            first = false;
            write!(out, "(")?;
            self.base_ring.dbg(c, out)?;
            write!(out, ")")?;
            match i {
                0 => {},
                1 => write!(out, "X")?,
                _ => write!(out, "X^{}", i)?
            }
        }
        return Ok(());
    }
}

#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::assert_el_eq;

#[test]
fn test_mul_div() {
    let poly_ring = DensePolyRing::new(Zn::new(7));
    let f = poly_ring.from_terms([(1, 0), (1, 2)]);
    let g = poly_ring.from_terms([(3, 0), (1, 1), (1, 2)]);
    let fg = poly_ring.mul_ref(&f, &g);
    assert_eq!(Some(4), poly_ring.degree(&fg));
    assert_el_eq!(&poly_ring, g, poly_ring.checked_div(&fg, &f).unwrap());
    assert!(poly_ring.checked_div(&f, &g).is_none());
}

#[test]
fn test_gcd() {
    let poly_ring = DensePolyRing::new(Zn::new(5));
    let a = poly_ring.from_terms([(1, 0), (1, 1)]);
    let b = poly_ring.from_terms([(2, 0), (1, 1)]);
    let c = poly_ring.from_terms([(3, 0), (1, 1)]);
    let ab = poly_ring.mul_ref(&a, &b);
    let ac = poly_ring.from_terms([(3, 0), (4, 1), (1, 2)]);
    assert_el_eq!(&poly_ring, poly_ring.mul_ref(&a, &c), ac);
    // scaling does not change the monic gcd
    let ab_scaled = poly_ring.mul(ab, poly_ring.from_int(3));
    assert_el_eq!(&poly_ring, a, poly_ring.gcd(ab_scaled, ac));
    assert_el_eq!(&poly_ring, poly_ring.one(), poly_ring.gcd(b, c));
}

#[test]
fn test_derivative_and_evaluate() {
    let poly_ring = DensePolyRing::new(Zn::new(11));
    let f = poly_ring.from_terms([(1, 0), (3, 2), (1, 3)]);
    assert_el_eq!(&poly_ring, poly_ring.from_terms([(6, 1), (3, 2)]), poly_ring.derivative(&f));
    // 1 + 3 * 4 + 8 = 21 = 10 mod 11
    assert_eq!(10, poly_ring.evaluate(&f, &2));
    // in characteristic 11, the derivative of X^11 vanishes
    assert!(poly_ring.is_zero(&poly_ring.derivative(&poly_ring.from_terms([(1, 11)]))));
}

#[test]
fn test_pow_mod() {
    let poly_ring = DensePolyRing::new(Zn::new(3));
    // X^3 = X + 1 mod X^3 - X - 1, and hence X^9 = X^3 + 1 = X + 2
    let f = poly_ring.from_terms([(2, 0), (2, 1), (1, 3)]);
    assert_el_eq!(&poly_ring, poly_ring.from_terms([(1, 0), (1, 1)]), poly_ring.pow_mod(poly_ring.indeterminate(), 3, &f));
    assert_el_eq!(&poly_ring, poly_ring.from_terms([(2, 0), (1, 1)]), poly_ring.pow_mod(poly_ring.indeterminate(), 9, &f));
}
