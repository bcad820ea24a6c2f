use crate::algorithms::cantor_zassenhaus::frobenius_power_mod_f;
use crate::integer::IntegerCoefficient;
use crate::ring::*;
use crate::rings::finite::FiniteField;
use crate::rings::poly::DensePolyRing;
use crate::rings::zn::Zn;

type Poly<R> = El<DensePolyRing<R>>;

///
/// Returns the product of the distinct monic irreducible factors of the nonzero polynomial `f`.
///
/// This also works if the derivative of `f` vanishes, since it only uses the factors
/// `gcd(f, X^(q^d) - X)`, which are squarefree.
///
pub fn radical<R>(poly_ring: &DensePolyRing<R>, f: &Poly<R>) -> Poly<R>
    where R: FiniteField
{
    let n = poly_ring.degree(f).unwrap();
    let e = poly_ring.base_ring().degree_over_prime_field();
    let mut result = poly_ring.one();
    let mut x_power_q_mod_f = poly_ring.indeterminate();
    for _ in 1..=n {
        x_power_q_mod_f = frobenius_power_mod_f(poly_ring, x_power_q_mod_f, f, e);
        let factors = poly_ring.gcd(f.clone(), poly_ring.sub_ref(&x_power_q_mod_f, &poly_ring.indeterminate()));
        let common = poly_ring.gcd(result.clone(), factors.clone());
        result = poly_ring.mul_ref(&result, &poly_ring.euclidean_div(factors, &common));
    }
    return poly_ring.normalize(result);
}

///
/// Uses Dedekind's criterion to decide whether `p` divides the index of the order
/// generated by a root of `f` in the maximal order. If it does not, the factorization of
/// `f` modulo `p` describes how `p` splits, and in particular `p` is ramified if and only
/// if `f` is not squarefree modulo `p`.
///
/// `f` is given by its integer coefficients, constant coefficient first, and `p` must
/// not divide its leading coefficient. Returns `None` if `p >= 2^32`, since the computation
/// happens modulo `p^2`.
///
/// # Algorithm
///
/// Write `f = g h mod p`, where `g` is the radical of `f mod p`, and lift `g`, `h` to
/// integer polynomials. Then `p` divides the index if and only if `(f - g h) / p`, `g` and `h`
/// have a common factor modulo `p`. If the leading coefficient is not `1`, we use `f / lc(f)`
/// over `Z/p^2Z` instead, which generates the same order locally at `p`.
///
pub fn divides_index(f: &[IntegerCoefficient], p: u64) -> Option<bool> {
    assert!(f.len() >= 2);
    if p >= (1 << 32) {
        return None;
    }
    let q = p * p;
    let Fp = Zn::new(p);
    let n = f.len() - 1;

    let lc_inv_mod_p = Fp.invert(&Fp.coerce_integer(&f[n])).expect("p divides the leading coefficient");
    // one Newton step lifts the inverse from Z/pZ to Z/p^2Z
    let lc_mod_q = f[n].reduce_mod(q) as u128;
    let error = (lc_mod_q * lc_inv_mod_p as u128) % q as u128;
    let lc_inv = (lc_inv_mod_p as u128 * ((2 + q as u128 - error) % q as u128)) % q as u128;
    let monic_f: Vec<u128> = f.iter().map(|c| (c.reduce_mod(q) as u128 * lc_inv) % q as u128).collect();
    debug_assert_eq!(1, monic_f[n]);

    let poly_ring = DensePolyRing::new(Fp);
    let f_mod_p = poly_ring.from_coefficients(monic_f.iter().map(|c| (*c % p as u128) as u64).collect());
    let g = radical(&poly_ring, &f_mod_p);
    let h = poly_ring.euclidean_div(f_mod_p, &g);

    // coefficients are below p < 2^32, so the sums of products fit into u128
    let mut g_times_h = vec![0u128; n + 1];
    for (i, g_i) in g.iter().enumerate() {
        for (j, h_j) in h.iter().enumerate() {
            g_times_h[i + j] += *g_i as u128 * *h_j as u128;
        }
    }
    let quotient = poly_ring.from_coefficients(monic_f.iter().zip(g_times_h.iter()).map(|(f_i, gh_i)| {
        let difference = (*f_i + q as u128 - *gh_i % q as u128) % q as u128;
        debug_assert!(difference % p as u128 == 0);
        (difference / p as u128) as u64
    }).collect());

    let common_factor = poly_ring.gcd(poly_ring.gcd(quotient, g), h);
    return Some(!poly_ring.is_unit(&common_factor));
}

#[cfg(test)]
use crate::assert_el_eq;
#[cfg(test)]
use crate::integer::int_coefficients;

#[test]
fn test_radical() {
    let poly_ring = DensePolyRing::new(Zn::new(5));
    let x_plus_1 = poly_ring.from_terms([(1, 0), (1, 1)]);
    let x2_plus_2 = poly_ring.from_terms([(2, 0), (1, 2)]);
    let f = poly_ring.mul(poly_ring.pow(x_plus_1.clone(), 3), x2_plus_2.clone());
    assert_el_eq!(&poly_ring, poly_ring.mul_ref(&x_plus_1, &x2_plus_2), radical(&poly_ring, &f));
    // X^5 - 1 = (X - 1)^5 has vanishing derivative
    let f = poly_ring.from_terms([(4, 0), (1, 5)]);
    assert_el_eq!(&poly_ring, poly_ring.from_terms([(4, 0), (1, 1)]), radical(&poly_ring, &f));
    assert_el_eq!(&poly_ring, x2_plus_2, radical(&poly_ring, &x2_plus_2));
}

#[test]
fn test_dedekind_cubic() {
    // the classical example of an index divisor, 2 splits completely but X^3 - X^2 - 2X - 8 = X^2 (X + 1) mod 2
    let f = int_coefficients([-8, -2, -1, 1]);
    assert_eq!(Some(true), divides_index(&f, 2));
    assert_eq!(Some(false), divides_index(&f, 503));
}

#[test]
fn test_divides_index() {
    // 2 is unramified in Q(sqrt(-3)), but Z[sqrt(-3)] has index 2
    assert_eq!(Some(true), divides_index(&int_coefficients([3, 0, 1]), 2));
    assert_eq!(Some(false), divides_index(&int_coefficients([3, 0, 1]), 3));
    assert_eq!(Some(false), divides_index(&int_coefficients([1, 0, 1]), 2));
    assert_eq!(Some(false), divides_index(&int_coefficients([-2, 0, 0, 1]), 2));
    assert_eq!(Some(false), divides_index(&int_coefficients([-2, 0, 0, 1]), 3));
    assert_eq!(Some(false), divides_index(&int_coefficients([1, -3, 0, 1]), 3));
    // X^4 + 8X + 12 has discriminant 2^12 3^4, but the field only 2^6 3^4
    assert_eq!(Some(true), divides_index(&int_coefficients([12, 8, 0, 0, 1]), 2));
    // 5X^2 + 1 generates the same order as X^2 + 5 locally at 2
    assert_eq!(Some(false), divides_index(&int_coefficients([1, 0, 5]), 2));
    assert_eq!(None, divides_index(&int_coefficients([-2, 0, 0, 1]), 9223372036854775837));
}
