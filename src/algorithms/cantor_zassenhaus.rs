use tracing::instrument;

use crate::ring::*;
use crate::rings::finite::FiniteField;
use crate::rings::poly::DensePolyRing;

use oorandom;

type Poly<R> = El<DensePolyRing<R>>;

///
/// Computes `g^(p^k) mod f`, where `p` is the characteristic of the base field.
///
/// `p^k` might be way too large for any primitive integer, hence we
/// iterate the `p`-th power map instead.
///
pub fn frobenius_power_mod_f<R>(poly_ring: &DensePolyRing<R>, mut g: Poly<R>, f: &Poly<R>, k: usize) -> Poly<R>
    where R: FiniteField
{
    let p = poly_ring.base_ring().characteristic();
    g = poly_ring.euclidean_rem(g, f);
    for _ in 0..k {
        g = poly_ring.pow_mod(g, p, f);
    }
    return g;
}

///
/// Returns whether the given nonzero polynomial is squarefree, i.e. has no repeated
/// factor over the algebraic closure of the base field.
///
pub fn is_squarefree<R>(poly_ring: &DensePolyRing<R>, f: &Poly<R>) -> bool
    where R: FiniteField
{
    assert!(!poly_ring.is_zero(f));
    if poly_ring.degree(f) == Some(0) {
        return true;
    }
    let derivative = poly_ring.derivative(f);
    if poly_ring.is_zero(&derivative) {
        return false;
    }
    return poly_ring.is_unit(&poly_ring.gcd(f.clone(), derivative));
}

///
/// Returns whether the given polynomial of positive degree is irreducible over the base field.
///
/// This uses Ben-Or's test, i.e. checks that `f` is coprime to `X^(q^i) - X` for all
/// `i <= deg(f) / 2`, where `q` is the size of the base field.
///
pub fn is_irreducible<R>(poly_ring: &DensePolyRing<R>, f: &Poly<R>) -> bool
    where R: FiniteField
{
    let n = poly_ring.degree(f).unwrap();
    assert!(n > 0);
    let e = poly_ring.base_ring().degree_over_prime_field();
    let mut x_power_q_mod_f = poly_ring.euclidean_rem(poly_ring.indeterminate(), f);
    for _ in 1..=(n / 2) {
        x_power_q_mod_f = frobenius_power_mod_f(poly_ring, x_power_q_mod_f, f, e);
        let fq_defining_poly_mod_f = poly_ring.sub_ref(&x_power_q_mod_f, &poly_ring.indeterminate());
        if !poly_ring.is_unit(&poly_ring.gcd(f.clone(), fq_defining_poly_mod_f)) {
            return false;
        }
    }
    return true;
}

///
/// Computes the distinct-degree factorization of a squarefree polynomial `f`, i.e.
/// returns a list whose `i`-th entry is the product of all monic irreducible factors
/// of `f` of degree `i`. The 0-th entry contains the remaining unit.
///
#[instrument(skip_all, level = "trace")]
pub fn distinct_degree_factorization<R>(poly_ring: &DensePolyRing<R>, mut f: Poly<R>) -> Vec<Poly<R>>
    where R: FiniteField
{
    assert!(!poly_ring.is_zero(&f));
    debug_assert!(is_squarefree(poly_ring, &f));
    let e = poly_ring.base_ring().degree_over_prime_field();
    let original_degree = poly_ring.degree(&f).unwrap();

    let mut result = Vec::new();
    result.push(poly_ring.one());
    let mut x_power_q_mod_f = poly_ring.indeterminate();
    while poly_ring.degree(&f) != Some(0) {
        assert!(result.len() <= original_degree, "distinct-degree factorization requires a squarefree polynomial");
        // technically, we could just compute gcd(f, X^(q^i) - X), however q^i might be
        // really large and eea will be very slow. Hence, we do the first modulo operation
        // X^(q^i) mod f using square-and-multiply in the ring F[X]/(f)
        x_power_q_mod_f = frobenius_power_mod_f(poly_ring, x_power_q_mod_f, &f, e);
        let fq_defining_poly_mod_f = poly_ring.sub_ref(&x_power_q_mod_f, &poly_ring.indeterminate());
        let deg_i_factor = poly_ring.gcd(f.clone(), fq_defining_poly_mod_f);
        f = poly_ring.euclidean_div(f, &deg_i_factor);
        result.push(deg_i_factor);
    }
    result[0] = poly_ring.mul_ref(&result[0], &f);
    return result;
}

///
/// Returns the degrees of the irreducible factors of the squarefree polynomial `f`,
/// in increasing order and with repetitions.
///
pub fn factor_degrees<R>(poly_ring: &DensePolyRing<R>, f: Poly<R>) -> Vec<usize>
    where R: FiniteField
{
    let mut result = Vec::new();
    for (d, factor_d) in distinct_degree_factorization(poly_ring, f).into_iter().enumerate().skip(1) {
        let degree = poly_ring.degree(&factor_d).unwrap();
        assert!(degree % d == 0);
        result.extend(std::iter::repeat(d).take(degree / d));
    }
    return result;
}

///
/// Uses the Cantor-Zassenhaus algorithm to find a nontrivial factor of a polynomial f
/// over a finite field `Fq`, that is squarefree and consists only of irreducible factors of
/// degree d.
///
/// # Algorithm
///
/// The algorithm relies on the fact that for some monic polynomial T over Fq have
/// ```text
/// T^Q - T = T (T^((Q - 1)/2) + 1) (T^((Q - 1)/2) - 1)
/// ```
/// where `Q = q^d`. Furthermore, the three factors are pairwise coprime.
/// Since `X^Q - X` divides `T^Q - T`, and f is squarefree (so divides `X^Q - X`),
/// we see that `f` also divides `T^Q - T` and so
/// ```text
/// f = gcd(T, f) gcd((T^((Q - 1)/2) + 1, f) gcd(T^((Q - 1)/2) - 1, f)
/// ```
/// The idea is now to choose a random T and check whether `gcd(T^((Q - 1)/2) - 1, f)`
/// gives a nontrivial factor of f. When f has two irreducible factors, with roots a, b
/// in FQ, then this works if exactly one of them maps to zero under the polynomial
/// `T^((Q - 1)/2) - 1`, which happens with probability about 1/2.
///
/// Since `Q` might not fit into a primitive integer, we use `Q = p^k` and
/// ```text
/// (Q - 1)/2 = (1 + p + ... + p^(k - 1)) (p - 1)/2
/// ```
/// to compute the power with exponents bounded by `p`.
///
/// In characteristic 2, the factorization above does not hold, and we use the trace
/// `T + T^2 + ... + T^(2^(k - 1))` instead, whose values on `FQ` are in `{0, 1}`.
///
#[allow(non_snake_case)]
pub fn cantor_zassenhaus<R>(poly_ring: &DensePolyRing<R>, f: Poly<R>, d: usize, rng: &mut oorandom::Rand64) -> Poly<R>
    where R: FiniteField
{
    let base_field = poly_ring.base_ring();
    let p = base_field.characteristic();
    assert!(poly_ring.degree(&f).unwrap() % d == 0);
    assert!(poly_ring.degree(&f).unwrap() > d);
    let k = base_field.degree_over_prime_field() * d;

    loop {
        let T = poly_ring.from_terms(
            (0..(2 * d)).map(|i| (base_field.random_element(|| rng.rand_u64()), i))
                .chain(Some((base_field.one(), 2 * d)))
        );
        let G = if p == 2 {
            let mut current = poly_ring.euclidean_rem(T, &f);
            let mut trace = current.clone();
            for _ in 1..k {
                current = poly_ring.pow_mod(current, 2, &f);
                poly_ring.add_assign_ref(&mut trace, &current);
            }
            trace
        } else {
            let mut current = poly_ring.euclidean_rem(T, &f);
            let mut norm_part = current.clone();
            for _ in 1..k {
                current = poly_ring.pow_mod(current, p, &f);
                norm_part = poly_ring.euclidean_rem(poly_ring.mul_ref(&norm_part, &current), &f);
            }
            poly_ring.sub(poly_ring.pow_mod(norm_part, (p - 1) / 2, &f), poly_ring.one())
        };
        let g = poly_ring.gcd(f.clone(), G);
        if !poly_ring.is_zero(&g) && !poly_ring.is_unit(&g) && poly_ring.degree(&g) != poly_ring.degree(&f) {
            return g;
        }
    }
}

///
/// Returns all roots of `f` in the base field, without multiplicity, sorted w.r.t.
/// [`FiniteField::cmp_el()`]. In particular, the result does not depend on the
/// random choices made during the computation.
///
#[instrument(skip_all, level = "trace")]
pub fn find_roots<R>(poly_ring: &DensePolyRing<R>, f: &Poly<R>) -> Vec<El<R>>
    where R: FiniteField
{
    assert!(!poly_ring.is_zero(f));
    let base_field = poly_ring.base_ring();
    if poly_ring.degree(f) == Some(0) {
        return Vec::new();
    }
    let f = poly_ring.normalize(f.clone());
    let e = base_field.degree_over_prime_field();
    let x_power_q_mod_f = frobenius_power_mod_f(poly_ring, poly_ring.indeterminate(), &f, e);
    let linear_part = poly_ring.gcd(f.clone(), poly_ring.sub(x_power_q_mod_f, poly_ring.indeterminate()));

    let mut rng = oorandom::Rand64::new(((base_field.characteristic() as u128) << 32) | e as u128);
    let mut result = Vec::new();
    let mut stack = vec![linear_part];
    while let Some(current) = stack.pop() {
        match poly_ring.degree(&current) {
            None | Some(0) => {},
            Some(1) => {
                let current = poly_ring.normalize(current);
                result.push(base_field.negate(current[0].clone()));
            },
            Some(_) => {
                let factor = poly_ring.normalize(cantor_zassenhaus(poly_ring, current.clone(), 1, &mut rng));
                stack.push(poly_ring.checked_div(&current, &factor).unwrap());
                stack.push(factor);
            }
        }
    }
    result.sort_by(|lhs, rhs| base_field.cmp_el(lhs, rhs));
    return result;
}

#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::assert_el_eq;

#[test]
fn test_is_squarefree() {
    let poly_ring = DensePolyRing::new(Zn::new(7));
    let f = poly_ring.from_terms([(1, 0), (1, 2)]);
    assert!(is_squarefree(&poly_ring, &f));
    assert!(!is_squarefree(&poly_ring, &poly_ring.mul_ref(&f, &f)));
    // X^7 - 1 = (X - 1)^7 in characteristic 7
    assert!(!is_squarefree(&poly_ring, &poly_ring.from_terms([(6, 0), (1, 7)])));
}

#[test]
fn test_is_irreducible() {
    let poly_ring = DensePolyRing::new(Zn::new(2));
    assert!(is_irreducible(&poly_ring, &poly_ring.from_terms([(1, 0), (1, 1), (1, 2)])));
    assert!(is_irreducible(&poly_ring, &poly_ring.from_terms([(1, 0), (1, 1), (1, 3)])));
    assert!(!is_irreducible(&poly_ring, &poly_ring.from_terms([(1, 0), (1, 2)])));
    // (X^2 + X + 1)^2
    assert!(!is_irreducible(&poly_ring, &poly_ring.from_terms([(1, 0), (1, 2), (1, 4)])));
}

#[test]
fn test_distinct_degree_factorization() {
    let field = Zn::new(2);
    let poly_ring = DensePolyRing::new(field);
    let a0 = poly_ring.one();
    let a1 = poly_ring.mul(poly_ring.indeterminate(), poly_ring.from_terms([(1, 0), (1, 1)]));
    let a2 = poly_ring.from_terms([(1, 0), (1, 1), (1, 2)]);
    let a3 = poly_ring.mul(poly_ring.from_terms([(1, 0), (1, 1), (1, 3)]), poly_ring.from_terms([(1, 0), (1, 2), (1, 3)]));
    let a = poly_ring.prod([&a0, &a1, &a2, &a3].into_iter().cloned());
    let expected = vec![a0, a1, a2, a3];
    let distinct_degree_factorization = distinct_degree_factorization(&poly_ring, a.clone());
    assert_eq!(expected.len(), distinct_degree_factorization.len());
    for (f, e) in distinct_degree_factorization.into_iter().zip(expected.into_iter()) {
        assert_el_eq!(&poly_ring, e, poly_ring.normalize(f));
    }
    assert_eq!(vec![1, 1, 2, 3, 3], factor_degrees(&poly_ring, a));
}

#[test]
fn test_cantor_zassenhaus() {
    let poly_ring = DensePolyRing::new(Zn::new(7));
    let f = poly_ring.from_terms([(1, 0), (1, 2)]);
    let g = poly_ring.from_terms([(3, 0), (1, 1), (1, 2)]);
    let p = poly_ring.mul_ref(&f, &g);
    let mut rng = oorandom::Rand64::new(1);
    let factor = poly_ring.normalize(cantor_zassenhaus(&poly_ring, p, 2, &mut rng));
    assert!(poly_ring.eq_el(&factor, &f) || poly_ring.eq_el(&factor, &g));
}

#[test]
fn test_cantor_zassenhaus_even() {
    let poly_ring = DensePolyRing::new(Zn::new(2));
    let f = poly_ring.from_terms([(1, 0), (1, 1), (1, 3)]);
    let g = poly_ring.from_terms([(1, 0), (1, 2), (1, 3)]);
    let p = poly_ring.mul_ref(&f, &g);
    let mut rng = oorandom::Rand64::new(1);
    let factor = poly_ring.normalize(cantor_zassenhaus(&poly_ring, p, 3, &mut rng));
    assert!(poly_ring.eq_el(&factor, &f) || poly_ring.eq_el(&factor, &g));
}

#[test]
fn test_find_roots() {
    let poly_ring = DensePolyRing::new(Zn::new(13));
    // (X - 2)(X - 5)(X - 11)^2 (X^2 + 2), and -2 is not a square mod 13
    let f = poly_ring.prod([
        poly_ring.from_terms([(11, 0), (1, 1)]),
        poly_ring.from_terms([(8, 0), (1, 1)]),
        poly_ring.from_terms([(2, 0), (1, 1)]),
        poly_ring.from_terms([(2, 0), (1, 1)]),
        poly_ring.from_terms([(2, 0), (1, 2)])
    ]);
    assert_eq!(vec![2, 5, 11], find_roots(&poly_ring, &f));
    assert_eq!(Vec::<u64>::new(), find_roots(&poly_ring, &poly_ring.from_terms([(2, 0), (1, 2)])));
}
