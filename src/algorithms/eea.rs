use std::mem::swap;

use crate::ring::*;
use crate::rings::poly::DensePolyRing;

///
/// For polynomials a, b computes s, t, d such that `s*a + t*b == d` is a greatest 
/// common divisor of a and b. d is only unique up to units, and s, t 
/// are not unique at all. No guarantees are given on which
/// of these solutions is returned.
/// 
pub fn poly_eea<R>(fst: El<DensePolyRing<R>>, snd: El<DensePolyRing<R>>, poly_ring: &DensePolyRing<R>) -> (El<DensePolyRing<R>>, El<DensePolyRing<R>>, El<DensePolyRing<R>>)
    where R: Field
{
    let (mut a, mut b) = (fst, snd);

    let (mut sa, mut ta) = (poly_ring.one(), poly_ring.zero());
    let (mut sb, mut tb) = (poly_ring.zero(), poly_ring.one());

    while !poly_ring.is_zero(&b) {
        let (quo, rem) = poly_ring.euclidean_div_rem(a, &b);
        ta = poly_ring.sub(ta, poly_ring.mul_ref(&quo, &tb));
        sa = poly_ring.sub(sa, poly_ring.mul_ref(&quo, &sb));
        a = rem;

        swap(&mut a, &mut b);
        swap(&mut sa, &mut sb);
        swap(&mut ta, &mut tb);
    }
    return (sa, ta, a);
}

#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::assert_el_eq;

#[test]
fn test_poly_eea() {
    let poly_ring = DensePolyRing::new(Zn::new(13));
    let f = poly_ring.from_terms([(2, 0), (1, 3)]);
    let g = poly_ring.from_terms([(5, 0), (1, 1), (7, 2)]);
    let (s, t, d) = poly_eea(f.clone(), g.clone(), &poly_ring);
    assert_el_eq!(&poly_ring, d, poly_ring.add(poly_ring.mul_ref(&s, &f), poly_ring.mul_ref(&t, &g)));
    assert!(poly_ring.checked_div(&f, &d).is_some());
    assert!(poly_ring.checked_div(&g, &d).is_some());
}
