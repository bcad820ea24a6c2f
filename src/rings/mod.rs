
///
/// This module contains [`zn::Zn`], the prime field `Z/pZ` for a prime `p` that fits
/// into a `u64`.
/// 
pub mod zn;

///
/// This module contains [`poly::DensePolyRing`], the univariate polynomial ring `K[X]`
/// over a field `K`, with polynomials stored as dense coefficient vectors.
/// 
pub mod poly;

///
/// This module contains the trait [`finite::FiniteField`] for all fields with finitely many elements.
/// 
pub mod finite;

///
/// This module contains [`galois_field::GaloisField`], the finite field `GF(p^d)` as quotient
/// of `F_p[t]` by an irreducible polynomial.
/// 
pub mod galois_field;

///
/// An approximate implementation of the field of complex numbers `C`, using 64-bit floating point
/// numbers.
/// 
pub mod float_complex;
