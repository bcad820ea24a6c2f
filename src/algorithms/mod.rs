///
/// Contains [`sqr_mul::generic_abs_square_and_multiply()`] for computing a power of an element in a
/// generic monoid.
/// 
pub mod sqr_mul;
///
/// Contains the Extended Euclidean Algorithm for polynomials over a field.
/// 
pub mod eea;
///
/// Contains an implementation of the Miller-Rabin primality test.
/// 
pub mod miller_rabin;
///
/// Contains an implementation of the Sieve of Erathostenes, for enumerating
/// all primes up to a given bound.
/// 
pub mod erathostenes;
///
/// Contains the Cantor-Zassenhaus algorithm and related algorithms for factoring
/// polynomials and finding their roots over finite fields.
/// 
pub mod cantor_zassenhaus;
///
/// Contains Dedekind's criterion, for deciding whether the factorization of a defining
/// polynomial modulo a prime describes how the prime splits.
/// 
pub mod dedekind;
