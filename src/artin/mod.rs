//!
//! Identifying the conjugacy class of Frobenius in the Galois group of a number field.
//!
//! For a good prime `p`, the cycle type of Frobenius (as permutation of the roots of the
//! defining polynomial) is given by the factorization of the defining polynomial modulo `p`.
//! In many cases, this already determines the conjugacy class, which is the technique `CYC`.
//! Otherwise, the classes of the same cycle type are distinguished by the value of an
//! invariant that lies in `Z`, computed modulo `p` from the roots of the defining polynomial
//! in `GF(p^d)`. The precomputed data for each field contains, for each such cycle type, a
//! list of integer polynomials, exactly one of which vanishes on this invariant. The
//! invariants are
//!  - `ALT`: a square root of the discriminant, with a sign depending on the class of Frobenius
//!    in the alternating group, see [`alt::AltInvariant`]
//!  - `RES`: the value of a resolvent, see [`res::ResInvariant`]
//!

pub mod records;
pub mod matcher;
pub mod roots;
pub mod alt;
pub mod res;
pub mod engine;
pub mod galois_group;
pub mod representation;
