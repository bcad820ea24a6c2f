#![allow(non_snake_case)]

//!
//! Identifies the conjugacy class of the Frobenius element at a prime `p` in the Galois
//! group of a number field, using precomputed per-field data, and uses this to compute
//! the Euler factors and Dirichlet coefficients of Artin L-functions.
//!
//! The main entry points are [`artin::galois_group::NumberFieldGaloisGroup`] and
//! [`artin::representation::ArtinRepresentation`]. The finite field arithmetic they rely
//! on is in [`rings`] and [`algorithms`].
//!

#[macro_use]
pub mod ring;
pub mod integer;
pub mod algorithms;
pub mod rings;
pub mod permutation;
pub mod error;
pub mod artin;
pub mod tracing;
