//! Poseidon hash over a prime field.
//!
//! Implements the hash from <https://eprint.iacr.org/2019/458.pdf> as a
//! fixed-arity function: a `PoseidonConstants` object is derived once per
//! state width and then shared by any number of hash calls. Three permutation
//! variants are provided and produce identical digests:
//!
//! * [`HashMode::OptimizedStatic`] consumes pre-compressed round constants
//!   and a sparse-matrix schedule (the Neptune optimization, paper page 20).
//! * [`HashMode::OptimizedDynamic`] folds the raw constants through the
//!   inverse MDS matrix on the fly.
//! * [`HashMode::Correct`] is the textbook algorithm from the paper.
//!
//! All algorithms are generic over `ark_ff::PrimeField`; the BLS12-381
//! scalar field [`Fr`] is re-exported as the default instantiation.

pub mod field;
pub mod matrix;
pub mod mds;
pub mod poseidon;
pub mod preprocessing;
pub mod round_constants;
pub mod round_numbers;

pub use {
    ark_bls12_381::Fr,
    crate::poseidon::{hash, HashMode, PoseidonConstants},
};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("operands have incompatible dimensions")]
    DimensionMismatch,
    #[error("matrix is not square")]
    NonSquare,
    #[error("matrix is not invertible")]
    NonInvertible,
    #[error("computed number of full rounds is odd")]
    ParityError,
    #[error("input length {input} does not match hash width {width}")]
    WidthMismatch { input: usize, width: usize },
    #[error("sparse matrix interior is not the identity")]
    BadSparse,
    #[error("no secure round numbers within the search bounds")]
    RoundNumbersNotFound,
}
