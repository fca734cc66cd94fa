//! Error correction codes over finite fields.
//!
//! This module provides:
//! - `GaloisField`: GF(q^m) as a table of coefficient vectors
//! - `BinaryField`: GF(2^m) with exponent/log tables on bit-packed words
//! - `Polynomial`: polynomials over GF(2^m)
//! - `LinearCode`: Hamming-family codes in classic, shortened and extended form
//! - `SyndromeDecoder`: single-error and erasure correction for linear codes
//! - BCH codes with Berlekamp-Massey decoding and Chien search
//!
//! Fields and codes are immutable once built and can be shared between
//! threads; batch encoding and decoding run on `rayon`.
//!
//! # Examples
//!
//! ```rust
//! use galois_codes::ecc::{HammingCode, WordStatus};
//!
//! let code = HammingCode::standard_7_4().unwrap();
//! let mut received = code.encode_word(&[1, 0, 1, 0]).unwrap();
//! received[2] ^= 1;
//!
//! let decoded = code.decode_word(&received).unwrap();
//! assert_eq!(decoded.codeword, vec![1, 0, 1, 0, 1, 1, 0]);
//! assert!(matches!(decoded.status, WordStatus::Corrected { .. }));
//! ```

use crate::cs::error::Error;

/// Result type for error correction operations
pub type Result<T> = std::result::Result<T, Error>;

/// A block code mapping fixed-length data blocks to fixed-length codewords
pub trait BlockCode {
    /// Symbol type of data and codewords
    type Symbol;

    /// Number of symbols in a codeword
    fn code_length(&self) -> usize;

    /// Number of data symbols per codeword
    fn data_length(&self) -> usize;

    /// Encode one block of `data_length` symbols
    fn encode_block(&self, data: &[Self::Symbol]) -> Result<Vec<Self::Symbol>>;

    /// Code rate k/n
    fn rate(&self) -> f64 {
        self.data_length() as f64 / self.code_length() as f64
    }
}

/// BCH codes over GF(2^m)
pub mod bch;
/// Bit-packed GF(2^m)
pub mod binary_field;
/// GF(q^m) element tables
pub mod galois;
/// Hamming code presets and facade
pub mod hamming;
/// Parity-check and generator matrices of Hamming-family codes
pub mod linear_code;
pub mod matrix;
pub mod polynomial;
/// Syndrome decoding with erasures
pub mod syndrome;

pub use bch::{
    bch_decode, bch_encode, create_bch_15_7_2, create_bch_31_16_3, create_bch_code, BchAlgorithm,
    BchCode, BchDecoder, BchParams,
};
pub use binary_field::{BinaryField, DEFAULT_PRIMITIVE_POLYS};
pub use galois::{Element, GaloisField};
pub use hamming::{
    create_hamming, create_hamming_7_4, create_hamming_8_4, hamming_decode, hamming_encode,
    HammingCode, HammingParams,
};
pub use linear_code::{CodeVariant, LinearCode};
pub use polynomial::Polynomial;
pub use syndrome::{
    DecodedBatch, DecodedWord, SymbolError, SyndromeDecoder, WordStatus, ERASED,
};
