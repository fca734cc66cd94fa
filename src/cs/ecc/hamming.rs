//! Hamming codes over GF(q).
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! A Hamming code with `r` parity symbols corrects any single symbol error. The extended variant
//! appends an overall parity symbol and additionally detects double errors, the shortened variant
//! trades information symbols for a shorter block.
//!
//! This module pairs a [`LinearCode`] with its [`SyndromeDecoder`] and provides named parameter
//! sets for the common configurations:
//!
//! - (7,4) binary Hamming code
//! - (8,4) extended binary Hamming code
//! - (6,3) shortened binary Hamming code
//! - (15,11) binary Hamming code
//! - (4,2) ternary code and its (5,2) extension
//! - (6,4) quinary Hamming code
//!
//! # Applications
//!
//! - Computer memory (ECC RAM)
//! - Satellite communications
//! - Data storage systems

use crate::cs::ecc::galois::GaloisField;
use crate::cs::ecc::linear_code::{CodeVariant, LinearCode};
use crate::cs::ecc::syndrome::{DecodedBatch, DecodedWord, SyndromeDecoder};
use crate::cs::ecc::{BlockCode, Result};
use crate::cs::error::Error;
use std::sync::Arc;

/// Parameters of a Hamming-family code.
///
/// `code_length` and `data_length` describe the base code; the variant
/// decides what is transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HammingParams {
    /// Prime alphabet size q
    pub characteristic: u32,
    /// Primitive polynomial of degree `code_length - data_length`, lowest degree first
    pub modulus: Vec<u32>,
    pub code_length: usize,
    pub data_length: usize,
    pub variant: CodeVariant,
}

impl HammingParams {
    /// Binary (7,4) code from `1 + x^2 + x^3`
    pub fn hamming_7_4() -> Self {
        HammingParams {
            characteristic: 2,
            modulus: vec![1, 0, 1, 1],
            code_length: 7,
            data_length: 4,
            variant: CodeVariant::Classic,
        }
    }

    /// (8,4) extension of the (7,4) code
    pub fn extended_8_4() -> Self {
        HammingParams {
            variant: CodeVariant::Extended,
            ..Self::hamming_7_4()
        }
    }

    /// (6,3) shortening of the (7,4) code
    pub fn shortened_6_3() -> Self {
        HammingParams {
            variant: CodeVariant::Shortened { removed: 1 },
            ..Self::hamming_7_4()
        }
    }

    /// Binary (15,11) code from `1 + x + x^4`
    pub fn hamming_15_11() -> Self {
        HammingParams {
            characteristic: 2,
            modulus: vec![1, 1, 0, 0, 1],
            code_length: 15,
            data_length: 11,
            variant: CodeVariant::Classic,
        }
    }

    /// Ternary (4,2) code from `2 + x + x^2`
    pub fn ternary_4_2() -> Self {
        HammingParams {
            characteristic: 3,
            modulus: vec![2, 1, 1],
            code_length: 4,
            data_length: 2,
            variant: CodeVariant::Classic,
        }
    }

    /// (5,2) extension of the ternary (4,2) code; still distance 3
    pub fn ternary_extended_5_2() -> Self {
        HammingParams {
            variant: CodeVariant::Extended,
            ..Self::ternary_4_2()
        }
    }

    /// Quinary (6,4) code from `2 + x + x^2`
    pub fn quinary_6_4() -> Self {
        HammingParams {
            characteristic: 5,
            modulus: vec![2, 1, 1],
            code_length: 6,
            data_length: 4,
            variant: CodeVariant::Classic,
        }
    }
}

impl Default for HammingParams {
    fn default() -> Self {
        Self::hamming_7_4()
    }
}

/// A Hamming code ready to encode and decode.
#[derive(Debug, Clone)]
pub struct HammingCode {
    code: Arc<LinearCode>,
    decoder: SyndromeDecoder,
}

impl HammingCode {
    /// Creates a Hamming code.
    ///
    /// # Arguments
    ///
    /// * `params` - Field, base code dimensions and variant
    ///
    /// # Returns
    ///
    /// A new `HammingCode` instance or an error if invalid parameters
    pub fn new(params: &HammingParams) -> Result<Self> {
        if params.modulus.is_empty() {
            return Err(Error::IncorrectPolynomial(
                "modulus has no coefficients".to_string(),
            ));
        }
        let field = GaloisField::new(
            params.characteristic,
            params.modulus.len() - 1,
            &params.modulus,
        )?;
        Self::from_field(
            Arc::new(field),
            params.code_length,
            params.data_length,
            params.variant,
        )
    }

    /// Creates a Hamming code over an existing field
    pub fn from_field(
        field: Arc<GaloisField>,
        code_length: usize,
        data_length: usize,
        variant: CodeVariant,
    ) -> Result<Self> {
        let code = Arc::new(LinearCode::new(field, code_length, data_length, variant)?);
        let decoder = SyndromeDecoder::new(Arc::clone(&code));
        Ok(HammingCode { code, decoder })
    }

    /// Creates a standard (7,4) Hamming code
    pub fn standard_7_4() -> Result<Self> {
        Self::new(&HammingParams::hamming_7_4())
    }

    /// Creates an extended (8,4) Hamming code
    pub fn extended_8_4() -> Result<Self> {
        Self::new(&HammingParams::extended_8_4())
    }

    /// Creates a shortened (6,3) Hamming code
    pub fn shortened_6_3() -> Result<Self> {
        Self::new(&HammingParams::shortened_6_3())
    }

    pub fn code(&self) -> &LinearCode {
        &self.code
    }

    pub fn decoder(&self) -> &SyndromeDecoder {
        &self.decoder
    }

    /// Gets the transmitted codeword length
    pub fn code_length(&self) -> usize {
        self.code.code_length()
    }

    /// Gets the number of information symbols per codeword
    pub fn data_length(&self) -> usize {
        self.code.data_length()
    }

    pub fn encode_word(&self, word: &[u32]) -> Result<Vec<u32>> {
        self.code.encode_word(word)
    }

    /// Encodes one information word per row
    pub fn encode(&self, words: &[Vec<u32>]) -> Result<Vec<Vec<u32>>> {
        self.code.encode(words)
    }

    pub fn decode_word(&self, received: &[u32]) -> Result<DecodedWord> {
        self.decoder.decode_word(received)
    }

    /// Decodes one received word per row, correcting single errors and erasures
    pub fn decode(&self, received: &[Vec<u32>]) -> Result<DecodedBatch> {
        self.decoder.decode(received)
    }

    /// Decodes with explicit erasure positions for every row
    pub fn decode_with_erasures(
        &self,
        received: &[Vec<u32>],
        erasures: &[Vec<usize>],
    ) -> Result<DecodedBatch> {
        self.decoder.decode_with_erasures(received, erasures)
    }
}

impl BlockCode for HammingCode {
    type Symbol = u32;

    fn code_length(&self) -> usize {
        HammingCode::code_length(self)
    }

    fn data_length(&self) -> usize {
        HammingCode::data_length(self)
    }

    fn encode_block(&self, data: &[u32]) -> Result<Vec<u32>> {
        self.encode_word(data)
    }
}

/// Creates a standard (7,4) Hamming code
pub fn create_hamming_7_4() -> Result<HammingCode> {
    HammingCode::standard_7_4()
}

/// Creates an extended (8,4) Hamming code
pub fn create_hamming_8_4() -> Result<HammingCode> {
    HammingCode::extended_8_4()
}

/// Creates a Hamming code with custom parameters
pub fn create_hamming(params: &HammingParams) -> Result<HammingCode> {
    HammingCode::new(params)
}

/// Encodes information words using the standard (7,4) Hamming code
pub fn hamming_encode(words: &[Vec<u32>]) -> Result<Vec<Vec<u32>>> {
    create_hamming_7_4()?.encode(words)
}

/// Decodes words using the standard (7,4) Hamming code, returning `(info, codewords)`
pub fn hamming_decode(received: &[Vec<u32>]) -> Result<(Vec<Vec<u32>>, Vec<Vec<u32>>)> {
    Ok(create_hamming_7_4()?.decode(received)?.into_parts())
}
