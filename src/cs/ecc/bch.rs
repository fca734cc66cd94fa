//! BCH (Bose-Chaudhuri-Hocquenghem) error correction code implementation.
//!
//! BCH codes are a class of cyclic error-correcting codes constructed using polynomials over finite fields.
//! Named after their inventors Raj Bose, Dwijendra Kumar Chaudhuri, and Alexis Hocquenghem, they are powerful
//! codes that can detect and correct multiple random errors.
//!
//! A binary BCH code of length `n` with designed capacity `t` has `α^b, ..., α^(b+2t-1)` among the
//! roots of its generator polynomial, where `α` generates GF(2^m) and `b` is the first consecutive
//! root. Decoding runs in four steps:
//!
//! 1. `2t` syndromes `S_i = r(α^i)` of the received word
//! 2. Berlekamp-Massey to find the error-locator polynomial `Λ(x)`
//! 3. Chien search: position `i` is in error when `Λ(α^(-i)) = 0`
//! 4. Flip the located bits
//!
//! # Examples
//!
//! ```
//! use galois_codes::ecc::bch::{BchDecoder, BchParams};
//!
//! let decoder = BchDecoder::new(BchParams::bch_15_7_2()).unwrap();
//! let codeword = decoder.code().encode(&[1, 0, 1, 1, 0, 0, 1]).unwrap();
//!
//! let mut received = codeword.clone();
//! received[3] ^= 1;
//! received[12] ^= 1;
//! let (corrected, errors) = decoder.decode(&received).unwrap();
//! assert_eq!(corrected, codeword);
//! assert_eq!(errors, 2);
//! ```

use crate::cs::ecc::binary_field::BinaryField;
use crate::cs::ecc::polynomial::Polynomial;
use crate::cs::ecc::{BlockCode, Result};
use crate::cs::error::Error;
use bitvec::prelude::*;
use std::fmt::{Display, Formatter};

/// BCH code parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BchParams {
    /// Code length, at most 2^m - 1
    pub n: usize,
    /// Data length, must equal `n - deg g(x)`
    pub k: usize,
    /// Designed error correction capability
    pub t: usize,
    /// Field order parameter (GF(2^m))
    pub m: usize,
    /// Primitive polynomial bit mask; `None` picks the default for `m`
    pub primitive_poly: Option<u32>,
    /// Exponent b of the first of the 2t consecutive generator roots
    pub first_consecutive_root: usize,
}

impl BchParams {
    /// BCH(15,7,2), narrow sense
    pub fn bch_15_7_2() -> Self {
        BchParams {
            n: 15,
            k: 7,
            t: 2,
            m: 4,
            primitive_poly: None,
            first_consecutive_root: 1,
        }
    }

    /// BCH(31,16,3), narrow sense
    pub fn bch_31_16_3() -> Self {
        BchParams {
            n: 31,
            k: 16,
            t: 3,
            m: 5,
            primitive_poly: None,
            first_consecutive_root: 1,
        }
    }

    /// BCH(31,10,5) with roots starting at α^0
    pub fn bch_31_10_5() -> Self {
        BchParams {
            n: 31,
            k: 10,
            t: 5,
            m: 5,
            primitive_poly: Some(0x25),
            first_consecutive_root: 0,
        }
    }
}

/// Algorithm used to find the error-locator polynomial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BchAlgorithm {
    #[default]
    BerlekampMassey,
}

/// Binary BCH code with its generator polynomial and systematic encoder
#[derive(Debug, Clone)]
pub struct BchCode {
    params: BchParams,
    field: BinaryField,
    /// Generator polynomial coefficients (0/1), lowest degree first
    generator: Vec<u32>,
}

impl BchCode {
    /// Create a new BCH code with the specified parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Code dimensions, field and first consecutive root
    ///
    /// # Returns
    ///
    /// A new `BchCode` instance or an error if invalid parameters
    pub fn new(params: BchParams) -> Result<Self> {
        let field = match params.primitive_poly {
            Some(poly) => BinaryField::new(params.m, poly)?,
            None => BinaryField::with_default_poly(params.m)?,
        };

        let group = field.group_order();
        if params.n == 0 || params.n > group {
            return Err(Error::InvalidInput(format!(
                "Code length must be between 1 and {}, got {}",
                group, params.n
            )));
        }
        if params.t == 0 {
            return Err(Error::InvalidInput(
                "Error correction capability must be positive".to_string(),
            ));
        }
        if 2 * params.t > params.n {
            return Err(Error::InvalidInput(format!(
                "Error correction capability too large: max is {}, got {}",
                params.n / 2,
                params.t
            )));
        }

        let generator = Self::generate_generator_polynomial(&field, &params)?;
        let degree = generator.len() - 1;
        if degree >= params.n || params.k != params.n - degree {
            return Err(Error::InvalidInput(format!(
                "Data length mismatch: generator degree {} gives k = {}, but requested {}",
                degree,
                params.n.saturating_sub(degree),
                params.k
            )));
        }

        log::debug!(
            "built BCH({},{},{}) over {} with generator degree {}",
            params.n,
            params.k,
            params.t,
            field,
            degree
        );

        Ok(BchCode {
            params,
            field,
            generator,
        })
    }

    /// Cyclotomic cosets modulo 2^m - 1 covering the exponents b..b+2t-1
    fn cyclotomic_cosets(group: usize, first: usize, count: usize) -> Vec<Vec<usize>> {
        let mut covered = vec![false; group];
        let mut cosets = Vec::new();

        for exponent in first..first + count {
            let start = exponent % group;
            if covered[start] {
                continue;
            }
            let mut coset = Vec::new();
            let mut x = start;
            while !covered[x] {
                covered[x] = true;
                coset.push(x);
                x = (2 * x) % group;
            }
            cosets.push(coset);
        }

        cosets
    }

    /// Product of the minimal polynomials of the required roots
    fn generate_generator_polynomial(field: &BinaryField, params: &BchParams) -> Result<Vec<u32>> {
        let cosets = Self::cyclotomic_cosets(
            field.group_order(),
            params.first_consecutive_root,
            2 * params.t,
        );

        let roots: Vec<u32> = cosets
            .iter()
            .flatten()
            .map(|&e| field.alpha_power(e as i64))
            .collect();
        let generator = Polynomial::from_roots(&roots, field)?;

        // Closed cosets always give a binary polynomial
        if generator.coefficients().iter().any(|&c| c > 1) {
            return Err(Error::InvalidInput(format!(
                "Generator polynomial {} is not binary",
                generator
            )));
        }
        Ok(generator.coefficients().to_vec())
    }

    pub fn params(&self) -> &BchParams {
        &self.params
    }

    pub fn field(&self) -> &BinaryField {
        &self.field
    }

    /// Get the code length (n)
    pub fn code_length(&self) -> usize {
        self.params.n
    }

    /// Get the data length (k)
    pub fn data_length(&self) -> usize {
        self.params.k
    }

    /// Get the error correction capability (t)
    pub fn error_correction_capability(&self) -> usize {
        self.params.t
    }

    /// Generator polynomial coefficients, lowest degree first
    pub fn generator_polynomial(&self) -> &[u32] {
        &self.generator
    }

    /// Encodes `k` data bits systematically.
    ///
    /// The codeword is `x^(n-k)·d(x) + (x^(n-k)·d(x) mod g(x))`, so parity
    /// bits occupy positions `[0, n-k)` and data bits `[n-k, n)`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        check_bits(data, self.params.k)?;
        let parity_len = self.params.n - self.params.k;

        let mut shifted = vec![0u32; self.params.n];
        for (i, &bit) in data.iter().enumerate() {
            shifted[parity_len + i] = bit as u32;
        }
        let message = Polynomial::new(shifted, &self.field)?;
        let generator = Polynomial::new(self.generator.clone(), &self.field)?;
        let (_, remainder) = message.divmod(&generator)?;

        let mut codeword = vec![0u8; self.params.n];
        for (i, bit) in codeword.iter_mut().enumerate().take(parity_len) {
            *bit = remainder.coefficient(i) as u8;
        }
        codeword[parity_len..].copy_from_slice(data);
        Ok(codeword)
    }

    /// Bit-packed variant of [`encode`](Self::encode)
    pub fn encode_bits(&self, data: &BitSlice<u8, Msb0>) -> Result<BitVec<u8, Msb0>> {
        let bits: Vec<u8> = data.iter().map(|bit| *bit as u8).collect();
        Ok(self.encode(&bits)?.into_iter().map(|b| b == 1).collect())
    }

    /// The data bits of a codeword
    pub fn extract_data(&self, codeword: &[u8]) -> Result<Vec<u8>> {
        check_bits(codeword, self.params.n)?;
        Ok(codeword[self.params.n - self.params.k..].to_vec())
    }
}

impl BlockCode for BchCode {
    type Symbol = u8;

    fn code_length(&self) -> usize {
        BchCode::code_length(self)
    }

    fn data_length(&self) -> usize {
        BchCode::data_length(self)
    }

    fn encode_block(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.encode(data)
    }
}

impl Display for BchCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BCH({},{},{}) over GF(2^{})",
            self.params.n, self.params.k, self.params.t, self.params.m
        )
    }
}

/// Algebraic decoder for a [`BchCode`]
#[derive(Debug, Clone)]
pub struct BchDecoder {
    code: BchCode,
}

impl BchDecoder {
    /// Builds the code and its decoder
    pub fn new(params: BchParams) -> Result<Self> {
        Ok(BchDecoder {
            code: BchCode::new(params)?,
        })
    }

    pub fn from_code(code: BchCode) -> Self {
        BchDecoder { code }
    }

    pub fn code(&self) -> &BchCode {
        &self.code
    }

    /// `S_i = r(α^i)` for `i` in `[b, b + 2t)`
    pub fn syndromes(&self, received: &[u8]) -> Result<Vec<u32>> {
        check_bits(received, self.code.params.n)?;
        let field = &self.code.field;
        let first = self.code.params.first_consecutive_root;

        Ok((first..first + 2 * self.code.params.t)
            .map(|i| {
                received
                    .iter()
                    .enumerate()
                    .filter(|&(_, &bit)| bit == 1)
                    .fold(0u32, |acc, (j, _)| {
                        field.add(acc, field.alpha_power((i * j) as i64))
                    })
            })
            .collect())
    }

    /// Berlekamp-Massey: the shortest LFSR `Λ(x)` generating the syndrome sequence
    pub fn error_locator(&self, syndromes: &[u32]) -> Result<Polynomial<'_>> {
        let field = &self.code.field;
        for &syndrome in syndromes {
            field.check_element(syndrome)?;
        }
        let mut locator = Polynomial::one(field);
        let mut previous = Polynomial::one(field);
        let mut length = 0usize;
        let mut gap = 1usize;
        let mut last_discrepancy = 1u32;

        for r in 0..syndromes.len() {
            let mut discrepancy = syndromes[r];
            for i in 1..=length.min(r) {
                discrepancy = field.add(
                    discrepancy,
                    field.multiply(locator.coefficient(i), syndromes[r - i]),
                );
            }

            if discrepancy == 0 {
                gap += 1;
                continue;
            }

            let factor = field.divide(discrepancy, last_discrepancy)?;
            let next = locator.sub(&previous.shift(gap).scale(factor)?);
            if 2 * length <= r {
                previous = locator;
                length = r + 1 - length;
                last_discrepancy = discrepancy;
                gap = 1;
            } else {
                gap += 1;
            }
            locator = next;
        }

        log::trace!("error locator {} (L = {})", locator, length);
        Ok(locator)
    }

    /// Positions `i < n` with `Λ(α^(-i)) = 0`.
    ///
    /// Shifting the syndrome window by `b` scales every error term by `X^b`
    /// and leaves the connection polynomial unchanged, so the search does not
    /// depend on the first consecutive root.
    pub fn chien_search(&self, locator: &Polynomial<'_>) -> Result<Vec<usize>> {
        let field = &self.code.field;
        let mut positions = Vec::new();
        for i in 0..self.code.params.n {
            if locator.evaluate(field.alpha_power(-(i as i64)))? == 0 {
                positions.push(i);
            }
        }
        Ok(positions)
    }

    /// Corrects up to `t` bit errors, returning the corrected word and the number of flipped bits
    pub fn decode(&self, received: &[u8]) -> Result<(Vec<u8>, usize)> {
        self.decode_with(received, BchAlgorithm::default())
    }

    pub fn decode_with(
        &self,
        received: &[u8],
        algorithm: BchAlgorithm,
    ) -> Result<(Vec<u8>, usize)> {
        let syndromes = self.syndromes(received)?;
        if syndromes.iter().all(|&s| s == 0) {
            return Ok((received.to_vec(), 0));
        }

        let locator = match algorithm {
            BchAlgorithm::BerlekampMassey => self.error_locator(&syndromes)?,
        };
        let positions = self.chien_search(&locator)?;

        let capacity = self.code.params.t;
        if positions.len() > capacity || positions.len() != locator.degree() {
            log::debug!(
                "{}: located {} roots of a degree {} locator, capacity {}",
                self.code,
                positions.len(),
                locator.degree(),
                capacity
            );
            return Err(Error::Uncorrectable {
                located: positions.len(),
                capacity,
            });
        }

        let mut corrected = received.to_vec();
        for &position in &positions {
            corrected[position] ^= 1;
        }
        log::trace!("{}: corrected positions {:?}", self.code, positions);
        Ok((corrected, positions.len()))
    }

    /// Bit-packed variant of [`decode`](Self::decode)
    pub fn decode_bits(&self, received: &BitSlice<u8, Msb0>) -> Result<(BitVec<u8, Msb0>, usize)> {
        let bits: Vec<u8> = received.iter().map(|bit| *bit as u8).collect();
        let (corrected, errors) = self.decode(&bits)?;
        Ok((corrected.into_iter().map(|b| b == 1).collect(), errors))
    }
}

/// Create a BCH decoder with specified parameters
pub fn create_bch_code(params: BchParams) -> Result<BchDecoder> {
    BchDecoder::new(params)
}

/// Create a standard (15,7,2) BCH code used in many applications
pub fn create_bch_15_7_2() -> Result<BchDecoder> {
    BchDecoder::new(BchParams::bch_15_7_2())
}

/// Create a standard (31,16,3) BCH code used in many applications
pub fn create_bch_31_16_3() -> Result<BchDecoder> {
    BchDecoder::new(BchParams::bch_31_16_3())
}

/// Encode data bits using BCH coding
pub fn bch_encode(data: &[u8], params: BchParams) -> Result<Vec<u8>> {
    BchCode::new(params)?.encode(data)
}

/// Decode a received word using BCH coding
pub fn bch_decode(received: &[u8], params: BchParams) -> Result<(Vec<u8>, usize)> {
    BchDecoder::new(params)?.decode(received)
}

/// Checks length and that every symbol is a bit
fn check_bits(bits: &[u8], expected: usize) -> Result<()> {
    if bits.len() != expected {
        return Err(Error::InvalidInput(format!(
            "Expected {} bits, got {}",
            expected,
            bits.len()
        )));
    }
    if bits.iter().any(|&b| b > 1) {
        return Err(Error::InvalidInput(
            "Binary symbols must be 0 or 1".to_string(),
        ));
    }
    Ok(())
}
