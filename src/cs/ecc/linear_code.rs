//! Systematic Hamming-family linear codes over GF(q).
//!
//! The parity-check matrix of the base `(n, k)` code is `H = [P | I_r]` with
//! `r = n - k`. Column `j < k` holds the coefficients of `x^(r+j)` with the
//! highest-degree coefficient in the top row, column `k + i` is the unit
//! vector `e_i`. Together these are the first `n` nonzero powers of the
//! field generator, so no column is a scalar multiple of another as long as
//! `n <= (q^r - 1) / (q - 1)`.
//!
//! The generator is `G = [I_k | -Pᵀ]`, which makes `H · Gᵀ ≡ 0 (mod q)` and
//! places the information symbols at the front of every codeword.
//!
//! Variants change what goes on the wire:
//!
//! - `Classic`: the base code
//! - `Shortened { removed }`: the first `removed` information positions are
//!   fixed to zero and never transmitted
//! - `Extended`: an overall parity symbol `-Σ c_i mod q` is appended

use crate::cs::ecc::galois::GaloisField;
use crate::cs::ecc::matrix::{dot_mod, is_zero, mat_mul_mod};
use crate::cs::ecc::{BlockCode, Result};
use crate::cs::error::Error;
use ndarray::{s, Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;
use std::sync::Arc;

/// How the base code is adapted for transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeVariant {
    /// The base `(n, k)` code
    Classic,
    /// `(n - removed, k - removed)` code obtained by dropping leading information positions
    Shortened { removed: usize },
    /// `(n + 1, k)` code with an overall parity symbol
    Extended,
}

/// A systematic linear code together with its parity-check and generator matrices.
#[derive(Debug, Clone)]
pub struct LinearCode {
    field: Arc<GaloisField>,
    variant: CodeVariant,
    /// Base code length n
    n: usize,
    /// Base information length k
    k: usize,
    base_parity_check: Array2<u32>,
    base_generator: Array2<u32>,
    /// Matrices for the symbols actually transmitted
    parity_check: Array2<u32>,
    generator: Array2<u32>,
}

impl LinearCode {
    /// Creates a linear code over `field`.
    ///
    /// # Arguments
    ///
    /// * `field` - Field whose extension degree equals the redundancy `n - k`
    /// * `n` - Base code length
    /// * `k` - Base information length
    /// * `variant` - Wire adaptation of the base code
    ///
    /// # Returns
    ///
    /// The code, or an error if the parameters do not describe a Hamming-family code
    pub fn new(field: Arc<GaloisField>, n: usize, k: usize, variant: CodeVariant) -> Result<Self> {
        if k == 0 || k >= n {
            return Err(Error::InvalidInput(format!(
                "Data length must be in [1, {}), got {}",
                n, k
            )));
        }
        let r = n - k;
        if field.degree() != r {
            return Err(Error::IncorrectDegree(field.degree()));
        }

        let q = field.characteristic() as usize;
        let max_length = (field.order() - 1) / (q - 1);
        if n > max_length {
            return Err(Error::InvalidInput(format!(
                "Code length {} exceeds {} for redundancy {} over GF({})",
                n, max_length, r, q
            )));
        }

        if let CodeVariant::Shortened { removed } = variant {
            if removed >= k {
                return Err(Error::InvalidShortening { removed, limit: k });
            }
        }

        let base_parity_check = build_parity_check(&field, n, r);
        let base_generator = build_generator(base_parity_check.view(), field.characteristic())?;
        check_orthogonality(
            base_parity_check.view(),
            base_generator.view(),
            field.characteristic(),
        )?;

        let (parity_check, generator) = match variant {
            CodeVariant::Classic => (base_parity_check.clone(), base_generator.clone()),
            CodeVariant::Shortened { removed } => (
                base_parity_check.slice(s![.., removed..]).to_owned(),
                base_generator.slice(s![removed.., removed..]).to_owned(),
            ),
            CodeVariant::Extended => (
                extend_parity_check(base_parity_check.view()),
                extend_generator(base_generator.view(), field.characteristic()),
            ),
        };
        check_orthogonality(parity_check.view(), generator.view(), field.characteristic())?;

        log::debug!(
            "built {:?} linear code (n={}, k={}) over GF({}^{})",
            variant,
            n,
            k,
            field.characteristic(),
            field.degree()
        );

        Ok(LinearCode {
            field,
            variant,
            n,
            k,
            base_parity_check,
            base_generator,
            parity_check,
            generator,
        })
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    /// Alphabet size q
    pub fn characteristic(&self) -> u32 {
        self.field.characteristic()
    }

    pub fn variant(&self) -> CodeVariant {
        self.variant
    }

    /// Length of a transmitted codeword
    pub fn code_length(&self) -> usize {
        match self.variant {
            CodeVariant::Classic => self.n,
            CodeVariant::Shortened { removed } => self.n - removed,
            CodeVariant::Extended => self.n + 1,
        }
    }

    /// Number of information symbols per codeword
    pub fn data_length(&self) -> usize {
        match self.variant {
            CodeVariant::Shortened { removed } => self.k - removed,
            _ => self.k,
        }
    }

    /// Number of parity symbols on the wire
    pub fn redundancy(&self) -> usize {
        self.code_length() - self.data_length()
    }

    /// Length n of the base code before shortening or extension
    pub fn base_length(&self) -> usize {
        self.n
    }

    /// Information length k of the base code
    pub fn base_data_length(&self) -> usize {
        self.k
    }

    /// Parity-check matrix for the transmitted symbols
    pub fn parity_check(&self) -> ArrayView2<'_, u32> {
        self.parity_check.view()
    }

    /// Generator matrix for the transmitted symbols
    pub fn generator(&self) -> ArrayView2<'_, u32> {
        self.generator.view()
    }

    /// The full `r × n` parity-check matrix of the base code
    pub fn base_parity_check(&self) -> ArrayView2<'_, u32> {
        self.base_parity_check.view()
    }

    pub fn base_generator(&self) -> ArrayView2<'_, u32> {
        self.base_generator.view()
    }

    /// Guaranteed minimum distance; the overall parity symbol only adds one over GF(2)
    pub fn minimum_distance(&self) -> usize {
        match self.variant {
            CodeVariant::Extended if self.characteristic() == 2 => 4,
            _ => 3,
        }
    }

    /// Encodes one information word.
    pub fn encode_word(&self, word: &[u32]) -> Result<Vec<u32>> {
        self.check_symbols(word, self.data_length(), "Information word")?;
        let q = self.characteristic();
        let word = ArrayView1::from(word);

        match self.variant {
            CodeVariant::Extended => {
                let g = self.base_generator.view();
                let mut codeword: Vec<u32> =
                    (0..self.n).map(|j| dot_mod(word, g.column(j), q)).collect();
                codeword.push(overall_parity(&codeword, q));
                Ok(codeword)
            }
            _ => {
                let g = self.generator.view();
                Ok((0..g.ncols()).map(|j| dot_mod(word, g.column(j), q)).collect())
            }
        }
    }

    /// Encodes a batch of information words; output rows follow input order.
    pub fn encode(&self, words: &[Vec<u32>]) -> Result<Vec<Vec<u32>>> {
        words.par_iter().map(|word| self.encode_word(word)).collect()
    }

    /// Returns the information symbols of a codeword
    pub fn extract_info(&self, codeword: &[u32]) -> Result<Vec<u32>> {
        if codeword.len() != self.code_length() {
            return Err(Error::InvalidInput(format!(
                "Codeword length must be {}, got {}",
                self.code_length(),
                codeword.len()
            )));
        }
        Ok(codeword[..self.data_length()].to_vec())
    }

    /// Checks that `word` has `expected` symbols, all in `[0, q)`
    fn check_symbols(&self, word: &[u32], expected: usize, what: &str) -> Result<()> {
        if word.len() != expected {
            return Err(Error::InvalidInput(format!(
                "{} length must be {}, got {}",
                what,
                expected,
                word.len()
            )));
        }
        let q = self.characteristic();
        if let Some(&symbol) = word.iter().find(|&&s| s >= q) {
            return Err(Error::InvalidInput(format!(
                "Symbol {} is outside [0, {})",
                symbol, q
            )));
        }
        Ok(())
    }
}

impl BlockCode for LinearCode {
    type Symbol = u32;

    fn code_length(&self) -> usize {
        LinearCode::code_length(self)
    }

    fn data_length(&self) -> usize {
        LinearCode::data_length(self)
    }

    fn encode_block(&self, data: &[u32]) -> Result<Vec<u32>> {
        self.encode_word(data)
    }
}

/// `-Σ symbols mod q`
pub(crate) fn overall_parity(symbols: &[u32], q: u32) -> u32 {
    let sum = symbols.iter().map(|&c| c as u64).sum::<u64>() % q as u64;
    ((q as u64 - sum) % q as u64) as u32
}

/// Builds the `r × n` Hamming parity-check matrix `[P | I_r]`.
pub fn build_parity_check(field: &GaloisField, n: usize, r: usize) -> Array2<u32> {
    let k = n - r;
    let mut h = Array2::<u32>::zeros((r, n));
    for j in 0..k {
        let column = field.vector(field.primitive_power((r + j) as i64));
        for i in 0..r {
            h[[i, j]] = column[r - 1 - i];
        }
    }
    for i in 0..r {
        h[[i, k + i]] = 1;
    }
    h
}

/// Derives `G = [I_k | -Pᵀ]` from a parity-check matrix `[P | I_r]`.
pub fn build_generator(h: ArrayView2<'_, u32>, q: u32) -> Result<Array2<u32>> {
    let (r, n) = h.dim();
    if r == 0 || r >= n {
        return Err(Error::ShapeOrOrthogonality(format!(
            "parity-check matrix has shape {}x{}",
            r, n
        )));
    }
    let k = n - r;
    let tail = h.slice(s![.., k..]);
    if tail != Array2::<u32>::eye(r) {
        return Err(Error::ShapeOrOrthogonality(
            "parity-check matrix does not end in an identity block".to_string(),
        ));
    }

    let mut g = Array2::<u32>::zeros((k, n));
    for i in 0..k {
        g[[i, i]] = 1;
        for j in 0..r {
            g[[i, k + j]] = (q - h[[j, i]] % q) % q;
        }
    }
    Ok(g)
}

/// Fails unless `H · Gᵀ ≡ 0 (mod q)`
pub fn check_orthogonality(h: ArrayView2<'_, u32>, g: ArrayView2<'_, u32>, q: u32) -> Result<()> {
    if h.ncols() != g.ncols() {
        return Err(Error::ShapeOrOrthogonality(format!(
            "H has {} columns but G has {}",
            h.ncols(),
            g.ncols()
        )));
    }
    if !is_zero(mat_mul_mod(h, g.t(), q).view()) {
        return Err(Error::ShapeOrOrthogonality(
            "H · Gᵀ is not zero".to_string(),
        ));
    }
    Ok(())
}

/// `[[H, 0], [1 … 1, 1]]`
fn extend_parity_check(h: ArrayView2<'_, u32>) -> Array2<u32> {
    let (r, n) = h.dim();
    let mut extended = Array2::<u32>::zeros((r + 1, n + 1));
    extended.slice_mut(s![..r, ..n]).assign(&h);
    extended.row_mut(r).fill(1);
    extended
}

/// Appends the column `-Σ row` to every generator row
fn extend_generator(g: ArrayView2<'_, u32>, q: u32) -> Array2<u32> {
    let (k, n) = g.dim();
    let mut extended = Array2::<u32>::zeros((k, n + 1));
    extended.slice_mut(s![.., ..n]).assign(&g);
    for (i, row) in g.rows().into_iter().enumerate() {
        extended[[i, n]] = overall_parity(&row.to_vec(), q);
    }
    extended
}
