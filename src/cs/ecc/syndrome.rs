//! Syndrome decoding with single-error and erasure correction.
//!
//! Each received word goes through the same steps:
//!
//! 1. Erased symbols are set to zero and the syndrome `s = H · y` is computed.
//! 2. If symbols are erased, `H_E · x = -s (mod q)` is solved for the erased
//!    values, where `H_E` holds the columns of `H` at the erased positions.
//!    Without a unique solution the unresolved symbols stay zero, the
//!    remaining steps still run and the word is reported as uncorrectable.
//! 3. The syndrome is recomputed. Zero means the word is a codeword.
//! 4. Otherwise the first column `j` and scalar `a` with `s = a · H[:, j]`
//!    identify a single error of magnitude `a` at position `j`.
//! 5. If no column matches, more than one symbol is wrong and the word is
//!    reported as detected but not corrected.
//!
//! Received symbols `>= q` are erasures; [`ERASED`] is the canonical marker.

use crate::cs::ecc::galois::mod_inverse;
use crate::cs::ecc::linear_code::{overall_parity, CodeVariant, LinearCode};
use crate::cs::ecc::matrix::{mat_vec_mod, solve_mod};
use crate::cs::ecc::Result;
use crate::cs::error::Error;
use ndarray::{Array2, Axis};
use rayon::prelude::*;
use std::sync::Arc;

/// Marker for an erased symbol in a received word
pub const ERASED: u32 = u32::MAX;

/// A located symbol error in wire coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolError {
    pub position: usize,
    /// Value that was added to the transmitted symbol
    pub magnitude: u32,
}

/// Outcome of decoding one word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordStatus {
    /// Received word was a codeword and nothing was erased
    Clean,
    /// Erasures were filled in and/or one symbol error was fixed
    Corrected {
        erasures: usize,
        error: Option<SymbolError>,
    },
    /// Errors detected that no single-symbol correction explains; word left unmodified
    DetectionOnly,
    /// Erasures not uniquely recoverable, or the error sits outside the transmitted symbols.
    ///
    /// With unresolved erasures the codeword is the best-effort vector: erased
    /// symbols hold zero unless the single-error step changed them. A located
    /// error at a removed position leaves the received word unmodified.
    Uncorrectable,
}

impl WordStatus {
    /// True for `Clean` and `Corrected`
    pub fn is_valid(&self) -> bool {
        matches!(self, WordStatus::Clean | WordStatus::Corrected { .. })
    }
}

/// One decoded word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWord {
    pub info: Vec<u32>,
    pub codeword: Vec<u32>,
    pub status: WordStatus,
}

/// Decoded rows, one entry per received row in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedBatch {
    pub info: Vec<Vec<u32>>,
    pub codewords: Vec<Vec<u32>>,
    pub statuses: Vec<WordStatus>,
}

impl DecodedBatch {
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Splits into the decoded information rows and corrected codeword rows
    pub fn into_parts(self) -> (Vec<Vec<u32>>, Vec<Vec<u32>>) {
        (self.info, self.codewords)
    }
}

impl FromIterator<DecodedWord> for DecodedBatch {
    fn from_iter<I: IntoIterator<Item = DecodedWord>>(iter: I) -> Self {
        let mut batch = DecodedBatch::default();
        for word in iter {
            batch.info.push(word.info);
            batch.codewords.push(word.codeword);
            batch.statuses.push(word.status);
        }
        batch
    }
}

/// Result of the single-error search
enum Located {
    Nothing,
    Fixed(SymbolError),
    NotFound,
    /// Base-code position that is never transmitted
    Punctured(usize),
}

/// Decoder for the words of one [`LinearCode`].
///
/// Shortened words are decoded in the base code by prepending the removed
/// zero symbols; extended words are checked against the parity-check matrix
/// with the extra all-ones row.
#[derive(Debug, Clone)]
pub struct SyndromeDecoder {
    code: Arc<LinearCode>,
    check_matrix: Array2<u32>,
    /// Leading base positions absent from the wire
    punctured: usize,
}

impl SyndromeDecoder {
    pub fn new(code: Arc<LinearCode>) -> Self {
        let (check_matrix, punctured) = match code.variant() {
            CodeVariant::Classic => (code.base_parity_check().to_owned(), 0),
            CodeVariant::Shortened { removed } => (code.base_parity_check().to_owned(), removed),
            CodeVariant::Extended => (code.parity_check().to_owned(), 0),
        };
        SyndromeDecoder {
            code,
            check_matrix,
            punctured,
        }
    }

    pub fn code(&self) -> &LinearCode {
        &self.code
    }

    /// Syndrome of a complete wire word (no erasures)
    pub fn syndrome(&self, received: &[u32]) -> Result<Vec<u32>> {
        self.validate(received, &[])?;
        let q = self.code.characteristic();
        if let Some(&symbol) = received.iter().find(|&&s| s >= q) {
            return Err(Error::InvalidInput(format!(
                "Symbol {} is outside [0, {})",
                symbol, q
            )));
        }
        Ok(mat_vec_mod(
            self.check_matrix.view(),
            &self.embed(received, &[]),
            q,
        ))
    }

    /// Decodes one received word; symbols `>= q` count as erasures
    pub fn decode_word(&self, received: &[u32]) -> Result<DecodedWord> {
        self.decode_word_with_erasures(received, &[])
    }

    /// Decodes one received word with additional erased positions
    pub fn decode_word_with_erasures(
        &self,
        received: &[u32],
        erasures: &[usize],
    ) -> Result<DecodedWord> {
        self.validate(received, erasures)?;
        self.decode_checked(received, erasures)
    }

    /// Decodes a batch of received words in parallel
    pub fn decode(&self, rows: &[Vec<u32>]) -> Result<DecodedBatch> {
        for row in rows {
            self.validate(row, &[])?;
        }
        let words = rows
            .par_iter()
            .map(|row| self.decode_checked(row, &[]))
            .collect::<Result<Vec<_>>>()?;
        Ok(words.into_iter().collect())
    }

    /// Decodes a batch with one erasure-position list per row
    pub fn decode_with_erasures(
        &self,
        rows: &[Vec<u32>],
        erasures: &[Vec<usize>],
    ) -> Result<DecodedBatch> {
        if erasures.len() != rows.len() {
            return Err(Error::InvalidInput(format!(
                "Got {} erasure lists for {} rows",
                erasures.len(),
                rows.len()
            )));
        }
        for (row, positions) in rows.iter().zip(erasures) {
            self.validate(row, positions)?;
        }
        let words = rows
            .par_iter()
            .zip(erasures.par_iter())
            .map(|(row, positions)| self.decode_checked(row, positions))
            .collect::<Result<Vec<_>>>()?;
        Ok(words.into_iter().collect())
    }

    fn validate(&self, received: &[u32], erasures: &[usize]) -> Result<()> {
        let length = self.code.code_length();
        if received.len() != length {
            return Err(Error::InvalidInput(format!(
                "Received word length must be {}, got {}",
                length,
                received.len()
            )));
        }
        if let Some(&position) = erasures.iter().find(|&&p| p >= length) {
            return Err(Error::InvalidInput(format!(
                "Erasure position {} is outside a word of length {}",
                position, length
            )));
        }
        Ok(())
    }

    /// Prepends punctured zeros and zeroes erased symbols
    fn embed(&self, received: &[u32], erased: &[usize]) -> Vec<u32> {
        let q = self.code.characteristic();
        let mut word = vec![0u32; self.punctured];
        word.extend(received.iter().map(|&s| if s >= q { 0 } else { s }));
        for &position in erased {
            word[position + self.punctured] = 0;
        }
        word
    }

    fn decode_checked(&self, received: &[u32], explicit: &[usize]) -> Result<DecodedWord> {
        let q = self.code.characteristic();

        let mut erased: Vec<usize> = received
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s >= q)
            .map(|(i, _)| i)
            .chain(explicit.iter().copied())
            .collect();
        erased.sort_unstable();
        erased.dedup();

        let mut word = self.embed(received, &erased);

        let resolved = if erased.is_empty() {
            true
        } else {
            let columns: Vec<usize> = erased.iter().map(|&p| p + self.punctured).collect();
            self.fill_erasures(&mut word, &columns)?
        };

        let located = self.locate_error(&mut word)?;
        if !resolved {
            // Unresolved erasures stay at zero; whatever the search produced is not unique
            if let Located::Fixed(error) = &located {
                log::trace!(
                    "fall-through moved symbol {} by {} with erasures unresolved",
                    error.position,
                    error.magnitude
                );
            }
            return Ok(self.finish(word, WordStatus::Uncorrectable));
        }

        let erasures = erased.len();
        let status = match located {
            Located::Nothing if erasures == 0 => WordStatus::Clean,
            Located::Nothing => WordStatus::Corrected {
                erasures,
                error: None,
            },
            Located::Fixed(error) => {
                log::trace!(
                    "corrected symbol {} by {} ({} erasures)",
                    error.position,
                    error.magnitude,
                    erasures
                );
                WordStatus::Corrected {
                    erasures,
                    error: Some(error),
                }
            }
            Located::NotFound => {
                log::trace!("syndrome matches no single error, detection only");
                return Ok(self.unmodified(received, WordStatus::DetectionOnly));
            }
            Located::Punctured(position) => {
                log::trace!("error located at removed position {}", position);
                return Ok(self.unmodified(received, WordStatus::Uncorrectable));
            }
        };

        Ok(self.finish(word, status))
    }

    /// Drops the punctured prefix of a base-length word
    fn finish(&self, mut word: Vec<u32>, status: WordStatus) -> DecodedWord {
        let codeword = word.split_off(self.punctured);
        let info = codeword[..self.code.data_length()].to_vec();
        DecodedWord {
            info,
            codeword,
            status,
        }
    }

    fn unmodified(&self, received: &[u32], status: WordStatus) -> DecodedWord {
        DecodedWord {
            info: received[..self.code.data_length()].to_vec(),
            codeword: received.to_vec(),
            status,
        }
    }

    /// Solves for the erased symbols; false when they are not uniquely determined
    fn fill_erasures(&self, word: &mut [u32], columns: &[usize]) -> Result<bool> {
        let q = self.code.characteristic();
        let syndrome = mat_vec_mod(self.check_matrix.view(), word, q);
        let rhs: Vec<u32> = syndrome.iter().map(|&s| (q - s) % q).collect();
        let erased_columns = self.check_matrix.select(Axis(1), columns);

        match solve_mod(erased_columns.view(), &rhs, q)? {
            Some(solution) => {
                if !solution.consistent {
                    log::trace!("erasure system at {:?} is inconsistent", columns);
                }
                for (&position, &value) in columns.iter().zip(&solution.values) {
                    word[position] = value;
                }
                Ok(true)
            }
            None => {
                log::debug!(
                    "erased columns {:?} are linearly dependent, erasures unresolved",
                    columns
                );
                Ok(false)
            }
        }
    }

    fn locate_error(&self, word: &mut [u32]) -> Result<Located> {
        let q = self.code.characteristic();
        let syndrome = mat_vec_mod(self.check_matrix.view(), word, q);

        if let CodeVariant::Extended = self.code.variant() {
            let r = syndrome.len() - 1;
            let n = word.len() - 1;
            let parity_residue = syndrome[r];
            let data_syndrome = &syndrome[..r];
            let data_clean = data_syndrome.iter().all(|&s| s == 0);

            return Ok(match (data_clean, parity_residue == 0) {
                (true, true) => Located::Nothing,
                (true, false) => {
                    word[n] = (word[n] + q - parity_residue) % q;
                    Located::Fixed(SymbolError {
                        position: n,
                        magnitude: parity_residue,
                    })
                }
                // Overall parity holds, so an even number of symbols changed
                (false, true) => Located::NotFound,
                (false, false) => match self.search_column(data_syndrome, n)? {
                    Some((j, magnitude)) => {
                        word[j] = (word[j] + q - magnitude) % q;
                        word[n] = overall_parity(&word[..n], q);
                        Located::Fixed(SymbolError {
                            position: j,
                            magnitude,
                        })
                    }
                    None => Located::NotFound,
                },
            });
        }

        if syndrome.iter().all(|&s| s == 0) {
            return Ok(Located::Nothing);
        }
        Ok(
            match self.search_column(&syndrome, self.check_matrix.ncols())? {
                Some((j, _)) if j < self.punctured => Located::Punctured(j),
                Some((j, magnitude)) => {
                    word[j] = (word[j] + q - magnitude) % q;
                    Located::Fixed(SymbolError {
                        position: j - self.punctured,
                        magnitude,
                    })
                }
                None => Located::NotFound,
            },
        )
    }

    /// First column `j < columns` and scalar `a` with `syndrome = a · H[:, j]`
    fn search_column(&self, syndrome: &[u32], columns: usize) -> Result<Option<(usize, u32)>> {
        let q = self.code.characteristic() as u64;
        for j in 0..columns {
            let column = self.check_matrix.column(j);
            let Some(pivot) = (0..syndrome.len()).find(|&i| column[i] != 0) else {
                continue;
            };
            let inv = mod_inverse(column[pivot], q as u32)? as u64;
            let a = syndrome[pivot] as u64 * inv % q;
            if a != 0
                && (0..syndrome.len()).all(|i| a * column[i] as u64 % q == syndrome[i] as u64)
            {
                return Ok(Some((j, a as u32)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::ecc::galois::GaloisField;

    fn decoder(variant: CodeVariant) -> SyndromeDecoder {
        let field = Arc::new(GaloisField::new(2, 3, &[1, 0, 1, 1]).unwrap());
        SyndromeDecoder::new(Arc::new(LinearCode::new(field, 7, 4, variant).unwrap()))
    }

    #[test]
    fn test_clean_word() {
        let decoder = decoder(CodeVariant::Classic);
        let decoded = decoder.decode_word(&[1, 0, 1, 0, 1, 1, 0]).unwrap();
        assert_eq!(decoded.status, WordStatus::Clean);
        assert_eq!(decoded.info, vec![1, 0, 1, 0]);
        assert_eq!(decoder.syndrome(&[1, 0, 1, 0, 1, 1, 0]).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_single_error_at_position_two() {
        let decoder = decoder(CodeVariant::Classic);
        let decoded = decoder.decode_word(&[1, 0, 0, 0, 1, 1, 0]).unwrap();
        assert_eq!(decoded.codeword, vec![1, 0, 1, 0, 1, 1, 0]);
        assert_eq!(decoded.info, vec![1, 0, 1, 0]);
        assert_eq!(
            decoded.status,
            WordStatus::Corrected {
                erasures: 0,
                error: Some(SymbolError {
                    position: 2,
                    magnitude: 1
                })
            }
        );
    }

    #[test]
    fn test_erasures() {
        let decoder = decoder(CodeVariant::Classic);

        let decoded = decoder
            .decode_word(&[ERASED, 0, 1, ERASED, 1, 1, 0])
            .unwrap();
        assert_eq!(decoded.codeword, vec![1, 0, 1, 0, 1, 1, 0]);
        assert_eq!(
            decoded.status,
            WordStatus::Corrected {
                erasures: 2,
                error: None
            }
        );

        // Explicit positions merge with markers; the symbol value there is ignored
        let decoded = decoder
            .decode_word_with_erasures(&[1, 0, 1, 1, ERASED, 1, 0], &[3, 4])
            .unwrap();
        assert_eq!(decoded.codeword, vec![1, 0, 1, 0, 1, 1, 0]);
        assert_eq!(
            decoded.status,
            WordStatus::Corrected {
                erasures: 2,
                error: None
            }
        );
    }

    #[test]
    fn test_dependent_erasures_are_uncorrectable() {
        let decoder = decoder(CodeVariant::Classic);
        // Sent 1010110; columns 0, 1 and 5 of H sum to zero
        let received = vec![ERASED, ERASED, 1, 0, 1, ERASED, 0];
        let decoded = decoder.decode_word(&received).unwrap();
        assert_eq!(decoded.status, WordStatus::Uncorrectable);

        // The single-error step still runs and lands on a different codeword
        assert_eq!(decoded.codeword, vec![0, 1, 1, 0, 1, 0, 0]);
        assert_eq!(decoder.syndrome(&decoded.codeword).unwrap(), vec![0, 0, 0]);
        assert_eq!(decoded.info, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_two_errors_are_miscorrected_in_classic_code() {
        // d = 3: two errors look like a different single error
        let decoder = decoder(CodeVariant::Classic);
        let decoded = decoder.decode_word(&[0, 1, 1, 0, 1, 1, 0]).unwrap();
        assert!(matches!(decoded.status, WordStatus::Corrected { .. }));
        assert_ne!(decoded.codeword, vec![1, 0, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_extended_double_error_detected() {
        let decoder = decoder(CodeVariant::Extended);
        let received = vec![0, 1, 1, 0, 1, 1, 0, 0];
        let decoded = decoder.decode_word(&received).unwrap();
        assert_eq!(decoded.status, WordStatus::DetectionOnly);
        assert_eq!(decoded.codeword, received);
    }

    #[test]
    fn test_extended_single_errors() {
        let decoder = decoder(CodeVariant::Extended);
        let codeword = vec![1, 0, 1, 0, 1, 1, 0, 0];

        let mut received = codeword.clone();
        received[5] ^= 1;
        let decoded = decoder.decode_word(&received).unwrap();
        assert_eq!(decoded.codeword, codeword);

        // Parity symbol only
        let mut received = codeword.clone();
        received[7] ^= 1;
        let decoded = decoder.decode_word(&received).unwrap();
        assert_eq!(decoded.codeword, codeword);
        assert_eq!(
            decoded.status,
            WordStatus::Corrected {
                erasures: 0,
                error: Some(SymbolError {
                    position: 7,
                    magnitude: 1
                })
            }
        );
    }

    #[test]
    fn test_extended_erasures_include_parity() {
        let decoder = decoder(CodeVariant::Extended);
        let decoded = decoder
            .decode_word(&[1, ERASED, 1, 0, 1, 1, 0, ERASED])
            .unwrap();
        assert_eq!(decoded.codeword, vec![1, 0, 1, 0, 1, 1, 0, 0]);

        // Three erasures are within d - 1 = 3 even where the base columns are dependent
        let decoded = decoder
            .decode_word(&[ERASED, ERASED, 1, 0, 1, ERASED, 0, 0])
            .unwrap();
        assert_eq!(decoded.codeword, vec![1, 0, 1, 0, 1, 1, 0, 0]);
        assert_eq!(
            decoded.status,
            WordStatus::Corrected {
                erasures: 3,
                error: None
            }
        );
    }

    #[test]
    fn test_shortened_decoding() {
        let decoder = decoder(CodeVariant::Shortened { removed: 1 });
        let codeword = vec![1, 1, 0, 1, 0, 0];

        let decoded = decoder.decode_word(&[1, 1, 0, 1, 1, 0]).unwrap();
        assert_eq!(decoded.codeword, codeword);
        assert_eq!(decoded.info, vec![1, 1, 0]);
        assert_eq!(
            decoded.status,
            WordStatus::Corrected {
                erasures: 0,
                error: Some(SymbolError {
                    position: 4,
                    magnitude: 1
                })
            }
        );

        let decoded = decoder.decode_word(&[1, ERASED, 0, 1, 0, 0]).unwrap();
        assert_eq!(decoded.codeword, codeword);
    }

    #[test]
    fn test_shortened_error_at_removed_position() {
        let decoder = decoder(CodeVariant::Shortened { removed: 1 });
        // Two errors whose syndrome equals the removed column
        let received = vec![1, 1, 0, 0, 0, 1];
        let decoded = decoder.decode_word(&received).unwrap();
        assert_eq!(decoded.status, WordStatus::Uncorrectable);
        assert_eq!(decoded.codeword, received);
    }

    #[test]
    fn test_ternary_error_magnitude() {
        let field = Arc::new(GaloisField::new(3, 2, &[2, 1, 1]).unwrap());
        let code = Arc::new(LinearCode::new(field, 4, 2, CodeVariant::Classic).unwrap());
        let decoder = SyndromeDecoder::new(code);

        let decoded = decoder.decode_word(&[1, 2, 2, 1]).unwrap();
        assert_eq!(decoded.codeword, vec![1, 2, 0, 1]);
        assert_eq!(
            decoded.status,
            WordStatus::Corrected {
                erasures: 0,
                error: Some(SymbolError {
                    position: 2,
                    magnitude: 2
                })
            }
        );
    }

    #[test]
    fn test_batch_decode() {
        let decoder = decoder(CodeVariant::Classic);
        let rows = vec![
            vec![1, 0, 1, 0, 1, 1, 0],
            vec![1, 0, 0, 0, 1, 1, 0],
            vec![0, 1, 1, 0, 1, 0, ERASED],
        ];
        let batch = decoder.decode(&rows).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.statuses[0], WordStatus::Clean);
        assert!(batch.statuses.iter().all(WordStatus::is_valid));

        let (info, codewords) = batch.into_parts();
        assert_eq!(info, vec![vec![1, 0, 1, 0], vec![1, 0, 1, 0], vec![0, 1, 1, 0]]);
        assert_eq!(codewords[2], vec![0, 1, 1, 0, 1, 0, 0]);

        let batch = decoder
            .decode_with_erasures(&rows[..2], &[vec![], vec![2]])
            .unwrap();
        assert_eq!(batch.codewords[1], vec![1, 0, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_shape_errors() {
        let decoder = decoder(CodeVariant::Classic);
        assert!(matches!(
            decoder.decode_word(&[1, 0, 1]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            decoder.decode_word_with_erasures(&[0; 7], &[7]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            decoder.decode(&[vec![0; 7], vec![0; 6]]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            decoder.decode_with_erasures(&[vec![0; 7]], &[]),
            Err(Error::InvalidInput(_))
        ));
        assert!(decoder.syndrome(&[0, 0, 0, 0, 0, 0, ERASED]).is_err());
        assert!(decoder.decode(&[]).unwrap().is_empty());
    }
}
