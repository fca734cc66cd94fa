//! Error type shared by the finite-field and coding modules.

use thiserror::Error;

/// Errors raised while building fields and codes or while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Generic parameter or shape problem
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Field characteristic is not a prime
    #[error("Incorrect characteristic: {0} is not a prime")]
    IncorrectCharacteristic(u32),

    /// Extension degree is zero or does not fit the requested code
    #[error("Incorrect extension degree: {0}")]
    IncorrectDegree(usize),

    /// Modulus polynomial has the wrong length, out-of-range or zero leading coefficient
    #[error("Incorrect modulus polynomial: {0}")]
    IncorrectPolynomial(String),

    /// The modulus is not primitive: power `index` repeats an earlier element
    #[error("Field construction failed: element {index} repeats element {duplicate_of}, modulus is not primitive")]
    FieldConstruction { index: usize, duplicate_of: usize },

    /// Inverse or division involving the zero element
    #[error("Division by zero in finite field")]
    DivisionByZero,

    /// Parity-check and generator matrices are malformed or not orthogonal
    #[error("Malformed code matrices: {0}")]
    ShapeOrOrthogonality(String),

    /// Shortening removes every information position
    #[error("Invalid shortening: cannot remove {removed} positions, limit is {limit}")]
    InvalidShortening { removed: usize, limit: usize },

    /// More errors located than the code can correct
    #[error("Uncorrectable word: {located} error positions located, capacity is {capacity}")]
    Uncorrectable { located: usize, capacity: usize },
}
