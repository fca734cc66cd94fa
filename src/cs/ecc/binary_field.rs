//! Binary extension fields GF(2^m) on bit-packed words.
//!
//! Elements are `u32` words whose bit `i` is the coefficient of `x^i`. Addition
//! is XOR; multiplication and division go through exponent/log tables built by
//! repeatedly multiplying by the generator `α = x` and reducing with the
//! primitive polynomial.
//!
//! This is the representation used by the BCH decoder. It describes the same
//! field as [`GaloisField`] built with `q = 2` from the same modulus, see
//! [`BinaryField::agrees_with`].

use crate::cs::ecc::galois::{Element, GaloisField};
use crate::cs::ecc::Result;
use crate::cs::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Maximum supported field order (m) for GF(2^m)
pub const MAX_FIELD_ORDER: usize = 16;

/// Default primitive polynomials (including the x^m term) indexed by m.
/// Entries 0 and 1 are unused.
pub const DEFAULT_PRIMITIVE_POLYS: [u32; MAX_FIELD_ORDER + 1] = [
    0, 0, 0x7, 0xB, 0x13, 0x25, 0x43, 0x89, 0x11D, 0x211, 0x409, 0x805, 0x1053, 0x201B, 0x4443,
    0x8003, 0x1100B,
];

/// GF(2^m) with exponent and logarithm tables
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryField {
    /// Field order parameter m
    m: usize,
    /// Primitive polynomial including the x^m bit
    primitive_poly: u32,
    /// exp_table[i] = α^i, doubled in length so sums of two logs need no reduction
    exp_table: Vec<u32>,
    /// log_table[a] = i with α^i = a; entry 0 is unused
    log_table: Vec<usize>,
}

impl BinaryField {
    /// Builds GF(2^m) from a primitive polynomial given as a bit mask (bit m must be set).
    pub fn new(m: usize, primitive_poly: u32) -> Result<Self> {
        if m < 2 || m > MAX_FIELD_ORDER {
            return Err(Error::IncorrectDegree(m));
        }
        if primitive_poly >> m != 1 {
            return Err(Error::IncorrectPolynomial(format!(
                "0x{:X} is not a degree {} polynomial",
                primitive_poly, m
            )));
        }

        let (exp_table, log_table) = Self::generate_field_tables(m, primitive_poly)?;
        log::debug!(
            "built GF(2^{}) tables from primitive polynomial 0x{:X}",
            m,
            primitive_poly
        );

        Ok(BinaryField {
            m,
            primitive_poly,
            exp_table,
            log_table,
        })
    }

    /// Builds GF(2^m) with the default primitive polynomial for `m`
    pub fn with_default_poly(m: usize) -> Result<Self> {
        if m < 2 || m > MAX_FIELD_ORDER {
            return Err(Error::IncorrectDegree(m));
        }
        Self::new(m, DEFAULT_PRIMITIVE_POLYS[m])
    }

    /// Builds GF(2^m) from `m + 1` binary coefficients, lowest degree first
    pub fn from_coefficients(coefficients: &[u32]) -> Result<Self> {
        if coefficients.len() < 3 {
            return Err(Error::IncorrectDegree(coefficients.len().saturating_sub(1)));
        }
        if coefficients.iter().any(|&c| c > 1) {
            return Err(Error::IncorrectPolynomial(
                "binary coefficients must be 0 or 1".to_string(),
            ));
        }
        let poly = coefficients
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &c)| acc | (c << i));
        Self::new(coefficients.len() - 1, poly)
    }

    fn generate_field_tables(m: usize, primitive_poly: u32) -> Result<(Vec<u32>, Vec<usize>)> {
        let size = 1usize << m;
        let group = size - 1;

        let mut exp_table = vec![0u32; 2 * group];
        let mut log_table = vec![usize::MAX; size];

        let mut x = 1u32;
        for i in 0..group {
            if log_table[x as usize] != usize::MAX {
                return Err(Error::FieldConstruction {
                    index: i + 1,
                    duplicate_of: log_table[x as usize] + 1,
                });
            }
            exp_table[i] = x;
            log_table[x as usize] = i;

            // Multiply by α and reduce on carry out of bit m-1
            x <<= 1;
            if x & (1 << m) != 0 {
                x ^= primitive_poly;
            }
        }

        for i in group..2 * group {
            exp_table[i] = exp_table[i - group];
        }
        log_table[0] = 0;

        Ok((exp_table, log_table))
    }

    /// Field order parameter m
    pub fn m(&self) -> usize {
        self.m
    }

    /// Number of elements, 2^m
    pub fn size(&self) -> usize {
        1 << self.m
    }

    /// Size of the multiplicative group, 2^m - 1
    pub fn group_order(&self) -> usize {
        self.size() - 1
    }

    pub fn primitive_poly(&self) -> u32 {
        self.primitive_poly
    }

    /// Returns `a` if it is an element of the field, i.e. below 2^m
    pub fn check_element(&self, a: u32) -> Result<u32> {
        if a as usize >= self.size() {
            return Err(Error::InvalidInput(format!(
                "{} is not an element of GF(2^{})",
                a, self.m
            )));
        }
        Ok(a)
    }

    pub fn add(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    /// Identical to [`add`](Self::add) in characteristic 2
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    /// Table multiplication. Both operands must be field elements; values
    /// from outside go through [`check_element`](Self::check_element) first.
    pub fn multiply(&self, a: u32, b: u32) -> u32 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp_table[self.log_table[a as usize] + self.log_table[b as usize]]
    }

    pub fn divide(&self, a: u32, b: u32) -> Result<u32> {
        self.check_element(a)?;
        self.check_element(b)?;
        if b == 0 {
            return Err(Error::DivisionByZero);
        }
        if a == 0 {
            return Ok(0);
        }
        let group = self.group_order();
        let diff = self.log_table[a as usize] + group - self.log_table[b as usize];
        Ok(self.exp_table[diff % group])
    }

    pub fn inverse(&self, a: u32) -> Result<u32> {
        self.divide(1, a)
    }

    /// Raises `a` to a signed power
    pub fn power(&self, a: u32, n: i64) -> Result<u32> {
        if self.check_element(a)? == 0 {
            return match n {
                0 => Ok(1),
                n if n > 0 => Ok(0),
                _ => Err(Error::DivisionByZero),
            };
        }
        let group = self.group_order() as i64;
        let log = self.log_table[a as usize] as i64;
        Ok(self.exp_table[(log * n.rem_euclid(group)).rem_euclid(group) as usize])
    }

    /// α^i for any (possibly negative) exponent
    pub fn alpha_power(&self, i: i64) -> u32 {
        self.exp_table[i.rem_euclid(self.group_order() as i64) as usize]
    }

    /// Discrete logarithm to the base α
    pub fn log(&self, a: u32) -> Result<usize> {
        if self.check_element(a)? == 0 {
            return Err(Error::InvalidInput(
                "Logarithm of zero is undefined".to_string(),
            ));
        }
        Ok(self.log_table[a as usize])
    }

    /// Checks that this field and a coefficient-vector field built from the
    /// same modulus enumerate identical powers of the generator.
    pub fn agrees_with(&self, field: &GaloisField) -> bool {
        if field.characteristic() != 2 || field.degree() != self.m {
            return false;
        }
        (0..self.group_order()).all(|i| {
            let vector = field.vector(Element::new(i + 1));
            let packed = vector
                .iter()
                .enumerate()
                .fold(0u32, |acc, (bit, &c)| acc | (c << bit));
            packed == self.exp_table[i]
        })
    }
}

impl Debug for BinaryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryField")
            .field("m", &self.m)
            .field("primitive_poly", &format_args!("0x{:X}", self.primitive_poly))
            .finish()
    }
}

impl Display for BinaryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GF(2^{}) mod 0x{:X}", self.m, self.primitive_poly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polys_are_primitive() {
        for m in 2..=12 {
            let field = BinaryField::with_default_poly(m).unwrap();
            assert_eq!(field.size(), 1 << m);
            assert_eq!(field.alpha_power(field.group_order() as i64), 1);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(BinaryField::new(1, 0x3), Err(Error::IncorrectDegree(1)));
        assert_eq!(BinaryField::new(17, 0x3), Err(Error::IncorrectDegree(17)));
        assert!(matches!(
            BinaryField::new(4, 0x7),
            Err(Error::IncorrectPolynomial(_))
        ));
        // x^4 + x^3 + x^2 + x + 1 is irreducible but not primitive
        assert!(matches!(
            BinaryField::new(4, 0x1F),
            Err(Error::FieldConstruction { .. })
        ));
        assert!(BinaryField::from_coefficients(&[1, 2, 1]).is_err());
    }

    #[test]
    fn test_arithmetic() {
        let field = BinaryField::new(4, 0x13).unwrap();
        // α^4 = α + 1
        assert_eq!(field.alpha_power(4), 0b0011);
        assert_eq!(field.multiply(0b0010, 0b1000), 0b0011);
        assert_eq!(field.add(0b0101, 0b0011), 0b0110);
        for a in 1..16u32 {
            let inv = field.inverse(a).unwrap();
            assert_eq!(field.multiply(a, inv), 1);
            for b in 1..16u32 {
                assert_eq!(field.divide(field.multiply(a, b), b).unwrap(), a);
            }
        }
        assert_eq!(field.divide(3, 0), Err(Error::DivisionByZero));
        assert_eq!(field.inverse(0), Err(Error::DivisionByZero));
    }

    #[test]
    fn test_values_outside_field_are_rejected() {
        let field = BinaryField::new(4, 0x13).unwrap();
        assert_eq!(field.check_element(15), Ok(15));
        assert!(matches!(field.check_element(16), Err(Error::InvalidInput(_))));
        assert!(matches!(field.divide(16, 1), Err(Error::InvalidInput(_))));
        assert!(matches!(field.divide(1, 16), Err(Error::InvalidInput(_))));
        assert!(matches!(field.inverse(20), Err(Error::InvalidInput(_))));
        assert!(matches!(field.power(16, 2), Err(Error::InvalidInput(_))));
        assert!(matches!(field.log(16), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_power_and_log() {
        let field = BinaryField::new(5, 0x25).unwrap();
        let a = field.alpha_power(7);
        assert_eq!(field.log(a).unwrap(), 7);
        assert_eq!(field.power(a, 3).unwrap(), field.alpha_power(21));
        assert_eq!(field.power(a, -1).unwrap(), field.inverse(a).unwrap());
        assert_eq!(field.alpha_power(-1), field.alpha_power(30));
        assert_eq!(field.power(0, 0).unwrap(), 1);
        assert_eq!(field.power(0, -2), Err(Error::DivisionByZero));
    }

    #[test]
    fn test_agrees_with_vector_field() {
        // 1 + x^2 + x^3
        let vector_field = GaloisField::new(2, 3, &[1, 0, 1, 1]).unwrap();
        let binary = BinaryField::from_coefficients(&[1, 0, 1, 1]).unwrap();
        assert!(binary.agrees_with(&vector_field));

        // Same products through both representations
        for i in 1..8usize {
            for j in 1..8usize {
                let a = Element::new(i);
                let b = Element::new(j);
                let product = vector_field.multiply(a, b);
                let expected = binary.multiply(
                    binary.alpha_power(i as i64 - 1),
                    binary.alpha_power(j as i64 - 1),
                );
                assert_eq!(
                    binary.alpha_power(vector_field.log(product).unwrap() as i64),
                    expected
                );
            }
        }

        let other = BinaryField::new(3, 0xB).unwrap();
        assert!(!other.agrees_with(&vector_field));
    }
}
