//! Finite fields GF(q^m) built from a modulus polynomial.
//!
//! A field of characteristic `q` and extension degree `m` is materialized as a
//! table of `q^m` coefficient vectors over the polynomial basis
//! `1, x, ..., x^(m-1)`:
//!
//! - index 0 is the additive identity (the all-zero vector)
//! - index 1 is the multiplicative identity `x^0`
//! - index `i >= 2` is `x^(i-1)`, obtained from the previous row by a basis
//!   shift followed by reduction with the (monic-normalized) modulus
//!
//! Addition works component-wise on the coefficient vectors, multiplication
//! works on the table indices as discrete logarithms. Both agree only when the
//! modulus is primitive, so construction rejects any modulus whose powers of
//! `x` repeat before all `q^m - 1` nonzero elements have been produced.
//!
//! # Examples
//!
//! ```
//! use galois_codes::ecc::galois::GaloisField;
//!
//! // GF(8) from 1 + x^2 + x^3
//! let field = GaloisField::new(2, 3, &[1, 0, 1, 1]).unwrap();
//! assert_eq!(field.order(), 8);
//! assert_eq!(field.vector(field.primitive_power(3)), &[1, 0, 1]);
//! ```

use crate::cs::ecc::Result;
use crate::cs::error::Error;
use num_integer::Integer;
use num_prime::nt_funcs::is_prime64;
use std::fmt::{Debug, Display, Formatter};

/// Largest field (number of elements) that will be materialized as a table
pub const MAX_FIELD_SIZE: usize = 1 << 20;

/// An element of a [`GaloisField`], identified by its row in the element table.
///
/// The wrapped index is only meaningful together with the field that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(usize);

impl Element {
    /// Additive identity
    pub const ZERO: Element = Element(0);
    /// Multiplicative identity
    pub const ONE: Element = Element(1);

    /// Wrap a raw table index
    pub fn new(index: usize) -> Self {
        Element(index)
    }

    /// Row of this element in the field table
    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// The finite field GF(q^m) as an immutable element table.
#[derive(Clone)]
pub struct GaloisField {
    /// Prime characteristic q
    characteristic: u32,
    /// Extension degree m
    degree: usize,
    /// Modulus polynomial as given, index = degree
    modulus: Vec<u32>,
    /// Flat table: row i holds the m coefficients of element i
    elements: Vec<u32>,
    /// Base-q packing of a coefficient vector -> row index
    index_of: Vec<usize>,
}

impl GaloisField {
    /// Builds GF(q^m) from a modulus polynomial.
    ///
    /// # Arguments
    ///
    /// * `characteristic` - Prime `q`
    /// * `degree` - Extension degree `m`
    /// * `modulus` - `m + 1` coefficients in `[0, q)`, lowest degree first, nonzero leading term
    ///
    /// # Returns
    ///
    /// The field, or an error if a parameter is malformed or the modulus is not primitive
    pub fn new(characteristic: u32, degree: usize, modulus: &[u32]) -> Result<Self> {
        if !is_prime64(characteristic as u64) {
            return Err(Error::IncorrectCharacteristic(characteristic));
        }
        if degree == 0 {
            return Err(Error::IncorrectDegree(degree));
        }
        if modulus.len() != degree + 1 {
            return Err(Error::IncorrectPolynomial(format!(
                "expected {} coefficients for degree {}, got {}",
                degree + 1,
                degree,
                modulus.len()
            )));
        }
        if let Some(&c) = modulus.iter().find(|&&c| c >= characteristic) {
            return Err(Error::IncorrectPolynomial(format!(
                "coefficient {} is outside [0, {})",
                c, characteristic
            )));
        }
        if modulus[degree] == 0 {
            return Err(Error::IncorrectPolynomial(
                "leading coefficient is zero".to_string(),
            ));
        }

        let order = (characteristic as usize)
            .checked_pow(degree as u32)
            .filter(|&order| order <= MAX_FIELD_SIZE)
            .ok_or(Error::IncorrectDegree(degree))?;

        let q = characteristic as u64;
        let lead_inv = mod_inverse(modulus[degree], characteristic)? as u64;

        // x^m = -(normalized lower coefficients)
        let reduction: Vec<u64> = modulus[..degree]
            .iter()
            .map(|&c| (q - (c as u64 * lead_inv) % q) % q)
            .collect();

        let mut elements = vec![0u32; order * degree];
        let mut index_of = vec![usize::MAX; order];
        index_of[0] = 0;
        if order > 1 {
            elements[degree] = 1;
            index_of[pack(&elements[degree..2 * degree], characteristic)] = 1;
        }

        for index in 2..order {
            let (done, rest) = elements.split_at_mut(index * degree);
            let prev = &done[(index - 1) * degree..];
            let current = &mut rest[..degree];

            let overflow = prev[degree - 1] as u64;
            current[0] = 0;
            current[1..].copy_from_slice(&prev[..degree - 1]);

            if overflow != 0 {
                for (c, &r) in current.iter_mut().zip(&reduction) {
                    *c = ((*c as u64 + overflow * r) % q) as u32;
                }
            }

            let key = pack(current, characteristic);
            if index_of[key] != usize::MAX {
                log::debug!(
                    "GF({}^{}) modulus {:?}: x^{} repeats element {}",
                    characteristic,
                    degree,
                    modulus,
                    index - 1,
                    index_of[key]
                );
                return Err(Error::FieldConstruction {
                    index,
                    duplicate_of: index_of[key],
                });
            }
            index_of[key] = index;
        }

        log::debug!(
            "built GF({}^{}) with {} elements from modulus {:?}",
            characteristic,
            degree,
            order,
            modulus
        );

        Ok(GaloisField {
            characteristic,
            degree,
            modulus: modulus.to_vec(),
            elements,
            index_of,
        })
    }

    /// Characteristic q
    pub fn characteristic(&self) -> u32 {
        self.characteristic
    }

    /// Extension degree m
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Modulus polynomial as supplied to the constructor
    pub fn modulus(&self) -> &[u32] {
        &self.modulus
    }

    /// Number of elements, q^m
    pub fn order(&self) -> usize {
        self.index_of.len()
    }

    /// Size of the multiplicative group, q^m - 1
    pub fn multiplicative_order(&self) -> usize {
        self.order() - 1
    }

    /// All elements in table order
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        (0..self.order()).map(Element)
    }

    /// Coefficient vector of an element, lowest degree first
    pub fn vector(&self, a: Element) -> &[u32] {
        &self.elements[a.0 * self.degree..(a.0 + 1) * self.degree]
    }

    /// Looks up the element with the given coefficient vector
    pub fn element_from_vector(&self, coefficients: &[u32]) -> Result<Element> {
        if coefficients.len() != self.degree {
            return Err(Error::InvalidInput(format!(
                "expected {} coefficients, got {}",
                self.degree,
                coefficients.len()
            )));
        }
        if coefficients.iter().any(|&c| c >= self.characteristic) {
            return Err(Error::InvalidInput(format!(
                "coefficients must lie in [0, {})",
                self.characteristic
            )));
        }
        Ok(Element(
            self.index_of[pack(coefficients, self.characteristic)],
        ))
    }

    /// x^exponent for the generator x; negative exponents wrap around the group
    pub fn primitive_power(&self, exponent: i64) -> Element {
        let group = self.multiplicative_order() as i64;
        Element(exponent.rem_euclid(group) as usize + 1)
    }

    /// Discrete logarithm to the base x
    pub fn log(&self, a: Element) -> Result<usize> {
        if a.is_zero() {
            return Err(Error::InvalidInput(
                "Logarithm of zero is undefined".to_string(),
            ));
        }
        Ok(a.0 - 1)
    }

    pub fn add(&self, a: Element, b: Element) -> Element {
        self.combine(a, b, |x, y| x + y)
    }

    pub fn sub(&self, a: Element, b: Element) -> Element {
        let q = self.characteristic as u64;
        self.combine(a, b, |x, y| x + q - y)
    }

    pub fn negate(&self, a: Element) -> Element {
        self.sub(Element::ZERO, a)
    }

    /// Multiplies every coefficient of `a` by a prime-field scalar
    pub fn scale(&self, a: Element, scalar: u32) -> Element {
        let q = self.characteristic as u64;
        let mut key = 0usize;
        for &c in self.vector(a).iter().rev() {
            key = key * q as usize + ((c as u64 * scalar as u64) % q) as usize;
        }
        Element(self.index_of[key])
    }

    pub fn multiply(&self, a: Element, b: Element) -> Element {
        if a.is_zero() || b.is_zero() {
            return Element::ZERO;
        }
        let group = self.multiplicative_order();
        Element((a.0 - 1 + b.0 - 1) % group + 1)
    }

    pub fn divide(&self, a: Element, b: Element) -> Result<Element> {
        if b.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if a.is_zero() {
            return Ok(Element::ZERO);
        }
        let group = self.multiplicative_order();
        Ok(Element((a.0 - 1 + group - (b.0 - 1)) % group + 1))
    }

    pub fn inverse(&self, a: Element) -> Result<Element> {
        self.divide(Element::ONE, a)
    }

    /// Raises `a` to a signed power. `0^0` is one, `0^e` for negative `e` is a division by zero.
    pub fn power(&self, a: Element, exponent: i64) -> Result<Element> {
        if a.is_zero() {
            return match exponent {
                0 => Ok(Element::ONE),
                e if e > 0 => Ok(Element::ZERO),
                _ => Err(Error::DivisionByZero),
            };
        }
        let group = self.multiplicative_order() as i128;
        let log = (a.0 - 1) as i128;
        let e = (log * exponent as i128).rem_euclid(group);
        Ok(Element(e as usize + 1))
    }

    fn combine(&self, a: Element, b: Element, op: impl Fn(u64, u64) -> u64) -> Element {
        let q = self.characteristic as u64;
        let mut key = 0usize;
        for (&x, &y) in self.vector(a).iter().zip(self.vector(b)).rev() {
            key = key * q as usize + (op(x as u64, y as u64) % q) as usize;
        }
        Element(self.index_of[key])
    }
}

impl PartialEq for GaloisField {
    fn eq(&self, other: &Self) -> bool {
        self.characteristic == other.characteristic
            && self.degree == other.degree
            && self.modulus == other.modulus
    }
}

impl Eq for GaloisField {}

impl Debug for GaloisField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaloisField")
            .field("characteristic", &self.characteristic)
            .field("degree", &self.degree)
            .field("modulus", &self.modulus)
            .finish()
    }
}

impl Display for GaloisField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "GF({} = {}^{})",
            self.order(),
            self.characteristic,
            self.degree
        )?;
        for a in self.elements() {
            match a.0 {
                0 | 1 => write!(f, "{}: ", a.0)?,
                i => write!(f, "x^{}: ", i - 1)?,
            }
            writeln!(f, "{:?}", self.vector(a))?;
        }
        Ok(())
    }
}

/// Modular inverse by the extended Euclidean algorithm
pub(crate) fn mod_inverse(value: u32, modulus: u32) -> Result<u32> {
    let m = modulus as i64;
    let v = (value as i64).rem_euclid(m);
    if v == 0 {
        return Err(Error::DivisionByZero);
    }
    let ext = v.extended_gcd(&m);
    if ext.gcd != 1 {
        return Err(Error::InvalidInput(format!(
            "{} is not invertible modulo {}",
            value, modulus
        )));
    }
    Ok(ext.x.rem_euclid(m) as u32)
}

fn pack(coefficients: &[u32], characteristic: u32) -> usize {
    coefficients
        .iter()
        .rev()
        .fold(0usize, |acc, &c| acc * characteristic as usize + c as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf8() -> GaloisField {
        GaloisField::new(2, 3, &[1, 0, 1, 1]).unwrap()
    }

    fn gf9() -> GaloisField {
        // x^2 + x + 2, primitive over GF(3)
        GaloisField::new(3, 2, &[2, 1, 1]).unwrap()
    }

    #[test]
    fn test_gf8_table() {
        let field = gf8();
        let table: Vec<Vec<u32>> = field.elements().map(|a| field.vector(a).to_vec()).collect();
        assert_eq!(
            table,
            vec![
                vec![0, 0, 0],
                vec![1, 0, 0],
                vec![0, 1, 0],
                vec![0, 0, 1],
                vec![1, 0, 1],
                vec![1, 1, 1],
                vec![1, 1, 0],
                vec![0, 1, 1],
            ]
        );
    }

    #[test]
    fn test_gf9_table() {
        let field = gf9();
        let table: Vec<Vec<u32>> = field.elements().map(|a| field.vector(a).to_vec()).collect();
        assert_eq!(
            table,
            vec![
                vec![0, 0],
                vec![1, 0],
                vec![0, 1],
                vec![1, 2],
                vec![2, 2],
                vec![2, 0],
                vec![0, 2],
                vec![2, 1],
                vec![1, 1],
            ]
        );
    }

    #[test]
    fn test_parameter_validation() {
        assert_eq!(
            GaloisField::new(4, 2, &[1, 1, 1]).unwrap_err(),
            Error::IncorrectCharacteristic(4)
        );
        assert_eq!(
            GaloisField::new(2, 0, &[1]).unwrap_err(),
            Error::IncorrectDegree(0)
        );
        assert!(matches!(
            GaloisField::new(2, 3, &[1, 0, 1]),
            Err(Error::IncorrectPolynomial(_))
        ));
        assert!(matches!(
            GaloisField::new(3, 2, &[2, 3, 1]),
            Err(Error::IncorrectPolynomial(_))
        ));
        assert!(matches!(
            GaloisField::new(3, 2, &[2, 1, 0]),
            Err(Error::IncorrectPolynomial(_))
        ));
        assert_eq!(
            GaloisField::new(2, 30, &[1; 31]).unwrap_err(),
            Error::IncorrectDegree(30)
        );
    }

    #[test]
    fn test_non_primitive_modulus_rejected() {
        // x^2 + 1 over GF(3) has roots of order 4
        assert_eq!(
            GaloisField::new(3, 2, &[1, 0, 1]).unwrap_err(),
            Error::FieldConstruction {
                index: 5,
                duplicate_of: 1
            }
        );
        // (x + 1)^3 over GF(2)
        assert_eq!(
            GaloisField::new(2, 3, &[1, 1, 1, 1]).unwrap_err(),
            Error::FieldConstruction {
                index: 5,
                duplicate_of: 1
            }
        );
        // x divides the modulus, so some power collapses to zero
        assert!(matches!(
            GaloisField::new(2, 3, &[0, 1, 0, 1]),
            Err(Error::FieldConstruction { .. })
        ));
    }

    #[test]
    fn test_non_monic_modulus_is_normalized() {
        // 2 * (x^2 + x + 2) over GF(3)
        let scaled = GaloisField::new(3, 2, &[1, 2, 2]).unwrap();
        let monic = gf9();
        for a in monic.elements() {
            assert_eq!(scaled.vector(a), monic.vector(a));
        }
        assert_ne!(scaled, monic);
    }

    #[test]
    fn test_field_axioms_gf9() {
        let field = gf9();
        let all: Vec<Element> = field.elements().collect();
        for &a in &all {
            assert_eq!(field.add(a, Element::ZERO), a);
            assert_eq!(field.multiply(a, Element::ONE), a);
            assert_eq!(field.add(a, field.negate(a)), Element::ZERO);
            if !a.is_zero() {
                assert_eq!(field.multiply(a, field.inverse(a).unwrap()), Element::ONE);
            }
            for &b in &all {
                assert_eq!(field.sub(field.add(a, b), b), a);
                if !b.is_zero() {
                    assert_eq!(field.divide(field.multiply(a, b), b).unwrap(), a);
                }
                for &c in &all {
                    let left = field.multiply(a, field.add(b, c));
                    let right = field.add(field.multiply(a, b), field.multiply(a, c));
                    assert_eq!(left, right);
                }
            }
        }
    }

    #[test]
    fn test_power_and_log() {
        let field = gf9();
        let x = field.primitive_power(1);
        assert_eq!(field.power(x, 8).unwrap(), Element::ONE);
        assert_eq!(field.power(x, 4).unwrap(), field.element_from_vector(&[2, 0]).unwrap());
        assert_eq!(field.power(x, -1).unwrap(), field.inverse(x).unwrap());
        assert_eq!(field.primitive_power(-1), field.primitive_power(7));
        assert_eq!(field.log(field.primitive_power(5)).unwrap(), 5);
        assert_eq!(field.power(Element::ZERO, 0).unwrap(), Element::ONE);
        assert_eq!(field.power(Element::ZERO, 3).unwrap(), Element::ZERO);
        assert_eq!(field.power(Element::ZERO, -1), Err(Error::DivisionByZero));
        assert!(field.log(Element::ZERO).is_err());
    }

    #[test]
    fn test_division_by_zero() {
        let field = gf8();
        assert_eq!(field.divide(Element::ONE, Element::ZERO), Err(Error::DivisionByZero));
        assert_eq!(field.inverse(Element::ZERO), Err(Error::DivisionByZero));
        assert_eq!(field.divide(Element::ZERO, Element::ONE), Ok(Element::ZERO));
    }

    #[test]
    fn test_scale_and_lookup() {
        let field = gf9();
        let a = field.element_from_vector(&[1, 2]).unwrap();
        assert_eq!(field.vector(field.scale(a, 2)), &[2, 1]);
        assert_eq!(field.scale(a, 2), field.add(a, a));
        assert!(field.element_from_vector(&[3, 0]).is_err());
        assert!(field.element_from_vector(&[1]).is_err());
    }

    #[test]
    fn test_prime_field() {
        // GF(5) with generator 2: modulus x - 2 = x + 3
        let field = GaloisField::new(5, 1, &[3, 1]).unwrap();
        let powers: Vec<u32> = field.elements().map(|a| field.vector(a)[0]).collect();
        assert_eq!(powers, vec![0, 1, 2, 4, 3]);
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(3, 7).unwrap(), 5);
        assert_eq!(mod_inverse(1, 2).unwrap(), 1);
        assert_eq!(mod_inverse(0, 5), Err(Error::DivisionByZero));
    }

    #[test]
    fn test_display() {
        let text = gf8().to_string();
        assert!(text.starts_with("GF(8 = 2^3)\n0: [0, 0, 0]\n1: [1, 0, 0]\nx^1: [0, 1, 0]"));
    }
}
