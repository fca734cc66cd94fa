//! Univariate polynomials with coefficients in GF(2^m).
//!
//! Coefficients are stored lowest degree first and trimmed so the last entry
//! is the leading nonzero coefficient; the zero polynomial is `[0]`. Every
//! operation returns a new polynomial. Values supplied from outside
//! (coefficients, roots, scalars, evaluation points) are checked against the
//! field; everything derived from them is in range by construction.

use crate::cs::ecc::binary_field::BinaryField;
use crate::cs::ecc::Result;
use crate::cs::error::Error;
use std::fmt::{Display, Formatter};

/// A polynomial over a borrowed [`BinaryField`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial<'f> {
    field: &'f BinaryField,
    coeffs: Vec<u32>,
}

impl<'f> Polynomial<'f> {
    /// Creates a polynomial from coefficients, lowest degree first.
    ///
    /// Fails with `InvalidInput` if a coefficient is not a field element.
    pub fn new(coefficients: Vec<u32>, field: &'f BinaryField) -> Result<Self> {
        for &c in &coefficients {
            field.check_element(c)?;
        }
        Ok(Self::from_field_elements(coefficients, field))
    }

    fn from_field_elements(mut coeffs: Vec<u32>, field: &'f BinaryField) -> Self {
        trim(&mut coeffs);
        Polynomial { field, coeffs }
    }

    pub fn zero(field: &'f BinaryField) -> Self {
        Polynomial {
            field,
            coeffs: vec![0],
        }
    }

    pub fn one(field: &'f BinaryField) -> Self {
        Polynomial {
            field,
            coeffs: vec![1],
        }
    }

    /// `coefficient * x^degree`
    pub fn monomial(coefficient: u32, degree: usize, field: &'f BinaryField) -> Result<Self> {
        let mut coeffs = vec![0; degree + 1];
        coeffs[degree] = field.check_element(coefficient)?;
        Ok(Self::from_field_elements(coeffs, field))
    }

    /// Product of `(x - root)` over all roots
    pub fn from_roots(roots: &[u32], field: &'f BinaryField) -> Result<Self> {
        roots.iter().try_fold(Self::one(field), |acc, &root| {
            Ok(acc.multiply(&Self::new(vec![root, 1], field)?))
        })
    }

    pub fn field(&self) -> &'f BinaryField {
        self.field
    }

    pub fn coefficients(&self) -> &[u32] {
        &self.coeffs
    }

    /// Coefficient of `x^i`, zero past the leading term
    pub fn coefficient(&self, i: usize) -> u32 {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// Degree; the zero polynomial reports 0
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs == [0]
    }

    pub fn leading_coefficient(&self) -> u32 {
        self.coeffs[self.coeffs.len() - 1]
    }

    pub fn add(&self, other: &Polynomial<'f>) -> Polynomial<'f> {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| self.field.add(self.coefficient(i), other.coefficient(i)))
            .collect();
        Self::from_field_elements(coeffs, self.field)
    }

    /// Identical to [`add`](Self::add) in characteristic 2
    pub fn sub(&self, other: &Polynomial<'f>) -> Polynomial<'f> {
        self.add(other)
    }

    pub fn multiply(&self, other: &Polynomial<'f>) -> Polynomial<'f> {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.field);
        }

        let mut result = vec![0u32; self.degree() + other.degree() + 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                let product = self.field.multiply(a, b);
                result[i + j] = self.field.add(result[i + j], product);
            }
        }

        Self::from_field_elements(result, self.field)
    }

    /// Multiplies every coefficient by a field scalar
    pub fn scale(&self, scalar: u32) -> Result<Polynomial<'f>> {
        Ok(self.scaled(self.field.check_element(scalar)?))
    }

    fn scaled(&self, scalar: u32) -> Polynomial<'f> {
        if scalar == 0 {
            return Self::zero(self.field);
        }
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| self.field.multiply(c, scalar))
            .collect();
        Self::from_field_elements(coeffs, self.field)
    }

    /// Multiplies by `x^shift`
    pub fn shift(&self, shift: usize) -> Polynomial<'f> {
        if self.is_zero() {
            return self.clone();
        }
        let mut coeffs = vec![0u32; shift];
        coeffs.extend_from_slice(&self.coeffs);
        Polynomial {
            field: self.field,
            coeffs,
        }
    }

    /// Long division, returning `(quotient, remainder)`
    pub fn divmod(&self, divisor: &Polynomial<'f>) -> Result<(Polynomial<'f>, Polynomial<'f>)> {
        if divisor.is_zero() {
            return Err(Error::DivisionByZero);
        }

        let divisor_degree = divisor.degree();
        let lead = divisor.leading_coefficient();
        let mut quotient = vec![0u32; self.coeffs.len().saturating_sub(divisor_degree).max(1)];
        let mut remainder = self.clone();

        while !remainder.is_zero() && remainder.degree() >= divisor_degree {
            let shift = remainder.degree() - divisor_degree;
            let coef = self.field.divide(remainder.leading_coefficient(), lead)?;
            quotient[shift] = self.field.add(quotient[shift], coef);
            remainder = remainder.sub(&divisor.scaled(coef).shift(shift));
        }

        Ok((Self::from_field_elements(quotient, self.field), remainder))
    }

    /// Evaluates at `x`, accumulating `coeff_i * x^i` with a running power
    pub fn evaluate(&self, x: u32) -> Result<u32> {
        let x = self.field.check_element(x)?;
        let mut result = 0u32;
        let mut x_power = 1u32;
        for &coef in &self.coeffs {
            result = self.field.add(result, self.field.multiply(coef, x_power));
            x_power = self.field.multiply(x_power, x);
        }
        Ok(result)
    }

    /// Greatest common divisor by the Euclidean algorithm (not normalized)
    pub fn gcd(a: &Polynomial<'f>, b: &Polynomial<'f>) -> Result<Polynomial<'f>> {
        let mut a = a.clone();
        let mut b = b.clone();
        while !b.is_zero() {
            let (_, remainder) = a.divmod(&b)?;
            a = b;
            b = remainder;
        }
        Ok(a)
    }

    /// Returns `(g, s, t)` with `s*a + t*b = g` and `g` monic
    pub fn extended_gcd(
        a: &Polynomial<'f>,
        b: &Polynomial<'f>,
    ) -> Result<(Polynomial<'f>, Polynomial<'f>, Polynomial<'f>)> {
        let field = a.field;
        let (mut old_r, mut r) = (a.clone(), b.clone());
        let (mut old_s, mut s) = (Self::one(field), Self::zero(field));
        let (mut old_t, mut t) = (Self::zero(field), Self::one(field));

        while !r.is_zero() {
            let (quotient, remainder) = old_r.divmod(&r)?;
            old_r = std::mem::replace(&mut r, remainder);
            let next_s = old_s.sub(&quotient.multiply(&s));
            old_s = std::mem::replace(&mut s, next_s);
            let next_t = old_t.sub(&quotient.multiply(&t));
            old_t = std::mem::replace(&mut t, next_t);
        }

        if old_r.is_zero() {
            return Ok((old_r, old_s, old_t));
        }

        let inv = field.inverse(old_r.leading_coefficient())?;
        Ok((old_r.scaled(inv), old_s.scaled(inv), old_t.scaled(inv)))
    }

    /// Formal derivative; in characteristic 2 only odd-degree terms survive
    pub fn derivative(&self) -> Polynomial<'f> {
        if self.degree() == 0 {
            return Self::zero(self.field);
        }
        let coeffs = (1..self.coeffs.len())
            .map(|i| if i % 2 == 1 { self.coeffs[i] } else { 0 })
            .collect();
        Self::from_field_elements(coeffs, self.field)
    }
}

impl Display for Polynomial<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let terms: Vec<String> = self
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|&(_, &c)| c != 0)
            .map(|(i, &c)| match i {
                0 => format!("{}", c),
                1 => format!("{}*x", c),
                _ => format!("{}*x^{}", c, i),
            })
            .collect();
        write!(f, "{}", terms.join(" + "))
    }
}

fn trim(coeffs: &mut Vec<u32>) {
    while coeffs.len() > 1 && coeffs[coeffs.len() - 1] == 0 {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(0);
    }
}
