//! Matrix arithmetic modulo a prime on `ndarray` matrices of symbols.
//!
//! Symbols are stored as `u32` in `[0, q)`; intermediate products are
//! accumulated in `u64` and reduced once per entry.

use crate::cs::ecc::galois::mod_inverse;
use crate::cs::ecc::Result;
use ndarray::{s, Array2, ArrayView1, ArrayView2};

/// Solution of a square-or-tall linear system with full column rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// One value per unknown, in column order
    pub values: Vec<u32>,
    /// False when rows left over after elimination disagree with the solution
    pub consistent: bool,
}

/// Dot product of two symbol vectors modulo `q`
pub fn dot_mod(a: ArrayView1<'_, u32>, b: ArrayView1<'_, u32>, q: u32) -> u32 {
    let sum: u64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| x as u64 * y as u64 % q as u64)
        .sum();
    (sum % q as u64) as u32
}

/// `M · v mod q`
pub fn mat_vec_mod(m: ArrayView2<'_, u32>, v: &[u32], q: u32) -> Vec<u32> {
    let v = ArrayView1::from(v);
    m.rows()
        .into_iter()
        .map(|row| dot_mod(row, v, q))
        .collect()
}

/// `A · B mod q`
pub fn mat_mul_mod(a: ArrayView2<'_, u32>, b: ArrayView2<'_, u32>, q: u32) -> Array2<u32> {
    Array2::from_shape_fn((a.nrows(), b.ncols()), |(i, j)| {
        dot_mod(a.row(i), b.column(j), q)
    })
}

pub fn is_zero(m: ArrayView2<'_, u32>) -> bool {
    m.iter().all(|&v| v == 0)
}

/// Solves `A x = b (mod q)` by Gauss-Jordan elimination.
///
/// The pivot for each column is the first nonzero entry at or below the
/// current row. Returns `None` when `A` does not have full column rank, since
/// the unknowns are then not uniquely determined.
pub fn solve_mod(a: ArrayView2<'_, u32>, b: &[u32], q: u32) -> Result<Option<Solution>> {
    let (rows, cols) = a.dim();
    let q64 = q as u64;

    let mut aug = Array2::<u32>::zeros((rows, cols + 1));
    aug.slice_mut(s![.., ..cols]).assign(&a.mapv(|v| v % q));
    for (i, &v) in b.iter().enumerate().take(rows) {
        aug[[i, cols]] = v % q;
    }

    let mut rank = 0;
    for col in 0..cols {
        if rank == rows {
            break;
        }
        let Some(pivot) = (rank..rows).find(|&i| aug[[i, col]] != 0) else {
            continue;
        };
        if pivot != rank {
            for c in 0..=cols {
                aug.swap([pivot, c], [rank, c]);
            }
        }

        let inv = mod_inverse(aug[[rank, col]], q)? as u64;
        for c in 0..=cols {
            aug[[rank, c]] = (aug[[rank, c]] as u64 * inv % q64) as u32;
        }

        for i in 0..rows {
            let factor = aug[[i, col]] as u64;
            if i == rank || factor == 0 {
                continue;
            }
            for c in 0..=cols {
                let sub = factor * aug[[rank, c]] as u64 % q64;
                aug[[i, c]] = ((aug[[i, c]] as u64 + q64 - sub) % q64) as u32;
            }
        }
        rank += 1;
    }

    if rank < cols {
        return Ok(None);
    }

    // Full column rank puts the pivots on the leading diagonal
    let values = (0..cols).map(|i| aug[[i, cols]]).collect();
    let consistent = (rank..rows).all(|i| aug[[i, cols]] == 0);

    Ok(Some(Solution { values, consistent }))
}
