// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dense linear solver — Gauss–Jordan elimination with partial pivoting.

/// Pivot magnitude at or below which a column is treated as all-zero.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Solve `a * x = b` for a square system.
///
/// For each column the row with the largest absolute entry among the rows not
/// yet used is swapped into place, normalised, and eliminated from every other
/// row. Returns `None` when a column has no usable pivot (singular or
/// rank-deficient system).
pub fn solve_linear_system<const N: usize>(
    mut a: [[f64; N]; N],
    mut b: [f64; N],
) -> Option<[f64; N]> {
    for col in 0..N {
        let pivot_row = (col..N).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
        if a[pivot_row][col].abs() <= SINGULAR_EPSILON {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = a[col][col];
        for value in a[col].iter_mut().skip(col) {
            *value /= pivot;
        }
        b[col] /= pivot;

        for row in 0..N {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity<const N: usize>() -> [[f64; N]; N] {
        let mut m = [[0.0; N]; N];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        m
    }

    #[test]
    fn identity_system_returns_rhs() {
        let b = [1.0, -2.0, 3.5, 0.0, 7.25, -8.0, 9.0, 1e-3];
        assert_eq!(solve_linear_system(identity::<8>(), b), Some(b));
    }

    #[test]
    fn all_ones_matrix_is_singular() {
        assert_eq!(solve_linear_system([[1.0; 8]; 8], [1.0; 8]), None);
    }

    #[test]
    fn needs_row_swap() {
        // Zero on the leading diagonal forces a pivot swap.
        let a = [[0.0, 2.0, 1.0], [1.0, 1.0, 0.0], [3.0, 0.0, 1.0]];
        let x = solve_linear_system(a, [5.0, 3.0, 6.0]).expect("solvable");
        let expected = [1.4, 1.6, 1.8];
        for (got, want) in x.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{x:?}");
        }
    }

    #[test]
    fn zero_column_is_singular() {
        let a = [[1.0, 0.0], [2.0, 0.0]];
        assert!(solve_linear_system(a, [1.0, 2.0]).is_none());
    }
}
