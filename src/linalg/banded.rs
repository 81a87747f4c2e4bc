use std::ops::Range;

use ndarray::{Array1, Array2, ArrayViewMut1, ArrayViewMut2, Axis};

use super::{SolverBackend, dense};
use crate::error::{Result, TorsionError};

/// Square, generally unsymmetric matrix with entries confined to
/// `|col - row| <= half_bandwidth`, stored row-wise as `band[[row, col + hbw - row]]`,
/// together with its right-hand side.
#[derive(Clone, Debug)]
pub struct BandedMatrix {
    n: usize,
    hbw: usize,
    band: Array2<f64>,
    rhs: Array1<f64>,
}

fn band_column(n: usize, hbw: usize, row: usize, col: usize) -> Result<usize> {
    if col >= n || row.abs_diff(col) > hbw {
        return Err(TorsionError::OutsideBand {
            row,
            col,
            half_bandwidth: hbw,
        });
    }
    Ok(col + hbw - row)
}

impl BandedMatrix {
    pub fn new(n: usize, half_bandwidth: usize) -> Self {
        Self {
            n,
            hbw: half_bandwidth,
            band: Array2::zeros((n, 2 * half_bandwidth + 1)),
            rhs: Array1::zeros(n),
        }
    }
    pub fn dimension(&self) -> usize {
        self.n
    }
    pub fn half_bandwidth(&self) -> usize {
        self.hbw
    }
    pub fn bandwidth(&self) -> usize {
        2 * self.hbw + 1
    }
    pub fn set_coefficient(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if row >= self.n {
            return Err(TorsionError::RowNotOwned { row });
        }
        let j = band_column(self.n, self.hbw, row, col)?;
        self.band[[row, j]] = value;
        Ok(())
    }
    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        match band_column(self.n, self.hbw, row, col) {
            Ok(j) if row < self.n => self.band[[row, j]],
            _ => 0.0,
        }
    }
    pub fn set_rhs(&mut self, row: usize, value: f64) -> Result<()> {
        if row >= self.n {
            return Err(TorsionError::RowNotOwned { row });
        }
        self.rhs[row] = value;
        Ok(())
    }
    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// Splits the matrix into mutable views over disjoint row ranges so that
    /// several workers can fill it at once. `ranges` must be ascending and
    /// non-overlapping.
    pub fn row_blocks(&mut self, ranges: &[Range<usize>]) -> Result<Vec<BandBlockMut<'_>>> {
        let (n, hbw) = (self.n, self.hbw);
        let mut band = self.band.view_mut();
        let mut rhs = self.rhs.view_mut();
        let mut offset = 0;
        let mut blocks = Vec::with_capacity(ranges.len());
        for range in ranges {
            if range.start < offset || range.end < range.start || range.end > n {
                return Err(TorsionError::RowNotOwned { row: range.start });
            }
            let (_, band_rest) = band.split_at(Axis(0), range.start - offset);
            let (band_block, band_rest) = band_rest.split_at(Axis(0), range.len());
            let (_, rhs_rest) = rhs.split_at(Axis(0), range.start - offset);
            let (rhs_block, rhs_rest) = rhs_rest.split_at(Axis(0), range.len());
            band = band_rest;
            rhs = rhs_rest;
            offset = range.end;
            blocks.push(BandBlockMut {
                rows: range.clone(),
                n,
                hbw,
                band: band_block,
                rhs: rhs_block,
            });
        }
        Ok(blocks)
    }

    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n, self.n));
        for i in 0..self.n {
            let lo = i.saturating_sub(self.hbw);
            let hi = (i + self.hbw).min(self.n - 1);
            for j in lo..=hi {
                dense[[i, j]] = self.band[[i, j + self.hbw - i]];
            }
        }
        dense
    }

    /// Solves the system, consuming the matrix. Entry `i` of the result is the
    /// unknown of row `i`.
    pub fn solve(self, backend: SolverBackend) -> Result<Array1<f64>> {
        if self.n == 0 {
            return Ok(Array1::zeros(0));
        }
        match backend {
            SolverBackend::Banded => self.solve_banded(),
            SolverBackend::Dense => dense::solve_dense(&self.to_dense(), &self.rhs),
        }
    }

    /// Gaussian elimination without pivoting, which keeps the fill inside the
    /// band. The finite-difference Poisson operator is weakly diagonally
    /// dominant and irreducible, so the pivots stay positive.
    fn solve_banded(mut self) -> Result<Array1<f64>> {
        let (n, hbw) = (self.n, self.hbw);
        let scale = self.band.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let tiny = f64::EPSILON * scale;
        let a = &mut self.band;
        let b = &mut self.rhs;
        for k in 0..n {
            let pivot = a[[k, hbw]];
            if !pivot.is_finite() || pivot.abs() <= tiny {
                return Err(TorsionError::SingularMatrix { row: k, pivot });
            }
            let last = (k + hbw).min(n - 1);
            for i in k + 1..=last {
                let l = a[[i, k + hbw - i]];
                if l == 0.0 {
                    continue;
                }
                let l = l / pivot;
                a[[i, k + hbw - i]] = l;
                for j in k + 1..=last {
                    let u = a[[k, j + hbw - k]];
                    if u != 0.0 {
                        a[[i, j + hbw - i]] -= l * u;
                    }
                }
                b[i] -= l * b[k];
            }
        }
        let mut x = Array1::<f64>::zeros(n);
        for i in (0..n).rev() {
            let last = (i + hbw).min(n - 1);
            let mut s = b[i];
            for j in i + 1..=last {
                s -= a[[i, j + hbw - i]] * x[j];
            }
            x[i] = s / a[[i, hbw]];
            if !x[i].is_finite() {
                return Err(TorsionError::SingularMatrix {
                    row: i,
                    pivot: a[[i, hbw]],
                });
            }
        }
        Ok(x)
    }
}

/// Mutable view over a contiguous block of matrix rows, handed to one
/// assembly worker.
#[derive(Debug)]
pub struct BandBlockMut<'a> {
    rows: Range<usize>,
    n: usize,
    hbw: usize,
    band: ArrayViewMut2<'a, f64>,
    rhs: ArrayViewMut1<'a, f64>,
}
impl BandBlockMut<'_> {
    pub fn set_coefficient(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if !self.rows.contains(&row) {
            return Err(TorsionError::RowNotOwned { row });
        }
        let j = band_column(self.n, self.hbw, row, col)?;
        self.band[[row - self.rows.start, j]] = value;
        Ok(())
    }
    pub fn set_rhs(&mut self, row: usize, value: f64) -> Result<()> {
        if !self.rows.contains(&row) {
            return Err(TorsionError::RowNotOwned { row });
        }
        self.rhs[row - self.rows.start] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1-D Poisson operator tridiag(-1, 2, -1), scaled to a known solution.
    fn poisson_1d(n: usize) -> BandedMatrix {
        let mut m = BandedMatrix::new(n, 1);
        for i in 0..n {
            m.set_coefficient(i, i, 2.0).unwrap();
            if i > 0 {
                m.set_coefficient(i, i - 1, -1.0).unwrap();
            }
            if i + 1 < n {
                m.set_coefficient(i, i + 1, -1.0).unwrap();
            }
            m.set_rhs(i, 1.0).unwrap();
        }
        m
    }

    #[test]
    fn test_band_limits() {
        let mut m = BandedMatrix::new(5, 1);
        assert_eq!(m.bandwidth(), 3);
        assert!(m.set_coefficient(0, 1, 1.0).is_ok());
        assert!(matches!(
            m.set_coefficient(0, 2, 1.0),
            Err(TorsionError::OutsideBand { .. })
        ));
        assert!(m.set_coefficient(4, 5, 1.0).is_err());
        assert_eq!(m.coefficient(0, 1), 1.0);
        assert_eq!(m.coefficient(0, 3), 0.0);
    }

    #[test]
    fn test_banded_solve_1d_poisson() {
        // u_i = (i + 1)(n - i) / 2 solves -u'' = 1 with unit spacing
        let n = 9;
        let x = poisson_1d(n).solve(SolverBackend::Banded).unwrap();
        for i in 0..n {
            let exact = 0.5 * ((i + 1) * (n - i)) as f64;
            assert!((x[i] - exact).abs() < 1e-10);
        }
    }

    #[test]
    fn test_banded_matches_dense_for_unsymmetric_system() {
        let n = 12;
        let mut m = BandedMatrix::new(n, 3);
        for i in 0..n {
            m.set_coefficient(i, i, 4.0 + i as f64 * 0.1).unwrap();
            if i >= 3 {
                m.set_coefficient(i, i - 3, -1.0).unwrap();
            }
            if i + 1 < n {
                m.set_coefficient(i, i + 1, -0.5).unwrap();
            }
            if i >= 1 {
                m.set_coefficient(i, i - 1, -1.5).unwrap();
            }
            m.set_rhs(i, (i % 4) as f64 + 1.0).unwrap();
        }
        let x_band = m.clone().solve(SolverBackend::Banded).unwrap();
        let x_dense = m.solve(SolverBackend::Dense).unwrap();
        for i in 0..n {
            assert!((x_band[i] - x_dense[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_singular_matrix_is_reported() {
        let mut m = BandedMatrix::new(3, 1);
        m.set_coefficient(0, 0, 1.0).unwrap();
        m.set_coefficient(2, 2, 1.0).unwrap();
        assert!(matches!(
            m.solve(SolverBackend::Banded),
            Err(TorsionError::SingularMatrix { row: 1, .. })
        ));
    }

    #[test]
    fn test_row_blocks_are_disjoint() {
        let mut m = BandedMatrix::new(6, 1);
        {
            let mut blocks = m.row_blocks(&[0..2, 2..6]).unwrap();
            assert!(blocks[0].set_coefficient(1, 2, -1.0).is_ok());
            assert!(matches!(
                blocks[0].set_coefficient(2, 2, 1.0),
                Err(TorsionError::RowNotOwned { row: 2 })
            ));
            blocks[1].set_coefficient(2, 2, 3.0).unwrap();
            blocks[1].set_rhs(5, 7.0).unwrap();
        }
        assert_eq!(m.coefficient(1, 2), -1.0);
        assert_eq!(m.coefficient(2, 2), 3.0);
        assert_eq!(m.rhs()[5], 7.0);
        assert!(m.row_blocks(&[2..4, 0..2]).is_err());
    }
}
