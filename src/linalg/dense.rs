use faer::{Col, prelude::Solve};
use faer_ext::IntoFaer;
use ndarray::{Array1, Array2};

use crate::error::{Result, TorsionError};

/// Partial-pivot LU solve of a dense system through faer.
pub fn solve_dense(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();
    let a_faer = a.view().into_faer();
    let b_faer = Col::<f64>::from_iter(b.view().iter().copied());
    let flu = a_faer.partial_piv_lu();
    let x = flu.solve(&b_faer);
    let x_ndarray = Array1::from_iter(x.subrows(0, n).iter().copied());
    if let Some(row) = x_ndarray.iter().position(|v| !v.is_finite()) {
        return Err(TorsionError::SingularMatrix { row, pivot: 0.0 });
    }
    Ok(x_ndarray)
}
