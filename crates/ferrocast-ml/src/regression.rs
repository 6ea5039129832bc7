//! Ridge-stabilised ordinary least squares on standardised features.
//!
//! Columns are centred and scaled with training statistics. Columns whose
//! training variance is zero stay in the model with a zero coefficient, so a
//! constant indicator (RSI pinned at 100 on a monotone series, for instance)
//! does not make the fit undefined. The ridge term only keeps the normal
//! equations positive definite when features are collinear.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::ForecastError;

/// Fitted linear model: `y = intercept + sum(coef_j * (x_j - mean_j) / scale_j)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl LinearModel {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, ridge_lambda: f64) -> Result<Self, ForecastError> {
        let (rows, cols) = x.dim();
        if rows != y.len() {
            return Err(ForecastError::training(format!(
                "design matrix has {rows} rows but {} targets",
                y.len()
            )));
        }
        if rows < 2 || cols == 0 {
            return Err(ForecastError::training("need at least two samples and one feature"));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(ForecastError::training("training data contains non-finite values"));
        }

        let means = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ForecastError::training("empty design matrix"))?;
        let stds = x.std_axis(Axis(0), 0.0);
        let active: Vec<usize> = (0..cols)
            .filter(|&j| stds[j] > 1e-12 * means[j].abs().max(1.0))
            .collect();
        if active.is_empty() {
            return Err(ForecastError::training(
                "every feature column is constant; the fit is undefined",
            ));
        }

        let mut z = Array2::<f64>::zeros((rows, active.len()));
        for (k, &j) in active.iter().enumerate() {
            let column = x.column(j).mapv(|v| (v - means[j]) / stds[j]);
            z.column_mut(k).assign(&column);
        }
        let y_mean = y.sum() / rows as f64;
        let y_centered = y.mapv(|v| v - y_mean);

        let mut gram = z.t().dot(&z);
        let penalty = ridge_lambda * rows as f64;
        for k in 0..active.len() {
            gram[[k, k]] += penalty;
        }
        let rhs = z.t().dot(&y_centered);
        let beta = cholesky_solve(&gram, &rhs)?;

        let mut coefficients = vec![0.0; cols];
        let mut scales = vec![1.0; cols];
        for (k, &j) in active.iter().enumerate() {
            coefficients[j] = beta[k];
            scales[j] = stds[j];
        }

        tracing::debug!(
            active = active.len(),
            constant = cols - active.len(),
            rows,
            "fitted linear model"
        );

        Ok(Self {
            intercept: y_mean,
            coefficients,
            means: means.to_vec(),
            scales,
        })
    }

    pub fn predict_one(&self, features: &[f64]) -> f64 {
        self.intercept
            + features
                .iter()
                .zip(&self.coefficients)
                .zip(self.means.iter().zip(&self.scales))
                .map(|((&x, &coef), (&mean, &scale))| coef * (x - mean) / scale)
                .sum::<f64>()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.rows()
            .into_iter()
            .map(|row| self.predict_row(row))
            .collect()
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        match row.as_slice() {
            Some(slice) => self.predict_one(slice),
            None => self.predict_one(&row.to_vec()),
        }
    }
}

/// Solve `a * x = b` for symmetric positive definite `a`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ForecastError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return Err(ForecastError::training(
                        "normal equations are singular; features are degenerate",
                    ));
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn recovers_linear_relationship() {
        let x = array![[1.0, 0.5], [2.0, 0.1], [3.0, 0.9], [4.0, 0.3], [5.0, 0.7]];
        let y = x.map_axis(Axis(1), |row| 2.0 * row[0] - 3.0 * row[1] + 1.0);
        let model = LinearModel::fit(&x, &y, 0.0).expect("fit");
        let predicted = model.predict(&x);
        for (p, t) in predicted.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9, "{p} vs {t}");
        }
        assert!((model.predict_one(&[10.0, 0.0]) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn constant_columns_get_zero_weight() {
        let x = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0], [4.0, 7.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let model = LinearModel::fit(&x, &y, 1e-9).expect("fit");
        assert_eq!(model.coefficients[1], 0.0);
        assert!((model.predict_one(&[5.0, 100.0]) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn all_constant_columns_fail() {
        let x = array![[1.0, 7.0], [1.0, 7.0], [1.0, 7.0]];
        let y = array![1.0, 2.0, 3.0];
        let err = LinearModel::fit(&x, &y, 1e-6).expect_err("must fail");
        assert!(matches!(err, ForecastError::Training(_)));
    }

    #[test]
    fn collinear_columns_are_solvable_with_ridge() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];
        let model = LinearModel::fit(&x, &y, 1e-6).expect("ridge keeps it solvable");
        assert!((model.predict_one(&[5.0, 10.0]) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let x = array![[1.0], [f64::NAN], [3.0]];
        let y = array![1.0, 2.0, 3.0];
        assert!(LinearModel::fit(&x, &y, 0.0).is_err());
    }
}
