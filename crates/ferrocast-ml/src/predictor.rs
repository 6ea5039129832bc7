//! Training, evaluation and autoregressive forecasting.
//!
//! Forecasts are produced one day at a time: predict the next close from the
//! last feature row, append it as a synthetic bar, recompute features and
//! repeat. Each step feeds on earlier predictions, so forecast error compounds
//! with the horizon.

use std::sync::Arc;

use ferrocast_core::{FeatureConfig, ForecastConfig, PriceBar, PriceSeries, Symbol, UtcDateTime};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::features::{FeatureEngineer, FeatureRow};
use crate::metrics::{mean_absolute_error, r_squared, root_mean_squared_error};
use crate::regression::LinearModel;
use crate::ForecastError;

/// Forecast steps reserved up front; longer horizons grow as they go.
const PREALLOCATED_STEPS: usize = 256;

/// Evaluation of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub symbol: Symbol,
    pub train_r2: f64,
    pub test_r2: f64,
    pub train_mae: f64,
    pub test_mae: f64,
    pub train_rmse: f64,
    pub test_rmse: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    /// Timestamp of the last training row.
    pub train_end: UtcDateTime,
    /// Timestamp of the first test row; always later than `train_end`.
    pub test_start: UtcDateTime,
    pub feature_names: Vec<String>,
}

/// Immutable result of a successful `train` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    features: FeatureConfig,
    regression: LinearModel,
    report: TrainReport,
}

impl TrainedModel {
    pub fn feature_config(&self) -> &FeatureConfig {
        &self.features
    }

    pub fn report(&self) -> &TrainReport {
        &self.report
    }

    pub fn regression(&self) -> &LinearModel {
        &self.regression
    }

    /// Predict the close following the bar described by `row`.
    pub fn predict_row(&self, row: &FeatureRow) -> f64 {
        self.regression.predict_one(&row.values)
    }

    /// Forecast `days` closes after the end of `series`.
    pub fn predict_next(&self, series: &PriceSeries, days: usize) -> Result<Vec<f64>, ForecastError> {
        if days == 0 {
            return Err(ForecastError::InvalidHorizon);
        }
        let engineer = FeatureEngineer::new(self.features.clone())?;
        let spacing = bar_spacing(series);

        let mut working = series.clone();
        let mut predictions = Vec::with_capacity(days.min(PREALLOCATED_STEPS));
        for step in 0..days {
            let rows = engineer.compute(&working)?;
            let row = rows.last().ok_or(ForecastError::InsufficientData {
                required: engineer.lookback() + 1,
                available: working.len(),
            })?;
            let predicted = self.predict_row(row).max(0.0);

            let previous = *working.last().ok_or(ForecastError::InsufficientData {
                required: engineer.lookback() + 1,
                available: 0,
            })?;
            let bar = PriceBar::new(
                previous.ts.saturating_add(spacing),
                previous.close,
                previous.close.max(predicted),
                previous.close.min(predicted),
                predicted,
                previous.volume,
            )?;
            working.push(bar)?;
            tracing::trace!(step, predicted, "appended synthetic bar");
            predictions.push(predicted);
        }

        Ok(predictions)
    }
}

/// Per-symbol predictor holding the most recently trained model.
#[derive(Debug, Clone)]
pub struct Predictor {
    config: ForecastConfig,
    engineer: FeatureEngineer,
    model: Option<Arc<TrainedModel>>,
}

impl Predictor {
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        let engineer = FeatureEngineer::new(config.features.clone())?;
        Ok(Self {
            config,
            engineer,
            model: None,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn engineer(&self) -> &FeatureEngineer {
        &self.engineer
    }

    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.clone()
    }

    /// Install a model trained elsewhere (for example one deserialized from JSON).
    pub fn adopt(&mut self, model: Arc<TrainedModel>) {
        self.model = Some(model);
    }

    /// Fit, evaluate and store a new model. The previous model, if any, is
    /// replaced only on success.
    pub fn train(&mut self, series: &PriceSeries) -> Result<TrainReport, ForecastError> {
        let model = self.fit(series)?;
        let report = model.report.clone();
        self.model = Some(Arc::new(model));
        Ok(report)
    }

    /// Fit and evaluate without touching the stored model.
    pub fn fit(&self, series: &PriceSeries) -> Result<TrainedModel, ForecastError> {
        let rows = self.engineer.compute(series)?;
        let labelled: Vec<&FeatureRow> = rows.iter().filter(|row| row.label.is_some()).collect();

        let split = (labelled.len() as f64 * self.config.train_ratio).floor() as usize;
        let (train, test) = labelled.split_at(split.min(labelled.len()));
        if train.len() < self.config.min_train_samples {
            return Err(ForecastError::training(format!(
                "need at least {} training samples, have {}",
                self.config.min_train_samples,
                train.len()
            )));
        }
        if test.len() < self.config.min_test_samples {
            return Err(ForecastError::training(format!(
                "need at least {} test samples, have {}",
                self.config.min_test_samples,
                test.len()
            )));
        }

        let (x_train, y_train) = design_matrix(train, self.engineer.width());
        let (x_test, y_test) = design_matrix(test, self.engineer.width());
        let regression = LinearModel::fit(&x_train, &y_train, self.config.ridge_lambda)?;

        let train_pred = regression.predict(&x_train);
        let test_pred = regression.predict(&x_test);

        let (train_end, test_start) = match (train.last(), test.first()) {
            (Some(last), Some(first)) => (last.ts, first.ts),
            _ => return Err(ForecastError::training("empty partition after split")),
        };

        let report = TrainReport {
            symbol: series.symbol().clone(),
            train_r2: r_squared(y_train.view(), train_pred.view()),
            test_r2: r_squared(y_test.view(), test_pred.view()),
            train_mae: mean_absolute_error(y_train.view(), train_pred.view()),
            test_mae: mean_absolute_error(y_test.view(), test_pred.view()),
            train_rmse: root_mean_squared_error(y_train.view(), train_pred.view()),
            test_rmse: root_mean_squared_error(y_test.view(), test_pred.view()),
            train_samples: train.len(),
            test_samples: test.len(),
            train_end,
            test_start,
            feature_names: self.engineer.feature_names(),
        };

        tracing::info!(
            symbol = %report.symbol,
            train_r2 = report.train_r2,
            test_r2 = report.test_r2,
            train_samples = report.train_samples,
            test_samples = report.test_samples,
            "trained price model"
        );

        Ok(TrainedModel {
            features: self.config.features.clone(),
            regression,
            report,
        })
    }

    /// Forecast `days` closes with the stored model.
    pub fn predict_next(&self, series: &PriceSeries, days: usize) -> Result<Vec<f64>, ForecastError> {
        let model = self.model.as_ref().ok_or_else(|| {
            ForecastError::NotTrained(String::from("call train before predict_next"))
        })?;
        if model.features != self.config.features {
            return Err(ForecastError::NotTrained(String::from(
                "stored model was trained with a different feature configuration",
            )));
        }
        model.predict_next(series, days)
    }
}

fn design_matrix(rows: &[&FeatureRow], width: usize) -> (Array2<f64>, Array1<f64>) {
    let mut x = Array2::<f64>::zeros((rows.len(), width));
    let mut y = Array1::<f64>::zeros(rows.len());
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.values.iter().enumerate() {
            x[[i, j]] = value;
        }
        y[i] = row.label.unwrap_or(f64::NAN);
    }
    (x, y)
}

/// Spacing of the last two bars, one day when it cannot be inferred.
fn bar_spacing(series: &PriceSeries) -> Duration {
    let bars = series.bars();
    match bars {
        [.., previous, last] if last.ts > previous.ts => last.ts.since(previous.ts),
        _ => Duration::days(1),
    }
}
