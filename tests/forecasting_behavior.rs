//! Behavior-driven tests for feature engineering, training and forecasting.
//!
//! These tests describe what a caller observes when it trains a per-symbol
//! model and asks it for multi-day forecasts.

use std::sync::Arc;

use ferrocast_core::{FeatureConfig, ForecastConfig};
use ferrocast_ml::{forecast_batch, FeatureEngineer, ForecastError, Predictor};
use ferrocast_tests::{daily_series, increasing_series};

fn noisy_close(i: usize) -> f64 {
    let t = i as f64;
    200.0 + 0.05 * t + 6.0 * (t / 9.0).sin() + 2.5 * (t * 1.7).cos()
}

// =============================================================================
// Feature engineering
// =============================================================================

#[test]
fn when_series_has_n_bars_system_produces_n_minus_lookback_rows_of_fixed_width() {
    // Given: The default indicator configuration and 120 daily bars
    let engineer = FeatureEngineer::new(FeatureConfig::default()).expect("valid config");
    let series = daily_series("SBIN", 120, noisy_close);

    // When: Features are computed
    let rows = engineer.compute(&series).expect("enough history");

    // Then: One row per bar after the lookback window, all the same width
    assert_eq!(engineer.lookback(), 50);
    assert_eq!(rows.len(), 120 - 50);
    assert!(rows.iter().all(|row| row.values.len() == engineer.width()));
    assert!(rows.iter().all(|row| row.values.iter().all(|v| v.is_finite())));

    // And: Only the final row lacks a next-close label
    assert!(rows[..rows.len() - 1].iter().all(|row| row.label.is_some()));
    assert_eq!(rows.last().and_then(|row| row.label), None);
}

#[test]
fn when_series_is_one_bar_past_lookback_system_produces_exactly_one_row() {
    // Given: Exactly lookback + 1 bars
    let engineer = FeatureEngineer::new(FeatureConfig::default()).expect("valid config");
    let series = daily_series("INFY", 51, noisy_close);

    // When / Then: A single unlabelled row is produced
    let rows = engineer.compute(&series).expect("minimum history");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, None);
}

#[test]
fn when_series_is_shorter_than_lookback_system_reports_insufficient_data() {
    // Given: Only 50 bars for a 50-bar lookback
    let engineer = FeatureEngineer::new(FeatureConfig::default()).expect("valid config");
    let series = daily_series("TCS", 50, noisy_close);

    // When
    let err = engineer.compute(&series).expect_err("too short");

    // Then: The error names what was required and what was available
    assert_eq!(
        err,
        ForecastError::InsufficientData {
            required: 51,
            available: 50
        }
    );
}

#[test]
fn when_windows_are_custom_system_feature_width_follows_configuration() {
    // Given: Two moving-average windows instead of three
    let config = FeatureConfig {
        ma_windows: vec![10, 30],
        ..FeatureConfig::default()
    };
    let engineer = FeatureEngineer::new(config).expect("valid config");

    // When
    let rows = engineer
        .compute(&daily_series("WIPRO", 80, noisy_close))
        .expect("enough history");

    // Then: Width shrinks by one and lookback follows the slowest indicator
    assert_eq!(engineer.width(), 8);
    assert_eq!(engineer.lookback(), 30);
    assert_eq!(rows.len(), 50);
    assert_eq!(engineer.feature_names().len(), 8);
}

// =============================================================================
// Training
// =============================================================================

#[test]
fn when_series_trends_upward_system_trains_and_forecasts_the_trend() {
    // Given: 400 bars of strictly increasing closes
    let series = increasing_series(400);
    let last_close = series.last().expect("bars").close;
    let mut predictor = Predictor::new(ForecastConfig::default()).expect("valid config");

    // When: The model is trained and asked for five days
    let report = predictor.train(&series).expect("training succeeds");
    let forecast = predictor.predict_next(&series, 5).expect("forecast succeeds");

    // Then: The test score is a real number no greater than one
    assert!(report.test_r2.is_finite(), "test R² = {}", report.test_r2);
    assert!(report.test_r2 <= 1.0);
    assert!(report.train_r2 <= 1.0);

    // And: Five values that keep following the trend
    assert_eq!(forecast.len(), 5);
    assert!(forecast.iter().all(|v| v.is_finite() && *v > 0.0));
    assert!(forecast[0] > last_close - 1.0, "{} vs {last_close}", forecast[0]);
    for pair in forecast.windows(2) {
        assert!(pair[1] >= pair[0] - 0.05, "forecast not increasing: {forecast:?}");
    }
    assert!(forecast[4] > forecast[0], "forecast flat: {forecast:?}");
}

#[test]
fn when_model_is_trained_system_splits_history_chronologically() {
    // Given
    let series = daily_series("HDFCBANK", 300, noisy_close);
    let mut predictor = Predictor::new(ForecastConfig::default()).expect("valid config");

    // When
    let report = predictor.train(&series).expect("training succeeds");

    // Then: Every training row precedes every test row, 80/20 by count
    assert!(report.train_end < report.test_start);
    assert_eq!(report.train_samples + report.test_samples, 300 - 50 - 1);
    assert_eq!(report.train_samples, (249.0_f64 * 0.8).floor() as usize);
    assert!(report.train_r2 <= 1.0 && report.test_r2 <= 1.0);
}

#[test]
fn when_training_repeats_on_same_data_system_reports_identical_scores() {
    // Given: Two predictors with identical configuration
    let series = daily_series("ITC", 260, noisy_close);
    let mut first = Predictor::new(ForecastConfig::default()).expect("valid config");
    let mut second = Predictor::new(ForecastConfig::default()).expect("valid config");

    // When
    let a = first.train(&series).expect("training succeeds");
    let b = second.train(&series).expect("training succeeds");

    // Then: Training is deterministic
    assert_eq!(a, b);
    assert_eq!(
        first.predict_next(&series, 3).expect("forecast"),
        second.predict_next(&series, 3).expect("forecast")
    );
}

#[test]
fn when_model_is_retrained_system_leaves_earlier_model_untouched() {
    // Given: A model trained on one history
    let mut predictor = Predictor::new(ForecastConfig::default()).expect("valid config");
    predictor
        .train(&daily_series("LT", 260, noisy_close))
        .expect("training succeeds");
    let earlier = predictor.model().expect("trained");
    let earlier_report = earlier.report().clone();

    // When: The predictor is retrained on a different history
    predictor
        .train(&increasing_series(260))
        .expect("training succeeds");

    // Then: The earlier model still reports its own scores
    let latest = predictor.model().expect("trained");
    assert!(!Arc::ptr_eq(&earlier, &latest));
    assert_eq!(earlier.report(), &earlier_report);
    assert_ne!(latest.report().symbol, earlier_report.symbol);
}

#[test]
fn when_history_is_short_system_fails_training_without_storing_a_model() {
    // Given: Enough bars for features but too few for a train/test split
    let mut predictor = Predictor::new(ForecastConfig::default()).expect("valid config");

    // When
    let err = predictor
        .train(&daily_series("MARUTI", 75, noisy_close))
        .expect_err("too few samples");

    // Then
    assert!(matches!(err, ForecastError::Training(_)));
    assert!(predictor.model().is_none());
}

// =============================================================================
// Forecasting
// =============================================================================

#[test]
fn when_forecast_requested_before_training_system_reports_not_trained() {
    // Given: A fresh predictor
    let predictor = Predictor::new(ForecastConfig::default()).expect("valid config");

    // When
    let err = predictor
        .predict_next(&increasing_series(200), 5)
        .expect_err("no model");

    // Then
    assert!(matches!(err, ForecastError::NotTrained(_)));
}

#[test]
fn when_forecasting_system_leaves_the_callers_series_unchanged() {
    // Given: A trained predictor
    let series = increasing_series(300);
    let mut predictor = Predictor::new(ForecastConfig::default()).expect("valid config");
    predictor.train(&series).expect("training succeeds");
    let before = series.clone();

    // When
    predictor.predict_next(&series, 10).expect("forecast succeeds");

    // Then: Synthetic bars were appended to a working copy only
    assert_eq!(series, before);
}

#[test]
fn when_many_symbols_are_forecast_system_keeps_per_symbol_results() {
    // Given: Two usable histories and one that is far too short
    let series = vec![
        increasing_series(320),
        daily_series("SHORT", 30, noisy_close),
        daily_series("NOISY", 320, noisy_close),
    ];

    // When
    let results = forecast_batch(&ForecastConfig::default(), &series, 5);

    // Then: Order is preserved and only the short history failed
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0.as_str(), "TREND");
    assert_eq!(results[0].1.as_ref().expect("trend").predictions.len(), 5);
    assert!(matches!(
        results[1].1,
        Err(ForecastError::InsufficientData { .. })
    ));
    assert!(results[2].1.is_ok());
}
