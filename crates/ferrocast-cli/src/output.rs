use std::io::Write;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::metadata::Envelope;

pub fn render(envelope: &Envelope, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(stdout, "{payload}")?;
        }
        OutputFormat::Table => write!(stdout, "{}", render_table(envelope)?)?,
    }
    Ok(())
}

fn render_table(envelope: &Envelope) -> Result<String, CliError> {
    let mut out = String::new();
    let meta = &envelope.meta;
    out.push_str(&format!("request_id  : {}\n", meta.request_id));
    out.push_str(&format!("generated_at: {}\n", meta.generated_at));
    out.push_str(&format!("command     : {}\n", meta.command));
    out.push_str(&format!("source      : {}\n", meta.source));
    out.push_str(&format!("latency_ms  : {}\n", meta.latency_ms));

    if !meta.warnings.is_empty() {
        out.push_str("warnings:\n");
        for warning in &meta.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out.push_str("data:\n");
    match meta.command {
        "summary" => out.push_str(&summary_rows(&envelope.data)),
        "forecast" => out.push_str(&forecast_rows(&envelope.data)),
        "ask" => out.push_str(&advisory_text(&envelope.data)),
        _ => {
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }

    if !envelope.errors.is_empty() {
        out.push_str("errors:\n");
        for error in &envelope.errors {
            match &error.symbol {
                Some(symbol) => {
                    out.push_str(&format!("  - {symbol}: {}: {}\n", error.code, error.message))
                }
                None => out.push_str(&format!("  - {}: {}\n", error.code, error.message)),
            }
        }
    }

    Ok(out)
}

fn summary_rows(data: &Value) -> String {
    let mut out = String::new();
    for snapshot in items(data, "snapshots") {
        out.push_str(&format!(
            "  {:<12} | close {:>10.2} | change {:>+7.2}% | volume {:>14.0}\n",
            text(snapshot, "symbol"),
            number(snapshot, "close"),
            number(snapshot, "change_pct"),
            number(snapshot, "volume"),
        ));
    }
    out
}

fn forecast_rows(data: &Value) -> String {
    let mut out = String::new();
    for forecast in items(data, "forecasts") {
        out.push_str(&format!(
            "  {} | last close {:.2} | train R² {:.4} | test R² {:.4} | samples {}/{}\n",
            text(forecast, "symbol"),
            number(forecast, "last_close"),
            number(forecast, "train_r2"),
            number(forecast, "test_r2"),
            number(forecast, "train_samples"),
            number(forecast, "test_samples"),
        ));
        for day in items(forecast, "days") {
            out.push_str(&format!(
                "    day {:>2}: {:>10.2} ({:>+7.2}%)\n",
                number(day, "day"),
                number(day, "close"),
                number(day, "change_pct"),
            ));
        }
    }
    out
}

fn advisory_text(data: &Value) -> String {
    let mut out = String::new();
    for line in text(&data["advisory"], "text").lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out
}

fn items<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data[key].as_array().map(Vec::as_slice).unwrap_or_default()
}

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or_default()
}

fn number(value: &Value, key: &str) -> f64 {
    value[key].as_f64().unwrap_or(f64::NAN)
}
