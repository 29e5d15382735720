//! CSV export for forecast results and daily report series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::{DailyEnergy, ForecastPoint};

/// Column header for the forecast export.
const FORECAST_HEADER: &str = "utc_timestamp,actual_mw,predicted_mw";

/// Column header for the daily report export.
const DAILY_HEADER: &str = "date,solar_mwh,wind_mwh,load_mwh,renewable_share";

/// Exports forecast points to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_forecast_csv(points: &[ForecastPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_forecast_csv(points, buf)
}

/// Writes forecast points as CSV to any writer.
///
/// Produces deterministic output for identical inputs.
pub fn write_forecast_csv(points: &[ForecastPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(FORECAST_HEADER.split(','))?;
    for p in points {
        wtr.write_record(&[
            p.timestamp.to_rfc3339(),
            format!("{:.3}", p.actual_mw),
            format!("{:.3}", p.predicted_mw),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the daily energy series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_daily_csv(days: &[DailyEnergy], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_daily_csv(days, buf)
}

/// Writes the daily energy series as CSV to any writer. Missing values are
/// written as empty cells.
pub fn write_daily_csv(days: &[DailyEnergy], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(DAILY_HEADER.split(','))?;
    for d in days {
        wtr.write_record(&[
            d.date.to_string(),
            opt_cell(d.solar_mwh, 1),
            opt_cell(d.wind_mwh, 1),
            opt_cell(d.load_mwh, 1),
            opt_cell(d.renewable_share, 4),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn opt_cell(v: Option<f32>, decimals: usize) -> String {
    v.map_or_else(String::new, |v| format!("{v:.decimals$}"))
}
