//! Shared fixtures: synthetic OPSD-style dataset generation.
#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 15-minute steps per day.
pub const STEPS_PER_DAY: usize = 96;

/// Gaussian noise via the Box-Muller transform.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}

/// One synthetic 15-minute observation, MW.
pub struct SyntheticRow {
    pub timestamp: DateTime<Utc>,
    pub load: f32,
    pub load_forecast: f32,
    pub solar_capacity: f32,
    pub solar_generation: f32,
    pub wind_capacity: f32,
    pub wind_onshore_generation: f32,
    pub wind_offshore_generation: f32,
}

/// Builds `n` rows with known sinusoidal solar/wind patterns: a daylight
/// half-sine for solar, a slow multi-day sinusoid for wind, a diurnal load
/// curve, plus seeded Gaussian noise.
pub fn synthetic_rows(n: usize, seed: u64) -> Vec<SyntheticRow> {
    let t0 = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);

    (0..n)
        .map(|i| {
            let step = i % STEPS_PER_DAY;
            let day_frac = step as f32 / STEPS_PER_DAY as f32;

            // Daylight between 06:00 and 18:00.
            let daylight = if (0.25..0.75).contains(&day_frac) {
                (std::f32::consts::PI * (day_frac - 0.25) / 0.5).sin()
            } else {
                0.0
            };
            let solar = (30000.0 * daylight * (1.0 + gaussian_noise(&mut rng, 0.05))).max(0.0);

            let wind_phase = i as f32 * 2.0 * std::f32::consts::PI / (STEPS_PER_DAY as f32 * 3.0);
            let onshore =
                (9000.0 + 5000.0 * wind_phase.sin() + gaussian_noise(&mut rng, 300.0)).max(0.0);
            let offshore =
                (2500.0 + 1200.0 * (wind_phase + 0.8).sin() + gaussian_noise(&mut rng, 100.0))
                    .max(0.0);

            let load = 45000.0
                + 10000.0 * (2.0 * std::f32::consts::PI * day_frac - 1.0).sin()
                + gaussian_noise(&mut rng, 500.0);
            let load_forecast = load + gaussian_noise(&mut rng, 800.0);

            SyntheticRow {
                timestamp: t0 + Duration::minutes(15 * i as i64),
                load,
                load_forecast,
                solar_capacity: 42000.0,
                solar_generation: solar,
                wind_capacity: 60000.0,
                wind_onshore_generation: onshore,
                wind_offshore_generation: offshore,
            }
        })
        .collect()
}

const CSV_HEADER: &str = "utc_timestamp,DE_load_actual_entsoe_transparency,\
                          DE_load_forecast_entsoe_transparency,DE_solar_capacity,\
                          DE_solar_generation_actual,DE_wind_capacity,\
                          DE_wind_onshore_generation_actual,DE_wind_offshore_generation_actual";

/// Writes rows in the OPSD column layout. `blank_solar` marks row indices
/// whose solar cell is left empty to exercise the missing-data policy.
pub fn write_synthetic_csv(
    path: &Path,
    rows: &[SyntheticRow],
    blank_solar: &[usize],
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "{CSV_HEADER}")?;
    for (i, r) in rows.iter().enumerate() {
        let solar = if blank_solar.contains(&i) {
            String::new()
        } else {
            format!("{:.2}", r.solar_generation)
        };
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{},{:.2},{:.2},{:.2}",
            r.timestamp.to_rfc3339(),
            r.load,
            r.load_forecast,
            r.solar_capacity,
            solar,
            r.wind_capacity,
            r.wind_onshore_generation,
            r.wind_offshore_generation,
        )?;
    }
    file.flush()
}

/// Builds a temp-dir CSV with `n` synthetic rows.
pub fn synthetic_csv(n: usize, seed: u64) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("synthetic.csv");
    write_synthetic_csv(&path, &synthetic_rows(n, seed), &[]).expect("write csv");
    (dir, path)
}
