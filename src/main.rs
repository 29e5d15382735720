//! gridscope entry point — CLI wiring and config-driven analysis pipeline.

use std::path::Path;
use std::process;

use burn::backend::ndarray::NdArrayDevice;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridscope::config::AnalysisConfig;
use gridscope::dataset::{self, EnergyTable};
use gridscope::features::{self, MinMaxScaler};
use gridscope::io::export::{export_daily_csv, export_forecast_csv};
use gridscope::kpi::KpiReport;
use gridscope::model::{self, artifact, PersistenceForecast};
use gridscope::report::{self, ForecastPoint};

/// Autodiff-enabled backend for training.
type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
/// Plain backend for inference and loaded models.
type InferenceBackend = burn::backend::NdArray;

/// Parsed CLI arguments.
struct CliArgs {
    data_path: Option<String>,
    config_path: Option<String>,
    train: bool,
    model_in: Option<String>,
    model_out: Option<String>,
    forecast_out: Option<String>,
    report_out: Option<String>,
    seed_override: Option<u64>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
    #[cfg(feature = "tui")]
    tui: bool,
}

fn print_help() {
    eprintln!("gridscope — Germany electricity dataset analysis and forecasting");
    eprintln!();
    eprintln!("Usage: gridscope [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data <path>            OPSD 15-minute CSV (overrides config)");
    eprintln!("  --config <path>          Load analysis config from TOML file");
    eprintln!("  --train                  Train the forecast network");
    eprintln!("  --model-in <path>        Load trained weights instead of training");
    eprintln!("  --model-out <path>       Write trained weights (requires --train)");
    eprintln!("  --forecast-out <path>    Export forecast CSV");
    eprintln!("  --report-out <path>      Export daily energy report CSV");
    eprintln!("  --seed <u64>             Override training shuffle seed");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start JSON dashboard server after analysis");
        eprintln!("  --port <u16>             Dashboard server port (default: 3000)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Open the terminal dashboard after analysis");
    eprintln!("  --help                   Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        data_path: None,
        config_path: None,
        train: false,
        model_in: None,
        model_out: None,
        forecast_out: None,
        report_out: None,
        seed_override: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
        #[cfg(feature = "tui")]
        tui: false,
    };

    let take_value = |args: &[String], i: &mut usize, flag: &str| -> String {
        *i += 1;
        if *i >= args.len() {
            eprintln!("error: {flag} requires an argument");
            process::exit(1);
        }
        args[*i].clone()
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--data" => cli.data_path = Some(take_value(&args, &mut i, "--data")),
            "--config" => cli.config_path = Some(take_value(&args, &mut i, "--config")),
            "--train" => cli.train = true,
            "--model-in" => cli.model_in = Some(take_value(&args, &mut i, "--model-in")),
            "--model-out" => cli.model_out = Some(take_value(&args, &mut i, "--model-out")),
            "--forecast-out" => {
                cli.forecast_out = Some(take_value(&args, &mut i, "--forecast-out"));
            }
            "--report-out" => cli.report_out = Some(take_value(&args, &mut i, "--report-out")),
            "--seed" => {
                let raw = take_value(&args, &mut i, "--seed");
                match raw.parse::<u64>() {
                    Ok(s) => cli.seed_override = Some(s),
                    Err(_) => {
                        eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                        process::exit(1);
                    }
                }
            }
            #[cfg(feature = "api")]
            "--serve" => cli.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                let raw = take_value(&args, &mut i, "--port");
                match raw.parse::<u16>() {
                    Ok(p) => cli.port = p,
                    Err(_) => {
                        eprintln!("error: --port value \"{raw}\" is not a valid u16");
                        process::exit(1);
                    }
                }
            }
            #[cfg(feature = "tui")]
            "--tui" => cli.tui = true,
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the scaled renewable series, trains (or loads) the network, and
/// returns next-step predictions aligned with the table's timestamps.
fn build_forecast(
    table: &EnergyTable,
    cfg: &AnalysisConfig,
    model_in: Option<&Path>,
    model_out: Option<&Path>,
) -> Result<Vec<ForecastPoint>, String> {
    let lookback = cfg.model.lookback;

    let raw = features::renewable_generation(table);
    let dense = features::apply_fill(&raw, cfg.features.fill_policy()).map_err(|e| e.to_string())?;
    if dense.filled > 0 {
        info!(filled = dense.filled, "forward-filled missing renewable values");
    }

    let boundary = features::train_val_split(dense.values.len(), cfg.features.train_fraction)
        .map_err(|e| e.to_string())?;
    if boundary <= lookback {
        return Err(format!(
            "dataset too short: {} usable points for look-back {lookback}",
            dense.values.len()
        ));
    }

    // Scaler statistics come from the training portion only.
    let scaler = MinMaxScaler::fit(&dense.values[..boundary]).map_err(|e| e.to_string())?;
    let scaled = scaler.transform_all(&dense.values);
    let device = NdArrayDevice::default();
    let net_cfg = cfg.model.net_config();

    let net = if let Some(path) = model_in {
        artifact::load_weights::<InferenceBackend>(&net_cfg, path, &device)
            .map_err(|e| e.to_string())?
    } else {
        let train = &scaled[..boundary];
        // Validation history overlaps the split so its first target is the
        // first held-out point.
        let val = &scaled[boundary - lookback..];
        let outcome = model::fit::<TrainBackend>(train, val, &net_cfg, &cfg.training, &device)
            .map_err(|e| e.to_string())?;

        println!("\n{outcome}");
        if let Some(baseline) = PersistenceForecast.mse(val, lookback) {
            println!("Persistence baseline val MSE: {baseline:.6}");
        }

        if let Some(path) = model_out {
            artifact::save_weights(outcome.model.clone(), path).map_err(|e| e.to_string())?;
            eprintln!("Model weights written to {}", path.display());
        }
        outcome.model
    };

    let predictions = model::predict(&net, &scaled, lookback, cfg.training.batch_size, &device)
        .map_err(|e| e.to_string())?;

    Ok(predictions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let t = lookback + i;
            let row = dense.index_map[t];
            ForecastPoint {
                timestamp: table.records[row].timestamp,
                actual_mw: dense.values[t],
                predicted_mw: scaler.inverse(p),
            }
        })
        .collect())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = parse_args();

    if cli.model_out.is_some() && !cli.train {
        eprintln!("error: --model-out requires --train");
        process::exit(1);
    }
    if cli.forecast_out.is_some() && !cli.train && cli.model_in.is_none() {
        eprintln!("error: --forecast-out requires --train or --model-in");
        process::exit(1);
    }

    // Load config: --config file, then CLI overrides on top of it.
    let mut config = if let Some(ref path) = cli.config_path {
        match AnalysisConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        AnalysisConfig::default()
    };
    if let Some(ref path) = cli.data_path {
        config.data.path = path.clone();
    }
    if let Some(seed) = cli.seed_override {
        config.training.seed = seed;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Load the dataset; an unreadable file is the one fatal input error.
    let table = match dataset::load_csv(Path::new(&config.data.path)) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    if let Some((first, last)) = table.span() {
        info!(
            records = table.len(),
            skipped = table.rows_skipped,
            %first,
            %last,
            "dataset loaded"
        );
    }

    let kpi = KpiReport::from_table(&table);
    println!("{kpi}");

    let factors = report::capacity_factors(&table);
    if let (Some(solar), Some(wind)) = (factors.solar, factors.wind) {
        println!(
            "Capacity factors:        solar {:.1}%, wind {:.1}%",
            solar * 100.0,
            wind * 100.0
        );
    }

    let raw = features::renewable_generation(&table);
    if let Ok(dense) = features::apply_fill(&raw, config.features.fill_policy()) {
        let ramps = features::ramp_rates(&dense.values);
        if !ramps.is_empty() {
            let steepest_up = ramps.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let steepest_down = ramps.iter().copied().fold(f32::INFINITY, f32::min);
            println!(
                "Steepest renewable ramp: +{steepest_up:.0} MW / {steepest_down:.0} MW per step"
            );
        }
    }

    let forecast = if cli.train || cli.model_in.is_some() {
        match build_forecast(
            &table,
            &config,
            cli.model_in.as_deref().map(Path::new),
            cli.model_out.as_deref().map(Path::new),
        ) {
            Ok(points) => Some(points),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    } else {
        None
    };

    if let (Some(path), Some(points)) = (&cli.forecast_out, &forecast) {
        if let Err(e) = export_forecast_csv(points, Path::new(path)) {
            eprintln!("error: failed to write forecast CSV: {e}");
            process::exit(1);
        }
        eprintln!("Forecast written to {path}");
    }

    let daily = report::daily_energy(&table);
    if let Some(ref path) = cli.report_out {
        if let Err(e) = export_daily_csv(&daily, Path::new(path)) {
            eprintln!("error: failed to write report CSV: {e}");
            process::exit(1);
        }
        eprintln!("Daily report written to {path}");
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        let app = gridscope::tui::App::new(
            kpi.clone(),
            daily.clone(),
            report::monthly_profile(&table),
            report::yearly_capacity(&table),
            forecast.clone(),
        );
        gridscope::tui::run(app);
        return;
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(gridscope::api::AppState {
            kpi,
            daily,
            monthly: report::monthly_profile(&table),
            capacity: report::yearly_capacity(&table),
            wind: report::wind_breakdown(&table),
            forecast,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(gridscope::api::serve(state, addr));
    }
}
