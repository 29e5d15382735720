//! OPSD dataset ingestion: column names, in-memory table, CSV loader.

mod loader;
mod table;

pub use loader::load_csv;
pub use table::{ColumnPresence, EnergyRecord, EnergyTable};

use thiserror::Error;

/// Column headers of the OPSD 15-minute single-index CSV.
pub mod columns {
    pub const UTC_TIMESTAMP: &str = "utc_timestamp";
    pub const LOAD_ACTUAL: &str = "DE_load_actual_entsoe_transparency";
    pub const LOAD_FORECAST: &str = "DE_load_forecast_entsoe_transparency";
    pub const SOLAR_CAPACITY: &str = "DE_solar_capacity";
    pub const SOLAR_GENERATION: &str = "DE_solar_generation_actual";
    pub const SOLAR_PROFILE: &str = "DE_solar_profile";
    pub const WIND_CAPACITY: &str = "DE_wind_capacity";
    pub const WIND_GENERATION: &str = "DE_wind_generation_actual";
    pub const WIND_PROFILE: &str = "DE_wind_profile";
    pub const WIND_ONSHORE_CAPACITY: &str = "DE_wind_onshore_capacity";
    pub const WIND_ONSHORE_GENERATION: &str = "DE_wind_onshore_generation_actual";
    pub const WIND_OFFSHORE_CAPACITY: &str = "DE_wind_offshore_capacity";
    pub const WIND_OFFSHORE_GENERATION: &str = "DE_wind_offshore_generation_actual";
}

/// Errors raised while loading the dataset.
///
/// Only unreadable input and a missing timestamp column are fatal; malformed
/// rows are skipped and counted on the resulting [`EnergyTable`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read \"{path}\": {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse \"{path}\": {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("column \"{0}\" not found in CSV header")]
    MissingTimestampColumn(&'static str),
    #[error("dataset \"{path}\" contains no usable rows")]
    Empty { path: String },
}
