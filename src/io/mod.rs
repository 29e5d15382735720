/// CSV export of forecasts and derived report series.
pub mod export;
