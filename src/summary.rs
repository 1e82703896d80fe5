//! Scalar summaries the dashboard shows as metric cards next to the charts.

use crate::dataset::schema::{
    TrendPollutant, COL_DATETIME, COL_DEWP, COL_NO2, COL_PM10, COL_PM25, COL_PRES, COL_TEMP,
    COL_WSPM,
};
use crate::error::AirstatError;
use crate::utils::f64_column;
use crate::views::station::StationPollution;
use polars::prelude::{col, LazyFrame};
use serde::Serialize;

/// Single-pass reductions over a (filtered) observation table: the row count
/// and the overall means of the trend pollutants and headline weather
/// variables.
///
/// Missing values are excluded from each mean; a column with no values at
/// all yields `None`, never zero.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct RangeSummary {
    pub observations: usize,
    pub mean_pm25: Option<f64>,
    pub mean_pm10: Option<f64>,
    pub mean_no2: Option<f64>,
    pub mean_temperature: Option<f64>,
    pub mean_dew_point: Option<f64>,
    pub mean_pressure: Option<f64>,
    pub mean_wind_speed: Option<f64>,
}

impl RangeSummary {
    pub(crate) fn from_observations(observations: LazyFrame) -> Result<Self, AirstatError> {
        let df = observations
            .select([
                col(COL_DATETIME).count().alias("observations"),
                col(COL_PM25).mean().alias("mean_pm25"),
                col(COL_PM10).mean().alias("mean_pm10"),
                col(COL_NO2).mean().alias("mean_no2"),
                col(COL_TEMP).mean().alias("mean_temperature"),
                col(COL_DEWP).mean().alias("mean_dew_point"),
                col(COL_PRES).mean().alias("mean_pressure"),
                col(COL_WSPM).mean().alias("mean_wind_speed"),
            ])
            .collect()?;

        let count = df.column("observations")?.u32()?.get(0).unwrap_or(0);
        Ok(RangeSummary {
            observations: count as usize,
            mean_pm25: f64_column(&df, "mean_pm25")?.get(0),
            mean_pm10: f64_column(&df, "mean_pm10")?.get(0),
            mean_no2: f64_column(&df, "mean_no2")?.get(0),
            mean_temperature: f64_column(&df, "mean_temperature")?.get(0),
            mean_dew_point: f64_column(&df, "mean_dew_point")?.get(0),
            mean_pressure: f64_column(&df, "mean_pressure")?.get(0),
            mean_wind_speed: f64_column(&df, "mean_wind_speed")?.get(0),
        })
    }
}

/// The station whose mean concentration of `pollutant` is highest, from a
/// collected per-station view. Stations without a mean for the pollutant are
/// ignored; `None` when no station has one.
pub fn highest_mean_station(
    stations: &[StationPollution],
    pollutant: TrendPollutant,
) -> Option<&StationPollution> {
    stations
        .iter()
        .filter_map(|row| row.mean(pollutant).map(|mean| (row, mean)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(row, _)| row)
}

/// The station whose mean concentration of `pollutant` is lowest.
pub fn lowest_mean_station(
    stations: &[StationPollution],
    pollutant: TrendPollutant,
) -> Option<&StationPollution> {
    stations
        .iter()
        .filter_map(|row| row.mean(pollutant).map(|mean| (row, mean)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(row, _)| row)
}
