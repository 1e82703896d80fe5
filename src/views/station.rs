// station.rs

//! Contains the `StationPollutionLazyFrame` structure holding per-station
//! pollutant statistics.

use crate::dataset::schema::{TrendPollutant, COL_STATION, TREND_POLLUTANT_COLUMNS};
use crate::error::AirstatError;
use crate::utils::f64_column;
use polars::prelude::{col, Expr, LazyFrame};
use serde::Serialize;

/// Mean, minimum and maximum pollutant concentrations for one monitoring
/// station, computed over non-missing values only.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct StationPollution {
    pub station: String,
    pub pm25_mean: Option<f64>,
    pub pm25_min: Option<f64>,
    pub pm25_max: Option<f64>,
    pub pm10_mean: Option<f64>,
    pub pm10_min: Option<f64>,
    pub pm10_max: Option<f64>,
    pub no2_mean: Option<f64>,
    pub no2_min: Option<f64>,
    pub no2_max: Option<f64>,
}

impl StationPollution {
    /// Mean concentration of `pollutant` at this station.
    pub fn mean(&self, pollutant: TrendPollutant) -> Option<f64> {
        match pollutant {
            TrendPollutant::Pm25 => self.pm25_mean,
            TrendPollutant::Pm10 => self.pm10_mean,
            TrendPollutant::No2 => self.no2_mean,
        }
    }

    /// Minimum concentration of `pollutant` at this station.
    pub fn min(&self, pollutant: TrendPollutant) -> Option<f64> {
        match pollutant {
            TrendPollutant::Pm25 => self.pm25_min,
            TrendPollutant::Pm10 => self.pm10_min,
            TrendPollutant::No2 => self.no2_min,
        }
    }

    /// Maximum concentration of `pollutant` at this station.
    pub fn max(&self, pollutant: TrendPollutant) -> Option<f64> {
        match pollutant {
            TrendPollutant::Pm25 => self.pm25_max,
            TrendPollutant::Pm10 => self.pm10_max,
            TrendPollutant::No2 => self.no2_max,
        }
    }
}

/// A wrapper around a Polars `LazyFrame` holding the per-station view: one
/// row per distinct station, with mean/min/max of PM2.5, PM10 and NO2 over
/// non-missing values, ascending by station label.
///
/// A station with no non-missing values for a pollutant keeps null cells for
/// that pollutant's statistics, never zero.
///
/// Instances are obtained via
/// [`crate::ObservationsLazyFrame::station_pollution`].
#[derive(Clone)]
pub struct StationPollutionLazyFrame {
    /// The underlying Polars LazyFrame containing the per-station rows.
    pub frame: LazyFrame,
}

impl StationPollutionLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub(crate) fn from_observations(observations: LazyFrame) -> Self {
        let frame = observations
            .group_by([col(COL_STATION)])
            .agg(statistic_columns())
            .sort([COL_STATION], Default::default());
        Self::new(frame)
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> StationPollutionLazyFrame {
        StationPollutionLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Collects the view into typed rows, ascending by station label.
    pub fn collect_rows(&self) -> Result<Vec<StationPollution>, AirstatError> {
        let df = self.frame.clone().collect()?;
        let stations = df.column(COL_STATION)?.str()?;
        let pm25_mean = f64_column(&df, "PM2.5_mean")?;
        let pm25_min = f64_column(&df, "PM2.5_min")?;
        let pm25_max = f64_column(&df, "PM2.5_max")?;
        let pm10_mean = f64_column(&df, "PM10_mean")?;
        let pm10_min = f64_column(&df, "PM10_min")?;
        let pm10_max = f64_column(&df, "PM10_max")?;
        let no2_mean = f64_column(&df, "NO2_mean")?;
        let no2_min = f64_column(&df, "NO2_min")?;
        let no2_max = f64_column(&df, "NO2_max")?;

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let Some(station) = stations.get(idx) else {
                continue;
            };
            rows.push(StationPollution {
                station: station.to_string(),
                pm25_mean: pm25_mean.get(idx),
                pm25_min: pm25_min.get(idx),
                pm25_max: pm25_max.get(idx),
                pm10_mean: pm10_mean.get(idx),
                pm10_min: pm10_min.get(idx),
                pm10_max: pm10_max.get(idx),
                no2_mean: no2_mean.get(idx),
                no2_min: no2_min.get(idx),
                no2_max: no2_max.get(idx),
            });
        }
        Ok(rows)
    }
}

/// The nine aggregation expressions, named `<column>_<statistic>`.
fn statistic_columns() -> Vec<Expr> {
    let mut aggregations = Vec::with_capacity(TREND_POLLUTANT_COLUMNS.len() * 3);
    for name in TREND_POLLUTANT_COLUMNS {
        aggregations.push(col(name).mean().alias(format!("{name}_mean")));
        aggregations.push(col(name).min().alias(format!("{name}_min")));
        aggregations.push(col(name).max().alias(format!("{name}_max")));
    }
    aggregations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::with_datetime_column;
    use crate::types::observations_frame::ObservationsLazyFrame;
    use polars::prelude::*;

    fn observations(stations: &[&str], pm25: &[Option<f64>]) -> ObservationsLazyFrame {
        let n = stations.len();
        let hours: Vec<i32> = (0..n as i32).map(|i| i % 24).collect();
        let df = df![
            "year" => vec![2013; n],
            "month" => vec![3; n],
            "day" => vec![1; n],
            "hour" => hours,
            "station" => stations,
            "PM2.5" => pm25,
            "PM10" => vec![Some(1.0); n],
            "NO2" => vec![Some(2.0); n],
        ]
        .unwrap();
        ObservationsLazyFrame::new(with_datetime_column(df.lazy()))
    }

    #[test]
    fn one_row_per_station_with_ordered_statistics() {
        let view = observations(
            &["B", "A", "A", "B"],
            &[Some(10.0), Some(5.0), Some(15.0), Some(30.0)],
        )
        .station_pollution();
        let rows = view.collect_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].station, "A");
        assert_eq!(rows[0].pm25_mean, Some(10.0));
        assert_eq!(rows[0].pm25_min, Some(5.0));
        assert_eq!(rows[0].pm25_max, Some(15.0));
        assert_eq!(rows[1].station, "B");
        assert_eq!(rows[1].pm25_mean, Some(20.0));
    }

    #[test]
    fn min_mean_max_are_ordered_for_every_station_and_pollutant() {
        let view = observations(
            &["A", "A", "B", "B", "C"],
            &[Some(3.0), Some(9.0), Some(100.0), None, Some(42.0)],
        )
        .station_pollution();

        for row in view.collect_rows().unwrap() {
            for pollutant in TrendPollutant::ALL {
                if let (Some(min), Some(mean), Some(max)) = (
                    row.min(pollutant),
                    row.mean(pollutant),
                    row.max(pollutant),
                ) {
                    assert!(min <= mean && mean <= max, "station {}", row.station);
                }
            }
        }
    }

    #[test]
    fn station_without_values_for_a_pollutant_stays_null() {
        let view = observations(&["A", "A"], &[None, None]).station_pollution();
        let rows = view.collect_rows().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pm25_mean, None);
        assert_eq!(rows[0].pm25_min, None);
        assert_eq!(rows[0].pm25_max, None);
        // The other pollutants still aggregate normally.
        assert_eq!(rows[0].pm10_mean, Some(1.0));
    }
}
