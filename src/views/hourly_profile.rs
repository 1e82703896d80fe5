// hourly_profile.rs

//! Contains the `HourlyProfileLazyFrame` structure holding the 24-hour
//! pollutant profile.

use crate::dataset::schema::{COL_DATETIME, COL_NO2, COL_PM10, COL_PM25, TREND_POLLUTANT_COLUMNS};
use crate::error::AirstatError;
use crate::utils::f64_column;
use polars::prelude::{col, DataType, Expr, LazyFrame};
use serde::Serialize;

const COL_HOUR_OF_DAY: &str = "hour";

/// Mean pollutant concentrations for one hour of the day.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct HourlyProfile {
    pub hour: u32,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
}

/// A wrapper around a Polars `LazyFrame` holding the diurnal view: one row
/// per hour of day present in the input, with the mean of PM2.5, PM10 and
/// NO2 across all observations at that hour, ascending by hour.
///
/// Hours with no observations are omitted.
///
/// Instances are obtained via
/// [`crate::ObservationsLazyFrame::hourly_profile`].
#[derive(Clone)]
pub struct HourlyProfileLazyFrame {
    /// The underlying Polars LazyFrame containing the hourly rows.
    pub frame: LazyFrame,
}

impl HourlyProfileLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub(crate) fn from_observations(observations: LazyFrame) -> Self {
        let frame = observations
            .group_by([col(COL_DATETIME)
                .dt()
                .hour()
                .cast(DataType::Int32)
                .alias(COL_HOUR_OF_DAY)])
            .agg(TREND_POLLUTANT_COLUMNS.map(|name| col(name).mean()))
            .sort([COL_HOUR_OF_DAY], Default::default());
        Self::new(frame)
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> HourlyProfileLazyFrame {
        HourlyProfileLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Collects the view into typed rows, ascending by hour.
    pub fn collect_rows(&self) -> Result<Vec<HourlyProfile>, AirstatError> {
        let df = self.frame.clone().collect()?;
        let hours = df.column(COL_HOUR_OF_DAY)?.i32()?;
        let pm25 = f64_column(&df, COL_PM25)?;
        let pm10 = f64_column(&df, COL_PM10)?;
        let no2 = f64_column(&df, COL_NO2)?;

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let Some(hour) = hours.get(idx).and_then(|h| u32::try_from(h).ok()) else {
                continue;
            };
            rows.push(HourlyProfile {
                hour,
                pm25: pm25.get(idx),
                pm10: pm10.get(idx),
                no2: no2.get(idx),
            });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::with_datetime_column;
    use crate::types::observations_frame::ObservationsLazyFrame;
    use polars::prelude::*;

    fn observations(days: &[i32], hours: &[i32], pm25: &[Option<f64>]) -> ObservationsLazyFrame {
        let n = days.len();
        let df = df![
            "year" => vec![2013; n],
            "month" => vec![3; n],
            "day" => days,
            "hour" => hours,
            "PM2.5" => pm25,
            "PM10" => vec![Some(1.0); n],
            "NO2" => vec![Some(2.0); n],
        ]
        .unwrap();
        ObservationsLazyFrame::new(with_datetime_column(df.lazy()))
    }

    #[test]
    fn averages_each_hour_across_days() {
        let view = observations(
            &[1, 2, 1],
            &[8, 8, 20],
            &[Some(10.0), Some(30.0), Some(5.0)],
        )
        .hourly_profile();
        let rows = view.collect_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hour, 8);
        assert_eq!(rows[0].pm25, Some(20.0));
        assert_eq!(rows[1].hour, 20);
        assert_eq!(rows[1].pm25, Some(5.0));
    }

    #[test]
    fn hours_are_ascending_and_absent_hours_are_omitted() {
        let view = observations(
            &[1, 1, 1],
            &[23, 0, 12],
            &[Some(1.0), Some(2.0), Some(3.0)],
        )
        .hourly_profile();
        let rows = view.collect_rows().unwrap();

        let hours: Vec<u32> = rows.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![0, 12, 23]);
    }
}
