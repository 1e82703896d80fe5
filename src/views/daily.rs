// daily.rs

//! Contains the `DailyPollutionLazyFrame` structure holding the daily
//! pollutant trend view.

use crate::dataset::schema::{COL_DATETIME, COL_NO2, COL_PM10, COL_PM25, TREND_POLLUTANT_COLUMNS};
use crate::error::AirstatError;
use crate::utils::{date_from_days, f64_column};
use chrono::NaiveDate;
use polars::prelude::{col, DataType, Expr, LazyFrame};
use serde::Serialize;

const COL_DATE: &str = "date";

/// One calendar day of mean pollutant concentrations.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DailyPollution {
    pub date: NaiveDate,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
}

/// A wrapper around a Polars `LazyFrame` holding the daily trend view: one
/// row per calendar day present in the input, with the arithmetic mean of
/// PM2.5, PM10 and NO2 for that day, ascending by day.
///
/// Days without observations do not appear; there is no synthetic
/// zero-filling. A day whose observations are all missing for one pollutant
/// keeps a null cell for that pollutant.
///
/// Instances are obtained via
/// [`crate::ObservationsLazyFrame::daily_pollution`].
#[derive(Clone)]
pub struct DailyPollutionLazyFrame {
    /// The underlying Polars LazyFrame containing the daily rows.
    pub frame: LazyFrame,
}

impl DailyPollutionLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub(crate) fn from_observations(observations: LazyFrame) -> Self {
        let frame = observations
            .group_by([col(COL_DATETIME).cast(DataType::Date).alias(COL_DATE)])
            .agg(TREND_POLLUTANT_COLUMNS.map(|name| col(name).mean()))
            .sort([COL_DATE], Default::default());
        Self::new(frame)
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> DailyPollutionLazyFrame {
        DailyPollutionLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Collects the view into typed rows, ascending by day.
    pub fn collect_rows(&self) -> Result<Vec<DailyPollution>, AirstatError> {
        let df = self.frame.clone().collect()?;
        let dates = df.column(COL_DATE)?.date()?;
        let pm25 = f64_column(&df, COL_PM25)?;
        let pm10 = f64_column(&df, COL_PM10)?;
        let no2 = f64_column(&df, COL_NO2)?;

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let Some(date) = dates.get(idx).and_then(date_from_days) else {
                continue;
            };
            rows.push(DailyPollution {
                date,
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

    fn observations(
        days: &[i32],
        hours: &[i32],
        pm25: &[Option<f64>],
    ) -> ObservationsLazyFrame {
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
    fn averages_each_day_separately() {
        let view = observations(
            &[1, 1, 2],
            &[0, 12, 6],
            &[Some(10.0), Some(30.0), Some(7.0)],
        )
        .daily_pollution();
        let rows = view.collect_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2013, 3, 1).unwrap());
        assert_eq!(rows[0].pm25, Some(20.0));
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2013, 3, 2).unwrap());
        assert_eq!(rows[1].pm25, Some(7.0));
    }

    #[test]
    fn rows_are_ascending_by_day_regardless_of_input_order() {
        let view = observations(
            &[9, 2, 5],
            &[0, 0, 0],
            &[Some(1.0), Some(2.0), Some(3.0)],
        )
        .daily_pollution();
        let rows = view.collect_rows().unwrap();

        let days: Vec<u32> = rows.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![2, 5, 9]);
    }

    #[test]
    fn day_with_only_missing_values_keeps_a_null_cell() {
        let view = observations(&[1, 1], &[0, 12], &[None, None]).daily_pollution();
        let rows = view.collect_rows().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pm25, None);
        assert_eq!(rows[0].pm10, Some(1.0));
    }

    #[test]
    fn missing_values_are_excluded_from_the_mean() {
        let view = observations(&[1, 1, 1], &[0, 6, 12], &[Some(10.0), None, Some(30.0)])
            .daily_pollution();
        let rows = view.collect_rows().unwrap();

        assert_eq!(rows[0].pm25, Some(20.0));
    }

    #[test]
    fn empty_input_yields_an_empty_view() {
        let view = observations(&[], &[], &[]).daily_pollution();
        assert!(view.collect_rows().unwrap().is_empty());
    }
}
