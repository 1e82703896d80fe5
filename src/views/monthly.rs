// monthly.rs

//! Contains the `MonthlyPollutionLazyFrame` structure holding per-month
//! pollutant statistics.

use crate::dataset::schema::{COL_DATETIME, TREND_POLLUTANT_COLUMNS};
use crate::error::AirstatError;
use crate::utils::f64_column;
use polars::prelude::{col, Expr, LazyFrame};
use serde::Serialize;

const COL_MONTH_LABEL: &str = "month";

/// Mean, minimum and maximum pollutant concentrations for one calendar
/// month, labelled `"YYYY-MM"`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct MonthlyPollution {
    pub month: String,
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

/// A wrapper around a Polars `LazyFrame` holding the monthly view: one row
/// per `(year, month)` bucket of the timestamp, with mean/min/max of PM2.5,
/// PM10 and NO2 over non-missing values, ascending by month label.
///
/// The bucket is derived from the timestamp's calendar month, so rows group
/// correctly whatever order they arrive in. The `"YYYY-MM"` label sorts
/// chronologically.
///
/// Instances are obtained via
/// [`crate::ObservationsLazyFrame::monthly_pollution`].
#[derive(Clone)]
pub struct MonthlyPollutionLazyFrame {
    /// The underlying Polars LazyFrame containing the monthly rows.
    pub frame: LazyFrame,
}

impl MonthlyPollutionLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub(crate) fn from_observations(observations: LazyFrame) -> Self {
        let frame = observations
            .group_by([col(COL_DATETIME)
                .dt()
                .strftime("%Y-%m")
                .alias(COL_MONTH_LABEL)])
            .agg(statistic_columns())
            .sort([COL_MONTH_LABEL], Default::default());
        Self::new(frame)
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> MonthlyPollutionLazyFrame {
        MonthlyPollutionLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Collects the view into typed rows, ascending by month label.
    pub fn collect_rows(&self) -> Result<Vec<MonthlyPollution>, AirstatError> {
        let df = self.frame.clone().collect()?;
        let months = df.column(COL_MONTH_LABEL)?.str()?;
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
            let Some(month) = months.get(idx) else {
                continue;
            };
            rows.push(MonthlyPollution {
                month: month.to_string(),
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
