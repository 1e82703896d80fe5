// day_night.rs

//! Contains the `DayNightLazyFrame` structure comparing daytime and
//! nighttime pollutant levels.

use crate::dataset::schema::{COL_DATETIME, COL_NO2, COL_PM10, COL_PM25, TREND_POLLUTANT_COLUMNS};
use crate::error::AirstatError;
use crate::utils::f64_column;
use polars::prelude::{col, lit, when, Expr, LazyFrame};
use serde::Serialize;
use std::fmt;

const COL_TIME_OF_DAY: &str = "time_of_day";

/// Daytime covers local hours 6 through 17; everything else is night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// Classifies an hour of day in `[0, 23]`.
    pub fn from_hour(hour: u32) -> TimeOfDay {
        if (6..18).contains(&hour) {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "Day",
            TimeOfDay::Night => "Night",
        }
    }

    fn from_label(label: &str) -> Option<TimeOfDay> {
        match label {
            "Day" => Some(TimeOfDay::Day),
            "Night" => Some(TimeOfDay::Night),
            _ => None,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Mean pollutant concentrations for one half of the day.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DayNightPollution {
    pub time_of_day: TimeOfDay,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
}

/// A wrapper around a Polars `LazyFrame` holding the day/night view: mean
/// PM2.5, PM10 and NO2 per time-of-day class, Day before Night.
///
/// A class with zero observations is omitted rather than zero-filled, so the
/// view has two rows whenever both classes are populated and one otherwise.
/// The derived hour and time-of-day labels live on a working copy; the
/// caller's table never carries them.
///
/// Instances are obtained via
/// [`crate::ObservationsLazyFrame::daynight_pollution`].
#[derive(Clone)]
pub struct DayNightLazyFrame {
    /// The underlying Polars LazyFrame containing the day/night rows.
    pub frame: LazyFrame,
}

impl DayNightLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub(crate) fn from_observations(observations: LazyFrame) -> Self {
        let hour = col(COL_DATETIME).dt().hour();
        let frame = observations
            .with_column(
                when(hour.clone().gt_eq(lit(6)).and(hour.lt(lit(18))))
                    .then(lit(TimeOfDay::Day.label()))
                    .otherwise(lit(TimeOfDay::Night.label()))
                    .alias(COL_TIME_OF_DAY),
            )
            .group_by([col(COL_TIME_OF_DAY)])
            .agg(TREND_POLLUTANT_COLUMNS.map(|name| col(name).mean()))
            .sort([COL_TIME_OF_DAY], Default::default());
        Self::new(frame)
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> DayNightLazyFrame {
        DayNightLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Collects the view into typed rows, Day before Night.
    pub fn collect_rows(&self) -> Result<Vec<DayNightPollution>, AirstatError> {
        let df = self.frame.clone().collect()?;
        let labels = df.column(COL_TIME_OF_DAY)?.str()?;
        let pm25 = f64_column(&df, COL_PM25)?;
        let pm10 = f64_column(&df, COL_PM10)?;
        let no2 = f64_column(&df, COL_NO2)?;

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let Some(time_of_day) = labels.get(idx).and_then(TimeOfDay::from_label) else {
                continue;
            };
            rows.push(DayNightPollution {
                time_of_day,
                pm25: pm25.get(idx),
                pm10: pm10.get(idx),
                no2: no2.get(idx),
            });
        }
        Ok(rows)
    }
}
