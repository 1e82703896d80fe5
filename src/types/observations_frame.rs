// observations_frame.rs

//! Contains the `ObservationsLazyFrame` structure, the crate's handle on the
//! raw observation table.

use crate::dataset::schema::{
    COL_CO, COL_DATETIME, COL_DEWP, COL_NO2, COL_O3, COL_PM10, COL_PM25, COL_PRES, COL_RAIN,
    COL_SO2, COL_STATION, COL_TEMP, COL_WSPM,
};
use crate::error::AirstatError;
use crate::summary::RangeSummary;
use crate::types::observation::Observation;
use crate::utils::{f64_column, naive_datetime_from_timestamp};
use crate::views::correlation::CorrelationMatrix;
use crate::views::daily::DailyPollutionLazyFrame;
use crate::views::day_night::DayNightLazyFrame;
use crate::views::hourly_profile::HourlyProfileLazyFrame;
use crate::views::monthly::MonthlyPollutionLazyFrame;
use crate::views::station::StationPollutionLazyFrame;
use chrono::NaiveDate;
use polars::prelude::{col, lit, DataType, Expr, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding raw station-hour
/// observations (the `datetime` column plus pollutant, weather and station
/// columns).
///
/// Every derived view is produced from a cheap lazy clone of the underlying
/// frame, so calling the accessors repeatedly and in any order never mutates
/// the table a caller holds.
///
/// Instances are typically obtained via [`crate::Airstat::observations`] or
/// [`crate::Airstat::range`].
#[derive(Clone)]
pub struct ObservationsLazyFrame {
    /// The underlying Polars LazyFrame containing the observations.
    pub frame: LazyFrame,
}

impl ObservationsLazyFrame {
    /// Creates a new `ObservationsLazyFrame` wrapping the given `LazyFrame`.
    ///
    /// The frame must carry the raw table's columns plus `datetime` (see
    /// [`crate::with_datetime_column`] for composing it from integer parts).
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters the observations based on a Polars predicate expression.
    ///
    /// Returns a *new* `ObservationsLazyFrame` with the filter applied
    /// lazily; the original remains unchanged.
    pub fn filter(&self, predicate: Expr) -> ObservationsLazyFrame {
        ObservationsLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Filters to rows whose timestamp falls on a calendar date within
    /// `[start, end]`, both inclusive. The end date is included through its
    /// last hour, and `start == end` selects a single day.
    ///
    /// # Errors
    ///
    /// Returns [`AirstatError::InvalidDateRange`] if `start > end`.
    pub fn get_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationsLazyFrame, AirstatError> {
        if start > end {
            return Err(AirstatError::InvalidDateRange { start, end });
        }
        Ok(self.filter(
            col(COL_DATETIME)
                .cast(DataType::Date)
                .gt_eq(lit(start))
                .and(col(COL_DATETIME).cast(DataType::Date).lt_eq(lit(end))),
        ))
    }

    /// Mean PM2.5/PM10/NO2 per calendar day, ascending by day.
    pub fn daily_pollution(&self) -> DailyPollutionLazyFrame {
        DailyPollutionLazyFrame::from_observations(self.frame.clone())
    }

    /// Mean/min/max of PM2.5/PM10/NO2 per monitoring station.
    pub fn station_pollution(&self) -> StationPollutionLazyFrame {
        StationPollutionLazyFrame::from_observations(self.frame.clone())
    }

    /// Mean/min/max of PM2.5/PM10/NO2 per calendar month ("YYYY-MM").
    pub fn monthly_pollution(&self) -> MonthlyPollutionLazyFrame {
        MonthlyPollutionLazyFrame::from_observations(self.frame.clone())
    }

    /// Mean PM2.5/PM10/NO2 for daytime (hour 6..18) versus nighttime rows.
    pub fn daynight_pollution(&self) -> DayNightLazyFrame {
        DayNightLazyFrame::from_observations(self.frame.clone())
    }

    /// Mean PM2.5/PM10/NO2 per hour of day, ascending by hour.
    pub fn hourly_profile(&self) -> HourlyProfileLazyFrame {
        HourlyProfileLazyFrame::from_observations(self.frame.clone())
    }

    /// Pairwise-complete Pearson correlation between the six pollutant and
    /// five weather columns.
    ///
    /// # Errors
    ///
    /// Returns [`AirstatError::DataFrameProcessing`] if collecting the
    /// underlying frame fails.
    pub fn weather_correlation(&self) -> Result<CorrelationMatrix, AirstatError> {
        CorrelationMatrix::from_observations(self.frame.clone())
    }

    /// Row count and overall pollutant/weather means for this table, the
    /// numbers the dashboard shows as metric cards next to the charts.
    pub fn summary(&self) -> Result<RangeSummary, AirstatError> {
        RangeSummary::from_observations(self.frame.clone())
    }

    /// Collects the observations into typed rows.
    ///
    /// Rows missing a timestamp or station label are skipped; measurement
    /// columns keep `None` where the source had no value.
    pub fn collect_observations(&self) -> Result<Vec<Observation>, AirstatError> {
        let df = self.frame.clone().collect()?;
        let datetimes = df.column(COL_DATETIME)?.datetime()?;
        let unit = datetimes.time_unit();
        let stations = df.column(COL_STATION)?.str()?;
        let pm25 = f64_column(&df, COL_PM25)?;
        let pm10 = f64_column(&df, COL_PM10)?;
        let so2 = f64_column(&df, COL_SO2)?;
        let no2 = f64_column(&df, COL_NO2)?;
        let co = f64_column(&df, COL_CO)?;
        let o3 = f64_column(&df, COL_O3)?;
        let temperature = f64_column(&df, COL_TEMP)?;
        let pressure = f64_column(&df, COL_PRES)?;
        let dew_point = f64_column(&df, COL_DEWP)?;
        let rain = f64_column(&df, COL_RAIN)?;
        let wind_speed = f64_column(&df, COL_WSPM)?;

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let Some(datetime) = datetimes
                .get(idx)
                .and_then(|value| naive_datetime_from_timestamp(value, unit))
            else {
                continue;
            };
            let Some(station) = stations.get(idx) else {
                continue;
            };
            rows.push(Observation {
                datetime,
                station: station.to_string(),
                pm25: pm25.get(idx),
                pm10: pm10.get(idx),
                so2: so2.get(idx),
                no2: no2.get(idx),
                co: co.get(idx),
                o3: o3.get(idx),
                temperature: temperature.get(idx),
                pressure: pressure.get(idx),
                dew_point: dew_point.get(idx),
                rain: rain.get(idx),
                wind_speed: wind_speed.get(idx),
            });
        }
        Ok(rows)
    }
}
