//! This module provides the main entry point for the crate. It loads the
//! observation table once, keeps it for the lifetime of the client, and
//! hands out (optionally date-filtered) frames for the derived views.

use crate::dataset::loader::{read_observations, LoadedObservations};
use crate::error::AirstatError;
use crate::types::observations_frame::ObservationsLazyFrame;
use bon::bon;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, IntoLazy};
use std::path::{Path, PathBuf};

/// The marker the source dataset uses for missing measurements.
const DEFAULT_NULL_MARKER: &str = "NA";

/// The main client for analysing an air-quality dataset.
///
/// Loads and validates the observation CSV once at construction; every
/// subsequent query (date-range filter, derived view, summary) works on
/// cheap clones of the cached table and never touches the file again.
///
/// # Examples
///
/// ```no_run
/// # use airstat::{Airstat, AirstatError};
/// # fn run() -> Result<(), AirstatError> {
/// let client = Airstat::from_csv("data/all_data.csv")?;
/// let (first, last) = client.bounds();
/// let daily = client.range(first, last)?.daily_pollution().collect_rows()?;
/// println!("{} days of data", daily.len());
/// # Ok(())
/// # }
/// ```
pub struct Airstat {
    observations: DataFrame,
    first_date: NaiveDate,
    last_date: NaiveDate,
}

#[bon]
impl Airstat {
    /// Loads the observation table with explicit options.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.path(PathBuf)`: **Required.** Location of the observation CSV.
    /// * `.null_marker(String)`: Optional. The cell content marking a missing
    ///   measurement. Defaults to `"NA"`.
    ///
    /// # Errors
    ///
    /// Returns [`AirstatError::Dataset`] when the file is missing or
    /// unreadable, the header lacks required columns, or no row carries a
    /// valid timestamp.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use airstat::{Airstat, AirstatError};
    /// # use std::path::PathBuf;
    /// # fn run() -> Result<(), AirstatError> {
    /// let client = Airstat::load()
    ///     .path(PathBuf::from("data/all_data.csv"))
    ///     .null_marker("n/a".to_string())
    ///     .call()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn load(path: PathBuf, null_marker: Option<String>) -> Result<Self, AirstatError> {
        let marker = null_marker.unwrap_or_else(|| DEFAULT_NULL_MARKER.to_string());
        let LoadedObservations {
            frame,
            first_date,
            last_date,
        } = read_observations(&path, &marker)?;
        Ok(Self {
            observations: frame,
            first_date,
            last_date,
        })
    }

    /// Loads the observation table from `path` with default options.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, AirstatError> {
        Self::load().path(path.as_ref().to_path_buf()).call()
    }

    /// The full, unfiltered observation table.
    pub fn observations(&self) -> ObservationsLazyFrame {
        ObservationsLazyFrame::new(self.observations.clone().lazy())
    }

    /// First and last calendar date covered by the dataset.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.first_date, self.last_date)
    }

    /// The observations whose timestamp falls within `[start, end]`, both
    /// inclusive. Bounds reaching past the dataset are clamped to it; a
    /// range lying entirely outside yields an empty (but valid) table.
    ///
    /// # Errors
    ///
    /// Returns [`AirstatError::InvalidDateRange`] if `start > end`.
    pub fn range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationsLazyFrame, AirstatError> {
        if start > end {
            return Err(AirstatError::InvalidDateRange { start, end });
        }
        if end < self.first_date || start > self.last_date {
            // The request lies entirely outside the dataset; the filter
            // yields a valid empty table.
            return self.observations().get_range(start, end);
        }
        self.observations()
            .get_range(start.max(self.first_date), end.min(self.last_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_dataset() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        fs::write(
            &path,
            "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,WSPM,station\n\
             1,2013,3,1,0,10.0,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Aotizhongxin\n\
             2,2013,3,1,12,30.0,40.0,6.0,50.0,400.0,70.0,8.5,1015.0,-2.0,0.0,1.4,Aotizhongxin\n\
             3,2013,3,5,6,NA,80.0,7.0,90.0,500.0,80.0,12.0,1010.0,3.0,0.4,3.0,Dingling\n\
             4,2014,1,31,23,50.0,90.0,8.0,70.0,600.0,90.0,-3.0,1030.0,-12.0,0.0,0.8,Dingling",
        )
        .unwrap();
        (dir, path)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn bounds_span_the_dataset() {
        let (_dir, path) = write_dataset();
        let client = Airstat::from_csv(&path).unwrap();
        assert_eq!(client.bounds(), (date(2013, 3, 1), date(2014, 1, 31)));
    }

    #[test]
    fn full_range_returns_every_observation() {
        let (_dir, path) = write_dataset();
        let client = Airstat::from_csv(&path).unwrap();
        let (first, last) = client.bounds();
        let rows = client.range(first, last).unwrap().collect_observations().unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn single_day_range_works() {
        let (_dir, path) = write_dataset();
        let client = Airstat::from_csv(&path).unwrap();
        let day = date(2013, 3, 1);
        let summary = client.range(day, day).unwrap().summary().unwrap();
        assert_eq!(summary.observations, 2);
        assert_eq!(summary.mean_pm25, Some(20.0));
    }

    #[test]
    fn out_of_bounds_requests_are_clamped() {
        let (_dir, path) = write_dataset();
        let client = Airstat::from_csv(&path).unwrap();
        let summary = client
            .range(date(2000, 1, 1), date(2030, 1, 1))
            .unwrap()
            .summary()
            .unwrap();
        assert_eq!(summary.observations, 4);
    }

    #[test]
    fn range_after_the_dataset_is_empty_not_an_error() {
        let (_dir, path) = write_dataset();
        let client = Airstat::from_csv(&path).unwrap();
        let filtered = client.range(date(2020, 1, 1), date(2020, 6, 1)).unwrap();
        assert!(filtered.daily_pollution().collect_rows().unwrap().is_empty());
        assert_eq!(filtered.summary().unwrap().observations, 0);
    }

    #[test]
    fn range_before_the_dataset_is_empty_too() {
        let (_dir, path) = write_dataset();
        let client = Airstat::from_csv(&path).unwrap();
        let filtered = client.range(date(2000, 1, 1), date(2000, 6, 1)).unwrap();
        assert_eq!(filtered.summary().unwrap().observations, 0);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let (_dir, path) = write_dataset();
        let client = Airstat::from_csv(&path).unwrap();
        let err = client.range(date(2014, 1, 1), date(2013, 1, 1)).unwrap_err();
        assert!(matches!(err, AirstatError::InvalidDateRange { .. }));
    }

    #[test]
    fn custom_null_marker_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        fs::write(
            &path,
            "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,WSPM,station\n\
             1,2013,3,1,0,n/a,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Dingling",
        )
        .unwrap();

        let client = Airstat::load()
            .path(path)
            .null_marker("n/a".to_string())
            .call()
            .unwrap();
        let rows = client.observations().collect_observations().unwrap();
        assert_eq!(rows[0].pm25, None);
    }
}
