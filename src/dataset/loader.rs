use crate::dataset::error::DatasetError;
use crate::dataset::schema::{
    COL_DATETIME, COL_DAY, COL_HOUR, COL_MONTH, COL_ROW_ID, COL_STATION, COL_YEAR,
    POLLUTANT_COLUMNS, REQUIRED_COLUMNS, WEATHER_COLUMNS,
};
use crate::utils::naive_datetime_from_timestamp;
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::*;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Observation table loaded from disk, with its calendar bounds.
pub(crate) struct LoadedObservations {
    pub(crate) frame: DataFrame,
    pub(crate) first_date: NaiveDate,
    pub(crate) last_date: NaiveDate,
}

/// Appends the `datetime` column composed from the integer
/// year/month/day/hour columns, at hour resolution.
///
/// Rows whose components do not form a valid calendar point (a 13th month, a
/// February 30th, an hour of 24) get a null `datetime`; the loader drops such
/// rows, but callers composing their own frames can pick a different policy.
pub fn with_datetime_column(frame: LazyFrame) -> LazyFrame {
    let parts = DatetimeArgs::new(col(COL_YEAR), col(COL_MONTH), col(COL_DAY)).with_hms(
        col(COL_HOUR),
        lit(0),
        lit(0),
    );
    frame.with_column(datetime(parts).alias(COL_DATETIME))
}

/// Reads the observation CSV, validates its header, builds the `datetime`
/// column and drops rows without a valid timestamp.
///
/// Cells that hold `null_marker` or fail to parse as their column's type are
/// nulled in place; the aggregations later skip them.
pub(crate) fn read_observations(
    path: &Path,
    null_marker: &str,
) -> Result<LoadedObservations, DatasetError> {
    check_required_columns(path)?;

    let parse_options = CsvParseOptions::default()
        .with_null_values(Some(NullValues::AllColumnsSingle(null_marker.into())));

    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_ignore_errors(true)
        .with_parse_options(parse_options)
        .with_schema_overwrite(Some(Arc::new(measurement_schema())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| csv_error(path, e))?
        .finish()
        .map_err(|e| csv_error(path, e))?;

    let raw_height = raw.height();
    let frame = with_datetime_column(raw.lazy())
        .filter(col(COL_DATETIME).is_not_null())
        .sort([COL_DATETIME], Default::default())
        .collect()?;

    let dropped = raw_height - frame.height();
    if dropped > 0 {
        warn!(
            "dropped {} of {} rows with an invalid year/month/day/hour combination",
            dropped, raw_height
        );
    }

    let (first_date, last_date) =
        date_bounds(&frame)?.ok_or_else(|| DatasetError::EmptyDataset {
            path: path.to_path_buf(),
        })?;
    info!(
        "loaded {} observations from {:?} ({} to {})",
        frame.height(),
        path,
        first_date,
        last_date
    );

    Ok(LoadedObservations {
        frame,
        first_date,
        last_date,
    })
}

/// First and last calendar date of the `datetime` column, None when empty.
fn date_bounds(frame: &DataFrame) -> Result<Option<(NaiveDate, NaiveDate)>, DatasetError> {
    let column = frame.column(COL_DATETIME)?.datetime()?;
    let unit = column.time_unit();
    let first = column
        .min()
        .and_then(|v| naive_datetime_from_timestamp(v, unit));
    let last = column
        .max()
        .and_then(|v| naive_datetime_from_timestamp(v, unit));
    Ok(match (first, last) {
        (Some(first), Some(last)) => Some((first.date(), last.date())),
        _ => None,
    })
}

fn csv_error(path: &Path, source: PolarsError) -> DatasetError {
    match source {
        PolarsError::IO { error, .. } => DatasetError::CsvReadIo {
            path: path.to_path_buf(),
            source: std::io::Error::new(error.kind(), error.to_string()),
        },
        other => DatasetError::CsvReadPolars {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

/// Expected dtypes for the raw columns; anything unparseable becomes null.
fn measurement_schema() -> Schema {
    let mut schema = Schema::with_capacity(REQUIRED_COLUMNS.len());
    for name in [COL_ROW_ID, COL_YEAR, COL_MONTH, COL_DAY, COL_HOUR] {
        schema.with_column(name.into(), DataType::Int32);
    }
    for name in POLLUTANT_COLUMNS.iter().chain(WEATHER_COLUMNS.iter()) {
        schema.with_column((*name).into(), DataType::Float64);
    }
    schema.with_column(COL_STATION.into(), DataType::String);
    schema
}

/// Validates the header line before polars gets the file, so a truncated or
/// renamed header surfaces as `MissingColumns` rather than a parse error.
fn check_required_columns(path: &Path) -> Result<(), DatasetError> {
    let io_error = |source| DatasetError::CsvReadIo {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_error)?;
    let mut line = String::new();
    std::io::BufReader::new(file)
        .read_line(&mut line)
        .map_err(io_error)?;
    let header: Vec<&str> = line.trim_end().split(',').map(str::trim).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !header.contains(*name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str =
        "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,WSPM,station";

    fn write_csv(rows: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_rows_and_builds_datetime() {
        let (_dir, path) = write_csv(&[
            "1,2013,3,1,0,10.0,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Aotizhongxin",
            "2,2013,3,1,12,30.0,40.0,6.0,50.0,400.0,70.0,8.5,1015.0,-2.0,0.0,1.4,Aotizhongxin",
        ]);

        let loaded = read_observations(&path, "NA").unwrap();
        assert_eq!(loaded.frame.height(), 2);
        assert!(loaded.frame.column(COL_DATETIME).is_ok());
        assert_eq!(
            loaded.first_date,
            NaiveDate::from_ymd_opt(2013, 3, 1).unwrap()
        );
        assert_eq!(loaded.last_date, loaded.first_date);
    }

    #[test]
    fn null_marker_cells_become_null() {
        let (_dir, path) = write_csv(&[
            "1,2013,3,1,0,NA,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Dingling",
        ]);

        let loaded = read_observations(&path, "NA").unwrap();
        let pm25 = loaded.frame.column("PM2.5").unwrap().f64().unwrap();
        assert_eq!(pm25.get(0), None);
    }

    #[test]
    fn unparseable_measurement_is_nulled_not_fatal() {
        let (_dir, path) = write_csv(&[
            "1,2013,3,1,0,garbage,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Dingling",
        ]);

        let loaded = read_observations(&path, "NA").unwrap();
        assert_eq!(loaded.frame.height(), 1);
        let pm25 = loaded.frame.column("PM2.5").unwrap().f64().unwrap();
        assert_eq!(pm25.get(0), None);
    }

    #[test]
    fn rows_with_invalid_calendar_components_are_dropped() {
        let (_dir, path) = write_csv(&[
            "1,2013,2,30,0,10.0,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Dingling",
            "2,2013,13,1,0,10.0,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Dingling",
            "3,2013,3,1,5,10.0,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1,Dingling",
        ]);

        let loaded = read_observations(&path, "NA").unwrap();
        assert_eq!(loaded.frame.height(), 1);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observations.csv");
        fs::write(
            &path,
            "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,WSPM\n\
             1,2013,3,1,0,10.0,20.0,5.0,30.0,300.0,60.0,1.5,1020.0,-5.0,0.0,2.1",
        )
        .unwrap();

        let err = read_observations(&path, "NA").unwrap_err();
        match err {
            DatasetError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["station".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let (_dir, path) = write_csv(&[]);
        let err = read_observations(&path, "NA").unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset { .. }));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.csv");
        let err = read_observations(&path, "NA").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::CsvReadIo { .. } | DatasetError::CsvReadPolars { .. }
        ));
    }
}
