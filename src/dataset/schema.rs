//! Column layout of the raw observation table.
//!
//! Every column name the crate touches lives here, so no caller has to spell
//! out `"PM2.5"` by hand. Names are exact and case-sensitive; they match the
//! header of the source CSV.

use std::fmt;

pub const COL_ROW_ID: &str = "No";
pub const COL_YEAR: &str = "year";
pub const COL_MONTH: &str = "month";
pub const COL_DAY: &str = "day";
pub const COL_HOUR: &str = "hour";
pub const COL_STATION: &str = "station";

pub const COL_PM25: &str = "PM2.5";
pub const COL_PM10: &str = "PM10";
pub const COL_SO2: &str = "SO2";
pub const COL_NO2: &str = "NO2";
pub const COL_CO: &str = "CO";
pub const COL_O3: &str = "O3";

pub const COL_TEMP: &str = "TEMP";
pub const COL_PRES: &str = "PRES";
pub const COL_DEWP: &str = "DEWP";
pub const COL_RAIN: &str = "RAIN";
pub const COL_WSPM: &str = "WSPM";

/// Derived at load time from the integer year/month/day/hour columns.
pub const COL_DATETIME: &str = "datetime";

/// The six pollutant concentration columns.
pub const POLLUTANT_COLUMNS: [&str; 6] = [COL_PM25, COL_PM10, COL_SO2, COL_NO2, COL_CO, COL_O3];

/// The five weather columns.
pub const WEATHER_COLUMNS: [&str; 5] = [COL_TEMP, COL_PRES, COL_DEWP, COL_RAIN, COL_WSPM];

/// Pollutants and weather variables together, in the order the correlation
/// matrix reports them.
pub const TRACKED_COLUMNS: [&str; 11] = [
    COL_PM25, COL_PM10, COL_SO2, COL_NO2, COL_CO, COL_O3, COL_TEMP, COL_PRES, COL_DEWP, COL_RAIN,
    COL_WSPM,
];

/// The three pollutants the trend views aggregate.
pub const TREND_POLLUTANT_COLUMNS: [&str; 3] = [COL_PM25, COL_PM10, COL_NO2];

/// Every column a source file must provide.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    COL_ROW_ID,
    COL_YEAR,
    COL_MONTH,
    COL_DAY,
    COL_HOUR,
    COL_PM25,
    COL_PM10,
    COL_SO2,
    COL_NO2,
    COL_CO,
    COL_O3,
    COL_TEMP,
    COL_PRES,
    COL_DEWP,
    COL_RAIN,
    COL_WSPM,
    COL_STATION,
];

/// One of the three pollutants tracked by the trend, station, monthly,
/// day/night and hourly views.
///
/// Using the enum instead of a raw column name keeps lookups like
/// [`crate::summary::highest_mean_station`] free of string typos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendPollutant {
    Pm25,
    Pm10,
    No2,
}

impl TrendPollutant {
    pub const ALL: [TrendPollutant; 3] =
        [TrendPollutant::Pm25, TrendPollutant::Pm10, TrendPollutant::No2];

    /// The raw table column this pollutant is read from.
    pub fn column_name(&self) -> &'static str {
        match self {
            TrendPollutant::Pm25 => COL_PM25,
            TrendPollutant::Pm10 => COL_PM10,
            TrendPollutant::No2 => COL_NO2,
        }
    }
}

/// Formats a `TrendPollutant` as its column name.
///
/// # Examples
///
/// ```
/// use airstat::TrendPollutant;
///
/// assert_eq!(format!("{}", TrendPollutant::Pm25), "PM2.5");
/// assert_eq!(TrendPollutant::No2.to_string(), "NO2");
/// ```
impl fmt::Display for TrendPollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
