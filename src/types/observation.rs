use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of the raw observation table.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Observation {
    pub datetime: NaiveDateTime,   // built from year/month/day/hour
    pub station: String,           // monitoring site
    pub pm25: Option<f64>,         // PM2.5 (µg/m³)
    pub pm10: Option<f64>,         // PM10 (µg/m³)
    pub so2: Option<f64>,          // SO2 (µg/m³)
    pub no2: Option<f64>,          // NO2 (µg/m³)
    pub co: Option<f64>,           // CO (µg/m³)
    pub o3: Option<f64>,           // O3 (µg/m³)
    pub temperature: Option<f64>,  // TEMP (°C)
    pub pressure: Option<f64>,     // PRES (hPa)
    pub dew_point: Option<f64>,    // DEWP (°C)
    pub rain: Option<f64>,         // RAIN (mm)
    pub wind_speed: Option<f64>,   // WSPM (m/s)
}
