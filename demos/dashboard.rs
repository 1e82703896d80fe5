//! Plays the dashboard's presentation role in text form: load the dataset,
//! filter it to a date range, then render every analytical view.
//!
//! Usage: `cargo run --example dashboard -- path/to/all_data.csv [start end]`
//! with dates as `YYYY-MM-DD`; the full dataset range is used by default.

use airstat::{highest_mean_station, lowest_mean_station, Airstat, TrendPollutant};
use chrono::NaiveDate;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/all_data.csv".to_string());

    let client = Airstat::from_csv(&path)?;
    let (first, last) = client.bounds();
    let start = parse_date(args.next(), first)?;
    let end = parse_date(args.next(), last)?;

    println!("Air quality dashboard, {} to {}\n", start, end);
    let observations = client.range(start, end)?;

    let summary = observations.summary()?;
    println!("{} observations in range", summary.observations);
    println!(
        "Mean PM2.5 {:>8}   PM10 {:>8}   NO2 {:>8}",
        metric(summary.mean_pm25),
        metric(summary.mean_pm10),
        metric(summary.mean_no2),
    );
    println!(
        "Mean TEMP  {:>8}   DEWP {:>8}   PRES {:>9}   WSPM {:>6}\n",
        metric(summary.mean_temperature),
        metric(summary.mean_dew_point),
        metric(summary.mean_pressure),
        metric(summary.mean_wind_speed),
    );

    println!("--- Daily trend ---");
    println!("{}\n", observations.daily_pollution().frame.collect()?);

    println!("--- Stations ---");
    println!("{}", observations.station_pollution().frame.collect()?);
    let stations = observations.station_pollution().collect_rows()?;
    for pollutant in TrendPollutant::ALL {
        if let (Some(highest), Some(lowest)) = (
            highest_mean_station(&stations, pollutant),
            lowest_mean_station(&stations, pollutant),
        ) {
            println!(
                "{pollutant}: highest at {} ({}), lowest at {} ({})",
                highest.station,
                metric(highest.mean(pollutant)),
                lowest.station,
                metric(lowest.mean(pollutant)),
            );
        }
    }
    println!();

    println!("--- Monthly ---");
    println!("{}\n", observations.monthly_pollution().frame.collect()?);

    println!("--- Day vs night ---");
    for row in observations.daynight_pollution().collect_rows()? {
        println!(
            "{:<5}  PM2.5 {:>8}   PM10 {:>8}   NO2 {:>8}",
            row.time_of_day.label(),
            metric(row.pm25),
            metric(row.pm10),
            metric(row.no2),
        );
    }
    println!();

    println!("--- Hourly profile ---");
    println!("{}\n", observations.hourly_profile().frame.collect()?);

    println!("--- Correlation ---");
    let correlation = observations.weather_correlation()?;
    println!("{}", correlation.to_dataframe()?);
    println!("Strongest relations:");
    for pair in correlation.strongest_pairs(5) {
        println!("  {} / {}: {:+.3}", pair.first, pair.second, pair.coefficient);
    }

    Ok(())
}

fn parse_date(
    arg: Option<String>,
    default: NaiveDate,
) -> Result<NaiveDate, chrono::ParseError> {
    match arg {
        Some(raw) => raw.parse(),
        None => Ok(default),
    }
}

fn metric(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}
