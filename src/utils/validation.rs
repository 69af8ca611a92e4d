use crate::utils::error::{ApiError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Closed interval [from, to]; equal endpoints are a valid single-instant query.
pub fn validate_datetime_interval(from: &DateTime<Utc>, to: &DateTime<Utc>) -> Result<()> {
    if from > to {
        return Err(ApiError::Validation {
            message: format!("Interval start {} is after interval end {}", from, to),
        });
    }
    Ok(())
}

pub fn validate_date_interval(from: &NaiveDate, to: &NaiveDate) -> Result<()> {
    if from > to {
        return Err(ApiError::Validation {
            message: format!("Interval start {} is after interval end {}", from, to),
        });
    }
    Ok(())
}

fn station_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{4}$").unwrap())
}

/// Station identifiers follow the ICAO shape: four uppercase alphanumerics.
pub fn validate_stations(stations: &[String]) -> Result<()> {
    if stations.is_empty() {
        return Err(ApiError::Validation {
            message: "Station list cannot be empty".to_string(),
        });
    }

    for station in stations {
        if !station_id_pattern().is_match(station) {
            return Err(ApiError::Validation {
                message: format!("Invalid station identifier: {}", station),
            });
        }
    }

    Ok(())
}

pub fn validate_longitude(value: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&value) || !value.is_finite() {
        return Err(ApiError::InvalidCoordinate {
            field: "longitude".to_string(),
            value,
        });
    }
    Ok(())
}

pub fn validate_latitude(value: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&value) || !value.is_finite() {
        return Err(ApiError::InvalidCoordinate {
            field: "latitude".to_string(),
            value,
        });
    }
    Ok(())
}

pub fn validate_port(field_name: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(ApiError::Config {
            field: field_name.to_string(),
            message: "Port cannot be zero".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ApiError::Config {
            field: field_name.to_string(),
            message: format!("Value {} must be between {} and {}", value, min, max),
        });
    }
    Ok(())
}
