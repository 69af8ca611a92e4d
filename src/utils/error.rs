use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Service returned status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Property {property} may not be expressed in unit {unit}, expected {expected}")]
    InvalidUnit {
        property: String,
        unit: String,
        expected: String,
    },

    #[error("Unknown METAR property: {name}")]
    UnknownProperty { name: String },

    #[error("Invalid coordinate for {field}: {value}")]
    InvalidCoordinate { field: String, value: f64 },

    #[error("Configuration error in {field}: {message}")]
    Config { field: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;
