pub mod client;
pub mod config;
pub mod domain;
pub mod utils;

pub use client::{GroundDataClient, SatelliteDataClient};
pub use config::ApiConfig;
pub use domain::geo::{Feature, FeatureCollection, Geometry, Position};
pub use domain::metar::{MetarProperty, MetarPropertyType, MetarRecord};
pub use domain::ports::{GroundDataAccess, SatelliteDataAccess};
pub use domain::status::QueryState;
pub use utils::error::{ApiError, Result};
