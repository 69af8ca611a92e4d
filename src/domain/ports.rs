use crate::domain::geo::FeatureCollection;
use crate::domain::metar::{MetarProperty, MetarRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Provides access to station based data of the ground-measurements data-source.
#[async_trait]
pub trait GroundDataAccess: Send + Sync {
    /// Query METAR reports for the given stations in the closed interval
    /// `[date_from, date_to]`, decoding the requested properties.
    async fn query_metar(
        &self,
        stations: &[String],
        date_from: NaiveDate,
        date_to: NaiveDate,
        properties: &[MetarProperty],
    ) -> Result<Vec<MetarRecord>>;
}

/// Provides access to geographical data of the satellite's data-source.
#[async_trait]
pub trait SatelliteDataAccess: Send + Sync {
    /// Query the geometry that together contain the provided locations.
    async fn query_containing_geometry(
        &self,
        locations: &FeatureCollection,
    ) -> Result<FeatureCollection>;

    /// Query measurements for the given locations in the closed interval
    /// `[datetime_from, datetime_to]`.
    async fn query_measurements(
        &self,
        datetime_from: DateTime<Utc>,
        datetime_to: DateTime<Utc>,
        locations: &FeatureCollection,
    ) -> Result<FeatureCollection>;
}
