use crate::client::web_client::WebClient;
use crate::domain::geo::FeatureCollection;
use crate::domain::ports::SatelliteDataAccess;
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::validate_datetime_interval;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::net::IpAddr;

/// Hides communication with the service that implements [`SatelliteDataAccess`].
#[derive(Debug, Clone)]
pub struct SatelliteDataClient {
    web: WebClient,
}

impl SatelliteDataClient {
    pub fn new(ip_address: IpAddr, port: u16) -> Result<Self> {
        Ok(Self {
            web: WebClient::new(ip_address, port)?,
        })
    }

    pub fn from_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            web: WebClient::from_base_url(base_url)?,
        })
    }

    pub fn with_timeout(self, timeout: std::time::Duration) -> Result<Self> {
        Ok(Self {
            web: self.web.with_timeout(timeout)?,
        })
    }

    pub fn with_retries(self, retries: u32) -> Self {
        Self {
            web: self.web.with_retries(retries),
        }
    }

    fn require_locations(locations: &FeatureCollection) -> Result<()> {
        if locations.is_empty() {
            return Err(ApiError::Validation {
                message: "Location collection cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SatelliteDataAccess for SatelliteDataClient {
    async fn query_containing_geometry(
        &self,
        locations: &FeatureCollection,
    ) -> Result<FeatureCollection> {
        Self::require_locations(locations)?;

        tracing::info!(
            "Querying containing geometry for {} locations",
            locations.len()
        );
        self.web
            .post_json("queryContainingGeometry", &[], locations)
            .await
    }

    async fn query_measurements(
        &self,
        datetime_from: DateTime<Utc>,
        datetime_to: DateTime<Utc>,
        locations: &FeatureCollection,
    ) -> Result<FeatureCollection> {
        Self::require_locations(locations)?;
        validate_datetime_interval(&datetime_from, &datetime_to)?;

        let query = [
            (
                "datetime_from",
                datetime_from.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            (
                "datetime_to",
                datetime_to.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ];

        tracing::info!(
            "Querying measurements for {} locations from {} to {}",
            locations.len(),
            datetime_from,
            datetime_to
        );
        self.web
            .post_json("queryMeasurements", &query, locations)
            .await
    }
}
