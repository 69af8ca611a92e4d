use crate::client::web_client::WebClient;
use crate::domain::metar::{MetarProperty, MetarRecord};
use crate::domain::ports::GroundDataAccess;
use crate::utils::error::Result;
use crate::utils::validation::{validate_date_interval, validate_stations};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::net::IpAddr;

/// Hides communication with the service that implements [`GroundDataAccess`].
#[derive(Debug, Clone)]
pub struct GroundDataClient {
    web: WebClient,
}

impl GroundDataClient {
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
}

#[async_trait]
impl GroundDataAccess for GroundDataClient {
    async fn query_metar(
        &self,
        stations: &[String],
        date_from: NaiveDate,
        date_to: NaiveDate,
        properties: &[MetarProperty],
    ) -> Result<Vec<MetarRecord>> {
        validate_stations(stations)?;
        validate_date_interval(&date_from, &date_to)?;

        let mut query = vec![
            ("date_from", date_from.to_string()),
            ("date_to", date_to.to_string()),
        ];
        for property in properties {
            query.push(("properties", property.to_string()));
        }

        tracing::info!(
            "Querying METAR data for {} stations from {} to {}",
            stations.len(),
            date_from,
            date_to
        );
        self.web.post_json("queryMetar", &query, stations).await
    }
}
