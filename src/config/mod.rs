use crate::client::{GroundDataClient, SatelliteDataClient};
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{validate_port, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

/// Where the data-access services live, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub ground: EndpointConfig,
    pub satellite: EndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub host: IpAddr,
    pub port: u16,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(30))
    }

    pub fn retries(&self) -> u32 {
        self.retry_attempts.unwrap_or(0)
    }
}

impl ApiConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ApiError::Config {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values,
    /// leaving unset placeholders untouched.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn ground_client(&self) -> Result<GroundDataClient> {
        self.validate()?;
        Ok(GroundDataClient::new(self.ground.host, self.ground.port)?
            .with_timeout(self.ground.timeout())?
            .with_retries(self.ground.retries()))
    }

    pub fn satellite_client(&self) -> Result<SatelliteDataClient> {
        self.validate()?;
        Ok(
            SatelliteDataClient::new(self.satellite.host, self.satellite.port)?
                .with_timeout(self.satellite.timeout())?
                .with_retries(self.satellite.retries()),
        )
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<()> {
        validate_port("ground.port", self.ground.port)?;
        validate_port("satellite.port", self.satellite.port)?;

        if let Some(timeout) = self.ground.timeout_seconds {
            validate_range("ground.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(timeout) = self.satellite.timeout_seconds {
            validate_range("satellite.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(retries) = self.ground.retry_attempts {
            validate_range("ground.retry_attempts", retries, 0, 10)?;
        }
        if let Some(retries) = self.satellite.retry_attempts {
            validate_range("satellite.retry_attempts", retries, 0, 10)?;
        }

        Ok(())
    }
}
