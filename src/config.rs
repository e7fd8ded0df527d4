use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
  pub server: ServerConfig,
  pub datapoint: DatapointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
  pub address: IpAddr,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      address: IpAddr::V4(Ipv4Addr::LOCALHOST),
      port: 8000,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatapointConfig {
  pub base_url: String,
  pub api_key: String,
  pub resolution: String,
  pub max_attempts: u32,
  pub timeout_secs: u64,
  /// 0 retries immediately
  pub backoff_millis: u64,
}

impl Default for DatapointConfig {
  fn default() -> Self {
    Self {
      base_url: "http://datapoint.metoffice.gov.uk/public/data/val/wxobs/all/json".to_string(),
      api_key: String::new(),
      resolution: "hourly".to_string(),
      max_attempts: 5,
      timeout_secs: 30,
      backoff_millis: 0,
    }
  }
}

impl DatapointConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  pub fn backoff(&self) -> Duration {
    Duration::from_millis(self.backoff_millis)
  }
}

impl Config {
  /// Loads the file, writing a default one first if it does not exist yet.
  pub fn load(path: &Path) -> Result<Self> {
    Ok(confy::load_path(path)?)
  }

  pub fn validate(&self) -> Result<()> {
    let datapoint = &self.datapoint;

    if datapoint.max_attempts == 0 {
      return Err(Error::InvalidConfig("datapoint.maxAttempts must be at least 1".to_string()));
    }

    if !datapoint.base_url.starts_with("http://") && !datapoint.base_url.starts_with("https://") {
      return Err(Error::InvalidConfig(format!("datapoint.baseUrl `{}` is not an http(s) URL", datapoint.base_url)));
    }

    if datapoint.api_key.is_empty() {
      warn!("datapoint.apiKey is empty, upstream calls will most likely be rejected");
    }

    Ok(())
  }
}
