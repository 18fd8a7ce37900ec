//! Configuration files
//!
//! A `HubConfig` as JSON. Every field is optional and falls back to the
//! reference wiring:
//!
//! ```json
//! {
//!   "sample_interval_ms": 500,
//!   "dht": { "pin": 7, "model": "DHT11" },
//!   "barometer": null,
//!   "analog_pins": [14, 15]
//! }
//! ```

use std::fs;
use std::path::Path;

use sensorhub_core::HubConfig;

use crate::ConnectorError;

/// Parse and validate a configuration from JSON text
pub fn parse_config(text: &str) -> Result<HubConfig, ConnectorError> {
    let config: HubConfig = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file
pub fn load_config(path: &Path) -> Result<HubConfig, ConnectorError> {
    let text = fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    log::info!("loaded configuration from {}", path.display());
    Ok(config)
}
