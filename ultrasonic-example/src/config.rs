use std::fs::File;

use log::*;
use serde::Deserialize;

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sensor: ultrasonic::Config,
    pub interval_ms: u32,
    pub fault_threshold: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sensor: ultrasonic::Config::DEFAULT,
            interval_ms: 500,
            fault_threshold: 10,
        }
    }
}

impl Config {
    pub fn new(file_name: &str) -> anyhow::Result<Self> {
        info!("opening {file_name}");
        let file = File::open(file_name)?;
        let config: Config = serde_json::from_reader(file)?;

        info!("config: {:?}", config);

        Ok(config)
    }

    /// Read the config, running on defaults when there is none.
    pub fn load_or_default(file_name: &str) -> Self {
        match Config::new(file_name) {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to load {file_name}: {e}, using defaults");
                Config::default()
            }
        }
    }
}
