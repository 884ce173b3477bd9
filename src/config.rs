use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tsl_light::{Variant, variant};

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum Model {
    Tsl2561,
    Tsl2561Cs,
    Tsl2561T,
    Tsl4531,
    Tsl45311,
    Tsl45313,
    Tsl45315,
    Tsl45317,
}

impl Model {
    pub fn variant(self) -> &'static Variant {
        match self {
            Model::Tsl2561 => &variant::TSL2561,
            Model::Tsl2561Cs => &variant::TSL2561_CS,
            Model::Tsl2561T => &variant::TSL2561_T,
            Model::Tsl4531 => &variant::TSL4531,
            Model::Tsl45311 => &variant::TSL45311,
            Model::Tsl45313 => &variant::TSL45313,
            Model::Tsl45315 => &variant::TSL45315,
            Model::Tsl45317 => &variant::TSL45317,
        }
    }
}

/// Sensor settings. Anything left out falls back to the model's default.
#[derive(Debug, Deserialize, PartialEq)]
pub struct SensorConfig {
    pub model: Model,
    #[serde(default)]
    pub address: Option<u8>,
    #[serde(default)]
    pub time: Option<u16>,
    #[serde(default)]
    pub gain: Option<u16>,
}

impl SensorConfig {
    pub fn address(&self) -> u8 {
        self.address.unwrap_or(self.model.variant().address)
    }

    pub fn time(&self) -> u16 {
        self.time.unwrap_or(self.model.variant().default_time)
    }

    pub fn gain(&self) -> Option<u16> {
        self.gain.or(self.model.variant().default_gain)
    }
}

/// USB IDs of the FTDI chip bridging to the I2C bus
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct AdapterConfig {
    pub vid: u16,
    pub pid: u16,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        // FT232H
        AdapterConfig {
            vid: 0x0403,
            pid: 0x6014,
        }
    }
}

fn default_interval_ms() -> u64 {
    1_000
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    pub sensor: SensorConfig,
    #[serde(default)]
    pub adapter: AdapterConfig,
    /// Delay between readings
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Config {
    pub fn from_str(conf: &str) -> Result<Self, anyhow::Error> {
        Ok(ron::from_str::<Config>(conf)?)
    }

    pub fn read_from_file<P: AsRef<Path>>(file: P) -> Result<Self, anyhow::Error> {
        Ok(ron::de::from_reader(BufReader::new(File::open(file)?))?)
    }
}
