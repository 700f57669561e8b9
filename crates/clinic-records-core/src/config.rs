//! Store configuration.
//!
//! Everything has a default matching the clinic's current setup, so an empty
//! JSON object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default `tracing` filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "clinic_records_core=info";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// `RUST_LOG` if set, otherwise `fallback`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// How bill numbers are generated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillNumbering {
    /// Collection size + 1. Numbers can repeat once a bill is deleted.
    #[default]
    CollectionLength,
    /// Same counter as the internal bill ID; never repeats.
    Monotonic,
}

/// An inclusive age range used for analytics grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeBand {
    pub label: String,
    pub min: u32,
    /// Open-ended when absent
    pub max: Option<u32>,
}

impl AgeBand {
    pub fn new(label: impl Into<String>, min: u32, max: Option<u32>) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && self.max.map_or(true, |max| age <= max)
    }
}

/// Clinic-wide settings for the records store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClinicConfig {
    /// Bookable time slots ("HH:MM")
    pub time_slots: Vec<String>,
    pub patient_id_prefix: String,
    pub bill_number_prefix: String,
    /// Zero-padding width for generated patient and bill numbers
    pub number_width: usize,
    pub bill_numbering: BillNumbering,
    /// Ordered, non-overlapping
    pub age_bands: Vec<AgeBand>,
    pub log_filter: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        let time_slots = [
            "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00",
            "15:30", "16:00", "16:30",
        ];
        Self {
            time_slots: time_slots.iter().map(|s| s.to_string()).collect(),
            patient_id_prefix: "P".into(),
            bill_number_prefix: "BILL-".into(),
            number_width: 3,
            bill_numbering: BillNumbering::CollectionLength,
            age_bands: vec![
                AgeBand::new("0-30", 0, Some(30)),
                AgeBand::new("31-50", 31, Some(50)),
                AgeBand::new("51+", 51, None),
            ],
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl ClinicConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.time_slots.is_empty() {
            return Err(ConfigError::Invalid("at least one time slot is required".into()));
        }
        if self.number_width == 0 {
            return Err(ConfigError::Invalid("number_width must be positive".into()));
        }
        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| ConfigError::Invalid(format!("log_filter '{}': {}", self.log_filter, e)))?;

        for band in &self.age_bands {
            if band.max.is_some_and(|max| max < band.min) {
                return Err(ConfigError::Invalid(format!(
                    "age band '{}' ends before it starts",
                    band.label
                )));
            }
        }
        for pair in self.age_bands.windows(2) {
            let ordered = pair[0].max.is_some_and(|max| max < pair[1].min);
            if !ordered {
                return Err(ConfigError::Invalid(format!(
                    "age bands '{}' and '{}' overlap or are out of order",
                    pair[0].label, pair[1].label
                )));
            }
        }

        Ok(())
    }

    /// Log filter for this config; `RUST_LOG` still takes precedence.
    pub fn env_filter(&self) -> EnvFilter {
        env_filter(&self.log_filter)
    }

    pub fn is_time_slot(&self, time: &str) -> bool {
        self.time_slots.iter().any(|slot| slot == time)
    }

    /// Patient number for position `n`, e.g. "P007".
    pub fn patient_number(&self, n: usize) -> String {
        format!("{}{:0width$}", self.patient_id_prefix, n, width = self.number_width)
    }

    /// Bill number for position `n`, e.g. "BILL-012".
    pub fn bill_number(&self, n: u64) -> String {
        format!("{}{:0width$}", self.bill_number_prefix, n, width = self.number_width)
    }
}
