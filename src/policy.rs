//! Enumeration policy
//!
//! The validated, read-only configuration surface the engine consumes.
//! Option parsing belongs to the embedding application; this module only
//! defines the runtime policy and its defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Destination format for spidered results
///
/// Matches the original four-way spider log option: 0 = disabled,
/// 1 = CSV, 2 = table (txt), 3 = one liner (txt).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// No hand-off to the persistence sink
    Disabled,
    /// Detailed records as CSV
    Csv,
    /// Detailed records as a fixed-width text table
    Table,
    /// One flat text line per record
    #[default]
    OneLine,
}

impl LogFormat {
    /// Convert from the numeric option value (0-3)
    pub fn from_index(index: u8) -> Result<Self, ConfigError> {
        match index {
            0 => Ok(LogFormat::Disabled),
            1 => Ok(LogFormat::Csv),
            2 => Ok(LogFormat::Table),
            3 => Ok(LogFormat::OneLine),
            _ => Err(ConfigError::InvalidLogFormat { index }),
        }
    }

    /// Numeric option value
    pub fn index(&self) -> u8 {
        match self {
            LogFormat::Disabled => 0,
            LogFormat::Csv => 1,
            LogFormat::Table => 2,
            LogFormat::OneLine => 3,
        }
    }
}

/// Read-only policy for one enumeration run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationPolicy {
    /// Spider shares recursively
    pub spider_shares: bool,

    /// Show detailed per-directory listings while spidering
    pub show_files: bool,

    /// Spider only user profiles when the share is an OS-default disk share
    pub spider_profiles: bool,

    /// Where spidered results are handed off
    pub log_format: LogFormat,

    /// Max number of subdirectories to spider
    pub max_depth: u32,
}

impl Default for EnumerationPolicy {
    fn default() -> Self {
        Self {
            spider_shares: false,
            show_files: false,
            spider_profiles: true,
            log_format: LogFormat::OneLine,
            max_depth: 999,
        }
    }
}
