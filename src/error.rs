//! Error types for smb-walker
//!
//! The hierarchy mirrors the recovery taxonomy the enumeration engine
//! needs: every protocol failure carries enough classification for the
//! caller to decide whether to retry the port, move to the next port,
//! skip a share, skip a path, or abandon the host.
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Failure handling is visible at each call site; no ambient rescue
//! - Per-path and per-share failures never abort the rest of a host

use thiserror::Error;

/// Top-level error type for the enumeration engine
#[derive(Error, Debug)]
pub enum SpiderError {
    /// Protocol-level errors
    #[error("SMB error: {0}")]
    Smb(#[from] SmbError),

    /// Loot rendering / persistence hand-off errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Interrupted by signal; always propagated to the caller
    #[error("Enumeration interrupted by signal")]
    Interrupted,

    /// Worker channel closed unexpectedly
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,
}

/// Protocol and connection errors, one variant per recovery class
#[derive(Error, Debug, Clone)]
pub enum SmbError {
    /// Connection attempt timed out
    #[error("Connection to {host}:{port} timed out")]
    ConnectionTimeout { host: String, port: u16 },

    /// Connection reset by the remote end
    #[error("Connection to {host}:{port} reset by peer")]
    ConnectionReset { host: String, port: u16 },

    /// Negotiated protocol option rejected by the remote end
    #[error("Protocol option not supported by {host}:{port}")]
    UnsupportedOption { host: String, port: u16 },

    /// Protocol-option exhaustion; worth one delayed retry of the same port
    #[error("Protocol resources exhausted on {host}:{port}")]
    ResourceExhausted { host: String, port: u16 },

    /// Session setup was rejected
    #[error("Authentication failed: {reason}")]
    AuthFailed { reason: String },

    /// Server returned a non-success status code
    #[error("Unexpected status {status} from server")]
    UnexpectedStatus { status: String },

    /// Response could not be decoded
    #[error("Invalid packet received: {reason}")]
    InvalidPacket { reason: String },

    /// Unexpected runtime failure; fatal for the current host
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Interrupted by signal
    #[error("Interrupted")]
    Interrupted,
}

impl SmbError {
    /// Transient-resource class: fixed delay, then exactly one retry of
    /// the same port before falling through.
    pub fn is_transient_resource(&self) -> bool {
        matches!(self, SmbError::ResourceExhausted { .. })
    }

    /// Recoverable at port level: abandon this port attempt and try the
    /// next candidate port.
    pub fn is_port_recoverable(&self) -> bool {
        matches!(
            self,
            SmbError::ConnectionTimeout { .. }
                | SmbError::ConnectionReset { .. }
                | SmbError::UnsupportedOption { .. }
                | SmbError::ResourceExhausted { .. }
                | SmbError::AuthFailed { .. }
                | SmbError::UnexpectedStatus { .. }
                | SmbError::InvalidPacket { .. }
        )
    }

    /// Fatal for the current host; other hosts are unaffected.
    pub fn is_fatal_for_host(&self) -> bool {
        matches!(self, SmbError::Runtime(_))
    }
}

/// A single directory listing failed
///
/// Recoverable per path: the spider discards the path and keeps draining
/// its queue.
#[derive(Error, Debug, Clone)]
#[error("Failed to list '{path}': {reason}")]
pub struct ListError {
    /// Relative path within the share
    pub path: String,

    /// Protocol-layer failure description
    pub reason: String,
}

/// Loot rendering and storage errors
#[derive(Error, Debug)]
pub enum SinkError {
    /// CSV serialization failed
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// Rendered loot was not valid UTF-8
    #[error("Rendered loot is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Storing the loot payload failed
    #[error("Failed to store loot: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Spider log format index out of range
    #[error("Invalid log format index {index}: must be between 0 and 3")]
    InvalidLogFormat { index: u8 },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },
}

/// Result type alias for SpiderError
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for SmbError
pub type SmbResult<T> = std::result::Result<T, SmbError>;
