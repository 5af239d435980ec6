//! Error types for the divider calculator.
//!
//! Input-shape problems (no resistors, bad voltages, bad limits) are fatal for a query and are
//! returned as distinct variants so a caller can print a targeted message and ask again.
//! `NoFiniteSolution` and `NoAchievableVoltage` describe empty results rather than failures; the
//! solver absorbs them and callers only use them for their messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::Role;

/// Result type alias using [`DividerError`].
pub type Result<T> = std::result::Result<T, DividerError>;

/// Every error the calculator and its front end can produce.
#[derive(Error, Debug)]
pub enum DividerError {
    // ============ Query Errors ============
    /// The resistor set is empty
    #[error("No resistors available to build a divider from")]
    NoResistorsAvailable,

    /// Vin is zero, negative or not a number
    #[error("Input voltage must be positive (got {vin} V)")]
    InvalidInputVoltage { vin: f64 },

    /// Vout is negative, above Vin or not a number
    #[error("Desired output voltage must be between 0 V and the input voltage {vin} V (got {vout} V)")]
    InvalidOutputVoltage { vin: f64, vout: f64 },

    /// The current limit is zero, negative or not a number
    #[error("Maximum current must be positive (got {max_ma} mA)")]
    InvalidCurrentLimit { max_ma: f64 },

    /// The ownership tolerance is negative or not a number
    #[error("Tolerance must be a non-negative fraction (got {tolerance})")]
    InvalidTolerance { tolerance: f64 },

    /// Every pair draws more current than allowed
    #[error("No resistor combination stays within the {max_ma} mA current limit")]
    NoPairWithinCurrentLimit { max_ma: f64 },

    /// An exact match has no finite positive partner for this role
    #[error("No finite partner for {existing} kΩ used as {role}")]
    NoFiniteSolution { role: Role, existing: f64 },

    /// No pair reaches a voltage at or below the target
    #[error("No achievable voltages at or below {vout} V")]
    NoAchievableVoltage { vout: f64 },

    // ============ Configuration Errors ============
    /// Error reading the configuration file
    #[error("Failed to read configuration file '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed line in the configuration file
    #[error("Configuration parse error at line {line}: {message}")]
    ConfigParse { line: usize, message: String },

    /// The expected section is absent
    #[error("Configuration has no [{section}] section")]
    MissingSection { section: String },

    /// The expected key is absent from its section
    #[error("Configuration section [{section}] has no '{key}' key")]
    MissingKey { section: String, key: String },

    /// A listed resistor value is not usable
    #[error("Invalid resistor value '{entry}': {reason}")]
    InvalidResistorValue { entry: String, reason: String },

    // ============ Front End Errors ============
    /// Reading from or writing to the terminal failed
    #[error("Prompt failed: {source}")]
    Prompt {
        #[source]
        source: io::Error,
    },
}

impl DividerError {
    /// Create a configuration parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid resistor value error
    pub fn invalid_value(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResistorValue {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the voltages or limits of a query, as opposed to the resistor
    /// source. A front end can re-prompt on these.
    pub fn is_query_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInputVoltage { .. }
                | Self::InvalidOutputVoltage { .. }
                | Self::InvalidCurrentLimit { .. }
                | Self::NoPairWithinCurrentLimit { .. }
        )
    }
}
