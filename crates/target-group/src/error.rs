//! Error types for target group configuration

use crate::target::TargetType;
use thiserror::Error;

/// Result type for target group operations
pub type Result<T> = std::result::Result<T, TargetGroupError>;

/// Errors that can occur while assembling a target group
#[derive(Error, Debug)]
pub enum TargetGroupError {
    /// A target of a different kind than the group already holds
    #[error("Already have a target of type '{existing}', adding '{adding}'; make all targets the same type")]
    TypeMismatch {
        existing: TargetType,
        adding: TargetType,
    },

    /// Identifier does not carry the expected slash-delimited fields
    #[error("Malformed ARN: {0}")]
    MalformedArn(String),

    /// Operation needs at least one attached load balancer
    #[error("Target group not attached: {0}")]
    NotAttached(String),

    /// Identity is only known once the provisioning framework binds it
    #[error("Target group not provisioned: {0}")]
    NotProvisioned(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Config file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Rendered output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
