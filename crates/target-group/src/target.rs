//! Target kinds and registrations

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the members of a target group are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Targets identified by instance ID
    Instance,
    /// Targets identified by IP address
    Ip,
    /// Target is a function
    Lambda,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::Ip => "ip",
            Self::Lambda => "lambda",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of attaching a target to a target group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerTargetProps {
    /// What kind of target this is
    pub target_type: TargetType,

    /// Description of the target's direct addition to the group's target list.
    ///
    /// `None` when the target registers itself later through another channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_json: Option<serde_json::Value>,
}

impl LoadBalancerTargetProps {
    /// A target that is listed directly in the group
    pub fn direct(target_type: TargetType, target_json: serde_json::Value) -> Self {
        Self {
            target_type,
            target_json: Some(target_json),
        }
    }

    /// A target that only fixes the kind and registers itself later
    pub fn self_registering(target_type: TargetType) -> Self {
        Self {
            target_type,
            target_json: None,
        }
    }
}

/// One directly registered member of the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub target_type: TargetType,
    pub description: serde_json::Value,
}
