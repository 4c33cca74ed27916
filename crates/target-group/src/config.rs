//! Target group configuration

use crate::error::{Result, TargetGroupError};
use crate::health::{HealthCheck, Protocol};
use crate::target::TargetType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest name the provider accepts for a target group
pub const MAX_NAME_LENGTH: usize = 32;

/// Longest deregistration delay the provider accepts, in seconds
pub const MAX_DEREGISTRATION_DELAY_SECONDS: u64 = 3600;

/// Reference to the VPC the group lives in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcRef {
    pub vpc_id: String,
}

impl VpcRef {
    pub fn new(vpc_id: impl Into<String>) -> Self {
        Self {
            vpc_id: vpc_id.into(),
        }
    }
}

/// Properties a target group is constructed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetGroupProps {
    /// Generated by the provider when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_group_name: Option<String>,

    /// Time to wait before deregistering a target
    #[serde(default, with = "duration_secs", skip_serializing_if = "Option::is_none")]
    pub deregistration_delay: Option<Duration>,

    /// Determined from the registered targets when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,

    /// Default port for members of the group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Protocol used for routing traffic to the members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,

    pub vpc: VpcRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
}

impl TargetGroupProps {
    pub fn new(vpc: VpcRef) -> Self {
        Self {
            target_group_name: None,
            vpc,
            deregistration_delay: None,
            health_check: None,
            target_type: None,
            port: None,
            protocol: None,
        }
    }

    /// Parse and validate props from TOML
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let props: Self = toml::from_str(input)?;
        props.validate()?;
        Ok(props)
    }

    /// Check the props against the limits the provider enforces
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.target_group_name {
            validate_name(name)?;
        }
        if self.vpc.vpc_id.is_empty() {
            return Err(TargetGroupError::Configuration(
                "vpc_id must not be empty".to_string(),
            ));
        }
        if let Some(delay) = self.deregistration_delay {
            if delay.as_secs() > MAX_DEREGISTRATION_DELAY_SECONDS {
                return Err(TargetGroupError::Configuration(format!(
                    "deregistration delay must be between 0 and {} seconds, got {}",
                    MAX_DEREGISTRATION_DELAY_SECONDS,
                    delay.as_secs()
                )));
            }
        }
        if let Some(health_check) = &self.health_check {
            health_check.validate()?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LENGTH {
        return Err(TargetGroupError::Configuration(format!(
            "target group name must be 1 to {} characters: '{}'",
            MAX_NAME_LENGTH, name
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(TargetGroupError::Configuration(format!(
            "target group name may only contain alphanumerics and hyphens: '{}'",
            name
        )));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(TargetGroupError::Configuration(format!(
            "target group name must not begin or end with a hyphen: '{}'",
            name
        )));
    }
    Ok(())
}

/// Serde adapter writing `Option<Duration>` as whole seconds
pub(crate) mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_toml() {
        let props = TargetGroupProps::from_toml_str(
            r#"
            target_group_name = "web-targets"
            deregistration_delay = 300
            target_type = "ip"
            port = 8080
            protocol = "HTTP"

            [vpc]
            vpc_id = "vpc-12345"

            [health_check]
            interval = 30
            path = "/health"
            healthy_http_codes = "200-299"
            "#,
        )
        .unwrap();

        assert_eq!(props.target_group_name.as_deref(), Some("web-targets"));
        assert_eq!(props.deregistration_delay, Some(Duration::from_secs(300)));
        assert_eq!(props.target_type, Some(TargetType::Ip));
        assert_eq!(props.port, Some(8080));
        assert_eq!(props.protocol, Some(Protocol::Http));

        let health_check = props.health_check.unwrap();
        assert_eq!(health_check.interval, Some(Duration::from_secs(30)));
        assert_eq!(health_check.path.as_deref(), Some("/health"));
        assert_eq!(health_check.timeout, None);
    }

    #[test]
    fn test_minimal_toml() {
        let props = TargetGroupProps::from_toml_str("[vpc]\nvpc_id = \"vpc-1\"\n").unwrap();
        assert_eq!(props, TargetGroupProps::new(VpcRef::new("vpc-1")));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            TargetGroupProps::from_toml_str("target_group_name = "),
            Err(TargetGroupError::Config(_))
        ));
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("my-group-1").is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert!(validate_name("-leading").is_err());
        assert!(validate_name("trailing-").is_err());
        assert!(validate_name("under_score").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn test_deregistration_delay_limit() {
        let mut props = TargetGroupProps::new(VpcRef::new("vpc-1"));
        props.deregistration_delay = Some(Duration::from_secs(3601));
        assert!(matches!(
            props.validate(),
            Err(TargetGroupError::Configuration(_))
        ));

        props.deregistration_delay = Some(Duration::from_secs(0));
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_round_trip_keeps_seconds() {
        let mut props = TargetGroupProps::new(VpcRef::new("vpc-1"));
        props.deregistration_delay = Some(Duration::from_secs(45));

        let encoded = toml::to_string(&props).unwrap();
        assert!(encoded.contains("deregistration_delay = 45"));
    }
}
