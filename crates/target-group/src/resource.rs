//! Target group declaration and its rendered form

use crate::attributes::RenderedAttribute;
use crate::error::Result;
use crate::health::{Matcher, Protocol};
use crate::lazy::Lazy;
use crate::target::TargetType;
use serde::{Deserialize, Serialize};

/// Declaration handed to the provisioning framework.
///
/// Identity fields are fixed at construction; everything derived from the
/// builder's mutable state is a [`Lazy`] that is only resolved by
/// [`TargetGroupResource::render`].
#[derive(Debug, Clone)]
pub struct TargetGroupResource {
    pub name: Option<String>,
    pub vpc_id: String,
    pub port: Option<u16>,
    pub protocol: Option<Protocol>,
    pub target_group_attributes: Lazy<Vec<RenderedAttribute>>,
    pub target_type: Lazy<Option<TargetType>>,
    pub targets: Lazy<Vec<serde_json::Value>>,
    pub health_check_interval_seconds: Lazy<Option<u64>>,
    pub health_check_path: Lazy<Option<String>>,
    pub health_check_port: Lazy<Option<String>>,
    pub health_check_protocol: Lazy<Option<Protocol>>,
    pub health_check_timeout_seconds: Lazy<Option<u64>>,
    pub healthy_threshold_count: Lazy<Option<u32>>,
    pub unhealthy_threshold_count: Lazy<Option<u32>>,
    pub matcher: Lazy<Option<Matcher>>,
}

impl TargetGroupResource {
    /// Resolve every deferred field once, as of now
    pub fn render(&self) -> RenderedTargetGroup {
        RenderedTargetGroup {
            name: self.name.clone(),
            vpc_id: self.vpc_id.clone(),
            port: self.port,
            protocol: self.protocol,
            target_group_attributes: self.target_group_attributes.resolve(),
            target_type: self.target_type.resolve(),
            targets: self.targets.resolve(),
            health_check_interval_seconds: self.health_check_interval_seconds.resolve(),
            health_check_path: self.health_check_path.resolve(),
            health_check_port: self.health_check_port.resolve(),
            health_check_protocol: self.health_check_protocol.resolve(),
            health_check_timeout_seconds: self.health_check_timeout_seconds.resolve(),
            healthy_threshold_count: self.healthy_threshold_count.resolve(),
            unhealthy_threshold_count: self.unhealthy_threshold_count.resolve(),
            matcher: self.matcher.resolve(),
        }
    }
}

/// Target group properties as captured at render time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderedTargetGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub vpc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_group_attributes: Vec<RenderedAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_interval_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_timeout_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy_threshold_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<Matcher>,
}

impl RenderedTargetGroup {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::RwLock;
    use serde_json::json;
    use std::sync::Arc;

    fn resource(path: Arc<RwLock<Option<String>>>) -> TargetGroupResource {
        TargetGroupResource {
            name: Some("web".to_string()),
            vpc_id: "vpc-1".to_string(),
            port: Some(80),
            protocol: Some(Protocol::Http),
            target_group_attributes: Lazy::constant(Vec::new()),
            target_type: Lazy::constant(None),
            targets: Lazy::constant(Vec::new()),
            health_check_interval_seconds: Lazy::constant(None),
            health_check_path: Lazy::new(move || path.read().clone()),
            health_check_port: Lazy::constant(None),
            health_check_protocol: Lazy::constant(None),
            health_check_timeout_seconds: Lazy::constant(None),
            healthy_threshold_count: Lazy::constant(None),
            unhealthy_threshold_count: Lazy::constant(None),
            matcher: Lazy::constant(Some(Matcher {
                http_code: "200".to_string(),
            })),
        }
    }

    #[test]
    fn test_render_is_a_snapshot() {
        let path = Arc::new(RwLock::new(None));
        let resource = resource(path.clone());

        *path.write() = Some("/ping".to_string());
        let rendered = resource.render();

        *path.write() = Some("/other".to_string());
        assert_eq!(rendered.health_check_path.as_deref(), Some("/ping"));
        assert_eq!(
            resource.render().health_check_path.as_deref(),
            Some("/other")
        );
    }

    #[test]
    fn test_json_omits_unset_fields() {
        let rendered = resource(Arc::new(RwLock::new(None))).render();
        assert_eq!(
            rendered.to_json().unwrap(),
            json!({
                "Name": "web",
                "VpcId": "vpc-1",
                "Port": 80,
                "Protocol": "HTTP",
                "Matcher": { "HttpCode": "200" },
            })
        );
    }
}
