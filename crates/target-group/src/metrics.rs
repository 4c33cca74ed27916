//! Metric dimensions

use crate::error::{Result, TargetGroupError};
use crate::TargetGroup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dimensions the load balancer metrics of a target group are keyed by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDimensions {
    /// Full name of the target group, e.g. `targetgroup/web/73e2d6bc24d8a067`
    pub target_group: String,
    /// Full name of the first load balancer, e.g. `app/my-load-balancer/50dc6c495c0c9188`
    pub load_balancer: String,
}

impl MetricDimensions {
    /// Dimensions for a provisioned target group attached to at least one listener
    pub fn for_target_group(group: &TargetGroup) -> Result<Self> {
        let target_group = group.target_group_full_name().resolve().ok_or_else(|| {
            TargetGroupError::NotProvisioned("target group full name is not known yet".to_string())
        })?;
        let load_balancer = group.first_load_balancer_full_name()?;

        Ok(Self {
            target_group,
            load_balancer,
        })
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("TargetGroup".to_string(), self.target_group.clone()),
            ("LoadBalancer".to_string(), self.load_balancer.clone()),
        ])
    }
}
