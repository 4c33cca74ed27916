//! References to target groups

use crate::dependable::ConcreteDependable;
use crate::lazy::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A target group, defined here or imported
pub trait TargetGroupRef {
    /// ARN of the target group
    fn target_group_arn(&self) -> Lazy<Option<String>>;

    /// Comma-separated ARNs of the load balancers routing to this group
    fn load_balancer_arns(&self) -> Lazy<Option<String>>;

    /// Dependable covering everything that attaches the group to a load balancer
    fn load_balancer_attached(&self) -> &ConcreteDependable;
}

/// Properties to reference an existing target group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroupImportProps {
    pub target_group_arn: String,

    /// Port the target group is listening on
    pub default_port: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_arns: Option<String>,
}

/// Target group defined outside of this configuration
#[derive(Debug, Clone)]
pub struct ImportedTargetGroup {
    props: TargetGroupImportProps,
    load_balancer_attached: ConcreteDependable,
}

impl ImportedTargetGroup {
    pub fn new(props: TargetGroupImportProps) -> Self {
        debug!("Importing target group: {}", props.target_group_arn);
        Self {
            props,
            load_balancer_attached: ConcreteDependable::new(),
        }
    }

    pub fn default_port(&self) -> &str {
        &self.props.default_port
    }
}

impl TargetGroupRef for ImportedTargetGroup {
    fn target_group_arn(&self) -> Lazy<Option<String>> {
        Lazy::constant(Some(self.props.target_group_arn.clone()))
    }

    fn load_balancer_arns(&self) -> Lazy<Option<String>> {
        Lazy::constant(self.props.load_balancer_arns.clone())
    }

    fn load_balancer_attached(&self) -> &ConcreteDependable {
        &self.load_balancer_attached
    }
}
