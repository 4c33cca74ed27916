/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs Ltd <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! # Target Group
//!
//! Deferred configuration builder for load balancer target groups:
//!
//! - Health check, attributes and targets can be changed until render time
//! - Every member of a group must be addressed the same way (IP, instance, ...)
//! - Rendered declaration serializes to the provider's property names
//! - Attachment to load balancers is tracked through a dependable handle
//! - Metric dimensions derived from listener ARNs

pub mod arn;
pub mod attributes;
pub mod config;
pub mod dependable;
pub mod error;
pub mod health;
pub mod import;
pub mod lazy;
pub mod metrics;
pub mod resource;
pub mod target;

pub use arn::load_balancer_name_from_listener_arn;
pub use attributes::{AttributeValue, Attributes, RenderedAttribute, DEREGISTRATION_DELAY_KEY};
pub use config::{TargetGroupProps, VpcRef};
pub use dependable::{ConcreteDependable, Dependable, DependencyRoot};
pub use error::{Result, TargetGroupError};
pub use health::{HealthCheck, Matcher, Protocol, TRAFFIC_PORT};
pub use import::{ImportedTargetGroup, TargetGroupImportProps, TargetGroupRef};
pub use lazy::Lazy;
pub use metrics::MetricDimensions;
pub use resource::{RenderedTargetGroup, TargetGroupResource};
pub use target::{LoadBalancerTargetProps, TargetRecord, TargetType};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identity the provisioning framework assigns once the group exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedTargetGroup {
    pub target_group_arn: String,
    pub target_group_full_name: String,
    pub target_group_name: String,
    #[serde(default)]
    pub load_balancer_arns: Vec<String>,
}

#[derive(Debug, Default)]
struct TargetGroupState {
    health_check: HealthCheck,
    attributes: Attributes,
    targets: Vec<TargetRecord>,
    target_type: Option<TargetType>,
}

/// Target group under construction
#[derive(Debug)]
pub struct TargetGroup {
    state: Arc<RwLock<TargetGroupState>>,
    resource: TargetGroupResource,
    default_port: Option<u16>,
    load_balancer_attached: ConcreteDependable,
    listener_arns: Vec<String>,
    provisioned: Arc<RwLock<Option<ProvisionedTargetGroup>>>,
}

impl TargetGroup {
    /// Create a new target group
    pub fn new(props: TargetGroupProps) -> Self {
        info!(
            "Creating target group {} in {}",
            props.target_group_name.as_deref().unwrap_or("<generated>"),
            props.vpc.vpc_id
        );

        let mut attributes = Attributes::new();
        if let Some(delay) = props.deregistration_delay {
            attributes.set(DEREGISTRATION_DELAY_KEY, Some(delay.as_secs().to_string()));
        }

        let state = Arc::new(RwLock::new(TargetGroupState {
            health_check: props.health_check.unwrap_or_default(),
            attributes,
            targets: Vec::new(),
            target_type: props.target_type,
        }));

        let resource = TargetGroupResource {
            name: props.target_group_name,
            vpc_id: props.vpc.vpc_id,
            port: props.port,
            protocol: props.protocol,
            target_group_attributes: deferred(&state, |state| state.attributes.render()),
            target_type: deferred(&state, |state| state.target_type),
            targets: deferred(&state, |state| {
                state
                    .targets
                    .iter()
                    .map(|target| target.description.clone())
                    .collect()
            }),
            health_check_interval_seconds: deferred(&state, |state| {
                state.health_check.interval_seconds()
            }),
            health_check_path: deferred(&state, |state| state.health_check.path.clone()),
            health_check_port: deferred(&state, |state| state.health_check.port.clone()),
            health_check_protocol: deferred(&state, |state| state.health_check.protocol),
            health_check_timeout_seconds: deferred(&state, |state| {
                state.health_check.timeout_seconds()
            }),
            healthy_threshold_count: deferred(&state, |state| {
                state.health_check.healthy_threshold_count
            }),
            unhealthy_threshold_count: deferred(&state, |state| {
                state.health_check.unhealthy_threshold_count
            }),
            matcher: deferred(&state, |state| state.health_check.matcher()),
        };

        Self {
            state,
            resource,
            default_port: props.port,
            load_balancer_attached: ConcreteDependable::new(),
            listener_arns: Vec::new(),
            provisioned: Arc::new(RwLock::new(None)),
        }
    }

    /// Set/replace the target group's health check
    pub fn configure_health_check(&mut self, health_check: HealthCheck) {
        debug!("Replacing health check: {:?}", health_check);
        self.state.write().health_check = health_check;
    }

    /// Set a non-standard attribute on the target group; `None` clears it
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        debug!("Setting attribute {} = {:?}", key, value);
        self.state.write().attributes.set(key, value);
    }

    /// Register a load balancing target as part of this group
    pub fn register_target(&mut self, props: LoadBalancerTargetProps) -> Result<()> {
        let mut state = self.state.write();

        if let Some(existing) = state.target_type {
            if existing != props.target_type {
                warn!(
                    "Rejecting target of type {} for group of type {}",
                    props.target_type, existing
                );
                return Err(TargetGroupError::TypeMismatch {
                    existing,
                    adding: props.target_type,
                });
            }
        }
        state.target_type = Some(props.target_type);

        if let Some(description) = props.target_json {
            debug!("Registering {} target: {}", props.target_type, description);
            state.targets.push(TargetRecord {
                target_type: props.target_type,
                description,
            });
        } else {
            debug!("Registering self-registering {} target", props.target_type);
        }

        Ok(())
    }

    /// Record a listener routing to this group.
    ///
    /// `associating` is the construct that performs the association; it
    /// becomes part of [`TargetGroup::load_balancer_attached`].
    pub fn register_listener(
        &mut self,
        listener_arn: impl Into<String>,
        associating: impl Into<DependencyRoot>,
    ) {
        let listener_arn = listener_arn.into();
        info!("Attaching target group to listener {}", listener_arn);
        self.listener_arns.push(listener_arn);
        self.load_balancer_attached.add(associating);
    }

    /// Full name of the first load balancer routing to this group.
    ///
    /// Emitted as a dimension of the group's metrics, e.g.
    /// `app/my-load-balancer/123456789`.
    pub fn first_load_balancer_full_name(&self) -> Result<String> {
        let listener_arn = self.listener_arns.first().ok_or_else(|| {
            TargetGroupError::NotAttached(
                "register a listener before reading the load balancer name".to_string(),
            )
        })?;
        load_balancer_name_from_listener_arn(listener_arn)
    }

    /// Supply the identity assigned by the provisioning framework
    pub fn bind_provisioned(&self, provisioned: ProvisionedTargetGroup) {
        info!("Target group provisioned: {}", provisioned.target_group_arn);
        *self.provisioned.write() = Some(provisioned);
    }

    pub fn target_group_full_name(&self) -> Lazy<Option<String>> {
        self.provisioned_field(|provisioned| provisioned.target_group_full_name.clone())
    }

    pub fn target_group_name(&self) -> Lazy<Option<String>> {
        self.provisioned_field(|provisioned| provisioned.target_group_name.clone())
    }

    /// ARNs of the load balancers routing to this group
    pub fn target_group_load_balancer_arns(&self) -> Lazy<Option<Vec<String>>> {
        self.provisioned_field(|provisioned| provisioned.load_balancer_arns.clone())
    }

    pub fn default_port(&self) -> Option<u16> {
        self.default_port
    }

    /// Deferred declaration for the provisioning framework
    pub fn resource(&self) -> &TargetGroupResource {
        &self.resource
    }

    /// Resolve the declaration as of now
    pub fn render(&self) -> RenderedTargetGroup {
        debug!("Rendering target group");
        self.resource.render()
    }

    pub fn health_check(&self) -> HealthCheck {
        self.state.read().health_check.clone()
    }

    pub fn attributes(&self) -> Attributes {
        self.state.read().attributes.clone()
    }

    /// Directly registered targets, in registration order
    pub fn targets(&self) -> Vec<TargetRecord> {
        self.state.read().targets.clone()
    }

    pub fn target_type(&self) -> Option<TargetType> {
        self.state.read().target_type
    }

    fn provisioned_field<T, F>(&self, read: F) -> Lazy<Option<T>>
    where
        F: Fn(&ProvisionedTargetGroup) -> T + Send + Sync + 'static,
    {
        let provisioned = self.provisioned.clone();
        Lazy::new(move || provisioned.read().as_ref().map(&read))
    }
}

impl TargetGroupRef for TargetGroup {
    fn target_group_arn(&self) -> Lazy<Option<String>> {
        self.provisioned_field(|provisioned| provisioned.target_group_arn.clone())
    }

    fn load_balancer_arns(&self) -> Lazy<Option<String>> {
        self.provisioned_field(|provisioned| provisioned.load_balancer_arns.join(","))
    }

    fn load_balancer_attached(&self) -> &ConcreteDependable {
        &self.load_balancer_attached
    }
}

/// Deferred read of the builder state
fn deferred<T, F>(state: &Arc<RwLock<TargetGroupState>>, read: F) -> Lazy<T>
where
    F: Fn(&TargetGroupState) -> T + Send + Sync + 'static,
{
    let state = state.clone();
    Lazy::new(move || read(&state.read()))
}
