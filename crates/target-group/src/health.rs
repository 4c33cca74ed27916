//! Health check configuration

use crate::config::duration_secs;
use crate::error::{Result, TargetGroupError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Port value telling the load balancer to probe on the traffic port
pub const TRAFFIC_PORT: &str = "traffic-port";

/// Protocol used for load balancing or health probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "TLS")]
    Tls,
    #[serde(rename = "UDP")]
    Udp,
    #[serde(rename = "TCP_UDP")]
    TcpUdp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
            Self::Tcp => "TCP",
            Self::Tls => "TLS",
            Self::Udp => "UDP",
            Self::TcpUdp => "TCP_UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health check policy for the members of a target group.
///
/// Every field is optional; an absent field leaves the provider default in
/// place rather than meaning zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Approximate time between health checks of an individual target
    #[serde(default, with = "duration_secs", skip_serializing_if = "Option::is_none")]
    pub interval: Option<Duration>,

    /// Ping path for HTTP(S) health checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Port probed by the load balancer, or [`TRAFFIC_PORT`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,

    /// Time without a response after which a check counts as failed
    #[serde(default, with = "duration_secs", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,

    /// Consecutive successes before an unhealthy target is considered healthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy_threshold_count: Option<u32>,

    /// Consecutive failures before a target is considered unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold_count: Option<u32>,

    /// Successful response codes: `"200"`, `"200,202"` or `"200-299"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy_http_codes: Option<String>,
}

impl HealthCheck {
    /// Interval in whole seconds, as the provider expects it
    pub fn interval_seconds(&self) -> Option<u64> {
        self.interval.map(|interval| interval.as_secs())
    }

    /// Timeout in whole seconds
    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout.map(|timeout| timeout.as_secs())
    }

    /// Response matcher, present only when HTTP codes are configured
    pub fn matcher(&self) -> Option<Matcher> {
        self.healthy_http_codes.as_ref().map(|codes| Matcher {
            http_code: codes.clone(),
        })
    }

    /// Check the configured values against the ranges the provider accepts
    pub fn validate(&self) -> Result<()> {
        if let Some(interval) = self.interval_seconds() {
            check_range("health check interval", interval, 5, 300)?;
        }
        if let Some(timeout) = self.timeout_seconds() {
            check_range("health check timeout", timeout, 2, 120)?;
        }
        if let Some(count) = self.healthy_threshold_count {
            check_range("healthy threshold count", count.into(), 2, 10)?;
        }
        if let Some(count) = self.unhealthy_threshold_count {
            check_range("unhealthy threshold count", count.into(), 2, 10)?;
        }
        if let Some(path) = &self.path {
            if !path.starts_with('/') {
                return Err(TargetGroupError::Configuration(format!(
                    "health check path must start with '/': {}",
                    path
                )));
            }
        }
        if let Some(codes) = &self.healthy_http_codes {
            validate_http_codes(codes)?;
        }
        Ok(())
    }
}

/// HTTP codes matched against a health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    #[serde(rename = "HttpCode")]
    pub http_code: String,
}

fn check_range(what: &str, value: u64, min: u64, max: u64) -> Result<()> {
    if value < min || value > max {
        return Err(TargetGroupError::Configuration(format!(
            "{} must be between {} and {}, got {}",
            what, min, max, value
        )));
    }
    Ok(())
}

fn validate_http_codes(codes: &str) -> Result<()> {
    let invalid = || TargetGroupError::Configuration(format!("invalid healthy HTTP codes: '{}'", codes));
    let parse_code = |code: &str| -> Result<u16> {
        let code = code.trim();
        if code.len() != 3 {
            return Err(invalid());
        }
        code.parse::<u16>().map_err(|_| invalid())
    };

    if let Some((low, high)) = codes.split_once('-') {
        if parse_code(low)? > parse_code(high)? {
            return Err(invalid());
        }
        return Ok(());
    }

    for code in codes.split(',') {
        parse_code(code)?;
    }
    Ok(())
}
