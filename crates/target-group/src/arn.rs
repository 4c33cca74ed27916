//! ARN helpers

use crate::error::{Result, TargetGroupError};

/// Extract the full load balancer name (used for metrics) from a listener ARN.
///
/// Turns
///
/// ```text
/// arn:aws:elasticloadbalancing:us-west-2:123456789012:listener/app/my-load-balancer/50dc6c495c0c9188/f2f7dc8efc522ab2
/// ```
///
/// into `app/my-load-balancer/50dc6c495c0c9188`. Fails with
/// [`TargetGroupError::MalformedArn`] when any of the three fields after the
/// first `/` is missing or empty.
pub fn load_balancer_name_from_listener_arn(listener_arn: &str) -> Result<String> {
    let parts: Vec<&str> = listener_arn.split('/').collect();
    match parts.get(1..4) {
        Some(fields) if fields.iter().all(|field| !field.is_empty()) => Ok(fields.join("/")),
        _ => Err(TargetGroupError::MalformedArn(format!(
            "expected '<prefix>/<type>/<name>/<id>', got '{}'",
            listener_arn
        ))),
    }
}
