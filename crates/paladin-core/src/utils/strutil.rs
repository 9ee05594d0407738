//! String helpers

use crate::errors::{PaladinError, Result};
use std::net::IpAddr;

const TRUE_VALUES: &[&str] = &["true", "1", "on", "yes", "y", "ok", "enable"];
const FALSE_VALUES: &[&str] = &["false", "0", "off", "no", "n", "nok", "disable"];

/// Interpret a human-entered flag value
///
/// Non-strict mode treats anything outside the true-list as `false`.
///
/// # Errors
///
/// In strict mode, values in neither list are rejected.
pub fn str2bool(value: &str, strict: bool) -> Result<bool> {
    let lowered = value.trim().to_ascii_lowercase();
    let is_true = TRUE_VALUES.contains(&lowered.as_str());
    if strict && !is_true && !FALSE_VALUES.contains(&lowered.as_str()) {
        return Err(PaladinError::InvalidInput {
            reason: format!("invalid value for boolean: {:?}", value),
        }
        .into());
    }
    Ok(is_true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

/// IP version of `value`, or `None` if it is not an address
pub fn ip_version(value: &str) -> Option<IpVersion> {
    match value.trim().parse::<IpAddr>().ok()? {
        IpAddr::V4(_) => Some(IpVersion::V4),
        IpAddr::V6(_) => Some(IpVersion::V6),
    }
}
