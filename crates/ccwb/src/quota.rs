use thiserror::Error;

use crate::config::Profile;
use crate::deploy::StackParameter;

pub const DEFAULT_MONTHLY_TOKEN_LIMIT: u64 = 225_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotaError {
    #[error("Monthly token limit {0} is too small: warning thresholds must sit strictly below each other and the limit")]
    InvalidLimit(u64),

    #[error("Quota monitoring is not enabled for profile {0}")]
    Disabled(String),
}

/// 80% and 90% warning marks of a monthly budget, truncated toward zero.
pub fn warning_thresholds(limit: u64) -> (u64, u64) {
    (percent_of(limit, 80), percent_of(limit, 90))
}

fn percent_of(limit: u64, percent: u64) -> u64 {
    // Widened so limits near u64::MAX cannot overflow.
    (u128::from(limit) * u128::from(percent) / 100) as u64
}

/// Accepts a limit only if its derived thresholds are strictly ordered:
/// 80% mark < 90% mark < limit.
pub fn validate_limit(limit: u64) -> Result<(), QuotaError> {
    let (threshold_80, threshold_90) = warning_thresholds(limit);
    if threshold_80 < threshold_90 && threshold_90 < limit {
        Ok(())
    } else {
        Err(QuotaError::InvalidLimit(limit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSettings {
    pub enabled: bool,
    pub monthly_token_limit: u64,
    pub warning_threshold_80: u64,
    pub warning_threshold_90: u64,
}

impl QuotaSettings {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            enabled: profile.quota_monitoring_enabled,
            monthly_token_limit: profile.monthly_token_limit(),
            warning_threshold_80: profile.warning_threshold_80(),
            warning_threshold_90: profile.warning_threshold_90(),
        }
    }

    pub fn stack_parameters(&self) -> Vec<StackParameter> {
        vec![
            StackParameter::new("MonthlyTokenLimit", self.monthly_token_limit),
            StackParameter::new("WarningThreshold80", self.warning_threshold_80),
            StackParameter::new("WarningThreshold90", self.warning_threshold_90),
        ]
    }
}
