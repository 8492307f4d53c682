use chrono::Utc;
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::CrossRegionProfile;
use crate::quota::{warning_thresholds, DEFAULT_MONTHLY_TOKEN_LIMIT};

const CROSS_REGION_PROFILE_KEY: &str = "cross_region_profile";
const ALLOWED_REGIONS_KEY: &str = "allowed_bedrock_regions";
const MONTHLY_LIMIT_KEY: &str = "monthly_token_limit";
const THRESHOLD_80_KEY: &str = "warning_threshold_80";
const THRESHOLD_90_KEY: &str = "warning_threshold_90";
const CREATED_AT_KEY: &str = "created_at";
const UPDATED_AT_KEY: &str = "updated_at";

/// Brings a stored profile record up to the current shape. Returns whether
/// anything besides null stripping changed.
pub fn run_migrations(record: &mut Map<String, Value>) -> bool {
    strip_nulls(record);

    let mut changed = false;
    changed |= drop_unknown_cross_region_profile(record);
    changed |= migrate_cross_region_profile(record);
    changed |= migrate_quota_thresholds(record);
    changed |= migrate_timestamps(record);
    changed
}

// Null and absent mean the same thing for every field.
fn strip_nulls(record: &mut Map<String, Value>) {
    record.retain(|_, value| !value.is_null());
}

// Values written by newer releases are read as unset.
fn drop_unknown_cross_region_profile(record: &mut Map<String, Value>) -> bool {
    let Some(value) = record.get(CROSS_REGION_PROFILE_KEY) else {
        return false;
    };

    let known = value
        .as_str()
        .is_some_and(|s| s.parse::<CrossRegionProfile>().is_ok());
    if known {
        return false;
    }

    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>");
    warn!(profile = name, found = %value, "ignoring unrecognized cross_region_profile");
    record.remove(CROSS_REGION_PROFILE_KEY);
    true
}

fn migrate_cross_region_profile(record: &mut Map<String, Value>) -> bool {
    if record.contains_key(CROSS_REGION_PROFILE_KEY) {
        return false;
    }

    let Some(Value::Array(regions)) = record.get(ALLOWED_REGIONS_KEY) else {
        return false;
    };

    let prefix = CrossRegionProfile::Us.region_prefix();
    let all_us = !regions.is_empty()
        && regions
            .iter()
            .all(|region| region.as_str().is_some_and(|r| r.starts_with(prefix)));

    if all_us {
        record.insert(
            CROSS_REGION_PROFILE_KEY.to_string(),
            Value::String(CrossRegionProfile::Us.as_str().to_string()),
        );
    }
    all_us
}

fn migrate_quota_thresholds(record: &mut Map<String, Value>) -> bool {
    let limit = record
        .get(MONTHLY_LIMIT_KEY)
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_MONTHLY_TOKEN_LIMIT);
    let (threshold_80, threshold_90) = warning_thresholds(limit);

    let mut changed = false;
    for (key, threshold) in [
        (THRESHOLD_80_KEY, threshold_80),
        (THRESHOLD_90_KEY, threshold_90),
    ] {
        if !record.contains_key(key) {
            record.insert(key.to_string(), Value::from(threshold));
            changed = true;
        }
    }
    changed
}

fn migrate_timestamps(record: &mut Map<String, Value>) -> bool {
    let mut changed = false;

    if !record.contains_key(CREATED_AT_KEY) {
        record.insert(
            CREATED_AT_KEY.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        changed = true;
    }

    if !record.contains_key(UPDATED_AT_KEY) {
        let created_at = record[CREATED_AT_KEY].clone();
        record.insert(UPDATED_AT_KEY.to_string(), created_at);
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_migrate_us_regions_sets_profile() {
        let mut config = record(json!({
            "allowed_bedrock_regions": ["us-east-1", "us-east-2", "us-west-2"],
            "cross_region_profile": null,
        }));

        assert!(run_migrations(&mut config));
        assert_eq!(config[CROSS_REGION_PROFILE_KEY], json!("us"));
    }

    #[test]
    fn test_unknown_cross_region_profile_is_read_as_unset() {
        let mut config = record(json!({
            "allowed_bedrock_regions": ["us-east-1", "eu-west-1"],
            "cross_region_profile": "global",
        }));

        assert!(run_migrations(&mut config));
        assert!(!config.contains_key(CROSS_REGION_PROFILE_KEY));
    }

    #[test]
    fn test_known_cross_region_profile_is_kept() {
        let mut config = record(json!({ "cross_region_profile": "europe" }));
        run_migrations(&mut config);
        assert_eq!(config[CROSS_REGION_PROFILE_KEY], json!("europe"));
    }

    #[test]
    fn test_migrate_ignores_non_string_regions() {
        let mut config = record(json!({ "allowed_bedrock_regions": ["us-east-1", 7] }));
        run_migrations(&mut config);
        assert!(!config.contains_key(CROSS_REGION_PROFILE_KEY));
    }

    #[test]
    fn test_migrate_keeps_existing_thresholds() {
        let mut config = record(json!({
            "monthly_token_limit": 100,
            "warning_threshold_80": 1,
            "warning_threshold_90": 2,
        }));
        run_migrations(&mut config);
        assert_eq!(config[THRESHOLD_80_KEY], json!(1));
        assert_eq!(config[THRESHOLD_90_KEY], json!(2));
    }

    #[test]
    fn test_migrate_backfills_updated_at_from_created_at() {
        let mut config = record(json!({ "created_at": "2025-01-01T00:00:00Z" }));
        run_migrations(&mut config);
        assert_eq!(config[UPDATED_AT_KEY], json!("2025-01-01T00:00:00Z"));
    }

    #[test]
    fn test_migrations_idempotent() {
        let mut config = record(json!({
            "allowed_bedrock_regions": ["us-west-2"],
        }));
        assert!(run_migrations(&mut config));

        let changed = run_migrations(&mut config);
        assert!(!changed);
    }
}
