use serde_json::{json, Map, Value};

use crate::config::Profile;
use crate::models::{self, CrossRegionProfile};
use crate::region::{get_source_region_for_profile, RegionError};

/// The document the installed credential process reads, keyed by profile name.
pub fn client_config(profile: &Profile) -> Value {
    let mut entry = Map::new();
    entry.insert("provider_domain".into(), json!(profile.provider_domain));
    entry.insert("client_id".into(), json!(profile.client_id));
    entry.insert("aws_region".into(), json!(profile.aws_region));
    entry.insert("identity_pool_name".into(), json!(profile.identity_pool_name));
    entry.insert("credential_storage".into(), json!(profile.credential_storage));
    entry.insert("provider_type".into(), json!(profile.provider_type));
    entry.insert("federation_type".into(), json!(profile.federation_type));
    entry.insert(
        "max_session_duration".into(),
        json!(profile.max_session_duration),
    );
    entry.insert(
        "cross_region_profile".into(),
        json!(profile.cross_region_profile),
    );
    entry.insert(
        "selected_source_region".into(),
        json!(profile.selected_source_region),
    );
    entry.insert(
        "source_region".into(),
        json!(get_source_region_for_profile(profile)),
    );
    entry.insert("selected_model".into(), json!(profile.selected_model));

    if let Some(pool_id) = &profile.cognito_user_pool_id {
        entry.insert("cognito_user_pool_id".into(), json!(pool_id));
    }
    if let Some(role_arn) = &profile.federated_role_arn {
        entry.insert("federated_role_arn".into(), json!(role_arn));
    }

    let mut config = Map::new();
    config.insert(profile.name.clone(), Value::Object(entry));
    Value::Object(config)
}

/// The `settings.json` Claude Code is installed with.
pub fn claude_settings(profile: &Profile) -> Result<Value, RegionError> {
    let mut env = Map::new();
    env.insert("CLAUDE_CODE_USE_BEDROCK".into(), json!("1"));
    env.insert(
        "AWS_REGION".into(),
        json!(get_source_region_for_profile(profile)),
    );
    env.insert("AWS_PROFILE".into(), json!(profile.name));

    if let Some(model) = &profile.selected_model {
        let cross_region = profile
            .cross_region_profile
            .unwrap_or(CrossRegionProfile::Us);
        let model_id = models::get_model_id_for_profile(model, cross_region.as_str())?;
        env.insert("ANTHROPIC_MODEL".into(), json!(model_id));
    }

    Ok(json!({ "env": env }))
}
