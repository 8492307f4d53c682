use thiserror::Error;
use tracing::debug;

use crate::config::Profile;
use crate::models::{self, CrossRegionProfile, ModelError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error(transparent)]
    Catalog(#[from] ModelError),

    #[error("{region} is not an offered source region for {model} ({profile}); choose one of: {}", .offered.join(", "))]
    SourceRegionNotOffered {
        model: String,
        profile: String,
        region: String,
        offered: Vec<String>,
    },
}

/// The routing fields the resolver reads from a profile.
pub trait RoutingSettings {
    fn selected_source_region(&self) -> Option<&str>;
    fn cross_region_profile(&self) -> Option<CrossRegionProfile>;
    fn aws_region(&self) -> &str;
}

impl RoutingSettings for Profile {
    fn selected_source_region(&self) -> Option<&str> {
        self.selected_source_region.as_deref()
    }

    fn cross_region_profile(&self) -> Option<CrossRegionProfile> {
        self.cross_region_profile
    }

    fn aws_region(&self) -> &str {
        &self.aws_region
    }
}

/// Picks the region client traffic should originate from.
///
/// An explicit source region always wins. Without one, Europe routes through
/// `eu-west-3` and every other case uses the infrastructure region.
pub fn get_source_region_for_profile<S: RoutingSettings + ?Sized>(settings: &S) -> String {
    if let Some(region) = settings.selected_source_region() {
        return region.to_string();
    }

    match settings.cross_region_profile() {
        Some(CrossRegionProfile::Europe) => CrossRegionProfile::Europe
            .default_source_region()
            .to_string(),
        _ => settings.aws_region().to_string(),
    }
}

pub fn validate_source_region(
    model_key: &str,
    profile_key: &str,
    region: &str,
) -> Result<(), RegionError> {
    let offered = models::get_source_regions_for_model_profile(model_key, profile_key)?;
    if offered.contains(&region) {
        Ok(())
    } else {
        Err(RegionError::SourceRegionNotOffered {
            model: model_key.to_string(),
            profile: profile_key.to_string(),
            region: region.to_string(),
            offered: offered.iter().map(|r| r.to_string()).collect(),
        })
    }
}

/// Records a model and routing choice on a profile after checking it against
/// the catalog. `allowed_bedrock_regions` is replaced with the regions the
/// chosen profile may serve from. The profile is left untouched on error.
pub fn apply_model_selection(
    profile: &mut Profile,
    model_key: &str,
    cross_region: CrossRegionProfile,
    source_region: Option<&str>,
) -> Result<(), RegionError> {
    let allowed = models::list_allowed_regions(model_key, cross_region.as_str())?;
    if let Some(region) = source_region {
        validate_source_region(model_key, cross_region.as_str(), region)?;
    }

    debug!(
        profile = %profile.name,
        model = model_key,
        cross_region = %cross_region,
        source_region = ?source_region,
        "applying model selection"
    );

    profile.selected_model = Some(model_key.to_string());
    profile.cross_region_profile = Some(cross_region);
    profile.selected_source_region = source_region.map(str::to_string);
    profile.allowed_bedrock_regions = allowed.iter().map(|r| r.to_string()).collect();
    profile.touch();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::test_profile;
    use test_case::test_case;

    struct Routing {
        selected: Option<&'static str>,
        cross_region: Option<CrossRegionProfile>,
        aws_region: &'static str,
    }

    impl RoutingSettings for Routing {
        fn selected_source_region(&self) -> Option<&str> {
            self.selected
        }

        fn cross_region_profile(&self) -> Option<CrossRegionProfile> {
            self.cross_region
        }

        fn aws_region(&self) -> &str {
            self.aws_region
        }
    }

    #[test_case(Some("us-west-2"), Some(CrossRegionProfile::Europe), "us-east-1", "us-west-2"; "explicit choice wins over europe")]
    #[test_case(Some("eu-central-1"), Some(CrossRegionProfile::Us), "us-east-1", "eu-central-1"; "explicit choice wins over us")]
    #[test_case(None, Some(CrossRegionProfile::Europe), "us-east-1", "eu-west-3"; "europe default")]
    #[test_case(None, Some(CrossRegionProfile::Us), "us-west-2", "us-west-2"; "us falls back to infra region")]
    #[test_case(None, Some(CrossRegionProfile::Apac), "us-east-1", "us-east-1"; "apac falls back to infra region")]
    #[test_case(None, None, "us-east-1", "us-east-1"; "unset falls back to infra region")]
    fn test_source_region_precedence(
        selected: Option<&'static str>,
        cross_region: Option<CrossRegionProfile>,
        aws_region: &'static str,
        expected: &str,
    ) {
        let routing = Routing {
            selected,
            cross_region,
            aws_region,
        };
        assert_eq!(get_source_region_for_profile(&routing), expected);
    }

    #[test]
    fn test_profile_implements_routing() {
        let mut profile = test_profile("prod");
        profile.aws_region = "us-east-1".to_string();
        profile.cross_region_profile = Some(CrossRegionProfile::Europe);
        assert_eq!(get_source_region_for_profile(&profile), "eu-west-3");

        profile.selected_source_region = Some("eu-west-1".to_string());
        assert_eq!(get_source_region_for_profile(&profile), "eu-west-1");
    }

    #[test]
    fn test_validate_source_region() {
        assert!(validate_source_region("sonnet-4", "europe", "eu-west-1").is_ok());

        let err = validate_source_region("sonnet-4", "europe", "eu-south-1").unwrap_err();
        assert!(matches!(err, RegionError::SourceRegionNotOffered { .. }));
        assert!(err.to_string().contains("eu-west-3"));

        assert_eq!(
            validate_source_region("opus-4-1", "apac", "ap-south-1"),
            Err(RegionError::Catalog(ModelError::ProfileNotSupported {
                model: "opus-4-1".to_string(),
                profile: "apac".to_string(),
            }))
        );
    }

    #[test]
    fn test_apply_model_selection_updates_routing() {
        let mut profile = test_profile("prod");
        apply_model_selection(
            &mut profile,
            "sonnet-4",
            CrossRegionProfile::Apac,
            Some("ap-southeast-2"),
        )
        .unwrap();

        assert_eq!(profile.selected_model.as_deref(), Some("sonnet-4"));
        assert_eq!(profile.cross_region_profile, Some(CrossRegionProfile::Apac));
        assert_eq!(
            profile.selected_source_region.as_deref(),
            Some("ap-southeast-2")
        );
        assert_eq!(
            profile.allowed_bedrock_regions,
            models::list_allowed_regions("sonnet-4", "apac").unwrap()
        );
    }

    #[test]
    fn test_apply_model_selection_rejects_without_mutating() {
        let mut profile = test_profile("prod");
        let before = profile.clone();

        let err = apply_model_selection(
            &mut profile,
            "opus-4-1",
            CrossRegionProfile::Europe,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RegionError::Catalog(_)));

        let err = apply_model_selection(
            &mut profile,
            "sonnet-4",
            CrossRegionProfile::Us,
            Some("us-west-1"),
        )
        .unwrap_err();
        assert!(matches!(err, RegionError::SourceRegionNotOffered { .. }));

        assert_eq!(profile, before);
    }
}
