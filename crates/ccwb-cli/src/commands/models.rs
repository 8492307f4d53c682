use anyhow::Result;
use ccwb::models::{all_models, get_model, ModelEntry, BEDROCK_DOC_LINK};
use console::style;

fn print_model(model: &ModelEntry) {
    println!(
        "{} {}",
        style(model.key).cyan().bold(),
        style(model.name).dim()
    );
    for (profile, availability) in &model.profiles {
        println!(
            "  {:<8} {} ({})",
            profile.as_str(),
            availability.model_id,
            availability.description
        );
        println!(
            "  {:<8} source regions:  {}",
            "",
            availability.source_regions.join(", ")
        );
        println!(
            "  {:<8} allowed regions: {}",
            "",
            availability.allowed_regions.join(", ")
        );
    }
}

pub fn handle_models(model: Option<&str>) -> Result<()> {
    match model {
        Some(key) => print_model(get_model(key)?),
        None => {
            for (i, model) in all_models().enumerate() {
                if i > 0 {
                    println!();
                }
                print_model(model);
            }
            println!("\n  See {} for routing details", style(BEDROCK_DOC_LINK).dim());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_models_unknown_key() {
        let err = handle_models(Some("haiku-9")).unwrap_err();
        assert!(err.downcast_ref::<ccwb::models::ModelError>().is_some());
        assert!(handle_models(Some("sonnet-4")).is_ok());
        assert!(handle_models(None).is_ok());
    }
}
