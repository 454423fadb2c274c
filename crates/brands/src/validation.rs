//! Create-input validation.
//!
//! Every field is checked and every violation reported; nothing is
//! constructed unless the whole input is valid.

use catalog_core::{FieldRules, ValidationErrors};

use crate::brand::{BrandDetails, BrandName, DESCRIPTION_MAX_CHARS, WebLink};
use crate::create_brand::CreateBrandInput;

pub fn validate_create(input: &CreateBrandInput) -> Result<BrandDetails, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = collect(&mut errors, BrandName::parse(input.name.as_str()));
    let description = collect(&mut errors, check_description(input.description.as_deref()));
    let website = collect(&mut errors, check_link("website", input.website.as_deref()));
    let logo_url = collect(&mut errors, check_link("logoUrl", input.logo_url.as_deref()));

    match (name, description, website, logo_url) {
        (Some(name), Some(description), Some(website), Some(logo_url)) if errors.is_empty() => {
            Ok(BrandDetails {
                name,
                description,
                website,
                logo_url,
            })
        }
        _ => Err(errors),
    }
}

fn check_description(value: Option<&str>) -> Result<Option<String>, ValidationErrors> {
    let Some(value) = value else {
        return Ok(None);
    };
    let mut rules = FieldRules::new();
    rules.max_chars("description", value, DESCRIPTION_MAX_CHARS);
    rules.finish()?;
    Ok(Some(value.to_string()))
}

fn check_link(field: &str, value: Option<&str>) -> Result<Option<WebLink>, ValidationErrors> {
    value.map(|v| WebLink::parse(field, v)).transpose()
}

fn collect<T>(errors: &mut ValidationErrors, result: Result<T, ValidationErrors>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.merge(e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> CreateBrandInput {
        CreateBrandInput {
            name: name.to_string(),
            ..CreateBrandInput::default()
        }
    }

    #[test]
    fn minimal_input_is_valid() {
        let details = validate_create(&input("SportMaster")).unwrap();
        assert_eq!(details.name.as_str(), "SportMaster");
        assert_eq!(details.description, None);
        assert_eq!(details.website, None);
        assert_eq!(details.logo_url, None);
    }

    #[test]
    fn empty_name_cites_name_field() {
        let errors = validate_create(&input("")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].field, "name");
    }

    #[test]
    fn every_bad_field_is_reported() {
        let errors = validate_create(&CreateBrandInput {
            name: " ".to_string(),
            description: Some("d".repeat(DESCRIPTION_MAX_CHARS + 1)),
            website: Some("https://exa mple.com".to_string()),
            logo_url: Some("%zz".to_string()),
        })
        .unwrap_err();

        for field in ["name", "description", "website", "logoUrl"] {
            assert!(errors.has_field(field), "missing violation for {field}");
        }
    }

    #[test]
    fn description_at_limit_is_accepted() {
        let details = validate_create(&CreateBrandInput {
            description: Some("d".repeat(DESCRIPTION_MAX_CHARS)),
            ..input("SportMaster")
        })
        .unwrap();
        assert_eq!(details.description.unwrap().chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn relative_logo_reference_is_accepted() {
        let details = validate_create(&CreateBrandInput {
            logo_url: Some("sportmaster-logo.png".to_string()),
            ..input("SportMaster")
        })
        .unwrap();
        assert_eq!(details.logo_url.unwrap().as_str(), "sportmaster-logo.png");
    }

    #[test]
    fn blank_link_is_rejected() {
        let errors = validate_create(&CreateBrandInput {
            website: Some(String::new()),
            ..input("SportMaster")
        })
        .unwrap_err();
        assert!(errors.has_field("website"));
    }
}
