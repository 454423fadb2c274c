use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_brands::{CreateBrandInput, CreateBrandOutput};

// -------------------------
// Request DTOs
// -------------------------

/// `POST /api/v1/brands` body. A missing or null `name` is treated as blank.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl From<CreateBrandRequest> for CreateBrandInput {
    fn from(body: CreateBrandRequest) -> Self {
        Self {
            name: body.name.unwrap_or_default(),
            description: body.description,
            website: body.website,
            logo_url: body.logo_url,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CreateBrandOutput> for BrandResponse {
    fn from(out: CreateBrandOutput) -> Self {
        Self {
            id: out.id.to_string(),
            name: out.name,
            description: out.description,
            website: out.website,
            logo_url: out.logo_url,
            created_at: out.created_at,
            updated_at: out.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_and_tolerates_missing_name() {
        let body: CreateBrandRequest =
            serde_json::from_str(r#"{"logoUrl":"sportmaster-logo.png"}"#).unwrap();
        let input = CreateBrandInput::from(body);

        assert_eq!(input.name, "");
        assert_eq!(input.logo_url.as_deref(), Some("sportmaster-logo.png"));
    }

    #[test]
    fn null_name_is_blank() {
        let body: CreateBrandRequest = serde_json::from_str(r#"{"name":null}"#).unwrap();
        assert_eq!(CreateBrandInput::from(body).name, "");
    }

    #[test]
    fn response_serializes_camel_case() {
        let now = Utc::now();
        let response = BrandResponse {
            id: "0190a5c0-0000-7000-8000-000000000000".to_string(),
            name: "SportMaster".to_string(),
            description: None,
            website: None,
            logo_url: Some("sportmaster-logo.png".to_string()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["logoUrl"], "sportmaster-logo.png");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json["description"].is_null());
    }
}
