//! Problem responses (`application/problem+json`).

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use catalog_auth::AuthzError;
use catalog_brands::{BrandStoreError, CreateBrandError};
use catalog_core::{FieldViolation, ValidationErrors};

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Problem body: `{type, title, status, detail, violations?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
    #[serde(skip)]
    status_code: StatusCode,
}

impl Problem {
    /// `kind` is a short slug; it is published as `/problems/{kind}`.
    pub fn new(
        status: StatusCode,
        kind: &str,
        title: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind: format!("/problems/{kind}"),
            title,
            status: status.as_u16(),
            detail: detail.into(),
            violations: None,
            status_code: status,
        }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        let mut problem = Self::new(
            StatusCode::BAD_REQUEST,
            "validation-error",
            "Invalid brand",
            errors.to_string(),
        );
        problem.violations = Some(errors.into_iter().collect());
        problem
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad-request", "Bad request", detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not-found", "Not found", detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store-failure",
            "Brand store failure",
            detail,
        )
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        (
            self.status_code,
            [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            axum::Json(self),
        )
            .into_response()
    }
}

pub fn forbidden(err: AuthzError) -> Response {
    Problem::new(StatusCode::FORBIDDEN, "forbidden", "Forbidden", err.to_string()).into_response()
}

pub fn create_error_to_response(err: CreateBrandError) -> Response {
    match err {
        CreateBrandError::Validation(errors) => Problem::validation(errors).into_response(),
        CreateBrandError::Conflict(name) => Problem::new(
            StatusCode::CONFLICT,
            "conflict",
            "Brand already exists",
            format!("a brand named '{name}' already exists"),
        )
        .into_response(),
        CreateBrandError::Store(msg) => {
            tracing::error!(error = %msg, "create brand failed in store");
            Problem::internal("the brand could not be stored").into_response()
        }
    }
}

pub fn store_error_to_response(err: BrandStoreError) -> Response {
    tracing::error!(error = %err, "brand store failure");
    Problem::internal("the brand store is unavailable").into_response()
}
