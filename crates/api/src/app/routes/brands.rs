use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use catalog_auth::Permission;
use catalog_brands::{BrandId, BrandStore, CreateBrandOutput};

use crate::app::dto::{BrandResponse, CreateBrandRequest};
use crate::app::errors::{self, Problem};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// Canonical location prefix of brand resources.
pub const BRANDS_PATH: &str = "/api/v1/brands";

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_brand))
        .route("/:id", get(get_brand))
}

pub async fn create_brand(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<CreateBrandRequest>, JsonRejection>,
) -> Response {
    if let Err(e) = authz::require(&principal, Permission::BRANDS_CREATE) {
        return errors::forbidden(e);
    }

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return Problem::bad_request(rejection.body_text()).into_response(),
    };

    let created = match services.create_brand().execute(body.into()).await {
        Ok(created) => created,
        Err(e) => return errors::create_error_to_response(e),
    };

    let location = format!("{}/{}", BRANDS_PATH, created.id);
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BrandResponse::from(created)),
    )
        .into_response()
}

pub async fn get_brand(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = authz::require(&principal, Permission::BRANDS_READ) {
        return errors::forbidden(e);
    }

    let id: BrandId = match id.parse() {
        Ok(v) => v,
        Err(_) => return Problem::bad_request("invalid brand id").into_response(),
    };

    let brand = match services.store().find_by_id(id).await {
        Ok(Some(brand)) => brand,
        Ok(None) => return Problem::not_found(format!("no brand with id {id}")).into_response(),
        Err(e) => return errors::store_error_to_response(e),
    };

    match CreateBrandOutput::try_from(&brand) {
        Ok(out) => Json(BrandResponse::from(out)).into_response(),
        Err(e) => errors::create_error_to_response(e),
    }
}
