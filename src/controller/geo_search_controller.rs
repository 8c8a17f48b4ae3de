use std::sync::Arc;
use axum::routing::post;
use axum::{Extension, Json, Router};
use crate::controller::AppState;
use crate::helpers::api_error::ApiError;
use crate::models::page::PagedResult;
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::search::gateway::geo_search;
use crate::search::validate::{validate_search, GeoSearchBody};

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));

    Router::new()
        .route("/", post(geo_search_restaurants).fallback(method_not_allowed))
        .route_layer(Extension(postgres_repo))
}

/// POST /api/geo-search — restaurants within a radius of a coordinate.
/// Validation happens before any query goes out; the page and count calls
/// then run concurrently against the stored functions.
pub async fn geo_search_restaurants(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<GeoSearchBody>,
) -> Result<Json<PagedResult>, ApiError> {
    let query = validate_search(&body)?;
    let paged = geo_search(postgres_repo.as_ref(), &query).await?;
    Ok(Json(paged))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
