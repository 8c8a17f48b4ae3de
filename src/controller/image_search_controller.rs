use std::sync::Arc;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::controller::AppState;
use crate::helpers::api_error::ApiError;
use crate::models::cuisine::match_labels;
use crate::models::page::{PagedResult, DEFAULT_PAGE_SIZE};
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::search::validate::lenient_int;

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));

    Router::new()
        .route("/", post(image_search_restaurants).fallback(method_not_allowed))
        .route_layer(Extension(postgres_repo))
}

/// Labels produced by the client-side image classifier. Only the label
/// strings travel here; the classifier itself is an opaque collaborator.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ImageSearchBody {
    pub labels: Vec<String>,
    pub page: Option<Value>,
    pub limit: Option<Value>,
}

#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchResponse {
    pub matched_cuisines: Vec<String>,
    #[serde(flatten)]
    pub paged: PagedResult,
}

/// POST /api/image-search — restaurants serving any cuisine the classifier
/// labels map to. Labels that match nothing in the vocabulary yield an empty
/// page rather than an error.
pub async fn image_search_restaurants(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Json(body): Json<ImageSearchBody>,
) -> Result<Json<ImageSearchResponse>, ApiError> {
    let page = lenient_int(body.page.as_ref(), 1);
    let limit = lenient_int(body.limit.as_ref(), DEFAULT_PAGE_SIZE);

    let matched_cuisines = match_labels(&body.labels);
    if matched_cuisines.is_empty() {
        return Ok(Json(ImageSearchResponse {
            matched_cuisines,
            paged: PagedResult::empty(page),
        }));
    }

    let (results, count) = postgres_repo
        .search_by_cuisines(&matched_cuisines, page, limit)
        .await?;

    Ok(Json(ImageSearchResponse {
        matched_cuisines,
        paged: PagedResult::assemble(results, count, page, limit),
    }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bb8_postgres::bb8::Pool;
    use bb8_postgres::tokio_postgres::NoTls;
    use bb8_postgres::PostgresConnectionManager;
    use tower::ServiceExt;

    // Pool built unchecked: nothing in these tests touches the database.
    fn test_router() -> Router {
        let manager = PostgresConnectionManager::new_from_stringlike(
            "host=localhost user=postgres",
            NoTls,
        ).unwrap();
        let pool = Pool::builder().build_unchecked(manager);
        router(AppState { postgres_connection: pool })
    }

    #[tokio::test]
    async fn wrong_verb_gets_the_405_envelope() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn unmatched_labels_yield_an_empty_page_without_queries() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"labels": ["corgi", "laptop"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["matchedCuisines"], serde_json::json!([]));
        assert_eq!(body["totalCount"], 0);
        assert_eq!(body["totalPages"], 1);
    }
}
