use std::sync::Arc;
use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::controller::AppState;
use crate::helpers::api_error::ApiError;
use crate::models::country::codes_matching_prefix;
use crate::models::page::{total_pages_for, DEFAULT_PAGE_SIZE};
use crate::models::restaurant::Restaurant;
use crate::repositories::postgres_repo::{ListFilter, PostgresConnectionRepo};
use crate::search::validate::lenient_page;

pub fn router(app_state: AppState) -> Router {
    let postgres_repo = Arc::new(PostgresConnectionRepo::new(
        app_state.postgres_connection
    ));

    Router::new()
        .route("/", get(list_restaurants))
        .route("/:restaurant_id", get(retrieve_restaurant))
        .route_layer(Extension(postgres_repo))
}

/// Query parameters of the directory listing. Everything is optional and
/// lenient: blank filters apply no constraint, a malformed page coerces to 1.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRestaurantsParams {
    pub country_name: Option<String>,
    pub max_spend: Option<String>,
    pub name_filter: Option<String>,
    pub cuisine_filter: Option<String>,
    pub description_filter: Option<String>,
    pub page: Option<String>,
}

#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListRestaurantsResponse {
    pub success: bool,
    pub data: Vec<Restaurant>,
    pub count: i64,
    pub current_page: u32,
    pub total_pages: u32,
}

pub async fn list_restaurants(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Query(params): Query<ListRestaurantsParams>,
) -> Result<Json<ListRestaurantsResponse>, ApiError> {
    let page = lenient_page(params.page.as_deref());
    let filter = build_filter(&params);

    let (data, count) = postgres_repo
        .list_restaurants(&filter, page, DEFAULT_PAGE_SIZE)
        .await?;

    Ok(Json(ListRestaurantsResponse {
        success: true,
        data,
        count,
        current_page: page,
        total_pages: total_pages_for(count, DEFAULT_PAGE_SIZE),
    }))
}

fn build_filter(params: &ListRestaurantsParams) -> ListFilter {
    // A country name that matches nothing in the table applies no filter,
    // matching how the directory has always behaved.
    let country_codes = params
        .country_name
        .as_deref()
        .map(codes_matching_prefix)
        .filter(|codes| !codes.is_empty());

    ListFilter {
        country_codes,
        max_spend: params
            .max_spend
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok()),
        name: non_blank(&params.name_filter),
        cuisine: non_blank(&params.cuisine_filter),
        description: non_blank(&params.description_filter),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub async fn retrieve_restaurant(
    Extension(postgres_repo): Extension<Arc<PostgresConnectionRepo>>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let restaurant = postgres_repo
        .retrieve_restaurant(restaurant_id)
        .await?;

    match restaurant {
        Some(restaurant) => Ok(Json(json!({ "data": restaurant }))),
        None => Err(ApiError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_apply_no_constraint() {
        let filter = build_filter(&ListRestaurantsParams::default());
        assert!(filter.country_codes.is_none());
        assert!(filter.max_spend.is_none());
        assert!(filter.name.is_none());
        assert!(filter.cuisine.is_none());
        assert!(filter.description.is_none());
    }

    #[test]
    fn country_prefix_resolves_to_codes() {
        let params = ListRestaurantsParams {
            country_name: Some("ind".to_string()),
            ..Default::default()
        };
        assert_eq!(build_filter(&params).country_codes, Some(vec![1, 94]));
    }

    #[test]
    fn unknown_country_applies_no_filter() {
        let params = ListRestaurantsParams {
            country_name: Some("narnia".to_string()),
            ..Default::default()
        };
        assert!(build_filter(&params).country_codes.is_none());
    }

    #[test]
    fn max_spend_parses_leniently() {
        let params = ListRestaurantsParams {
            max_spend: Some(" 500 ".to_string()),
            ..Default::default()
        };
        assert_eq!(build_filter(&params).max_spend, Some(500));

        let params = ListRestaurantsParams {
            max_spend: Some("cheap".to_string()),
            ..Default::default()
        };
        assert!(build_filter(&params).max_spend.is_none());
    }
}
