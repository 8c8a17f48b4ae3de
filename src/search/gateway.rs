use async_trait::async_trait;
use crate::helpers::api_error::ApiError;
use crate::models::page::PagedResult;
use crate::models::restaurant::Restaurant;
use crate::search::validate::SearchQuery;

/// Seam over the geospatial search capability. The page and count operations
/// are independently consistent at call time; nothing pins a snapshot across
/// the two, so a row can appear or vanish between them. Ordering within a
/// page is whatever the backing search yields (the reference stored
/// procedure orders by distance, nearest first).
#[async_trait]
pub trait GeoSearchBackend: Send + Sync {
    /// Up to `limit` records within `radius_km` of the coordinate, offset by
    /// `(page - 1) * limit`.
    async fn radius_page(&self, query: &SearchQuery) -> anyhow::Result<Vec<Restaurant>>;

    /// Total number of records within the same radius, ignoring pagination.
    async fn radius_count(&self, query: &SearchQuery) -> anyhow::Result<i64>;
}

/// Runs the page and count queries concurrently with identical filter
/// parameters and assembles the envelope once both have resolved. First
/// failure wins: either call failing fails the whole search, no partial
/// result, no retry.
pub async fn geo_search<B>(backend: &B, query: &SearchQuery) -> Result<PagedResult, ApiError>
where
    B: GeoSearchBackend + ?Sized,
{
    let (results, total_count) = futures::try_join!(
        backend.radius_page(query),
        backend.radius_count(query),
    )
    .map_err(|e| ApiError::Backend(e.to_string()))?;

    Ok(PagedResult::assemble(results, total_count, query.page, query.limit))
}
