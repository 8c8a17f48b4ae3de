use serde::{Deserialize, Serialize};
use crate::models::restaurant::Restaurant;

/// Results per page when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Envelope combining one page of rows with the total match count.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult {
    pub results: Vec<Restaurant>,
    pub total_count: i64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl PagedResult {
    /// Combines page rows with the total count reported by the backend.
    /// totalPages never drops below 1, so pagination controls keep rendering
    /// even for an empty result set.
    pub fn assemble(
        results: Vec<Restaurant>,
        total_count: i64,
        current_page: u32,
        limit: u32,
    ) -> Self {
        let total_count = total_count.max(0);
        Self {
            results,
            total_count,
            current_page,
            total_pages: total_pages_for(total_count, limit),
        }
    }

    pub fn empty(current_page: u32) -> Self {
        Self::assemble(Vec::new(), 0, current_page, DEFAULT_PAGE_SIZE)
    }
}

pub fn total_pages_for(total_count: i64, limit: u32) -> u32 {
    let limit = i64::from(limit.max(1));
    let pages = (total_count.max(0) + limit - 1) / limit;
    pages.max(1) as u32
}
