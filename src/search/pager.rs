use crate::helpers::api_error::ApiError;
use crate::models::page::PagedResult;
use crate::models::restaurant::Restaurant;
use crate::search::gateway::{geo_search, GeoSearchBackend};
use crate::search::validate::{validate_search, GeoSearchBody, SearchQuery};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerPhase {
    Idle,
    Searching,
}

/// Discrete actions driving the pager, independent of any rendering layer.
#[derive(Clone, Debug)]
pub enum PagerAction {
    /// Fresh search from the raw form inputs, always landing on page 1.
    Search(GeoSearchBody),
    /// Move to another page of the current search.
    PageChange(u32),
}

/// Pagination controller for one search panel: Idle -> Searching ->
/// (Success | Failed) -> Idle. One request in flight at a time; actions
/// arriving mid-flight are dropped, not queued, and nothing cancels a
/// request once issued.
pub struct SearchPager<B> {
    backend: B,
    phase: PagerPhase,
    last_query: Option<SearchQuery>,
    pub results: Vec<Restaurant>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: i64,
    pub error: Option<String>,
}

impl<B: GeoSearchBackend> SearchPager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            phase: PagerPhase::Idle,
            last_query: None,
            results: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            error: None,
        }
    }

    pub fn phase(&self) -> PagerPhase {
        self.phase
    }

    /// Moves to Searching and hands back the query to run, or None when the
    /// action was dropped. Validation failures record the error message and
    /// stay Idle without issuing any remote call; page changes before a
    /// first search have nothing to repeat and are dropped too.
    pub fn begin(&mut self, action: PagerAction) -> Option<SearchQuery> {
        if self.phase == PagerPhase::Searching {
            return None;
        }

        let query = match action {
            PagerAction::Search(body) => match validate_search(&body) {
                Ok(query) => query.with_page(1),
                Err(e) => {
                    self.results.clear();
                    self.error = Some(e.to_string());
                    return None;
                }
            },
            PagerAction::PageChange(page) => match self.last_query {
                Some(query) => query.with_page(page),
                None => return None,
            },
        };

        self.phase = PagerPhase::Searching;
        self.error = None;
        self.results.clear();
        self.last_query = Some(query);
        Some(query)
    }

    /// Applies the outcome of the in-flight search and returns to Idle.
    pub fn finish(&mut self, outcome: Result<PagedResult, ApiError>) {
        match outcome {
            Ok(paged) => {
                self.results = paged.results;
                self.current_page = paged.current_page;
                self.total_pages = paged.total_pages;
                self.total_count = paged.total_count;
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.to_string());
            }
        }
        self.phase = PagerPhase::Idle;
    }

    /// Drives one action end to end. Returns false when the action was
    /// dropped or failed validation, meaning no remote call went out.
    pub async fn dispatch(&mut self, action: PagerAction) -> bool {
        let Some(query) = self.begin(action) else {
            return false;
        };
        let outcome = geo_search(&self.backend, &query).await;
        self.finish(outcome);
        true
    }
}
