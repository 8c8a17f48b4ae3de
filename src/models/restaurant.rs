use serde::{Deserialize, Serialize};

/// One row of the restaurants table. The backing dataset carries mixed text
/// encodings, so text fields are normalized on ingress rather than trusted
/// at use sites.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub address: String,
    pub city: String,
    pub locality: Option<String>,
    pub country_code: i32,
    /// Comma separated list, e.g. "North Indian, Chinese".
    pub cuisines: String,
    pub average_cost_for_two: i64,
    pub aggregate_rating: f64,
    pub votes: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
}
