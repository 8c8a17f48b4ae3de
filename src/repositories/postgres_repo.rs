use anyhow::anyhow;
use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::types::ToSql;
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use tracing::warn;
use crate::helpers::text::normalize_display;
use crate::models::restaurant::Restaurant;
use crate::search::gateway::GeoSearchBackend;
use crate::search::validate::SearchQuery;

pub const RETRY_LIMIT: usize = 5;

/// Optional filters for the directory listing. Absent fields apply no
/// constraint at all.
#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    pub country_codes: Option<Vec<i32>>,
    pub max_spend: Option<i64>,
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub description: Option<String>,
}

pub struct PostgresConnectionRepo {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresConnectionRepo {
    pub fn new(
        postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    ) -> Self {
        Self {
            postgres_connection
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"))
    }

    pub async fn retrieve_restaurant(
        &self,
        restaurant_id: i64,
    ) -> anyhow::Result<Option<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT * FROM restaurants WHERE restaurant_id = $1 LIMIT 1;",
                &[&restaurant_id],
            )
            .await?;

        Ok(rows.into_iter().next().map(parse_row_into_restaurant))
    }

    /// Filtered, alphabetically ordered page of the directory plus the total
    /// match count. Rows carry the count as a window aggregate; a page past
    /// the last one comes back empty and takes the window count with it, so
    /// that case re-counts without pagination to keep the metadata truthful.
    pub async fn list_restaurants(
        &self,
        filter: &ListFilter,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<(Vec<Restaurant>, i64)> {
        let conn = self.get_postgres_connection().await?;
        let (page_stmt, count_stmt, params) = list_statements(filter);

        let filter_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();
        let limit_param = i64::from(limit.max(1));
        let offset_param = i64::from(page.max(1) - 1) * limit_param;
        let mut page_refs = filter_refs.clone();
        page_refs.push(&limit_param);
        page_refs.push(&offset_param);

        let rows = conn.query(&page_stmt, &page_refs).await?;

        let total = match rows.first() {
            Some(row) => row.get::<&str, i64>("total_count"),
            None => conn
                .query_one(&count_stmt, &filter_refs)
                .await?
                .get::<&str, i64>("count"),
        };
        let restaurants = rows.into_iter().map(parse_row_into_restaurant).collect();

        Ok((restaurants, total))
    }

    /// One page of restaurants within the radius, via the
    /// `restaurants_within_radius(_lon, _lat, _radius_km, _page, _limit)`
    /// stored function. Row order is the function's own, distance ascending.
    pub async fn restaurants_within_radius(
        &self,
        query: &SearchQuery,
    ) -> anyhow::Result<Vec<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT * FROM restaurants_within_radius($1, $2, $3, $4, $5);",
                &[
                    &query.longitude,
                    &query.latitude,
                    &query.radius_km,
                    &pg_int(query.page),
                    &pg_int(query.limit),
                ],
            )
            .await?;

        Ok(rows.into_iter().map(parse_row_into_restaurant).collect())
    }

    /// Total matches within the radius, via
    /// `restaurants_within_radius_count(_lon, _lat, _radius_km)`, which
    /// returns a single `count` row. No row at all counts as zero.
    pub async fn restaurants_within_radius_count(
        &self,
        query: &SearchQuery,
    ) -> anyhow::Result<i64> {
        let conn = self.get_postgres_connection().await?;
        let rows = conn
            .query(
                "SELECT * FROM restaurants_within_radius_count($1, $2, $3);",
                &[&query.longitude, &query.latitude, &query.radius_km],
            )
            .await?;

        Ok(rows
            .first()
            .map(|row| row.get::<&str, i64>("count"))
            .unwrap_or(0))
    }

    /// Restaurants serving any of the given cuisines, matched against the
    /// comma separated `cuisines` column token by token. Cuisine names are
    /// lowercased here so the comparison happens entirely in SQL. Same
    /// empty-page re-count as the directory listing.
    pub async fn search_by_cuisines(
        &self,
        cuisines: &[String],
        page: u32,
        limit: u32,
    ) -> anyhow::Result<(Vec<Restaurant>, i64)> {
        let conn = self.get_postgres_connection().await?;
        let lowered: Vec<String> = cuisines.iter().map(|c| c.to_lowercase()).collect();
        let limit_param = i64::from(limit.max(1));
        let offset_param = i64::from(page.max(1) - 1) * limit_param;

        let rows = conn
            .query(CUISINE_PAGE_SQL, &[&lowered, &limit_param, &offset_param])
            .await?;

        let total = match rows.first() {
            Some(row) => row.get::<&str, i64>("total_count"),
            None => conn
                .query_one(CUISINE_COUNT_SQL, &[&lowered])
                .await?
                .get::<&str, i64>("count"),
        };
        let restaurants = rows.into_iter().map(parse_row_into_restaurant).collect();

        Ok((restaurants, total))
    }
}

#[async_trait]
impl GeoSearchBackend for PostgresConnectionRepo {
    async fn radius_page(&self, query: &SearchQuery) -> anyhow::Result<Vec<Restaurant>> {
        self.restaurants_within_radius(query).await
    }

    async fn radius_count(&self, query: &SearchQuery) -> anyhow::Result<i64> {
        self.restaurants_within_radius_count(query).await
    }
}

/// Builds the page and count statements for the directory listing from the
/// same WHERE clause. The count statement carries no LIMIT/OFFSET so the
/// total stays correct whatever page was asked for; the page statement binds
/// limit and offset as its two trailing parameters.
fn list_statements(
    filter: &ListFilter,
) -> (String, String, Vec<Box<dyn ToSql + Sync + Send>>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql + Sync + Send>> = Vec::new();

    if let Some(codes) = &filter.country_codes {
        params.push(Box::new(codes.clone()));
        clauses.push(format!("country_code = ANY(${})", params.len()));
    }
    if let Some(max_spend) = filter.max_spend {
        params.push(Box::new(max_spend));
        clauses.push(format!("average_cost_for_two <= ${}", params.len()));
    }
    if let Some(name) = &filter.name {
        params.push(Box::new(format!("%{}%", name)));
        clauses.push(format!("restaurant_name ILIKE ${}", params.len()));
    }
    if let Some(cuisine) = &filter.cuisine {
        params.push(Box::new(format!("%{}%", cuisine)));
        clauses.push(format!("cuisines ILIKE ${}", params.len()));
    }
    if let Some(description) = &filter.description {
        params.push(Box::new(format!("%{}%", description)));
        clauses.push(format!("description ILIKE ${}", params.len()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    let page_stmt = format!(
        "SELECT *, count(*) OVER() AS total_count FROM restaurants{} \
         ORDER BY restaurant_name ASC LIMIT ${} OFFSET ${};",
        where_sql,
        params.len() + 1,
        params.len() + 2,
    );
    let count_stmt = format!("SELECT count(*) AS count FROM restaurants{};", where_sql);

    (page_stmt, count_stmt, params)
}

const CUISINE_PAGE_SQL: &str =
    "SELECT *, count(*) OVER() AS total_count FROM restaurants \
     WHERE EXISTS ( \
         SELECT 1 FROM unnest(string_to_array(cuisines, ',')) AS c \
         WHERE lower(btrim(c)) = ANY($1) \
     ) \
     ORDER BY restaurant_name ASC LIMIT $2 OFFSET $3;";

const CUISINE_COUNT_SQL: &str =
    "SELECT count(*) AS count FROM restaurants \
     WHERE EXISTS ( \
         SELECT 1 FROM unnest(string_to_array(cuisines, ',')) AS c \
         WHERE lower(btrim(c)) = ANY($1) \
     );";

/// Stored-function page/limit parameters are int4; saturate rather than
/// letting a huge page wrap negative through the cast.
fn pg_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn parse_row_into_restaurant(
    row: Row
) -> Restaurant {
    Restaurant {
        restaurant_id: row.get("restaurant_id"),
        restaurant_name: normalize_display(row.get("restaurant_name")),
        address: normalize_display(row.get("address")),
        city: normalize_display(row.get("city")),
        locality: row
            .get::<&str, Option<String>>("locality")
            .map(|s| normalize_display(&s)),
        country_code: row.get("country_code"),
        cuisines: normalize_display(row.get("cuisines")),
        average_cost_for_two: row.get("average_cost_for_two"),
        aggregate_rating: row.get::<&str, f64>("aggregate_rating"),
        votes: row.get("votes"),
        latitude: row.get::<&str, f64>("latitude"),
        longitude: row.get::<&str, f64>("longitude"),
        description: row
            .get::<&str, Option<String>>("description")
            .map(|s| normalize_display(&s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_statement_ignores_pagination() {
        let filter = ListFilter {
            country_codes: Some(vec![1, 94]),
            name: Some("spice".to_string()),
            ..Default::default()
        };
        let (page_stmt, count_stmt, params) = list_statements(&filter);

        assert_eq!(params.len(), 2);
        assert!(page_stmt.contains("LIMIT $3 OFFSET $4"));
        assert!(!count_stmt.contains("LIMIT"));
        assert!(!count_stmt.contains("OFFSET"));

        // Same filters on both statements, so the re-count taken when a page
        // comes back empty agrees with what the page query matched.
        let where_sql = "WHERE country_code = ANY($1) AND restaurant_name ILIKE $2";
        assert!(page_stmt.contains(where_sql));
        assert!(count_stmt.contains(where_sql));
    }

    #[test]
    fn unfiltered_statements_have_no_where_clause() {
        let (page_stmt, count_stmt, params) = list_statements(&ListFilter::default());
        assert!(params.is_empty());
        assert!(!page_stmt.contains("WHERE"));
        assert_eq!(count_stmt, "SELECT count(*) AS count FROM restaurants;");
    }

    #[test]
    fn all_filters_number_their_parameters_in_order() {
        let filter = ListFilter {
            country_codes: Some(vec![1]),
            max_spend: Some(500),
            name: Some("a".to_string()),
            cuisine: Some("b".to_string()),
            description: Some("c".to_string()),
        };
        let (page_stmt, _, params) = list_statements(&filter);
        assert_eq!(params.len(), 5);
        assert!(page_stmt.contains("average_cost_for_two <= $2"));
        assert!(page_stmt.contains("description ILIKE $5"));
        assert!(page_stmt.contains("LIMIT $6 OFFSET $7"));
    }

    #[test]
    fn cuisine_count_statement_ignores_pagination() {
        assert!(CUISINE_PAGE_SQL.contains("LIMIT $2 OFFSET $3"));
        assert!(!CUISINE_COUNT_SQL.contains("LIMIT"));
        assert!(!CUISINE_COUNT_SQL.contains("OFFSET"));
        assert!(CUISINE_PAGE_SQL.contains("lower(btrim(c)) = ANY($1)"));
        assert!(CUISINE_COUNT_SQL.contains("lower(btrim(c)) = ANY($1)"));
    }

    #[test]
    fn stored_function_ints_saturate_instead_of_wrapping() {
        assert_eq!(pg_int(3), 3);
        assert_eq!(pg_int(u32::MAX), i32::MAX);
        assert_eq!(pg_int(i32::MAX as u32 + 1), i32::MAX);
    }
}
