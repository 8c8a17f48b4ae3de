use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::helpers::api_error::ApiError;
use crate::models::page::DEFAULT_PAGE_SIZE;

/// Raw geo-search request as it arrives over the wire. Search forms post the
/// coordinate fields as strings, other clients post numbers, so every field
/// is taken as a loose JSON value and coerced here.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct GeoSearchBody {
    pub lat: Option<Value>,
    pub lon: Option<Value>,
    pub radius: Option<Value>,
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub limit: Option<Value>,
}

/// Validated, bounds-checked search parameters. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub page: u32,
    pub limit: u32,
}

impl SearchQuery {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

/// Pure function from raw inputs to a valid query or a structured error.
/// Coordinates must parse to finite numbers, the radius must be strictly
/// positive. Page and limit never fail: missing values fall back to 1 and
/// 10, malformed or non-positive values coerce to 1.
pub fn validate_search(body: &GeoSearchBody) -> Result<SearchQuery, ApiError> {
    let latitude = parse_float(body.lat.as_ref())
        .filter(|v| v.is_finite())
        .ok_or(ApiError::InvalidCoordinate)?;
    let longitude = parse_float(body.lon.as_ref())
        .filter(|v| v.is_finite())
        .ok_or(ApiError::InvalidCoordinate)?;
    let radius_km = parse_float(body.radius.as_ref())
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or(ApiError::InvalidRadius)?;

    Ok(SearchQuery {
        latitude,
        longitude,
        radius_km,
        page: lenient_int(body.page.as_ref(), 1),
        limit: lenient_int(body.limit.as_ref(), DEFAULT_PAGE_SIZE),
    })
}

fn parse_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Lenient integer coercion for page/limit style fields: absent means the
/// default, anything unparsable or below 1 means 1.
pub fn lenient_int(value: Option<&Value>, default: u32) -> u32 {
    let parsed = match value {
        None | Some(Value::Null) => return default,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v >= 1.0 => {
            if v >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                v.trunc() as u32
            }
        }
        _ => 1,
    }
}

/// Same coercion for query-string pages, which always arrive as text.
pub fn lenient_page(raw: Option<&str>) -> u32 {
    match raw {
        None => 1,
        Some(s) => lenient_int(Some(&Value::String(s.to_string())), 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(lat: Value, lon: Value, radius: Value) -> GeoSearchBody {
        GeoSearchBody {
            lat: Some(lat),
            lon: Some(lon),
            radius: Some(radius),
            page: None,
            limit: None,
        }
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let query = validate_search(&body(json!(12.9716), json!("77.5946"), json!("5"))).unwrap();
        assert_eq!(query.latitude, 12.9716);
        assert_eq!(query.longitude, 77.5946);
        assert_eq!(query.radius_km, 5.0);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let err = validate_search(&body(json!("north"), json!(77.0), json!(5))).unwrap_err();
        assert_eq!(err, ApiError::InvalidCoordinate);
    }

    #[test]
    fn rejects_missing_and_non_finite_coordinates() {
        let mut missing = body(json!(1.0), json!(2.0), json!(5));
        missing.lon = None;
        assert_eq!(validate_search(&missing).unwrap_err(), ApiError::InvalidCoordinate);

        let err = validate_search(&body(json!("NaN"), json!(77.0), json!(5))).unwrap_err();
        assert_eq!(err, ApiError::InvalidCoordinate);

        let err = validate_search(&body(json!("inf"), json!(77.0), json!(5))).unwrap_err();
        assert_eq!(err, ApiError::InvalidCoordinate);
    }

    #[test]
    fn rejects_non_positive_or_garbage_radius() {
        let err = validate_search(&body(json!(1.0), json!(2.0), json!(-1))).unwrap_err();
        assert_eq!(err, ApiError::InvalidRadius);

        let err = validate_search(&body(json!(1.0), json!(2.0), json!(0))).unwrap_err();
        assert_eq!(err, ApiError::InvalidRadius);

        let err = validate_search(&body(json!(1.0), json!(2.0), json!("wide"))).unwrap_err();
        assert_eq!(err, ApiError::InvalidRadius);
    }

    #[test]
    fn page_and_limit_are_clamped_not_rejected() {
        let mut b = body(json!(1.0), json!(2.0), json!(3.0));
        b.page = Some(json!(-4));
        b.limit = Some(json!("zero"));
        let query = validate_search(&b).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 1);

        b.page = Some(json!("3"));
        b.limit = Some(json!(25));
        let query = validate_search(&b).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 25);
        assert_eq!(query.offset(), 50);
    }

    #[test]
    fn lenient_page_parses_query_strings() {
        assert_eq!(lenient_page(None), 1);
        assert_eq!(lenient_page(Some("7")), 7);
        assert_eq!(lenient_page(Some("0")), 1);
        assert_eq!(lenient_page(Some("eleven")), 1);
    }

    #[test]
    fn with_page_never_goes_below_one() {
        let query = validate_search(&body(json!(1.0), json!(2.0), json!(3.0))).unwrap();
        assert_eq!(query.with_page(0).page, 1);
        assert_eq!(query.with_page(4).page, 4);
    }
}
