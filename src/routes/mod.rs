pub mod chart;
pub mod csv;
pub mod index;

use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::pricing::{normalize, PricePoint};
use crate::AppState;

/// Pull the inclusive date range out of the query string. Both ends default to
/// today, matching the initial page load.
pub fn resolve_range(params: &HashMap<String, String>) -> (NaiveDate, NaiveDate) {
    let today = Local::now().date_naive();
    let parse = |key: &str| {
        params
            .get(key)
            .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
    };
    (parse("start").unwrap_or(today), parse("end").unwrap_or(today))
}

/// One full fetch-then-normalize cycle. Every handler re-runs this from
/// scratch; nothing is cached between requests.
pub async fn load_table(
    state: &AppState,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PricePoint>> {
    let payload = state.client.fetch_pricing(start, end).await?;
    normalize(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_parses_both_dates() {
        let params = HashMap::from([
            ("start".to_string(), "2025-02-08".to_string()),
            ("end".to_string(), "2025-02-10".to_string()),
        ]);
        let (start, end) = resolve_range(&params);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 2, 8).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
    }

    #[test]
    fn missing_or_garbled_dates_default_to_today() {
        let today = Local::now().date_naive();

        let (start, end) = resolve_range(&HashMap::new());
        assert_eq!((start, end), (today, today));

        let params = HashMap::from([("start".to_string(), "02/08/2025".to_string())]);
        let (start, _) = resolve_range(&params);
        assert_eq!(start, today);
    }
}
