use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::pricing::query_date;
use crate::routes::{load_table, resolve_range};
use crate::stats;
use crate::AppState;

pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (start, end) = resolve_range(&params);

    let points = match load_table(&state, start, end).await {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::BAD_GATEWAY, format!("An error occurred: {e}")).into_response();
        }
    };

    let body = match stats::to_csv(&points) {
        Ok(csv) => csv,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let filename = format!(
        "energy_pricing_{}_to_{}.csv",
        query_date(start),
        query_date(end)
    );

    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
