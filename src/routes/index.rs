use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Query, State},
    response::Html,
};
use hypertext::prelude::*;

use crate::routes::{load_table, resolve_range};
use crate::stats::{self, HIGHLIGHT_COUNT};
use crate::AppState;

pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let (start, end) = resolve_range(&params);

    let points = match load_table(&state, start, end).await {
        Ok(p) => p,
        Err(e) => {
            return Html(error_page(&format!("An error occurred: {e}")));
        }
    };

    let summary = stats::summarize(&points);
    let metric = |v: Option<f64>| {
        v.map(|p| format!("${:.2}/kWh", p))
            .unwrap_or_else(|| "-".into())
    };
    let avg_s = metric(summary.map(|s| s.mean));
    let max_s = metric(summary.map(|s| s.max));
    let min_s = metric(summary.map(|s| s.min));
    let lowest: HashSet<usize> = stats::lowest_indices(&points, HIGHLIGHT_COUNT)
        .into_iter()
        .collect();
    let highest: HashSet<usize> = stats::highest_indices(&points, HIGHLIGHT_COUNT)
        .into_iter()
        .collect();

    let circuit_id = state.config.circuit_id.clone();
    let range_query = format!(
        "start={}&end={}",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    );
    let chart_href = format!("/chart.svg?{range_query}");
    let csv_href = format!("/download.csv?{range_query}");

    Html(rsx! {
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <meta name="viewport" content="width=device-width, initial-scale=1.0">
            <title>"Energy Pricing Dashboard"</title>
            <link rel="stylesheet" href="/assets/styles.css">
        </head>
        <body>
            <h1>"⚡ Energy Pricing Dashboard"</h1>

            <div class="info-box">
                <p>"📍 " <strong>"Location:"</strong> " San Francisco"</p>
                <p>"🔌 " <strong>"Circuit ID:"</strong> " " (circuit_id)</p>
            </div>

            <form method="GET" action="/" class="range-form">
                <label>
                    "Start Date"
                    <input type="date" name="start" value=(start.format("%Y-%m-%d").to_string())>
                </label>
                <label>
                    "End Date"
                    <input type="date" name="end" value=(end.format("%Y-%m-%d").to_string())>
                </label>
                <button type="submit">"Refresh Data"</button>
            </form>

            <h2>"Summary Statistics"</h2>
            <div class="metrics">
                <div class="metric">
                    <span class="metric-label">"Average Price"</span>
                    <span class="metric-value">(avg_s)</span>
                </div>
                <div class="metric">
                    <span class="metric-label">"Max Price"</span>
                    <span class="metric-value">(max_s)</span>
                </div>
                <div class="metric">
                    <span class="metric-label">"Min Price"</span>
                    <span class="metric-value">(min_s)</span>
                </div>
            </div>

            <h2>"Price Trends"</h2>
            <img class="chart" src=(chart_href) alt="Energy pricing over time">

            <h2>"Raw Data"</h2>
            <table>
                <thead>
                    <tr>
                        <th>"Date & Time"</th>
                        <th>"Price ($/kWh)"</th>
                    </tr>
                </thead>
                <tbody>
                    @for (i, p) in points.iter().enumerate() {
                        @let price_class = if lowest.contains(&i) {
                            "price-low"
                        } else if highest.contains(&i) {
                            "price-high"
                        } else {
                            ""
                        };
                        <tr>
                            <td>(p.timestamp.format("%Y-%m-%d %H:%M").to_string())</td>
                            <td class=(price_class)>(p.price.to_string())</td>
                        </tr>
                    }
                </tbody>
            </table>

            <p>
                <a href=(csv_href) class="download">"Download Data as CSV"</a>
            </p>

            <hr>
            <p class="footer">"Data provided by GridX Energy Pricing API"</p>
        </body>
        </html>
    }
    .render()
    .into_inner())
}

fn error_page(msg: &str) -> String {
    rsx! {
        <!DOCTYPE html>
        <html>
            <head>
                <meta charset="UTF-8">
                <title>"Energy Pricing Dashboard"</title>
                <link rel="stylesheet" href="/assets/styles.css">
            </head>
            <body>
                <h1>"⚡ Energy Pricing Dashboard"</h1>
                <div class="error-box">
                    <p>(msg)</p>
                </div>
                <a href="/">"Retry"</a>
            </body>
        </html>
    }
    .render()
    .into_inner()
}
