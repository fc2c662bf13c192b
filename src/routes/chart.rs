use std::collections::HashMap;
use std::fmt::Write;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::pricing::PricePoint;
use crate::routes::{load_table, resolve_range};
use crate::AppState;

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 280.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 36.0;

/// The line chart is rendered server-side as an SVG and embedded in the page
/// with an img tag, so it re-runs the same fetch-then-normalize cycle as the
/// page itself.
pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (start, end) = resolve_range(&params);

    match load_table(&state, start, end).await {
        Ok(points) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            render_chart(&points),
        )
            .into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

/// Plot price over time. Assumes the table is sorted ascending; the x axis is
/// scaled by real elapsed time, not by row index.
pub fn render_chart(points: &[PricePoint]) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = write!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#);

    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let t0 = first.timestamp.and_utc().timestamp();
        let span = (last.timestamp.and_utc().timestamp() - t0).max(1) as f64;

        let p_min = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let p_max = points
            .iter()
            .map(|p| p.price)
            .fold(f64::NEG_INFINITY, f64::max);
        // flat series still needs a non-zero price span to scale against
        let p_span = if p_max > p_min { p_max - p_min } else { 1.0 };

        let x = |p: &PricePoint| {
            MARGIN_LEFT + (p.timestamp.and_utc().timestamp() - t0) as f64 / span * plot_w
        };
        let y = |price: f64| MARGIN_TOP + (p_max - price) / p_span * plot_h;

        let mut line = String::new();
        for p in points {
            let _ = write!(line, "{:.1},{:.1} ", x(p), y(p.price));
        }
        let _ = write!(
            svg,
            r##"<polyline points="{}" fill="none" stroke="#1f77b4" stroke-width="1.5"/>"##,
            line.trim_end()
        );

        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{:.2}</text>"#,
            MARGIN_LEFT - 6.0,
            y(p_max) + 4.0,
            p_max
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{:.2}</text>"#,
            MARGIN_LEFT - 6.0,
            y(p_min) + 4.0,
            p_min
        );
        let _ = write!(
            svg,
            r#"<text x="{MARGIN_LEFT}" y="{:.1}">{}</text>"#,
            HEIGHT - 8.0,
            first.timestamp.format("%Y-%m-%d %H:%M")
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            WIDTH - MARGIN_RIGHT,
            HEIGHT - 8.0,
            last.timestamp.format("%Y-%m-%d %H:%M")
        );
    }

    // axes drawn last so the polyline never overpaints them
    let _ = write!(
        svg,
        r##"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{:.1}" stroke="#444"/>"##,
        HEIGHT - MARGIN_BOTTOM
    );
    let _ = write!(
        svg,
        r##"<line x1="{MARGIN_LEFT}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#444"/>"##,
        HEIGHT - MARGIN_BOTTOM,
        WIDTH - MARGIN_RIGHT,
        HEIGHT - MARGIN_BOTTOM
    );
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn point(hour: u32, price: f64) -> PricePoint {
        let ts = format!("2025-02-08T{hour:02}:00:00");
        PricePoint {
            timestamp: NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S").unwrap(),
            price,
        }
    }

    #[test]
    fn chart_plots_every_point() {
        let points = vec![point(0, 0.25), point(1, 0.30), point(2, 0.20)];
        let svg = render_chart(&points);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        let line = svg.split("<polyline points=\"").nth(1).unwrap();
        let coords = line.split('"').next().unwrap();
        assert_eq!(coords.split_whitespace().count(), points.len());
    }

    #[test]
    fn chart_labels_price_extremes() {
        let points = vec![point(0, 0.10), point(1, 0.90)];
        let svg = render_chart(&points);
        assert!(svg.contains(">0.10</text>"));
        assert!(svg.contains(">0.90</text>"));
    }

    #[test]
    fn empty_table_renders_bare_axes() {
        let svg = render_chart(&[]);
        assert!(!svg.contains("polyline"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn flat_prices_do_not_divide_by_zero() {
        let points = vec![point(0, 0.25), point(1, 0.25)];
        let svg = render_chart(&points);
        assert!(!svg.contains("NaN"));
    }
}
