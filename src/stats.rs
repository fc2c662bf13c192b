use anyhow::Result;

use crate::pricing::PricePoint;

/// How many rows get highlighted at each end of the price range.
pub const HIGHLIGHT_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

pub fn summarize(points: &[PricePoint]) -> Option<Summary> {
    if points.is_empty() {
        return None;
    }

    let sum: f64 = points.iter().map(|p| p.price).sum();
    let max = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
    let min = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);

    Some(Summary {
        mean: sum / points.len() as f64,
        max,
        min,
    })
}

/// Indices of the `n` cheapest rows, earliest-first on price ties.
pub fn lowest_indices(points: &[PricePoint], n: usize) -> Vec<usize> {
    ranked_indices(points, n, false)
}

/// Indices of the `n` most expensive rows, earliest-first on price ties.
pub fn highest_indices(points: &[PricePoint], n: usize) -> Vec<usize> {
    ranked_indices(points, n, true)
}

fn ranked_indices(points: &[PricePoint], n: usize, descending: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..points.len()).collect();
    indices.sort_by(|&a, &b| {
        let ord = points[a]
            .price
            .partial_cmp(&points[b].price)
            .unwrap_or(std::cmp::Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    indices.truncate(n);
    indices
}

/// Serialize the table as `datetime,price` CSV, rows in table order.
pub fn to_csv(points: &[PricePoint]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["datetime", "price"])?;
    for point in points {
        writer.write_record([
            point.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            point.price.to_string(),
        ])?;
    }
    let buf = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv writer: {e}"))?;
    Ok(String::from_utf8(buf)?)
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
    fn summarize_known_table() {
        let points = vec![point(0, 0.10), point(1, 0.30), point(2, 0.20)];
        let s = summarize(&points).unwrap();
        assert!((s.mean - 0.20).abs() < 1e-9);
        assert_eq!(s.max, 0.30);
        assert_eq!(s.min, 0.10);
    }

    #[test]
    fn summarize_empty_is_none() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn ranked_index_selection() {
        let points = vec![
            point(0, 0.50),
            point(1, 0.10),
            point(2, 0.40),
            point(3, 0.20),
            point(4, 0.30),
            point(5, 0.60),
        ];

        assert_eq!(lowest_indices(&points, 4), vec![1, 3, 4, 2]);
        assert_eq!(highest_indices(&points, 4), vec![5, 0, 2, 4]);
    }

    #[test]
    fn ties_keep_earliest_row_first() {
        let points = vec![point(0, 0.20), point(1, 0.20), point(2, 0.20)];
        assert_eq!(lowest_indices(&points, 2), vec![0, 1]);
    }

    #[test]
    fn short_tables_highlight_everything() {
        let points = vec![point(0, 0.10), point(1, 0.20)];
        assert_eq!(lowest_indices(&points, 4).len(), 2);
        assert_eq!(highest_indices(&points, 4).len(), 2);
    }

    #[test]
    fn csv_layout() {
        let points = vec![point(0, 0.25), point(1, 0.3)];
        let csv = to_csv(&points).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "datetime,price",
                "2025-02-08T00:00:00,0.25",
                "2025-02-08T01:00:00,0.3",
            ]
        );
    }
}
