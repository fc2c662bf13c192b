use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{PricingError, Result};

/// One interval of the day-ahead pricing schedule. The timestamp is the local
/// wall-clock start of the interval; the offset from the feed is dropped after
/// parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

#[derive(Clone)]
pub struct PricingClient {
    config: Config,
    client: reqwest::Client,
}

impl PricingClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(Self { config, client })
    }

    /// One GET against the pricing endpoint for an inclusive date range.
    /// Returns the decoded JSON body; any transport failure, non-2xx status or
    /// undecodable body surfaces as a fetch error. No retries.
    pub async fn fetch_pricing(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        let startdate = query_date(start);
        let enddate = query_date(end);
        debug!(
            "pricing request: {} {startdate}..{enddate}",
            self.config.api_base_url
        );

        let resp = self
            .client
            .get(&self.config.api_base_url)
            .query(&[
                ("utility", self.config.utility.as_str()),
                ("market", self.config.market.as_str()),
                ("startdate", startdate.as_str()),
                ("enddate", enddate.as_str()),
                ("ratename", self.config.ratename.as_str()),
                ("representativeCircuitId", self.config.circuit_id.as_str()),
                ("program", self.config.program.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json().await?)
    }
}

/// Dates go on the wire as zero-padded 8-digit YYYYMMDD strings.
pub fn query_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[derive(Debug, Error)]
enum SkipReason {
    #[error("missing startIntervalTimeStamp")]
    MissingTimestamp,
    #[error("missing intervalPrice")]
    MissingPrice,
    #[error("unparseable timestamp {0:?}")]
    BadTimestamp(String),
    #[error("unparseable price {0}")]
    BadPrice(Value),
}

/// Flatten the nested payload into a time-ordered pricing table.
///
/// Walks `data[].priceDetails[]`; each record is classified up front as kept or
/// dropped, and drops only cost a warning. An empty table is an error, not a
/// valid output. Anything that breaks the expected shape of the payload itself
/// (a non-array where a list belongs) aborts with a processing error.
pub fn normalize(payload: &Value) -> Result<Vec<PricePoint>> {
    let mut points = Vec::new();

    for item in list_field(payload, "data").map_err(|e| processing_error(payload, e))? {
        let details =
            list_field(item, "priceDetails").map_err(|e| processing_error(payload, e))?;
        for detail in details {
            match parse_record(detail) {
                Ok(point) => points.push(point),
                Err(reason) => warn!("skipping pricing record: {reason}"),
            }
        }
    }

    if points.is_empty() {
        return Err(PricingError::NoData);
    }

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

/// Missing or null fields read as an empty list; a present non-array value is a
/// structural mismatch.
fn list_field<'a>(value: &'a Value, key: &str) -> std::result::Result<&'a [Value], String> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(format!(
            "expected `{key}` to be an array, got {}",
            json_kind(other)
        )),
    }
}

fn parse_record(detail: &Value) -> std::result::Result<PricePoint, SkipReason> {
    let raw_ts = detail
        .get("startIntervalTimeStamp")
        .and_then(Value::as_str)
        .ok_or(SkipReason::MissingTimestamp)?;
    let raw_price = detail
        .get("intervalPrice")
        .filter(|v| !v.is_null())
        .ok_or(SkipReason::MissingPrice)?;

    // The feed stamps intervals like 2025-02-08T00:00:00-0800. The offset is
    // parsed rather than assumed so DST intervals (-0700) come through intact;
    // only the local wall time is kept.
    let timestamp = chrono::DateTime::parse_from_str(raw_ts, "%Y-%m-%dT%H:%M:%S%z")
        .map_err(|_| SkipReason::BadTimestamp(raw_ts.to_string()))?
        .naive_local();

    let price = match raw_price {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| SkipReason::BadPrice(raw_price.clone()))?;

    Ok(PricePoint { timestamp, price })
}

fn processing_error(payload: &Value, cause: String) -> PricingError {
    debug!("payload received: {payload}");
    PricingError::Processing(cause)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
