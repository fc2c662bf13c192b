use thiserror::Error;

/// Failure modes of the fetch-and-normalize pipeline. Each variant maps to a
/// distinct user-facing message; none of them is fatal to the process.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("failed to fetch pricing data: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("no valid pricing records found after processing")]
    NoData,

    #[error("failed to process pricing data: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, PricingError>;
