use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub utility: String,
    pub market: String,
    pub ratename: String,
    pub circuit_id: String,
    pub program: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "https://pge-pe-api.gridx.com/v1/getPricing".to_string()),
            utility: std::env::var("UTILITY").unwrap_or_else(|_| "PGE".to_string()),
            market: std::env::var("MARKET").unwrap_or_else(|_| "DAM".to_string()),
            ratename: std::env::var("RATENAME").unwrap_or_else(|_| "EV2AS".to_string()),
            circuit_id: std::env::var("CIRCUIT_ID").unwrap_or_else(|_| "024040403".to_string()),
            program: std::env::var("PROGRAM").unwrap_or_else(|_| "CalFUSE".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(api_base_url: String) -> Self {
        Config {
            port: 0,
            api_base_url,
            utility: "PGE".to_string(),
            market: "DAM".to_string(),
            ratename: "EV2AS".to_string(),
            circuit_id: "024040403".to_string(),
            program: "CalFUSE".to_string(),
        }
    }
}
