use anyhow::Result;
use axum::{routing::get, Router};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod pricing;
mod routes;
mod stats;

#[derive(Clone)]
pub struct AppState {
    pub client: pricing::PricingClient,
    pub config: config::Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env()?;
    let client = pricing::PricingClient::new(config.clone())?;
    info!(
        "Pricing client configured for circuit {} ({} {})",
        config.circuit_id, config.utility, config.market
    );

    let state = AppState {
        client,
        config: config.clone(),
    };

    let app = Router::new()
        .route("/", get(routes::index::handler))
        .route("/chart.svg", get(routes::chart::handler))
        .route("/download.csv", get(routes::csv::handler))
        .with_state(state)
        .merge(css());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

const CSS: &'static str = "/assets/styles.css";

fn css() -> Router {
    // Serve embedded css in release
    #[cfg(not(debug_assertions))]
    {
        Router::new().route(
            CSS,
            get({
                (
                    [(axum::http::header::CONTENT_TYPE, "text/css")],
                    include_str!("../static/styles.css"),
                )
            }),
        )
    }

    // Serve static/styles.css in dev
    #[cfg(debug_assertions)]
    {
        use tower_http::services::ServeFile;

        Router::new().route_service(CSS, ServeFile::new("static/styles.css"))
    }
}
