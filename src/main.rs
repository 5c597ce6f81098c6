use clap::Parser;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod config;
mod error;
mod routes;
mod service;
mod weather;

use config::Config;
use routes::{create_router, AppState};
use service::WeatherService;
use weather::{openweather::OpenWeatherClient, weatherstack::WeatherStackClient};

#[derive(Parser, Debug)]
#[command(version, about = "Current weather for a single city with provider fail-over")]
struct Cli {
    /// Port for the HTTP server (overrides SERVER_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sydney_weather=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    let primary = Arc::new(WeatherStackClient::new(&config)?);
    let fail_over = Arc::new(OpenWeatherClient::new(&config)?);

    let weather_service = Arc::new(WeatherService::new(
        config.city.clone(),
        primary,
        fail_over,
        config.cache_ttl,
    ));
    tracing::info!(
        "Serving weather for {} with a {:?} cache",
        weather_service.subject(),
        weather_service.cache_ttl()
    );

    let state = AppState { weather_service };

    let app = create_router(state).layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
