use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trendline::config::{Config, TickerFile};
use trendline::services::{BatchRunner, RecordStore};
use trendline::sources::YahooFinanceClient;
use trendline::{api, render, AppState};

const USAGE: &str = "usage: trendline [fetch|render|serve|all]";

/// Download every configured instrument and persist its record.
async fn fetch(config: &Config, store: Arc<RecordStore>) -> anyhow::Result<()> {
    let tickers = TickerFile::load(&config.tickers_file)?;
    let instruments = tickers.instruments(&config.rate_series_symbols);
    info!(
        "Fetching {} instruments since {} (MA {}/{})",
        instruments.len(),
        config.start_date,
        config.short_window,
        config.long_window
    );

    let source = Arc::new(YahooFinanceClient::new()?);
    let runner = BatchRunner::new(source, store, config.signal()?, config.start_date)
        .with_concurrency(config.fetch_concurrency);

    let report = runner.run(&instruments).await;
    for skipped in &report.skipped {
        warn!("{} skipped: {:?}", skipped.symbol, skipped.reason);
    }
    Ok(())
}

async fn serve(config: Arc<Config>, store: Arc<RecordStore>) -> anyhow::Result<()> {
    let state = AppState {
        config: config.clone(),
        store,
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Trendline server listening on {}", addr);

    axum::serve(listener, api::app(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trendline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    let store = Arc::new(RecordStore::open(&config.output_dir)?);

    let command = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());
    match command.as_str() {
        "fetch" => fetch(&config, store).await?,
        "render" => {
            render::write_site(&store, &config.site_dir)?;
        }
        "serve" => serve(config, store).await?,
        "all" => {
            fetch(&config, store.clone()).await?;
            render::write_site(&store, &config.site_dir)?;
            serve(config, store).await?;
        }
        other => anyhow::bail!("unknown command {:?}; {}", other, USAGE),
    }

    Ok(())
}
