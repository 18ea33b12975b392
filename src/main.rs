use newsflow::config::Settings;
use newsflow::global::Global;
use newsflow::http;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Settings::new()?;

    tracing_subscriber::fmt()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .parse_lossy(&config.logging.level),
        )
        .init();

    tracing::info!(mode = ?config.mode, "starting newsflow relay");

    let global = Global::init(config)?;

    tokio::select! {
        r = http::run(global.clone()) => {
            if let Err(e) = r {
                tracing::error!("http server error: {:#}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
