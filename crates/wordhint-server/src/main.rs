use tracing_subscriber::EnvFilter;
use wordhint_server::cli;

const DEFAULT_LOG_FILTER: &str = "info,wordhint=debug";

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli::command().get_matches();
    init_tracing(cli::log_json(&matches));

    let config = match cli::load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = wordhint_server::run(config).await {
        tracing::error!("Server failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
