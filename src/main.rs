use clap::Parser;
use responses_bridge::config::config_search_paths;
use responses_bridge::providers::ProviderPreset;
use responses_bridge::{build_router, AppState, BridgeConfig, SharedLogger};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "responses-bridge",
    about = "Serve the OpenAI Responses API on top of any Anthropic Messages provider",
    version
)]
struct Cli {
    /// Path to config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Provider name (overrides config)
    #[arg(long)]
    provider: Option<String>,

    /// Log file path
    #[arg(long, default_value = "responses-bridge.log")]
    log_file: PathBuf,

    /// Print config search paths and exit
    #[arg(long)]
    show_config_paths: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "responses_bridge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if cli.show_config_paths {
        println!("Config search paths:");
        for (i, path) in config_search_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        return Ok(());
    }

    let mut config = BridgeConfig::find_and_load(cli.config.as_deref())?;

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(ref provider) = cli.provider {
        config.provider.name = provider.clone();
        if let Some(preset) = ProviderPreset::from_name(provider) {
            config.provider.base_url = Some(preset.base_url.to_string());
            config.provider.api_key_env = preset.default_api_key_env.to_string();
            config.provider.auth = Some(preset.auth);
        }
    }

    let logger = SharedLogger::new(&cli.log_file)?;

    // Fail at startup rather than on the first request
    let base_url = config.effective_base_url()?;
    config.resolve_api_key()?;

    info!(version = env!("CARGO_PKG_VERSION"), "responses-bridge starting");
    info!("  Provider:  {}", config.provider.name);
    info!("  Base URL:  {}", base_url);
    info!("  Auth:      {:?}", config.auth_style());
    info!("  Port:      {}", config.port);
    info!("  Models:    {} mapped", config.models.len());
    if let Some(ref model) = config.default_model {
        info!("  Default:   {}", model);
    }
    info!("  Log file:  {}", cli.log_file.display());

    logger.info(
        "startup",
        format!(
            "Starting responses-bridge provider={} base_url={} port={}",
            config.provider.name, base_url, config.port
        ),
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let state = Arc::new(AppState {
        config: config.clone(),
        client,
        logger,
    });

    let app = build_router(state);
    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Listening on http://{}", bind_addr);
    info!(
        "Point a Responses client at http://localhost:{}/v1",
        config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
