use anyhow::Context;

use automail::api::{AppState, analyze_routes};
use automail::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env next to the binary's working directory
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let state = AppState::from_config(&config).context("Failed to build provider cascade")?;

    let providers = state.cascade.provider_names();
    eprintln!("📬 Automail v{}", env!("CARGO_PKG_VERSION"));
    if providers.is_empty() {
        eprintln!("   Providers: none (rule-based only)");
    } else {
        eprintln!("   Providers: {} → rule-based", providers.join(" → "));
    }
    eprintln!(
        "   Normalizer: {}",
        state.cascade.fallback().normalizer().tier().label()
    );
    eprintln!("   Provider timeout: {:?}", config.provider_timeout);
    eprintln!("   CORS origin: {}", config.frontend_url);
    eprintln!("   API: http://0.0.0.0:{}/api/analyze\n", config.port);

    let app = analyze_routes(state, &config.frontend_url);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Automail API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
