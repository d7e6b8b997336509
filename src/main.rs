//! PIX Console - browser console for a multi-tenant PIX payment platform.
//!
//! Native build: hosts the built web bundle and proxies `/api` to the
//! platform backend. Web build: mounts the Dioxus app in the browser.

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pix_console=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting PIX Console v{} ({})",
        env!("PIXC_VERSION"),
        env!("PIXC_GIT_SHA")
    );

    // Load configuration
    let config = pix_console::config::load_config()?;
    tracing::info!("Configuration loaded, port: {}", config.port);

    pix_console::server::run(config).await
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(pix_console::app::App);
}
