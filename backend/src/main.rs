//! Order portal entry-point: loads settings, wires adapters and serves the
//! REST API.

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use order_portal::inbound::http::health::HealthState;
use order_portal::server::{ServerConfig, build_portal, create_server};
use order_portal::settings::PortalSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PortalSettings::load().wrap_err("failed to load portal settings")?;
    let config = ServerConfig::from_settings(&settings).wrap_err("invalid portal settings")?;
    let portal = build_portal(&config)
        .await
        .wrap_err("failed to assemble the portal")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &portal, &config)
        .wrap_err_with(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "order portal listening");

    let handle = server.handle();
    let shutdown_health = health_state.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_health.mark_draining();
            handle.stop(true).await;
        }
    });

    server.await.wrap_err("server terminated with an error")
}
