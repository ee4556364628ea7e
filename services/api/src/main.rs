use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sea_orm::Database;
use tracing::info;

use tempmail_api::config::ApiConfig;
use tempmail_api::domain::types::AdminAccount;
use tempmail_api::infra::admin::StaticAdminDirectory;
use tempmail_api::router::{RouterOptions, build_router};
use tempmail_api::state::AppState;
use tempmail_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ApiConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db: Arc::new(db),
        jwt_secret: config.jwt_secret,
        mail_domain: config.mail_domain,
        admins: StaticAdminDirectory::new(vec![AdminAccount {
            username: config.admin_username,
            password_hash: config.admin_password_hash,
        }]),
        trust_forwarded_for: config.trust_forwarded_for,
    };

    let options = RouterOptions {
        cors_origins: config.cors_origins,
        mock_ingest_enabled: config.mock_ingest_enabled,
    };
    if options.mock_ingest_enabled {
        info!("mock ingest endpoint enabled");
    }

    let router = build_router(state, &options);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("tempmail api listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;
    Ok(())
}
