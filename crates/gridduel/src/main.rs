use gridduel::prelude::*;

/// Address used when `GRIDDUEL_BIND` is not set.
const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), GridDuelError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let bind = std::env::var("GRIDDUEL_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let server = GridDuelServer::builder()
        .bind(&bind)
        .room_config(RoomConfig::default())
        .build()
        .await?;
    tracing::info!(addr = %server.local_addr().map_or(bind, |a| a.to_string()), "listening");

    server.run().await
}
