use parlor::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ParlorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;

    let content = match &config.content {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading content pack");
            ContentPack::from_json(&std::fs::read(path)?)?
        }
        None => ContentPack::default(),
    };

    let mut builder = ParlorServer::builder()
        .bind(&config.bind)
        .room_config(RoomConfig {
            seed: config.seed,
            ..RoomConfig::default()
        })
        .content(content);
    if let Some(timeout) = config.idle_timeout {
        builder = builder.idle_timeout(timeout);
    }

    let server = builder.build().await?;

    server.run().await
}
