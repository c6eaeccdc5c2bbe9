use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vcready::{
    config::{Settings, StorageBackend},
    infrastructure::AppContainer,
    presentation::http::HttpServer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vcready=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let container = AppContainer::new(&settings).await?;

    let mut server = HttpServer::new(
        container.upload_handler.clone(),
        Some(settings.port),
        settings.upload_limit_bytes,
    );
    if let StorageBackend::Local { base_path, .. } = &settings.storage {
        server = server.with_files_dir(base_path.clone());
    }

    server.run().await
}
