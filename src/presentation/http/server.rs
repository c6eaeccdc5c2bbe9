use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    handlers::UploadHandler,
    routes::{file_routes, health_routes, upload_routes},
};

pub struct HttpServer {
    upload_handler: Arc<UploadHandler>,
    port: u16,
    body_limit: usize,
    files_dir: Option<PathBuf>,
}

impl HttpServer {
    pub fn new(upload_handler: Arc<UploadHandler>, port: Option<u16>, body_limit: usize) -> Self {
        Self {
            upload_handler,
            port: port.unwrap_or(3000),
            body_limit,
            files_dir: None,
        }
    }

    /// Also serves the local blob store under `/files`.
    pub fn with_files_dir(mut self, files_dir: PathBuf) -> Self {
        self.files_dir = Some(files_dir);
        self
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let mut router = Router::new()
            .merge(health_routes())
            .merge(upload_routes(self.upload_handler.clone()));
        if let Some(files_dir) = &self.files_dir {
            router = router.merge(file_routes(files_dir.clone()));
        }

        router
            .layer(cors)
            // Multipart has its own 2 MB default; the tower-http limit governs instead.
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.body_limit))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                method = %request.method(),
                                uri = %request.uri(),
                                "received request"
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                status = %response.status(),
                                latency_ms = latency.as_millis() as u64,
                                "response sent"
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                error = ?error,
                                latency_ms = latency.as_millis() as u64,
                                "request failed"
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "listening");
        axum::serve(listener, app).await?;

        Ok(())
    }
}
