use axum::Router;
use std::path::PathBuf;
use tower_http::services::ServeDir;

/// Serves objects written by the local blob store at `/files/{bucket}/{name}`.
pub fn file_routes(base_path: PathBuf) -> Router {
    Router::new().nest_service("/files", ServeDir::new(base_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_serves_stored_objects() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("uploads")).unwrap();
        std::fs::write(dir.path().join("uploads").join("deck.txt"), b"Acme").unwrap();

        let response = file_routes(dir.path().to_path_buf())
            .oneshot(
                Request::get("/files/uploads/deck.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Acme");

        let missing = file_routes(dir.path().to_path_buf())
            .oneshot(
                Request::get("/files/uploads/other.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
