use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::application::ports::blob_storage::{
    BlobStorage, BlobStorageError, StoredObject, looks_like_missing_bucket,
};

#[derive(Debug, Clone)]
pub struct SupabaseStorageConfig {
    pub url: String,
    pub service_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Supabase Storage over its REST API.
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    client: Client,
    config: SupabaseStorageConfig,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseStorageConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<StorageErrorBody>(body)
        .ok()
        .and_then(|b| match (b.error, b.message) {
            (Some(error), Some(message)) => Some(format!("{}: {}", error, message)),
            (error, message) => error.or(message),
        })
        .unwrap_or_else(|| body.to_string());

    format!("{} {}", status.as_u16(), detail)
}

#[async_trait]
impl BlobStorage for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<StoredObject, BlobStorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url(),
            bucket,
            object_name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .header(
                "Content-Type",
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| {
                // The request URL embeds the bucket and object name.
                let e = e.without_url();
                warn!(bucket, object_name, error = %e, "storage request failed");
                BlobStorageError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(StoredObject {
                bucket: bucket.to_string(),
                path: object_name.to_string(),
                size: data.len() as u64,
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = describe_failure(status, &body);
        warn!(bucket, object_name, %message, "storage upload rejected");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                BlobStorageError::PermissionDenied(message)
            }
            _ if status == StatusCode::NOT_FOUND || looks_like_missing_bucket(&body) => {
                BlobStorageError::BucketNotFound(message)
            }
            _ => BlobStorageError::UploadFailed(message),
        })
    }

    fn public_url(&self, bucket: &str, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            bucket,
            object_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn storage_for(server: &MockServer) -> SupabaseStorage {
        SupabaseStorage::new(SupabaseStorageConfig {
            url: server.uri(),
            service_key: "service-key".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_upload_posts_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/uploads/abc.csv"))
            .and(header("authorization", "Bearer service-key"))
            .and(header("content-type", "text/csv"))
            .and(body_bytes(b"a,b\n1,2".to_vec()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"Key": "uploads/abc.csv"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let stored = storage_for(&server)
            .upload("uploads", "abc.csv", b"a,b\n1,2", Some("text/csv"))
            .await
            .unwrap();

        assert_eq!(stored.bucket, "uploads");
        assert_eq!(stored.size, 7);
    }

    #[tokio::test]
    async fn test_missing_bucket_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "statusCode": "404",
                "error": "Bucket not found",
                "message": "Bucket not found"
            })))
            .mount(&server)
            .await;

        let err = storage_for(&server)
            .upload("uploads", "abc.csv", b"x", None)
            .await
            .unwrap_err();

        assert!(matches!(err, BlobStorageError::BucketNotFound(_)));
        assert!(err.is_missing_bucket());
    }

    #[tokio::test]
    async fn test_other_failures_are_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(413).set_body_json(json!({
                "error": "Payload too large",
                "message": "The object exceeded the maximum allowed size"
            })))
            .mount(&server)
            .await;

        let err = storage_for(&server)
            .upload("uploads", "abc.csv", b"x", None)
            .await
            .unwrap_err();

        assert!(matches!(err, BlobStorageError::UploadFailed(_)));
        assert!(!err.is_missing_bucket());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_not_a_missing_bucket() {
        let storage = SupabaseStorage::new(SupabaseStorageConfig {
            url: "http://127.0.0.1:9".to_string(),
            service_key: "service-key".to_string(),
            timeout_secs: 5,
        })
        .unwrap();

        let err = storage
            .upload("pitch-bucket", "abc.txt", b"x", None)
            .await
            .unwrap_err();

        assert!(matches!(err, BlobStorageError::Transport(_)));
        assert!(!err.to_string().contains("pitch-bucket"));
        assert!(!err.is_missing_bucket());
    }

    #[test]
    fn test_public_url() {
        let storage = SupabaseStorage::new(SupabaseStorageConfig {
            url: "https://proj.supabase.co/".to_string(),
            service_key: String::new(),
            timeout_secs: 5,
        })
        .unwrap();

        assert_eq!(
            storage.public_url("uploads", "abc.csv"),
            "https://proj.supabase.co/storage/v1/object/public/uploads/abc.csv"
        );
    }
}
