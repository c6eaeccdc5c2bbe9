use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use crate::application::ports::blob_storage::{BlobStorage, BlobStorageError, StoredObject};

/// Blob storage on the local filesystem. Each bucket is a sub-directory of
/// `base_path` that an operator must create up front.
pub struct LocalBlobStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalBlobStorage {
    pub fn new(base_path: PathBuf, public_base_url: String) -> Self {
        Self {
            base_path,
            public_base_url,
        }
    }

    fn get_bucket_path(&self, bucket: &str) -> PathBuf {
        self.base_path.join(bucket)
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        data: &[u8],
        _content_type: Option<&str>,
    ) -> Result<StoredObject, BlobStorageError> {
        let bucket_path = self.get_bucket_path(bucket);
        let bucket_exists = fs::try_exists(&bucket_path)
            .await
            .map_err(|e| BlobStorageError::IoError(e.to_string()))?;
        if !bucket_exists {
            return Err(BlobStorageError::BucketNotFound(bucket.to_string()));
        }

        if object_name.contains('/') || object_name.contains("..") {
            return Err(BlobStorageError::PermissionDenied(format!(
                "invalid object name: {}",
                object_name
            )));
        }

        let file_path = bucket_path.join(object_name);
        fs::write(&file_path, data).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                BlobStorageError::PermissionDenied(e.to_string())
            }
            _ => BlobStorageError::IoError(e.to_string()),
        })?;

        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: object_name.to_string(),
            size: data.len() as u64,
        })
    }

    fn public_url(&self, bucket: &str, object_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            bucket,
            object_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> LocalBlobStorage {
        LocalBlobStorage::new(
            dir.path().to_path_buf(),
            "http://localhost:3000/files/".to_string(),
        )
    }

    #[tokio::test]
    async fn test_upload_writes_into_bucket() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("uploads")).unwrap();

        let stored = storage(&dir)
            .upload("uploads", "abc.csv", b"a,b\n1,2", Some("text/csv"))
            .await
            .unwrap();

        assert_eq!(stored.size, 7);
        assert_eq!(
            std::fs::read(dir.path().join("uploads").join("abc.csv")).unwrap(),
            b"a,b\n1,2"
        );
    }

    #[tokio::test]
    async fn test_missing_bucket_directory() {
        let dir = TempDir::new().unwrap();

        let err = storage(&dir)
            .upload("uploads", "abc.csv", b"x", None)
            .await
            .unwrap_err();

        assert!(matches!(err, BlobStorageError::BucketNotFound(ref b) if b == "uploads"));
        assert!(err.is_missing_bucket());
    }

    #[tokio::test]
    async fn test_unreadable_base_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("storage");
        std::fs::write(&not_a_dir, b"plain file").unwrap();

        let storage = LocalBlobStorage::new(not_a_dir, "http://localhost:3000/files".to_string());
        let err = storage
            .upload("uploads", "abc.csv", b"x", None)
            .await
            .unwrap_err();

        assert!(matches!(err, BlobStorageError::IoError(_)));
        assert!(!err.is_missing_bucket());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("uploads")).unwrap();

        let err = storage(&dir)
            .upload("uploads", "../escape.txt", b"x", None)
            .await
            .unwrap_err();
        assert!(matches!(err, BlobStorageError::PermissionDenied(_)));
    }

    #[test]
    fn test_public_url() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            storage(&dir).public_url("uploads", "abc.csv"),
            "http://localhost:3000/files/uploads/abc.csv"
        );
    }
}
