use chrono::{DateTime, Utc};

use crate::domain::value_objects::content_kind::file_extension;

/// A user-submitted file, alive for the duration of one upload.
#[derive(Debug, Clone)]
pub struct RawFile {
    data: Vec<u8>,
    content_type: Option<String>,
    file_name: String,
    last_modified: Option<DateTime<Utc>>,
}

impl RawFile {
    pub fn new(file_name: String, content_type: Option<String>, data: Vec<u8>) -> Self {
        let content_type = content_type.filter(|ct| !ct.trim().is_empty());
        Self {
            data,
            content_type,
            file_name,
            last_modified: None,
        }
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    pub fn extension(&self) -> Option<String> {
        file_extension(&self.file_name)
    }

    /// Decodes the payload as UTF-8 text.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.data)
    }
}
