use serde::{Deserialize, Serialize};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Extensions accepted at the upload boundary.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "csv", "jpg", "jpeg", "png", "gif", "bmp", "webp",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Csv,
    Image,
    Txt,
}

impl ContentKind {
    /// Resolves the extraction strategy from the declared MIME type and the
    /// file name. CSV wins over image, image over text.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        let content_type = content_type
            .map(|ct| ct.trim().to_lowercase())
            .unwrap_or_default();
        let extension = file_extension(file_name);
        let extension = extension.as_deref();

        if content_type == "text/csv" || extension == Some("csv") {
            Some(ContentKind::Csv)
        } else if content_type.starts_with("image/")
            || extension.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
        {
            Some(ContentKind::Image)
        } else if content_type == "text/plain" || extension == Some("txt") {
            Some(ContentKind::Txt)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Csv => "csv",
            ContentKind::Image => "image",
            ContentKind::Txt => "txt",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lower-cased extension after the last dot, if any.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Upload allow-list: a known extension or an accepted declared MIME type.
pub fn is_allowed_upload(file_name: &str, content_type: Option<&str>) -> bool {
    let extension_ok = file_extension(file_name)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    let mime_ok = content_type.is_some_and(|ct| {
        let ct = ct.trim().to_lowercase();
        ct == "text/plain" || ct == "text/csv" || ct.starts_with("image/")
    });

    extension_ok || mime_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_mime_type() {
        assert_eq!(
            ContentKind::detect("upload", Some("text/csv")),
            Some(ContentKind::Csv)
        );
        assert_eq!(
            ContentKind::detect("upload", Some("image/tiff")),
            Some(ContentKind::Image)
        );
        assert_eq!(
            ContentKind::detect("upload", Some("text/plain")),
            Some(ContentKind::Txt)
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(ContentKind::detect("kpis.CSV", None), Some(ContentKind::Csv));
        assert_eq!(ContentKind::detect("deck.webp", None), Some(ContentKind::Image));
        assert_eq!(ContentKind::detect("notes.txt", None), Some(ContentKind::Txt));
    }

    #[test]
    fn test_csv_extension_beats_plain_text_mime() {
        assert_eq!(
            ContentKind::detect("metrics.csv", Some("text/plain")),
            Some(ContentKind::Csv)
        );
    }

    #[test]
    fn test_unsupported_types() {
        assert_eq!(ContentKind::detect("deck.pdf", Some("application/pdf")), None);
        assert_eq!(ContentKind::detect("README", None), None);
    }

    #[test]
    fn test_allow_list() {
        assert!(is_allowed_upload("metrics.csv", None));
        assert!(is_allowed_upload("photo", Some("image/heic")));
        assert!(!is_allowed_upload("deck.pdf", Some("application/pdf")));
        assert!(!is_allowed_upload(".txt", None));
    }
}
