use async_trait::async_trait;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::ocr_engine::{OcrEngine, OcrError, OcrOutput};
use crate::domain::value_objects::content_kind::file_extension;

const WORD_LEVEL: &str = "5";

#[derive(Debug, Clone)]
pub struct TesseractConfig {
    pub binary: String,
    pub language: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

/// OCR through the `tesseract` command line tool, using its TSV output so
/// word confidences are available.
pub struct TesseractOcr {
    config: TesseractConfig,
}

impl TesseractOcr {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    async fn run_tesseract(&self, image_path: &std::path::Path) -> Result<String, OcrError> {
        let output = Command::new(&self.config.binary)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .arg("tsv")
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::RecognitionFailed(format!(
                    "tesseract failed: {}",
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::EngineNotAvailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.config.binary
                )))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(TesseractConfig::default())
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &[u8], file_name: &str) -> Result<OcrOutput, OcrError> {
        // Tesseract sniffs the format from the extension.
        let suffix = file_extension(file_name)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let temp = write_temp_image(image.to_vec(), suffix).await?;

        let tsv = self.run_tesseract(temp.path()).await?;
        let output = parse_tsv(&tsv);

        debug!(
            file_name,
            confidence = output.confidence,
            chars = output.text.len(),
            "tesseract finished"
        );

        Ok(output)
    }
}

/// Copies the image into a named temp file off the async runtime.
async fn write_temp_image(image: Vec<u8>, suffix: String) -> Result<NamedTempFile, OcrError> {
    tokio::task::spawn_blocking(move || -> Result<NamedTempFile, OcrError> {
        let mut temp = tempfile::Builder::new()
            .prefix("vcready-ocr-")
            .suffix(&suffix)
            .tempfile()?;
        temp.write_all(&image)?;
        temp.flush()?;
        Ok(temp)
    })
    .await
    .map_err(|e| OcrError::RecognitionFailed(format!("temp file task failed: {}", e)))?
}

/// Rebuilds text from Tesseract TSV rows and averages word confidences.
/// Lines keep their order; blocks are separated by a blank line.
pub fn parse_tsv(tsv: &str) -> OcrOutput {
    let mut text = String::new();
    let mut confidences = Vec::new();
    let mut current_line: Option<(&str, &str, &str)> = None;
    let mut current_block: Option<&str> = None;

    for row in tsv.lines().skip(1) {
        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < 12 || columns[0] != WORD_LEVEL {
            continue;
        }

        let word = columns[11].trim();
        let Ok(confidence) = columns[10].trim().parse::<f32>() else {
            continue;
        };
        if word.is_empty() || confidence < 0.0 {
            continue;
        }

        let line_key = (columns[2], columns[3], columns[4]);
        if current_line != Some(line_key) {
            if current_line.is_some() {
                text.push('\n');
                if current_block != Some(columns[2]) {
                    text.push('\n');
                }
            }
            current_line = Some(line_key);
            current_block = Some(columns[2]);
        } else {
            text.push(' ');
        }

        text.push_str(word);
        confidences.push(confidence);
    }

    let confidence = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f32>() / confidences.len() as f32
    };

    OcrOutput { text, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word(block: u32, line: u32, conf: &str, text: &str) -> String {
        format!("5\t1\t{}\t1\t{}\t1\t0\t0\t10\t10\t{}\t{}", block, line, conf, text)
    }

    #[tokio::test]
    async fn test_temp_image_keeps_suffix_and_bytes() {
        let temp = write_temp_image(vec![0x89, 0x50, 0x4e, 0x47], ".png".to_string())
            .await
            .unwrap();

        assert!(temp.path().to_string_lossy().ends_with(".png"));
        assert_eq!(std::fs::read(temp.path()).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn test_parse_tsv_rebuilds_lines_and_blocks() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t".to_string(),
            word(1, 1, "90", "Revenue"),
            word(1, 1, "80", "grew"),
            word(1, 2, "70", "fast"),
            word(2, 1, "60", "Seed"),
        ]
        .join("\n");

        let output = parse_tsv(&tsv);

        assert_eq!(output.text, "Revenue grew\nfast\n\nSeed");
        assert!((output.confidence - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_tsv_skips_blank_and_unscored_words() {
        let tsv = [
            HEADER.to_string(),
            word(1, 1, "-1", "ghost"),
            word(1, 1, "95", " "),
            word(1, 1, "50", "MRR"),
        ]
        .join("\n");

        let output = parse_tsv(&tsv);
        assert_eq!(output.text, "MRR");
        assert_eq!(output.confidence, 50.0);
    }

    #[test]
    fn test_parse_tsv_empty_output() {
        let output = parse_tsv(HEADER);
        assert!(output.text.is_empty());
        assert_eq!(output.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let ocr = TesseractOcr::new(TesseractConfig {
            binary: "definitely-not-a-tesseract-binary".to_string(),
            language: "eng".to_string(),
        });

        let result = ocr.recognize(&[0u8; 4], "scan.png").await;
        assert!(matches!(result, Err(OcrError::EngineNotAvailable(_))));
    }
}
