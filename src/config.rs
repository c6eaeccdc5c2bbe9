use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::application::services::AnalysisConfig;
use crate::infrastructure::external_services::{
    OpenAiClientConfig, SupabaseStorageConfig, TesseractConfig,
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BUCKET: &str = "uploads";
const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_UPLOADS_PER_USER: i64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub enum StorageBackend {
    Supabase(SupabaseStorageConfig),
    Local {
        base_path: PathBuf,
        public_base_url: String,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub openai: OpenAiClientConfig,
    pub analysis: AnalysisConfig,
    pub storage: StorageBackend,
    pub bucket: String,
    pub tesseract: TesseractConfig,
    pub upload_limit_bytes: usize,
    pub default_upload_limit: i64,
}

impl Settings {
    /// Reads settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let port = parse_or(&get, "PORT", DEFAULT_PORT)?;

        let openai_defaults = OpenAiClientConfig::default();
        let openai = OpenAiClientConfig {
            base_url: url_var(&get, "OPENAI_BASE_URL")?.unwrap_or(openai_defaults.base_url),
            api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            timeout_secs: parse_or(&get, "OPENAI_TIMEOUT_SECS", openai_defaults.timeout_secs)?,
        };

        let analysis_defaults = AnalysisConfig::default();
        let analysis = AnalysisConfig {
            model: get("OPENAI_MODEL").unwrap_or(analysis_defaults.model),
            temperature: parse_or(&get, "OPENAI_TEMPERATURE", analysis_defaults.temperature)?,
            max_tokens: parse_or(&get, "OPENAI_MAX_TOKENS", analysis_defaults.max_tokens)?,
            max_content_chars: parse_or(
                &get,
                "ANALYSIS_MAX_CONTENT_CHARS",
                analysis_defaults.max_content_chars,
            )?,
        };

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("supabase") {
            "supabase" => StorageBackend::Supabase(SupabaseStorageConfig {
                url: url_var(&get, "SUPABASE_URL")?.ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                service_key: get("SUPABASE_SERVICE_KEY")
                    .ok_or(ConfigError::Missing("SUPABASE_SERVICE_KEY"))?,
                timeout_secs: openai.timeout_secs,
            }),
            "local" => StorageBackend::Local {
                base_path: PathBuf::from(
                    get("LOCAL_STORAGE_DIR").unwrap_or_else(|| "./storage".to_string()),
                ),
                public_base_url: url_var(&get, "PUBLIC_BASE_URL")?
                    .unwrap_or_else(|| format!("http://localhost:{}/files", port)),
            },
            other => {
                return Err(ConfigError::Invalid {
                    var: "STORAGE_BACKEND",
                    value: other.to_string(),
                    reason: "expected \"supabase\" or \"local\"".to_string(),
                });
            }
        };

        let tesseract_defaults = TesseractConfig::default();
        let tesseract = TesseractConfig {
            binary: get("TESSERACT_BIN").unwrap_or(tesseract_defaults.binary),
            language: get("TESSERACT_LANG").unwrap_or(tesseract_defaults.language),
        };

        Ok(Self {
            database_url,
            port,
            openai,
            analysis,
            storage,
            bucket: get("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            tesseract,
            upload_limit_bytes: parse_or(&get, "UPLOAD_LIMIT_BYTES", DEFAULT_UPLOAD_LIMIT_BYTES)?,
            default_upload_limit: parse_or(&get, "DEFAULT_UPLOAD_LIMIT", DEFAULT_UPLOADS_PER_USER)?,
        })
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

/// Reads an optional URL variable, dropping any trailing slash.
fn url_var<G>(get: &G, var: &'static str) -> Result<Option<String>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(value) = get(var) else {
        return Ok(None);
    };
    match Url::parse(value.trim()) {
        Ok(_) => Ok(Some(value.trim().trim_end_matches('/').to_string())),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    const SUPABASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/vcready"),
        ("SUPABASE_URL", "https://proj.supabase.co"),
        ("SUPABASE_SERVICE_KEY", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let settings = settings(SUPABASE).unwrap();

        assert_eq!(settings.port, 3000);
        assert_eq!(settings.bucket, "uploads");
        assert_eq!(settings.analysis.model, "gpt-4o-mini");
        assert_eq!(settings.analysis.max_tokens, 2000);
        assert_eq!(settings.openai.timeout_secs, 120);
        assert_eq!(settings.upload_limit_bytes, 25 * 1024 * 1024);
        assert_eq!(settings.tesseract.language, "eng");
        match settings.storage {
            StorageBackend::Supabase(ref config) => {
                assert_eq!(config.url, "https://proj.supabase.co")
            }
            ref other => panic!("expected supabase storage, got {:?}", other),
        }
    }

    #[test]
    fn test_local_backend_and_overrides() {
        let settings = settings(&[
            ("DATABASE_URL", "postgres://localhost/vcready"),
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_DIR", "/var/lib/vcready"),
            ("PORT", "8080"),
            ("OPENAI_TEMPERATURE", "0.3"),
            ("STORAGE_BUCKET", "pitch-files"),
        ])
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.analysis.temperature, 0.3);
        assert_eq!(settings.bucket, "pitch-files");
        match settings.storage {
            StorageBackend::Local {
                base_path,
                public_base_url,
            } => {
                assert_eq!(base_path, PathBuf::from("/var/lib/vcready"));
                assert_eq!(public_base_url, "http://localhost:8080/files");
            }
            other => panic!("expected local storage, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_invalid_values() {
        assert!(matches!(
            settings(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));

        assert!(matches!(
            settings(&[("DATABASE_URL", "postgres://x")]),
            Err(ConfigError::Missing("SUPABASE_URL"))
        ));

        let mut vars = SUPABASE.to_vec();
        vars.push(("PORT", "eighty"));
        assert!(matches!(
            settings(&vars),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));

        assert!(matches!(
            settings(&[
                ("DATABASE_URL", "postgres://x"),
                ("SUPABASE_URL", "not a url"),
                ("SUPABASE_SERVICE_KEY", "secret"),
            ]),
            Err(ConfigError::Invalid {
                var: "SUPABASE_URL",
                ..
            })
        ));

        let mut vars = SUPABASE.to_vec();
        vars.push(("STORAGE_BACKEND", "s3"));
        assert!(matches!(
            settings(&vars),
            Err(ConfigError::Invalid {
                var: "STORAGE_BACKEND",
                ..
            })
        ));
    }
}
