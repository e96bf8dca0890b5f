//! Configuration loading.
//!
//! The document is JSON by default; a path ending in `.toml` is read as TOML
//! with the same schema. Unknown keys are ignored.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, PlatformError};
use crate::paths;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_VIDEO_FILE: &str = "Video/preview.mp4";
pub const DEFAULT_VIDEO_CAPTION_FILE: &str = "Prompts/video-preview.txt";

/// OAuth 1.0a user-context credentials.
///
/// Missing keys deserialize as empty strings; [`Credentials::validate`] is
/// called when the platform client is built, not at load time.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_key_secret: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***REDACTED***")
            .field("api_key_secret", &"***REDACTED***")
            .field("access_token", &"***REDACTED***")
            .field("access_token_secret", &"***REDACTED***")
            .finish()
    }
}

impl Credentials {
    pub fn validate(&self) -> Result<(), PlatformError> {
        let fields = [
            ("api_key", &self.api_key),
            ("api_key_secret", &self.api_key_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(PlatformError::Auth(format!("'{name}' is empty in config")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionSection {
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSection {
    #[serde(default)]
    pub sfw_file: Option<String>,
    #[serde(default)]
    pub nsfw_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_video_file")]
    pub file: String,
    #[serde(default = "default_video_caption_file")]
    pub caption_file: String,
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            enabled: false,
            file: default_video_file(),
            caption_file: default_video_caption_file(),
        }
    }
}

fn default_video_file() -> String {
    DEFAULT_VIDEO_FILE.to_string()
}

fn default_video_caption_file() -> String {
    DEFAULT_VIDEO_CAPTION_FILE.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Absolute after [`load_config`]; `None` when absent or empty.
    #[serde(default)]
    pub project_folder: Option<PathBuf>,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub caption: CaptionSection,
    #[serde(default)]
    pub media: MediaSection,
    #[serde(default)]
    pub video: VideoSection,
}

impl Config {
    pub fn project_folder(&self) -> Option<&Path> {
        self.project_folder.as_deref()
    }

    /// Parse a document without touching the filesystem. `project_folder` is
    /// left exactly as written.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Read and parse the configuration at `path`, expanding `project_folder`
/// to an absolute path.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = Config::parse(&content, ConfigFormat::from_path(path)).map_err(|message| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        }
    })?;

    config.project_folder = match config.project_folder.take() {
        Some(raw) if !raw.as_os_str().is_empty() => {
            let expanded = paths::expand_project_folder(&raw.to_string_lossy()).map_err(
                |source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                },
            )?;
            Some(expanded)
        }
        _ => None,
    };

    tracing::info!("Config loaded from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_for_absent_sections() {
        let config = Config::parse(
            r#"{"api_key": "k", "api_key_secret": "ks", "access_token": "t", "access_token_secret": "ts"}"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert!(config.project_folder.is_none());
        assert!(config.caption.file.is_none());
        assert!(config.media.sfw_file.is_none());
        assert!(config.media.nsfw_file.is_none());
        assert!(!config.video.enabled);
        assert_eq!(config.video.file, DEFAULT_VIDEO_FILE);
        assert_eq!(config.video.caption_file, DEFAULT_VIDEO_CAPTION_FILE);
        assert!(config.credentials.validate().is_ok());
    }

    #[test]
    fn test_partial_video_section_keeps_defaults() {
        let config = Config::parse(r#"{"video": {"enabled": true}}"#, ConfigFormat::Json).unwrap();
        assert!(config.video.enabled);
        assert_eq!(config.video.file, DEFAULT_VIDEO_FILE);
        assert_eq!(config.video.caption_file, DEFAULT_VIDEO_CAPTION_FILE);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = Config::parse(
            r#"{"schedule": {"cron": "0 9 * * *"}, "media": {"sfw_file": "a.png", "extra": 1}}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(config.media.sfw_file.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_missing_credentials_fail_validation_not_parsing() {
        let config = Config::parse(r#"{"api_key": "k"}"#, ConfigFormat::Json).unwrap();
        match config.credentials.validate() {
            Err(PlatformError::Auth(msg)) => assert!(msg.contains("api_key_secret")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials {
            api_key: "super-secret-key".to_string(),
            ..Default::default()
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_toml_uses_same_schema() {
        let config = Config::parse(
            r#"
api_key = "k"
project_folder = "/proj"

[media]
sfw_file = "img/a.png"

[video]
enabled = false
"#,
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.credentials.api_key, "k");
        assert_eq!(config.project_folder, Some(PathBuf::from("/proj")));
        assert_eq!(config.media.sfw_file.as_deref(), Some("img/a.png"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("poster.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Json);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", "{ not json");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_expands_project_folder() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", r#"{"project_folder": "~/renders"}"#);
        let config = load_config(&path).unwrap();

        let folder = config.project_folder().unwrap();
        assert!(folder.is_absolute());
        assert!(folder.ends_with("renders"));
        assert!(!folder.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_load_empty_project_folder_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", r#"{"project_folder": ""}"#);
        let config = load_config(&path).unwrap();
        assert!(config.project_folder().is_none());
    }
}
