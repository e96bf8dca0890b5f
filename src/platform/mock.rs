//! Recording mock platform.
//!
//! Compiled into every build so integration tests can drive the orchestrator
//! without credentials or network access.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{MediaCategory, MediaId, Platform};
use crate::error::PlatformError;

/// One recorded `create_post` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub text: String,
    /// `None` when the post was sent text-only.
    pub media_ids: Option<Vec<MediaId>>,
}

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub username: Option<String>,
    pub upload_error: Option<String>,
    pub post_error: Option<String>,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    config: MockConfig,
    uploads: Mutex<Vec<(PathBuf, MediaCategory)>>,
    posts: Mutex<Vec<RecordedPost>>,
}

impl MockPlatform {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Every upload and post succeeds; the handle lookup fails.
    pub fn success() -> Self {
        Self::new(MockConfig::default())
    }

    pub fn with_username(username: &str) -> Self {
        Self::new(MockConfig {
            username: Some(username.to_string()),
            ..Default::default()
        })
    }

    pub fn upload_failure(error: &str) -> Self {
        Self::new(MockConfig {
            upload_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn post_failure(error: &str) -> Self {
        Self::new(MockConfig {
            post_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Uploads in call order, including ones that were rejected.
    pub fn uploads(&self) -> Vec<(PathBuf, MediaCategory)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn upload_media(&self, path: &Path, category: MediaCategory) -> Result<MediaId, PlatformError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((path.to_path_buf(), category));

        if let Some(error) = &self.config.upload_error {
            return Err(PlatformError::Upload(error.clone()));
        }
        Ok(MediaId(format!("media-{}", uploads.len())))
    }

    async fn create_post(&self, text: &str, media_ids: Option<&[MediaId]>) -> Result<String, PlatformError> {
        let mut posts = self.posts.lock().unwrap();
        posts.push(RecordedPost {
            text: text.to_string(),
            media_ids: media_ids.map(<[MediaId]>::to_vec),
        });

        if let Some(error) = &self.config.post_error {
            return Err(PlatformError::Post(error.clone()));
        }
        Ok(format!("18000000000000000{:02}", posts.len()))
    }

    async fn username(&self) -> Result<String, PlatformError> {
        self.config
            .username
            .clone()
            .ok_or_else(|| PlatformError::Auth("mock has no username".to_string()))
    }
}
