//! Platform client boundary.
//!
//! The orchestrator only talks to a [`Platform`]; [`x::XClient`] is the real
//! implementation and [`mock::MockPlatform`] records calls for tests.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::error::PlatformError;

pub mod mock;
pub mod oauth;
pub mod x;

/// Handle used in viewer URLs when the real one is not looked up.
pub const PLACEHOLDER_HANDLE: &str = "user";
pub const VIEWER_DOMAIN: &str = "x.com";

/// Upload category. Images use the platform default; videos are sent as
/// `tweet_video`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Video,
}

impl MediaCategory {
    /// Value for the `media_category` upload parameter, if one is sent.
    pub fn upload_param(self) -> Option<&'static str> {
        match self {
            MediaCategory::Image => None,
            MediaCategory::Video => Some("tweet_video"),
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaCategory::Image => write!(f, "image"),
            MediaCategory::Video => write!(f, "video"),
        }
    }
}

/// Opaque identifier returned by a media upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaId(pub String);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResult {
    pub post_id: String,
    pub url: String,
}

impl PostResult {
    pub fn new(post_id: String, handle: &str) -> Self {
        Self {
            url: viewer_url(handle, &post_id),
            post_id,
        }
    }
}

pub fn viewer_url(handle: &str, post_id: &str) -> String {
    format!("https://{VIEWER_DOMAIN}/{handle}/status/{post_id}")
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Upload one local file and return its media id.
    async fn upload_media(
        &self,
        path: &Path,
        category: MediaCategory,
    ) -> Result<MediaId, PlatformError>;

    /// Publish a post. `None` means a text-only post.
    async fn create_post(
        &self,
        text: &str,
        media_ids: Option<&[MediaId]>,
    ) -> Result<String, PlatformError>;

    /// Handle of the authenticated account.
    async fn username(&self) -> Result<String, PlatformError>;
}
