use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use super::oauth::OAuth1Signer;
use super::{MediaCategory, MediaId, Platform};
use crate::config::Credentials;
use crate::error::PlatformError;

const TWEETS_URL: &str = "https://api.x.com/2/tweets";
const MEDIA_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
const ME_URL: &str = "https://api.x.com/2/users/me";

const MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const MAX_VIDEO_SIZE: u64 = 512 * 1024 * 1024; // 512MB
const CHUNK_SIZE: usize = 4 * 1024 * 1024;
const MAX_STATUS_CHECKS: u32 = 60;

pub struct XClient {
    signer: OAuth1Signer,
    http: Client,
}

#[derive(Serialize)]
struct PostBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<PostMedia>,
}

#[derive(Serialize)]
struct PostMedia {
    media_ids: Vec<String>,
}

#[derive(Deserialize)]
struct PostResponse {
    data: PostData,
}

#[derive(Deserialize)]
struct PostData {
    id: String,
}

#[derive(Deserialize)]
struct MediaResponse {
    media_id_string: String,
    #[serde(default)]
    processing_info: Option<ProcessingInfo>,
}

#[derive(Deserialize)]
struct ProcessingInfo {
    state: String,
    #[serde(default)]
    check_after_secs: Option<u64>,
    #[serde(default)]
    error: Option<ProcessingError>,
}

#[derive(Deserialize)]
struct ProcessingError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct MeResponse {
    data: MeData,
}

#[derive(Deserialize)]
pub struct MeData {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl XClient {
    /// Validate the credentials and build the HTTP client. Nothing is sent
    /// until the first upload or post.
    pub fn authenticate(credentials: &Credentials) -> Result<Self, PlatformError> {
        credentials.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PlatformError::Auth(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            signer: OAuth1Signer::new(credentials),
            http,
        })
    }

    pub async fn get_me(&self) -> Result<MeData, PlatformError> {
        let auth = self.signer.authorization("GET", ME_URL, &BTreeMap::new());
        let resp = self
            .http
            .get(ME_URL)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| PlatformError::Auth(format!("HTTP request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(api_error(resp, PlatformError::Auth, "Account lookup").await);
        }

        let me: MeResponse = resp
            .json()
            .await
            .map_err(|e| PlatformError::Auth(format!("Failed to parse response: {e}")))?;
        Ok(me.data)
    }

    async fn upload_image(&self, path: &Path, mime: &str, bytes: Vec<u8>) -> Result<MediaId, PlatformError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name(path))
            .mime_str(mime)
            .map_err(|e| PlatformError::Upload(format!("Invalid MIME type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("media", part);

        // Multipart fields stay out of the signature.
        let auth = self.signer.authorization("POST", MEDIA_UPLOAD_URL, &BTreeMap::new());
        let resp = self
            .http
            .post(MEDIA_UPLOAD_URL)
            .header("Authorization", auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PlatformError::Upload(e.to_string()))?;

        let media = parse_media(resp).await?;
        Ok(MediaId(media.media_id_string))
    }

    async fn upload_chunked(
        &self,
        path: &Path,
        mime: &str,
        bytes: Vec<u8>,
        category: MediaCategory,
    ) -> Result<MediaId, PlatformError> {
        let mut init = BTreeMap::from([
            ("command".to_string(), "INIT".to_string()),
            ("total_bytes".to_string(), bytes.len().to_string()),
            ("media_type".to_string(), mime.to_string()),
        ]);
        if let Some(value) = category.upload_param() {
            init.insert("media_category".into(), value.into());
        }
        let media_id = self.upload_command(&init).await?.media_id_string;

        for (index, chunk) in bytes.chunks(CHUNK_SIZE).enumerate() {
            tracing::debug!(segment = index, size = chunk.len(), "appending {}", path.display());
            let part = reqwest::multipart::Part::bytes(chunk.to_vec()).file_name(file_name(path));
            let form = reqwest::multipart::Form::new()
                .text("command", "APPEND")
                .text("media_id", media_id.clone())
                .text("segment_index", index.to_string())
                .part("media", part);

            let auth = self.signer.authorization("POST", MEDIA_UPLOAD_URL, &BTreeMap::new());
            let resp = self
                .http
                .post(MEDIA_UPLOAD_URL)
                .header("Authorization", auth)
                .multipart(form)
                .send()
                .await
                .map_err(|e| PlatformError::Upload(e.to_string()))?;
            if !resp.status().is_success() {
                return Err(api_error(resp, PlatformError::Upload, "Media upload").await);
            }
        }

        let finalize = BTreeMap::from([
            ("command".to_string(), "FINALIZE".to_string()),
            ("media_id".to_string(), media_id.clone()),
        ]);
        let finalized = self.upload_command(&finalize).await?;
        self.wait_for_processing(&media_id, finalized.processing_info).await?;
        Ok(MediaId(media_id))
    }

    /// Form-encoded upload command (INIT, FINALIZE). Body params are signed.
    async fn upload_command(&self, params: &BTreeMap<String, String>) -> Result<MediaResponse, PlatformError> {
        let auth = self.signer.authorization("POST", MEDIA_UPLOAD_URL, params);
        let resp = self
            .http
            .post(MEDIA_UPLOAD_URL)
            .header("Authorization", auth)
            .form(params)
            .send()
            .await
            .map_err(|e| PlatformError::Upload(e.to_string()))?;
        parse_media(resp).await
    }

    async fn wait_for_processing(
        &self,
        media_id: &str,
        mut info: Option<ProcessingInfo>,
    ) -> Result<(), PlatformError> {
        let mut checks = 0;
        while let Some(current) = info {
            match current.state.as_str() {
                "succeeded" => return Ok(()),
                "failed" => {
                    let reason = current
                        .error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| "unknown error".to_string());
                    return Err(PlatformError::Upload(format!("Video processing failed: {reason}")));
                }
                state => {
                    checks += 1;
                    if checks > MAX_STATUS_CHECKS {
                        return Err(PlatformError::Upload(format!(
                            "Video processing did not finish (last state: {state})"
                        )));
                    }
                    let wait = current.check_after_secs.unwrap_or(1);
                    tracing::debug!(state, wait, "video still processing");
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
            }

            let query = BTreeMap::from([
                ("command".to_string(), "STATUS".to_string()),
                ("media_id".to_string(), media_id.to_string()),
            ]);
            let auth = self.signer.authorization("GET", MEDIA_UPLOAD_URL, &query);
            let resp = self
                .http
                .get(MEDIA_UPLOAD_URL)
                .header("Authorization", auth)
                .query(&query)
                .send()
                .await
                .map_err(|e| PlatformError::Upload(e.to_string()))?;
            info = parse_media(resp).await?.processing_info;
        }
        Ok(())
    }
}

#[async_trait]
impl Platform for XClient {
    async fn upload_media(&self, path: &Path, category: MediaCategory) -> Result<MediaId, PlatformError> {
        let mime = mime_from_path(path, category)?;
        let max = match category {
            MediaCategory::Image => MAX_IMAGE_SIZE,
            MediaCategory::Video => MAX_VIDEO_SIZE,
        };

        let metadata = std::fs::metadata(path)
            .map_err(|e| PlatformError::Upload(format!("Cannot read file metadata: {e}")))?;
        if metadata.len() > max {
            return Err(PlatformError::Upload(format!(
                "File too large: {} bytes (max {}MB)",
                metadata.len(),
                max / (1024 * 1024)
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| PlatformError::Upload(format!("Failed to read file: {e}")))?;

        match category {
            MediaCategory::Image => self.upload_image(path, mime, bytes).await,
            MediaCategory::Video => self.upload_chunked(path, mime, bytes, category).await,
        }
    }

    async fn create_post(&self, text: &str, media_ids: Option<&[MediaId]>) -> Result<String, PlatformError> {
        let body = PostBody {
            text,
            media: media_ids.map(|ids| PostMedia {
                media_ids: ids.iter().map(|id| id.0.clone()).collect(),
            }),
        };

        let auth = self.signer.authorization("POST", TWEETS_URL, &BTreeMap::new());
        let resp = self
            .http
            .post(TWEETS_URL)
            .header("Authorization", auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Post(format!("HTTP request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(api_error(resp, PlatformError::Post, "X API").await);
        }

        let post: PostResponse = resp
            .json()
            .await
            .map_err(|e| PlatformError::Post(format!("Failed to parse post response: {e}")))?;
        Ok(post.data.id)
    }

    async fn username(&self) -> Result<String, PlatformError> {
        Ok(self.get_me().await?.username)
    }
}

async fn parse_media(resp: Response) -> Result<MediaResponse, PlatformError> {
    if !resp.status().is_success() {
        return Err(api_error(resp, PlatformError::Upload, "Media upload").await);
    }
    resp.json()
        .await
        .map_err(|e| PlatformError::Upload(format!("Failed to parse media response: {e}")))
}

/// Turn a non-success response into the error for this call site. 401 is
/// always reported as an authentication failure.
async fn api_error(resp: Response, wrap: fn(String) -> PlatformError, what: &str) -> PlatformError {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        tracing::error!(
            "Received 401 Unauthorized from X API. \
             Your OAuth credentials may be revoked or invalid. \
             Regenerate them at https://developer.x.com/"
        );
        let body = resp.text().await.unwrap_or_default();
        return PlatformError::Auth(format!("{what} rejected credentials (401): {body}"));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset = rate_limit_reset(&resp);
        return wrap(format!("{what} rate limited (429). {reset}Try again later."));
    }
    let body = resp.text().await.unwrap_or_default();
    wrap(format!("{what} error ({status}): {body}"))
}

fn rate_limit_reset(resp: &Response) -> String {
    resp.headers()
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .map(|val| format!("Rate limit resets at timestamp {val}. "))
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn mime_from_path(path: &Path, category: MediaCategory) -> Result<&'static str, PlatformError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match (category, ext.as_str()) {
        (MediaCategory::Image, "jpg" | "jpeg") => Ok("image/jpeg"),
        (MediaCategory::Image, "png") => Ok("image/png"),
        (MediaCategory::Image, "gif") => Ok("image/gif"),
        (MediaCategory::Image, "webp") => Ok("image/webp"),
        (MediaCategory::Video, "mp4" | "m4v") => Ok("video/mp4"),
        (MediaCategory::Video, "mov") => Ok("video/quicktime"),
        (MediaCategory::Image, _) => Err(PlatformError::Upload(format!(
            "Unsupported image format '.{ext}'. Allowed: jpeg, png, gif, webp"
        ))),
        (MediaCategory::Video, _) => Err(PlatformError::Upload(format!(
            "Unsupported video format '.{ext}'. Allowed: mp4, mov"
        ))),
    }
}
