//! Post mode selection and media path resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::MediaError;
use crate::paths;
use crate::platform::MediaCategory;

/// VIDEO and IMAGES are mutually exclusive for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMode {
    Video,
    Images,
}

impl PostMode {
    pub fn select(config: &Config) -> Self {
        if config.video.enabled {
            PostMode::Video
        } else {
            PostMode::Images
        }
    }
}

impl fmt::Display for PostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostMode::Video => write!(f, "VIDEO"),
            PostMode::Images => write!(f, "IMAGES"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Sfw,
    Nsfw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image(Rating),
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaRef {
    pub fn image(path: PathBuf, rating: Rating) -> Self {
        Self {
            path,
            kind: MediaKind::Image(rating),
        }
    }

    pub fn video(path: PathBuf) -> Self {
        Self {
            path,
            kind: MediaKind::Video,
        }
    }

    pub fn category(&self) -> MediaCategory {
        match self.kind {
            MediaKind::Image(_) => MediaCategory::Image,
            MediaKind::Video => MediaCategory::Video,
        }
    }

    /// "Image" or "Video", as used in progress lines.
    pub fn label(&self) -> &'static str {
        match self.kind {
            MediaKind::Image(_) => "Image",
            MediaKind::Video => "Video",
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn ensure_exists(&self) -> Result<&Path, MediaError> {
        if self.exists() {
            Ok(&self.path)
        } else {
            Err(MediaError::NotFound {
                kind: self.label(),
                path: self.path.clone(),
            })
        }
    }
}

/// Candidate media for `mode`, in upload order. Missing files are kept;
/// the orchestrator skips them at upload time.
pub fn resolve_media(config: &Config, mode: PostMode) -> Vec<MediaRef> {
    let base = config.project_folder();
    match mode {
        PostMode::Video => vec![MediaRef::video(paths::resolve(&config.video.file, base))],
        PostMode::Images => {
            let candidates = [
                (config.media.sfw_file.as_deref(), Rating::Sfw),
                (config.media.nsfw_file.as_deref(), Rating::Nsfw),
            ];
            candidates
                .into_iter()
                .filter_map(|(file, rating)| match file {
                    Some(file) if !file.is_empty() => {
                        Some(MediaRef::image(paths::resolve(file, base), rating))
                    }
                    _ => None,
                })
                .collect()
        }
    }
}

/// Print the per-file existence summary shown before posting.
pub fn print_summary(mode: PostMode, media: &[MediaRef]) {
    println!("\nMode: {mode}");
    match mode {
        PostMode::Video => {
            if let Some(video) = media.first() {
                println!("Video file: {}", video.path.display());
            }
        }
        PostMode::Images => println!("Images to post: {}", media.len()),
    }
    for item in media {
        let mark = if item.exists() { "✓" } else { "✗" };
        println!("  {mark} {}", paths::display_name(&item.path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    fn config(json: &str) -> Config {
        Config::parse(json, ConfigFormat::Json).unwrap()
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(PostMode::select(&config("{}")), PostMode::Images);
        assert_eq!(
            PostMode::select(&config(r#"{"video": {"enabled": true}}"#)),
            PostMode::Video
        );
    }

    #[test]
    fn test_sfw_before_nsfw() {
        let config = config(
            r#"{"project_folder": "/proj", "media": {"nsfw_file": "b.png", "sfw_file": "a.png"}}"#,
        );
        let media = resolve_media(&config, PostMode::Images);
        assert_eq!(
            media,
            vec![
                MediaRef::image(PathBuf::from("/proj/a.png"), Rating::Sfw),
                MediaRef::image(PathBuf::from("/proj/b.png"), Rating::Nsfw),
            ]
        );
    }

    #[test]
    fn test_absolute_image_path_unchanged() {
        let config = config(r#"{"project_folder": "/proj", "media": {"sfw_file": "/abs/a.png"}}"#);
        let media = resolve_media(&config, PostMode::Images);
        assert_eq!(media[0].path, PathBuf::from("/abs/a.png"));
    }

    #[test]
    fn test_empty_and_absent_images_are_skipped() {
        let config = config(r#"{"media": {"sfw_file": "", "nsfw_file": "only.png"}}"#);
        let media = resolve_media(&config, PostMode::Images);
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].kind, MediaKind::Image(Rating::Nsfw));
        assert!(resolve_media(&Config::default(), PostMode::Images).is_empty());
    }

    #[test]
    fn test_video_mode_ignores_image_fields() {
        let config = config(
            r#"{"project_folder": "/proj", "video": {"enabled": true},
                "media": {"sfw_file": "a.png", "nsfw_file": "b.png"}}"#,
        );
        let media = resolve_media(&config, PostMode::select(&config));
        assert_eq!(media, vec![MediaRef::video(PathBuf::from("/proj/Video/preview.mp4"))]);
        assert_eq!(media[0].category(), MediaCategory::Video);
    }

    #[test]
    fn test_missing_file_is_kept_but_reported() {
        let config = config(r#"{"media": {"sfw_file": "/no/such/dir/a.png"}}"#);
        let media = resolve_media(&config, PostMode::Images);
        assert_eq!(media.len(), 1);
        assert!(!media[0].exists());
        assert_eq!(
            media[0].ensure_exists(),
            Err(MediaError::NotFound {
                kind: "Image",
                path: PathBuf::from("/no/such/dir/a.png"),
            })
        );
    }
}
