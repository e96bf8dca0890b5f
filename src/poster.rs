//! Post orchestration: build a plan from configuration, then upload and
//! publish it through a [`Platform`].

use std::fmt;
use std::path::Path;

use crate::caption;
use crate::config::Config;
use crate::error::PlatformError;
use crate::media::{self, MediaRef, PostMode};
use crate::platform::{MediaId, PLACEHOLDER_HANDLE, Platform, PostResult};

/// Progress through a run. Failure is terminal and is carried by the error
/// returned from [`publish`], so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ConfigLoaded,
    ModeSelected,
    CaptionResolved,
    MediaResolved,
    MediaUploaded,
    Posted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ConfigLoaded => "config_loaded",
            Stage::ModeSelected => "mode_selected",
            Stage::CaptionResolved => "caption_resolved",
            Stage::MediaResolved => "media_resolved",
            Stage::MediaUploaded => "media_uploaded",
            Stage::Posted => "posted",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "run stage");
}

#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Look up the account handle for the viewer URL instead of using the
    /// `user` placeholder.
    pub resolve_handle: bool,
}

/// Everything needed to publish, resolved before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPlan {
    pub mode: PostMode,
    pub caption: String,
    pub media: Vec<MediaRef>,
}

impl PostPlan {
    /// Select the mode, resolve the caption and the media paths, and print
    /// the pre-post summary.
    pub fn from_config(config: &Config) -> Self {
        enter(Stage::ConfigLoaded);
        let mode = PostMode::select(config);
        enter(Stage::ModeSelected);

        let caption = plan_caption(config, mode);
        enter(Stage::CaptionResolved);

        let media = media::resolve_media(config, mode);
        enter(Stage::MediaResolved);

        media::print_summary(mode, &media);
        match mode {
            PostMode::Video => report_caption(&caption),
            PostMode::Images if media.is_empty() => {
                println!("\nWarning: No images specified in config");
            }
            PostMode::Images => {}
        }

        Self {
            mode,
            caption,
            media,
        }
    }
}

fn plan_caption(config: &Config, mode: PostMode) -> String {
    let base = config.project_folder();
    match mode {
        PostMode::Video => caption::load_caption(Path::new(&config.video.caption_file), base),
        PostMode::Images => match config.caption.file.as_deref() {
            Some(file) if !file.is_empty() => {
                let caption = caption::load_caption(Path::new(file), base);
                report_caption(&caption);
                caption
            }
            _ => String::new(),
        },
    }
}

fn report_caption(caption: &str) {
    if caption.is_empty() {
        println!("\nWarning: No caption loaded");
    } else {
        println!("\nCaption loaded: {} characters", caption.chars().count());
    }
}

/// Upload the plan's media in order and publish the post.
///
/// Missing files are skipped with a warning. Any platform error aborts the
/// run; media already uploaded is left as is.
pub async fn publish<P>(
    plan: &PostPlan,
    platform: &P,
    options: &PublishOptions,
) -> Result<PostResult, PlatformError>
where
    P: Platform + ?Sized,
{
    let media_ids = upload_all(&plan.media, platform).await?;
    enter(Stage::MediaUploaded);

    let preview: String = plan.caption.chars().take(100).collect();
    println!(
        "Posting tweet ({} chars): {preview}...",
        plan.caption.chars().count()
    );

    let attached = (!media_ids.is_empty()).then_some(media_ids.as_slice());
    let post_id = platform.create_post(&plan.caption, attached).await?;
    enter(Stage::Posted);

    let handle = if options.resolve_handle {
        match platform.username().await {
            Ok(username) => username,
            Err(e) => {
                tracing::warn!(error = %e, "handle lookup failed");
                println!("Warning: could not resolve account handle ({e}); using '{PLACEHOLDER_HANDLE}'");
                PLACEHOLDER_HANDLE.to_string()
            }
        }
    } else {
        PLACEHOLDER_HANDLE.to_string()
    };

    let result = PostResult::new(post_id, &handle);
    println!("✓ Tweet posted successfully!");
    println!("Tweet ID: {}", result.post_id);
    println!("URL: {}", result.url);
    Ok(result)
}

async fn upload_all<P>(media: &[MediaRef], platform: &P) -> Result<Vec<MediaId>, PlatformError>
where
    P: Platform + ?Sized,
{
    let mut ids = Vec::with_capacity(media.len());
    for item in media {
        let path = match item.ensure_exists() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "skipping media");
                println!("Warning: {e}");
                continue;
            }
        };

        let label = item.label();
        println!("Uploading {}: {}", label.to_lowercase(), path.display());
        let id = platform.upload_media(path, item.category()).await?;
        println!("{label} uploaded successfully. Media ID: {id}");
        ids.push(id);
    }
    Ok(ids)
}
