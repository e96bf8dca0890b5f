//! Reduced-configuration input: post text and a single optional image taken
//! from `TWEET_TEXT` / `IMAGE_PATH` instead of the caption and media
//! sections of the configuration.

use std::path::PathBuf;

use crate::error::InputError;
use crate::media::{self, MediaRef, PostMode, Rating};
use crate::poster::PostPlan;

pub const TEXT_VAR: &str = "TWEET_TEXT";
pub const IMAGE_VAR: &str = "IMAGE_PATH";
pub const DEFAULT_TEXT: &str = "Hello from x-media-poster!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedInput {
    pub text: String,
    pub image: Option<PathBuf>,
}

impl ReducedInput {
    /// Build the input from a variable lookup. An unset `TWEET_TEXT` uses the
    /// default greeting; one that is set but blank is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InputError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = lookup(TEXT_VAR).unwrap_or_else(|| DEFAULT_TEXT.to_string());
        if text.trim().is_empty() {
            return Err(InputError::EmptyText);
        }

        let image = lookup(IMAGE_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { text, image })
    }

    pub fn into_plan(self) -> PostPlan {
        let images: Vec<MediaRef> = self
            .image
            .into_iter()
            .map(|path| MediaRef::image(path, Rating::Sfw))
            .collect();

        media::print_summary(PostMode::Images, &images);

        PostPlan {
            mode: PostMode::Images,
            caption: self.text,
            media: images,
        }
    }
}
