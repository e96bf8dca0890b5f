//! Post an image set or a video preview to X from a project configuration.
//!
//! The binary loads a [`config::Config`], builds a [`poster::PostPlan`]
//! (mode, caption, media paths) and hands it to [`poster::publish`] with an
//! authenticated [`platform::x::XClient`].

pub mod caption;
pub mod config;
pub mod error;
pub mod media;
pub mod paths;
pub mod platform;
pub mod poster;
pub mod reduced;

pub use config::{Config, Credentials, load_config};
pub use error::{CaptionError, ConfigError, InputError, MediaError, PlatformError};
pub use poster::{PostPlan, PublishOptions, publish};
