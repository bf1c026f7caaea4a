//! Festive avatar maker.
//!
//! Two independent parts share one screen: the [`WorkflowController`], which
//! takes a photo from upload through an image-editing model to download or
//! share, and the [`Snowfall`] animation drifting over everything.

pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod platform;
pub mod snowfall;
pub mod workflow;

pub use config::{AppConfig, GeminiConfig, SnowfallConfig, WorkflowConfig};
pub use error::{AvatarError, Result};
pub use gemini::{GeminiClient, ImageClient};
pub use models::*;
pub use platform::{
    Clipboard, DownloadSink, ImageGenerator, ImageReader, Platform, Presenter, ShareSheet,
};
pub use snowfall::{CharSurface, SnowField, Snowfall, SnowfallHandle, Surface, Viewport};
pub use workflow::{SessionSnapshot, WorkflowController};
