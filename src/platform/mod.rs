pub mod traits;

use crate::{
    error::{AvatarError, Result},
    models::{EncodedImage, SharePayload, UploadFile, WorkflowState},
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub use traits::{Clipboard, DownloadSink, ImageGenerator, ImageReader, Presenter, ShareSheet};

/// Every capability the workflow controller talks to.
#[derive(Clone)]
pub struct Platform {
    pub reader: Arc<dyn ImageReader>,
    pub downloads: Arc<dyn DownloadSink>,
    pub share_sheet: Arc<dyn ShareSheet>,
    pub clipboard: Arc<dyn Clipboard>,
    pub presenter: Arc<dyn Presenter>,
}

impl Platform {
    /// Headless defaults: base64 reader, downloads into `download_dir`,
    /// no share sheet, no clipboard, feedback through the log.
    pub fn headless(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            reader: Arc::new(Base64ImageReader),
            downloads: Arc::new(FsDownloadSink::new(download_dir)),
            share_sheet: Arc::new(NoShareSheet),
            clipboard: Arc::new(NoClipboard),
            presenter: Arc::new(LogPresenter),
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn ImageReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_downloads(mut self, downloads: Arc<dyn DownloadSink>) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn with_share_sheet(mut self, share_sheet: Arc<dyn ShareSheet>) -> Self {
        self.share_sheet = share_sheet;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }
}

pub struct Base64ImageReader;

#[async_trait]
impl ImageReader for Base64ImageReader {
    async fn read(&self, file: &UploadFile) -> Result<EncodedImage> {
        let mime_type = file.mime_type.clone();
        let bytes = file.bytes.clone();
        tokio::task::spawn_blocking(move || EncodedImage::from_bytes(&mime_type, &bytes))
            .await
            .map_err(|e| AvatarError::DecodeError(e.to_string()))
    }
}

pub struct FsDownloadSink {
    dir: PathBuf,
}

impl FsDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn save(&self, filename: &str, image: &EncodedImage) -> Result<()> {
        let (_, bytes) = image.decode()?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AvatarError::PlatformError(e.to_string()))?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AvatarError::PlatformError(e.to_string()))?;
        log::info!("💾 Image saved to: {}", path.display());
        Ok(())
    }
}

pub struct NoShareSheet;

#[async_trait]
impl ShareSheet for NoShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<()> {
        Err(AvatarError::PlatformError("native share is not available".into()))
    }
}

pub struct NoClipboard;

#[async_trait]
impl Clipboard for NoClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(AvatarError::PlatformError("clipboard is not available".into()))
    }
}

pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn warn(&self, message: &str) {
        log::warn!("⚠️  {}", message);
    }

    fn alert(&self, message: &str) {
        log::warn!("🔔 {}", message);
    }

    fn show_toast(&self, message: &str) {
        log::info!("✅ {}", message);
    }

    fn hide_toast(&self) {
        log::debug!("Toast dismissed");
    }

    fn open_share_dialog(&self, url: &str) {
        log::info!("🔗 Share this link with friends: {}", url);
    }

    fn close_share_dialog(&self) {
        log::debug!("Share dialog closed");
    }

    fn scroll_to_result(&self) {
        log::debug!("Scrolling to result area");
    }

    fn clear_file_input(&self) {
        log::debug!("File input cleared");
    }

    fn state_changed(&self, state: WorkflowState) {
        log::info!("🎄 Workflow state: {}", state);
    }
}
