use crate::{
    error::Result,
    models::{EncodedImage, SharePayload, UploadFile, WorkflowState},
};
use async_trait::async_trait;

/// The image-editing backend. Failures are opaque to the workflow.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, image: &EncodedImage, mime_type: &str) -> Result<EncodedImage>;
}

/// Turns a picked file into an `EncodedImage`.
#[async_trait]
pub trait ImageReader: Send + Sync {
    async fn read(&self, file: &UploadFile) -> Result<EncodedImage>;
}

#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, filename: &str, image: &EncodedImage) -> Result<()>;
}

#[async_trait]
pub trait ShareSheet: Send + Sync {
    fn is_available(&self) -> bool;

    /// Errors cover both platform failures and user cancellation.
    async fn share(&self, payload: &SharePayload) -> Result<()>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// User-facing feedback hooks. Calls are fire-and-forget and must not block.
pub trait Presenter: Send + Sync {
    fn warn(&self, message: &str);
    fn alert(&self, message: &str);
    fn show_toast(&self, message: &str);
    fn hide_toast(&self);
    fn open_share_dialog(&self, url: &str);
    fn close_share_dialog(&self);
    fn scroll_to_result(&self);
    fn clear_file_input(&self);
    fn state_changed(&self, state: WorkflowState);
}
