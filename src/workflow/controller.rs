use super::session::{RequestTicket, Session, SessionSnapshot, UploadTicket};
use crate::{
    config::WorkflowConfig,
    error::{AvatarError, Result},
    models::{CopyOutcome, EncodedImage, ShareOutcome, SharePayload, UploadFile, WorkflowState},
    platform::{ImageGenerator, Platform},
};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

pub const TOO_LARGE_WARNING: &str = "Image is too large. Please choose an image under 5MB.";
pub const NOT_AN_IMAGE_WARNING: &str = "Please choose an image file.";
pub const BUSY_WARNING: &str = "Please wait until the current avatar is finished.";
pub const LINK_COPIED: &str = "Link copied to clipboard!";
pub const MANUAL_COPY_ALERT: &str = "Could not auto-copy. Please select and copy the text manually.";

/// Completion handle for work the controller started in the background.
pub type Pending = JoinHandle<()>;

/// Drives one session from upload through generation to download or share.
///
/// Cheap to clone; every clone talks to the same session.
#[derive(Clone)]
pub struct WorkflowController {
    inner: Arc<Inner>,
}

struct Inner {
    session: Mutex<Session>,
    generator: Arc<dyn ImageGenerator>,
    platform: Platform,
    config: WorkflowConfig,
    last_download_ms: AtomicI64,
    toast_seq: AtomicU64,
}

impl Inner {
    // A poisoned lock still holds a consistent session: every mutation is a
    // handful of field writes with no panicking calls in between.
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WorkflowController {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        platform: Platform,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(Session::new()),
                generator,
                platform,
                config,
                last_download_ms: AtomicI64::new(0),
                toast_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.inner.session().state()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.session().snapshot()
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.inner.config
    }

    fn validate(&self, file: &UploadFile) -> Result<()> {
        if !file.is_image() {
            return Err(AvatarError::ValidationError(format!(
                "{} is not an image ({})",
                file.name, file.mime_type
            )));
        }
        if file.size() > self.inner.config.max_upload_bytes {
            return Err(AvatarError::ValidationError(format!(
                "{} is {} bytes, limit is {}",
                file.name,
                file.size(),
                self.inner.config.max_upload_bytes
            )));
        }
        Ok(())
    }

    /// Validates the file and decodes it in the background.
    ///
    /// Rejected files produce a warning and an error; the session is untouched.
    pub fn submit_upload(&self, file: UploadFile) -> Result<Pending> {
        let presenter = &self.inner.platform.presenter;

        if let Err(e) = self.validate(&file) {
            log::warn!("Upload rejected: {}", e);
            presenter.warn(if file.is_image() {
                TOO_LARGE_WARNING
            } else {
                NOT_AN_IMAGE_WARNING
            });
            return Err(e);
        }

        let begun = self.inner.session().begin_upload();
        let ticket = match begun {
            Ok(ticket) => ticket,
            Err(e) => {
                log::warn!("Upload rejected: {}", e);
                presenter.warn(BUSY_WARNING);
                return Err(e);
            }
        };

        log::info!(
            "📤 Reading {} ({} bytes, {})",
            file.name,
            file.size(),
            file.mime_type
        );

        let inner = Arc::clone(&self.inner);
        Ok(tokio::spawn(async move {
            let decoded = inner.platform.reader.read(&file).await;
            Self::finish_upload(&inner, ticket, decoded);
        }))
    }

    fn finish_upload(inner: &Inner, ticket: UploadTicket, decoded: Result<EncodedImage>) {
        let applied = match decoded {
            Ok(image) => inner.session().complete_upload(ticket, image),
            Err(e) => {
                log::error!("Failed to decode upload: {}", e);
                inner.session().fail_upload(ticket)
            }
        };

        if applied {
            let state = inner.session().state();
            log::debug!("Upload {} applied, state is {}", ticket.seq, state);
            inner.platform.presenter.state_changed(state);
        } else {
            log::debug!("Discarding superseded upload {}", ticket.seq);
        }
    }

    /// Starts a generation for the current original image.
    ///
    /// Returns `Ok(None)` when no image has been uploaded yet and
    /// `GenerationInFlight` while another request is running. On success the
    /// state is already `Processing` when this returns.
    pub fn request_generation(&self) -> Result<Option<Pending>> {
        let begun = self.inner.session().begin_generation();
        let (ticket, image) = match begun {
            Ok(Some(begun)) => begun,
            Err(e) => {
                log::warn!("Generation rejected: {}", e);
                return Err(e);
            }
            Ok(None) => {
                log::debug!("No image uploaded, ignoring generation request");
                return Ok(None);
            }
        };

        log::info!("✨ Generation {} started", ticket.id);
        self.inner
            .platform
            .presenter
            .state_changed(WorkflowState::Processing);

        let scroll = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(scroll.config.scroll_delay).await;
            scroll.platform.presenter.scroll_to_result();
        });

        let inner = Arc::clone(&self.inner);
        Ok(Some(tokio::spawn(async move {
            let outcome = Self::run_generation(&inner, &image).await;
            Self::finish_generation(&inner, ticket, outcome);
        })))
    }

    async fn run_generation(inner: &Inner, image: &EncodedImage) -> Result<EncodedImage> {
        let mime_type = image.mime_type();
        let timeout = inner.config.generation_timeout;

        match tokio::time::timeout(timeout, inner.generator.generate(image, mime_type)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AvatarError::Timeout(timeout.as_millis() as u64)),
        }
    }

    fn finish_generation(inner: &Inner, ticket: RequestTicket, outcome: Result<EncodedImage>) {
        match &outcome {
            Err(e) if e.is_generation_failure() => {
                log::error!("❌ Generation {} failed: {}", ticket.id, e)
            }
            Err(e) => log::warn!("Generation {} hit an unexpected error: {}", ticket.id, e),
            Ok(_) => {}
        }

        let applied = inner.session().complete_generation(ticket, outcome);
        match applied {
            Some(state) => {
                log::info!("🎁 Generation {} finished: {}", ticket.id, state);
                inner.platform.presenter.state_changed(state);
            }
            None => log::debug!("Discarding result of abandoned generation {}", ticket.id),
        }
    }

    /// Leaves `Error` for `Idle`, keeping the uploaded image. False elsewhere.
    pub fn retry(&self) -> bool {
        let retried = self.inner.session().retry();
        if retried {
            self.inner.platform.presenter.state_changed(WorkflowState::Idle);
        } else {
            log::debug!("Retry ignored outside the error state");
        }
        retried
    }

    pub fn reset(&self) {
        self.inner.session().reset();
        log::info!("🔄 Session reset");
        let presenter = &self.inner.platform.presenter;
        presenter.clear_file_input();
        presenter.state_changed(WorkflowState::Idle);
    }

    /// Strictly increasing millisecond stamp, so two saves never share a name.
    fn next_download_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = self
            .inner
            .last_download_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }

    /// Saves the generated image. Returns the filename, or `None` when there is
    /// no finished result to save.
    pub async fn download(&self) -> Result<Option<String>> {
        let image = {
            let session = self.inner.session();
            match (session.state(), session.generated_image()) {
                (WorkflowState::Success, Some(image)) => image.clone(),
                _ => return Ok(None),
            }
        };

        let filename = format!("christmas-avatar-{}.png", self.next_download_stamp());
        self.inner
            .platform
            .downloads
            .save(&filename, &image)
            .await
            .map_err(|e| {
                log::error!("Download of {} failed: {}", filename, e);
                e
            })?;
        Ok(Some(filename))
    }

    fn can_share_natively(&self) -> bool {
        let url = self.inner.config.page_url.to_ascii_lowercase();
        let reachable = url.starts_with("http://") || url.starts_with("https://");
        reachable && self.inner.platform.share_sheet.is_available()
    }

    /// Native share when the platform and page allow it, otherwise the dialog.
    pub async fn share(&self) -> ShareOutcome {
        let url = &self.inner.config.page_url;

        if self.can_share_natively() {
            let payload = SharePayload::for_page(url.clone());
            match self.inner.platform.share_sheet.share(&payload).await {
                Ok(()) => return ShareOutcome::Native,
                Err(e) => log::info!("Share failed or cancelled, falling back to dialog: {}", e),
            }
        }

        self.inner.platform.presenter.open_share_dialog(url);
        ShareOutcome::Dialog
    }

    pub fn close_share_dialog(&self) {
        self.inner.platform.presenter.close_share_dialog();
    }

    /// Copies the page link, confirming with a toast that hides itself.
    pub async fn copy_link(&self) -> CopyOutcome {
        let presenter = Arc::clone(&self.inner.platform.presenter);

        if let Err(e) = self
            .inner
            .platform
            .clipboard
            .write_text(&self.inner.config.page_url)
            .await
        {
            log::warn!("Clipboard write failed: {}", e);
            presenter.alert(MANUAL_COPY_ALERT);
            return CopyOutcome::ManualCopyRequired;
        }

        let seq = self.inner.toast_seq.fetch_add(1, Ordering::SeqCst) + 1;
        presenter.show_toast(LINK_COPIED);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.config.toast_duration).await;
            if inner.toast_seq.load(Ordering::SeqCst) == seq {
                inner.platform.presenter.hide_toast();
            }
        });

        CopyOutcome::Copied
    }
}
