#![allow(dead_code)]

use async_trait::async_trait;
use merry_avatar::{
    AvatarError, Clipboard, DownloadSink, EncodedImage, ImageGenerator, ImageReader, Platform,
    Presenter, Result, SharePayload, ShareSheet, UploadFile, WorkflowConfig, WorkflowController,
    WorkflowState,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

pub const MIB: usize = 1024 * 1024;

pub fn jpeg_upload(size: usize) -> UploadFile {
    let mut bytes = vec![0u8; size];
    if size >= 2 {
        bytes[0] = 0xff;
        bytes[1] = 0xd8;
    }
    UploadFile::new("me.jpg", "image/jpeg", bytes)
}

pub fn png_result() -> EncodedImage {
    EncodedImage::from_bytes("image/png", b"\x89PNG festive")
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Warn(String),
    Alert(String),
    ShowToast(String),
    HideToast,
    OpenShareDialog(String),
    CloseShareDialog,
    ScrollToResult,
    ClearFileInput,
    State(WorkflowState),
}

#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: &UiEvent) -> usize {
        self.events().iter().filter(|e| *e == wanted).count()
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn warn(&self, message: &str) {
        self.push(UiEvent::Warn(message.to_string()));
    }

    fn alert(&self, message: &str) {
        self.push(UiEvent::Alert(message.to_string()));
    }

    fn show_toast(&self, message: &str) {
        self.push(UiEvent::ShowToast(message.to_string()));
    }

    fn hide_toast(&self) {
        self.push(UiEvent::HideToast);
    }

    fn open_share_dialog(&self, url: &str) {
        self.push(UiEvent::OpenShareDialog(url.to_string()));
    }

    fn close_share_dialog(&self) {
        self.push(UiEvent::CloseShareDialog);
    }

    fn scroll_to_result(&self) {
        self.push(UiEvent::ScrollToResult);
    }

    fn clear_file_input(&self) {
        self.push(UiEvent::ClearFileInput);
    }

    fn state_changed(&self, state: WorkflowState) {
        self.push(UiEvent::State(state));
    }
}

/// Generator whose answers are released one by one by the test.
#[derive(Default)]
pub struct GatedGenerator {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<EncodedImage>>>>,
    calls: Mutex<Vec<(EncodedImage, String)>>,
}

impl GatedGenerator {
    /// Queues the next call; the returned sender resolves it.
    pub fn gate(&self) -> oneshot::Sender<Result<EncodedImage>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<(EncodedImage, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for GatedGenerator {
    async fn generate(&self, image: &EncodedImage, mime_type: &str) -> Result<EncodedImage> {
        self.calls
            .lock()
            .unwrap()
            .push((image.clone(), mime_type.to_string()));
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(AvatarError::GenerationError("gate dropped".into()))),
            None => Err(AvatarError::GenerationError("no gate queued".into())),
        }
    }
}

/// Reader that waits a per-file delay before encoding, to stage races.
#[derive(Default)]
pub struct DelayedReader {
    delays: Mutex<VecDeque<Duration>>,
}

impl DelayedReader {
    pub fn push_delay(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }
}

#[async_trait]
impl ImageReader for DelayedReader {
    async fn read(&self, file: &UploadFile) -> Result<EncodedImage> {
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or_default();
        tokio::time::sleep(delay).await;
        if file.bytes.is_empty() {
            return Err(AvatarError::DecodeError("empty file".into()));
        }
        Ok(EncodedImage::from_bytes(&file.mime_type, &file.bytes))
    }
}

#[derive(Default)]
pub struct MemoryDownloads {
    saved: Mutex<Vec<(String, EncodedImage)>>,
}

impl MemoryDownloads {
    pub fn saved(&self) -> Vec<(String, EncodedImage)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadSink for MemoryDownloads {
    async fn save(&self, filename: &str, image: &EncodedImage) -> Result<()> {
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), image.clone()));
        Ok(())
    }
}

pub struct FakeShareSheet {
    pub available: bool,
    pub succeed: bool,
    pub calls: AtomicUsize,
}

impl FakeShareSheet {
    pub fn new(available: bool, succeed: bool) -> Self {
        Self {
            available,
            succeed,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShareSheet for FakeShareSheet {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn share(&self, _payload: &SharePayload) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(())
        } else {
            Err(AvatarError::PlatformError("AbortError: share canceled".into()))
        }
    }
}

pub struct FakeClipboard {
    pub succeed: bool,
    pub written: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed,
            written: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if !self.succeed {
            return Err(AvatarError::PlatformError("NotAllowedError".into()));
        }
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub controller: WorkflowController,
    pub generator: Arc<GatedGenerator>,
    pub reader: Arc<DelayedReader>,
    pub presenter: Arc<RecordingPresenter>,
    pub downloads: Arc<MemoryDownloads>,
    pub share_sheet: Arc<FakeShareSheet>,
    pub clipboard: Arc<FakeClipboard>,
}

pub struct HarnessBuilder {
    config: WorkflowConfig,
    share_sheet: FakeShareSheet,
    clipboard: FakeClipboard,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkflowConfig::default().with_page_url("https://avatar.example/"),
            share_sheet: FakeShareSheet::new(true, true),
            clipboard: FakeClipboard::new(true),
        }
    }

    pub fn config(mut self, f: impl FnOnce(WorkflowConfig) -> WorkflowConfig) -> Self {
        self.config = f(self.config);
        self
    }

    pub fn share_sheet(mut self, available: bool, succeed: bool) -> Self {
        self.share_sheet = FakeShareSheet::new(available, succeed);
        self
    }

    pub fn clipboard(mut self, succeed: bool) -> Self {
        self.clipboard = FakeClipboard::new(succeed);
        self
    }

    pub fn build(self) -> Harness {
        let generator = Arc::new(GatedGenerator::default());
        let reader = Arc::new(DelayedReader::default());
        let presenter = Arc::new(RecordingPresenter::default());
        let downloads = Arc::new(MemoryDownloads::default());
        let share_sheet = Arc::new(self.share_sheet);
        let clipboard = Arc::new(self.clipboard);

        let platform = Platform::headless(".")
            .with_reader(reader.clone())
            .with_downloads(downloads.clone())
            .with_share_sheet(share_sheet.clone())
            .with_clipboard(clipboard.clone())
            .with_presenter(presenter.clone());

        Harness {
            controller: WorkflowController::new(generator.clone(), platform, self.config),
            generator,
            reader,
            presenter,
            downloads,
            share_sheet,
            clipboard,
        }
    }
}

impl Harness {
    pub fn new() -> Self {
        HarnessBuilder::new().build()
    }

    pub async fn upload(&self, file: UploadFile) {
        self.controller
            .submit_upload(file)
            .expect("upload accepted")
            .await
            .expect("decode task finished");
    }
}
