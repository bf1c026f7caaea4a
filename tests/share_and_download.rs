mod support;

use merry_avatar::{CopyOutcome, ShareOutcome};
use std::time::Duration;
use support::{jpeg_upload, png_result, Harness, HarnessBuilder, UiEvent};

async fn finished() -> Harness {
    let h = Harness::new();
    h.upload(jpeg_upload(1024)).await;
    h.generator.gate().send(Ok(png_result())).unwrap();
    h.controller.request_generation().unwrap().unwrap().await.unwrap();
    h
}

#[tokio::test]
async fn test_download_saves_generated_image() {
    let h = finished().await;
    let filename = h.controller.download().await.unwrap().unwrap();

    assert!(filename.starts_with("christmas-avatar-"));
    assert!(filename.ends_with(".png"));
    let stamp = &filename["christmas-avatar-".len()..filename.len() - ".png".len()];
    assert!(stamp.parse::<i64>().is_ok(), "stamp {:?}", stamp);

    let saved = h.downloads.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].1, png_result());
}

#[tokio::test]
async fn test_repeated_downloads_get_unique_names() {
    let h = finished().await;
    let mut names = Vec::new();
    for _ in 0..4 {
        names.push(h.controller.download().await.unwrap().unwrap());
    }
    let mut deduped = names.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len());
}

#[tokio::test]
async fn test_download_before_success_is_noop() {
    let h = Harness::new();
    h.upload(jpeg_upload(1024)).await;
    assert_eq!(h.controller.download().await.unwrap(), None);
    assert!(h.downloads.saved().is_empty());
}

#[tokio::test]
async fn test_native_share() {
    let h = Harness::new();
    assert_eq!(h.controller.share().await, ShareOutcome::Native);
    assert_eq!(h.share_sheet.calls(), 1);
    assert!(h.presenter.events().is_empty());
}

#[tokio::test]
async fn test_share_on_file_origin_skips_native_share() {
    let h = HarnessBuilder::new()
        .config(|c| c.with_page_url("file:///Users/me/index.html"))
        .build();

    assert_eq!(h.controller.share().await, ShareOutcome::Dialog);
    assert_eq!(h.share_sheet.calls(), 0);
    assert_eq!(
        h.presenter.events(),
        vec![UiEvent::OpenShareDialog("file:///Users/me/index.html".into())]
    );
}

#[tokio::test]
async fn test_cancelled_share_falls_back_to_dialog() {
    let h = HarnessBuilder::new().share_sheet(true, false).build();
    assert_eq!(h.controller.share().await, ShareOutcome::Dialog);
    assert_eq!(h.share_sheet.calls(), 1);
    assert_eq!(
        h.presenter.count(&UiEvent::OpenShareDialog("https://avatar.example/".into())),
        1
    );
}

#[tokio::test]
async fn test_unavailable_share_sheet_opens_dialog() {
    let h = HarnessBuilder::new().share_sheet(false, true).build();
    assert_eq!(h.controller.share().await, ShareOutcome::Dialog);
    assert_eq!(h.share_sheet.calls(), 0);

    h.controller.close_share_dialog();
    assert_eq!(h.presenter.count(&UiEvent::CloseShareDialog), 1);
}

#[tokio::test(start_paused = true)]
async fn test_copy_link_shows_toast_then_hides_it() {
    let h = Harness::new();
    assert_eq!(h.controller.copy_link().await, CopyOutcome::Copied);
    assert_eq!(
        h.clipboard.written.lock().unwrap().clone(),
        vec!["https://avatar.example/".to_string()]
    );
    assert_eq!(
        h.presenter.count(&UiEvent::ShowToast("Link copied to clipboard!".into())),
        1
    );

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert_eq!(h.presenter.count(&UiEvent::HideToast), 0);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.presenter.count(&UiEvent::HideToast), 1);
}

#[tokio::test(start_paused = true)]
async fn test_newer_toast_is_not_hidden_by_older_timer() {
    let h = Harness::new();
    h.controller.copy_link().await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    h.controller.copy_link().await;

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(h.presenter.count(&UiEvent::HideToast), 0);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.presenter.count(&UiEvent::HideToast), 1);
}

#[tokio::test]
async fn test_clipboard_failure_asks_for_manual_copy() {
    let h = HarnessBuilder::new().clipboard(false).build();
    assert_eq!(h.controller.copy_link().await, CopyOutcome::ManualCopyRequired);
    assert_eq!(
        h.presenter.events(),
        vec![UiEvent::Alert(
            "Could not auto-copy. Please select and copy the text manually.".into()
        )]
    );
}
