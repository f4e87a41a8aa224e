#![cfg(unix)]

use std::{os::unix::fs::PermissionsExt, path::PathBuf, time::Duration};

use ledger::{LedgerError, Ocr, PdfRenderer, TesseractOcr, WkhtmltopdfRenderer};
use uuid::Uuid;

/// Stub tool that sleeps past the timeout and then drops a marker file. If
/// the marker shows up, the process outlived the caller.
fn slow_tool(marker: &std::path::Path) -> PathBuf {
    let script = std::env::temp_dir().join(format!("slow-tool-{}.sh", Uuid::new_v4()));
    std::fs::write(
        &script,
        format!("#!/bin/sh\nsleep 1\ntouch '{}'\n", marker.display()),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[tokio::test]
async fn ocr_timeout_kills_the_tool() {
    let marker = std::env::temp_dir().join(format!("ocr-marker-{}", Uuid::new_v4()));
    let script = slow_tool(&marker);

    let ocr = TesseractOcr::new(&script, Duration::from_millis(100));
    let err = ocr.recognize(b"image bytes").await.unwrap_err();
    assert!(matches!(err, LedgerError::UpstreamTimeout(_)));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(!marker.exists(), "ocr tool outlived its timeout");

    let _ = std::fs::remove_file(script);
}

#[tokio::test]
async fn pdf_timeout_kills_the_tool() {
    let marker = std::env::temp_dir().join(format!("pdf-marker-{}", Uuid::new_v4()));
    let script = slow_tool(&marker);

    let renderer = WkhtmltopdfRenderer::new(&script, Duration::from_millis(100));
    let err = renderer.render("<html></html>").await.unwrap_err();
    assert!(matches!(err, LedgerError::UpstreamTimeout(_)));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(!marker.exists(), "pdf tool outlived its timeout");

    let _ = std::fs::remove_file(script);
}
