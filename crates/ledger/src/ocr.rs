//! Bill ingestion: OCR seam and total-amount extraction.
//!
//! The image pipeline is a black box behind the [`Ocr`] trait; the production
//! implementation shells out to a configuration-injected `tesseract` binary.
//! [`extract_total`] is the pure rule that pulls a single monetary total out
//! of whatever free text the OCR produced.

use std::{path::PathBuf, process::Stdio, sync::LazyLock, time::Duration};

use regex::Regex;
use uuid::Uuid;

use crate::{LedgerError, MoneyCents};

/// Labels that introduce the bill total, followed by a numeral with optional
/// thousands separators and exactly two decimal places.
static TOTAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?:NET AMOUNT|TOTAL AMOUNT|GRAND TOTAL|AMOUNT PAYABLE)[^\d]*([\d,]+\.\d{2})")
        .expect("total pattern is a valid regex")
});

/// Extracts the bill total from OCR text.
///
/// Matching is done on the uppercased text; the first labeled amount wins.
pub fn extract_total(text: &str) -> Result<MoneyCents, LedgerError> {
    let upper = text.to_uppercase();
    let captured = TOTAL_PATTERN
        .captures(&upper)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| LedgerError::ExtractionFailed("no total amount detected".to_string()))?;

    captured
        .as_str()
        .parse::<MoneyCents>()
        .map_err(|_| LedgerError::ExtractionFailed("unparsable total amount".to_string()))
}

/// Turns raw image bytes into text.
#[async_trait::async_trait]
pub trait Ocr: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, LedgerError>;
}

/// [`Ocr`] implementation backed by an external `tesseract` binary.
///
/// The binary path and the call timeout come from configuration; an
/// unavailable tool is an explicit [`LedgerError::Upstream`], a slow one a
/// retryable [`LedgerError::UpstreamTimeout`].
#[derive(Clone, Debug)]
pub struct TesseractOcr {
    program: PathBuf,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Ocr for TesseractOcr {
    async fn recognize(&self, image: &[u8]) -> Result<String, LedgerError> {
        let image_path = std::env::temp_dir().join(format!("bill-{}.img", Uuid::new_v4()));
        tokio::fs::write(&image_path, image)
            .await
            .map_err(|err| LedgerError::Upstream(format!("failed to stage bill image: {err}")))?;

        // Reap the child if the timeout drops the future mid-run.
        let run = tokio::process::Command::new(&self.program)
            .arg(&image_path)
            .arg("stdout")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run).await;
        let _ = tokio::fs::remove_file(&image_path).await;

        let output = match output {
            Err(_) => {
                return Err(LedgerError::UpstreamTimeout(format!(
                    "ocr did not finish within {:?}",
                    self.timeout
                )));
            }
            Ok(Err(err)) => {
                return Err(LedgerError::Upstream(format!(
                    "failed to run {}: {err}",
                    self.program.display()
                )));
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LedgerError::Upstream(format!(
                "ocr exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_labeled_total() {
        let amount = extract_total("Thanks for shopping\nGRAND TOTAL ₹1,234.56\n").unwrap();
        assert_eq!(amount.cents(), 123456);
    }

    #[test]
    fn extraction_is_case_insensitive_and_takes_first_match() {
        let amount = extract_total("net amount: 42.00\ntotal amount 99.99").unwrap();
        assert_eq!(amount.cents(), 4200);
    }

    #[test]
    fn all_labels_are_recognized() {
        for label in [
            "NET AMOUNT",
            "TOTAL AMOUNT",
            "GRAND TOTAL",
            "AMOUNT PAYABLE",
        ] {
            let amount = extract_total(&format!("{label} 10.00")).unwrap();
            assert_eq!(amount.cents(), 1000, "label {label}");
        }
    }

    #[test]
    fn missing_label_fails_extraction() {
        let err = extract_total("SUBTOTAL 12.00\nTHANK YOU").unwrap_err();
        assert!(matches!(err, LedgerError::ExtractionFailed(_)));
    }

    #[test]
    fn amount_without_decimals_fails_extraction() {
        let err = extract_total("GRAND TOTAL 1234").unwrap_err();
        assert!(matches!(err, LedgerError::ExtractionFailed(_)));
    }
}
