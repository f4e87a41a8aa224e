//! Report exporter: renders a transaction list as CSV text or as an HTML
//! table handed to an external PDF rendering tool.

use std::{path::PathBuf, process::Stdio, time::Duration};

use tokio::io::AsyncWriteExt;

use crate::{LedgerError, Transaction};

/// Builds the CSV report: a header row followed by one row per transaction,
/// amounts rendered with the currency symbol and two decimals.
pub fn transactions_csv(transactions: &[Transaction]) -> Result<String, LedgerError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let fail = |err: String| LedgerError::Upstream(format!("failed to build csv: {err}"));

    writer
        .write_record(["Date", "Category", "Amount", "Description"])
        .map_err(|err| fail(err.to_string()))?;
    for tx in transactions {
        writer
            .write_record([
                tx.occurred_at.format("%Y-%m-%d").to_string(),
                tx.category.clone(),
                tx.amount.to_string(),
                tx.description.clone().unwrap_or_default(),
            ])
            .map_err(|err| fail(err.to_string()))?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| fail(err.to_string()))?;
    String::from_utf8(data).map_err(|err| fail(err.to_string()))
}

/// Builds the HTML document fed to the PDF renderer. Same columns as the CSV
/// report.
pub fn transactions_html(transactions: &[Transaction]) -> String {
    let mut rows = String::new();
    for tx in transactions {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            tx.occurred_at.format("%Y-%m-%d"),
            escape(&tx.category),
            tx.amount,
            escape(tx.description.as_deref().unwrap_or_default()),
        ));
    }

    format!(
        "<html><head><meta charset=\"UTF-8\"><style>\
         body {{ font-family: sans-serif; }}\
         table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}\
         th, td {{ border: 1px solid black; padding: 8px; text-align: left; }}\
         th {{ background-color: #f2f2f2; }}\
         </style></head><body><h2>Transaction History</h2><table>\
         <tr><th>Date</th><th>Category</th><th>Amount</th><th>Description</th></tr>\
         {rows}</table></body></html>"
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Turns an HTML document into rendered PDF bytes.
#[async_trait::async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, LedgerError>;
}

/// [`PdfRenderer`] backed by an external `wkhtmltopdf` binary, path and
/// timeout injected from configuration. HTML goes in on stdin, PDF bytes
/// come back on stdout.
#[derive(Clone, Debug)]
pub struct WkhtmltopdfRenderer {
    program: PathBuf,
    timeout: Duration,
}

impl WkhtmltopdfRenderer {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    async fn run(&self, html: &str) -> Result<std::process::Output, LedgerError> {
        let unavailable = |err: std::io::Error| {
            LedgerError::Upstream(format!("failed to run {}: {err}", self.program.display()))
        };

        // Reap the child if the timeout drops the future mid-run.
        let mut child = tokio::process::Command::new(&self.program)
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(unavailable)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(unavailable)?;
        }

        child.wait_with_output().await.map_err(unavailable)
    }
}

#[async_trait::async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, LedgerError> {
        let output = tokio::time::timeout(self.timeout, self.run(html))
            .await
            .map_err(|_| {
                LedgerError::UpstreamTimeout(format!(
                    "pdf rendering did not finish within {:?}",
                    self.timeout
                ))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LedgerError::Upstream(format!(
                "pdf renderer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}
