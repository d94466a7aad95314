//! Plain-text extraction from uploaded resume files.

use bytes::Bytes;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("unsupported file type '{0}' (expected .pdf, .txt or .md)")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("file contains no readable text")]
    Empty,

    #[error("could not read file")]
    Aborted,
}

/// Extracts text based on the file extension. PDFs go through `pdf_extract`;
/// text files are decoded as UTF-8, replacing invalid sequences.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        "txt" | "md" => String::from_utf8_lossy(bytes).into_owned(),
        _ => return Err(ExtractError::UnsupportedFormat(extension)),
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

/// Runs `extract_text` on the blocking pool. PDF parsing is CPU-bound and a
/// panic inside the parser surfaces as `ExtractError::Aborted`.
pub async fn extract_text_blocking(file_name: &str, data: Bytes) -> Result<String, ExtractError> {
    let name = file_name.to_string();
    tokio::task::spawn_blocking(move || extract_text(&name, &data))
        .await
        .unwrap_or_else(|e| {
            error!("Text extraction for {file_name} aborted: {e}");
            Err(ExtractError::Aborted)
        })
}

/// Collapses runs of blank lines and trims trailing spaces left by PDF layout.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Maps a file name to the content type used when storing the original.
pub fn content_type_for(file_name: &str) -> &'static str {
    match file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("md") => "text/markdown",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
