//! Document text extraction — raw upload bytes to plain text.
//!
//! Pure function of the input bytes. PDF pages are read in order; a page that
//! fails to parse contributes nothing and the rest of the document is kept.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use lopdf::Document;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Resolves a declared file extension (".pdf", "PDF", "txt", ...).
    pub fn from_extension(ext: &str) -> Result<Self, ExtractError> {
        let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            _ => Err(ExtractError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Extension of a file name, including the leading dot.
    pub fn extension_of(file_name: &str) -> Option<&str> {
        file_name.rfind('.').map(|idx| &file_name[idx..])
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ext = match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
            Self::Txt => ".txt",
        };
        f.write_str(ext)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    /// The format is not supported and never will be.
    #[error("unsupported file type '{0}'")]
    UnsupportedFormat(String),

    /// The format is planned but its parser does not exist yet.
    #[error("{0} parsing is not yet supported; please upload PDF or TXT")]
    NotImplemented(DocumentFormat),

    #[error("document could not be parsed: {0}")]
    CorruptDocument(String),
}

/// Converts `bytes` declared as `format` into plain text.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractError> {
    debug!(%format, bytes = bytes.len(), "extracting document text");
    match format {
        DocumentFormat::Txt => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => Err(ExtractError::NotImplemented(DocumentFormat::Docx)),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // lopdf panics on some malformed object streams; treat that as a parse failure.
    let document = catch_unwind(|| Document::load_mem(bytes))
        .map_err(|_| ExtractError::CorruptDocument("PDF parser aborted".to_string()))?
        .map_err(|e| ExtractError::CorruptDocument(e.to_string()))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    let pages = page_numbers.iter().map(|&page| {
        let text = catch_unwind(AssertUnwindSafe(|| document.extract_text(&[page])))
            .map_err(|_| "PDF parser aborted".to_string())
            .and_then(|r| r.map_err(|e| e.to_string()));
        (page, text)
    });

    Ok(join_pages(pages))
}

/// Concatenates page texts in order, one newline after each page.
/// Failed pages are skipped.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = (u32, Result<String, String>)>,
{
    let mut text = String::new();
    let mut kept = 0usize;
    let mut skipped = 0usize;

    for (page, result) in pages {
        match result {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
                kept += 1;
            }
            Err(e) => {
                warn!(page, error = %e, "skipping unreadable PDF page");
                skipped += 1;
            }
        }
    }

    if kept == 0 && skipped > 0 {
        warn!(skipped, "no PDF page could be read; document yields empty text");
    } else {
        debug!(kept, skipped, "PDF extraction finished");
    }
    text
}
