//! Document Extractor — turns an uploaded PDF or DOCX payload into plain text.
//!
//! The caller declares the format at the boundary; extraction is a pure mapping
//! per format with no content sniffing.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod docx;
pub mod pdf;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported document format '{0}' (expected PDF or DOCX)")]
    UnsupportedFormat(String),

    #[error("could not read {format} document: {message}")]
    Extraction {
        format: DocumentFormat,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Maps a declared media type. Parameters such as `; charset=...` are ignored.
    pub fn from_mime(mime: &str) -> Result<Self, DocumentError> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => Ok(DocumentFormat::Pdf),
            DOCX_MIME => Ok(DocumentFormat::Docx),
            _ => Err(DocumentError::UnsupportedFormat(mime.to_string())),
        }
    }

    /// Fallback for uploads without a usable content type.
    pub fn from_file_name(name: &str) -> Result<Self, DocumentError> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(DocumentError::UnsupportedFormat(name.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::Docx => f.write_str("DOCX"),
        }
    }
}

/// An uploaded resume: raw bytes plus the format the caller declared.
/// Consumed once by [`extract`].
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

impl SourceDocument {
    pub fn new(format: DocumentFormat, bytes: impl Into<Bytes>) -> Self {
        Self {
            format,
            bytes: bytes.into(),
        }
    }
}

/// Extracts plain text from the document.
///
/// A zero-byte payload is an empty document and yields empty text for either format.
pub fn extract(document: SourceDocument) -> Result<String, DocumentError> {
    if document.bytes.is_empty() {
        return Ok(String::new());
    }

    let text = match document.format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(&document.bytes)?,
        DocumentFormat::Docx => docx::extract_docx_text(&document.bytes)?,
    };

    debug!(
        "Extracted {} chars from {} document ({} bytes)",
        text.chars().count(),
        document.format,
        document.bytes.len()
    );
    Ok(text)
}
