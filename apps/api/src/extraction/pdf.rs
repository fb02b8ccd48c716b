use std::any::Any;
use std::panic;

use super::{DocumentError, DocumentFormat};

/// Concatenates the text of every page in page order.
///
/// No separator is inserted between pages, so the last word of one page can run
/// into the first word of the next.
///
/// `pdf_extract` panics on some well-formed but inconsistent files (a font
/// missing from the page resources, an unknown encoding name). Those panics are
/// reported as extraction errors.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|payload| extraction_error(panic_message(payload.as_ref())))?
        .map_err(|e| extraction_error(e.to_string()))?;

    Ok(pages.concat())
}

fn extraction_error(message: String) -> DocumentError {
    DocumentError::Extraction {
        format: DocumentFormat::Pdf,
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("malformed PDF content: {detail}")
}
