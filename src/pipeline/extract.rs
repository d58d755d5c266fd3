//! Text extraction from uploaded files.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, warn};

use crate::error::ExtractError;

/// Extract plain text from an uploaded file, dispatching on its name suffix.
///
/// `.txt` is decoded as UTF-8, falling back to Latin-1. `.pdf` goes through
/// the PDF text extractor. Unsupported types and extraction failures yield an
/// empty string, which the caller treats as "no text".
pub fn extract_text_from_file(filename: &str, bytes: &[u8]) -> String {
    let name = filename.to_lowercase();

    if name.ends_with(".txt") {
        decode_text(bytes)
    } else if name.ends_with(".pdf") {
        pdf_to_text(bytes).unwrap_or_else(|e| {
            warn!(filename, error = %e, "PDF extraction failed");
            String::new()
        })
    } else {
        debug!(filename, "Ignoring upload of unsupported type");
        String::new()
    }
}

/// UTF-8 when valid, otherwise ISO-8859-1.
fn decode_text(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        encoding_rs::mem::decode_latin1(bytes).into_owned()
    } else {
        text.into_owned()
    }
}

/// Extract the text layer of an in-memory PDF.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String, ExtractError> {
    // The extractor panics on some malformed documents.
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("extractor panicked".to_string())),
    }
}
