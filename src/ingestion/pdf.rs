//! Per-page PDF text extraction

use crate::error::{Error, Result};

/// Text extracted from a single PDF page
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-based page number in the original document
    pub page_number: u32,
    pub text: String,
}

/// Extract text from PDF bytes, one entry per page.
///
/// Pages with no extractable text are dropped; the remaining entries keep
/// their original 1-based page numbers so citations stay accurate.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<PageText>> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    Ok(pages
        .into_iter()
        .enumerate()
        .filter_map(|(i, text)| {
            if text.trim().is_empty() {
                None
            } else {
                Some(PageText {
                    page_number: i as u32 + 1,
                    text,
                })
            }
        })
        .collect())
}
