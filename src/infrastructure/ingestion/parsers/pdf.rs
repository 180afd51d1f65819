//! PDF document parser

use lopdf::{Document, Object};
use tracing::{debug, warn};

use crate::domain::ingestion::{DocumentMetadata, DocumentParser, ParsedDocument};
use crate::domain::DomainError;

/// Parser extracting text from PDF files page by page.
///
/// A page whose text cannot be extracted yields an empty string rather
/// than failing the whole document. Encrypted files are readable only when
/// the user password is empty.
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
        let info = match doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => doc.get_object(*id).ok()?,
            other => other,
        };

        match info.as_dict().ok()?.get(key).ok()? {
            Object::String(bytes, _) => {
                let text = decode_pdf_string(bytes);
                (!text.trim().is_empty()).then(|| text.trim().to_string())
            }
            _ => None,
        }
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a BOM, otherwise
/// treated as Latin-1 compatible bytes
fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

impl DocumentParser for PdfParser {
    fn parse(&self, bytes: &[u8], filename: &str) -> Result<ParsedDocument, DomainError> {
        let mut doc = Document::load_mem(bytes).map_err(|e| {
            DomainError::extraction(format!("Failed to read PDF {}: {}", filename, e))
        })?;

        // Owner-password-only files open with the empty user password
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| {
                DomainError::extraction(format!("PDF {} is encrypted: {}", filename, e))
            })?;
            debug!(file = %filename, "Decrypted PDF with empty user password");
        }

        let pages: Vec<String> = doc
            .get_pages()
            .keys()
            .map(|&number| match doc.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    warn!(file = %filename, page = number, error = %e, "No text extracted from page");
                    String::new()
                }
            })
            .collect();

        let mut metadata = DocumentMetadata::new(pages.len());
        if let Some(title) = Self::info_string(&doc, b"Title") {
            metadata = metadata.with_title(title);
        }
        if let Some(author) = Self::info_string(&doc, b"Author") {
            metadata = metadata.with_author(author);
        }

        Ok(ParsedDocument::new(pages, metadata))
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}
