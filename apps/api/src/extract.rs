//! TextSource boundary — turns uploaded documents into plain text.
//!
//! Documents are resolved to a tagged kind exactly once, here; the screening
//! core never inspects document internals. Extraction failures of any kind
//! produce an empty string, never an error — the orchestrator decides what
//! an empty extraction means for the current call.

use bytes::Bytes;
use tracing::warn;

/// Resolved document format. Anything else is unsupported and extracts to "".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    Unsupported,
}

/// An uploaded document: raw bytes plus the client-supplied filename.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Resolves the document kind from the filename extension.
    pub fn kind(&self) -> DocumentKind {
        match self
            .name
            .rsplit('.')
            .next()
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("pdf") => DocumentKind::Pdf,
            Some("txt") | Some("text") | Some("md") => DocumentKind::Text,
            _ => DocumentKind::Unsupported,
        }
    }
}

/// Extracts plain text from a document. Returns an empty string on
/// unsupported formats or extraction failure.
pub fn extract_text(document: &UploadedDocument) -> String {
    match document.kind() {
        DocumentKind::Pdf => match pdf_extract::extract_text_from_mem(&document.bytes) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("PDF extraction failed for '{}': {e}", document.name);
                String::new()
            }
        },
        DocumentKind::Text => String::from_utf8_lossy(&document.bytes).trim().to_string(),
        DocumentKind::Unsupported => {
            warn!("Unsupported document format: '{}'", document.name);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_resolves_pdf_case_insensitive() {
        let doc = UploadedDocument::new("resume.PDF", Bytes::new());
        assert_eq!(doc.kind(), DocumentKind::Pdf);
    }

    #[test]
    fn test_kind_resolves_text_variants() {
        for name in ["resume.txt", "resume.text", "notes.md"] {
            let doc = UploadedDocument::new(name, Bytes::new());
            assert_eq!(doc.kind(), DocumentKind::Text, "for {name}");
        }
    }

    #[test]
    fn test_kind_unsupported_for_unknown_extension() {
        let doc = UploadedDocument::new("resume.docx", Bytes::new());
        assert_eq!(doc.kind(), DocumentKind::Unsupported);
    }

    #[test]
    fn test_extract_text_from_plain_text() {
        let doc = UploadedDocument::new(
            "resume.txt",
            Bytes::from_static(b"  Built 3 production React apps.  \n"),
        );
        assert_eq!(extract_text(&doc), "Built 3 production React apps.");
    }

    #[test]
    fn test_extract_text_unsupported_returns_empty() {
        let doc = UploadedDocument::new("resume.docx", Bytes::from_static(b"binary"));
        assert_eq!(extract_text(&doc), "");
    }

    #[test]
    fn test_extract_text_invalid_pdf_returns_empty() {
        let doc = UploadedDocument::new("resume.pdf", Bytes::from_static(b"not a pdf"));
        assert_eq!(extract_text(&doc), "");
    }

    #[test]
    fn test_extract_text_lossy_on_invalid_utf8() {
        let doc = UploadedDocument::new("resume.txt", Bytes::from_static(b"caf\xc3\xa9 \xff"));
        let text = extract_text(&doc);
        assert!(text.starts_with("café"));
    }
}
