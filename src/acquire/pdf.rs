use std::panic;
use std::sync::Arc;

use tracing::{info, warn};

use super::ocr::{ImageReader, OcrEngine};
use super::{AcquiredText, DocumentExtractor};
use crate::error::ExtractionError;
use crate::model::SourceType;

/// Text layer via `pdf-extract`; scanned PDFs with no text layer go to OCR.
pub struct PdfReader {
    ocr: Option<Arc<dyn OcrEngine>>,
    min_ocr_confidence: f32,
}

impl PdfReader {
    pub fn new(ocr: Option<Arc<dyn OcrEngine>>, min_ocr_confidence: f32) -> Self {
        Self {
            ocr,
            min_ocr_confidence,
        }
    }

    fn ocr_fallback(&self, bytes: &[u8], reason: String) -> Result<AcquiredText, ExtractionError> {
        info!(%reason, "falling back to ocr");
        let reader = ImageReader::new(self.ocr.clone(), self.min_ocr_confidence, SourceType::Ocr);
        let mut acquired = reader.extract(bytes)?;
        acquired.diagnostics.insert(0, reason);
        Ok(acquired)
    }
}

impl DocumentExtractor for PdfReader {
    fn source_type(&self) -> SourceType {
        SourceType::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<AcquiredText, ExtractionError> {
        match text_layer(bytes) {
            Ok(text) if !text.trim().is_empty() => Ok(AcquiredText {
                text,
                source_type: SourceType::Pdf,
                diagnostics: Vec::new(),
            }),
            Ok(_) => self.ocr_fallback(bytes, "pdf has no text layer".to_string()),
            Err(e) if self.ocr.is_some() => {
                warn!(error = %e, "pdf text layer unreadable");
                self.ocr_fallback(bytes, format!("pdf text layer unreadable: {e}"))
            }
            Err(e) => Err(e),
        }
    }
}

fn text_layer(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(_) => Err(ExtractionError::Pdf("decoder panicked".to_string())),
    }
}
