//! Stage 1: turn uploaded document bytes into raw text for the parser.

mod ocr;
mod pdf;
mod word;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub use ocr::{HttpOcrClient, ImageReader, OcrEngine, OcrOutput};
pub use pdf::PdfReader;
pub use word::WordReader;

use crate::config::Settings;
use crate::error::ExtractionError;
use crate::model::SourceType;

/// Raw text recovered from a document, plus notes about how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredText {
    pub text: String,
    /// Path the text actually took; a scanned PDF comes back as `Ocr`.
    pub source_type: SourceType,
    pub diagnostics: Vec<String>,
}

pub trait DocumentExtractor: Send + Sync {
    fn source_type(&self) -> SourceType;
    fn extract(&self, bytes: &[u8]) -> Result<AcquiredText, ExtractionError>;
}

/// UTF-8 text, decoded lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReader;

impl DocumentExtractor for PlainTextReader {
    fn source_type(&self) -> SourceType {
        SourceType::Text
    }

    fn extract(&self, bytes: &[u8]) -> Result<AcquiredText, ExtractionError> {
        let text = String::from_utf8_lossy(bytes);
        Ok(AcquiredText {
            text: text.trim_start_matches('\u{feff}').to_string(),
            source_type: SourceType::Text,
            diagnostics: Vec::new(),
        })
    }
}

/// Picks an extractor per source type and runs it off the async runtime
/// under a deadline.
#[derive(Clone)]
pub struct Acquirer {
    ocr: Option<Arc<dyn OcrEngine>>,
    min_ocr_confidence: f32,
    timeout: Duration,
}

impl Acquirer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            ocr: None,
            min_ocr_confidence: 0.0,
            timeout,
        }
    }

    pub fn with_ocr(mut self, engine: Arc<dyn OcrEngine>, min_confidence: f32) -> Self {
        self.ocr = Some(engine);
        self.min_ocr_confidence = min_confidence;
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let acquirer = Self::new(settings.extraction_timeout());
        match HttpOcrClient::from_settings(&settings.ocr) {
            Some(client) => acquirer.with_ocr(Arc::new(client), settings.ocr.min_confidence),
            None => acquirer,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn extractor(&self, source_type: SourceType) -> Box<dyn DocumentExtractor> {
        match source_type {
            SourceType::Text => Box::new(PlainTextReader),
            SourceType::Word => Box::new(WordReader),
            SourceType::Pdf => Box::new(PdfReader::new(self.ocr.clone(), self.min_ocr_confidence)),
            SourceType::Image | SourceType::Ocr => Box::new(ImageReader::new(
                self.ocr.clone(),
                self.min_ocr_confidence,
                source_type,
            )),
        }
    }

    /// Synchronous extraction on the calling thread, without the deadline.
    pub fn acquire_blocking(
        &self,
        bytes: &[u8],
        source_type: SourceType,
    ) -> Result<AcquiredText, ExtractionError> {
        self.extractor(source_type).extract(bytes)
    }

    /// Extraction on tokio's blocking pool. A timeout abandons the task and
    /// nothing it produces afterwards is used.
    pub async fn acquire(
        &self,
        bytes: Vec<u8>,
        source_type: SourceType,
    ) -> Result<AcquiredText, ExtractionError> {
        let extractor = self.extractor(source_type);
        debug!(%source_type, bytes = bytes.len(), timeout = ?self.timeout, "acquiring text");

        let task = tokio::task::spawn_blocking(move || extractor.extract(&bytes));
        match tokio::time::timeout(self.timeout, task).await {
            Err(_) => Err(ExtractionError::Timeout(self.timeout)),
            Ok(Err(join)) => Err(ExtractionError::Task(join.to_string())),
            Ok(Ok(result)) => result,
        }
    }
}
