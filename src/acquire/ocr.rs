use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AcquiredText, DocumentExtractor};
use crate::config::OcrSettings;
use crate::error::ExtractionError;
use crate::model::SourceType;

/// What an OCR engine hands back for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrOutput {
    pub text: String,
    /// Mean recognition confidence, 0-100.
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

pub trait OcrEngine: Send + Sync {
    fn recognize(&self, bytes: &[u8]) -> Result<OcrOutput, ExtractionError>;
}

/// OCR over HTTP: POSTs the raw document bytes and expects an [`OcrOutput`] JSON body.
#[derive(Debug, Clone)]
pub struct HttpOcrClient {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpOcrClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `None` when no endpoint is configured.
    pub fn from_settings(settings: &OcrSettings) -> Option<Self> {
        let endpoint = settings.endpoint.as_deref()?.trim();
        if endpoint.is_empty() {
            return None;
        }
        let mut client = Self::new(endpoint).with_timeout(settings.timeout());
        if let Some(key) = &settings.api_key {
            client = client.with_api_key(key.clone());
        }
        Some(client)
    }
}

impl OcrEngine for HttpOcrClient {
    fn recognize(&self, bytes: &[u8]) -> Result<OcrOutput, ExtractionError> {
        // Blocking client is built per call: it must not be created or dropped on an async worker.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let mut request = client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(endpoint = %self.endpoint, bytes = bytes.len(), "sending ocr request");
        let response = request.send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::OcrStatus {
                status: status.as_u16(),
                body,
            });
        }

        let output: OcrOutput = response.json()?;
        debug!(chars = output.text.len(), confidence = output.confidence, "ocr response");
        Ok(output)
    }
}

/// Images (and scans handed over as `ocr`) go straight to the OCR engine.
pub struct ImageReader {
    ocr: Option<Arc<dyn OcrEngine>>,
    min_confidence: f32,
    source_type: SourceType,
}

impl ImageReader {
    pub fn new(ocr: Option<Arc<dyn OcrEngine>>, min_confidence: f32, source_type: SourceType) -> Self {
        Self {
            ocr,
            min_confidence,
            source_type,
        }
    }
}

impl DocumentExtractor for ImageReader {
    fn source_type(&self) -> SourceType {
        self.source_type
    }

    fn extract(&self, bytes: &[u8]) -> Result<AcquiredText, ExtractionError> {
        let engine = self.ocr.as_ref().ok_or(ExtractionError::OcrUnavailable)?;
        let output = engine.recognize(bytes)?;
        if output.text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }

        let mut diagnostics = output.diagnostics;
        if output.confidence < self.min_confidence {
            warn!(
                confidence = output.confidence,
                threshold = self.min_confidence,
                "low ocr confidence"
            );
            diagnostics.push(format!(
                "low ocr confidence {:.1} (threshold {:.1})",
                output.confidence, self.min_confidence
            ));
        }

        Ok(AcquiredText {
            text: output.text,
            source_type: self.source_type,
            diagnostics,
        })
    }
}
