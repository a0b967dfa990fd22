use std::time::Duration;

/// Stage 1 failure: the document could not be turned into text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("pdf text extraction failed: {0}")]
    Pdf(String),

    #[error("invalid docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("malformed docx xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("ocr request failed: {0}")]
    Ocr(#[from] reqwest::Error),

    #[error("ocr service returned {status}: {body}")]
    OcrStatus { status: u16, body: String },

    #[error("document needs ocr but no ocr endpoint is configured")]
    OcrUnavailable,

    #[error("no text could be extracted from the document")]
    Empty,

    #[error("text extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("extraction task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            ExtractionError::Empty.to_string(),
            "no text could be extracted from the document"
        );
        assert_eq!(
            ExtractionError::Timeout(Duration::from_secs(2)).to_string(),
            "text extraction timed out after 2s"
        );
        let e = ExtractionError::OcrStatus {
            status: 503,
            body: "busy".into(),
        };
        assert_eq!(e.to_string(), "ocr service returned 503: busy");
    }
}
