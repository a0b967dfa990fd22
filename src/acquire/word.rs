use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{AcquiredText, DocumentExtractor};
use crate::error::ExtractionError;
use crate::model::SourceType;

const DOCUMENT_XML: &str = "word/document.xml";

/// DOCX body text: paragraphs in order, then each table row flattened to one
/// `" | "`-joined line.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordReader;

impl DocumentExtractor for WordReader {
    fn source_type(&self) -> SourceType {
        SourceType::Word
    }

    fn extract(&self, bytes: &[u8]) -> Result<AcquiredText, ExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_XML)?
            .read_to_string(&mut xml)
            .map_err(ZipError::from)?;

        let body = parse_body(&xml)?;
        debug!(
            paragraphs = body.paragraphs.len(),
            table_rows = body.table_rows.len(),
            "read docx body"
        );

        let mut diagnostics = Vec::new();
        if !body.table_rows.is_empty() {
            diagnostics.push(format!("flattened {} table rows", body.table_rows.len()));
        }
        let mut lines = body.paragraphs;
        lines.extend(body.table_rows);

        Ok(AcquiredText {
            text: lines.join("\n"),
            source_type: SourceType::Word,
            diagnostics,
        })
    }
}

#[derive(Debug, Default)]
struct DocxBody {
    paragraphs: Vec<String>,
    table_rows: Vec<String>,
}

fn parse_body(xml: &str) -> Result<DocxBody, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut body = DocxBody::default();

    let mut table_depth = 0usize;
    let mut in_text = false;
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut row: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tr" if table_depth == 1 => row.clear(),
                b"w:tc" if table_depth == 1 => cell.clear(),
                b"w:p" => paragraph.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" | b"w:br" => paragraph.push(' '),
                _ => {}
            },
            Event::Text(t) if in_text => paragraph.push_str(&t.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = paragraph.trim();
                    if table_depth == 0 {
                        if !text.is_empty() {
                            body.paragraphs.push(text.to_string());
                        }
                    } else if !text.is_empty() {
                        if !cell.is_empty() {
                            cell.push(' ');
                        }
                        cell.push_str(text);
                    }
                    paragraph.clear();
                }
                b"w:tc" if table_depth == 1 => row.push(std::mem::take(&mut cell)),
                b"w:tr" if table_depth == 1 => {
                    let cells: Vec<&str> = row
                        .iter()
                        .map(|c| c.trim())
                        .filter(|c| !c.is_empty())
                        .collect();
                    if !cells.is_empty() {
                        body.table_rows.push(cells.join(" | "));
                    }
                    row.clear();
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(body)
}
