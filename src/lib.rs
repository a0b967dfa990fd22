//! Menu documents (PDF, Word, scanned images, plain text) to structured menus:
//! sections, items, prices, dietary and allergen tags, and a confidence score.

pub mod acquire;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;

pub use acquire::{AcquiredText, Acquirer, DocumentExtractor};
pub use config::Settings;
pub use error::ExtractionError;
pub use model::{MenuItem, MenuSection, ParseResult, ParsingQuality, SourceType, Summary};
pub use parser::MenuParser;
