use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Base name of the optional settings file (`menu_parser.toml` etc.).
pub const CONFIG_FILE: &str = "menu_parser";
pub const ENV_PREFIX: &str = "MENU_PARSER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Upper bound on Stage 1 (document to text) per document.
    #[serde(default = "default_extraction_timeout")]
    pub extraction_timeout_secs: u64,
    /// Characters of cleaned text echoed back when parsing finds nothing.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default)]
    pub ocr: OcrSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    /// OCR service URL. Images and scanned PDFs cannot be read without it.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
    /// Below this mean confidence the OCR output is flagged in diagnostics.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

fn default_extraction_timeout() -> u64 {
    60
}

fn default_preview_chars() -> usize {
    200
}

fn default_ocr_timeout() -> u64 {
    30
}

fn default_min_confidence() -> f32 {
    60.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extraction_timeout_secs: default_extraction_timeout(),
            preview_chars: default_preview_chars(),
            ocr: OcrSettings::default(),
        }
    }
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_ocr_timeout(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl Settings {
    /// Load settings, highest priority first:
    /// 1. `MENU_PARSER__*` environment variables (`MENU_PARSER__OCR__ENDPOINT`)
    /// 2. `menu_parser.toml` (or any format `config` recognises) in the working directory
    /// 3. defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

impl OcrSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
