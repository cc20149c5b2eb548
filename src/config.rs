//! Render configuration - the typed contract between callers and the engine.
//!
//! Numeric fields are signed so that out-of-range values coming from JSON or
//! the command line reach validation and get a field-specific error instead
//! of a parser error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RenderResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderConfig {
    /// Canvas width and height.
    #[serde(default = "default_size")]
    pub size: i64,
    #[serde(default = "default_padding")]
    pub padding: i64,
    #[serde(default = "default_max_lines")]
    pub max_lines: i64,
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: i64,
    /// CSS-style family list, e.g. `"Open Sans", sans-serif`.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_weight")]
    pub font_weight: i64,
    /// `#rrggbb` or `hsl(H, S%, L%)`. Derived from the seed when absent.
    #[serde(default)]
    pub background_color: Option<String>,
    /// `#rrggbb` only. Picked by contrast when absent.
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default = "default_true")]
    pub fixed_font: bool,
    #[serde(default = "default_fixed_font_size")]
    pub fixed_font_size: i64,
    #[serde(default = "default_max_font_size")]
    pub max_font_size: i64,
    #[serde(default = "default_min_font_size")]
    pub min_font_size: i64,
    #[serde(default = "default_true")]
    pub use_shadow: bool,
}

fn default_true() -> bool { true }
fn default_size() -> i64 { 180 }
fn default_padding() -> i64 { 10 }
fn default_max_lines() -> i64 { 4 }
fn default_max_chars_per_line() -> i64 { 16 }
fn default_font_family() -> String { "sans-serif".to_string() }
fn default_font_weight() -> i64 { 700 }
fn default_fixed_font_size() -> i64 { 34 }
fn default_max_font_size() -> i64 { 40 }
fn default_min_font_size() -> i64 { 16 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            padding: default_padding(),
            max_lines: default_max_lines(),
            max_chars_per_line: default_max_chars_per_line(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            background_color: None,
            text_color: None,
            fixed_font: default_true(),
            fixed_font_size: default_fixed_font_size(),
            max_font_size: default_max_font_size(),
            min_font_size: default_min_font_size(),
            use_shadow: default_true(),
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> RenderResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
