//! Validation System - ordered, fail-fast rules
//!
//! Rules run in a fixed order and the first violation is returned. Each rule
//! parses its fields once and records the typed values in a [`ConfigDraft`];
//! nothing is rendered until every rule passes and the draft is complete.

use crate::color::{parse_color, parse_hex, Color, Rgb};
use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::layout::{FontPolicy, LayoutParams};

pub const MIN_FONT_WEIGHT: i64 = 1;
pub const MAX_FONT_WEIGHT: i64 = 1000;

/// Everything a render call receives from its caller.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub text: &'a str,
    pub seed: Option<&'a str>,
    pub config: &'a RenderConfig,
}

/// A configuration that passed every rule, with typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub layout: LayoutParams,
    pub max_lines: u32,
    pub font_family: String,
    pub font_weight: u32,
    pub background: Option<Color>,
    pub text_color: Option<Rgb>,
    pub use_shadow: bool,
}

/// Typed values collected while the rules run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDraft {
    pub size: Option<u32>,
    pub padding: Option<u32>,
    pub max_lines: Option<u32>,
    pub max_chars_per_line: Option<u32>,
    pub font_weight: Option<u32>,
    pub font_family: Option<String>,
    pub font: Option<FontPolicy>,
    pub background: Option<Color>,
    pub text_color: Option<Rgb>,
}

fn required<T>(field: &'static str, value: Option<T>) -> RenderResult<T> {
    value.ok_or_else(|| RenderError::invalid(field, "was not resolved by any validation rule"))
}

impl ConfigDraft {
    /// Assemble the resolved config once every rule has passed.
    pub fn finish(self, config: &RenderConfig) -> RenderResult<ResolvedConfig> {
        Ok(ResolvedConfig {
            layout: LayoutParams {
                size: required("size", self.size)?,
                padding: required("padding", self.padding)?,
                max_chars_per_line: required("max_chars_per_line", self.max_chars_per_line)?,
                font: required("font_size", self.font)?,
            },
            max_lines: required("max_lines", self.max_lines)?,
            font_family: required("font_family", self.font_family)?,
            font_weight: required("font_weight", self.font_weight)?,
            background: self.background,
            text_color: self.text_color,
            use_shadow: config.use_shadow,
        })
    }
}

/// Validation rule trait - reports the first problem it finds and records
/// the values it parsed
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()>;
}

fn at_least(field: &'static str, value: i64, min: i64) -> RenderResult<u32> {
    if value < min {
        return Err(RenderError::invalid(
            field,
            format!("must be an integer >= {min}, got {value}"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| RenderError::invalid(field, format!("{value} is too large")))
}

fn background_color(raw: Option<&str>) -> RenderResult<Option<Color>> {
    raw.map(|c| parse_color(c).map_err(|e| RenderError::invalid("background_color", e.to_string())))
        .transpose()
}

fn text_color(raw: Option<&str>) -> RenderResult<Option<Rgb>> {
    raw.map(|c| parse_hex(c).map_err(|e| RenderError::invalid("text_color", e.to_string())))
        .transpose()
}

fn font_policy(config: &RenderConfig) -> RenderResult<FontPolicy> {
    if config.fixed_font {
        let size = at_least("fixed_font_size", config.fixed_font_size, 1)?;
        return Ok(FontPolicy::Fixed { size });
    }
    let min = at_least("min_font_size", config.min_font_size, 1)?;
    let max = at_least("max_font_size", config.max_font_size, 1)?;
    if min > max {
        return Err(RenderError::invalid(
            "min_font_size",
            format!("min font size {min} exceeds max font size {max}"),
        ));
    }
    Ok(FontPolicy::Adaptive { min, max })
}

/// Check a CSS-style font family list.
///
/// Entries are comma separated. Each is either quoted (matching `"` or `'`,
/// non-empty, no inner quote of the same kind) or an unquoted identifier of
/// ASCII letters, digits, `-` and `_`, where a backslash escapes the next
/// character.
pub fn check_font_family(family: &str) -> Result<(), String> {
    if family.trim().is_empty() {
        return Err("font family must not be empty".to_string());
    }
    for entry in family.split(',').map(str::trim) {
        if entry.is_empty() {
            return Err(format!("empty entry in font family list `{family}`"));
        }
        let quote = entry.chars().next().filter(|c| *c == '"' || *c == '\'');
        match quote {
            Some(q) => {
                let inner = entry
                    .strip_prefix(q)
                    .and_then(|rest| rest.strip_suffix(q))
                    .ok_or_else(|| format!("unterminated quoted family {entry}"))?;
                if inner.trim().is_empty() || inner.contains(q) {
                    return Err(format!("invalid quoted family {entry}"));
                }
            }
            None => check_unquoted_family(entry)?,
        }
    }
    Ok(())
}

fn check_unquoted_family(entry: &str) -> Result<(), String> {
    let mut chars = entry.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return Err(format!("dangling escape in family `{entry}`"));
                }
            }
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => {}
            c if c.is_whitespace() => {
                return Err(format!("unquoted family `{entry}` contains spaces; quote it"));
            }
            c => return Err(format!("unquoted family `{entry}` contains `{c}`")),
        }
    }
    Ok(())
}

// --- Concrete Rules ---

pub struct TextRule;

impl ValidationRule for TextRule {
    fn name(&self) -> &'static str { "text" }

    fn check(&self, input: &RenderInput<'_>, _draft: &mut ConfigDraft) -> RenderResult<()> {
        if input.text.trim().is_empty() {
            return Err(RenderError::invalid(self.name(), "display text must not be empty"));
        }
        Ok(())
    }
}

pub struct CanvasRule;

impl ValidationRule for CanvasRule {
    fn name(&self) -> &'static str { "canvas" }

    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()> {
        let size = at_least("size", input.config.size, 1)?;
        let padding = at_least("padding", input.config.padding, 0)?;
        if u64::from(padding) * 2 >= u64::from(size) {
            return Err(RenderError::invalid(
                "padding",
                format!("2 * padding ({padding}) must be smaller than size ({size})"),
            ));
        }
        draft.size = Some(size);
        draft.padding = Some(padding);
        Ok(())
    }
}

pub struct WrapLimitsRule;

impl ValidationRule for WrapLimitsRule {
    fn name(&self) -> &'static str { "wrap_limits" }

    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()> {
        draft.max_lines = Some(at_least("max_lines", input.config.max_lines, 1)?);
        draft.max_chars_per_line =
            Some(at_least("max_chars_per_line", input.config.max_chars_per_line, 1)?);
        Ok(())
    }
}

pub struct FontWeightRule;

impl ValidationRule for FontWeightRule {
    fn name(&self) -> &'static str { "font_weight" }

    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()> {
        let weight = input.config.font_weight;
        if !(MIN_FONT_WEIGHT..=MAX_FONT_WEIGHT).contains(&weight) {
            return Err(RenderError::invalid(
                self.name(),
                format!("must be within [{MIN_FONT_WEIGHT}, {MAX_FONT_WEIGHT}], got {weight}"),
            ));
        }
        draft.font_weight = Some(weight as u32);
        Ok(())
    }
}

pub struct FontFamilyRule;

impl ValidationRule for FontFamilyRule {
    fn name(&self) -> &'static str { "font_family" }

    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()> {
        check_font_family(&input.config.font_family)
            .map_err(|message| RenderError::invalid(self.name(), message))?;
        draft.font_family = Some(input.config.font_family.clone());
        Ok(())
    }
}

/// HSL is accepted for the background but not for the text color.
pub struct ColorRule;

impl ValidationRule for ColorRule {
    fn name(&self) -> &'static str { "colors" }

    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()> {
        draft.background = background_color(input.config.background_color.as_deref())?;
        draft.text_color = text_color(input.config.text_color.as_deref())?;
        Ok(())
    }
}

/// Without an explicit background there must be a usable seed. Reads the
/// background recorded by [`ColorRule`], so it must run after it.
pub struct SeedRule;

impl ValidationRule for SeedRule {
    fn name(&self) -> &'static str { "seed" }

    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()> {
        if draft.background.is_some() {
            return Ok(());
        }
        let seed = input.seed.unwrap_or_else(|| input.text.trim());
        if seed.is_empty() {
            return Err(RenderError::invalid(
                self.name(),
                "no background color and no non-empty seed to derive one",
            ));
        }
        Ok(())
    }
}

pub struct FontSizeRule;

impl ValidationRule for FontSizeRule {
    fn name(&self) -> &'static str { "font_size" }

    fn check(&self, input: &RenderInput<'_>, draft: &mut ConfigDraft) -> RenderResult<()> {
        draft.font = Some(font_policy(input.config)?);
        Ok(())
    }
}

/// Validator runs every rule in order and stops at the first failure
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule + Send + Sync>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(TextRule),
                Box::new(CanvasRule),
                Box::new(WrapLimitsRule),
                Box::new(FontWeightRule),
                Box::new(FontFamilyRule),
                Box::new(ColorRule),
                Box::new(SeedRule),
                Box::new(FontSizeRule),
            ],
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, input: &RenderInput<'_>) -> RenderResult<ResolvedConfig> {
        let mut draft = ConfigDraft::default();
        for rule in &self.rules {
            rule.check(input, &mut draft)?;
        }
        draft.finish(input.config)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
