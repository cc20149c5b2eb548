//! Render Pipeline - Single Entry Point
//!
//! Every render validates first. No markup is produced for invalid input.

use std::sync::LazyLock;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Color, Rgb};
use crate::config::RenderConfig;
use crate::contrast::pick_text_color;
use crate::error::RenderResult;
use crate::hashing::{compute_request_hash, sha256_hex};
use crate::layout::{compute_layout, LayoutResult};
use crate::markup::{assemble, Appearance};
use crate::seed::{adapt_for_text, color_from_seed};
use crate::validation::{RenderInput, ResolvedConfig, Validator};
use crate::wrap::wrap;
use crate::ENGINE_VERSION;

static DEFAULT_PIPELINE: LazyLock<RenderPipeline> = LazyLock::new(RenderPipeline::new);

/// Render `text` with its own trimmed value as the color seed.
pub fn render(text: &str, config: &RenderConfig) -> RenderResult<String> {
    render_seeded(text, None, config)
}

/// Render `text`, deriving the background from `seed` when given.
pub fn render_seeded(text: &str, seed: Option<&str>, config: &RenderConfig) -> RenderResult<String> {
    DEFAULT_PIPELINE
        .render(&RenderInput { text, seed, config })
        .map(|rendered| rendered.svg)
}

/// Render and describe the result as a content-addressed asset.
pub fn render_asset(request: &RenderRequest) -> RenderResult<RenderedAsset> {
    DEFAULT_PIPELINE.render_asset(request)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub config: RenderConfig,
}

impl RenderRequest {
    pub fn as_input(&self) -> RenderInput<'_> {
        RenderInput {
            text: &self.text,
            seed: self.seed.as_deref(),
            config: &self.config,
        }
    }
}

/// Intermediate result of a render, before packaging.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub svg: String,
    pub background: Color,
    pub text_color: Rgb,
    pub layout: LayoutResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedAsset {
    pub engine_version: String,
    /// sha256 of the canonical request plus engine version; known before rendering.
    pub request_hash: String,
    /// sha256 of the SVG bytes.
    pub content_hash: String,
    pub background: String,
    pub text_color: String,
    pub font_size: u32,
    pub lines: Vec<String>,
    pub data_uri: String,
    pub svg: String,
}

/// The render pipeline - validation, color resolution, wrapping, layout, markup
pub struct RenderPipeline {
    validator: Validator,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self {
            validator: Validator::new(),
        }
    }

    /// Validate without rendering.
    pub fn validate(&self, input: &RenderInput<'_>) -> RenderResult<ResolvedConfig> {
        self.validator.validate(input)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(text_len = input.text.len(), seeded = input.seed.is_some())
    )]
    pub fn render(&self, input: &RenderInput<'_>) -> RenderResult<Rendered> {
        let resolved = self.validate(input)?;
        let text = input.text.trim();

        let (background, text_color) = resolve_colors(&resolved, text, input.seed)?;
        debug!(%background, %text_color, "resolved colors");

        let lines = wrap(
            text,
            resolved.max_lines as usize,
            resolved.layout.max_chars_per_line as usize,
        );
        let layout = compute_layout(lines, &resolved.layout);
        debug!(
            font_size = layout.font_size,
            line_count = layout.lines.len(),
            "computed layout"
        );

        let svg = assemble(
            &layout,
            &Appearance {
                background,
                text_color,
                font_family: resolved.font_family,
                font_weight: resolved.font_weight,
                use_shadow: resolved.use_shadow,
            },
        );

        Ok(Rendered {
            svg,
            background,
            text_color,
            layout,
        })
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn render_asset(&self, request: &RenderRequest) -> RenderResult<RenderedAsset> {
        let rendered = self.render(&request.as_input())?;
        let request_hash = compute_request_hash(request, ENGINE_VERSION)?;
        let content_hash = sha256_hex(rendered.svg.as_bytes());
        let data_uri = format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(rendered.svg.as_bytes())
        );
        debug!(%content_hash, "packaged asset");

        Ok(RenderedAsset {
            engine_version: ENGINE_VERSION.to_string(),
            request_hash,
            content_hash,
            background: rendered.background.to_string(),
            text_color: rendered.text_color.to_string(),
            font_size: rendered.layout.font_size,
            lines: rendered.layout.lines.into_iter().map(|l| l.text).collect(),
            data_uri,
            svg: rendered.svg,
        })
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit colors win. A missing background comes from the seed (or the
/// text); if the text color was forced, that background is adapted to it.
/// A missing text color is picked by contrast.
fn resolve_colors(
    resolved: &ResolvedConfig,
    text: &str,
    seed: Option<&str>,
) -> RenderResult<(Color, Rgb)> {
    let background = match resolved.background {
        Some(color) => color,
        None => {
            let base = color_from_seed(seed.unwrap_or(text))?;
            match resolved.text_color {
                Some(forced) => Color::Hsl(adapt_for_text(base, forced)),
                None => Color::Hsl(base),
            }
        }
    };
    let text_color = resolved
        .text_color
        .unwrap_or_else(|| pick_text_color(background, true));
    Ok((background, text_color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_deterministic() {
        let config = RenderConfig::default();
        let a = render_seeded("Same", Some("same-seed"), &config).unwrap();
        let b = render_seeded("Same", Some("same-seed"), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_is_default_seed() {
        let config = RenderConfig::default();
        let implicit = render("hello-1", &config).unwrap();
        let explicit = render_seeded("hello-1", Some("hello-1"), &config).unwrap();
        assert_eq!(implicit, explicit);
        // Surrounding whitespace does not change the seed.
        assert_eq!(render("  hello-1 ", &config).unwrap(), implicit);
    }

    #[test]
    fn test_explicit_background_untouched_by_forced_text() {
        let config = RenderConfig {
            background_color: Some("hsl(210, 60%, 45%)".into()),
            text_color: Some("#ffffff".into()),
            ..Default::default()
        };
        let rendered = RenderPipeline::new()
            .render(&RenderInput { text: "Hello World", seed: None, config: &config })
            .unwrap();
        assert_eq!(rendered.background.to_string(), "hsl(210, 60%, 45%)");
        assert_eq!(rendered.text_color, Rgb::WHITE);
    }

    #[test]
    fn test_forced_text_adapts_seed_background() {
        let plain = RenderConfig::default();
        let forced = RenderConfig {
            text_color: Some("#ffffff".into()),
            ..Default::default()
        };
        let pipeline = RenderPipeline::new();
        let a = pipeline
            .render(&RenderInput { text: "Hello World", seed: Some("forced-text-2"), config: &plain })
            .unwrap();
        let b = pipeline
            .render(&RenderInput { text: "Hello World", seed: Some("forced-text-2"), config: &forced })
            .unwrap();
        match (a.background, b.background) {
            (Color::Hsl(x), Color::Hsl(y)) => {
                assert_eq!(x.h, y.h);
                assert_eq!(x.s, y.s);
                assert_ne!(x.l, y.l);
            }
            other => panic!("expected seed-derived HSL backgrounds, got {other:?}"),
        }
    }

    #[test]
    fn test_render_asset_manifest() {
        let request = RenderRequest {
            text: "Hello World".into(),
            seed: Some("hello-1".into()),
            config: RenderConfig::default(),
        };
        let asset = render_asset(&request).unwrap();
        assert_eq!(asset.engine_version, ENGINE_VERSION);
        assert_eq!(asset.background, "hsl(181, 46%, 45%)");
        assert_eq!(asset.text_color, "#111111");
        assert_eq!(asset.font_size, 34);
        assert_eq!(asset.lines, vec!["Hello World".to_string()]);
        assert_eq!(asset.content_hash, sha256_hex(asset.svg.as_bytes()));
        assert!(asset.data_uri.starts_with("data:image/svg+xml;base64,PD94bWwg"));

        let again = render_asset(&request).unwrap();
        assert_eq!(asset.request_hash, again.request_hash);
        assert_eq!(asset.content_hash, again.content_hash);
    }

    #[test]
    fn test_request_hash_tracks_inputs() {
        let a = RenderRequest { text: "A".into(), seed: None, config: RenderConfig::default() };
        let b = RenderRequest { text: "B".into(), ..a.clone() };
        assert_ne!(
            render_asset(&a).unwrap().request_hash,
            render_asset(&b).unwrap().request_hash
        );
    }

    #[test]
    fn test_invalid_input_produces_no_output() {
        let config = RenderConfig { padding: 90, ..Default::default() };
        let err = render("Hello", &config).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.field(), Some("padding"));
    }
}
