//! TextSVG Core - Deterministic Text Avatar Compiler
//!
//! # Guarantees
//! 1. Same text, seed and config give byte-identical SVG
//! 2. Validation runs before any rendering, first violation wins
//! 3. No fonts, files, network or environment are consulted
//! 4. Every stage is a pure function; no shared mutable state

pub mod error;
pub mod color;
pub mod seed;
pub mod contrast;
pub mod wrap;
pub mod layout;
pub mod markup;
pub mod config;
pub mod validation;
pub mod hashing;
pub mod pipeline;

pub use error::{RenderError, RenderResult};
pub use color::{parse_color, Color, ColorError, Hsl, Rgb};
pub use seed::{adapt_for_text, color_from_seed};
pub use contrast::{contrast_ratio, pick_text_color, relative_luminance};
pub use wrap::{wrap, LineSet};
pub use layout::{compute_layout, FontPolicy, LayoutParams, LayoutResult, PlacedLine};
pub use markup::{assemble, escape_markup, Appearance};
pub use config::RenderConfig;
pub use validation::{ConfigDraft, RenderInput, ResolvedConfig, Validator};
pub use hashing::{canonical_json, compute_request_hash, sha256_hex};
pub use pipeline::{render, render_asset, render_seeded, RenderPipeline, RenderRequest, RenderedAsset};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
