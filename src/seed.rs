//! Seed color generator - deterministic HSL backgrounds from a string seed.
//!
//! The digest is SHA-512 over the UTF-8 seed bytes. Changing the algorithm
//! changes every derived color, so it is fixed for the lifetime of the crate.

use crate::color::{Hsl, Rgb};
use crate::contrast::{contrast_ratio, pick_text_color};
use crate::error::{RenderError, RenderResult};
use crate::hashing::sha512_digest;

pub const SEED_LIGHTNESS: f64 = 45.0;
pub const MIN_SATURATION: f64 = 40.0;
pub const MAX_SATURATION: f64 = 70.0;

/// Contrast a forced text color must reach against an adapted background.
pub const MIN_FORCED_CONTRAST: f64 = 4.5;

/// Derive a background color from `seed`.
///
/// Hue comes from the first digest byte, saturation from the second
/// (40%..=70%), lightness is always 45%. Hue and saturation are rounded to
/// whole numbers so the canonical text form round-trips exactly.
pub fn color_from_seed(seed: &str) -> RenderResult<Hsl> {
    if seed.is_empty() {
        return Err(RenderError::invalid("seed", "seed must be a non-empty string"));
    }
    let digest = sha512_digest(seed.as_bytes());
    let hue = f64::from(digest[0]) * 360.0 / 255.0;
    let saturation =
        f64::from(digest[1]) * ((MAX_SATURATION - MIN_SATURATION) / 255.0) + MIN_SATURATION;

    Ok(Hsl {
        h: hue.round_ties_even(),
        s: saturation.round_ties_even(),
        l: SEED_LIGHTNESS,
    })
}

/// Move the lightness of a seed-derived background so a forced text color
/// stays legible on it. Hue and saturation are left untouched.
///
/// Light text pushes the background darker (44, 43, ... 0), dark text pushes
/// it lighter (46, 47, ... 100). The first step reaching
/// [`MIN_FORCED_CONTRAST`] wins; otherwise the extreme is used.
pub fn adapt_for_text(base: Hsl, text: Rgb) -> Hsl {
    let text_is_light = pick_text_color(text.into(), true) == Rgb::DARK;
    let start = SEED_LIGHTNESS as i32;
    let (step, limit) = if text_is_light { (-1, 0) } else { (1, 100) };

    let mut lightness = start + step;
    loop {
        let candidate = base.with_lightness(f64::from(lightness));
        if lightness == limit || contrast_ratio(candidate.to_rgb(), text) >= MIN_FORCED_CONTRAST {
            return candidate;
        }
        lightness += step;
    }
}
