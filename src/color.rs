//! Color codec - parse, validate and canonically format hex and HSL colors.
//!
//! Only two syntaxes are accepted: `#rrggbb` and `hsl(H, S%, L%)`.
//! Named colors, `rgb()` and short hex are rejected.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static HSL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let num = r"([+-]?(?:\d+(?:\.\d*)?|\.\d+))";
    Regex::new(&format!(
        r"^\s*hsl\(\s*{num}\s*,\s*{num}\s*%\s*,\s*{num}\s*%\s*\)\s*$"
    ))
    .expect("static HSL pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("`{0}` is neither #rrggbb nor hsl(H, S%, L%)")]
    Syntax(String),

    #[error("`{0}` must be a #rrggbb hex color")]
    NotHex(String),

    #[error("HSL {component} must lie in [0, 100], got {value}")]
    OutOfRange { component: &'static str, value: f64 },

    #[error("HSL {0} component is not a finite number")]
    NotFinite(&'static str),
}

/// An sRGB color as three bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const DARK: Rgb = Rgb::new(0x11, 0x11, 0x11);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode(self.channels()))
    }
}

/// Hue in degrees (any finite value, wraps mod 360), saturation and
/// lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Result<Self, ColorError> {
        if !h.is_finite() {
            return Err(ColorError::NotFinite("hue"));
        }
        for (component, value) in [("saturation", s), ("lightness", l)] {
            if !value.is_finite() {
                return Err(ColorError::NotFinite(component));
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(ColorError::OutOfRange { component, value });
            }
        }
        Ok(Self { h, s, l })
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }

    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self.h, self.s, self.l)
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            format_rounded(self.h),
            format_rounded(self.s),
            format_rounded(self.l)
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Hex(Rgb),
    Hsl(Hsl),
}

impl Color {
    pub fn to_rgb(self) -> Rgb {
        match self {
            Color::Hex(rgb) => rgb,
            Color::Hsl(hsl) => hsl.to_rgb(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(rgb) => rgb.fmt(f),
            Color::Hsl(hsl) => hsl.fmt(f),
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Hex(rgb)
    }
}

impl From<Hsl> for Color {
    fn from(hsl: Hsl) -> Self {
        Color::Hsl(hsl)
    }
}

/// Colors compare by their canonical textual form.
impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

pub fn parse_color(raw: &str) -> Result<Color, ColorError> {
    if raw.starts_with('#') {
        return parse_hex(raw).map(Color::Hex);
    }
    let caps = HSL_PATTERN
        .captures(raw)
        .ok_or_else(|| ColorError::Syntax(raw.to_string()))?;
    let component = |i: usize| -> f64 { caps[i].parse().unwrap_or(f64::NAN) };
    Hsl::new(component(1), component(2), component(3)).map(Color::Hsl)
}

/// Parse an exact `#rrggbb` value, case-insensitively.
pub fn parse_hex(raw: &str) -> Result<Rgb, ColorError> {
    let digits = raw
        .strip_prefix('#')
        .filter(|d| d.len() == 6)
        .ok_or_else(|| ColorError::NotHex(raw.to_string()))?;
    let mut bytes = [0u8; 3];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| ColorError::NotHex(raw.to_string()))?;
    Ok(Rgb::new(bytes[0], bytes[1], bytes[2]))
}

/// Standard HSL to RGB conversion; hue wraps mod 360.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

/// Format a real as a rounded integer (ties to even), never as `-0`.
pub(crate) fn format_rounded(value: f64) -> String {
    let text = format!("{:.0}", value);
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}
