//! Markup assembler - turns a resolved layout into the final SVG string.
//!
//! The output is a single line with single-quoted attributes. Its exact byte
//! sequence is part of the contract (callers hash and snapshot it), so the
//! attribute order below must not change.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::color::{format_rounded, Color, Rgb};
use crate::layout::LayoutResult;

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>";
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const SHADOW_ID: &str = "tshadow";

/// Everything about the look of the image that is not geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub background: Color,
    pub text_color: Rgb,
    pub font_family: String,
    pub font_weight: u32,
    pub use_shadow: bool,
}

/// Escape the five XML-reserved characters.
pub fn escape_markup(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn shadow_defs() -> String {
    format!(
        "<defs><filter id='{SHADOW_ID}' x='-20%' y='-20%' width='140%' height='140%'>\
         <feDropShadow dx='0' dy='1' stdDeviation='1.2' flood-opacity='0.35'/>\
         </filter></defs>"
    )
}

pub fn assemble(layout: &LayoutResult, look: &Appearance) -> String {
    let size = layout.canvas_size;
    let mut svg = String::with_capacity(512 + layout.lines.len() * 256);

    svg.push_str(XML_DECLARATION);
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        "<svg width='{size}' height='{size}' viewBox='0 0 {size} {size}' xmlns='{SVG_NAMESPACE}'>"
    );
    if look.use_shadow {
        svg.push_str(&shadow_defs());
    }
    let _ = write!(
        svg,
        "<rect width='{size}' height='{size}' fill='{}'/>",
        look.background
    );

    let family = escape_markup(&look.font_family);
    let x = format_rounded(layout.x);
    for line in &layout.lines {
        let _ = write!(
            svg,
            "<text fill='{}' font-size='{}' font-weight='{}' text-anchor='middle' \
             dominant-baseline='middle' font-family='{}' x='{}' y='{}'",
            look.text_color,
            layout.font_size,
            look.font_weight,
            family,
            x,
            format_rounded(line.y)
        );
        if line.force_length {
            let _ = write!(
                svg,
                " textLength='{}' lengthAdjust='spacingAndGlyphs'",
                layout.content_width
            );
        }
        if look.use_shadow {
            let _ = write!(svg, " filter='url(#{SHADOW_ID})'");
        }
        let _ = write!(svg, ">{}</text>", escape_markup(&line.text));
    }

    svg.push_str("</svg>");
    svg
}
