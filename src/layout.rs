//! Layout engine - font sizing, overflow truncation and line placement.
//!
//! No font metrics are consulted. Height is fitted from a fixed line-height
//! ratio; width is left to the renderer through `textLength` on long lines.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::wrap::LineSet;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.18;

/// Lines shorter than this are never width-forced.
pub const MIN_FORCED_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum FontPolicy {
    /// Keep the font size and let `textLength` absorb the width.
    Fixed { size: u32 },
    /// Shrink from `max` towards `min` until the block fits vertically.
    Adaptive { min: u32, max: u32 },
}

/// Validated geometry the layout engine works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutParams {
    pub size: u32,
    pub padding: u32,
    pub max_chars_per_line: u32,
    pub font: FontPolicy,
}

impl LayoutParams {
    pub fn content_size(&self) -> u32 {
        self.size - 2 * self.padding
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    /// Vertical center of the line.
    pub y: f64,
    /// Line must be compressed/stretched to exactly the content width.
    pub force_length: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub canvas_size: u32,
    pub font_size: u32,
    pub line_height: u32,
    pub x: f64,
    pub content_width: u32,
    pub content_height: u32,
    pub lines: Vec<PlacedLine>,
}

pub fn line_height_for(font_size: u32) -> u32 {
    (f64::from(font_size) * LINE_HEIGHT_RATIO).round_ties_even() as u32
}

fn block_height(line_count: usize, line_height: u32) -> u64 {
    line_count as u64 * u64::from(line_height)
}

/// Pick a font size for `line_count` lines within `content_height`.
pub fn fit_font_size(policy: FontPolicy, line_count: usize, content_height: u32) -> u32 {
    match policy {
        FontPolicy::Fixed { size } => size,
        FontPolicy::Adaptive { min, max } => {
            let mut font_size = max;
            while font_size > min
                && block_height(line_count, line_height_for(font_size)) > u64::from(content_height)
            {
                font_size -= 1;
            }
            font_size
        }
    }
}

/// Whether a line is long enough to be width-forced.
pub fn is_length_forced(line: &str, max_chars_per_line: u32) -> bool {
    let threshold = MIN_FORCED_CHARS.max(max_chars_per_line as usize / 2);
    line.chars().count() >= threshold
}

pub fn compute_layout(mut lines: LineSet, params: &LayoutParams) -> LayoutResult {
    let content = params.content_size();
    let font_size = fit_font_size(params.font, lines.len(), content);
    let line_height = line_height_for(font_size);

    while block_height(lines.len(), line_height) > u64::from(content) && lines.drop_last() {
        debug!(remaining = lines.len(), "dropped trailing line to fit canvas height");
    }

    let size = f64::from(params.size);
    let lh = f64::from(line_height);
    let total = lines.len() as f64 * lh;
    let start_y = size / 2.0 - total / 2.0 + lh / 2.0;

    let placed = lines
        .into_vec()
        .into_iter()
        .enumerate()
        .map(|(i, text)| PlacedLine {
            force_length: is_length_forced(&text, params.max_chars_per_line),
            y: start_y + i as f64 * lh,
            text,
        })
        .collect();

    LayoutResult {
        canvas_size: params.size,
        font_size,
        line_height,
        x: size / 2.0,
        content_width: content,
        content_height: content,
        lines: placed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::wrap;

    fn params(font: FontPolicy, max_chars: u32) -> LayoutParams {
        LayoutParams {
            size: 180,
            padding: 10,
            max_chars_per_line: max_chars,
            font,
        }
    }

    #[test]
    fn test_line_height_rounds_half_to_even() {
        assert_eq!(line_height_for(34), 40);
        assert_eq!(line_height_for(25), 30);
        assert_eq!(line_height_for(40), 47);
        assert_eq!(line_height_for(1), 1);
    }

    #[test]
    fn test_fixed_single_line_is_centered() {
        let layout = compute_layout(
            wrap("Hello World", 4, 16),
            &params(FontPolicy::Fixed { size: 34 }, 16),
        );
        assert_eq!(layout.font_size, 34);
        assert_eq!(layout.line_height, 40);
        assert_eq!(layout.x, 90.0);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].y, 90.0);
        assert!(layout.lines[0].force_length);
    }

    #[test]
    fn test_three_lines_stack_around_center() {
        let layout = compute_layout(
            wrap("Banc Solaire Ultra 12", 4, 10),
            &params(FontPolicy::Fixed { size: 34 }, 10),
        );
        let ys: Vec<f64> = layout.lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![50.0, 90.0, 130.0]);
        let forced: Vec<bool> = layout.lines.iter().map(|l| l.force_length).collect();
        assert_eq!(forced, vec![false, true, true]);
    }

    #[test]
    fn test_adaptive_shrinks_until_fit() {
        let lines = wrap("This is a longer text that may need resizing", 4, 14);
        assert_eq!(lines.len(), 4);
        let layout = compute_layout(lines, &params(FontPolicy::Adaptive { min: 16, max: 40 }, 14));
        assert_eq!(layout.font_size, 34);
        let ys: Vec<f64> = layout.lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![30.0, 70.0, 110.0, 150.0]);
    }

    #[test]
    fn test_adaptive_keeps_max_when_it_fits() {
        assert_eq!(fit_font_size(FontPolicy::Adaptive { min: 16, max: 40 }, 1, 160), 40);
    }

    #[test]
    fn test_adaptive_stops_at_min() {
        assert_eq!(fit_font_size(FontPolicy::Adaptive { min: 16, max: 40 }, 20, 160), 16);
        assert_eq!(fit_font_size(FontPolicy::Adaptive { min: 12, max: 12 }, 20, 160), 12);
    }

    #[test]
    fn test_overflow_drops_trailing_lines() {
        let lines = wrap("one two three four", 4, 5);
        assert_eq!(lines.len(), 4);
        let p = LayoutParams {
            size: 100,
            padding: 10,
            max_chars_per_line: 5,
            font: FontPolicy::Fixed { size: 34 },
        };
        let layout = compute_layout(lines, &p);
        let texts: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(layout.lines[0].y, 30.0);
        assert_eq!(layout.lines[1].y, 70.0);
    }

    #[test]
    fn test_overflow_never_drops_last_line() {
        let p = LayoutParams {
            size: 20,
            padding: 5,
            max_chars_per_line: 16,
            font: FontPolicy::Fixed { size: 34 },
        };
        let layout = compute_layout(wrap("Hi", 4, 16), &p);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].y, 10.0);
    }

    #[test]
    fn test_length_forcing_threshold() {
        assert!(!is_length_forced("Hi", 16));
        assert!(!is_length_forced("Hello W", 16));
        assert!(is_length_forced("Hello Wo", 16));
        // Floor of six characters for narrow lines.
        assert!(!is_length_forced("Banc", 4));
        assert!(is_length_forced("Banc12", 4));
        // Integer division of the per-line budget.
        assert!(is_length_forced("abcdefgh", 17));
        assert!(!is_length_forced("abcdefg", 17));
    }
}
