//! Contrast selector - picks white or near-black text for a background.

use crate::color::{Color, Rgb};

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of an sRGB color, in [0, 1].
pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// WCAG contrast ratio between two colors, in [1, 21].
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Return [`Rgb::WHITE`] or [`Rgb::DARK`], whichever contrasts more with
/// `background`. Exact ties go to white when `prefer_white` is set.
pub fn pick_text_color(background: Color, prefer_white: bool) -> Rgb {
    let bg = background.to_rgb();
    let with_white = contrast_ratio(bg, Rgb::WHITE);
    let with_dark = contrast_ratio(bg, Rgb::DARK);

    if with_white > with_dark {
        Rgb::WHITE
    } else if with_dark > with_white {
        Rgb::DARK
    } else if prefer_white {
        Rgb::WHITE
    } else {
        Rgb::DARK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_color;

    fn pick(raw: &str) -> String {
        pick_text_color(parse_color(raw).unwrap(), true).to_string()
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(relative_luminance(Rgb::new(0, 0, 0)), 0.0);
        assert!((relative_luminance(Rgb::WHITE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_contrast_is_symmetric() {
        let a = Rgb::new(0x2e, 0x73, 0xb8);
        assert_eq!(contrast_ratio(a, Rgb::WHITE), contrast_ratio(Rgb::WHITE, a));
        assert!((contrast_ratio(Rgb::new(0, 0, 0), Rgb::WHITE) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_hex_backgrounds() {
        assert_eq!(pick("#000000"), "#ffffff");
        assert_eq!(pick("#ffffff"), "#111111");
        assert_eq!(pick("#333333"), "#ffffff");
        assert_eq!(pick("#cccccc"), "#111111");
    }

    #[test]
    fn test_hsl_backgrounds() {
        assert_eq!(pick("hsl(0, 0%, 0%)"), "#ffffff");
        assert_eq!(pick("hsl(0, 0%, 100%)"), "#111111");
        assert_eq!(pick("hsl(200, 80%, 20%)"), "#ffffff");
        assert_eq!(pick("hsl(200, 80%, 85%)"), "#111111");
        assert_eq!(pick("hsl(181, 46%, 45%)"), "#111111");
        assert_eq!(pick("hsl(316, 60%, 45%)"), "#ffffff");
    }

    #[test]
    fn test_result_is_one_of_two() {
        let picked = pick("#888888");
        assert!(picked == "#ffffff" || picked == "#111111");
    }

    #[test]
    fn test_preference_only_matters_on_ties() {
        let bg = parse_color("#000000").unwrap();
        assert_eq!(pick_text_color(bg, false), Rgb::WHITE);
        let bg = parse_color("#ffffff").unwrap();
        assert_eq!(pick_text_color(bg, true), Rgb::DARK);
    }
}
