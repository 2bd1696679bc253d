//! Color notations accepted in theme values.
//!
//! - hexadecimal: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
//! - named colors (case-insensitive)
//! - `rgb(r, g, b)` and `rgba(r, g, b, a)`; channels are numbers 0-255 or
//!   percentages, alpha is a number 0-1 or a percentage. Out of range values
//!   are clamped.

use dashstyle_actor::ColorValue;

/// Named colors: the basic HTML set plus the extras themes commonly use.
const NAMED_COLORS: &[(&str, ColorValue)] = &[
    ("transparent", ColorValue::TRANSPARENT),
    ("black", ColorValue::BLACK),
    ("white", ColorValue::WHITE),
    ("red", ColorValue::rgb(255, 0, 0)),
    ("green", ColorValue::rgb(0, 128, 0)),
    ("blue", ColorValue::rgb(0, 0, 255)),
    ("yellow", ColorValue::rgb(255, 255, 0)),
    ("gray", ColorValue::rgb(128, 128, 128)),
    ("grey", ColorValue::rgb(128, 128, 128)),
    ("aqua", ColorValue::rgb(0, 255, 255)),
    ("cyan", ColorValue::rgb(0, 255, 255)),
    ("fuchsia", ColorValue::rgb(255, 0, 255)),
    ("magenta", ColorValue::rgb(255, 0, 255)),
    ("lime", ColorValue::rgb(0, 255, 0)),
    ("maroon", ColorValue::rgb(128, 0, 0)),
    ("navy", ColorValue::rgb(0, 0, 128)),
    ("olive", ColorValue::rgb(128, 128, 0)),
    ("purple", ColorValue::rgb(128, 0, 128)),
    ("silver", ColorValue::rgb(192, 192, 192)),
    ("teal", ColorValue::rgb(0, 128, 128)),
    ("orange", ColorValue::rgb(255, 165, 0)),
    ("pink", ColorValue::rgb(255, 192, 203)),
    ("brown", ColorValue::rgb(165, 42, 42)),
    ("darkgray", ColorValue::rgb(169, 169, 169)),
    ("darkgrey", ColorValue::rgb(169, 169, 169)),
    ("lightgray", ColorValue::rgb(211, 211, 211)),
    ("lightgrey", ColorValue::rgb(211, 211, 211)),
    ("dimgray", ColorValue::rgb(105, 105, 105)),
    ("dimgrey", ColorValue::rgb(105, 105, 105)),
    ("skyblue", ColorValue::rgb(135, 206, 235)),
    ("steelblue", ColorValue::rgb(70, 130, 180)),
    ("gold", ColorValue::rgb(255, 215, 0)),
];

/// Parse any supported color notation.
#[must_use]
pub fn parse_color(text: &str) -> Option<ColorValue> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return from_hex(hex);
    }
    if let Some(open) = text.find('(') {
        let name = text[..open].trim();
        let args = text[open + 1..].strip_suffix(')')?;
        return parse_rgb_function(name, args);
    }
    from_named(text)
}

/// Parse 3, 4, 6 or 8 hexadecimal digits. Short forms replicate each digit.
#[must_use]
pub fn from_hex(hex: &str) -> Option<ColorValue> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let short = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(ColorValue::rgb(short(0)?, short(1)?, short(2)?)),
        4 => Some(ColorValue::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Some(ColorValue::rgb(long(0)?, long(2)?, long(4)?)),
        8 => Some(ColorValue::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
        _ => None,
    }
}

/// Look up a named color.
#[must_use]
pub fn from_named(name: &str) -> Option<ColorValue> {
    NAMED_COLORS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|&(_, color)| color)
}

/// `rgb(...)` / `rgba(...)` with comma or whitespace separated arguments.
fn parse_rgb_function(name: &str, args: &str) -> Option<ColorValue> {
    if !name.eq_ignore_ascii_case("rgb") && !name.eq_ignore_ascii_case("rgba") {
        return None;
    }

    let args: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|a| !a.is_empty())
        .collect();

    let (r, g, b, a) = match args.as_slice() {
        [r, g, b] => (r, g, b, None),
        [r, g, b, a] => (r, g, b, Some(a)),
        _ => return None,
    };

    let alpha = match a {
        Some(a) => alpha_to_u8(a)?,
        None => 255,
    };
    Some(ColorValue::rgba(
        channel_to_u8(r)?,
        channel_to_u8(g)?,
        channel_to_u8(b)?,
        alpha,
    ))
}

/// A channel: number 0-255 or percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(arg: &str) -> Option<u8> {
    let v = match arg.strip_suffix('%') {
        Some(p) => p.parse::<f64>().ok()? * 255.0 / 100.0,
        None => arg.parse::<f64>().ok()?,
    };
    v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
}

/// Alpha: number 0-1 or percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_to_u8(arg: &str) -> Option<u8> {
    let v = match arg.strip_suffix('%') {
        Some(p) => p.parse::<f64>().ok()? / 100.0,
        None => arg.parse::<f64>().ok()?,
    };
    v.is_finite().then(|| (v * 255.0).round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hex_replicates_digits() {
        assert_eq!(from_hex("f80"), Some(ColorValue::rgb(0xff, 0x88, 0x00)));
        assert_eq!(from_hex("f808"), Some(ColorValue::rgba(0xff, 0x88, 0x00, 0x88)));
    }

    #[test]
    fn test_rejects_bad_hex() {
        assert_eq!(from_hex("ggg"), None);
        assert_eq!(from_hex("12345"), None);
        // Multi-byte input must not panic on slicing
        assert_eq!(from_hex("é12"), None);
    }

    #[test]
    fn test_rgba_alpha_is_a_fraction() {
        assert_eq!(
            parse_color("rgba(10, 20, 30, 0.5)"),
            Some(ColorValue::rgba(10, 20, 30, 128))
        );
        assert_eq!(
            parse_color("rgb(100%, 0%, 0%)"),
            Some(ColorValue::rgb(255, 0, 0))
        );
        assert_eq!(parse_color("rgb(1, 2)"), None);
        assert_eq!(parse_color("hsl(1, 2, 3)"), None);
    }
}
