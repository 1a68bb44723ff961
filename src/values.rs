use crate::error::ValueError;
use crate::named_colors;

/// Straight (non-premultiplied) 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Parses a plain base-10 `i32`.
pub fn parse_integer(token: &str) -> Result<i32, ValueError> {
    if token.is_empty() {
        return Err(ValueError::Empty);
    }
    token
        .parse::<i32>()
        .map_err(|_| ValueError::Integer(token.to_owned()))
}

/// Parses a coordinate that may be given as a fraction of the canvas.
///
/// `0.5w` is half the canvas width and `0.25h` a quarter of its height; such
/// values are truncated toward zero and clamped into `[0, dimension]`. Tokens
/// without a suffix are plain integers and are not clamped.
pub fn parse_relative_integer(token: &str, width: i32, height: i32) -> Result<i32, ValueError> {
    let Some(last) = token.chars().last() else {
        return Err(ValueError::Empty);
    };

    let dimension = match last {
        'w' => width,
        'h' => height,
        _ => return parse_integer(token),
    };

    let prefix = &token[..token.len() - last.len_utf8()];
    let fraction = prefix
        .parse::<f64>()
        .map_err(|_| ValueError::Fraction(token.to_owned()))?;
    // `as` saturates and maps NaN to zero
    let scaled = (fraction * f64::from(dimension)) as i32;
    Ok(scaled.clamp(0, dimension.max(0)))
}

/// Parses `#RGB`, `#RRGGBB`, `#AARRGGBB` or a CSS color name.
pub fn parse_color(token: &str) -> Result<Color, ValueError> {
    let invalid = || ValueError::Color(token.to_owned());

    if token.is_empty() {
        return Err(ValueError::Empty);
    }

    let Some(hex) = token.strip_prefix('#') else {
        if token.eq_ignore_ascii_case("transparent") {
            return Ok(Color::TRANSPARENT);
        }
        let [r, g, b] = named_colors::lookup(token).ok_or_else(invalid)?;
        return Ok(Color::opaque(r, g, b));
    };

    if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let digits = hex.as_bytes();
    let nibble = |index: usize| hex_value(digits[index]);
    let byte = |index: usize| nibble(index) << 4 | nibble(index + 1);

    match digits.len() {
        3 => Ok(Color::opaque(
            nibble(0) * 0x11,
            nibble(1) * 0x11,
            nibble(2) * 0x11,
        )),
        6 => Ok(Color::opaque(byte(0), byte(2), byte(4))),
        8 => Ok(Color {
            a: byte(0),
            r: byte(2),
            g: byte(4),
            b: byte(6),
        }),
        _ => Err(invalid()),
    }
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_parse_is_strict_base_10() {
        assert_eq!(parse_integer("42"), Ok(42));
        assert_eq!(parse_integer("-7"), Ok(-7));
        assert!(parse_integer("4.2").is_err());
        assert!(parse_integer("0x10").is_err());
        assert!(parse_integer("12px").is_err());
        assert_eq!(parse_integer(""), Err(ValueError::Empty));
    }

    #[test]
    fn width_fraction_scales_and_clamps() {
        assert_eq!(parse_relative_integer("0.5w", 200, 80), Ok(100));
        assert_eq!(parse_relative_integer("1.5w", 200, 80), Ok(200));
        assert_eq!(parse_relative_integer("-1w", 200, 80), Ok(0));
        assert_eq!(parse_relative_integer("1w", 200, 80), Ok(200));
    }

    #[test]
    fn height_fraction_uses_height() {
        assert_eq!(parse_relative_integer("0.25h", 200, 80), Ok(20));
        assert_eq!(parse_relative_integer("2h", 200, 80), Ok(80));
    }

    #[test]
    fn fraction_truncates_toward_zero() {
        assert_eq!(parse_relative_integer("0.333w", 100, 100), Ok(33));
        assert_eq!(parse_relative_integer("0.999h", 10, 10), Ok(9));
    }

    #[test]
    fn plain_integers_are_not_clamped() {
        assert_eq!(parse_relative_integer("50", 200, 80), Ok(50));
        assert_eq!(parse_relative_integer("500", 200, 80), Ok(500));
        assert_eq!(parse_relative_integer("-5", 200, 80), Ok(-5));
    }

    #[test]
    fn malformed_relative_tokens_fail() {
        assert_eq!(parse_relative_integer("", 10, 10), Err(ValueError::Empty));
        assert!(matches!(
            parse_relative_integer("w", 10, 10),
            Err(ValueError::Fraction(_))
        ));
        assert!(matches!(
            parse_relative_integer("halfw", 10, 10),
            Err(ValueError::Fraction(_))
        ));
        assert!(matches!(
            parse_relative_integer("0.5", 10, 10),
            Err(ValueError::Integer(_))
        ));
        assert!(parse_relative_integer("0.5W", 10, 10).is_err());
    }

    #[test]
    fn hex_colors_in_all_lengths() {
        assert_eq!(parse_color("#FF0000"), Ok(Color::opaque(255, 0, 0)));
        assert_eq!(parse_color("#0f8"), Ok(Color::opaque(0, 255, 136)));
        assert_eq!(
            parse_color("#80FF0000"),
            Ok(Color {
                r: 255,
                g: 0,
                b: 0,
                a: 128
            })
        );
    }

    #[test]
    fn named_colors_resolve_case_insensitively() {
        assert_eq!(parse_color("Red"), Ok(Color::opaque(255, 0, 0)));
        assert_eq!(parse_color("rebeccapurple"), Ok(Color::opaque(102, 51, 153)));
        assert_eq!(parse_color("Transparent"), Ok(Color::TRANSPARENT));
    }

    #[test]
    fn invalid_colors_fail_without_panicking() {
        for token in ["#12", "#12345", "#GGGGGG", "#+F0000", "reddish", "#", "FF0000"] {
            assert!(
                matches!(parse_color(token), Err(ValueError::Color(_))),
                "{token} should not parse"
            );
        }
        assert_eq!(parse_color(""), Err(ValueError::Empty));
    }
}
