//! Hex color strings.

/// Parse `#RRGGBB` or `RRGGBB`. Missing or malformed digit pairs read as 0.
pub fn hex_to_rgb(hex: &str) -> [u8; 3] {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let channel = |i: usize| {
        digits
            .get(i * 2..i * 2 + 2)
            .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0)
    };
    [channel(0), channel(1), channel(2)]
}

/// Format as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!(hex_to_rgb("#00ff00"), [0, 255, 0]);
        assert_eq!(hex_to_rgb("0000FF"), [0, 0, 255]);
        assert_eq!(hex_to_rgb("  #123456 "), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_malformed_digits_read_as_zero() {
        assert_eq!(hex_to_rgb("#zz8000"), [0, 128, 0]);
        assert_eq!(hex_to_rgb("#+f8000"), [0, 128, 0]);
        assert_eq!(hex_to_rgb("#ff"), [255, 0, 0]);
        assert_eq!(hex_to_rgb(""), [0, 0, 0]);
        // 'é' is two bytes, so it occupies the first pair on its own
        assert_eq!(hex_to_rgb("#é12345"), [0, 0x12, 0x34]);
        assert_eq!(hex_to_rgb("#1é2345"), [0, 0, 0x34]);
    }

    #[test]
    fn test_format_round_trip() {
        assert_eq!(rgb_to_hex([0, 255, 16]), "#00ff10");
        assert_eq!(hex_to_rgb(&rgb_to_hex([1, 2, 3])), [1, 2, 3]);
    }
}
