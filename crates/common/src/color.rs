use serde::{Deserialize, Serialize};

/// Errors from parsing a `#rrggbb` color string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have exactly 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digits in color: {0:?}")]
    BadDigits(String),
}

/// 24-bit sRGB color stored as `0xRRGGBB`.
///
/// Serialized as a `#rrggbb` string so configuration files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Normalized RGB in 0..=1 (sRGB encoded).
    pub fn to_rgb(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }

    /// Normalized RGBA with the given alpha.
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, alpha]
    }

    /// Linear-light RGB, for shading in an sRGB render target.
    pub fn to_linear_rgb(self) -> [f32; 3] {
        self.to_rgb().map(srgb_to_linear)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| ColorParseError::BadDigits(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels() {
        let c = Color::from_hex(0x87ceeb);
        assert_eq!((c.r(), c.g(), c.b()), (0x87, 0xce, 0xeb));
    }

    #[test]
    fn display_and_parse_agree() {
        let c = Color::from_hex(0x3a9d23);
        assert_eq!(c.to_string(), "#3a9d23");
        assert_eq!("#3a9d23".parse::<Color>(), Ok(c));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(
            "3a9d23".parse::<Color>(),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            "#3a9d2".parse::<Color>(),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            "#zzzzzz".parse::<Color>(),
            Err(ColorParseError::BadDigits(_))
        ));
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&Color::from_hex(0xff6b6b)).unwrap();
        assert_eq!(json, "\"#ff6b6b\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::from_hex(0xff6b6b));
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::BLACK.to_linear_rgb(), [0.0, 0.0, 0.0]);
        let white = Color::WHITE.to_linear_rgb();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }
}
