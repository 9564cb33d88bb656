use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color, encoded on the wire as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Errors from parsing a hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("color {0:?} must start with '#'")]
    MissingHash(String),
    #[error("color {0:?} must have 3 or 6 hex digits")]
    BadLength(String),
    #[error("color {0:?} contains a non-hex digit")]
    BadDigit(String),
}

impl Rgb {
    /// Neutral gray used when a payload omits or garbles a color.
    pub const FALLBACK: Rgb = Rgb::new(0x88, 0x88, 0x88);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the short `#rgb` form.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(s.to_string()));
        }
        let channel = |i: usize, n: usize| {
            u8::from_str_radix(&digits[i..i + n], 16).map_err(|_| ColorError::BadDigit(s.into()))
        };
        match digits.len() {
            6 => Ok(Self::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            3 => {
                let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(ColorError::BadLength(s.to_string())),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Multiply every channel by `factor`, rounding down.
    pub fn dim(self, factor: f64) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (f64::from(c) * f).floor() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Mix `over` onto `self` with the given opacity.
    pub fn blend(self, over: Rgb, alpha: f32) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |under: u8, top: u8| {
            (f32::from(under) + (f32::from(top) - f32::from(under)) * a).round() as u8
        };
        Self::new(mix(self.r, over.r), mix(self.g, over.g), mix(self.b, over.b))
    }

    /// Relative luminance in `0.0..=1.0` using the Rec. 601 weights.
    pub fn luminance(self) -> f32 {
        (0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b))
            / 255.0
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrast_text(self) -> Rgb {
        if self.luminance() > 0.5 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// Deserialize a payload color, substituting [`Rgb::FALLBACK`] for anything
/// missing or unparseable.
pub fn lenient<'de, D>(deserializer: D) -> Result<Rgb, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| Rgb::from_hex(&s).ok())
        .unwrap_or(Rgb::FALLBACK))
}

pub fn fallback() -> Rgb {
    Rgb::FALLBACK
}
