//! Color space math
//!
//! Hex parsing and formatting, WCAG relative luminance, and the two distance
//! metrics used for similarity: Euclidean distance in RGB and CIE76 delta-E
//! in L*a*b*. Everything here is a pure function over [`Rgb`] values.

use crate::core::error::{ContrastError, Result};
use palette::{FromColor, Lab, Srgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear-segment threshold of the sRGB transfer curve (WCAG 2.x value)
const SRGB_LINEAR_THRESHOLD: f64 = 0.03928;

/// Luminance weights for the linearized R, G and B channels
const LUMINANCE_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Largest possible RGB distance, between black and white
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// A 24-bit sRGB color
///
/// Parsed from and serialized as `#rrggbb`. Input is case-insensitive and the
/// leading `#` is optional; output is always lowercase with the `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800`, `FF8800` or `#Ff8800`
    pub fn from_hex(hex: &str) -> Result<Self> {
        hex_to_rgb(hex)
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        rgb_to_hex(self)
    }

    /// Channels as an array, in R, G, B order
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn from_channels(channels: [u8; 3]) -> Self {
        Self::new(channels[0], channels[1], channels[2])
    }

    /// Pack into a 24-bit integer (`0xRRGGBB`)
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack from the low 24 bits of an integer
    pub const fn from_u32(value: u32) -> Self {
        Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    /// WCAG relative luminance in [0, 1]
    pub fn luminance(self) -> f64 {
        relative_luminance(self)
    }

    /// Convert to CIE L*a*b* (D65)
    pub fn to_lab(self) -> Lab {
        let srgb: Srgb<f32> = Srgb::new(self.r, self.g, self.b).into_format();
        Lab::from_color(srgb)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ContrastError;

    fn from_str(s: &str) -> Result<Self> {
        hex_to_rgb(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ContrastError;

    fn try_from(value: String) -> Result<Self> {
        hex_to_rgb(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Parse `#RRGGBB` (the `#` is optional) into an [`Rgb`].
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ContrastError::InvalidColorFormat(hex.to_string()));
    }

    let value = u32::from_str_radix(digits, 16)
        .map_err(|_| ContrastError::InvalidColorFormat(hex.to_string()))?;
    Ok(Rgb::from_u32(value))
}

/// Format an [`Rgb`] as lowercase `#rrggbb`.
pub fn rgb_to_hex(color: Rgb) -> String {
    color.to_string()
}

/// Linearize one 0-255 sRGB channel
fn linearize(channel: u8) -> f64 {
    let v = f64::from(channel) / 255.0;
    if v <= SRGB_LINEAR_THRESHOLD {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance: weighted sum of the linearized channels.
///
/// Returns 0.0 for black and 1.0 for white.
pub fn relative_luminance(color: Rgb) -> f64 {
    color
        .channels()
        .iter()
        .zip(LUMINANCE_WEIGHTS)
        .map(|(&c, w)| w * linearize(c))
        .sum()
}

/// Euclidean distance between two colors in RGB space, in [0, ~441.67].
pub fn rgb_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// CIE76 delta-E: Euclidean distance between the L*a*b* forms of two colors.
pub fn lab_distance(a: Rgb, b: Rgb) -> f64 {
    let la = a.to_lab();
    let lb = b.to_lab();
    let dl = f64::from(la.l - lb.l);
    let da = f64::from(la.a - lb.a);
    let db = f64::from(la.b - lb.b);
    (dl * dl + da * da + db * db).sqrt()
}
