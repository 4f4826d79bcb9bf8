use std::{fmt::Display, str::FromStr};

use fxhash::FxHashMap;
use palette::{FromColor, Lab, Lch, Srgb, color_difference::Ciede2000 as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MetricKind;

/// A raw sensor sample, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RgbRepr", into = "RgbRepr")]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RgbParseError {
    #[error("Invalid hex color `{0}`, expected `#rrggbb`")]
    InvalidHex(String),
}

/// Scans either list the channels or use the `#rrggbb` shorthand.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Channels([u8; 3]),
    Hex(String),
}

impl Rgb {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RgbParseError::InvalidHex(s.to_owned());
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = RgbParseError;

    fn try_from(value: RgbRepr) -> Result<Self, Self::Error> {
        match value {
            RgbRepr::Channels([red, green, blue]) => Ok(Rgb::new(red, green, blue)),
            RgbRepr::Hex(hex) => hex.parse(),
        }
    }
}

impl From<Rgb> for RgbRepr {
    fn from(value: Rgb) -> Self {
        RgbRepr::Channels([value.red, value.green, value.blue])
    }
}

/// A sample converted to CIE Lab. Equality and hashing only look at the raw
/// sample the Lab value was derived from.
#[derive(Debug, Clone, Copy)]
pub struct PerceptualColor {
    rgb: Rgb,
    lab: Lab,
}

impl PerceptualColor {
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Self {
        let srgb = Srgb::new(
            f32::from(rgb.red) / 255.0,
            f32::from(rgb.green) / 255.0,
            f32::from(rgb.blue) / 255.0,
        );
        PerceptualColor {
            rgb,
            lab: Lab::from_color(srgb),
        }
    }

    #[must_use]
    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    #[must_use]
    pub fn lab(&self) -> Lab {
        self.lab
    }
}

impl From<Rgb> for PerceptualColor {
    fn from(value: Rgb) -> Self {
        PerceptualColor::from_rgb(value)
    }
}

impl PartialEq for PerceptualColor {
    fn eq(&self, other: &Self) -> bool {
        self.rgb == other.rgb
    }
}

impl Eq for PerceptualColor {}

impl std::hash::Hash for PerceptualColor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rgb.hash(state);
    }
}

/// A perceptual distance between two colors. Implementations must return a
/// non-negative value that is zero for identical colors; smaller means more
/// similar.
pub trait ColorMetric {
    fn distance(&self, a: &PerceptualColor, b: &PerceptualColor) -> f64;
}

/// CIEDE2000 color difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaE2000;

/// CMC l:c color difference. The raw formula weights by the first color, so
/// the two reference orders are averaged.
#[derive(Debug, Clone, Copy)]
pub struct DeltaECmc {
    pub lightness: f64,
    pub chroma: f64,
}

/// Plain Euclidean distance in Lab.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaE76;

impl Default for DeltaECmc {
    fn default() -> Self {
        DeltaECmc {
            lightness: 2.0,
            chroma: 1.0,
        }
    }
}

impl ColorMetric for DeltaE2000 {
    fn distance(&self, a: &PerceptualColor, b: &PerceptualColor) -> f64 {
        f64::from(a.lab.difference(b.lab)).max(0.0)
    }
}

impl DeltaECmc {
    fn one_sided(&self, reference: Lab, sample: Lab) -> f64 {
        let lch = Lch::from_color(reference);
        let l1 = f64::from(reference.l);
        let c1 = f64::from(lch.chroma);
        let h1 = f64::from(lch.hue.into_positive_degrees());
        let c2 = f64::from(Lch::from_color(sample).chroma);

        let dl = l1 - f64::from(sample.l);
        let dc = c1 - c2;
        let da = f64::from(reference.a - sample.a);
        let db = f64::from(reference.b - sample.b);
        // Rounding can push this slightly below zero for near-identical hues
        let dh_squared = (da * da + db * db - dc * dc).max(0.0);

        let sl = if l1 < 16.0 {
            0.511
        } else {
            0.040_975 * l1 / (1.0 + 0.017_65 * l1)
        };
        let sc = 0.0638 * c1 / (1.0 + 0.0131 * c1) + 0.638;
        let f = (c1.powi(4) / (c1.powi(4) + 1900.0)).sqrt();
        let t = if (164.0..=345.0).contains(&h1) {
            0.56 + (0.2 * (h1 + 168.0).to_radians().cos()).abs()
        } else {
            0.36 + (0.4 * (h1 + 35.0).to_radians().cos()).abs()
        };
        let sh = sc * (f * t + 1.0 - f);

        ((dl / (self.lightness * sl)).powi(2) + (dc / (self.chroma * sc)).powi(2) + dh_squared / (sh * sh))
            .sqrt()
    }
}

impl ColorMetric for DeltaECmc {
    fn distance(&self, a: &PerceptualColor, b: &PerceptualColor) -> f64 {
        f64::midpoint(self.one_sided(a.lab, b.lab), self.one_sided(b.lab, a.lab))
    }
}

impl ColorMetric for DeltaE76 {
    fn distance(&self, a: &PerceptualColor, b: &PerceptualColor) -> f64 {
        let dl = f64::from(a.lab.l - b.lab.l);
        let da = f64::from(a.lab.a - b.lab.a);
        let db = f64::from(a.lab.b - b.lab.b);
        (dl * dl + da * da + db * db).sqrt()
    }
}

impl ColorMetric for MetricKind {
    fn distance(&self, a: &PerceptualColor, b: &PerceptualColor) -> f64 {
        match self {
            MetricKind::Ciede2000 => DeltaE2000.distance(a, b),
            MetricKind::Cmc => DeltaECmc::default().distance(a, b),
            MetricKind::Cie76 => DeltaE76.distance(a, b),
        }
    }
}

/// Memoized distances for one resolution run. Distances are keyed by the
/// unordered pair of raw samples and always computed with the pair in the
/// same order, so `distance(a, b)` and `distance(b, a)` are bit-identical.
#[derive(Debug)]
pub struct DistanceCache<M: ColorMetric = MetricKind> {
    metric: M,
    memo: FxHashMap<(Rgb, Rgb), f64>,
    hits: u64,
    misses: u64,
}

impl<M: ColorMetric> DistanceCache<M> {
    #[must_use]
    pub fn new(metric: M) -> Self {
        DistanceCache {
            metric,
            memo: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn distance(&mut self, a: &PerceptualColor, b: &PerceptualColor) -> f64 {
        if a.rgb == b.rgb {
            return 0.0;
        }
        let (first, second) = if a.rgb < b.rgb { (a, b) } else { (b, a) };
        let key = (first.rgb, second.rgb);
        if let Some(&distance) = self.memo.get(&key) {
            self.hits += 1;
            return distance;
        }
        self.misses += 1;
        let distance = self.metric.distance(first, second);
        self.memo.insert(key, distance);
        distance
    }

    /// Number of distinct pairs computed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    /// `(hits, misses)` since the cache was created.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
