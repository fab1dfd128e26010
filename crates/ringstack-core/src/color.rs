//! HSV conversion and color ranges.
//!
//! Hue uses the full 8-bit encoding: 360 degrees map onto 0..=255, so the hue
//! of pure red is 0 and that of pure blue is 171.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Convert an 8-bit RGB triple into full-range HSV.
#[inline]
pub fn rgb_to_hsv_full([r, g, b]: [u8; 3]) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max as u8;
    let s = if max > 0.0 {
        (255.0 * delta / max).round() as u8
    } else {
        0
    };

    if delta <= 0.0 {
        return Hsv::new(0, s, v);
    }

    let mut deg = if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if deg < 0.0 {
        deg += 360.0;
    }
    let h = ((deg * 256.0 / 360.0).round() as u32 % 256) as u8;
    Hsv::new(h, s, v)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HsvChannel {
    Hue,
    Saturation,
    Value,
}

impl fmt::Display for HsvChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HsvChannel::Hue => "hue",
            HsvChannel::Saturation => "saturation",
            HsvChannel::Value => "value",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRangeError {
    #[error("inverted {channel} bounds (lower={lower}, upper={upper})")]
    Inverted {
        channel: HsvChannel,
        lower: u8,
        upper: u8,
    },
}

/// Inclusive HSV box. `lower <= upper` holds on every channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColorRange", into = "RawColorRange")]
pub struct ColorRange {
    lower: Hsv,
    upper: Hsv,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawColorRange {
    lower: Hsv,
    upper: Hsv,
}

impl TryFrom<RawColorRange> for ColorRange {
    type Error = ColorRangeError;

    fn try_from(raw: RawColorRange) -> Result<Self, Self::Error> {
        ColorRange::new(raw.lower, raw.upper)
    }
}

impl From<ColorRange> for RawColorRange {
    fn from(range: ColorRange) -> Self {
        RawColorRange {
            lower: range.lower,
            upper: range.upper,
        }
    }
}

impl ColorRange {
    /// Orange scoring rings.
    pub const RING: ColorRange = ColorRange {
        lower: Hsv::new(12, 50, 50),
        upper: Hsv::new(22, 255, 255),
    };

    /// Red wobble goal.
    pub const WOBBLE: ColorRange = ColorRange {
        lower: Hsv::new(0, 70, 50),
        upper: Hsv::new(10, 255, 255),
    };

    pub fn new(lower: Hsv, upper: Hsv) -> Result<Self, ColorRangeError> {
        let channels = [
            (HsvChannel::Hue, lower.h, upper.h),
            (HsvChannel::Saturation, lower.s, upper.s),
            (HsvChannel::Value, lower.v, upper.v),
        ];
        for (channel, lo, hi) in channels {
            if lo > hi {
                return Err(ColorRangeError::Inverted {
                    channel,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Hsv {
        self.lower
    }

    pub fn upper(&self) -> Hsv {
        self.upper
    }

    #[inline]
    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&hsv.h)
            && (self.lower.s..=self.upper.s).contains(&hsv.s)
            && (self.lower.v..=self.upper.v).contains(&hsv.v)
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::RING
    }
}

impl fmt::Display for ColorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{},{}-{},{}-{}",
            self.lower.h, self.upper.h, self.lower.s, self.upper.s, self.lower.v, self.upper.v
        )
    }
}
