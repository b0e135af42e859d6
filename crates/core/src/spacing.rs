//! Margin / padding value types.
//!
//! A [`Spacing`] holds one [`Offset`] per [`Side`]. On the wire and in the
//! database every offset is a plain string: `"auto"` for an absent value,
//! otherwise `<magnitude><unit>` (e.g. `"10px"`, `"1.5em"`, `"50%"`).
//! Parsing is strict here; the permissive editor parsing lives in
//! [`crate::input`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Sentinel for an absent offset.
pub const AUTO: &str = "auto";

/// `<digits and dots><lowercase letters or %>`.
pub(crate) static LENGTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9.]+)([a-z%]*)$").expect("valid regex"));

/// Digits with at most one decimal point and at least one digit.
static MAGNITUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One of the four box sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in CSS shorthand order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

/// Accepted length units. An omitted unit means [`Unit::Px`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Px,
    Em,
    Rem,
    Percent,
    Vh,
    Vw,
    Pt,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Percent => "%",
            Unit::Vh => "vh",
            Unit::Vw => "vw",
            Unit::Pt => "pt",
        }
    }
}

impl FromStr for Unit {
    type Err = CoreError;

    /// Parse a unit suffix. The empty string is the default unit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "px" => Ok(Unit::Px),
            "em" => Ok(Unit::Em),
            "rem" => Ok(Unit::Rem),
            "%" => Ok(Unit::Percent),
            "vh" => Ok(Unit::Vh),
            "vw" => Ok(Unit::Vw),
            "pt" => Ok(Unit::Pt),
            other => Err(CoreError::Validation(format!(
                "Unknown unit '{other}'. Must be one of: px, em, rem, %, vh, vw, pt"
            ))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

/// A validated `(magnitude, unit)` pair.
///
/// The magnitude is kept as the decimal text it was given, so a stored
/// length reads back exactly as it was written. Only an omitted unit is
/// filled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Length {
    magnitude: String,
    unit: Unit,
}

impl Length {
    /// Validate a non-negative decimal magnitude such as `"10"`, `"1.50"`
    /// or `".5"`.
    pub fn new(magnitude: impl Into<String>, unit: Unit) -> Result<Self, CoreError> {
        let magnitude = magnitude.into();
        if !MAGNITUDE_RE.is_match(&magnitude) {
            return Err(CoreError::Validation(format!(
                "Magnitude '{magnitude}' is not a non-negative decimal number"
            )));
        }
        Ok(Self { magnitude, unit })
    }

    /// Shorthand for a pixel length.
    pub fn px(magnitude: f64) -> Result<Self, CoreError> {
        // f64 Display never uses exponent notation; NaN, inf and negatives
        // fail the pattern.
        Self::new(magnitude.to_string(), Unit::Px)
    }

    pub fn magnitude(&self) -> &str {
        &self.magnitude
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Build a length from separate magnitude and unit text, as produced
    /// by the editor's permissive parser.
    pub fn from_parts(magnitude: &str, unit: &str) -> Result<Self, CoreError> {
        Self::new(magnitude, unit.parse()?)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

impl FromStr for Length {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LENGTH_RE.captures(s).ok_or_else(|| {
            CoreError::Validation(format!("'{s}' is not a length like '10px'"))
        })?;
        Self::from_parts(&caps[1], &caps[2])
    }
}

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// The value of a single side: absent (`"auto"`) or a length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Offset {
    #[default]
    Auto,
    Length(Length),
}

impl Offset {
    pub fn is_auto(&self) -> bool {
        matches!(self, Offset::Auto)
    }

    pub fn length(&self) -> Option<&Length> {
        match self {
            Offset::Auto => None,
            Offset::Length(len) => Some(len),
        }
    }
}

impl From<Length> for Offset {
    fn from(len: Length) -> Self {
        Offset::Length(len)
    }
}

impl From<Option<Length>> for Offset {
    fn from(len: Option<Length>) -> Self {
        len.map_or(Offset::Auto, Offset::Length)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Auto => f.write_str(AUTO),
            Offset::Length(len) => write!(f, "{len}"),
        }
    }
}

impl FromStr for Offset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == AUTO {
            return Ok(Offset::Auto);
        }
        s.parse().map(Offset::Length)
    }
}

impl Serialize for Offset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Offset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Spacing
// ---------------------------------------------------------------------------

/// Four offsets, one per side. All four are required when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Spacing {
    pub top: Offset,
    pub right: Offset,
    pub bottom: Offset,
    pub left: Offset,
}

impl Spacing {
    /// All four sides `"auto"`.
    pub fn auto() -> Self {
        Self::default()
    }

    /// The same offset on every side.
    pub fn uniform(offset: Offset) -> Self {
        Self {
            top: offset.clone(),
            right: offset.clone(),
            bottom: offset.clone(),
            left: offset,
        }
    }

    pub fn get(&self, side: Side) -> &Offset {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }

    pub fn set(&mut self, side: Side, offset: Offset) {
        match side {
            Side::Top => self.top = offset,
            Side::Right => self.right = offset,
            Side::Bottom => self.bottom = offset,
            Side::Left => self.left = offset,
        }
    }
}

/// Margin and padding of one component. Always replaced as a pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpacingProperties {
    pub margin: Spacing,
    pub padding: Spacing,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
