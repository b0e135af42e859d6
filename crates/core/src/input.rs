//! Permissive parsing of text typed into a prism input.
//!
//! Nothing typed is ever rejected here: empty text and `"auto"` mean
//! absent, `<number><letters>` is split into value and unit, and anything
//! else is kept verbatim as the value with a `px` unit. Conversion to a
//! validated [`Offset`] happens separately and may fail.

use std::fmt;

use crate::error::CoreError;
use crate::spacing::{Length, Offset, AUTO, LENGTH_RE};

/// Unit assumed when the typed text has none.
pub const DEFAULT_UNIT: &str = "px";

/// A value as the editor stores it: raw text, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValue {
    pub value: String,
    pub unit: String,
}

impl InputValue {
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }

    /// Validate into a [`Length`].
    pub fn to_length(&self) -> Result<Length, CoreError> {
        Length::from_parts(&self.value, &self.unit)
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl From<&Length> for InputValue {
    fn from(len: &Length) -> Self {
        Self::new(len.magnitude().to_string(), len.unit().as_str())
    }
}

/// Parse typed text. Returns `None` for an absent value.
pub fn parse_input(input: &str) -> Option<InputValue> {
    if input.is_empty() || input == AUTO {
        return None;
    }

    match LENGTH_RE.captures(input) {
        Some(caps) => {
            let unit = match &caps[2] {
                "" => DEFAULT_UNIT,
                unit => unit,
            };
            Some(InputValue::new(&caps[1], unit))
        }
        None => Some(InputValue::new(input, DEFAULT_UNIT)),
    }
}

/// Convert an editor value into a validated offset.
pub fn to_offset(value: Option<&InputValue>) -> Result<Offset, CoreError> {
    value.map_or(Ok(Offset::Auto), |v| v.to_length().map(Offset::Length))
}

/// Convert a validated offset back into an editor value.
pub fn from_offset(offset: &Offset) -> Option<InputValue> {
    offset.length().map(InputValue::from)
}
