//! Local edit state for the four inputs of one prism.
//!
//! Each side moves between three visual states:
//!
//! ```text
//! Default --focus--> Focused --blur(value)--> Changed
//!    ^                  |  ^                     |
//!    +---blur(empty)----+  +--------focus--------+
//! ```
//!
//! Typing only touches the edit buffer. The buffer is parsed into the
//! side's stored value on blur, and never rejected.

use prism_core::error::CoreError;
use prism_core::input::{self, InputValue};
use prism_core::spacing::{Side, Spacing, AUTO};

/// Visual state of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// No stored value; shows `"auto"`.
    Default,
    /// The side has focus and shows the edit buffer.
    Focused,
    /// A stored value is present.
    Changed,
}

/// Edit state of the four inputs of one box.
#[derive(Debug, Clone, Default)]
pub struct Prism {
    top: Option<InputValue>,
    right: Option<InputValue>,
    bottom: Option<InputValue>,
    left: Option<InputValue>,
    focused: Option<Side>,
    editing: String,
}

impl Prism {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stored values from a saved spacing.
    pub fn from_spacing(spacing: &Spacing) -> Self {
        let mut prism = Self::new();
        for side in Side::ALL {
            prism.set_value(side, input::from_offset(spacing.get(side)));
        }
        prism
    }

    pub fn value(&self, side: Side) -> Option<&InputValue> {
        self.slot(side).as_ref()
    }

    pub fn set_value(&mut self, side: Side, value: Option<InputValue>) {
        *self.slot_mut(side) = value;
    }

    pub fn focused(&self) -> Option<Side> {
        self.focused
    }

    /// Current edit buffer. Meaningful only while a side has focus.
    pub fn editing(&self) -> &str {
        &self.editing
    }

    /// Give `side` focus, loading its display value into the edit buffer.
    ///
    /// A side that still holds focus is committed first.
    pub fn focus(&mut self, side: Side) {
        if let Some(previous) = self.focused {
            if previous != side {
                self.blur(previous);
            }
        }

        let display = self.display(side);
        self.editing = if display == AUTO { String::new() } else { display };
        self.focused = Some(side);
    }

    /// Replace the edit buffer. Ignored when no side has focus.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.focused.is_some() {
            self.editing = text.into();
        }
    }

    /// Commit the edit buffer into `side` and drop focus.
    ///
    /// Returns `false` without changing anything if `side` is not the
    /// focused side.
    pub fn blur(&mut self, side: Side) -> bool {
        if self.focused != Some(side) {
            return false;
        }

        self.focused = None;
        let parsed = input::parse_input(&std::mem::take(&mut self.editing));
        tracing::trace!(side = %side, value = ?parsed, "Committed prism input");
        self.set_value(side, parsed);
        true
    }

    /// What the input for `side` shows.
    pub fn display(&self, side: Side) -> String {
        if self.focused == Some(side) {
            return self.editing.clone();
        }
        self.value(side)
            .map_or_else(|| AUTO.to_string(), ToString::to_string)
    }

    pub fn input_state(&self, side: Side) -> InputState {
        if self.focused == Some(side) {
            InputState::Focused
        } else if self.value(side).is_some() {
            InputState::Changed
        } else {
            InputState::Default
        }
    }

    /// Validate all stored values into a [`Spacing`].
    ///
    /// Fails on the first side whose stored text is not a valid length.
    pub fn to_spacing(&self) -> Result<Spacing, (Side, CoreError)> {
        let mut spacing = Spacing::auto();
        for side in Side::ALL {
            let offset = input::to_offset(self.value(side)).map_err(|e| (side, e))?;
            spacing.set(side, offset);
        }
        Ok(spacing)
    }

    fn slot(&self, side: Side) -> &Option<InputValue> {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<InputValue> {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }
}
