//! An editing session for one component's margin and padding.
//!
//! The session owns the two prisms and a backend. Every committed edit
//! sends the full margin + padding pair, since the API only accepts
//! complete replacements.

use prism_core::error::CoreError;
use prism_core::spacing::{Side, SpacingProperties};

use crate::client::{ClientError, PropertiesBackend};
use crate::prism::Prism;

/// Which box of the component a prism edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Margin,
    Padding,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] ClientError),

    /// A committed value is kept locally but cannot be saved.
    #[error("{property:?} {side} holds '{input}', which cannot be saved: {source}")]
    InvalidValue {
        property: Property,
        side: Side,
        input: String,
        #[source]
        source: CoreError,
    },
}

/// Margin and padding editors bound to one component id.
pub struct EditorSession<B> {
    backend: B,
    component_id: String,
    margin: Prism,
    padding: Prism,
}

impl<B: PropertiesBackend> EditorSession<B> {
    /// Start with empty prisms. Call [`EditorSession::load`] to fetch saved values.
    pub fn new(backend: B, component_id: impl Into<String>) -> Self {
        Self {
            backend,
            component_id: component_id.into(),
            margin: Prism::new(),
            padding: Prism::new(),
        }
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn prism(&self, property: Property) -> &Prism {
        match property {
            Property::Margin => &self.margin,
            Property::Padding => &self.padding,
        }
    }

    fn prism_mut(&mut self, property: Property) -> &mut Prism {
        match property {
            Property::Margin => &mut self.margin,
            Property::Padding => &mut self.padding,
        }
    }

    /// Replace both prisms with the saved state.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        let saved = self.backend.get_properties(&self.component_id).await?;
        self.margin = Prism::from_spacing(&saved.margin);
        self.padding = Prism::from_spacing(&saved.padding);
        tracing::debug!(component_id = %self.component_id, "Loaded saved properties");
        Ok(())
    }

    /// Focus a side. Any side focused elsewhere is committed first.
    ///
    /// Focus always moves. If saving the previously focused side fails,
    /// that error is returned after the new side has focus.
    pub async fn focus(&mut self, property: Property, side: Side) -> Result<(), SessionError> {
        let committed = match self.focused() {
            Some(held) if held != (property, side) => self.blur(held.0, held.1).await.map(drop),
            _ => Ok(()),
        };
        self.prism_mut(property).focus(side);
        committed
    }

    /// Replace the edit buffer of the focused side.
    pub fn input(&mut self, property: Property, text: impl Into<String>) {
        self.prism_mut(property).input(text);
    }

    /// Commit a side and save the full margin / padding pair.
    ///
    /// Returns `Ok(false)` when `side` was not focused (nothing to commit).
    pub async fn blur(&mut self, property: Property, side: Side) -> Result<bool, SessionError> {
        if !self.prism_mut(property).blur(side) {
            return Ok(false);
        }

        let properties = self.properties()?;
        self.backend
            .set_properties(&self.component_id, &properties)
            .await?;
        tracing::debug!(
            component_id = %self.component_id,
            property = ?property,
            side = %side,
            "Saved committed value",
        );
        Ok(true)
    }

    /// The side currently holding focus, if any.
    pub fn focused(&self) -> Option<(Property, Side)> {
        self.margin
            .focused()
            .map(|side| (Property::Margin, side))
            .or_else(|| self.padding.focused().map(|side| (Property::Padding, side)))
    }

    /// Validate the stored values of both prisms into a saveable pair.
    pub fn properties(&self) -> Result<SpacingProperties, SessionError> {
        let spacing = |property: Property| {
            let prism = self.prism(property);
            prism
                .to_spacing()
                .map_err(|(side, source)| SessionError::InvalidValue {
                    property,
                    side,
                    input: prism.display(side),
                    source,
                })
        };

        Ok(SpacingProperties {
            margin: spacing(Property::Margin)?,
            padding: spacing(Property::Padding)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use prism_core::spacing::{Length, Spacing};

    use super::*;

    /// In-memory backend recording every save.
    #[derive(Default)]
    struct FakeBackend {
        saved: Mutex<HashMap<String, SpacingProperties>>,
        writes: Mutex<Vec<SpacingProperties>>,
    }

    #[async_trait]
    impl PropertiesBackend for FakeBackend {
        async fn get_properties(
            &self,
            component_id: &str,
        ) -> Result<SpacingProperties, ClientError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .get(component_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn set_properties(
            &self,
            component_id: &str,
            properties: &SpacingProperties,
        ) -> Result<(), ClientError> {
            self.saved
                .lock()
                .unwrap()
                .insert(component_id.to_string(), properties.clone());
            self.writes.lock().unwrap().push(properties.clone());
            Ok(())
        }
    }

    fn writes(session: &EditorSession<FakeBackend>) -> Vec<SpacingProperties> {
        session.backend().writes.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn load_seeds_both_prisms() {
        let backend = FakeBackend::default();
        let mut padding = Spacing::auto();
        padding.set(Side::Right, Length::px(6.0).unwrap().into());
        backend.saved.lock().unwrap().insert(
            "card".into(),
            SpacingProperties {
                margin: Spacing::auto(),
                padding,
            },
        );

        let mut session = EditorSession::new(backend, "card");
        session.load().await.unwrap();

        assert_eq!(session.prism(Property::Padding).display(Side::Right), "6px");
        assert_eq!(session.prism(Property::Margin).display(Side::Right), "auto");
    }

    #[tokio::test]
    async fn blur_posts_full_pair() {
        let mut session = EditorSession::new(FakeBackend::default(), "button");
        session.load().await.unwrap();

        session.focus(Property::Margin, Side::Top).await.unwrap();
        session.input(Property::Margin, "10");
        assert!(session.blur(Property::Margin, Side::Top).await.unwrap());

        let writes = writes(&session);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].margin.top.to_string(), "10px");
        assert_eq!(writes[0].padding, Spacing::auto());
    }

    #[tokio::test]
    async fn typing_does_not_save() {
        let mut session = EditorSession::new(FakeBackend::default(), "button");
        session.focus(Property::Padding, Side::Left).await.unwrap();
        session.input(Property::Padding, "4");
        session.input(Property::Padding, "42");

        assert!(writes(&session).is_empty());
    }

    #[tokio::test]
    async fn invalid_value_is_kept_but_not_saved() {
        let mut session = EditorSession::new(FakeBackend::default(), "button");
        session.focus(Property::Margin, Side::Left).await.unwrap();
        session.input(Property::Margin, "garbage");

        let result = session.blur(Property::Margin, Side::Left).await;
        assert_matches!(
            result,
            Err(SessionError::InvalidValue {
                property: Property::Margin,
                side: Side::Left,
                ..
            })
        );
        assert_eq!(session.prism(Property::Margin).display(Side::Left), "garbagepx");
        assert!(writes(&session).is_empty());
    }

    #[tokio::test]
    async fn focus_moves_even_when_an_unsaveable_value_is_held() {
        let mut session = EditorSession::new(FakeBackend::default(), "button");
        session.focus(Property::Margin, Side::Left).await.unwrap();
        session.input(Property::Margin, "garbage");
        assert!(session.blur(Property::Margin, Side::Left).await.is_err());

        session.focus(Property::Margin, Side::Top).await.unwrap();
        session.input(Property::Margin, "5");

        let result = session.focus(Property::Padding, Side::Top).await;
        assert_matches!(
            result,
            Err(SessionError::InvalidValue {
                property: Property::Margin,
                side: Side::Left,
                ..
            })
        );
        assert_eq!(session.focused(), Some((Property::Padding, Side::Top)));
        assert_eq!(session.prism(Property::Margin).display(Side::Top), "5px");
        assert!(writes(&session).is_empty());

        // Leaving padding.top still cannot save, but focus reaches the bad side.
        assert!(session.focus(Property::Margin, Side::Left).await.is_err());
        assert_eq!(session.prism(Property::Margin).editing(), "garbagepx");

        // Fixing it lets the whole pair save again.
        session.input(Property::Margin, "1.50em");
        assert!(session.blur(Property::Margin, Side::Left).await.unwrap());

        let writes = writes(&session);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].margin.left.to_string(), "1.50em");
        assert_eq!(writes[0].margin.top.to_string(), "5px");
    }

    #[tokio::test]
    async fn moving_focus_across_prisms_commits_previous_side() {
        let mut session = EditorSession::new(FakeBackend::default(), "button");
        session.focus(Property::Margin, Side::Bottom).await.unwrap();
        session.input(Property::Margin, "2em");
        session.focus(Property::Padding, Side::Top).await.unwrap();

        assert_eq!(session.focused(), Some((Property::Padding, Side::Top)));
        let writes = writes(&session);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].margin.bottom.to_string(), "2em");
    }

    #[tokio::test]
    async fn clearing_a_side_saves_auto() {
        let mut session = EditorSession::new(FakeBackend::default(), "button");
        session.focus(Property::Margin, Side::Top).await.unwrap();
        session.input(Property::Margin, "5px");
        session.blur(Property::Margin, Side::Top).await.unwrap();

        session.focus(Property::Margin, Side::Top).await.unwrap();
        assert_eq!(session.prism(Property::Margin).editing(), "5px");
        session.input(Property::Margin, "");
        session.blur(Property::Margin, Side::Top).await.unwrap();

        let writes = writes(&session);
        assert_eq!(writes.len(), 2);
        assert!(writes[1].margin.top.is_auto());
        assert_eq!(session.prism(Property::Margin).display(Side::Top), "auto");
    }

    #[tokio::test]
    async fn blur_without_focus_is_a_no_op() {
        let mut session = EditorSession::new(FakeBackend::default(), "button");
        assert!(!session.blur(Property::Margin, Side::Top).await.unwrap());
        assert!(writes(&session).is_empty());
    }
}
