//! # Interaction Groups
//!
//! A group maps component ids (buttons, select menus) of one rendered message
//! to callbacks. Groups are either registered globally for a message, or
//! attached to a task for as long as the task runs.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod registry;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{ComponentEvent, ComponentKind, HandlerError, HandlerResult};
use crate::module::BotModule;

pub use registry::InteractionRegistry;

/// Behaviour bound to a single component id
#[async_trait]
pub trait InteractionCallback: Send + Sync {
    /// Returns whether the message carrying the component may be deleted
    async fn invoke(&self, module: &BotModule, event: &ComponentEvent) -> HandlerResult<bool>;
}

/// Fail with a kind mismatch unless the event has the expected shape
pub fn expect_kind(event: &ComponentEvent, expected: ComponentKind) -> HandlerResult<()> {
    if event.kind == expected {
        Ok(())
    } else {
        Err(HandlerError::wrong_interaction(
            event.component_id.clone(),
            expected,
            event.kind,
        ))
    }
}

#[derive(Default, Clone)]
pub struct InteractionGroup {
    callbacks: HashMap<String, Arc<dyn InteractionCallback>>,
}

impl InteractionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(mut self, component_id: &str, callback: impl InteractionCallback + 'static) -> Self {
        self.add_callback(component_id, callback);
        self
    }

    pub fn add_callback(&mut self, component_id: &str, callback: impl InteractionCallback + 'static) {
        self.callbacks
            .insert(component_id.to_string(), Arc::new(callback));
    }

    pub fn callback(&self, component_id: &str) -> Option<Arc<dyn InteractionCallback>> {
        self.callbacks.get(component_id).cloned()
    }

    pub fn contains(&self, component_id: &str) -> bool {
        self.callbacks.contains_key(component_id)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for InteractionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.callbacks.keys().collect();
        ids.sort();
        f.debug_struct("InteractionGroup")
            .field("components", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{component_event, Fixed};

    #[test]
    fn test_group_lookup() {
        let group = InteractionGroup::new()
            .with_callback("yes", Fixed::new(false))
            .with_callback("no", Fixed::new(true));

        assert_eq!(group.len(), 2);
        assert!(group.contains("yes"));
        assert!(group.callback("no").is_some());
        assert!(group.callback("maybe").is_none());
        assert!(!group.is_empty());
        assert!(InteractionGroup::new().is_empty());
    }

    #[test]
    fn test_expect_kind() {
        let mut event = component_event("u1", "m1", "vote");
        assert!(expect_kind(&event, ComponentKind::Button).is_ok());

        event.kind = ComponentKind::SelectMenu;
        match expect_kind(&event, ComponentKind::Button) {
            Err(HandlerError::WrongInteraction {
                interaction_id,
                expected,
                found,
            }) => {
                assert_eq!(interaction_id, "vote");
                assert_eq!(expected, ComponentKind::Button);
                assert_eq!(found, ComponentKind::SelectMenu);
            }
            other => panic!("expected kind mismatch, got {other:?}"),
        }
    }
}
