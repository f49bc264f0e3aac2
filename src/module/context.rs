//! Shared collaborators handed to every module
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::sync::Arc;

use crate::i18n::MessageCatalog;
use crate::platform::Platform;
use crate::settings::SettingsStore;

/// Platform, settings and strings shared by all modules of a bot
///
/// Cheap to clone, every field is reference counted.
#[derive(Clone)]
pub struct BotContext {
    pub platform: Arc<dyn Platform>,
    pub settings: Arc<dyn SettingsStore>,
    pub strings: Arc<MessageCatalog>,
}

impl BotContext {
    pub fn new(
        platform: Arc<dyn Platform>,
        settings: Arc<dyn SettingsStore>,
        strings: Arc<MessageCatalog>,
    ) -> Self {
        Self {
            platform,
            settings,
            strings,
        }
    }

    /// Shorthand for a localized string
    pub fn text(&self, key: &str, args: &[&str]) -> String {
        self.strings.get(key, args)
    }
}
