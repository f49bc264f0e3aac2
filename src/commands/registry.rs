//! Command registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Listed and unlisted command maps with per-guild prefix fan-out

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::listed::BotCommand;
use super::unlisted::UnlistedCommand;

/// Listed and unlisted commands of one module, keyed by command id
///
/// Listed commands remember their insertion order so generated descriptors and
/// help listings stay stable; re-adding an id keeps its original position.
#[derive(Default)]
pub struct CommandRegistry {
    listed: DashMap<String, (u64, Arc<BotCommand>)>,
    next_position: AtomicU64,
    unlisted: DashMap<String, Arc<UnlistedCommand>>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listed(&self, command: BotCommand) {
        let command = Arc::new(command);
        self.listed
            .entry(command.id().to_string())
            .and_modify(|(_, existing)| *existing = Arc::clone(&command))
            .or_insert_with(|| {
                (
                    self.next_position.fetch_add(1, Ordering::Relaxed),
                    Arc::clone(&command),
                )
            });
    }

    pub fn remove_listed(&self, id: &str) -> Option<Arc<BotCommand>> {
        self.listed.remove(id).map(|(_, (_, command))| command)
    }

    pub fn get_listed(&self, id: &str) -> Option<Arc<BotCommand>> {
        self.listed.get(id).map(|entry| Arc::clone(&entry.value().1))
    }

    /// Listed commands in insertion order
    pub fn listed(&self) -> Vec<Arc<BotCommand>> {
        let mut commands: Vec<(u64, Arc<BotCommand>)> = self
            .listed
            .iter()
            .map(|entry| {
                let (position, command) = entry.value();
                (*position, Arc::clone(command))
            })
            .collect();
        commands.sort_by_key(|(position, _)| *position);
        commands.into_iter().map(|(_, command)| command).collect()
    }

    /// Register an unlisted command, stamping the module's default prefix on it
    pub fn add_unlisted(&self, mut command: UnlistedCommand, default_prefix: &str) -> Arc<UnlistedCommand> {
        command.stamp_default_prefix(default_prefix);
        let command = Arc::new(command);
        self.unlisted
            .insert(command.id().to_string(), Arc::clone(&command));
        command
    }

    pub fn remove_unlisted(&self, id: &str) -> Option<Arc<UnlistedCommand>> {
        self.unlisted.remove(id).map(|(_, command)| command)
    }

    pub fn get_unlisted(&self, id: &str) -> Option<Arc<UnlistedCommand>> {
        self.unlisted.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Unlisted commands sorted by id
    pub fn unlisted(&self) -> Vec<Arc<UnlistedCommand>> {
        let mut commands: Vec<Arc<UnlistedCommand>> = self
            .unlisted
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        commands.sort_by(|a, b| a.id().cmp(b.id()));
        commands
    }

    /// Write a guild's prefix into every registered unlisted command
    pub fn set_guild_prefix(&self, guild_id: &str, prefix: &str) {
        for entry in self.unlisted.iter() {
            entry.value().set_module_prefix(guild_id, prefix);
        }
    }

    pub fn listed_len(&self) -> usize {
        self.listed.len()
    }

    pub fn unlisted_len(&self) -> usize {
        self.unlisted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handler::{SlashAction, SlashCall, UnlistedAction, UnlistedCall};
    use crate::core::HandlerResult;
    use crate::module::BotModule;
    use async_trait::async_trait;

    // Mock actions for testing
    struct MockSlash;

    #[async_trait]
    impl SlashAction for MockSlash {
        async fn run(&self, _module: &BotModule, _call: SlashCall<'_>) -> HandlerResult<()> {
            Ok(())
        }
    }

    struct MockUnlisted;

    #[async_trait]
    impl UnlistedAction for MockUnlisted {
        async fn run(&self, _module: &BotModule, _call: UnlistedCall<'_>) -> HandlerResult<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.listed_len(), 0);
        assert_eq!(registry.unlisted_len(), 0);
    }

    #[test]
    fn test_listed_add_get_remove() {
        let registry = CommandRegistry::new();
        registry.add_listed(BotCommand::new("help", "Help", MockSlash));

        assert!(registry.get_listed("help").is_some());
        assert!(registry.get_listed("cancel").is_none());

        let removed = registry.remove_listed("help");
        assert_eq!(removed.map(|c| c.id().to_string()).as_deref(), Some("help"));
        assert!(registry.get_listed("help").is_none());
    }

    #[test]
    fn test_listed_keeps_insertion_order() {
        let registry = CommandRegistry::new();
        for id in ["help", "cancel", "create", "close"] {
            registry.add_listed(BotCommand::new(id, id, MockSlash));
        }
        // Replacing an entry keeps its slot
        registry.add_listed(BotCommand::new("cancel", "Cancel again", MockSlash));

        let ids: Vec<String> = registry.listed().iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, vec!["help", "cancel", "create", "close"]);
        assert_eq!(
            registry.get_listed("cancel").map(|c| c.description().to_string()).as_deref(),
            Some("Cancel again")
        );
    }

    #[test]
    fn test_unlisted_stamped_with_default_prefix() {
        let registry = CommandRegistry::new();
        let command = registry.add_unlisted(UnlistedCommand::new("create", MockUnlisted), "poll");
        assert_eq!(command.module_prefix("g1"), "poll");
        assert!(registry.get_unlisted("create").is_some());
    }

    #[test]
    fn test_guild_prefix_fans_out() {
        let registry = CommandRegistry::new();
        registry.add_unlisted(UnlistedCommand::new("create", MockUnlisted), "poll");
        registry.add_unlisted(UnlistedCommand::new("close", MockUnlisted), "poll");

        registry.set_guild_prefix("g1", "vote");

        for command in registry.unlisted() {
            assert_eq!(command.module_prefix("g1"), "vote");
            assert_eq!(command.module_prefix("g2"), "poll");
        }
    }

    #[test]
    fn test_unlisted_sorted_and_removable() {
        let registry = CommandRegistry::new();
        registry.add_unlisted(UnlistedCommand::new("zeta", MockUnlisted), "m");
        registry.add_unlisted(UnlistedCommand::new("alpha", MockUnlisted), "m");

        let ids: Vec<String> = registry.unlisted().iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);

        assert!(registry.remove_unlisted("alpha").is_some());
        assert!(registry.remove_unlisted("alpha").is_none());
        assert_eq!(registry.unlisted_len(), 1);
    }
}
