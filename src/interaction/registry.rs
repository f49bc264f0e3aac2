//! Message-scoped interaction groups, partitioned by guild

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::InteractionGroup;

/// Guild id -> message id -> group
///
/// Each guild's map sits behind its own DashMap shard lock, guilds never
/// contend with each other.
#[derive(Default)]
pub struct InteractionRegistry {
    guilds: DashMap<String, HashMap<String, Arc<InteractionGroup>>>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a group to a message, replacing any previous one
    pub fn add(&self, guild_id: &str, message_id: &str, group: InteractionGroup) {
        self.guilds
            .entry(guild_id.to_string())
            .or_default()
            .insert(message_id.to_string(), Arc::new(group));
    }

    pub fn get(&self, guild_id: &str, message_id: &str) -> Option<Arc<InteractionGroup>> {
        self.guilds
            .get(guild_id)
            .and_then(|groups| groups.get(message_id).cloned())
    }

    pub fn remove(&self, guild_id: &str, message_id: &str) -> Option<Arc<InteractionGroup>> {
        self.guilds
            .get_mut(guild_id)
            .and_then(|mut groups| groups.remove(message_id))
    }

    /// Number of messages with a group in a guild
    pub fn len(&self, guild_id: &str) -> usize {
        self.guilds.get(guild_id).map_or(0, |groups| groups.len())
    }
}
