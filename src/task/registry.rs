//! Per-guild registry of the single active task of each user
//!
//! Every registration gets a fresh generation number. Removals that follow a
//! consumption go through [`TaskRegistry::remove_if_current`], so a task that
//! was cancelled or superseded while it was busy can never remove its
//! successor, and a removed task is never put back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use tokio::sync::{Mutex, MutexGuard};

use super::Task;

/// Shared reference to a registered task
///
/// The mutex serializes every event consumed by the task.
#[derive(Clone)]
pub struct TaskHandle {
    generation: u64,
    user_id: String,
    task: Arc<Mutex<Box<dyn Task>>>,
}

impl TaskHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub async fn lock(&self) -> MutexGuard<'_, Box<dyn Task>> {
        self.task.lock().await
    }
}

#[derive(Default)]
pub struct TaskRegistry {
    /// Guild id -> user id -> task
    guilds: DashMap<String, HashMap<String, TaskHandle>>,
    next_generation: AtomicU64,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a task, removing the user's current one if any
    ///
    /// Returns `None` without registering when the task is already interrupted.
    pub fn insert(&self, guild_id: &str, task: Box<dyn Task>) -> Option<TaskHandle> {
        if task.is_interrupted() {
            debug!("Refusing interrupted task for user {} in guild {guild_id}", task.user().id);
            return None;
        }

        let handle = TaskHandle {
            generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
            user_id: task.user().id.clone(),
            task: Arc::new(Mutex::new(task)),
        };

        let previous = self
            .guilds
            .entry(guild_id.to_string())
            .or_default()
            .insert(handle.user_id.clone(), handle.clone());

        if let Some(previous) = previous {
            debug!(
                "Task #{} of user {} in guild {guild_id} superseded by #{}",
                previous.generation, handle.user_id, handle.generation
            );
        }

        Some(handle)
    }

    pub fn get(&self, guild_id: &str, user_id: &str) -> Option<TaskHandle> {
        self.guilds
            .get(guild_id)
            .and_then(|tasks| tasks.get(user_id).cloned())
    }

    /// Unconditionally drop the user's task
    pub fn remove(&self, guild_id: &str, user_id: &str) -> Option<TaskHandle> {
        self.guilds
            .get_mut(guild_id)
            .and_then(|mut tasks| tasks.remove(user_id))
    }

    /// Drop the task only if `handle` is still the registered one
    ///
    /// Returns `true` for the single call that actually removed it.
    pub fn remove_if_current(&self, guild_id: &str, handle: &TaskHandle) -> bool {
        let Some(mut tasks) = self.guilds.get_mut(guild_id) else {
            return false;
        };

        match tasks.get(&handle.user_id) {
            Some(current) if current.generation == handle.generation => {
                tasks.remove(&handle.user_id);
                true
            }
            _ => false,
        }
    }

    /// Whether `handle` is still the user's registered task
    pub fn is_current(&self, guild_id: &str, handle: &TaskHandle) -> bool {
        self.guilds
            .get(guild_id)
            .and_then(|tasks| tasks.get(&handle.user_id).map(|t| t.generation))
            == Some(handle.generation)
    }

    /// Number of active tasks in a guild
    pub fn len(&self, guild_id: &str) -> usize {
        self.guilds.get(guild_id).map_or(0, |tasks| tasks.len())
    }
}
