//! Recording platform, scripted tasks and event fixtures shared by unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::commands::{SlashAction, SlashCall, UnlistedAction, UnlistedCall};
use crate::core::{
    Channel, ComponentEvent, ComponentKind, Guild, HandlerError, HandlerResult, InteractionRef,
    Message, MessageEvent, OutgoingMessage, ReactionEvent, SlashCommandEvent, User,
};
use crate::i18n::MessageCatalog;
use crate::interaction::{expect_kind, InteractionCallback, InteractionGroup};
use crate::module::{BotContext, BotModule};
use crate::platform::Platform;
use crate::settings::MemorySettingsStore;
use crate::task::Task;

pub fn guild(id: &str) -> Guild {
    Guild {
        id: id.to_string(),
        name: format!("guild-{id}"),
    }
}

pub fn channel(id: &str) -> Channel {
    Channel {
        id: id.to_string(),
        name: format!("channel-{id}"),
    }
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: format!("user-{id}"),
        bot: id == "bot",
    }
}

fn interaction() -> InteractionRef {
    InteractionRef {
        id: "i1".to_string(),
        token: "token".to_string(),
    }
}

/// Message `m1` in `g1`/`c1`
pub fn message_event(user_id: &str, content: &str) -> MessageEvent {
    MessageEvent {
        guild: Some(guild("g1")),
        channel: channel("c1"),
        message: Message {
            id: "m1".to_string(),
            channel_id: "c1".to_string(),
            author: user(user_id),
            content: content.to_string(),
        },
    }
}

pub fn reaction_event(user_id: &str, message_id: &str, emoji: &str) -> ReactionEvent {
    ReactionEvent {
        guild: Some(guild("g1")),
        channel: channel("c1"),
        user: Some(user(user_id)),
        message_id: message_id.to_string(),
        emoji: emoji.to_string(),
    }
}

pub fn slash_event(user_id: &str, name: &str, subcommand: Option<&str>) -> SlashCommandEvent {
    SlashCommandEvent {
        interaction: interaction(),
        guild: Some(guild("g1")),
        channel: channel("c1"),
        user: user(user_id),
        name: name.to_string(),
        subcommand: subcommand.map(str::to_string),
        options: HashMap::new(),
    }
}

/// Button click in `g1`/`c1`
pub fn component_event(user_id: &str, message_id: &str, component_id: &str) -> ComponentEvent {
    ComponentEvent {
        interaction: interaction(),
        guild: Some(guild("g1")),
        channel: channel("c1"),
        user: user(user_id),
        message_id: message_id.to_string(),
        component_id: component_id.to_string(),
        kind: ComponentKind::Button,
        values: Vec::new(),
    }
}

/// Failure a scripted handler returns
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Permission,
    Platform,
}

impl Failure {
    fn to_error(self) -> HandlerError {
        match self {
            Failure::Permission => HandlerError::permission("MANAGE_MESSAGES"),
            Failure::Platform => HandlerError::Platform(anyhow::anyhow!("gateway timeout")),
        }
    }
}

fn outcome(failure: Option<Failure>) -> HandlerResult<()> {
    match failure {
        Some(failure) => Err(failure.to_error()),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    Send {
        channel_id: String,
        message: OutgoingMessage,
    },
    Delete {
        channel_id: String,
        message_id: String,
    },
    Reply {
        interaction_id: String,
        message: OutgoingMessage,
        ephemeral: bool,
    },
}

type FetchHook = Box<dyn Fn() + Send + Sync>;

/// Platform double recording every outgoing operation
///
/// Its own user id is `bot`.
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    messages: Mutex<HashMap<(String, String), Message>>,
    fetches: AtomicUsize,
    on_fetch: Mutex<Option<FetchHook>>,
}

impl RecordingPlatform {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Send { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn replies(&self) -> Vec<(OutgoingMessage, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Reply {
                    message, ephemeral, ..
                } => Some((message, ephemeral)),
                _ => None,
            })
            .collect()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Make a message fetchable
    pub fn store_message(&self, channel_id: &str, message_id: &str, content: &str) {
        let message = Message {
            id: message_id.to_string(),
            channel_id: channel_id.to_string(),
            author: user("bot"),
            content: content.to_string(),
        };
        self.messages
            .lock()
            .unwrap()
            .insert((channel_id.to_string(), message_id.to_string()), message);
    }

    /// Run `hook` inside every fetch, standing in for work done while it is in flight
    pub fn on_fetch(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_fetch.lock().unwrap() = Some(Box::new(hook));
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    fn self_user_id(&self) -> &str {
        "bot"
    }

    async fn send_message(&self, channel_id: &str, message: OutgoingMessage) -> HandlerResult<String> {
        self.record(PlatformCall::Send {
            channel_id: channel_id.to_string(),
            message,
        });
        Ok(format!("sent-{}", self.calls.lock().unwrap().len()))
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> HandlerResult<()> {
        self.record(PlatformCall::Delete {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    async fn fetch_message(&self, channel_id: &str, message_id: &str) -> HandlerResult<Message> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.on_fetch.lock().unwrap().as_ref() {
            hook();
        }
        self.messages
            .lock()
            .unwrap()
            .get(&(channel_id.to_string(), message_id.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown message {message_id}").into())
    }

    async fn reply(&self, interaction: &InteractionRef, message: OutgoingMessage, ephemeral: bool) -> HandlerResult<()> {
        self.record(PlatformCall::Reply {
            interaction_id: interaction.id.clone(),
            message,
            ephemeral,
        });
        Ok(())
    }
}

/// Module `poll` wired to in-memory collaborators
pub struct Harness {
    pub module: Arc<BotModule>,
    pub platform: Arc<RecordingPlatform>,
    pub settings: Arc<MemorySettingsStore>,
}

pub fn harness() -> Harness {
    let platform = Arc::new(RecordingPlatform::default());
    let settings = Arc::new(MemorySettingsStore::default());
    let context = BotContext::new(
        platform.clone(),
        settings.clone(),
        Arc::new(MessageCatalog::new()),
    );
    Harness {
        module: Arc::new(BotModule::new("poll", context)),
        platform,
        settings,
    }
}

/// Slash action recording the command path of each call
pub struct RecordingSlash {
    calls: Arc<Mutex<Vec<String>>>,
    failure: Option<Failure>,
}

impl RecordingSlash {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let action = Self {
            calls: calls.clone(),
            failure: None,
        };
        (action, calls)
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }
}

#[async_trait]
impl SlashAction for RecordingSlash {
    async fn run(&self, _module: &BotModule, call: SlashCall<'_>) -> HandlerResult<()> {
        self.calls.lock().unwrap().push(call.event.command_path());
        outcome(self.failure)
    }
}

/// Unlisted action recording the arguments of each call
pub struct RecordingUnlisted {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    delete: bool,
    failure: Option<Failure>,
}

impl RecordingUnlisted {
    pub fn new(delete: bool) -> (Self, Arc<Mutex<Vec<Vec<String>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let action = Self {
            calls: calls.clone(),
            delete,
            failure: None,
        };
        (action, calls)
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }
}

#[async_trait]
impl UnlistedAction for RecordingUnlisted {
    async fn run(&self, _module: &BotModule, call: UnlistedCall<'_>) -> HandlerResult<bool> {
        self.calls.lock().unwrap().push(call.arguments.to_vec());
        outcome(self.failure).map(|()| self.delete)
    }
}

/// Component callback answering with a fixed delete flag
pub struct Fixed {
    delete: bool,
    expected: Option<ComponentKind>,
    failure: Option<Failure>,
    invocations: Arc<AtomicUsize>,
}

impl Fixed {
    pub fn new(delete: bool) -> Self {
        Self {
            delete,
            expected: None,
            failure: None,
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reject events of any other kind
    pub fn expecting(mut self, kind: ComponentKind) -> Self {
        self.expected = Some(kind);
        self
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn invocations(&self) -> Arc<AtomicUsize> {
        self.invocations.clone()
    }
}

#[async_trait]
impl InteractionCallback for Fixed {
    async fn invoke(&self, _module: &BotModule, event: &ComponentEvent) -> HandlerResult<bool> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.expected {
            expect_kind(event, kind)?;
        }
        outcome(self.failure).map(|()| self.delete)
    }
}

#[derive(Default)]
struct MonitorState {
    starts: usize,
    trigger: Option<String>,
    messages: Vec<String>,
    reactions: Vec<(String, String)>,
}

/// Observes a [`ScriptedTask`] after it moved into the registry
#[derive(Clone)]
pub struct TaskMonitor {
    state: Arc<Mutex<MonitorState>>,
    finished: Arc<AtomicBool>,
}

impl TaskMonitor {
    pub fn starts(&self) -> usize {
        self.state.lock().unwrap().starts
    }

    /// Interaction id the task was started from
    pub fn trigger(&self) -> Option<String> {
        self.state.lock().unwrap().trigger.clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state.lock().unwrap().messages.clone()
    }

    /// (message content, emoji) pairs
    pub fn reactions(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().reactions.clone()
    }

    /// Mark the task finished from outside
    pub fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

/// Task that records what it consumed and finishes after a set number of events
pub struct ScriptedTask {
    user: User,
    channel: Channel,
    interrupted: bool,
    remaining: Option<usize>,
    failure: Option<Failure>,
    start_failure: Option<String>,
    group: Option<Arc<InteractionGroup>>,
    monitor: TaskMonitor,
}

impl ScriptedTask {
    pub fn new(user_id: &str, channel_id: &str) -> (Self, TaskMonitor) {
        let monitor = TaskMonitor {
            state: Arc::new(Mutex::new(MonitorState::default())),
            finished: Arc::new(AtomicBool::new(false)),
        };
        let task = Self {
            user: user(user_id),
            channel: channel(channel_id),
            interrupted: false,
            remaining: None,
            failure: None,
            start_failure: None,
            group: None,
            monitor: monitor.clone(),
        };
        (task, monitor)
    }

    pub fn interrupted(mut self) -> Self {
        self.interrupted = true;
        self
    }

    /// Finish after `events` consumed events, `0` finishes during start
    pub fn finish_after(mut self, events: usize) -> Self {
        self.remaining = Some(events);
        self
    }

    /// Fail every consumed message and reaction
    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn fail_start_with_permission(mut self, permission: &str) -> Self {
        self.start_failure = Some(permission.to_string());
        self
    }

    pub fn with_group(mut self, group: InteractionGroup) -> Self {
        self.group = Some(Arc::new(group));
        self
    }

    fn count_event(&mut self) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.monitor.finish();
            }
        }
    }
}

#[async_trait]
impl Task for ScriptedTask {
    fn user(&self) -> &User {
        &self.user
    }

    fn channel(&self) -> &Channel {
        &self.channel
    }

    fn is_running(&self) -> bool {
        !self.monitor.finished.load(Ordering::SeqCst)
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    fn interaction_group(&self) -> Option<Arc<InteractionGroup>> {
        self.group.clone()
    }

    async fn start(&mut self, _module: &BotModule, trigger: Option<&InteractionRef>) -> HandlerResult<()> {
        {
            let mut state = self.monitor.state.lock().unwrap();
            state.starts += 1;
            state.trigger = trigger.map(|t| t.id.clone());
        }
        if let Some(permission) = &self.start_failure {
            return Err(HandlerError::permission(permission.clone()));
        }
        if self.remaining == Some(0) {
            self.monitor.finish();
        }
        Ok(())
    }

    async fn consume_message(&mut self, _module: &BotModule, message: &Message) -> HandlerResult<()> {
        self.monitor
            .state
            .lock()
            .unwrap()
            .messages
            .push(message.content.clone());
        self.count_event();
        outcome(self.failure)
    }

    async fn consume_reaction(&mut self, _module: &BotModule, message: &Message, emoji: &str) -> HandlerResult<()> {
        self.monitor
            .state
            .lock()
            .unwrap()
            .reactions
            .push((message.content.clone(), emoji.to_string()));
        self.count_event();
        outcome(self.failure)
    }
}
