//! # Localized Strings
//!
//! Message templates keyed by id, with `{0}`, `{1}`... positional
//! placeholders. English defaults are built in; a YAML file can override any
//! subset of them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::collections::HashMap;
use std::fs;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use log::info;
use regex::{Captures, Regex};

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("command_help_desc", "Shows the commands of this module."),
    ("command_help_param", "Name of the command to describe."),
    ("command_cancel_desc", "Cancels the task you are running."),
    ("main_module_command_desc", "Main module command"),
    ("unlisted_command_title", "Command {0}"),
    (
        "unlisted_command_argument_number_error",
        "Wrong number of arguments for this command.",
    ),
    ("command_error", "Command error"),
    ("reaction_action_error", "Reaction error"),
    ("task_action_error", "Task error"),
    ("button_action_error", "Interaction error"),
    ("missing_permission_error", "The bot is missing the permission: {0}."),
    (
        "interaction_event_type_error",
        "The interaction {0} expected a {1} event but received a {2} event.",
    ),
    ("command_cancel_title", "Cancel"),
    ("command_cancel_no_task_error", "You have no active task to cancel."),
    ("command_cancel_info", "Your task has been cancelled."),
    ("command_help_list_title", "Commands of {0}"),
    ("command_help_listed_commands", "Listed commands"),
    ("command_help_unlisted_commands", "Unlisted commands"),
    ("command_help_command_title", "Command {0}"),
    ("command_help_command_not_found_error", "The command {0} does not exist."),
    ("command_help_command_desc", "Usage: {0}"),
];

#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalog with the built-in English templates
    pub fn new() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Built-in templates overridden by the entries of a YAML map file
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read strings file {path}"))?;
        let overrides: HashMap<String, String> = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse strings file {path}"))?;

        info!("Loaded {} string overrides from {path}", overrides.len());

        let mut catalog = Self::new();
        catalog.templates.extend(overrides);
        Ok(catalog)
    }

    /// Render a template, unknown keys render as the key itself
    pub fn get(&self, key: &str, args: &[&str]) -> String {
        let Some(template) = self.templates.get(key) else {
            return key.to_string();
        };

        // One pass over the template, so placeholders inside arguments stay literal
        let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("static pattern"));
        re.replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map_or_else(|| caps[0].to_string(), |arg| arg.to_string())
        })
        .into_owned()
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}
