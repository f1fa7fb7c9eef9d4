//! Configuration management for the demo runner.
//!
//! The runner is driven entirely by a TOML file: which handlers exist, which
//! tags they subscribe to, and which events get published in which mode.

use crate::error::DemoError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tagbus::{Event, EventData};
use tracing::info;

/// Default repeat count for serde deserialization
fn default_repeat() -> u32 {
    1
}

fn default_report_failures() -> bool {
    true
}

/// Demo configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Logging configuration settings
    pub logging: LoggingSettings,
    /// How events are published
    #[serde(default)]
    pub dispatch: DispatchSettings,
    /// Handler definitions, referenced by name from subscriptions
    #[serde(default)]
    pub handlers: Vec<HandlerSettings>,
    /// Tag subscriptions
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionSettings>,
    /// Events to publish, in order
    #[serde(default)]
    pub events: Vec<EventSettings>,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

/// Publish behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Synchronous or asynchronous publishing
    #[serde(default)]
    pub mode: PublishMode,
    /// Install a tracing-backed failure logger on the dispatcher
    #[serde(default = "default_report_failures")]
    pub report_failures: bool,
    /// How many times the event list is published
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            mode: PublishMode::default(),
            report_failures: default_report_failures(),
            repeat: default_repeat(),
        }
    }
}

/// Which publish protocol the runner uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// `publish_sync`: handlers run one after another on the caller
    Sync,
    /// `publish`: handlers run concurrently, the runner awaits completion
    #[default]
    Async,
}

impl FromStr for PublishMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "async" => Ok(Self::Async),
            other => Err(format!("Invalid publish mode: {other}. Must be one of: sync, async")),
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => f.write_str("sync"),
            Self::Async => f.write_str("async"),
        }
    }
}

/// A named demo handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerSettings {
    /// Unique handler name
    pub name: String,
    /// What the handler does with an event
    pub kind: HandlerKind,
    /// Delay before recording, for `sleep` handlers
    #[serde(default)]
    pub delay_ms: u64,
    /// Panic message, for `panic` handlers
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    /// Logs and counts the event
    Record,
    /// Sleeps for `delay_ms`, then logs and counts the event
    Sleep,
    /// Counts the attempt, then panics
    Panic,
}

/// Handlers subscribed to one tag, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSettings {
    pub tag: String,
    /// Handler names; repeating a name subscribes the same handler again
    pub handlers: Vec<String>,
}

/// One event to publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSettings {
    pub tag: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl EventSettings {
    /// Builds the event published for this entry.
    pub fn to_event(&self) -> Event {
        let data: EventData = self.data.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Event::new(&self.tag, Some(data))
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        let mut joined = Map::new();
        joined.insert("name".to_string(), Value::from("alice"));

        let mut left = Map::new();
        left.insert("name".to_string(), Value::from("alice"));
        left.insert("reason".to_string(), Value::from("quit"));

        Self {
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
            dispatch: DispatchSettings::default(),
            handlers: vec![
                HandlerSettings {
                    name: "greeter".to_string(),
                    kind: HandlerKind::Record,
                    delay_ms: 0,
                    message: None,
                },
                HandlerSettings {
                    name: "slow".to_string(),
                    kind: HandlerKind::Sleep,
                    delay_ms: 100,
                    message: None,
                },
                HandlerSettings {
                    name: "faulty".to_string(),
                    kind: HandlerKind::Panic,
                    delay_ms: 0,
                    message: Some("oops".to_string()),
                },
            ],
            subscriptions: vec![
                SubscriptionSettings {
                    tag: "player:joined".to_string(),
                    handlers: vec!["slow".to_string(), "greeter".to_string(), "greeter".to_string()],
                },
                SubscriptionSettings {
                    tag: "player:left".to_string(),
                    handlers: vec!["greeter".to_string(), "faulty".to_string()],
                },
            ],
            events: vec![
                EventSettings {
                    tag: "player:joined".to_string(),
                    data: joined,
                },
                EventSettings {
                    tag: "player:left".to_string(),
                    data: left,
                },
                EventSettings {
                    tag: "server:tick".to_string(),
                    data: Map::new(),
                },
            ],
        }
    }
}

impl DemoConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub async fn load_from_file(path: &Path) -> Result<Self, DemoError> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: DemoConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = DemoConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), DemoError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(DemoError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            )));
        }

        if self.dispatch.repeat == 0 {
            return Err(DemoError::InvalidConfig(
                "dispatch.repeat must be greater than 0".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for handler in &self.handlers {
            if handler.name.is_empty() {
                return Err(DemoError::InvalidConfig("Handler name cannot be empty".to_string()));
            }
            if !names.insert(handler.name.as_str()) {
                return Err(DemoError::InvalidConfig(format!(
                    "Duplicate handler name: {}",
                    handler.name
                )));
            }
        }

        for subscription in &self.subscriptions {
            if subscription.tag.is_empty() {
                return Err(DemoError::InvalidConfig("Subscription tag cannot be empty".to_string()));
            }
            if let Some(unknown) = subscription
                .handlers
                .iter()
                .find(|name| !names.contains(name.as_str()))
            {
                return Err(DemoError::InvalidConfig(format!(
                    "Subscription '{}' references unknown handler: {}",
                    subscription.tag, unknown
                )));
            }
        }

        if self.events.iter().any(|event| event.tag.is_empty()) {
            return Err(DemoError::InvalidConfig("Event tag cannot be empty".to_string()));
        }

        Ok(())
    }
}
