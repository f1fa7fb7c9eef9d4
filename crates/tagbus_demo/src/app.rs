//! Runner wiring configured handlers into a dispatcher and publishing events.

use crate::config::{DemoConfig, PublishMode};
use crate::error::DemoError;
use crate::handlers::{DemoHandler, RunStats};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tagbus::{Dispatcher, HandlerRef, TracingLogger};
use tracing::{info, warn};

/// Outcome of one [`Application::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Publish calls made
    pub events_published: usize,
    /// Invocation count per handler name
    pub invocations: BTreeMap<String, usize>,
    /// Handler invocations that panicked
    pub panics: usize,
}

/// Demo application.
///
/// Owns its own [`Dispatcher`] instance; the process-wide default is never
/// touched, so several applications can run side by side.
pub struct Application {
    config: DemoConfig,
    dispatcher: Arc<Dispatcher>,
    stats: Arc<RunStats>,
}

impl Application {
    /// Creates an application from a configuration.
    ///
    /// Validates the configuration, builds one [`HandlerRef`] per configured
    /// handler and subscribes them. A handler named twice for one tag keeps
    /// its identity and is therefore registered once.
    pub fn new(config: DemoConfig) -> Result<Self, DemoError> {
        config.validate()?;

        let dispatcher = Arc::new(Dispatcher::new());
        if config.dispatch.report_failures {
            dispatcher.with_logger(TracingLogger::new());
        }

        let stats = Arc::new(RunStats::default());
        subscribe_handlers(&dispatcher, &config, &stats);

        Ok(Self {
            config,
            dispatcher,
            stats,
        })
    }

    /// The dispatcher the application publishes through.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Publishes every configured event `repeat` times and reports the result.
    ///
    /// In async mode each round's events are published back to back and the
    /// round ends once every completion handle resolved. In sync mode each
    /// publish runs on the blocking pool so the runtime workers stay free.
    pub async fn run(&self) -> RunSummary {
        let mode = self.config.dispatch.mode;
        let rounds = self.config.dispatch.repeat;
        info!(
            "🚀 Publishing {} event(s) x{} in {} mode",
            self.config.events.len(),
            rounds,
            mode
        );

        let mut published = 0;
        for _ in 0..rounds {
            match mode {
                PublishMode::Async => {
                    let completions: Vec<_> = self
                        .config
                        .events
                        .iter()
                        .map(|settings| self.dispatcher.publish(settings.to_event()))
                        .collect();
                    published += completions.len();
                    join_all(completions).await;
                }
                PublishMode::Sync => {
                    for settings in &self.config.events {
                        let dispatcher = self.dispatcher.clone();
                        let event = settings.to_event();
                        if let Err(e) =
                            tokio::task::spawn_blocking(move || dispatcher.publish_sync(&event)).await
                        {
                            warn!("⚠️ Synchronous publish task failed: {}", e);
                        }
                        published += 1;
                    }
                }
            }
        }

        let summary = RunSummary {
            events_published: published,
            invocations: self.stats.invocations(),
            panics: self.stats.panics(),
        };
        info!(
            "✅ Published {} event(s), {} handler panic(s) contained",
            summary.events_published, summary.panics
        );
        for (name, count) in &summary.invocations {
            info!("📊 {}: {} invocation(s)", name, count);
        }
        summary
    }
}

/// Builds one handler per `[[handlers]]` entry and subscribes them by name.
fn subscribe_handlers(dispatcher: &Dispatcher, config: &DemoConfig, stats: &Arc<RunStats>) {
    let handlers: HashMap<&str, HandlerRef> = config
        .handlers
        .iter()
        .map(|settings| {
            let handler = HandlerRef::new(DemoHandler::new(settings, stats.clone()));
            (settings.name.as_str(), handler)
        })
        .collect();

    for subscription in &config.subscriptions {
        let refs = subscription
            .handlers
            .iter()
            .map(|name| handlers.get(name.as_str()).cloned());
        dispatcher.subscribe(&subscription.tag, refs);
        info!(
            "🔗 '{}' -> {} handler(s)",
            subscription.tag,
            dispatcher.handler_count(&subscription.tag)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EventSettings, HandlerKind, HandlerSettings, LoggingSettings, SubscriptionSettings};
    use serde_json::Map;

    fn handler(name: &str, kind: HandlerKind, delay_ms: u64) -> HandlerSettings {
        HandlerSettings {
            name: name.to_string(),
            kind,
            delay_ms,
            message: None,
        }
    }

    fn config(mode: PublishMode, repeat: u32) -> DemoConfig {
        let mut config = DemoConfig::default();
        config.dispatch.mode = mode;
        config.dispatch.repeat = repeat;
        config
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_default_config_async_run() {
        let app = Application::new(config(PublishMode::Async, 2)).unwrap();

        // greeter listed twice for player:joined collapses to one registration
        assert_eq!(app.dispatcher().handler_count("player:joined"), 2);

        let summary = app.run().await;
        assert_eq!(summary.events_published, 6);
        assert_eq!(summary.invocations["slow"], 2);
        assert_eq!(summary.invocations["greeter"], 4);
        assert_eq!(summary.invocations["faulty"], 2);
        assert_eq!(summary.panics, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sync_run_matches_async_counts() {
        let app = Application::new(config(PublishMode::Sync, 1)).unwrap();
        let summary = app.run().await;

        assert_eq!(summary.events_published, 3);
        assert_eq!(summary.invocations["greeter"], 2);
        assert_eq!(summary.invocations["slow"], 1);
        assert_eq!(summary.panics, 1);
    }

    #[tokio::test]
    async fn test_run_without_subscriptions() {
        let config = DemoConfig {
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
            dispatch: Default::default(),
            handlers: vec![handler("idle", HandlerKind::Record, 0)],
            subscriptions: vec![],
            events: vec![EventSettings {
                tag: "nobody:listens".to_string(),
                data: Map::new(),
            }],
        };

        let app = Application::new(config).unwrap();
        let summary = app.run().await;

        assert_eq!(summary.events_published, 1);
        assert!(summary.invocations.is_empty());
        assert_eq!(summary.panics, 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = DemoConfig::default();
        config.subscriptions.push(SubscriptionSettings {
            tag: "foo".to_string(),
            handlers: vec!["missing".to_string()],
        });

        assert!(matches!(Application::new(config), Err(DemoError::InvalidConfig(_))));
    }

    #[test]
    fn test_report_failures_installs_logger() {
        let app = Application::new(DemoConfig::default()).unwrap();
        assert!(format!("{:?}", app.dispatcher()).contains("logger: true"));

        let mut config = DemoConfig::default();
        config.dispatch.report_failures = false;
        let app = Application::new(config).unwrap();
        assert!(format!("{:?}", app.dispatcher()).contains("logger: false"));
    }
}
