use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{Config, validate_config};
use crate::executor::actions::OutputExecutor;
use crate::pipeline::{ActivationPipeline, IncomingMessage, OutgoingKind, OutputCommand, PipelineResult};

/// Events delivered by the host, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// An incoming chat message.
    Message(IncomingMessage),
    /// The local user sent a chat message (`command: false`) or a command.
    Outgoing {
        text: String,
        #[serde(default)]
        command: bool,
    },
    /// The local user's names changed (login, nickname).
    Identity {
        profile_name: String,
        display_name: String,
    },
    /// Session or connection reset.
    Reset,
}

/// Runtime is responsible for:
/// - decoding host events and routing them to the pipeline
/// - keeping the tick counter that drives delayed responses
/// - dispatching output commands to the OutputExecutor
pub struct Runtime {
    config: Config,
    pipeline: ActivationPipeline,
    executor: OutputExecutor,
    tick: u64,
}

impl Runtime {
    /// Create a new runtime writing commands to stdout, with the given dry-run mode.
    pub fn new(config: Config, dry_run: bool) -> Self {
        Self::with_executor(config, OutputExecutor::new(dry_run))
    }

    pub fn with_executor(config: Config, executor: OutputExecutor) -> Self {
        Self {
            config,
            pipeline: ActivationPipeline::new(),
            executor,
            tick: 0,
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration (e.g., to edit the notification list).
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Swap in a new configuration. Pending responses and remembered outgoing
    /// messages survive the reload.
    pub fn update_config(&mut self, config: Config) -> Result<()> {
        validate_config(&config).context("Rejected configuration update")?;
        self.config = config;
        info!(
            target: "chatnotify::runtime",
            notifications = self.config.notifications.len(),
            "Configuration updated"
        );
        Ok(())
    }

    pub fn set_identity(&mut self, profile_name: &str, display_name: &str) {
        self.config
            .notifications
            .set_identity_names(profile_name, display_name);
    }

    /// Enable or disable dry-run mode at runtime.
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.executor.set_dry_run(dry_run);
    }

    /// Is dry-run currently enabled?
    pub fn is_dry_run(&self) -> bool {
        self.executor.is_dry_run()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn pending_responses(&self) -> usize {
        self.pipeline.pending_responses()
    }

    /// Handle a raw event JSON object; the `"type"` field selects the [`HostEvent`].
    pub fn run_event(&mut self, event: &Value) -> Result<()> {
        let event = HostEvent::deserialize(event).context("Unrecognised host event")?;
        self.handle_event(event)
    }

    pub fn handle_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::Message(message) => {
                self.handle_message(&message)?;
            }
            HostEvent::Outgoing { text, command } => self.record_outgoing(&text, command),
            HostEvent::Identity {
                profile_name,
                display_name,
            } => self.set_identity(&profile_name, &display_name),
            HostEvent::Reset => {
                self.reset();
            }
        }
        Ok(())
    }

    /// Run one message through the pipeline and emit its immediate commands.
    /// Responses without delay are delivered right away.
    pub fn handle_message(&mut self, message: &IncomingMessage) -> Result<PipelineResult> {
        let result = self
            .pipeline
            .process(message, &self.config, Instant::now(), self.tick);
        debug!(
            target: "chatnotify::runtime",
            activations = result.activations.len(),
            own = result.own_message,
            scheduled = result.scheduled,
            "Message processed"
        );
        self.executor
            .execute_all(&result.commands)
            .context("Failed to emit message commands")?;
        if result.scheduled > 0 {
            self.deliver_due()?;
        }
        Ok(result)
    }

    /// Outgoing recording hook for messages and commands sent by the local user.
    pub fn record_outgoing(&mut self, text: &str, is_command: bool) {
        self.pipeline
            .record_outgoing(text, is_command, Instant::now(), &self.config);
    }

    /// Advance the host clock by one tick and deliver every response now due.
    pub fn tick(&mut self) -> Result<usize> {
        self.tick = self.tick.saturating_add(1);
        self.deliver_due()
    }

    /// Drop all pending responses.
    pub fn reset(&mut self) -> usize {
        self.pipeline.reset()
    }

    fn deliver_due(&mut self) -> Result<usize> {
        let due = self.pipeline.advance(self.tick, &self.config.key_bindings);
        let now = Instant::now();
        let mut first_error = None;
        for response in &due {
            // Responses echo back like anything the user types.
            if let OutputCommand::SendOutgoing { kind, text } = &response.command {
                self.pipeline
                    .record_outgoing(text, *kind == OutgoingKind::Command, now, &self.config);
            }
            debug!(
                target: "chatnotify::runtime",
                tick = self.tick,
                notification = response.context.notification_index,
                command = response.command.name(),
                "Delivering response"
            );
            if let Err(err) = self.executor.execute(&response.command) {
                warn!(target: "chatnotify::runtime", error = %err, "Response delivery failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err.context(format!("Failed to deliver responses at tick {}", self.tick))),
            None => Ok(due.len()),
        }
    }
}
