use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::{info, trace};

use crate::pipeline::OutputCommand;

/// Hands output commands to the host: one JSON object per line on the writer.
/// In dry-run mode, commands are only logged and nothing is written.
pub struct OutputExecutor {
    dry_run: bool,
    writer: Box<dyn Write + Send>,
}

impl OutputExecutor {
    /// Create an executor writing to stdout.
    /// - dry_run: when true, only logs instead of emitting commands.
    pub fn new(dry_run: bool) -> Self {
        Self::with_writer(dry_run, Box::new(io::stdout()))
    }

    pub fn with_writer(dry_run: bool, writer: Box<dyn Write + Send>) -> Self {
        Self { dry_run, writer }
    }

    /// Returns whether the executor is currently in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Enable or disable dry-run mode dynamically.
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn execute(&mut self, command: &OutputCommand) -> Result<()> {
        if self.dry_run {
            info!(target: "chatnotify::actions", command = command.name(), ?command, "DRY-RUN output");
            return Ok(());
        }
        trace!(target: "chatnotify::actions", command = command.name(), "output");
        let line = serde_json::to_string(command)
            .with_context(|| format!("Failed to serialize {} command", command.name()))?;
        writeln!(self.writer, "{line}").context("Failed to write output command")?;
        self.writer.flush().context("Failed to flush output")?;
        Ok(())
    }

    /// Execute commands in order, stopping at the first failure.
    pub fn execute_all<'a, I>(&mut self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a OutputCommand>,
    {
        for command in commands {
            self.execute(command)?;
        }
        Ok(())
    }
}
