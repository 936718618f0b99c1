//! File event source.
//!
//! Tails a newline-delimited JSON file, polling at a fixed interval.
//!
//! Behavior:
//! - Only lines appended after the source first sees the file are dispatched, unless
//!   `from_start = true`. A file that does not exist yet is read from its beginning once
//!   it appears.
//! - A partial last line is buffered until its newline arrives.
//! - If the file shrinks (truncated or rotated), reading restarts at offset 0.
//! - Malformed lines are logged (warn) and skipped.
//!
//! Cancellation / Exit:
//! - The task ends when the shutdown token is cancelled or the receiver side of the
//!   channel is closed.

use std::io::SeekFrom;
use std::time::Duration;

use serde_json::Value;
use tokio::{
    fs as afs,
    io::{AsyncReadExt, AsyncSeekExt},
    sync::mpsc::Sender,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace, warn};

use super::EventSource;

/// Source that tails a single file for JSON events.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: String,
    poll_ms: u64,
    from_start: bool,
}

impl FileSource {
    /// Create a new `FileSource`.
    ///
    /// Arguments:
    /// - `path`: target file path (absolute or relative).
    /// - `poll_ms`: optional polling interval (defaults to 100ms; minimum 10ms).
    /// - `from_start`: replay lines already in the file when the source starts.
    pub fn new(path: String, poll_ms: Option<u64>, from_start: Option<bool>) -> Self {
        Self {
            path,
            poll_ms: poll_ms.unwrap_or(100).max(10),
            from_start: from_start.unwrap_or(false),
        }
    }
}

/// Read position plus the unterminated tail of the last read.
#[derive(Debug, Default)]
struct TailState {
    offset: Option<u64>,
    partial: Vec<u8>,
}

impl TailState {
    /// Where to read from given the current file length; `None` means nothing to read.
    fn read_start(&mut self, len: u64, path: &str) -> Option<u64> {
        match self.offset {
            None => {
                self.offset = Some(len);
                None
            }
            Some(offset) if len < offset => {
                info!(target: "chatnotify::sources", %path, "File truncated; reading from start");
                self.partial.clear();
                self.offset = Some(0);
                (len > 0).then_some(0)
            }
            Some(offset) if len == offset => None,
            Some(offset) => Some(offset),
        }
    }

    /// Append freshly read bytes and split off every complete line.
    fn push(&mut self, start: u64, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.offset = Some(start + chunk.len() as u64);
        self.partial.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|b| *b == b'\n') {
            let rest = self.partial.split_off(pos + 1);
            lines.push(std::mem::replace(&mut self.partial, rest));
        }
        lines
    }
}

async fn read_from(path: &str, offset: u64) -> std::io::Result<Vec<u8>> {
    let mut file = afs::File::open(path).await?;
    file.seek(SeekFrom::Start(offset)).await?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await?;
    Ok(buf)
}

fn parse_line(line: &[u8], path: &str) -> Option<Value> {
    let text = match std::str::from_utf8(line) {
        Ok(t) => t.trim(),
        Err(e) => {
            warn!(target: "chatnotify::sources", %path, error = %e, "Skipping non UTF-8 line");
            return None;
        }
    };
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                target: "chatnotify::sources",
                %path, error = %e, line = text,
                "Failed to parse JSON line"
            );
            None
        }
    }
}

impl EventSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn start(&self, sender: Sender<Value>, shutdown: CancellationToken) -> JoinHandle<()> {
        let path = self.path.clone();
        let poll_ms = self.poll_ms;
        let from_start = self.from_start;

        tokio::spawn(async move {
            info!(
                target: "chatnotify::sources",
                %path, poll_ms, from_start,
                "FileSource task started"
            );

            let mut state = TailState {
                offset: from_start.then_some(0),
                partial: Vec::new(),
            };
            let mut ticker = interval(Duration::from_millis(poll_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            'tail: loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let len = match afs::metadata(&path).await {
                    Ok(m) if m.is_file() => m.len(),
                    Ok(_) => {
                        warn!(
                            target: "chatnotify::sources",
                            %path,
                            "Path exists but is not a regular file"
                        );
                        continue;
                    }
                    Err(_) => {
                        // Missing: stay quiet and read everything once it appears.
                        if state.offset.is_none() {
                            state.offset = Some(0);
                        }
                        continue;
                    }
                };

                let Some(start) = state.read_start(len, &path) else {
                    continue;
                };
                let chunk = match read_from(&path, start).await {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!(target: "chatnotify::sources", %path, error = %e, "Failed to read file");
                        continue;
                    }
                };
                trace!(target: "chatnotify::sources", %path, start, bytes = chunk.len(), "Read appended data");

                for line in state.push(start, &chunk) {
                    let Some(value) = parse_line(&line, &path) else {
                        continue;
                    };
                    if let Err(e) = sender.send(value).await {
                        error!(
                            target: "chatnotify::sources",
                            %path, error = %e,
                            "Channel closed; FileSource terminating"
                        );
                        break 'tail;
                    }
                }
            }

            info!(
                target: "chatnotify::sources",
                %path,
                "FileSource task ended"
            );
        })
    }
}
