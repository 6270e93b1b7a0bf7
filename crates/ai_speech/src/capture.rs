//! Command-line microphone capture
//!
//! Implements `AudioSource` by running a capture tool (arecord by default)
//! that writes WAV to a temp file. The session ends when the tool exits or
//! when `stop` is requested.

use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tokio::sync::Notify;
use tracing::{debug, instrument, warn};

use crate::config::RecorderConfig;
use crate::error::SpeechError;
use crate::ports::{AudioSource, RecordOutcome};

/// Microphone capture via an external command
#[derive(Debug)]
pub struct CommandRecorder {
    config: RecorderConfig,
    cancel: Notify,
}

impl CommandRecorder {
    /// Create a new recorder
    #[must_use]
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            cancel: Notify::new(),
        }
    }
}

#[async_trait]
impl AudioSource for CommandRecorder {
    #[instrument(skip(self))]
    async fn record(&self) -> Result<RecordOutcome, SpeechError> {
        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::Recognition(format!("Failed to create temp file: {e}"))
        })?;

        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .arg("-d")
            .arg(self.config.max_seconds.to_string())
            .arg(output_file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        debug!("Starting capture: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::Unsupported
            } else {
                SpeechError::Recognition(format!("Failed to start recorder: {e}"))
            }
        })?;

        let cancelled = self.cancel.notified();
        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| {
                    SpeechError::Recognition(format!("Recorder failed: {e}"))
                })?;
                if !status.success() {
                    return Err(SpeechError::Recognition(format!(
                        "Recorder exited with status {status}"
                    )));
                }
            },
            () = cancelled => {
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "Failed to kill recorder");
                }
                let _ = child.wait().await;
                return Ok(RecordOutcome::Cancelled);
            },
        }

        let audio = tokio::fs::read(output_file.path()).await.map_err(|e| {
            SpeechError::Recognition(format!("Failed to read captured audio: {e}"))
        })?;

        if audio.is_empty() {
            return Err(SpeechError::Recognition("No audio captured".to_string()));
        }

        Ok(RecordOutcome::Clip(audio))
    }

    fn stop(&self) {
        self.cancel.notify_waiters();
    }
}
