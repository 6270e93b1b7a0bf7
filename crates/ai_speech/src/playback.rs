//! Command-line audio playback
//!
//! Implements `AudioPlayer` by writing the clip to a temp file and running a
//! playback tool (aplay by default). Playback ends when the tool exits or
//! when `stop` is requested.

use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tokio::sync::Notify;
use tracing::{debug, instrument, warn};

use crate::config::PlayerConfig;
use crate::error::SpeechError;
use crate::ports::{AudioPlayer, PlayOutcome};

/// Audio playback via an external command
#[derive(Debug)]
pub struct CommandPlayer {
    config: PlayerConfig,
    cancel: Notify,
}

impl CommandPlayer {
    /// Create a new player
    #[must_use]
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            cancel: Notify::new(),
        }
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    #[instrument(skip(self, audio), fields(audio_size = audio.len()))]
    async fn play(&self, audio: &[u8]) -> Result<PlayOutcome, SpeechError> {
        if audio.is_empty() {
            return Ok(PlayOutcome::Finished);
        }

        let input_file = NamedTempFile::with_suffix(".wav")
            .map_err(|e| SpeechError::Synthesis(format!("Failed to create temp file: {e}")))?;

        tokio::fs::write(input_file.path(), audio)
            .await
            .map_err(|e| SpeechError::Synthesis(format!("Failed to write audio: {e}")))?;

        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .arg(input_file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        debug!("Starting playback: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::Unsupported
            } else {
                SpeechError::Synthesis(format!("Failed to start player: {e}"))
            }
        })?;

        let cancelled = self.cancel.notified();
        tokio::select! {
            status = child.wait() => {
                let status = status
                    .map_err(|e| SpeechError::Synthesis(format!("Player failed: {e}")))?;
                if !status.success() {
                    return Err(SpeechError::Synthesis(format!(
                        "Player exited with status {status}"
                    )));
                }
                Ok(PlayOutcome::Finished)
            },
            () = cancelled => {
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "Failed to kill player");
                }
                let _ = child.wait().await;
                Ok(PlayOutcome::Cancelled)
            },
        }
    }

    fn stop(&self) {
        self.cancel.notify_waiters();
    }
}
