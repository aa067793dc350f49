use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use votd_core::{ClipboardError, Platform, ShareError, SharePayload};

/// Clipboard programs, tried in order. The first one on PATH wins.
const CLIPBOARD_PROGRAMS: &[&[&str]] = &[
    &["pbcopy"],
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
    &["clip.exe"],
];

/// Clipboard and share backed by external programs that read stdin.
pub struct SystemPlatform {
    clipboard: Option<Vec<String>>,
    share: Option<Vec<String>>,
}

impl SystemPlatform {
    pub fn detect(share_command: Option<Vec<String>>) -> Self {
        let clipboard: Option<Vec<String>> = CLIPBOARD_PROGRAMS
            .iter()
            .find(|argv| which::which(argv[0]).is_ok())
            .map(|argv| argv.iter().map(|s| s.to_string()).collect());

        match &clipboard {
            Some(argv) => tracing::debug!(program = %argv[0], "clipboard program found"),
            None => tracing::warn!("no clipboard program found on PATH"),
        }

        Self::new(clipboard, share_command)
    }

    pub fn new(clipboard: Option<Vec<String>>, share: Option<Vec<String>>) -> Self {
        Self {
            clipboard: clipboard.filter(|argv| !argv.is_empty()),
            share: share.filter(|argv| !argv.is_empty()),
        }
    }
}

impl Platform for SystemPlatform {
    async fn write_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        let argv = self
            .clipboard
            .as_ref()
            .ok_or_else(|| ClipboardError("no clipboard program available".to_string()))?;

        let status = pipe_to(argv, text)
            .await
            .map_err(|e| ClipboardError(e.to_string()))?;
        if !status.success() {
            return Err(ClipboardError(format!("{} exited with {}", argv[0], status)));
        }
        Ok(())
    }

    fn can_share(&self) -> bool {
        self.share
            .as_ref()
            .map(|argv| which::which(&argv[0]).is_ok())
            .unwrap_or(false)
    }

    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        let argv = self.share.as_ref().ok_or(ShareError::Unavailable)?;

        let status = pipe_to(argv, &payload.message())
            .await
            .map_err(|e| ShareError::Rejected(e.to_string()))?;
        if !status.success() {
            return Err(ShareError::Rejected(format!("{} exited with {}", argv[0], status)));
        }
        Ok(())
    }
}

/// Run `argv` with `text` on stdin. Output is discarded so it cannot draw over the TUI.
async fn pipe_to(argv: &[String], text: &str) -> std::io::Result<ExitStatus> {
    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    // stdin is dropped once the write finishes, so the child sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()).await,
        None => Ok(()),
    };

    if let Err(err) = written {
        // The child stopped reading (EPIPE); reap it before reporting.
        let _ = child.kill().await;
        return Err(err);
    }
    child.wait().await
}
