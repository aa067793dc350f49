//! Host capabilities the fetcher needs but does not implement itself.

use std::future::Future;

use crate::error::{ClipboardError, ShareError};

/// What gets handed to the platform share action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

impl SharePayload {
    /// Message body with the link on its own line, for targets that only take text.
    pub fn message(&self) -> String {
        match &self.url {
            Some(url) => format!("{}\n{}", self.text, url),
            None => self.text.clone(),
        }
    }
}

/// Clipboard and share run out of process, so both are awaited rather than
/// blocking the caller's thread.
pub trait Platform: Send + Sync + 'static {
    fn write_clipboard(&self, text: &str)
        -> impl Future<Output = Result<(), ClipboardError>> + Send;

    /// Probe for a share capability. Checked before every share.
    fn can_share(&self) -> bool;

    fn share(&self, payload: &SharePayload) -> impl Future<Output = Result<(), ShareError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_and_without_url() {
        let mut payload = SharePayload {
            title: "Verse of the Day".to_string(),
            text: "Jesus wept. \u{2014} John 11:35 (KJV)".to_string(),
            url: None,
        };
        assert_eq!(payload.message(), "Jesus wept. \u{2014} John 11:35 (KJV)");

        payload.url = Some("https://example.test".to_string());
        assert_eq!(
            payload.message(),
            "Jesus wept. \u{2014} John 11:35 (KJV)\nhttps://example.test"
        );
    }
}
