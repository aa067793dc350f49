//! UI-agnostic session state
//!
//! Everything the widget shows lives here: the selected translation, the
//! verse being displayed and the loading/error/copied flags. The fetcher is
//! the only writer; UIs read it.

use std::time::Duration;
use tokio::time::Instant;

use crate::error::VerseError;
use crate::translation::Translation;
use crate::verse::{CanonicalVerseId, VersePayload};

/// How long the "copied" indicator stays up.
pub const COPIED_WINDOW: Duration = Duration::from_secs(2);

/// Identifies one issued fetch. Only the most recently issued ticket may
/// change what is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
pub struct VerseState {
    pub translation: Translation,
    pub verse_id: Option<CanonicalVerseId>,
    pub payload: Option<VersePayload>,
    pub loading: bool,
    pub error: Option<VerseError>,
    /// One-line message for clipboard and share results.
    pub notice: Option<String>,
    copied_at: Option<Instant>,
    issued: u64,
}

impl VerseState {
    pub fn new(translation: Translation) -> Self {
        Self {
            translation,
            verse_id: None,
            payload: None,
            loading: false,
            error: None,
            notice: None,
            copied_at: None,
            issued: 0,
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket(self.issued)
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply a finished canonical fetch. Returns false when a newer fetch
    /// has been issued since, in which case nothing changes.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<VersePayload, VerseError>,
    ) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "discarding stale verse result");
            return false;
        }

        self.loading = false;
        match result {
            Ok(payload) => {
                tracing::info!(
                    reference = %payload.reference,
                    translation = %payload.translation,
                    "verse loaded"
                );
                self.payload = Some(payload);
                self.error = None;
            }
            Err(err) => self.record_failure(err),
        }
        true
    }

    /// Mark the fetch behind `ticket` as failed without a payload step.
    pub fn fail_fetch(&mut self, ticket: FetchTicket, err: VerseError) -> bool {
        self.finish_fetch(ticket, Err(err))
    }

    fn record_failure(&mut self, err: VerseError) {
        tracing::warn!(kind = err.kind(), error = %err, "could not load verse");
        self.error = Some(err);
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPIED_WINDOW)
            .unwrap_or(false)
    }

    /// Drop the copied marker once its window has passed.
    pub fn expire(&mut self, now: Instant) {
        if !self.is_copied(now) {
            self.copied_at = None;
        }
    }
}
