//! The verse widget's behaviour, independent of how it is drawn.
//!
//! Operations start their network work as spawned tasks and return at once,
//! like a UI event handler would. Finished tasks are applied by [`VerseFetcher::poll`]
//! (called from the UI tick) or awaited all together by [`VerseFetcher::settle`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{ClipboardError, ShareError, VerseError};
use crate::platform::{Platform, SharePayload};
use crate::sources::{CanonicalVerseSource, RandomVerseSource};
use crate::state::{FetchTicket, VerseState};
use crate::translation::Translation;
use crate::verse::{CanonicalVerseId, VersePayload};

pub const SHARE_TITLE: &str = "Verse of the Day";

#[derive(Debug, Clone)]
pub struct FetcherOptions {
    pub translation: Translation,
    /// Upper bound on each remote call.
    pub timeout: Duration,
    pub share_url: Option<String>,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            translation: Translation::default(),
            timeout: Duration::from_secs(10),
            share_url: None,
        }
    }
}

enum Job {
    /// Random lookup plus book-code mapping. Success starts a canonical fetch.
    Random(JoinHandle<Result<CanonicalVerseId, VerseError>>),
    Canonical(JoinHandle<Result<VersePayload, VerseError>>),
}

struct PendingFetch {
    ticket: FetchTicket,
    job: Job,
}

impl PendingFetch {
    fn is_finished(&self) -> bool {
        match &self.job {
            Job::Random(handle) => handle.is_finished(),
            Job::Canonical(handle) => handle.is_finished(),
        }
    }
}

pub struct VerseFetcher<R, C, P> {
    random: Arc<R>,
    canonical: Arc<C>,
    platform: Arc<P>,
    timeout: Duration,
    share_url: Option<String>,
    state: VerseState,
    pending: Vec<PendingFetch>,
}

impl<R, C, P> VerseFetcher<R, C, P>
where
    R: RandomVerseSource,
    C: CanonicalVerseSource,
    P: Platform,
{
    pub fn new(random: Arc<R>, canonical: Arc<C>, platform: Arc<P>, options: FetcherOptions) -> Self {
        Self {
            random,
            canonical,
            platform,
            timeout: options.timeout,
            share_url: options.share_url,
            state: VerseState::new(options.translation),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &VerseState {
        &self.state
    }

    pub fn translation(&self) -> Translation {
        self.state.translation
    }

    pub fn is_copied(&self) -> bool {
        self.state.is_copied(Instant::now())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Fetch `id` in `translation` from the canonical source and show it.
    pub fn fetch_canonical_verse(&mut self, translation: Translation, id: CanonicalVerseId) {
        let ticket = self.state.begin_fetch();
        tracing::debug!(verse_id = %id, %translation, "fetching verse");

        let source = Arc::clone(&self.canonical);
        let timeout = self.timeout;
        let handle = tokio::spawn(async move { load_canonical(source, translation, id, timeout).await });

        self.pending.push(PendingFetch {
            ticket,
            job: Job::Canonical(handle),
        });
    }

    /// Ask the random source for a verse, then load it in the current translation.
    pub fn request_random_verse(&mut self) {
        let ticket = self.state.begin_fetch();
        tracing::debug!("requesting random verse");

        let source = Arc::clone(&self.random);
        let timeout = self.timeout;
        let handle = tokio::spawn(async move { resolve_random(source, timeout).await });

        self.pending.push(PendingFetch {
            ticket,
            job: Job::Random(handle),
        });
    }

    /// Switch translation and reload the verse on display under it.
    ///
    /// A random verse still being resolved picks up the new translation when
    /// it lands, so it is left to finish instead of being superseded.
    pub fn set_translation(&mut self, translation: Translation) {
        self.state.translation = translation;
        if self.random_in_flight() {
            tracing::debug!(%translation, "translation recorded for pending random verse");
            return;
        }
        if let Some(id) = self.state.verse_id.clone() {
            self.fetch_canonical_verse(translation, id);
        }
    }

    fn random_in_flight(&self) -> bool {
        self.pending
            .iter()
            .any(|p| matches!(p.job, Job::Random(_)) && self.state.is_latest(p.ticket))
    }

    /// Copy the displayed verse as plain text. Returns `Ok(false)` when there
    /// is nothing to copy.
    pub async fn copy_to_clipboard(&mut self) -> Result<bool, ClipboardError> {
        let Some(payload) = &self.state.payload else {
            return Ok(false);
        };
        let text = payload.share_text();

        let result = tokio::time::timeout(self.timeout, self.platform.write_clipboard(&text))
            .await
            .unwrap_or_else(|_| Err(ClipboardError("clipboard program timed out".to_string())));

        match result {
            Ok(()) => {
                self.state.mark_copied(Instant::now());
                self.state.notice = None;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(kind = "clipboard", error = %err, "copy failed");
                self.state.notice = Some("Could not copy to clipboard".to_string());
                Err(err)
            }
        }
    }

    /// Hand the displayed verse to the platform share action. Returns
    /// `Ok(false)` when there is nothing to share.
    pub async fn share_verse(&mut self) -> Result<bool, ShareError> {
        if !self.platform.can_share() {
            tracing::warn!(kind = "share_unavailable", "share capability not available");
            self.state.notice = Some("Sharing is not supported here".to_string());
            return Err(ShareError::Unavailable);
        }
        let Some(payload) = &self.state.payload else {
            return Ok(false);
        };

        let share = SharePayload {
            title: SHARE_TITLE.to_string(),
            text: payload.share_text(),
            url: self.share_url.clone(),
        };

        let result = tokio::time::timeout(self.timeout, self.platform.share(&share))
            .await
            .unwrap_or_else(|_| Err(ShareError::Rejected("share command timed out".to_string())));

        match result {
            Ok(()) => {
                self.state.notice = Some("Verse shared".to_string());
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(kind = "share_rejected", error = %err, "share failed");
                self.state.notice = Some("Could not share verse".to_string());
                Err(err)
            }
        }
    }

    pub fn clear_notice(&mut self) {
        self.state.notice = None;
    }

    /// Expire the copied indicator. Called from the UI tick.
    pub fn tick(&mut self) {
        self.state.expire(Instant::now());
    }

    /// Apply every fetch that has finished. Returns true if anything was applied.
    pub async fn poll(&mut self) -> bool {
        let mut applied = false;
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].is_finished() {
                let fetch = self.pending.remove(i);
                self.complete(fetch).await;
                applied = true;
            } else {
                i += 1;
            }
        }
        applied
    }

    /// Wait for all outstanding fetches, including ones they start, and apply them.
    pub async fn settle(&mut self) {
        while !self.pending.is_empty() {
            let fetch = self.pending.remove(0);
            self.complete(fetch).await;
        }
    }

    async fn complete(&mut self, fetch: PendingFetch) {
        let PendingFetch { ticket, job } = fetch;
        match job {
            Job::Canonical(handle) => {
                let result = handle.await.unwrap_or_else(|e| Err(task_failed(e)));
                self.state.finish_fetch(ticket, result);
            }
            Job::Random(handle) => {
                let result = handle.await.unwrap_or_else(|e| Err(task_failed(e)));
                if !self.state.is_latest(ticket) {
                    tracing::debug!("discarding stale random verse");
                    return;
                }
                match result {
                    Ok(id) => {
                        self.state.verse_id = Some(id.clone());
                        let translation = self.state.translation;
                        self.fetch_canonical_verse(translation, id);
                    }
                    Err(err) => {
                        self.state.fail_fetch(ticket, err);
                    }
                }
            }
        }
    }
}

fn task_failed(err: tokio::task::JoinError) -> VerseError {
    VerseError::Network {
        source_name: "fetch task",
        message: err.to_string(),
    }
}

async fn load_canonical<C: CanonicalVerseSource>(
    source: Arc<C>,
    translation: Translation,
    id: CanonicalVerseId,
    timeout: Duration,
) -> Result<VersePayload, VerseError> {
    match tokio::time::timeout(timeout, source.verse(translation, &id)).await {
        Ok(result) => result,
        Err(_) => Err(VerseError::TimedOut {
            source_name: source.name(),
            secs: timeout.as_secs(),
        }),
    }
}

async fn resolve_random<R: RandomVerseSource>(
    source: Arc<R>,
    timeout: Duration,
) -> Result<CanonicalVerseId, VerseError> {
    let record = match tokio::time::timeout(timeout, source.random_verse()).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(VerseError::TimedOut {
                source_name: source.name(),
                secs: timeout.as_secs(),
            })
        }
    };

    record.verse_id().map_err(|err| {
        tracing::warn!(
            kind = err.kind(),
            book = %record.bookname,
            chapter = record.chapter,
            verse = record.verse,
            "random verse book has no canonical code"
        );
        err
    })
}
