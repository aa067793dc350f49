pub mod books;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod html;
pub mod platform;
pub mod sources;
pub mod state;
pub mod translation;
pub mod verse;

// Re-export main types for convenience
pub use books::BookLookup;
pub use config::{ApiKey, Config};
pub use error::{ClipboardError, ShareError, VerseError};
pub use fetcher::{FetcherOptions, VerseFetcher};
pub use platform::{Platform, SharePayload};
pub use sources::{ApiBibleClient, CanonicalVerseSource, LabsBibleClient, RandomVerseSource};
pub use state::VerseState;
pub use translation::Translation;
pub use verse::{CanonicalVerseId, RandomVerseRecord, VersePayload};
