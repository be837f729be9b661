//! Search index documents.

mod track;

pub use track::{date_seconds, track_document, IndexOutcome, TrackIndexer};
