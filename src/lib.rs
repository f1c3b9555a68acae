//! Core library surface for the Sura Reader TUI. The binary only wires these
//! pieces together, so tests and other tooling can reuse the catalog, the
//! resolver and the search filter without a terminal.
pub mod audio;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod models;
pub mod search;
pub mod ui;

/// Content access: the two async fetches and their error type.
pub use data::{fetch_catalog, fetch_chapter, ChapterResolution, ContentStore, LoadError};

/// The domain types every layer passes around.
pub use models::{Chapter, ChapterSummary, Verse};

pub use audio::{audio_url, PlaybackError, PlaybackState, Player};
pub use search::filter_chapters;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
