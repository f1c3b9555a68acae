//! Content access split across logical submodules: the file-backed store,
//! the catalog provider and the chapter resolver.

mod catalog;
mod error;
mod resolver;
mod store;

pub use catalog::{build_catalog, fetch_catalog, CHAPTER_COUNT};
pub use error::{ContentError, LoadError};
pub use resolver::{
    fetch_chapter, resolve_chapter, ChapterResolution, COMING_SOON_NAME, COMING_SOON_NATIVE_NAME,
    COMING_SOON_TITLE, INVOCATION, PLACEHOLDER_VERSE_COUNT,
};
pub use store::{
    CatalogFill, ContentSource, ContentStore, DEFAULT_CATALOG_DELAY, DEFAULT_CHAPTER_DELAY,
    EXTRA_SUMMARIES_FILE, TABLE_OF_CONTENTS_FILE,
};
