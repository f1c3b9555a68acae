use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::error::{ContentError, LoadError};
use crate::models::{Chapter, ChapterSummary};

/// File name of the table of contents inside a content directory.
pub const TABLE_OF_CONTENTS_FILE: &str = "table_of_contents.json";
/// File name of the extra known summaries table.
pub const EXTRA_SUMMARIES_FILE: &str = "extra_summaries.json";

const EMBEDDED_TABLE_OF_CONTENTS: &str =
    include_str!("../../assets/quran/table_of_contents.json");
const EMBEDDED_EXTRA_SUMMARIES: &str = include_str!("../../assets/quran/extra_summaries.json");
/// Chapters that ship with full content compiled into the binary.
const EMBEDDED_CHAPTERS: &[(u32, &str)] = &[(
    1,
    include_str!("../../assets/quran/1_sura_al_faatiha.json"),
)];

/// Default simulated latency for the catalog fetch.
pub const DEFAULT_CATALOG_DELAY: Duration = Duration::from_millis(500);
/// Default simulated latency for a chapter fetch.
pub const DEFAULT_CHAPTER_DELAY: Duration = Duration::from_millis(300);

/// Where the JSON files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// The files compiled into the binary from `assets/quran`.
    Embedded,
    /// A directory laid out like `assets/quran`. A missing extras table falls
    /// back to the embedded one.
    Directory(PathBuf),
}

/// How the catalog treats chapters that have neither bundled data nor an
/// entry in the extras table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogFill {
    /// Only bundled chapters plus the extras table; the gap stays visible.
    #[default]
    Extras,
    /// Synthesize "coming soon" summaries for every remaining chapter.
    FullRange,
}

/// Shape shared by the table of contents and the extras table.
#[derive(Deserialize)]
struct SummaryFile {
    suras: Vec<ChapterSummary>,
}

/// Read-only access to the bundled content plus the knobs that shape how it
/// is served. Cheap to share behind an `Arc` across fetch tasks.
#[derive(Debug, Clone)]
pub struct ContentStore {
    source: ContentSource,
    catalog_delay: Duration,
    chapter_delay: Duration,
    fill: CatalogFill,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new(ContentSource::Embedded)
    }
}

impl ContentStore {
    /// Store over `source` with the default delays and fill policy.
    pub fn new(source: ContentSource) -> Self {
        Self {
            source,
            catalog_delay: DEFAULT_CATALOG_DELAY,
            chapter_delay: DEFAULT_CHAPTER_DELAY,
            fill: CatalogFill::default(),
        }
    }

    /// Override the simulated latencies; tests pass `Duration::ZERO`.
    pub fn with_delays(mut self, catalog: Duration, chapter: Duration) -> Self {
        self.catalog_delay = catalog;
        self.chapter_delay = chapter;
        self
    }

    pub fn with_fill(mut self, fill: CatalogFill) -> Self {
        self.fill = fill;
        self
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Latency applied before the catalog is returned.
    pub fn catalog_delay(&self) -> Duration {
        self.catalog_delay
    }

    /// Latency applied before a chapter is returned.
    pub fn chapter_delay(&self) -> Duration {
        self.chapter_delay
    }

    /// Policy for chapters missing from both tables.
    pub fn fill(&self) -> CatalogFill {
        self.fill
    }

    /// Summaries exactly as authored in the table of contents.
    pub fn table_of_contents(&self) -> Result<Vec<ChapterSummary>, LoadError> {
        let raw = match &self.source {
            ContentSource::Embedded => EMBEDDED_TABLE_OF_CONTENTS.to_string(),
            ContentSource::Directory(dir) => read_file(&dir.join(TABLE_OF_CONTENTS_FILE))
                .map_err(|source| LoadError::Catalog { source })?,
        };
        parse_summaries(&raw).map_err(|source| LoadError::Catalog { source })
    }

    /// The table of extra known summaries. It also serves as the known-titles
    /// table for placeholder chapters.
    pub fn extra_summaries(&self) -> Result<Vec<ChapterSummary>, LoadError> {
        let raw = match &self.source {
            ContentSource::Directory(dir) if dir.join(EXTRA_SUMMARIES_FILE).is_file() => {
                read_file(&dir.join(EXTRA_SUMMARIES_FILE))
                    .map_err(|source| LoadError::ExtraSummaries { source })?
            }
            _ => EMBEDDED_EXTRA_SUMMARIES.to_string(),
        };
        parse_summaries(&raw).map_err(|source| LoadError::ExtraSummaries { source })
    }

    /// Full bundled content for `number`, or `None` when the chapter has no
    /// bundled file. A file that exists but cannot be used is an error.
    pub fn bundled_chapter(&self, number: u32) -> Result<Option<Chapter>, LoadError> {
        let raw = match &self.source {
            ContentSource::Embedded => EMBEDDED_CHAPTERS
                .iter()
                .find(|(embedded, _)| *embedded == number)
                .map(|(_, raw)| raw.to_string()),
            ContentSource::Directory(dir) => match chapter_file(dir, number) {
                Some(path) => Some(
                    read_file(&path).map_err(|source| LoadError::Chapter { number, source })?,
                ),
                None => None,
            },
        };

        let Some(raw) = raw else {
            debug!(number, "no bundled content for chapter");
            return Ok(None);
        };

        let chapter = parse_chapter(&raw).map_err(|source| LoadError::Chapter { number, source })?;
        if chapter.number != number {
            return Err(LoadError::Chapter {
                number,
                source: ContentError::Invalid(format!(
                    "file declares sura {} instead",
                    chapter.number
                )),
            });
        }
        Ok(Some(chapter))
    }
}

/// Locate `{number}.json` or `{number}_<slug>.json` inside `dir`.
fn chapter_file(dir: &Path, number: u32) -> Option<PathBuf> {
    let exact = dir.join(format!("{number}.json"));
    if exact.is_file() {
        return Some(exact);
    }

    let prefix = format!("{number}_");
    let entries = fs::read_dir(dir).ok()?;
    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

fn read_file(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_summaries(raw: &str) -> Result<Vec<ChapterSummary>, ContentError> {
    let file: SummaryFile = serde_json::from_str(raw)?;
    Ok(file.suras)
}

fn parse_chapter(raw: &str) -> Result<Chapter, ContentError> {
    let chapter: Chapter = serde_json::from_str(raw)?;
    chapter.check_invariants().map_err(ContentError::Invalid)?;
    Ok(chapter)
}
