use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::error::LoadError;
use super::store::ContentStore;
use crate::models::{Chapter, ChapterSummary, Verse, ORIGIN_MEDINAN, ORIGIN_UNKNOWN};

/// Opening formula shared by nearly every chapter.
pub const INVOCATION: &str = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
const INVOCATION_TRANSLITERATION: &str = "பிஸ்மில்லாஹிர் ரஹ்மானிர் ரஹீம்";

/// Titles used when a chapter is neither bundled nor in the known table.
pub const COMING_SOON_NATIVE_NAME: &str = "سُورَةُ مُؤَقَّتَة";
pub const COMING_SOON_NAME: &str = "Coming Soon";
pub const COMING_SOON_TITLE: &str = "Data Not Available";

/// Number of verses in every synthesized chapter body.
pub const PLACEHOLDER_VERSE_COUNT: u32 = 3;

/// Body lines after the invocation: (text, transliteration).
const PLACEHOLDER_LINES: [(&str, &str); 2] = [
    (
        "[Sample Arabic text for demonstration]",
        "[Sample Tamil transliteration - முழு டேட்டா கிடைக்கவில்லை]",
    ),
    (
        "[Complete data coming soon...]",
        "[முழு தரவு விரைவில் வரும்...]",
    ),
];

/// Outcome of resolving a chapter number. Callers always receive a
/// well-formed chapter; the variant tells them where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterResolution {
    /// Bundled full content, returned verbatim.
    Resolved(Chapter),
    /// Titles from the known table with the placeholder body.
    PartialPlaceholder(Chapter),
    /// Nothing is known about the number; "coming soon" titles.
    UnknownPlaceholder(Chapter),
}

impl ChapterResolution {
    /// The chapter, whichever tier produced it.
    pub fn chapter(&self) -> &Chapter {
        match self {
            ChapterResolution::Resolved(chapter)
            | ChapterResolution::PartialPlaceholder(chapter)
            | ChapterResolution::UnknownPlaceholder(chapter) => chapter,
        }
    }

    pub fn into_chapter(self) -> Chapter {
        match self {
            ChapterResolution::Resolved(chapter)
            | ChapterResolution::PartialPlaceholder(chapter)
            | ChapterResolution::UnknownPlaceholder(chapter) => chapter,
        }
    }

    /// `true` for both synthesized tiers.
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, ChapterResolution::Resolved(_))
    }
}

/// Resolve a chapter after the simulated latency: bundled content first, then
/// the known-titles table, then the "coming soon" placeholder.
pub async fn fetch_chapter(
    store: &ContentStore,
    number: u32,
) -> Result<ChapterResolution, LoadError> {
    sleep(store.chapter_delay()).await;
    let resolution = resolve_chapter(store, number)?;
    info!(
        number,
        placeholder = resolution.is_placeholder(),
        verses = resolution.chapter().verses.len(),
        "chapter loaded"
    );
    Ok(resolution)
}

/// The synchronous core of [`fetch_chapter`]. Only a corrupt bundled chapter
/// file makes it fail.
pub fn resolve_chapter(store: &ContentStore, number: u32) -> Result<ChapterResolution, LoadError> {
    if let Some(chapter) = store.bundled_chapter(number)? {
        return Ok(ChapterResolution::Resolved(chapter));
    }

    // Placeholders must stay available even if the known-titles table is
    // unreadable; without it every number is treated as unknown.
    let known = store.extra_summaries().unwrap_or_else(|err| {
        warn!(number, error = %err, "known-titles table unavailable");
        Vec::new()
    });
    let upper_bound = known_titles_upper_bound(&known);
    match known.into_iter().find(|summary| summary.number == number) {
        Some(summary) => {
            debug!(number, "synthesizing chapter from known title");
            Ok(ChapterResolution::PartialPlaceholder(placeholder_chapter(
                &summary.native_name,
                &summary.transliterated_name,
                &summary.translated_title,
                number,
                upper_bound,
            )))
        }
        None => {
            debug!(number, "synthesizing unknown chapter");
            Ok(ChapterResolution::UnknownPlaceholder(placeholder_chapter(
                COMING_SOON_NATIVE_NAME,
                COMING_SOON_NAME,
                COMING_SOON_TITLE,
                number,
                upper_bound,
            )))
        }
    }
}

/// Highest chapter number covered by the known-titles table.
pub(crate) fn known_titles_upper_bound(known: &[ChapterSummary]) -> u32 {
    known.iter().map(|summary| summary.number).max().unwrap_or(0)
}

/// Origin given to synthesized chapters: the table's fixed category inside
/// its range, "Unknown" beyond it.
pub(crate) fn placeholder_origin(number: u32, upper_bound: u32) -> &'static str {
    if number <= upper_bound {
        ORIGIN_MEDINAN
    } else {
        ORIGIN_UNKNOWN
    }
}

/// Summary matching what [`resolve_chapter`] produces for an unknown number.
pub(crate) fn coming_soon_summary(number: u32, upper_bound: u32) -> ChapterSummary {
    ChapterSummary {
        number,
        native_name: COMING_SOON_NATIVE_NAME.to_string(),
        transliterated_name: COMING_SOON_NAME.to_string(),
        translated_title: COMING_SOON_TITLE.to_string(),
        origin_category: placeholder_origin(number, upper_bound).to_string(),
        verse_count: PLACEHOLDER_VERSE_COUNT,
    }
}

fn placeholder_chapter(
    native_name: &str,
    transliterated_name: &str,
    translated_title: &str,
    number: u32,
    upper_bound: u32,
) -> Chapter {
    Chapter {
        number,
        native_name: native_name.to_string(),
        transliterated_name: transliterated_name.to_string(),
        translated_title: translated_title.to_string(),
        origin_category: placeholder_origin(number, upper_bound).to_string(),
        verse_count: PLACEHOLDER_VERSE_COUNT,
        verses: placeholder_verses(),
    }
}

fn placeholder_verses() -> Vec<Verse> {
    std::iter::once((INVOCATION, INVOCATION_TRANSLITERATION))
        .chain(PLACEHOLDER_LINES)
        .zip(1u32..)
        .map(|((text, transliteration), position)| Verse {
            global_number: position,
            number_in_chapter: position,
            text: text.to_string(),
            transliteration: transliteration.to_string(),
            juz: 1,
            manzil: 1,
            page: 1,
            ruku: 1,
            hizb_quarter: 1,
            prostration_required: false,
        })
        .collect()
}
