use std::collections::HashSet;

use tokio::time::sleep;
use tracing::info;

use super::error::LoadError;
use super::resolver::{coming_soon_summary, known_titles_upper_bound};
use super::store::{CatalogFill, ContentStore};
use crate::models::ChapterSummary;

/// Number of chapters in the complete corpus.
pub const CHAPTER_COUNT: u32 = 114;

/// Load the chapter list after the simulated latency. Bundled summaries come
/// first, extras fill in numbers the bundle lacks, and the result is ordered
/// by chapter number.
pub async fn fetch_catalog(store: &ContentStore) -> Result<Vec<ChapterSummary>, LoadError> {
    sleep(store.catalog_delay()).await;
    let catalog = build_catalog(store)?;
    info!(count = catalog.len(), fill = ?store.fill(), "catalog loaded");
    Ok(catalog)
}

/// The synchronous core of [`fetch_catalog`].
pub fn build_catalog(store: &ContentStore) -> Result<Vec<ChapterSummary>, LoadError> {
    let mut chapters = store.table_of_contents()?;
    let extras = store.extra_summaries()?;
    let upper_bound = known_titles_upper_bound(&extras);

    let mut seen: HashSet<u32> = chapters.iter().map(|summary| summary.number).collect();
    for extra in extras {
        if seen.insert(extra.number) {
            chapters.push(extra);
        }
    }

    if store.fill() == CatalogFill::FullRange {
        for number in 1..=CHAPTER_COUNT {
            if seen.insert(number) {
                chapters.push(coming_soon_summary(number, upper_bound));
            }
        }
    }

    // Stable, so an already ascending authored order is left untouched.
    chapters.sort_by_key(|summary| summary.number);
    Ok(chapters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ORIGIN_UNKNOWN;

    #[test]
    fn default_catalog_is_bundled_plus_extras() {
        let catalog = build_catalog(&ContentStore::default()).unwrap();
        let numbers: Vec<u32> = catalog.iter().map(|summary| summary.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn full_range_fills_every_chapter_once() {
        let store = ContentStore::default().with_fill(CatalogFill::FullRange);
        let catalog = build_catalog(&store).unwrap();
        assert_eq!(catalog.len(), CHAPTER_COUNT as usize);
        assert!(catalog
            .iter()
            .zip(1u32..)
            .all(|(summary, expected)| summary.number == expected));
        assert_eq!(catalog[2].transliterated_name, "Aal-E-Imran");
        assert_eq!(catalog[113].origin_category, ORIGIN_UNKNOWN);
    }
}
