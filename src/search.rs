//! In-memory search over the catalog, used by the list screen.

use crate::models::ChapterSummary;

/// Keep the summaries where the query appears in the chapter number or in any
/// of the text fields. Text comparison is case-insensitive; the number is
/// matched against its decimal form. A blank query returns everything.
pub fn filter_chapters(all: &[ChapterSummary], query: &str) -> Vec<ChapterSummary> {
    if query.trim().is_empty() {
        return all.to_vec();
    }

    let needle = query.to_lowercase();
    all.iter()
        .filter(|summary| matches_query(summary, query, &needle))
        .cloned()
        .collect()
}

fn matches_query(summary: &ChapterSummary, raw: &str, needle: &str) -> bool {
    summary.number.to_string().contains(raw)
        || [
            &summary.native_name,
            &summary.transliterated_name,
            &summary.translated_title,
            &summary.origin_category,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Catalog list plus the active filter and a selection that stays in bounds
/// as the filtered view shrinks.
#[derive(Debug, Default)]
pub struct ChapterFilter {
    chapters: Vec<ChapterSummary>,
    filtered: Vec<ChapterSummary>,
    query: Option<String>,
    selected: usize,
}

impl ChapterFilter {
    /// Wrap a freshly loaded catalog with no query applied.
    pub fn new(chapters: Vec<ChapterSummary>) -> Self {
        let mut filter = Self {
            chapters,
            ..Self::default()
        };
        filter.apply();
        filter
    }

    /// Replace the query (`None` clears it) and re-run the filter.
    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query;
        self.apply();
    }

    /// The active query, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Summaries that pass the current query, in catalog order.
    pub fn visible(&self) -> &[ChapterSummary] {
        &self.filtered
    }

    /// Index of the highlighted row within [`ChapterFilter::visible`].
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> Option<&ChapterSummary> {
        self.filtered.get(self.selected)
    }

    /// Move the highlight by `offset` rows, stopping at either end.
    pub fn move_selection(&mut self, offset: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    fn apply(&mut self) {
        self.filtered = match &self.query {
            Some(query) => filter_chapters(&self.chapters, query),
            None => self.chapters.clone(),
        };
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }
}
