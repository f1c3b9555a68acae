use crate::data::ChapterResolution;
use crate::models::{ChapterSummary, Verse};
use crate::search::ChapterFilter;

/// Lifecycle of data that arrives from a background fetch.
pub(crate) enum LoadState<T> {
    Loading,
    Loaded(T),
    /// Message of the underlying error, shown under the static failure text.
    Failed(String),
}

impl<T> LoadState<T> {
    pub(crate) fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// The chapter list with its search filter.
pub(crate) struct ListScreen {
    pub(crate) state: LoadState<ChapterFilter>,
}

impl ListScreen {
    pub(crate) fn loading() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    pub(crate) fn filter(&self) -> Option<&ChapterFilter> {
        self.state.loaded()
    }

    pub(crate) fn filter_mut(&mut self) -> Option<&mut ChapterFilter> {
        self.state.loaded_mut()
    }

    pub(crate) fn current(&self) -> Option<&ChapterSummary> {
        self.filter().and_then(ChapterFilter::current)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if let Some(filter) = self.filter_mut() {
            filter.move_selection(offset);
        }
    }

    pub(crate) fn select_first(&mut self) {
        if let Some(filter) = self.filter_mut() {
            filter.select_first();
        }
    }

    pub(crate) fn select_last(&mut self) {
        if let Some(filter) = self.filter_mut() {
            filter.select_last();
        }
    }

    pub(crate) fn set_query(&mut self, query: Option<String>) {
        if let Some(filter) = self.filter_mut() {
            filter.set_query(query);
        }
    }

    pub(crate) fn has_query(&self) -> bool {
        self.filter().and_then(ChapterFilter::query).is_some()
    }
}

/// One opened chapter. The summary handed over by the list screen provides
/// the title while the full chapter is still loading.
pub(crate) struct DetailScreen {
    pub(crate) summary: ChapterSummary,
    pub(crate) state: LoadState<ChapterResolution>,
    pub(crate) selected: usize,
    pub(crate) show_transliteration: bool,
}

impl DetailScreen {
    pub(crate) fn loading(summary: ChapterSummary) -> Self {
        Self {
            summary,
            state: LoadState::Loading,
            selected: 0,
            show_transliteration: false,
        }
    }

    pub(crate) fn title(&self) -> &str {
        &self.summary.transliterated_name
    }

    pub(crate) fn verses(&self) -> &[Verse] {
        self.state
            .loaded()
            .map(|resolution| resolution.chapter().verses.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn current_verse(&self) -> Option<&Verse> {
        self.verses().get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.verses().len();
        if len == 0 {
            return;
        }
        let last = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.verses().len().saturating_sub(1);
    }
}
