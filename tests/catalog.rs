use std::fs;
use std::time::Duration;

use pretty_assertions::assert_eq;
use sura_reader::data::{
    build_catalog, fetch_catalog, CatalogFill, ContentSource, ContentStore, LoadError,
    CHAPTER_COUNT, TABLE_OF_CONTENTS_FILE,
};
use tokio::time::Instant;

fn numbers(store: &ContentStore) -> Vec<u32> {
    build_catalog(store)
        .unwrap()
        .iter()
        .map(|summary| summary.number)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn catalog_is_non_empty_ascending_and_idempotent() {
    let store = ContentStore::default();
    let started = Instant::now();
    let first = fetch_catalog(&store).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(500));

    assert!(!first.is_empty());
    assert!(first.windows(2).all(|pair| pair[0].number < pair[1].number));

    let second = fetch_catalog(&store).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn bundled_entry_comes_first_with_extras_appended() {
    let catalog = fetch_catalog(&ContentStore::default()).await.unwrap();
    let names: Vec<&str> = catalog
        .iter()
        .map(|summary| summary.transliterated_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Al-Faatiha", "Al-Baqarah", "Aal-E-Imran", "An-Nisa", "Al-Maidah"]
    );
    assert_eq!(catalog[0].verse_count, 7);
    assert_eq!(catalog[1].verse_count, 286);
}

#[test]
fn bundled_numbers_win_over_extras() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(TABLE_OF_CONTENTS_FILE),
        r#"{"suras": [
            {"number": 1, "name": "a", "englishName": "One", "englishNameTranslation": "x",
             "revelationType": "Meccan", "numberOfAyahs": 7},
            {"number": 3, "name": "c", "englishName": "Bundled Three", "englishNameTranslation": "y",
             "revelationType": "Medinan", "numberOfAyahs": 200}
        ]}"#,
    )
    .unwrap();
    let store = ContentStore::new(ContentSource::Directory(dir.path().to_path_buf()));

    let catalog = build_catalog(&store).unwrap();
    assert_eq!(
        catalog.iter().map(|s| s.number).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert_eq!(catalog[2].transliterated_name, "Bundled Three");
}

#[test]
fn full_range_covers_every_chapter() {
    let store = ContentStore::default().with_fill(CatalogFill::FullRange);
    assert_eq!(numbers(&store), (1..=CHAPTER_COUNT).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn malformed_table_of_contents_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(TABLE_OF_CONTENTS_FILE), "{ not json").unwrap();
    let store = ContentStore::new(ContentSource::Directory(dir.path().to_path_buf()))
        .with_delays(Duration::ZERO, Duration::ZERO);

    let err = fetch_catalog(&store).await.unwrap_err();
    assert!(matches!(err, LoadError::Catalog { .. }));
    assert_eq!(err.to_string(), "failed to load table of contents");
}
