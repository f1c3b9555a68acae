use std::fs;
use std::time::Duration;

use pretty_assertions::assert_eq;
use sura_reader::audio_url;
use sura_reader::data::{
    fetch_chapter, resolve_chapter, ChapterResolution, ContentError, ContentSource, ContentStore,
    LoadError, COMING_SOON_NAME, COMING_SOON_NATIVE_NAME, COMING_SOON_TITLE, EXTRA_SUMMARIES_FILE,
    INVOCATION, PLACEHOLDER_VERSE_COUNT, TABLE_OF_CONTENTS_FILE,
};
use sura_reader::models::{ORIGIN_MEDINAN, ORIGIN_UNKNOWN};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn sura_one_is_bundled_content() {
    let store = ContentStore::default();
    let started = Instant::now();
    let resolution = fetch_chapter(&store, 1).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(300));

    let ChapterResolution::Resolved(chapter) = resolution else {
        panic!("sura 1 should resolve to bundled content");
    };
    assert_eq!(chapter.verses.len(), chapter.verse_count as usize);
    assert_eq!(chapter.verses[0].number_in_chapter, 1);
    assert_eq!(chapter.transliterated_name, "Al-Faatiha");
    assert_eq!(
        audio_url(chapter.verses[6].global_number),
        "https://cdn.islamic.network/quran/audio/128/ar.alafasy/7.mp3"
    );
}

#[tokio::test(start_paused = true)]
async fn known_title_gets_placeholder_body() {
    let resolution = fetch_chapter(&ContentStore::default(), 3).await.unwrap();
    let ChapterResolution::PartialPlaceholder(chapter) = resolution else {
        panic!("sura 3 has a known title only");
    };
    assert_eq!(chapter.number, 3);
    assert_eq!(chapter.transliterated_name, "Aal-E-Imran");
    assert_eq!(chapter.translated_title, "The Family of Imran");
    assert_eq!(chapter.origin_category, ORIGIN_MEDINAN);
    assert_eq!(chapter.verses.len(), 3);
    assert_eq!(chapter.verse_count, PLACEHOLDER_VERSE_COUNT);
    assert_eq!(chapter.verses[0].text, INVOCATION);
    assert!(chapter.verses[1].text.contains("Sample"));
}

#[tokio::test(start_paused = true)]
async fn unknown_number_is_coming_soon() {
    for number in [6, 114, 9_999] {
        let resolution = fetch_chapter(&ContentStore::default(), number).await.unwrap();
        let ChapterResolution::UnknownPlaceholder(chapter) = resolution else {
            panic!("sura {number} is unknown");
        };
        assert_eq!(chapter.number, number);
        assert_eq!(chapter.native_name, COMING_SOON_NATIVE_NAME);
        assert_eq!(chapter.transliterated_name, COMING_SOON_NAME);
        assert_eq!(chapter.translated_title, COMING_SOON_TITLE);
        assert_eq!(chapter.origin_category, ORIGIN_UNKNOWN);
        assert_eq!(chapter.verses.len(), 3);
    }
}

#[test]
fn directory_content_is_returned_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(TABLE_OF_CONTENTS_FILE), r#"{"suras": []}"#).unwrap();
    fs::write(
        dir.path().join("112_sura_al_ikhlaas.json"),
        r#"{"number": 112, "name": "سُورَةُ الإِخۡلَاصِ", "englishName": "Al-Ikhlaas",
            "englishNameTranslation": "Sincerity", "revelationType": "Meccan",
            "numberOfAyahs": 2, "ayahs": [
              {"number": 6222, "text": "a", "numberInSurah": 1, "juz": 30, "manzil": 7,
               "page": 604, "ruku": 553, "hizbQuarter": 240, "sajda": false},
              {"number": "6223", "text": "b", "numberInSurah": "2", "juz": 30, "manzil": 7,
               "page": 604, "ruku": 553, "hizbQuarter": 240, "sajda": false}
            ]}"#,
    )
    .unwrap();
    let store = ContentStore::new(ContentSource::Directory(dir.path().to_path_buf()));

    let resolution = resolve_chapter(&store, 112).unwrap();
    assert!(!resolution.is_placeholder());
    let chapter = resolution.into_chapter();
    assert_eq!(chapter.verses[1].global_number, 6223);
    assert_eq!(chapter.verses[1].page, 604);
    assert_eq!(chapter.summary().translated_title, "Sincerity");
}

#[test]
fn corrupted_bundled_chapter_names_the_number() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("2_sura_al_baqara.json"),
        r#"{"number": 2, "name": "n", "englishName": "Al-Baqarah",
            "englishNameTranslation": "The Cow", "revelationType": "Medinan",
            "numberOfAyahs": 286, "ayahs": []}"#,
    )
    .unwrap();
    fs::write(dir.path().join("4_sura_an_nisa.json"), "[1, 2").unwrap();
    let store = ContentStore::new(ContentSource::Directory(dir.path().to_path_buf()));

    let err = resolve_chapter(&store, 2).unwrap_err();
    assert_eq!(err.to_string(), "failed to load sura 2 data");
    assert!(matches!(
        err,
        LoadError::Chapter {
            number: 2,
            source: ContentError::Invalid(_)
        }
    ));

    let err = resolve_chapter(&store, 4).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Chapter {
            number: 4,
            source: ContentError::Decode(_)
        }
    ));

    // Chapters without a file still fall back.
    assert!(resolve_chapter(&store, 5).unwrap().is_placeholder());
}

#[test]
fn broken_known_titles_table_still_yields_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(TABLE_OF_CONTENTS_FILE), r#"{"suras": []}"#).unwrap();
    fs::write(dir.path().join(EXTRA_SUMMARIES_FILE), "{ broken").unwrap();
    let store = ContentStore::new(ContentSource::Directory(dir.path().to_path_buf()));

    for number in [3, 999] {
        let resolution = resolve_chapter(&store, number).unwrap();
        let ChapterResolution::UnknownPlaceholder(chapter) = resolution else {
            panic!("sura {number} should fall back to the coming-soon placeholder");
        };
        assert_eq!(chapter.number, number);
        assert_eq!(chapter.transliterated_name, COMING_SOON_NAME);
        assert_eq!(chapter.origin_category, ORIGIN_UNKNOWN);
        assert_eq!(chapter.verses.len(), PLACEHOLDER_VERSE_COUNT as usize);
    }
}
