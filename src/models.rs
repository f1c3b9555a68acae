//! Domain models for chapters and verses. These types stay light-weight data
//! holders; they are decoded straight from the bundled JSON files so the field
//! renames below double as the documentation of the persisted format.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Origin label used by the known chapters revealed in Mecca.
pub const ORIGIN_MECCAN: &str = "Meccan";
/// Origin label used by the known chapters revealed in Medina.
pub const ORIGIN_MEDINAN: &str = "Medinan";
/// Origin label for synthesized chapters outside the known-titles table.
pub const ORIGIN_UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// One row of the table of contents. `number` is the canonical reading order
/// and the key used to resolve the full chapter.
pub struct ChapterSummary {
    #[serde(deserialize_with = "lenient_u32")]
    pub number: u32,
    /// Chapter name in the source script.
    #[serde(rename = "name")]
    pub native_name: String,
    /// Latin transliteration, also used as the detail screen title.
    #[serde(rename = "englishName")]
    pub transliterated_name: String,
    /// English meaning of the name.
    #[serde(rename = "englishNameTranslation")]
    pub translated_title: String,
    /// Open-ended label; see the `ORIGIN_*` constants for the observed values.
    #[serde(rename = "revelationType")]
    pub origin_category: String,
    #[serde(rename = "numberOfAyahs")]
    pub verse_count: u32,
}

impl fmt::Display for ChapterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.transliterated_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Full chapter record as stored in the per-chapter files.
pub struct Chapter {
    /// Position in the canonical order, 1-based.
    #[serde(deserialize_with = "lenient_u32")]
    pub number: u32,
    /// Chapter name in the source script.
    #[serde(rename = "name")]
    pub native_name: String,
    /// Latin transliteration of the name.
    #[serde(rename = "englishName")]
    pub transliterated_name: String,
    /// English meaning of the name.
    #[serde(rename = "englishNameTranslation")]
    pub translated_title: String,
    #[serde(rename = "revelationType")]
    pub origin_category: String,
    /// Declared verse count; must equal `verses.len()`.
    #[serde(rename = "numberOfAyahs")]
    pub verse_count: u32,
    /// Verses in reading order.
    #[serde(rename = "ayahs")]
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// Project the chapter back into the shape the list screen works with.
    pub fn summary(&self) -> ChapterSummary {
        ChapterSummary {
            number: self.number,
            native_name: self.native_name.clone(),
            transliterated_name: self.transliterated_name.clone(),
            translated_title: self.translated_title.clone(),
            origin_category: self.origin_category.clone(),
            verse_count: self.verse_count,
        }
    }

    /// Validate the verse numbering: positions run `1..=verse_count` in order
    /// and global numbers strictly increase. Returns a human-readable reason
    /// on the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.verses.len() != self.verse_count as usize {
            return Err(format!(
                "numberOfAyahs is {} but {} ayahs are present",
                self.verse_count,
                self.verses.len()
            ));
        }

        let mut previous_global: Option<u32> = None;
        for (index, verse) in self.verses.iter().enumerate() {
            let expected = index as u32 + 1;
            if verse.number_in_chapter != expected {
                return Err(format!(
                    "ayah at position {expected} has numberInSurah {}",
                    verse.number_in_chapter
                ));
            }
            if let Some(previous) = previous_global {
                if verse.global_number <= previous {
                    return Err(format!(
                        "ayah {expected} has global number {} after {previous}",
                        verse.global_number
                    ));
                }
            }
            previous_global = Some(verse.global_number);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// A single verse. The structural indices (`juz` through `hizb_quarter`) are
/// carried through untouched for display.
pub struct Verse {
    /// Corpus-wide number; the audio locator is built from it.
    #[serde(rename = "number", deserialize_with = "lenient_u32")]
    pub global_number: u32,
    /// 1-based position inside the chapter.
    #[serde(rename = "numberInSurah", deserialize_with = "lenient_u32")]
    pub number_in_chapter: u32,
    /// Verse text in the source script.
    pub text: String,
    /// Tamil transliteration; empty when the file has none.
    #[serde(rename = "tamilTransliteration", default)]
    pub transliteration: String,
    pub juz: u32,
    pub manzil: u32,
    pub page: u32,
    pub ruku: u32,
    #[serde(rename = "hizbQuarter")]
    pub hizb_quarter: u32,
    #[serde(rename = "sajda", default, deserialize_with = "lenient_sajda")]
    pub prostration_required: bool,
}

/// Accept either a JSON number or a numeric string. Some exports quote the
/// verse numbers.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {text:?}"))),
    }
}

/// The upstream API encodes prostration verses as an object with details and
/// everything else as `false`; older exports use `"true"`/`"false"` strings.
fn lenient_sajda<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
        Detail(serde_json::Map<String, serde_json::Value>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(flag) => flag,
        Raw::Text(text) => text.trim().eq_ignore_ascii_case("true"),
        Raw::Detail(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse_json(number: &str, in_chapter: &str, sajda: &str) -> String {
        format!(
            r#"{{"number": {number}, "text": "t", "numberInSurah": {in_chapter},
                "juz": 1, "manzil": 1, "page": 1, "ruku": 1, "hizbQuarter": 1,
                "sajda": {sajda}}}"#
        )
    }

    #[test]
    fn verse_numbers_accept_quoted_values() {
        let verse: Verse = serde_json::from_str(&verse_json("\"12\"", "3", "false")).unwrap();
        assert_eq!(verse.global_number, 12);
        assert_eq!(verse.number_in_chapter, 3);
        assert!(verse.transliteration.is_empty());
    }

    #[test]
    fn sajda_accepts_every_upstream_encoding() {
        let cases = [
            ("true", true),
            ("false", false),
            ("\"true\"", true),
            ("\"false\"", false),
            (r#"{"id": 1, "recommended": true, "obligatory": false}"#, true),
        ];
        for (raw, expected) in cases {
            let verse: Verse = serde_json::from_str(&verse_json("1", "1", raw)).unwrap();
            assert_eq!(verse.prostration_required, expected, "sajda = {raw}");
        }
    }

    #[test]
    fn non_numeric_verse_number_is_rejected() {
        let result: Result<Verse, _> = serde_json::from_str(&verse_json("\"one\"", "1", "false"));
        assert!(result.is_err());
    }

    fn sample_verse(global: u32, position: u32) -> Verse {
        Verse {
            global_number: global,
            number_in_chapter: position,
            text: String::new(),
            transliteration: String::new(),
            juz: 1,
            manzil: 1,
            page: 1,
            ruku: 1,
            hizb_quarter: 1,
            prostration_required: false,
        }
    }

    fn sample_chapter(verses: Vec<Verse>, verse_count: u32) -> Chapter {
        Chapter {
            number: 1,
            native_name: "n".into(),
            transliterated_name: "t".into(),
            translated_title: "tt".into(),
            origin_category: ORIGIN_MECCAN.into(),
            verse_count,
            verses,
        }
    }

    #[test]
    fn invariants_hold_for_contiguous_verses() {
        let chapter = sample_chapter(vec![sample_verse(8, 1), sample_verse(9, 2)], 2);
        assert!(chapter.check_invariants().is_ok());
    }

    #[test]
    fn invariants_catch_count_mismatch_and_gaps() {
        let short = sample_chapter(vec![sample_verse(1, 1)], 2);
        assert!(short.check_invariants().is_err());

        let gap = sample_chapter(vec![sample_verse(1, 1), sample_verse(2, 3)], 2);
        assert!(gap.check_invariants().unwrap_err().contains("numberInSurah 3"));

        let backwards = sample_chapter(vec![sample_verse(5, 1), sample_verse(4, 2)], 2);
        assert!(backwards.check_invariants().is_err());
    }

    #[test]
    fn summary_display_uses_transliterated_name() {
        let chapter = sample_chapter(Vec::new(), 0);
        assert_eq!(chapter.summary().to_string(), "1. t");
    }
}
