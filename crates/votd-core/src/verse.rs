use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use crate::books::{self, BookLookup};
use crate::error::{VerseError, VerseIdError};
use crate::html;
use crate::translation::Translation;

/// A verse address in API.Bible form: `JHN.3.16`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalVerseId {
    book: String,
    chapter: u32,
    verse: u32,
}

impl CanonicalVerseId {
    pub fn new(book: &str, chapter: u32, verse: u32) -> Result<Self, VerseIdError> {
        if !books::is_book_code(book) {
            return Err(VerseIdError::UnknownBook(book.to_string()));
        }
        if chapter == 0 || verse == 0 {
            return Err(VerseIdError::BadNumber);
        }
        Ok(Self {
            book: book.to_string(),
            chapter,
            verse,
        })
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> u32 {
        self.verse
    }
}

impl fmt::Display for CanonicalVerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for CanonicalVerseId {
    type Err = VerseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let [book, chapter, verse] = parts.as_slice() else {
            return Err(VerseIdError::Malformed(s.to_string()));
        };
        let chapter = parse_positive(chapter)?;
        let verse = parse_positive(verse)?;
        Self::new(book, chapter, verse)
    }
}

fn parse_positive(s: &str) -> Result<u32, VerseIdError> {
    if s.is_empty() || s.starts_with('0') || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VerseIdError::BadNumber);
    }
    s.parse().map_err(|_| VerseIdError::BadNumber)
}

/// One record of the labs.bible.org random passage response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RandomVerseRecord {
    pub bookname: String,
    #[serde(deserialize_with = "number_or_string")]
    pub chapter: u32,
    #[serde(deserialize_with = "number_or_string")]
    pub verse: u32,
    pub text: String,
}

impl RandomVerseRecord {
    /// Map this record onto API.Bible's addressing.
    pub fn verse_id(&self) -> Result<CanonicalVerseId, VerseError> {
        let code = match books::lookup(&self.bookname) {
            BookLookup::Found(code) => code,
            BookLookup::NotFound => {
                return Err(VerseError::Mapping {
                    book: self.bookname.clone(),
                })
            }
        };
        CanonicalVerseId::new(code, self.chapter, self.verse).map_err(|_| VerseError::Mapping {
            book: format!("{} {}:{}", self.bookname, self.chapter, self.verse),
        })
    }
}

// labs.bible.org sends chapter and verse as strings ("3"); accept numbers too.
fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
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
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// The verse currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersePayload {
    pub reference: String,
    /// HTML as served by API.Bible.
    pub content: String,
    pub translation: Translation,
}

impl VersePayload {
    pub fn plain_text(&self) -> String {
        html::to_text(&self.content)
    }

    /// The single line used for both copy and share:
    /// `For God so loved the world — John 3:16 (KJV)`.
    pub fn share_text(&self) -> String {
        format!(
            "{} \u{2014} {} ({})",
            self.plain_text(),
            self.reference,
            self.translation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_id_display() {
        let id = CanonicalVerseId::new("JHN", 3, 16).unwrap();
        assert_eq!(id.to_string(), "JHN.3.16");
    }

    #[test]
    fn test_verse_id_parse() {
        let id: CanonicalVerseId = "1CO.13.4".parse().unwrap();
        assert_eq!(id.book(), "1CO");
        assert_eq!(id.chapter(), 13);
        assert_eq!(id.verse(), 4);
    }

    #[test]
    fn test_verse_id_rejects_bad_input() {
        assert!(matches!(
            "JHN.3".parse::<CanonicalVerseId>(),
            Err(VerseIdError::Malformed(_))
        ));
        assert!(matches!(
            "XYZ.3.16".parse::<CanonicalVerseId>(),
            Err(VerseIdError::UnknownBook(_))
        ));
        assert_eq!(
            "JHN.03.16".parse::<CanonicalVerseId>(),
            Err(VerseIdError::BadNumber)
        );
        assert_eq!(
            "JHN.0.16".parse::<CanonicalVerseId>(),
            Err(VerseIdError::BadNumber)
        );
        assert_eq!(
            "JHN.3.-1".parse::<CanonicalVerseId>(),
            Err(VerseIdError::BadNumber)
        );
        assert_eq!(CanonicalVerseId::new("JHN", 0, 1), Err(VerseIdError::BadNumber));
    }

    #[test]
    fn test_random_record_accepts_string_numbers() {
        let json = r#"[{"bookname":"John","chapter":"3","verse":"16","text":"For God so loved the world..."}]"#;
        let records: Vec<RandomVerseRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].chapter, 3);
        assert_eq!(records[0].verse, 16);
    }

    #[test]
    fn test_random_record_accepts_numbers() {
        let json = r#"{"bookname":"Psalms","chapter":23,"verse":1,"text":"The LORD is my shepherd","title":"A Psalm"}"#;
        let record: RandomVerseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.chapter, 23);
    }

    #[test]
    fn test_random_record_maps_to_verse_id() {
        let record = RandomVerseRecord {
            bookname: "John".to_string(),
            chapter: 3,
            verse: 16,
            text: "For God so loved the world".to_string(),
        };
        assert_eq!(record.verse_id().unwrap().to_string(), "JHN.3.16");
    }

    #[test]
    fn test_unknown_book_is_a_mapping_error() {
        let record = RandomVerseRecord {
            bookname: "Hezekiah".to_string(),
            chapter: 1,
            verse: 1,
            text: String::new(),
        };
        let err = record.verse_id().unwrap_err();
        assert_eq!(err.kind(), "mapping");
    }

    #[test]
    fn test_share_text_format() {
        let payload = VersePayload {
            reference: "John 3:16".to_string(),
            content: "<p>For God so loved <b>the world</b></p>".to_string(),
            translation: Translation::Kjv,
        };
        assert_eq!(
            payload.share_text(),
            "For God so loved the world \u{2014} John 3:16 (KJV)"
        );
    }
}
