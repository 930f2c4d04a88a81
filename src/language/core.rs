use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::from_str;

use crate::error::StoreError;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A bundled word list
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

/// Bundled quotes used for quote-fragment tests
#[derive(Deserialize, Clone, Debug)]
pub struct QuoteBook {
    pub name: String,
    pub size: u32,
    pub quotes: Vec<String>,
}

impl Language {
    pub fn new(file_name: &str) -> Result<Self, StoreError> {
        read_bundled(&format!("{file_name}.json"))
    }

    pub fn english() -> Self {
        Self::new("english").expect("bundled english word list is valid")
    }
}

impl QuoteBook {
    pub fn bundled() -> Self {
        read_bundled("quotes.json").expect("bundled quote list is valid")
    }
}

fn read_bundled<T: DeserializeOwned>(file_name: &str) -> Result<T, StoreError> {
    let contents = LANG_DIR
        .get_file(file_name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("bundled file {file_name} not found"),
            ))
        })?;

    Ok(from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_language_english() {
        let lang = Language::english();

        assert_eq!(lang.name, "english");
        assert!(lang.words.len() >= 200);
        assert_eq!(lang.size as usize, lang.words.len());
        assert!(lang.words.iter().all(|w| !w.contains(' ')));
    }

    #[test]
    fn test_quote_book() {
        let book = QuoteBook::bundled();

        assert_eq!(book.name, "quotes");
        assert!(!book.quotes.is_empty());
        assert_eq!(book.size as usize, book.quotes.len());
    }

    #[test]
    fn test_language_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 3,
            "words": ["hello", "world", "test"]
        }
        "#;

        let lang: Language = from_str(json_data).expect("Failed to deserialize test language");

        assert_eq!(lang.name, "test");
        assert_eq!(lang.size, 3);
        assert!(lang.words.contains(&"world".to_string()));
    }

    #[test]
    fn test_missing_language_file() {
        assert_matches!(Language::new("nonexistent"), Err(StoreError::Io(_)));
    }
}
