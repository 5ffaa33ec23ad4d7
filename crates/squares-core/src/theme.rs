//! Puzzle themes: a name, a blurb and the sample words used as rewards.

use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Theme key of the built-in theme
pub const DEFAULT_THEME_KEY: &str = "Day 1";

/// One day's theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(rename = "theme")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sample_words: Vec<String>,
}

impl Theme {
    /// The theme used when no theme file can be read
    pub fn builtin() -> Self {
        Self {
            name: "Urban Dictionary Essentials".to_string(),
            description: "Basic slang terms every millennial and Gen Z should know".to_string(),
            sample_words: [
                "RIZZ", "BUSSIN", "SLAY", "STAN", "SIMP", "VIBES", "FIRE", "CRINGE", "ICONIC",
                "FLEX",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
        }
    }
}

/// Themes by key, in the order the data file lists them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCatalog {
    entries: Vec<(String, Theme)>,
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: vec![(DEFAULT_THEME_KEY.to_string(), Theme::builtin())],
        }
    }

    /// Parse `{ "<key>": { "theme": ..., "description": ..., "sample_words": [...] } }`
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let entries = map
            .into_iter()
            .map(|(key, value)| Ok((key, serde_json::from_value(value)?)))
            .collect::<Result<Vec<(String, Theme)>, DataError>>()?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, DataError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load the catalog, falling back to the built-in theme on any error or
    /// when the file lists no themes.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) if !catalog.is_empty() => catalog,
            Ok(_) => {
                warn!(path = %path.display(), "theme file is empty, using built-in theme");
                Self::builtin()
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load themes, using built-in theme");
                Self::builtin()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Theme> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, theme)| theme)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn first_key(&self) -> Option<&str> {
        self.keys().next()
    }

    pub fn first(&self) -> Option<(&str, &Theme)> {
        self.entries.first().map(|(key, theme)| (key.as_str(), theme))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_file_order() {
        let json = r#"{
            "Day 2": { "theme": "Gaming", "description": "GG", "sample_words": ["NOOB"] },
            "Day 1": { "theme": "Basics", "sample_words": [] },
            "Day 10": { "theme": "Later" }
        }"#;
        let catalog = ThemeCatalog::from_json(json).unwrap();

        let keys: Vec<&str> = catalog.keys().collect();
        assert_eq!(keys, vec!["Day 2", "Day 1", "Day 10"]);
        assert_eq!(catalog.get("Day 2").unwrap().sample_words, vec!["NOOB"]);
        assert_eq!(catalog.get("Day 10").unwrap().description, "");
        assert!(catalog.get("Day 3").is_none());
    }

    #[test]
    fn test_from_json_rejects_bad_theme() {
        assert!(ThemeCatalog::from_json(r#"{ "Day 1": { "description": "no name" } }"#).is_err());
        assert!(ThemeCatalog::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let catalog = ThemeCatalog::load_or_builtin(Path::new("/definitely/not/here.json"));
        assert_eq!(catalog, ThemeCatalog::builtin());
        assert_eq!(catalog.first_key(), Some(DEFAULT_THEME_KEY));
        assert_eq!(catalog.get(DEFAULT_THEME_KEY).unwrap().sample_words.len(), 10);
    }
}
