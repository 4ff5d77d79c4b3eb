//! Core data types for the Prism comparison pipeline.
//!
//! Providers rank their detections, and the report depends on that order, so
//! keyword sets are kept as insertion-ordered maps rather than hash maps.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// An image loaded into memory, ready for analysis.
///
/// The bytes are moved into the analyzer and dropped once both providers
/// have answered.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }
}

/// Insertion-ordered mapping from detected text to score.
///
/// Re-inserting a key overwrites its score in place: the entry keeps the
/// position of its first occurrence and the value of its last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMap {
    entries: Vec<(String, f32)>,
}

impl KeywordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a score.
    pub fn insert(&mut self, key: impl Into<String>, score: f32) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((key, score)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, score)| *score)
    }

    /// Entry at a ranking position.
    pub fn nth(&self, index: usize) -> Option<(&str, f32)> {
        self.entries.get(index).map(|(k, s)| (k.as_str(), *s))
    }

    /// Entries in ranking order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), *s))
    }

    /// Keys in ranking order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for KeywordMap {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, score) in iter {
            map.insert(key, score);
        }
        map
    }
}

impl Serialize for KeywordMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, score) in &self.entries {
            map.serialize_entry(key, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeywordMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeywordMapVisitor;

        impl<'de> Visitor<'de> for KeywordMapVisitor {
            type Value = KeywordMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of keyword to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<KeywordMap, A::Error> {
                let mut map = KeywordMap::new();
                while let Some((key, score)) = access.next_entry::<String, f32>()? {
                    map.insert(key, score);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(KeywordMapVisitor)
    }
}

/// One provider's normalized output for one image.
///
/// Scores keep the provider's own scale: Google reports 0.0-1.0,
/// Rekognition reports 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub labels: KeywordMap,
    /// Brand detections (Google only)
    #[serde(default)]
    pub logos: KeywordMap,
}

impl ProviderResult {
    pub fn new(labels: KeywordMap, logos: KeywordMap) -> Self {
        Self { labels, logos }
    }

    pub fn labels_only(labels: KeywordMap) -> Self {
        Self {
            labels,
            logos: KeywordMap::new(),
        }
    }
}

/// Both providers' results for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedAnalysis {
    pub path: PathBuf,
    pub provider_a: ProviderResult,
    pub provider_b: ProviderResult,
}

impl MergedAnalysis {
    /// Combine two normalized results under one image path.
    pub fn merge(
        path: impl Into<PathBuf>,
        provider_a: ProviderResult,
        provider_b: ProviderResult,
    ) -> Self {
        Self {
            path: path.into(),
            provider_a,
            provider_b,
        }
    }

    /// Exchange the two provider slots.
    pub fn swapped(self) -> Self {
        Self {
            path: self.path,
            provider_a: self.provider_b,
            provider_b: self.provider_a,
        }
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
