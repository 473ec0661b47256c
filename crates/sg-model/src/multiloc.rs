use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Locale-keyed text, e.g. `{"en": "Done", "fr-FR": "Terminé"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiloc(BTreeMap<String, String>);

impl Multiloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(locale: impl Into<String>, text: impl Into<String>) -> Self {
        let mut multiloc = Self::new();
        multiloc.insert(locale, text);
        multiloc
    }

    pub fn insert(&mut self, locale: impl Into<String>, text: impl Into<String>) {
        self.0.insert(locale.into(), text.into());
    }

    /// Exact lookup; no fallback.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<L, T> FromIterator<(L, T)> for Multiloc
where
    L: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(locale, text)| (locale.into(), text.into()))
                .collect(),
        )
    }
}
