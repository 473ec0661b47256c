use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use sg_rules::Translator;
use sg_rules::locale::language_of;
use toml::{Table, Value};
use tracing::{debug, info};

use crate::embedded::BUNDLED_LOCALES;
use crate::error::LocaleError;

pub const DEFAULT_LOCALE: &str = "en";

/// Templates per locale, keyed by dotted path (`email.is`).
#[derive(Debug, Clone)]
pub struct Catalog {
    default_locale: String,
    templates: BTreeMap<String, HashMap<String, String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl Catalog {
    /// An empty catalog.
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            templates: BTreeMap::new(),
        }
    }

    /// The embedded English, French and Dutch templates.
    pub fn bundled() -> Result<Self, LocaleError> {
        let mut catalog = Self::default();
        for (locale, source) in BUNDLED_LOCALES {
            catalog.add_source(locale, source)?;
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Merge the templates in `source` into `locale`, replacing existing
    /// keys. Returns the number of templates read.
    pub fn add_source(&mut self, locale: &str, source: &str) -> Result<usize, LocaleError> {
        let table: Table = toml::from_str(source).map_err(|source| LocaleError::Toml {
            locale: locale.to_string(),
            source,
        })?;
        let mut flat = Vec::new();
        flatten(locale, "", &table, &mut flat)?;
        let count = flat.len();
        self.templates
            .entry(locale.to_string())
            .or_default()
            .extend(flat);
        Ok(count)
    }

    /// Load one file, named after its locale (`de-DE.toml`).
    pub fn load_file(&mut self, path: &Path) -> Result<usize, LocaleError> {
        let locale = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| LocaleError::FileName(path.to_path_buf()))?;
        let source = fs::read_to_string(path).map_err(|e| LocaleError::io(path, e))?;
        let count = self.add_source(locale, &source)?;
        debug!(locale, templates = count, path = %path.display(), "loaded locale file");
        Ok(count)
    }

    /// Load every `*.toml` file in `dir`, in file name order.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, LocaleError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| LocaleError::io(dir, e))? {
            let path = entry.map_err(|e| LocaleError::io(dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut total = 0;
        for path in &paths {
            total += self.load_file(path)?;
        }
        info!(dir = %dir.display(), files = paths.len(), templates = total, "loaded extra locales");
        Ok(total)
    }

    /// Template for `key`, trying `locale`, then its language, then the
    /// default locale.
    pub fn template(&self, locale: &str, key: &str) -> Option<&str> {
        [locale, language_of(locale), self.default_locale.as_str()]
            .into_iter()
            .find_map(|candidate| self.templates.get(candidate)?.get(key))
            .map(String::as_str)
    }
}

fn flatten(
    locale: &str,
    prefix: &str,
    table: &Table,
    out: &mut Vec<(String, String)>,
) -> Result<(), LocaleError> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            Value::String(text) => out.push((key, text.clone())),
            Value::Table(nested) => flatten(locale, &key, nested, out)?,
            _ => {
                return Err(LocaleError::NotText {
                    locale: locale.to_string(),
                    key,
                });
            }
        }
    }
    Ok(())
}

/// Replace every `%{name}` in `template` with its value from `args`.
/// Unknown placeholders are left as they are.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            rest = &rest[start..];
            break;
        };
        let name = &after[..end];
        match args.iter().find(|(arg, _)| *arg == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 3]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

impl Translator for Catalog {
    fn translate(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        match self.template(locale, key) {
            Some(template) => interpolate(template, args),
            None => {
                debug!(locale, key, "no template, using key");
                key.to_string()
            }
        }
    }

    fn locales(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_known_placeholders() {
        assert_eq!(
            interpolate("%{customField} is %{value}", &[("value", "3"), ("customField", "Age")]),
            "Age is 3"
        );
        assert_eq!(interpolate("keep %{other} as is", &[]), "keep %{other} as is");
        assert_eq!(interpolate("dangling %{value", &[("value", "x")]), "dangling %{value");
        assert_eq!(interpolate("no placeholders", &[("value", "x")]), "no placeholders");
    }

    #[test]
    fn flattens_nested_tables() {
        let mut catalog = Catalog::default();
        let count = catalog
            .add_source("en", "[a]\nb = \"one\"\n[a.c]\nd = \"two\"\n")
            .expect("valid toml");
        assert_eq!(count, 2);
        assert_eq!(catalog.template("en", "a.b"), Some("one"));
        assert_eq!(catalog.template("en", "a.c.d"), Some("two"));
    }

    #[test]
    fn rejects_non_string_templates() {
        let err = Catalog::default()
            .add_source("en", "[email]\nis = 3\n")
            .expect_err("number template");
        assert!(matches!(err, LocaleError::NotText { key, .. } if key == "email.is"));
    }
}
