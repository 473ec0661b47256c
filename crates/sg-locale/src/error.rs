#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("failed to read locale file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locale {locale}: {source}")]
    Toml {
        locale: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("template {key} in locale {locale} is not a string")]
    NotText { locale: String, key: String },

    #[error("cannot derive a locale from file name {0}")]
    FileName(PathBuf),
}

impl LocaleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
