//! Locale files embedded at compile time.

/// `(locale, toml source)` for every bundled locale.
pub const BUNDLED_LOCALES: [(&str, &str); 3] = [
    ("en", include_str!("../locales/en.toml")),
    ("fr-FR", include_str!("../locales/fr-FR.toml")),
    ("nl-NL", include_str!("../locales/nl-NL.toml")),
];
