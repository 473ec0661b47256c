//! Contract with the translation collaborator.

use sg_model::Multiloc;

/// Produces localized strings for rule descriptions.
///
/// Templates are keyed `<ruleType>.<predicate>` and may reference
/// `%{value}` and, for custom field rules, `%{customField}`. Implementations
/// own every fallback decision: a missing template must still produce some
/// string.
pub trait Translator: Send + Sync {
    /// Render the template `key` for `locale` with `args` interpolated.
    fn translate(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String;

    /// Locales a description multiloc is produced for.
    fn locales(&self) -> Vec<String>;

    /// Pick the text of `multiloc` to show in `locale`.
    ///
    /// The default tries the exact locale, then any locale of the same
    /// language, then the first entry.
    fn localize(&self, multiloc: &Multiloc, locale: &str) -> String {
        if let Some(text) = multiloc.get(locale) {
            return text.to_string();
        }
        let language = language_of(locale);
        multiloc
            .iter()
            .find(|(candidate, _)| language_of(candidate) == language)
            .or_else(|| multiloc.iter().next())
            .map(|(_, text)| text.to_string())
            .unwrap_or_default()
    }
}

/// `fr` for `fr-FR`.
pub fn language_of(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}
