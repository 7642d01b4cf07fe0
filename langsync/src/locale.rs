//! Supported locales, their display names and on-disk folder suffixes.

use std::path::{Path, PathBuf};

use serde::Serialize;
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// One target locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locale {
    /// Canonical code, e.g. `es` or `zh-TW`.
    pub code: String,
    /// English display name used in translation requests.
    pub name: String,
    /// Resource folder, e.g. `values-zh-rTW`.
    pub folder: String,
}

impl Locale {
    pub fn new(code: impl Into<String>, name: impl Into<String>, folder: impl Into<String>) -> Self {
        Locale {
            code: code.into(),
            name: name.into(),
            folder: folder.into(),
        }
    }

    /// Location of this locale's file next to `default_file`.
    ///
    /// `app/src/main/res/values/strings.xml` maps to
    /// `app/src/main/res/<folder>/strings.xml`.
    pub fn resource_path(&self, default_file: &Path) -> PathBuf {
        let file_name = default_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "strings.xml".into());
        let res_dir = default_file
            .parent()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        res_dir.join(&self.folder).join(file_name)
    }
}

/// (code, display name, folder) for every locale files are produced for.
const ANDROID_LOCALES: &[(&str, &str, &str)] = &[
    ("az", "Azerbaijani", "values-az"),
    ("be", "Belarusian", "values-be"),
    ("en", "English", "values-en"),
    ("es", "Spanish", "values-es"),
    ("id", "Indonesian", "values-id"),
    ("it", "Italian", "values-it"),
    ("ru", "Russian", "values-ru"),
    ("tr", "Turkish", "values-tr"),
    ("uk", "Ukrainian", "values-uk"),
    ("zh-CN", "Simplified Chinese", "values-zh-rCN"),
    ("zh-TW", "Traditional Chinese (Taiwan)", "values-zh-rTW"),
];

/// Display names for languages that may appear as a source language.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("zh-CN", "Simplified Chinese"),
    ("zh-TW", "Traditional Chinese (Taiwan)"),
    ("zh-SG", "Traditional Chinese (Singapore)"),
    ("zh-HK", "Traditional Chinese (Hong Kong)"),
    ("zh-MO", "Traditional Chinese (Macau)"),
    ("en", "English"),
    ("es", "Spanish"),
    ("hi", "Hindi"),
    ("fr", "French"),
    ("ar", "Arabic"),
    ("bn", "Bengali"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ur", "Urdu"),
    ("id", "Indonesian"),
    ("de", "German"),
    ("ja", "Japanese"),
    ("sw", "Swahili"),
    ("mr", "Marathi"),
    ("te", "Telugu"),
    ("tr", "Turkish"),
    ("ko", "Korean"),
    ("ta", "Tamil"),
    ("vi", "Vietnamese"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("it", "Italian"),
    ("uk", "Ukrainian"),
];

/// Normalizes a locale code: `zh_cn`, `ZH-cn` and `zh-CN` all become `zh-CN`.
///
/// Codes that are not valid BCP-47 identifiers are returned trimmed but
/// otherwise untouched.
pub fn normalize_locale(code: &str) -> String {
    let trimmed = code.trim();
    match trimmed.replace('_', "-").parse::<LanguageIdentifier>() {
        Ok(id) => id.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// English display name of a language code, falling back to the code itself.
pub fn language_name(code: &str) -> String {
    let code = normalize_locale(code);
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or(code)
}

/// Extra instruction for locales whose script or register is easily confused
/// with a sibling locale.
pub fn locale_directive(code: &str) -> Option<&'static str> {
    match normalize_locale(code).as_str() {
        "ko" => Some("Use formal Korean (합니다/습니다 endings) appropriate for app interfaces."),
        "zh-TW" => Some(
            "Use Traditional Chinese characters specifically for Taiwan users. Avoid Simplified Chinese.",
        ),
        "zh-CN" => Some("Use Simplified Chinese characters. Avoid Traditional Chinese."),
        _ => None,
    }
}

/// Immutable table of supported target locales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCatalog {
    locales: Vec<Locale>,
}

impl LocaleCatalog {
    pub fn new(locales: Vec<Locale>) -> Self {
        LocaleCatalog { locales }
    }

    /// The Android target locales.
    pub fn android() -> Self {
        LocaleCatalog::new(
            ANDROID_LOCALES
                .iter()
                .map(|(code, name, folder)| Locale::new(*code, *name, *folder))
                .collect(),
        )
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn get(&self, code: &str) -> Option<&Locale> {
        let code = normalize_locale(code);
        self.locales.iter().find(|l| l.code == code)
    }

    /// Resolves a locale that is not necessarily a translation target, such as
    /// the source language.
    pub fn resolve(&self, code: &str) -> Locale {
        match self.get(code) {
            Some(locale) => locale.clone(),
            None => {
                let code = normalize_locale(code);
                Locale::new(code.clone(), language_name(&code), format!("values-{}", code))
            }
        }
    }

    /// Validates requested locale codes against the catalog.
    ///
    /// Unknown codes are dropped with a warning and duplicates collapse. An
    /// empty request, or one with nothing valid left, selects every locale.
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> Vec<Locale> {
        let mut selected: Vec<Locale> = Vec::new();
        for code in requested {
            let code = code.as_ref();
            if code.trim().is_empty() {
                continue;
            }
            match self.get(code) {
                Some(locale) if !selected.contains(locale) => selected.push(locale.clone()),
                Some(_) => {}
                None => {
                    tracing::warn!(locale = code, "unsupported locale ignored");
                }
            }
        }

        if selected.is_empty() {
            if !requested.is_empty() {
                tracing::warn!("no supported locale requested, using the full catalog");
            }
            return self.locales.clone();
        }
        selected
    }

    /// Like [`LocaleCatalog::get`] but fails for unknown codes.
    pub fn require(&self, code: &str) -> Result<&Locale, Error> {
        self.get(code)
            .ok_or_else(|| Error::UnsupportedLocale(code.to_string()))
    }
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        LocaleCatalog::android()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale_variants() {
        assert_eq!(normalize_locale("zh_cn"), "zh-CN");
        assert_eq!(normalize_locale(" zh-TW "), "zh-TW");
        assert_eq!(normalize_locale("ES"), "es");
    }

    #[test]
    fn test_select_filters_unknown() {
        let catalog = LocaleCatalog::android();
        let selected = catalog.select(&["es", "xx", "zh_TW", "es"]);
        let codes: Vec<_> = selected.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["es", "zh-TW"]);
    }

    #[test]
    fn test_select_falls_back_to_full_catalog() {
        let catalog = LocaleCatalog::android();
        assert_eq!(catalog.select(&["xx", "yy"]).len(), catalog.locales().len());
        assert_eq!(catalog.select::<&str>(&[]).len(), catalog.locales().len());
    }

    #[test]
    fn test_resource_path() {
        let catalog = LocaleCatalog::android();
        let zh = catalog.get("zh-CN").unwrap();
        let path = zh.resource_path(Path::new("app/src/main/res/values/strings.xml"));
        assert_eq!(path, PathBuf::from("app/src/main/res/values-zh-rCN/strings.xml"));
    }

    #[test]
    fn test_directives() {
        assert!(locale_directive("zh-TW").unwrap().contains("Traditional"));
        assert!(locale_directive("ko").is_some());
        assert!(locale_directive("es").is_none());
    }

    #[test]
    fn test_resolve_outside_catalog() {
        let catalog = LocaleCatalog::android();
        let fr = catalog.resolve("fr");
        assert_eq!(fr.name, "French");
        assert_eq!(catalog.resolve("en").folder, "values-en");
        assert!(catalog.require("fr").is_err());
    }
}
