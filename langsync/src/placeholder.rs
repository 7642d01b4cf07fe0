//! printf-style placeholder extraction for Android strings.
//!
//! Used to flag translations that lost, gained or mangled a `%s`, `%d` or
//! `%1$s` style placeholder.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `%%` is matched first so the escaped percent is consumed and skipped.
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"%%|%(?:(\d+)\$)?[-#+0,(]*\d*(?:\.\d+)?(?:ll|l|h)?([a-zA-Z])").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlaceholderToken {
    pub index: Option<usize>,
    pub kind: char,
}

impl PlaceholderToken {
    pub fn to_signature(&self) -> String {
        match self.index {
            Some(i) => format!("{}${}", i, self.kind),
            None => format!("{}", self.kind),
        }
    }
}

/// Extracts placeholder tokens in occurrence order, ignoring escaped `%%`.
pub fn extract_placeholders(input: &str) -> Vec<PlaceholderToken> {
    PLACEHOLDER_REGEX
        .captures_iter(input)
        .filter_map(|caps| {
            let kind = caps.get(2)?.as_str().chars().next()?.to_ascii_lowercase();
            let index = caps.get(1).and_then(|m| m.as_str().parse().ok());
            Some(PlaceholderToken { index, kind })
        })
        .collect()
}

/// Signature of a string: its placeholder tokens in occurrence order.
pub fn signature(input: &str) -> Vec<String> {
    extract_placeholders(input)
        .into_iter()
        .map(|t| t.to_signature())
        .collect()
}

/// Whether `translated` carries the same placeholders as `source`.
///
/// Positional placeholders may legitimately move, so tokens are compared as a
/// multiset rather than a sequence.
pub fn placeholders_match(source: &str, translated: &str) -> bool {
    let mut expected = extract_placeholders(source);
    let mut actual = extract_placeholders(translated);
    expected.sort();
    actual.sort();
    expected == actual
}
