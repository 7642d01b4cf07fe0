//! Protects literal `\n` escape sequences while text travels through a provider.

/// Inert token substituted for the two-character sequence `\n`.
pub const NEWLINE_PLACEHOLDER: &str = "__NEWLINE__";

/// Replaces every literal backslash-n with [`NEWLINE_PLACEHOLDER`].
pub fn escape_newlines(text: &str) -> String {
    text.replace("\\n", NEWLINE_PLACEHOLDER)
}

/// Restores literal backslash-n sequences from [`NEWLINE_PLACEHOLDER`].
pub fn unescape_newlines(text: &str) -> String {
    text.replace(NEWLINE_PLACEHOLDER, "\\n")
}
