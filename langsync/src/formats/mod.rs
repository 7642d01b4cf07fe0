//! Resource file formats understood by langsync.

pub mod android_strings;
