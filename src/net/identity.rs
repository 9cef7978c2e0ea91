//! Machine identifiers.

use uuid::Uuid;

/// Name-based (v5, DNS namespace) UUID for a host-unique identifier such as
/// a MAC address. The same input always yields the same UUID.
#[must_use]
pub fn derive_uuid(source: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, source.as_bytes())
        .hyphenated()
        .to_string()
}

/// Normalizes a UUID to lower-case hyphenated form.
///
/// Accepts upper or lower case, with or without dashes, optionally wrapped
/// in braces. Returns `None` for anything else.
#[must_use]
pub fn parse_uuid(text: &str) -> Option<String> {
    Uuid::try_parse(text.trim())
        .ok()
        .map(|uuid| uuid.hyphenated().to_string())
}

/// Returns `text` with every character contained in `symbols` removed.
#[must_use]
pub fn remove_symbols(text: &str, symbols: &str) -> String {
    text.chars().filter(|c| !symbols.contains(*c)).collect()
}
