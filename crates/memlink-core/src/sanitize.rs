//! Identifier sanitizers and the destructive-keyword guard.
//!
//! Cypher cannot bind labels or relationship types as parameters, so both are
//! interpolated into statement text. Everything interpolated must pass through
//! this module first.

use std::sync::OnceLock;

use regex::Regex;

/// Keywords rejected anywhere in a literal query (case-insensitive substring).
pub const FORBIDDEN_KEYWORDS: [&str; 2] = ["delete", "drop"];

fn relationship_type_disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Z0-9_]").expect("static regex"))
}

fn label_disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("static regex"))
}

/// Normalize a relationship type to `[A-Z0-9_]`.
///
/// The input is trimmed and upper-cased, then every remaining character
/// outside the allow-list becomes `_`. Returns `None` for blank input.
pub fn sanitize_relationship_type(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_uppercase();
    Some(
        relationship_type_disallowed()
            .replace_all(&upper, "_")
            .into_owned(),
    )
}

/// Normalize a node label to `[A-Za-z0-9_]`, keeping case.
///
/// Returns `None` for blank input.
pub fn sanitize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(label_disallowed().replace_all(trimmed, "_").into_owned())
}

/// Wrap an already-sanitized identifier in backticks.
///
/// Sanitized identifiers never contain backticks, so quoting only matters for
/// names that start with a digit.
pub fn quote_identifier(sanitized: &str) -> String {
    format!("`{sanitized}`")
}

/// Return the first forbidden keyword found in `cypher`, if any.
///
/// This is a coarse substring check, not a parser: `dropped` or a string
/// literal containing `delete` are rejected too.
pub fn find_forbidden_keyword(cypher: &str) -> Option<&'static str> {
    let lowered = cypher.to_lowercase();
    FORBIDDEN_KEYWORDS
        .iter()
        .copied()
        .find(|kw| lowered.contains(kw))
}
