//! Secret values and credential leak detection.
//!
//! Credentials only ever enter the process through environment variables.
//! [`Secret`] keeps them out of logs and debug output; the leak patterns catch
//! credentials that show up where they should not (config files, extracted
//! facts).

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Replacement written over a detected secret.
pub const REDACTION: &str = "[REDACTED]";

/// An opaque credential. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for handing to the collaborator that needs it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

/// Known credential formats.
static LEAK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\bsk-ant-[a-zA-Z0-9_-]{20,}").expect("hardcoded regex"),
        // Anchored so hyphenated words ending in "sk" ("risk-", "desk-") never match.
        Regex::new(r"\bsk-(?:proj-)?[a-zA-Z0-9_]{20,}").expect("hardcoded regex"),
        Regex::new(r"-----BEGIN.*PRIVATE KEY-----").expect("hardcoded regex"),
        Regex::new(r"ghp_[a-zA-Z0-9]{36}").expect("hardcoded regex"),
        Regex::new(r"AIza[0-9A-Za-z_-]{35}").expect("hardcoded regex"),
        Regex::new(r"xoxb-[0-9]{10,}-[0-9A-Za-z-]+").expect("hardcoded regex"),
        // Connection strings with an inline password.
        Regex::new(r"postgres(?:ql)?://[^:/\s@]+:[^@\s]+@[^\s]+").expect("hardcoded regex"),
    ]
});

/// Return the first credential-looking substring in `content`.
pub fn match_leak_patterns(content: &str) -> Option<String> {
    for pattern in LEAK_PATTERNS.iter() {
        if let Some(matched) = pattern.find(content) {
            return Some(matched.as_str().to_string());
        }
    }
    None
}

/// Replace every credential-looking substring. Returns the number replaced.
pub fn scrub(content: &mut String) -> usize {
    let mut replaced = 0;
    for pattern in LEAK_PATTERNS.iter() {
        let count = pattern.find_iter(content.as_str()).count();
        if count > 0 {
            let scrubbed = pattern.replace_all(content.as_str(), REDACTION).into_owned();
            *content = scrubbed;
            replaced += count;
        }
    }
    replaced
}
