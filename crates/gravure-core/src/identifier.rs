//! Identifier management using string interning.
//!
//! This module provides the [`Id`] type, a cheap copyable handle for node and
//! cluster identifiers, plus [`slug`], which folds display labels into the
//! identifier-safe form used to seed deterministic graph identifiers.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// Uses `Mutex` for thread-safe access; construction itself is
/// single-threaded, but identifiers may be compared and printed from
/// anywhere.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> &'static Mutex<DefaultStringInterner> {
    INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()))
}

/// Interned identifier for a node or cluster.
///
/// Two `Id`s created from the same string are equal, and comparison is a
/// symbol comparison rather than a string comparison.
///
/// # Examples
///
/// ```
/// use gravure_core::identifier::Id;
///
/// let a = Id::new("web_server");
/// let b = Id::new("web_server");
/// assert_eq!(a, b);
/// assert_eq!(a, "web_server");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string.
    pub fn new(name: &str) -> Self {
        let mut interner = interner().lock().expect("Failed to acquire interner lock");
        Self(interner.get_or_intern(name))
    }

    /// Returns the identifier as an owned string.
    pub fn resolve(&self) -> String {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        interner
            .resolve(self.0)
            .expect("Symbol should exist in interner")
            .to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Folds a display label into an identifier-safe slug.
///
/// ASCII alphanumerics are lowercased; every other run of characters
/// collapses to a single underscore. Leading and trailing separators are
/// stripped, so the result may be empty (callers fall back to a category
/// seed in that case).
///
/// # Examples
///
/// ```
/// use gravure_core::identifier::slug;
///
/// assert_eq!(slug("Health Records API\n(REST API)"), "health_records_api_rest_api");
/// assert_eq!(slug("***"), "");
/// ```
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }
    out
}
