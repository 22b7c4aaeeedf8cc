//! Snapshot of the hosting page the runtime starts on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Page environment captured once on page-ready.
pub struct PageContext {
    /// Full current URL.
    pub href: String,
    /// Host (domain and port) of the current URL.
    pub host: String,
    /// Referrer of the current document, empty when absent.
    pub referrer: String,
}

impl PageContext {
    /// Creates a context for `href`, deriving the host from the URL.
    pub fn from_href(href: impl Into<String>) -> Self {
        let href = href.into();
        let host = host_of(&href).to_string();
        Self {
            href,
            host,
            referrer: String::new(),
        }
    }

    /// Sets the document referrer.
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    /// Returns whether the page runs inside a Facebook frame.
    pub fn is_facebook(&self) -> bool {
        self.referrer.contains("staticxx.facebook") || self.href.contains("fb=1")
    }
}

fn host_of(href: &str) -> &str {
    let rest = href.split_once("://").map_or(href, |(_, rest)| rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}
