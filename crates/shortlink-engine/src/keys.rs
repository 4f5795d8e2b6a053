use shortlink_core::{Fingerprint, ShortCode};

/// Store key of the global counter.
pub const COUNTER_KEY: &str = "next.url.id";

/// Builds the store keys used by the engine.
///
/// With a namespace every key is prefixed with `{namespace}:`, so several
/// engines can share one store without seeing each other's records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyspace {
    prefix: String,
}

impl Keyspace {
    pub fn new(namespace: Option<&str>) -> Self {
        let prefix = match namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}:"),
            _ => String::new(),
        };
        Self { prefix }
    }

    pub fn counter(&self) -> String {
        format!("{}{COUNTER_KEY}", self.prefix)
    }

    /// Key of the code→URL record.
    pub fn url(&self, code: &ShortCode) -> String {
        format!("{}shortlink:{}:url", self.prefix, code)
    }

    /// Key of the fingerprint→code record.
    pub fn url_hash(&self, fingerprint: &Fingerprint) -> String {
        format!("{}urlhash:{}:url", self.prefix, fingerprint)
    }

    /// Key of the code→detail record.
    pub fn detail(&self, code: &ShortCode) -> String {
        format!("{}shortlink:{}:detail", self.prefix, code)
    }
}
