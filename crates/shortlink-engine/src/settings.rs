use typed_builder::TypedBuilder;

/// Configuration passed to [`ShortlinkEngine`](crate::ShortlinkEngine) at construction.
#[derive(Debug, Clone, TypedBuilder)]
pub struct EngineSettings {
    /// Prefix for every store key, letting several engines share one store.
    #[builder(default, setter(strip_option, into))]
    pub namespace: Option<String>,

    /// Upper bound for the TTL accepted by `shorten`, in minutes.
    ///
    /// When set, a TTL of `0` (never expires) is rejected as well.
    #[builder(default, setter(strip_option))]
    pub max_ttl_minutes: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
