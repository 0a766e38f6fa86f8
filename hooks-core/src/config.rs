/// Per-hook configuration for the fetch hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchConfig {
    /// Memoize successful responses by URL for the lifetime of the hook.
    /// Disabled by default.
    pub cache_enabled: bool,
}

impl FetchConfig {
    pub fn cached() -> Self {
        FetchConfig {
            cache_enabled: true,
        }
    }
}
