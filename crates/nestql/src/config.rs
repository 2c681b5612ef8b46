use crate::query::Limit;
use crate::Result;

const DEFAULT_LIMIT: u64 = 100;
const DEFAULT_MAX_RELATIONAL_DEPTH: usize = 10;

/// Planner and engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Limit applied to the root query and to nested lists that do not set one.
    pub default_limit: Limit,

    /// Deepest dotted field path a request may use.
    pub max_relational_depth: usize,
}

impl Config {
    pub fn new() -> Config {
        Config {
            default_limit: Limit::Count(DEFAULT_LIMIT),
            max_relational_depth: DEFAULT_MAX_RELATIONAL_DEPTH,
        }
    }

    /// Reads `NESTQL_QUERY_LIMIT_DEFAULT` and `NESTQL_MAX_RELATIONAL_DEPTH`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let mut config = Config::new();

        if let Some(raw) = lookup("NESTQL_QUERY_LIMIT_DEFAULT") {
            let limit = raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(Limit::from_i64)
                .ok_or_else(|| {
                    nestql_core::err!("NESTQL_QUERY_LIMIT_DEFAULT must be a count or -1, got `{raw}`")
                })?;
            config.default_limit(limit);
        }

        if let Some(raw) = lookup("NESTQL_MAX_RELATIONAL_DEPTH") {
            let depth = raw.trim().parse::<usize>().map_err(|_| {
                nestql_core::err!("NESTQL_MAX_RELATIONAL_DEPTH must be an integer, got `{raw}`")
            })?;
            config.max_relational_depth(depth);
        }

        Ok(config)
    }

    pub fn default_limit(&mut self, limit: Limit) -> &mut Self {
        self.default_limit = limit;
        self
    }

    pub fn max_relational_depth(&mut self, depth: usize) -> &mut Self {
        self.max_relational_depth = depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
