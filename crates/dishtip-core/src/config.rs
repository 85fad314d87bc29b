use std::num::NonZeroUsize;

use crate::cache::DEFAULT_CAPACITY;
use crate::chunker::DEFAULT_MAX_WORDS;
use crate::dispatch::DEFAULT_MAX_IN_FLIGHT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub max_words: usize,
    pub max_in_flight: NonZeroUsize,
    pub cache_capacity: NonZeroUsize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{name} must be greater than zero")]
pub struct ZeroLimit {
    pub name: &'static str,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            max_in_flight: NonZeroUsize::MIN.saturating_add(DEFAULT_MAX_IN_FLIGHT - 1),
            cache_capacity: NonZeroUsize::MIN.saturating_add(DEFAULT_CAPACITY - 1),
        }
    }
}

impl PipelineConfig {
    /// Optional:
    /// - `DISHTIP_MAX_WORDS` (default: 500)
    /// - `DISHTIP_MAX_IN_FLIGHT` (default: 10)
    /// - `DISHTIP_CACHE_CAPACITY` (default: 512)
    ///
    /// Malformed values fall back to the defaults; an explicit zero limit is rejected.
    pub fn from_env() -> Result<Self, ZeroLimit> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ZeroLimit>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).and_then(|v| v.trim().parse::<usize>().ok());

        let max_words = parse("DISHTIP_MAX_WORDS").unwrap_or(defaults.max_words);
        let max_in_flight = non_zero(
            "DISHTIP_MAX_IN_FLIGHT",
            parse("DISHTIP_MAX_IN_FLIGHT"),
            defaults.max_in_flight,
        )?;
        let cache_capacity = non_zero(
            "DISHTIP_CACHE_CAPACITY",
            parse("DISHTIP_CACHE_CAPACITY"),
            defaults.cache_capacity,
        )?;

        Ok(Self {
            max_words,
            max_in_flight,
            cache_capacity,
        })
    }
}

fn non_zero(
    name: &'static str,
    value: Option<usize>,
    default: NonZeroUsize,
) -> Result<NonZeroUsize, ZeroLimit> {
    match value {
        None => Ok(default),
        Some(v) => NonZeroUsize::new(v).ok_or(ZeroLimit { name }),
    }
}
