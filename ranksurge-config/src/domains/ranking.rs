//! Chunked fetch and delay shaping configuration

use crate::error::ConfigResult;
use crate::validation::{validate_not_above, validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ranking request configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    /// Rows fetched per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Limit applied when the request has none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest accepted limit
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Chunk count above which a request is logged as a warning
    #[serde(default = "default_high_chunk_warning_threshold")]
    pub high_chunk_warning_threshold: usize,

    /// Per-chunk connection hold times
    #[serde(default)]
    pub delay: DelayConfig,
}

/// Per-chunk hold time, tiered by the request's chunk count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DelayConfig {
    /// Hold for requests with few chunks
    #[serde(with = "humantime_serde", default = "default_base")]
    pub base: Duration,

    /// Hold once the chunk count reaches `elevated_from_chunks`
    #[serde(with = "humantime_serde", default = "default_elevated")]
    pub elevated: Duration,

    #[serde(default = "default_elevated_from_chunks")]
    pub elevated_from_chunks: usize,

    /// Chunk count from which the hold grows quadratically with the chunk index
    #[serde(default = "default_runaway_from_chunks")]
    pub runaway_from_chunks: usize,

    /// Multiplier for the squared chunk index
    #[serde(with = "humantime_serde", default = "default_escalation_step")]
    pub escalation_step: Duration,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            high_chunk_warning_threshold: default_high_chunk_warning_threshold(),
            delay: DelayConfig::default(),
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            elevated: default_elevated(),
            elevated_from_chunks: default_elevated_from_chunks(),
            runaway_from_chunks: default_runaway_from_chunks(),
            escalation_step: default_escalation_step(),
        }
    }
}

impl Validatable for RankingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.chunk_size, "chunk_size", self.domain_name())?;
        validate_positive(self.max_limit, "max_limit", self.domain_name())?;
        validate_not_above(
            self.default_limit,
            "default_limit",
            self.max_limit,
            "max_limit",
            self.domain_name(),
        )?;
        self.delay.validate()?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "ranking"
    }
}

impl Validatable for DelayConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.elevated <= self.base {
            return Err(self.validation_error(format!(
                "elevated ({:?}) must be greater than base ({:?})",
                self.elevated, self.base
            )));
        }
        validate_not_above(
            self.elevated_from_chunks,
            "elevated_from_chunks",
            self.runaway_from_chunks,
            "runaway_from_chunks",
            self.domain_name(),
        )
    }

    fn domain_name(&self) -> &'static str {
        "ranking.delay"
    }
}

fn default_chunk_size() -> usize {
    10
}

fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    10_000
}

fn default_high_chunk_warning_threshold() -> usize {
    20
}

fn default_base() -> Duration {
    Duration::from_millis(2)
}

fn default_elevated() -> Duration {
    Duration::from_millis(5)
}

fn default_elevated_from_chunks() -> usize {
    10
}

fn default_runaway_from_chunks() -> usize {
    19
}

fn default_escalation_step() -> Duration {
    Duration::from_millis(2)
}
