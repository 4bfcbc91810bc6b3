//! Conversions from configuration domains to the core and API types they drive

use ranksurge_config::{DelayConfig, EnrichmentConfig, RankingConfig, ServerConfig};
use ranksurge_core::{DelayProfile, EnrichmentRules, IdCorrection, LevelThreshold, RankingSettings};
use ranksurge_rest_api::AppConfig;

pub fn delay_profile(config: &DelayConfig) -> DelayProfile {
    DelayProfile {
        base: config.base,
        elevated: config.elevated,
        elevated_from_chunks: config.elevated_from_chunks,
        runaway_from_chunks: config.runaway_from_chunks,
        escalation_step: config.escalation_step,
    }
}

pub fn ranking_settings(config: &RankingConfig) -> RankingSettings {
    RankingSettings {
        chunk_size: config.chunk_size,
        default_limit: config.default_limit,
        max_limit: config.max_limit,
    }
}

pub fn enrichment_rules(config: &EnrichmentConfig) -> EnrichmentRules {
    EnrichmentRules {
        corrections: config
            .corrections
            .iter()
            .map(|c| IdCorrection::new(c.malformed.clone(), c.corrected.clone()))
            .collect(),
        levels: config
            .levels
            .iter()
            .map(|l| LevelThreshold::new(l.min_score, l.level.clone()))
            .collect(),
        floor_level: config.floor_level.clone(),
        profile_status: config.profile_status.clone(),
    }
}

pub fn app_config(config: &ServerConfig) -> AppConfig {
    AppConfig {
        cors: config.cors.clone(),
        enable_tracing: config.enable_tracing,
    }
}
