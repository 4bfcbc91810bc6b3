//! Profile enrichment rules

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Enrichment configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Substring corrections applied to user identifiers
    #[serde(default = "default_corrections")]
    pub corrections: Vec<CorrectionConfig>,

    /// Score thresholds, any order
    #[serde(default = "default_levels")]
    pub levels: Vec<LevelConfig>,

    /// Level for scores under every threshold, and for missing scores
    #[serde(default = "default_floor_level")]
    pub floor_level: String,

    /// Status attached to every enriched profile
    #[serde(default = "default_profile_status")]
    pub profile_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionConfig {
    pub malformed: String,
    pub corrected: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelConfig {
    pub min_score: i64,
    pub level: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            corrections: default_corrections(),
            levels: default_levels(),
            floor_level: default_floor_level(),
            profile_status: default_profile_status(),
        }
    }
}

impl Validatable for EnrichmentConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.floor_level, "floor_level", self.domain_name())?;
        validate_required_string(&self.profile_status, "profile_status", self.domain_name())?;

        for correction in &self.corrections {
            if correction.malformed.is_empty() {
                return Err(self.validation_error("correction pattern cannot be empty"));
            }
        }

        for level in &self.levels {
            validate_required_string(&level.level, "level name", self.domain_name())?;
        }

        let mut thresholds: Vec<i64> = self.levels.iter().map(|l| l.min_score).collect();
        thresholds.sort_unstable();
        if thresholds.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(self.validation_error("level thresholds must be distinct"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "enrichment"
    }
}

fn default_corrections() -> Vec<CorrectionConfig> {
    vec![CorrectionConfig {
        malformed: "대이터독".to_string(),
        corrected: "데이터독".to_string(),
    }]
}

fn default_levels() -> Vec<LevelConfig> {
    [(2000, "master"), (1000, "expert"), (500, "intermediate"), (100, "beginner")]
        .into_iter()
        .map(|(min_score, level)| LevelConfig {
            min_score,
            level: level.to_string(),
        })
        .collect()
}

fn default_floor_level() -> String {
    "novice".to_string()
}

fn default_profile_status() -> String {
    "active".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrichment_defaults() {
        let config = EnrichmentConfig::default();
        assert_eq!(config.corrections.len(), 1);
        assert_eq!(config.levels.len(), 4);
        assert_eq!(config.floor_level, "novice");
        assert_eq!(config.profile_status, "active");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enrichment_validation() {
        let mut config = EnrichmentConfig::default();
        config.corrections.push(CorrectionConfig {
            malformed: String::new(),
            corrected: "x".to_string(),
        });
        assert!(config.validate().is_err());

        let mut config = EnrichmentConfig::default();
        config.levels.push(LevelConfig {
            min_score: 1000,
            level: "veteran".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_levels_from_yaml() {
        let yaml = r#"
levels:
  - min_score: 10
    level: bronze
  - min_score: 50
    level: gold
"#;
        let config: EnrichmentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.levels[1].level, "gold");
        assert_eq!(config.floor_level, "novice");
    }
}
