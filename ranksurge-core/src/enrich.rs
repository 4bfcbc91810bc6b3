//! Profile enrichment of fetched ranking records

use std::borrow::Cow;
use tracing::info;

use crate::error::EnrichError;
use crate::record::{EnrichedRecord, Record};

/// Replace `malformed` with `corrected` inside user ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCorrection {
    pub malformed: String,
    pub corrected: String,
}

impl IdCorrection {
    pub fn new(malformed: impl Into<String>, corrected: impl Into<String>) -> Self {
        Self {
            malformed: malformed.into(),
            corrected: corrected.into(),
        }
    }
}

/// Scores at or above `min_score` earn `level`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelThreshold {
    pub min_score: i64,
    pub level: String,
}

impl LevelThreshold {
    pub fn new(min_score: i64, level: impl Into<String>) -> Self {
        Self {
            min_score,
            level: level.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRules {
    pub corrections: Vec<IdCorrection>,
    pub levels: Vec<LevelThreshold>,
    /// Level for null scores and scores below every threshold
    pub floor_level: String,
    pub profile_status: String,
}

impl Default for EnrichmentRules {
    fn default() -> Self {
        Self {
            corrections: vec![IdCorrection::new("대이터독", "데이터독")],
            levels: vec![
                LevelThreshold::new(2000, "master"),
                LevelThreshold::new(1000, "expert"),
                LevelThreshold::new(500, "intermediate"),
                LevelThreshold::new(100, "beginner"),
            ],
            floor_level: "novice".to_string(),
            profile_status: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileEnricher {
    rules: EnrichmentRules,
}

impl ProfileEnricher {
    pub fn new(mut rules: EnrichmentRules) -> Self {
        // Highest threshold is checked first
        rules.levels.sort_by(|a, b| b.min_score.cmp(&a.min_score));
        Self { rules }
    }

    pub fn rules(&self) -> &EnrichmentRules {
        &self.rules
    }

    /// Enrich every record, preserving order and length.
    ///
    /// `None` stands for an absent input and is rejected; an empty slice is
    /// valid and yields an empty result.
    pub fn enrich(&self, records: Option<&[Record]>) -> Result<Vec<EnrichedRecord>, EnrichError> {
        let records = records
            .ok_or_else(|| EnrichError::InvalidInput("records are absent".to_string()))?;

        Ok(records.iter().map(|record| self.enrich_one(record)).collect())
    }

    fn enrich_one(&self, record: &Record) -> EnrichedRecord {
        let user_id = self.correct_user_id(&record.user_id);
        if let Cow::Owned(ref corrected) = user_id {
            info!(original = %record.user_id, corrected = %corrected, "Corrected malformed user id");
        }

        EnrichedRecord {
            record: Record {
                user_id: user_id.into_owned(),
                ..record.clone()
            },
            profile_status: self.rules.profile_status.clone(),
            level: self.level_for(record.score).to_string(),
        }
    }

    /// Apply each correction once. Each is a single non-rescanning pass, so
    /// text produced by a replacement is never matched again by that pair.
    pub fn correct_user_id<'a>(&self, user_id: &'a str) -> Cow<'a, str> {
        let mut current = Cow::Borrowed(user_id);
        for correction in &self.rules.corrections {
            if correction.malformed.is_empty() || !current.contains(&correction.malformed) {
                continue;
            }
            current = Cow::Owned(current.replace(&correction.malformed, &correction.corrected));
        }
        current
    }

    pub fn level_for(&self, score: Option<i64>) -> &str {
        let Some(score) = score else {
            return self.rules.floor_level.as_str();
        };
        self.rules
            .levels
            .iter()
            .find(|threshold| score >= threshold.min_score)
            .map(|threshold| threshold.level.as_str())
            .unwrap_or(self.rules.floor_level.as_str())
    }
}
