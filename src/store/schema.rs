use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::model::DifficultyTier;
use crate::config::Config;
use crate::session::result::QuizResult;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub quiz_id: String,
    pub category: String,
    pub tier: DifficultyTier,
    #[serde(flatten)]
    pub result: QuizResult,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultHistoryData {
    pub schema_version: u32,
    pub results: Vec<ResultRecord>,
}

impl Default for ResultHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

impl ResultHistoryData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Drop the oldest records until at most `limit` remain.
    pub fn truncate_oldest(&mut self, limit: usize) {
        if self.results.len() > limit {
            let excess = self.results.len() - limit;
            self.results.drain(..excess);
        }
    }
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub quizclock_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub history: ResultHistoryData,
}
