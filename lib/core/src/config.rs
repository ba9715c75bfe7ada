use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default embedding model identifier
pub const DEFAULT_MODEL_NAME: &str = "trigram-hash-384";

/// Default minimum embedding similarity for accepting a match
pub const DEFAULT_EMB_SIM_THRESHOLD: f32 = 0.85;

/// Source column names for the four record fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub title: String,
    pub detail: String,
    pub category: String,
    pub price: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            detail: "Detail".to_string(),
            category: "Category".to_string(),
            price: "Price".to_string(),
        }
    }
}

impl ColumnConfig {
    /// Column names in record field order: title, detail, category, price
    pub fn names(&self) -> [&str; 4] {
        [&self.title, &self.detail, &self.category, &self.price]
    }
}

/// Matching policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Embedding model identifier
    pub model_name: String,

    /// Candidates with `emb_sim` below this are dropped (inclusive bound)
    #[serde(alias = "EMB_SIM_THRESHOLD")]
    pub emb_sim_threshold: f32,

    /// Only pair rows whose categories share at least one segment
    pub require_category_overlap: bool,

    /// Score candidate pairs on the rayon thread pool
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            emb_sim_threshold: DEFAULT_EMB_SIM_THRESHOLD,
            require_category_overlap: false,
            parallel: false,
        }
    }
}

impl MatchConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.emb_sim_threshold = threshold;
        self
    }

    pub fn with_model_name(mut self, name: &str) -> Self {
        self.model_name = name.to_string();
        self
    }

    pub fn with_category_overlap(mut self, required: bool) -> Self {
        self.require_category_overlap = required;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(Error::InvalidConfig("model_name cannot be empty".to_string()));
        }
        if !self.emb_sim_threshold.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "emb_sim_threshold must be finite, got {}",
                self.emb_sim_threshold
            )));
        }
        Ok(())
    }
}

/// Full configuration file: `{"columns": {...}, "matching": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatmatchConfig {
    pub columns: ColumnConfig,
    pub matching: MatchConfig,
}

impl CatmatchConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.matching.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
