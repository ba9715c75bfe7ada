//! End-to-end matching of two catalog tables

use crate::candidates::generate_candidates;
use crate::embedder::{load_model, EmbeddingModel};
use crate::error::Result;
use crate::features::FeatureScorer;
use crate::report::MatchSummary;
use crate::select::{select_matches, Assignment};
use catmatch_core::{normalize_table, MatchConfig, NormalizedRecord, Table};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a matching run
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub assignment: Assignment,
    pub summary: MatchSummary,
}

/// Composes normalization, candidate generation, scoring and selection
///
/// The embedding model is loaded once, when the matcher is built, and reused
/// for every run.
#[derive(Clone)]
pub struct Matcher {
    config: MatchConfig,
    model: Arc<dyn EmbeddingModel>,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("config", &self.config)
            .field("model", &self.model.name())
            .finish()
    }
}

impl Matcher {
    /// Validate the configuration and load its embedding model
    ///
    /// An unknown or unloadable model is fatal.
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        let model = load_model(&config.model_name)?;
        info!("Loaded embedding model {} ({} dims)", model.name(), model.dimension());
        Ok(Self { config, model })
    }

    /// Build a matcher around an already loaded embedding backend
    pub fn with_model(config: MatchConfig, model: Arc<dyn EmbeddingModel>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn model(&self) -> &dyn EmbeddingModel {
        self.model.as_ref()
    }

    /// Normalize every row of a table
    pub fn preprocess(&self, table: &Table) -> Vec<NormalizedRecord> {
        self.normalize_counted(table).0
    }

    /// Normalize a table and count the rows without a parseable price
    fn normalize_counted(&self, table: &Table) -> (Vec<NormalizedRecord>, usize) {
        let normalized = normalize_table(table);
        let unknown = count_unknown_prices(&normalized);
        if unknown > 0 {
            warn!("{} of {} rows in '{}' have no parseable price", unknown, table.len(), table.name);
        }
        (normalized, unknown)
    }

    /// Match table A against table B
    pub fn run(&self, table_a: &Table, table_b: &Table) -> Result<MatchOutcome> {
        info!(
            "Matching '{}' ({} rows) against '{}' ({} rows)",
            table_a.name,
            table_a.len(),
            table_b.name,
            table_b.len()
        );

        let (norm_a, unknown_prices_a) = self.normalize_counted(table_a);
        let (norm_b, unknown_prices_b) = self.normalize_counted(table_b);

        let candidates = generate_candidates(&norm_a, &norm_b, self.config.require_category_overlap);
        debug!(
            candidates = candidates.len(),
            require_category_overlap = self.config.require_category_overlap,
            "generated candidates"
        );

        let feature_rows = FeatureScorer::new(self.model.as_ref())
            .parallel(self.config.parallel)
            .score(&norm_a, &norm_b, &candidates)?;

        let threshold = self.config.emb_sim_threshold;
        let assignment = select_matches(&feature_rows, threshold);

        let summary = MatchSummary {
            a_rows: table_a.len(),
            b_rows: table_b.len(),
            unknown_prices_a,
            unknown_prices_b,
            ..MatchSummary::compute(&feature_rows, threshold, &assignment)
        };
        debug!(
            threshold,
            above_threshold = summary.above_threshold,
            "selected assignment"
        );
        info!("Found {} matches (after thresholding)", assignment.len());

        Ok(MatchOutcome { assignment, summary })
    }

    /// Match table A against table B, returning only the assignment
    pub fn match_tables(&self, table_a: &Table, table_b: &Table) -> Result<Assignment> {
        Ok(self.run(table_a, table_b)?.assignment)
    }
}

fn count_unknown_prices(rows: &[NormalizedRecord]) -> usize {
    rows.iter().filter(|r| !r.price_norm.is_known()).count()
}

/// Load the configured model and match two tables in one call
pub fn match_two_tables(table_a: &Table, table_b: &Table, config: &MatchConfig) -> Result<Assignment> {
    Matcher::new(config.clone())?.match_tables(table_a, table_b)
}
