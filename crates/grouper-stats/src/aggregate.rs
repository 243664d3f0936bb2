use serde::{Deserialize, Serialize};

use crate::descriptive::DescriptiveStats;

/// Summary of one score across a set of groups.
///
/// Scores are "higher is better", so `min` is the worst group and `max` the
/// best.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreAggregate {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Spread between groups; 0 when every group scores the same.
    pub std_dev: f64,
}

impl ScoreAggregate {
    /// Returns `None` if there is no score to aggregate.
    #[must_use]
    pub fn new<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let stats = DescriptiveStats::new(scores)?;
        Some(Self::from(&stats))
    }
}

impl From<&DescriptiveStats> for ScoreAggregate {
    fn from(stats: &DescriptiveStats) -> Self {
        Self {
            mean: stats.mean,
            median: stats.median,
            min: stats.min,
            max: stats.max,
            std_dev: stats.std_dev,
        }
    }
}
