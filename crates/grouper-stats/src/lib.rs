//! Statistics over group scores.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing `f64` samples
//! - [`aggregate`]: Per-score summary used in generation reports
//!
//! # Examples
//!
//! ```
//! use grouper_stats::aggregate::ScoreAggregate;
//!
//! let totals = [0.9, 0.6, 0.75];
//! let aggregate = ScoreAggregate::new(totals).unwrap();
//! assert_eq!(aggregate.min, 0.6);
//! assert_eq!(aggregate.max, 0.9);
//! ```

pub mod aggregate;
pub mod descriptive;
