//! Multi-round group assignment.
//!
//! Splits a roster of participants into fixed-size groups over several rounds.
//! Each round seeds groups with leaders, fills the rest through a filter chain
//! (target age, gender balance, fewest earlier pairings) and scores every group.
//! The pairing history is carried from round to round in an explicit
//! [`GenerationRunState`], so a session can be paused and continued.
//!
//! - [`model`] - Participants, classification config and allocation results
//! - [`allocation`] - Single-round allocation and leader promotion
//! - [`scoring`] - Per-participant and per-group metrics
//! - [`generate`] / [`generate_with_seed`] - Multi-round runs
//! - [`DatasetSummary`] / [`AssignmentTable`] - Reporting views

pub use self::{
    allocation::{CandidateSelector, RoundAllocator, promote_compulsory_leaders},
    assignment::*,
    generation::*,
    history::*,
    model::*,
    settings::*,
    summary::*,
};

pub mod allocation;
pub mod model;
pub mod scoring;

mod assignment;
mod generation;
mod history;
mod settings;
mod summary;
