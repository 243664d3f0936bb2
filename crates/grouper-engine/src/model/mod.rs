//! Data model shared by the allocation and scoring code.
//!
//! - [`Participant`] - Core record read by the algorithm
//! - [`GenderValues`] - Raw-value sets that classify a participant's gender
//! - [`TargetAgeRanges`] - Labelled inclusive age intervals
//! - [`Roster`] - Validated dataset (participants + classification config)
//! - [`Round`] / [`Group`] - Allocation results with statistics attached

pub use self::{age_range::*, gender::*, group::*, participant::*, roster::*};

mod age_range;
mod gender;
mod group;
mod participant;
mod roster;
