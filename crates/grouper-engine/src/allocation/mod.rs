//! Building the groups of a single round.
//!
//! - [`promote_compulsory_leaders`] - Tops up the leader set once per session
//! - [`CandidateSelector`] - Filter chain that picks the next member for a group
//! - [`RoundAllocator`] - Seeds leaders, fills groups and scores the result
//!
//! # Allocation flow
//!
//! 1. Leaders are dealt round-robin into `ceil(n / group_size)` groups
//! 2. Non-leaders are placed one per group per scan, in group id order
//! 3. Each group is scored against the pairs known before this round
//! 4. The round's pairs are added to the session history
//!
//! No group ever exceeds `group_size`. If a scan places nobody while
//! participants remain, the remainder is reported in [`Round::unplaced`]
//! instead of looping.
//!
//! [`Round::unplaced`]: crate::model::Round::unplaced

pub use self::{allocator::*, promotion::*, selection::*};

mod allocator;
mod promotion;
mod selection;
