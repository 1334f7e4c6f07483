//! The fixed proficiency policy.
//!
//! - [`progression`]: how one answer moves an item's state
//! - [`decay`]: how mastered items go stale between sessions

pub mod decay;
pub mod progression;

pub use decay::{decay, stale_at, sweep, MAX_DECAY_POINTS};
pub use progression::advance;
