//! State module for tracking scrape progress
//!
//! # Components
//!
//! - `PageState`: The pagination cursor (page number, next-page flag, failure count)
//! - `LoopPhase`: The phases of the fetch/retry/advance state machine

mod page_state;

// Re-export main types
pub use page_state::{LoopPhase, PageState};
