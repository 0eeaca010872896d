//! State module for tracking crawl progress
//!
//! This module provides the per-page state machine and the breadth-first
//! frontier used by the site strategy.
//!
//! # Components
//!
//! - `PageState`: Tracks the state of individual pages (pending, fetching, extracted, failed)
//! - `Frontier`: FIFO queue of pending URLs plus the visited set

mod frontier;
mod page_state;

// Re-export main types
pub use frontier::Frontier;
pub use page_state::PageState;
