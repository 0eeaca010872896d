//! Breadth-first frontier for the site strategy
//!
//! The frontier is a FIFO queue of pending URLs plus a map of visited URLs to
//! their page state. A URL is enqueued at most once: pushes are checked
//! against both the pending set and the visited map.

use crate::state::PageState;
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Queue of discovered-but-not-yet-fetched URLs plus visited bookkeeping
#[derive(Debug)]
pub struct Frontier {
    /// Pending URLs in discovery order
    queue: VecDeque<Url>,

    /// Keys of `queue`, for O(1) dedup
    pending: HashSet<String>,

    /// Visited URLs and their state, in visit order
    visited: IndexMap<String, PageState>,

    /// Maximum number of pages the crawl may visit
    page_budget: usize,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    ///
    /// `page_budget` is the most pages the crawl will ever visit. The queue
    /// never holds more URLs than the budget has left.
    pub fn new(seed: Url, page_budget: usize) -> Self {
        let mut frontier = Self {
            queue: VecDeque::new(),
            pending: HashSet::new(),
            visited: IndexMap::new(),
            page_budget: page_budget.max(1),
        };
        frontier.push(seed);
        frontier
    }

    /// Enqueues a URL at the tail
    ///
    /// Returns false if the URL is already pending or visited, or if the
    /// remaining page budget is already covered by pending URLs.
    pub fn push(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.pending.contains(key) || self.visited.contains_key(key) {
            return false;
        }

        if self.visited.len() + self.queue.len() >= self.page_budget {
            tracing::trace!("Frontier full, dropping {}", url);
            return false;
        }

        self.pending.insert(key.to_string());
        self.queue.push_back(url);
        true
    }

    /// Pops the head of the queue
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.pending.remove(url.as_str());
        Some(url)
    }

    /// Returns true if the URL has left the frontier
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains_key(url.as_str())
    }

    /// Records a state transition for a URL
    ///
    /// Moving to `Fetching` marks the URL visited. Invalid transitions are
    /// logged and ignored.
    pub fn mark(&mut self, url: &Url, next: PageState) {
        let current = self
            .visited
            .get(url.as_str())
            .copied()
            .unwrap_or(PageState::Pending);

        if !current.can_transition_to(next) {
            tracing::warn!("Ignoring invalid transition {} -> {} for {}", current, next, url);
            return;
        }

        tracing::trace!("{}: {} -> {}", url, current, next);
        self.visited.insert(url.as_str().to_string(), next);
    }

    /// Number of URLs that have left the frontier
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs waiting in the queue
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of visited URLs currently in `state`
    pub fn count_in_state(&self, state: PageState) -> usize {
        self.visited.values().filter(|s| **s == state).count()
    }

    /// Visited URLs in visit order
    pub fn visited_urls(&self) -> impl Iterator<Item = &str> {
        self.visited.keys().map(String::as_str)
    }
}
