/// Page state definitions for tracking crawl progress
///
/// This module defines all possible states a page can be in during one
/// fetch-extract cycle.
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page has been discovered and waits in the frontier
    Pending,

    /// Page is currently being fetched
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched and extraction ran
    Extracted,

    /// Page fetch failed (network error, timeout, bad status)
    FetchFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Extracted | Self::FetchFailed)
    }

    /// Returns true if the page counts as visited
    ///
    /// A page is visited as soon as it leaves the frontier, whether or not the
    /// fetch succeeds.
    pub fn is_visited(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if moving from this state to `next` is allowed
    ///
    /// Valid transitions:
    /// - Pending → Fetching
    /// - Fetching → Extracted | FetchFailed
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Extracted)
                | (Self::Fetching, Self::FetchFailed)
        )
    }

    /// Short lowercase name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracted => "extracted",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Extracted,
            Self::FetchFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!PageState::Pending.is_terminal());
        assert!(!PageState::Fetching.is_terminal());

        assert!(PageState::Extracted.is_terminal());
        assert!(PageState::FetchFailed.is_terminal());
    }

    #[test]
    fn test_is_visited() {
        assert!(!PageState::Pending.is_visited());
        assert!(PageState::Fetching.is_visited());
        assert!(PageState::Extracted.is_visited());
        assert!(PageState::FetchFailed.is_visited());
    }

    #[test]
    fn test_valid_transitions() {
        assert!(PageState::Pending.can_transition_to(PageState::Fetching));
        assert!(PageState::Fetching.can_transition_to(PageState::Extracted));
        assert!(PageState::Fetching.can_transition_to(PageState::FetchFailed));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!PageState::Pending.can_transition_to(PageState::Extracted));
        assert!(!PageState::Extracted.can_transition_to(PageState::Fetching));
        assert!(!PageState::FetchFailed.can_transition_to(PageState::Pending));
        assert!(!PageState::Fetching.can_transition_to(PageState::Fetching));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageState::Pending), "pending");
        assert_eq!(format!("{}", PageState::FetchFailed), "fetch_failed");
    }

    #[test]
    fn test_all_states_complete() {
        let all = PageState::all_states();
        assert_eq!(all.len(), 4);

        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                assert_ne!(all[i], all[j], "Duplicate state found");
            }
        }
    }
}
