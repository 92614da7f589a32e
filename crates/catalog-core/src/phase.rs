//! # Search Phases
//!
//! Each search request walks a fixed sequence of phases:
//!
//! ```text
//! Idle → Validating → Building → Executing → Deduplicating → Paginating → Done
//!                                    │
//!                                    └──► Failed
//! ```
//!
//! Validation corrects rather than rejects, and building is pure, so the
//! data-store call is the only phase that can fail.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Validating,
    Building,
    Executing,
    Deduplicating,
    Paginating,
    Done,
    Failed,
}

impl SearchPhase {
    /// The phase after a successful step. Terminal phases stay put.
    pub const fn next(self) -> SearchPhase {
        match self {
            SearchPhase::Idle => SearchPhase::Validating,
            SearchPhase::Validating => SearchPhase::Building,
            SearchPhase::Building => SearchPhase::Executing,
            SearchPhase::Executing => SearchPhase::Deduplicating,
            SearchPhase::Deduplicating => SearchPhase::Paginating,
            SearchPhase::Paginating => SearchPhase::Done,
            SearchPhase::Done => SearchPhase::Done,
            SearchPhase::Failed => SearchPhase::Failed,
        }
    }

    /// The phase after an error. Only `Executing` can fail.
    pub const fn fail(self) -> Option<SearchPhase> {
        match self {
            SearchPhase::Executing => Some(SearchPhase::Failed),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, SearchPhase::Done | SearchPhase::Failed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SearchPhase::Idle => "idle",
            SearchPhase::Validating => "validating",
            SearchPhase::Building => "building",
            SearchPhase::Executing => "executing",
            SearchPhase::Deduplicating => "deduplicating",
            SearchPhase::Paginating => "paginating",
            SearchPhase::Done => "done",
            SearchPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_sequence() {
        let mut phase = SearchPhase::Idle;
        let mut seen = vec![phase];
        while !phase.is_terminal() {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                SearchPhase::Idle,
                SearchPhase::Validating,
                SearchPhase::Building,
                SearchPhase::Executing,
                SearchPhase::Deduplicating,
                SearchPhase::Paginating,
                SearchPhase::Done,
            ]
        );
    }

    #[test]
    fn test_only_executing_can_fail() {
        assert_eq!(SearchPhase::Executing.fail(), Some(SearchPhase::Failed));
        for phase in [
            SearchPhase::Idle,
            SearchPhase::Validating,
            SearchPhase::Building,
            SearchPhase::Deduplicating,
            SearchPhase::Paginating,
            SearchPhase::Done,
            SearchPhase::Failed,
        ] {
            assert_eq!(phase.fail(), None, "{} must not fail", phase);
        }
    }

    #[test]
    fn test_terminal_phases_are_sticky() {
        assert_eq!(SearchPhase::Done.next(), SearchPhase::Done);
        assert_eq!(SearchPhase::Failed.next(), SearchPhase::Failed);
    }
}
