//! pending → accepted | rejected, accepted → completed. Nothing moves backward.

use std::fmt;

use crate::types::RequestStatus;

impl RequestStatus {
    /// `rejected` and `completed` are final.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Accepted, Self::Completed)
        )
    }
}

/// A named edge of the lifecycle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accept,
    Reject,
    Complete,
}

impl Transition {
    /// The status the stored row must still have for this transition to apply.
    pub fn source(&self) -> RequestStatus {
        match self {
            Self::Accept | Self::Reject => RequestStatus::Pending,
            Self::Complete => RequestStatus::Accepted,
        }
    }

    pub fn target(&self) -> RequestStatus {
        match self {
            Self::Accept => RequestStatus::Accepted,
            Self::Reject => RequestStatus::Rejected,
            Self::Complete => RequestStatus::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
        RequestStatus::Completed,
    ];

    #[test]
    fn test_exactly_three_legal_edges() {
        let legal: Vec<(RequestStatus, RequestStatus)> = ALL
            .iter()
            .flat_map(|a| ALL.iter().map(move |b| (*a, *b)))
            .filter(|(a, b)| a.can_transition_to(*b))
            .collect();
        assert_eq!(
            legal,
            vec![
                (RequestStatus::Pending, RequestStatus::Accepted),
                (RequestStatus::Pending, RequestStatus::Rejected),
                (RequestStatus::Accepted, RequestStatus::Completed),
            ]
        );
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for s in ALL.iter().filter(|s| s.is_terminal()) {
            assert!(ALL.iter().all(|n| !s.can_transition_to(*n)), "{s} has an exit");
        }
    }

    #[test]
    fn test_named_transitions_are_legal_edges() {
        for t in [Transition::Accept, Transition::Reject, Transition::Complete] {
            assert!(t.source().can_transition_to(t.target()), "{t}");
        }
    }
}
