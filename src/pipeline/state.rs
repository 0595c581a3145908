/// Run state definitions for tracking an extraction run
///
/// A run moves strictly forward: Idle, ConsentChecked, Fetched, Parsed,
/// Stored, Done. Any non-terminal state may drop to Failed.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    // ===== Active States =====
    /// Constructed, nothing done yet
    Idle,

    /// robots.txt allows the target
    ConsentChecked,

    /// Markup retrieved
    Fetched,

    /// Rows extracted
    Parsed,

    /// Rows written to storage
    Stored,

    // ===== Terminal States =====
    Done,

    Failed,
}

impl RunState {
    /// Returns true if the run cannot move any further
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// The single forward successor, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::ConsentChecked),
            Self::ConsentChecked => Some(Self::Fetched),
            Self::Fetched => Some(Self::Parsed),
            Self::Parsed => Some(Self::Stored),
            Self::Stored => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Returns true if `to` is a legal move from this state
    ///
    /// No back-edges and no skipping ahead.
    pub fn can_transition_to(&self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ConsentChecked => "consent_checked",
            Self::Fetched => "fetched",
            Self::Parsed => "parsed",
            Self::Stored => "stored",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
