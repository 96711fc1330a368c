//! Per-visit waiting room session

/// State carried from one poll tick to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSession {
    pub domain: String,
    /// Set on the first offline reading; never cleared
    pub wake_requested: bool,
    /// Ticks started so far, successful or not. Diagnostics only.
    pub check_count: u64,
}

impl PollSession {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            wake_requested: false,
            check_count: 0,
        }
    }

    /// Claim the session's single wake request.
    ///
    /// Returns true only the first time it is called.
    pub fn claim_wake(&mut self) -> bool {
        if self.wake_requested {
            return false;
        }
        self.wake_requested = true;
        true
    }
}
