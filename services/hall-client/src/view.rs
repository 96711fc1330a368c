//! What the waiting room shows: two status indicators and a policy line

use std::fmt;

use crate::status::{PolicyInfo, StatusSnapshot};

/// The two independent indicators of the waiting room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Host answers on the network
    Server,
    /// Application passes its health check
    Service,
}

impl Indicator {
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Server => "Serveur",
            Indicator::Service => "Application",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorState {
    #[default]
    Pending,
    Done,
}

impl IndicatorState {
    pub fn glyph(&self) -> &'static str {
        match self {
            IndicatorState::Pending => "⏳",
            IndicatorState::Done => "✅",
        }
    }
}

impl From<bool> for IndicatorState {
    fn from(is_ready: bool) -> Self {
        if is_ready {
            IndicatorState::Done
        } else {
            IndicatorState::Pending
        }
    }
}

/// Rendered state of the waiting room
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitingRoomView {
    pub server: IndicatorState,
    pub service: IndicatorState,
    pub policy_message: String,
}

impl WaitingRoomView {
    pub fn indicator(&self, indicator: Indicator) -> IndicatorState {
        match indicator {
            Indicator::Server => self.server,
            Indicator::Service => self.service,
        }
    }

    /// Set one indicator. Applying the same value twice is a no-op.
    ///
    /// Returns true if the indicator changed.
    pub fn update_status(&mut self, indicator: Indicator, is_ready: bool) -> bool {
        let slot = match indicator {
            Indicator::Server => &mut self.server,
            Indicator::Service => &mut self.service,
        };
        let next = IndicatorState::from(is_ready);
        let changed = *slot != next;
        *slot = next;
        changed
    }

    /// Show the message for the policy reason. A missing policy block keeps
    /// whatever was shown before.
    ///
    /// Returns true if the message changed.
    pub fn update_policy_info(&mut self, policy: Option<&PolicyInfo>) -> bool {
        let Some(policy) = policy else {
            return false;
        };
        let message = policy.message();
        if self.policy_message == message {
            return false;
        }
        self.policy_message = message.to_string();
        true
    }

    /// Reflect a whole snapshot; returns true if anything visible changed
    pub fn apply(&mut self, snapshot: &StatusSnapshot) -> bool {
        let server = self.update_status(Indicator::Server, snapshot.server_online);
        let service = self.update_status(Indicator::Service, snapshot.service_ready);
        let policy = self.update_policy_info(snapshot.policy.as_ref());
        server || service || policy
    }
}

impl fmt::Display for WaitingRoomView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}  {} {}",
            self.server.glyph(),
            Indicator::Server.label(),
            self.service.glyph(),
            Indicator::Service.label()
        )?;
        if !self.policy_message.is_empty() {
            write!(f, "  | {}", self.policy_message)?;
        }
        Ok(())
    }
}

/// Receives the view whenever it changes
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    fn render(&self, view: &WaitingRoomView);
}

/// Writes one status line per change to stderr
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, view: &WaitingRoomView) {
        eprintln!("{}", view);
    }
}
