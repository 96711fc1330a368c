//! Wire types for the Hall gateway JSON API

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Why the gateway thinks the backend is in its current power state
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PolicyReason {
    WithinSchedule,
    OutsideSchedule,
    RecentActivity,
    IdleTimeout,
    AlwaysOn,
    /// Anything the gateway sends that we have no message for
    Unknown(String),
}

impl From<String> for PolicyReason {
    fn from(value: String) -> Self {
        match value.as_str() {
            "within_schedule" => PolicyReason::WithinSchedule,
            "outside_schedule" => PolicyReason::OutsideSchedule,
            "recent_activity" => PolicyReason::RecentActivity,
            "idle_timeout" => PolicyReason::IdleTimeout,
            "always_on" => PolicyReason::AlwaysOn,
            _ => PolicyReason::Unknown(value),
        }
    }
}

impl PolicyReason {
    /// Message shown in the waiting room for this reason
    pub fn message(&self) -> &'static str {
        match self {
            PolicyReason::WithinSchedule => "📅 Dans les horaires programmés",
            PolicyReason::OutsideSchedule => "🌙 Hors horaires - réveil à la demande",
            PolicyReason::RecentActivity => "⚡ Serveur actif",
            PolicyReason::IdleTimeout => "💤 Serveur en veille - réveil en cours...",
            PolicyReason::AlwaysOn => "🔋 Serveur permanent",
            PolicyReason::Unknown(_) => "",
        }
    }
}

impl fmt::Display for PolicyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyReason::WithinSchedule => write!(f, "within_schedule"),
            PolicyReason::OutsideSchedule => write!(f, "outside_schedule"),
            PolicyReason::RecentActivity => write!(f, "recent_activity"),
            PolicyReason::IdleTimeout => write!(f, "idle_timeout"),
            PolicyReason::AlwaysOn => write!(f, "always_on"),
            PolicyReason::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Policy block of a status snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PolicyInfo {
    #[serde(default)]
    pub reason: Option<PolicyReason>,
    /// Policy type configured for the domain (`always_on`, `scheduled`, `on_demand`)
    #[serde(rename = "type", default)]
    pub policy_type: Option<String>,
    #[serde(default)]
    pub should_be_awake: Option<bool>,
}

impl PolicyInfo {
    pub fn with_reason(reason: PolicyReason) -> Self {
        Self {
            reason: Some(reason),
            ..Self::default()
        }
    }

    /// Table lookup on the reason; unknown or absent reasons render blank
    pub fn message(&self) -> &'static str {
        self.reason.as_ref().map(PolicyReason::message).unwrap_or("")
    }
}

/// Response of `GET /api/status/{domain}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub domain: Option<String>,
    pub server_online: bool,
    pub service_ready: bool,
    pub ready: bool,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub policy: Option<PolicyInfo>,
}

impl StatusSnapshot {
    /// Where to go once the application is ready, if anywhere
    pub fn redirect_target(&self) -> Option<&str> {
        if !self.ready {
            return None;
        }
        self.redirect_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// `{success, message}` body returned by the gateway's command endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Result of `POST /api/reload`
pub type ReloadResult = ActionResponse;

/// Server block of a domain in the configuration summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerSummary {
    #[serde(default)]
    pub ip: Option<String>,
}

/// One domain as exposed by `GET /api/config`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainSummary {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub policy: Option<serde_json::Value>,
    #[serde(default)]
    pub server: ServerSummary,
}

/// Response of `GET /api/config`, with secrets already stripped by the gateway
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GatewayConfigSummary {
    #[serde(default)]
    pub domains: BTreeMap<String, DomainSummary>,
    #[serde(default)]
    pub global: serde_json::Map<String, serde_json::Value>,
}
