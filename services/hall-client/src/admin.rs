//! Admin configuration reload

use std::sync::Arc;

use async_trait::async_trait;

use crate::service::StatusService;
use crate::status::{GatewayConfigSummary, ReloadResult};

/// The person at the admin console
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Operator: Send + Sync {
    /// Surface a message from the gateway
    async fn show_message(&self, message: &str);

    /// Bring the admin view up to date after a successful change
    async fn refresh(&self) -> crate::Result<()>;
}

/// Fires the gateway's configuration reload and reports back
pub struct AdminReloader {
    service: Arc<dyn StatusService>,
    operator: Arc<dyn Operator>,
}

impl AdminReloader {
    pub fn new(service: Arc<dyn StatusService>, operator: Arc<dyn Operator>) -> Self {
        Self { service, operator }
    }

    /// Ask the gateway to reload its configuration.
    ///
    /// Transport and decoding failures are returned as-is; nothing is
    /// retried.
    pub async fn reload(&self) -> crate::Result<ReloadResult> {
        tracing::debug!("Requesting configuration reload");
        let result = self.service.reload().await?;

        if result.success {
            tracing::info!("Configuration reloaded: {}", result.message);
        } else {
            tracing::warn!("Configuration reload refused: {}", result.message);
        }

        self.operator.show_message(&result.message).await;
        if result.success {
            // Refresh failures never fail the reload
            if let Err(e) = self.operator.refresh().await {
                tracing::warn!("Refresh after reload failed: {}", e);
            }
        }
        Ok(result)
    }
}

/// Ask the gateway to power off `domain` through its configured shutdown
/// endpoint, then refresh the operator's view.
///
/// The gateway reports the endpoint's answer on its dashboard only, so
/// success here means the request was accepted.
pub async fn request_shutdown(
    service: &dyn StatusService,
    operator: &dyn Operator,
    domain: &str,
) -> crate::Result<()> {
    tracing::info!("Requesting shutdown of '{}'", domain);
    service.shutdown(domain).await?;
    operator
        .show_message(&format!("Extinction demandée pour {}", domain))
        .await;
    if let Err(e) = operator.refresh().await {
        tracing::warn!("Refresh after shutdown failed: {}", e);
    }
    Ok(())
}

/// Prints messages on stdout; refreshing re-reads the gateway configuration
pub struct ConsoleOperator {
    service: Arc<dyn StatusService>,
}

impl ConsoleOperator {
    pub fn new(service: Arc<dyn StatusService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operator for ConsoleOperator {
    async fn show_message(&self, message: &str) {
        println!("{}", message);
    }

    async fn refresh(&self) -> crate::Result<()> {
        let summary = self.service.config_summary().await?;
        print!("{}", format_summary(&summary));
        Ok(())
    }
}

/// One line per configured domain
pub fn format_summary(summary: &GatewayConfigSummary) -> String {
    let mut out = String::new();
    for (name, domain) in &summary.domains {
        let policy = domain
            .policy
            .as_ref()
            .and_then(|p| p.get("type"))
            .and_then(|t| t.as_str())
            .unwrap_or("on_demand");
        let ip = domain.server.ip.as_deref().unwrap_or("-");
        out.push_str(&format!("{:<16} {:<12} {}", name, policy, ip));
        if let Some(description) = &domain.description {
            out.push_str(&format!("  {}", description));
        }
        out.push('\n');
    }
    out
}
