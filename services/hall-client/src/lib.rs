//! Hall client - waiting room and admin console for the Hall gateway
//!
//! The Hall gateway fronts backend servers that sleep when idle. This crate
//! polls a domain's status until its application is ready, asking the
//! gateway to wake the server once on the way, and drives the gateway's
//! configuration reload.

pub mod admin;
pub mod config;
pub mod error;
pub mod io;
pub mod poller;
pub mod service;
pub mod session;
pub mod status;
pub mod ticker;
pub mod view;

pub use config::{load_config, Config};
pub use error::{HallError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::admin::{request_shutdown, AdminReloader, ConsoleOperator, Operator};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::poller::{Navigator, PollOutcome, StatusPoller, StdoutNavigator};
use crate::service::{HttpStatusService, StatusService};
use crate::status::{GatewayConfigSummary, ReloadResult};
use crate::ticker::IntervalTicker;
use crate::view::{Renderer, TerminalRenderer};

/// Wires configuration and collaborators into a [`HallClient`]
pub struct HallClientBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    service: Option<Arc<dyn StatusService>>,
    renderer: Option<Arc<dyn Renderer>>,
    navigator: Option<Arc<dyn Navigator>>,
    operator: Option<Arc<dyn Operator>>,
    cancel: Option<CancellationToken>,
}

impl HallClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            service: None,
            renderer: None,
            navigator: None,
            operator: None,
            cancel: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the HTTP-backed service entirely
    pub fn with_status_service(mut self, service: Arc<dyn StatusService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_operator(mut self, operator: Arc<dyn Operator>) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> Result<HallClient> {
        self.config.validate()?;

        let service: Arc<dyn StatusService> = match self.service {
            Some(service) => service,
            None => {
                let http: Arc<dyn HttpClient> = match self.http {
                    Some(http) => http,
                    None => Arc::new(ReqwestHttpClient::new(
                        self.config.gateway.request_timeout(),
                    )?),
                };
                Arc::new(
                    HttpStatusService::new(&self.config.gateway.base_url, http)
                        .with_admin_password(self.config.admin.password.clone()),
                )
            }
        };

        let operator = self
            .operator
            .unwrap_or_else(|| Arc::new(ConsoleOperator::new(Arc::clone(&service))));

        Ok(HallClient {
            config: self.config,
            service,
            renderer: self.renderer.unwrap_or_else(|| Arc::new(TerminalRenderer)),
            navigator: self.navigator.unwrap_or_else(|| Arc::new(StdoutNavigator)),
            operator,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// A configured client, ready to wait on a domain or talk to the admin API
pub struct HallClient {
    config: Config,
    service: Arc<dyn StatusService>,
    renderer: Arc<dyn Renderer>,
    navigator: Arc<dyn Navigator>,
    operator: Arc<dyn Operator>,
    cancel: CancellationToken,
}

impl HallClient {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Token that stops a running [`HallClient::wait`]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the waiting room for `domain`, or the configured domain, until
    /// the application is ready or the client is cancelled
    pub async fn wait(&self, domain: Option<&str>) -> Result<PollOutcome> {
        let domain = domain
            .or(self.config.waiting.domain.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| HallError::Config("no domain to wait for".to_string()))?;

        let interval = self.config.waiting.polling_interval();
        tracing::debug!("Polling '{}' every {:?}", domain, interval);

        let mut ticker = IntervalTicker::new(interval, self.cancel.clone());
        let mut poller = StatusPoller::new(
            Arc::clone(&self.service),
            Arc::clone(&self.renderer),
            Arc::clone(&self.navigator),
        )
        .with_fetch_timeout(interval);
        Ok(poller.start(domain, &mut ticker).await)
    }

    /// Ask the gateway to reload its configuration
    pub async fn reload(&self) -> Result<ReloadResult> {
        AdminReloader::new(Arc::clone(&self.service), Arc::clone(&self.operator))
            .reload()
            .await
    }

    pub async fn config_summary(&self) -> Result<GatewayConfigSummary> {
        self.service.config_summary().await
    }

    /// Ask the gateway to power off the server behind `domain`
    pub async fn shutdown(&self, domain: &str) -> Result<()> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(HallError::Config("no domain to shut down".to_string()));
        }
        request_shutdown(self.service.as_ref(), self.operator.as_ref(), domain).await
    }
}
