//! Client for the Hall gateway's status and admin endpoints

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::io::{HttpClient, HttpResponse};
use crate::status::{ActionResponse, GatewayConfigSummary, ReloadResult, StatusSnapshot};

/// The server side of the waiting-room protocol
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait StatusService: Send + Sync {
    /// `GET /api/status/{domain}`
    async fn status(&self, domain: &str) -> crate::Result<StatusSnapshot>;

    /// `POST /api/wake/{domain}`
    async fn wake(&self, domain: &str) -> crate::Result<()>;

    /// `POST /api/activity/{domain}`
    async fn activity(&self, domain: &str) -> crate::Result<()>;

    /// `POST /api/reload`
    async fn reload(&self) -> crate::Result<ReloadResult>;

    /// `GET /api/config`
    async fn config_summary(&self) -> crate::Result<GatewayConfigSummary>;

    /// `POST /admin/shutdown/{domain}`
    async fn shutdown(&self, domain: &str) -> crate::Result<()>;
}

#[derive(Debug, Clone, Copy)]
enum AdminMethod {
    Get,
    Post,
}

/// [`StatusService`] over HTTP
pub struct HttpStatusService {
    base_url: String,
    admin_password: Option<String>,
    logged_in: Mutex<bool>,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpStatusService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStatusService")
            .field("base_url", &self.base_url)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl HttpStatusService {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        tracing::debug!("Created HttpStatusService for {}", base_url);

        Self {
            base_url,
            admin_password: None,
            logged_in: Mutex::new(false),
            http,
        }
    }

    /// Log in to the admin area before the first admin call
    pub fn with_admin_password(mut self, password: Option<String>) -> Self {
        self.admin_password = password;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended by `segments`, each one percent-encoded as a single
    /// path segment
    fn url(&self, segments: &[&str]) -> crate::Result<String> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            crate::HallError::Config(format!("Invalid gateway URL {:?}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                crate::HallError::Config(format!(
                    "Gateway URL {:?} cannot take a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// Open an admin session unless one is already open. Without a password
    /// this is a no-op and the gateway decides whether the call is allowed.
    async fn ensure_admin_session(&self) -> crate::Result<()> {
        let Some(password) = &self.admin_password else {
            return Ok(());
        };

        let mut logged_in = self.logged_in.lock().await;
        if *logged_in {
            return Ok(());
        }

        let url = self.url(&["admin", "login"])?;
        tracing::debug!("Logging in to {}", url);
        let response = self
            .http
            .post_form(&url, &[("password", password.as_str())])
            .await?;

        // Success redirects into the admin area; a wrong password gets the
        // login page again, with a 200
        if !response.is_redirect() || is_login_redirect(&response) {
            tracing::warn!("Admin login rejected with status {}", response.status);
            return Err(crate::HallError::Protocol(format!(
                "admin login was not accepted (status {}), check the admin password",
                response.status
            )));
        }
        tracing::info!("Admin session opened");
        *logged_in = true;
        Ok(())
    }

    async fn send(&self, method: AdminMethod, url: &str) -> crate::Result<HttpResponse> {
        match method {
            AdminMethod::Get => self.http.get(url).await,
            AdminMethod::Post => self.http.post(url).await,
        }
    }

    /// Send an admin request. Being sent to the login page means the
    /// gateway dropped our session: log in again once and retry.
    async fn admin_request(
        &self,
        method: AdminMethod,
        url: &str,
    ) -> crate::Result<HttpResponse> {
        self.ensure_admin_session().await?;
        let response = self.send(method, url).await?;
        if !is_login_redirect(&response) {
            return Ok(response);
        }
        if self.admin_password.is_none() {
            return Err(crate::HallError::Protocol(format!(
                "{} requires an admin session and no admin password is configured",
                url
            )));
        }

        tracing::info!("Admin session expired, logging in again");
        *self.logged_in.lock().await = false;
        self.ensure_admin_session().await?;

        let response = self.send(method, url).await?;
        if is_login_redirect(&response) {
            *self.logged_in.lock().await = false;
            return Err(crate::HallError::Protocol(format!(
                "{} still redirects to the admin login",
                url
            )));
        }
        Ok(response)
    }
}

/// The gateway answers unauthenticated admin calls with a redirect to
/// `/admin/login?next=...`
fn is_login_redirect(response: &HttpResponse) -> bool {
    response.is_redirect()
        && response
            .location
            .as_deref()
            .is_some_and(|location| location.contains("/admin/login"))
}

/// Decode a JSON body whatever the status code; the gateway reports
/// failures in the body as well.
fn parse_body<T: DeserializeOwned>(url: &str, response: &HttpResponse) -> crate::Result<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        crate::HallError::Protocol(format!(
            "{} returned status {} with an unexpected body: {}",
            url, response.status, e
        ))
    })
}

/// Log the `{success, message}` answer of a fire-and-forget command
fn log_action(what: &str, url: &str, response: &HttpResponse) {
    match serde_json::from_str::<ActionResponse>(&response.body) {
        Ok(action) if action.success => {
            tracing::debug!("{} acknowledged: {}", what, action.message)
        }
        Ok(action) => tracing::warn!("{} refused by gateway: {}", what, action.message),
        Err(_) => tracing::debug!("{} {} -> status {}", what, url, response.status),
    }
}

#[async_trait]
impl StatusService for HttpStatusService {
    async fn status(&self, domain: &str) -> crate::Result<StatusSnapshot> {
        let url = self.url(&["api", "status", domain])?;
        let response = self.http.get(&url).await?;
        parse_body(&url, &response)
    }

    async fn wake(&self, domain: &str) -> crate::Result<()> {
        let url = self.url(&["api", "wake", domain])?;
        let response = self.http.post(&url).await?;
        log_action("Wake", &url, &response);
        Ok(())
    }

    async fn activity(&self, domain: &str) -> crate::Result<()> {
        let url = self.url(&["api", "activity", domain])?;
        let response = self.http.post(&url).await?;
        log_action("Activity", &url, &response);
        Ok(())
    }

    async fn reload(&self) -> crate::Result<ReloadResult> {
        let url = self.url(&["api", "reload"])?;
        let response = self.admin_request(AdminMethod::Post, &url).await?;
        parse_body(&url, &response)
    }

    async fn config_summary(&self) -> crate::Result<GatewayConfigSummary> {
        let url = self.url(&["api", "config"])?;
        let response = self.admin_request(AdminMethod::Get, &url).await?;
        parse_body(&url, &response)
    }

    async fn shutdown(&self, domain: &str) -> crate::Result<()> {
        let url = self.url(&["admin", "shutdown", domain])?;
        let response = self.admin_request(AdminMethod::Post, &url).await?;
        // Accepted requests redirect back to the dashboard
        if response.status >= 400 {
            return Err(crate::HallError::Protocol(format!(
                "{} returned status {}",
                url, response.status
            )));
        }
        tracing::info!("Shutdown of '{}' accepted by the gateway", domain);
        Ok(())
    }
}
