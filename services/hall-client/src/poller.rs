//! Waiting room poll loop
//!
//! Polls the gateway for a domain's status, shows it, asks for a wake once,
//! and navigates away once the application is ready.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::service::StatusService;
use crate::session::PollSession;
use crate::status::StatusSnapshot;
use crate::ticker::Ticker;
use crate::view::{Renderer, WaitingRoomView};

/// Sends the visitor on to the ready application
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, url: &str);
}

/// Prints the target URL on stdout so it can be piped into a browser launcher
#[derive(Debug, Default)]
pub struct StdoutNavigator;

#[async_trait]
impl Navigator for StdoutNavigator {
    async fn navigate(&self, url: &str) {
        println!("{}", url);
    }
}

/// What a single tick ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Status received, application not ready yet
    Waiting,
    /// Navigation to this URL has started
    Redirected(String),
    /// Status could not be fetched or decoded; nothing was changed
    Failed,
}

/// A tick hands the session back along with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub session: PollSession,
    pub outcome: TickOutcome,
}

/// How a poll loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Redirected { url: String, session: PollSession },
    /// The ticker ran out (cancelled) before the application became ready
    Stopped { session: PollSession },
}

impl PollOutcome {
    pub fn session(&self) -> &PollSession {
        match self {
            PollOutcome::Redirected { session, .. } | PollOutcome::Stopped { session } => session,
        }
    }
}

/// The waiting room controller
pub struct StatusPoller {
    service: Arc<dyn StatusService>,
    renderer: Arc<dyn Renderer>,
    navigator: Arc<dyn Navigator>,
    view: WaitingRoomView,
    fetch_timeout: Option<Duration>,
}

impl StatusPoller {
    pub fn new(
        service: Arc<dyn StatusService>,
        renderer: Arc<dyn Renderer>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            service,
            renderer,
            navigator,
            view: WaitingRoomView::default(),
            fetch_timeout: None,
        }
    }

    /// Give up on a status fetch after `timeout` so a hung request costs one
    /// tick instead of holding up the ones after it
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn view(&self) -> &WaitingRoomView {
        &self.view
    }

    /// Poll `domain` on every tick until the application is ready or the
    /// ticker stops.
    pub async fn start<T>(&mut self, domain: &str, ticker: &mut T) -> PollOutcome
    where
        T: Ticker + ?Sized,
    {
        let mut session = PollSession::new(domain);
        tracing::info!("Waiting for '{}'", domain);
        self.renderer.render(&self.view);

        while ticker.tick().await {
            let report = self.tick(session).await;
            session = report.session;
            if let TickOutcome::Redirected(url) = report.outcome {
                return PollOutcome::Redirected { url, session };
            }
        }

        tracing::info!(
            "Stopped waiting for '{}' after {} checks",
            session.domain,
            session.check_count
        );
        PollOutcome::Stopped { session }
    }

    /// Run one poll tick: fetch, show, maybe wake, maybe redirect
    pub async fn tick(&mut self, mut session: PollSession) -> TickReport {
        session.check_count += 1;

        let snapshot = match self.fetch_status(&session.domain).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    "Status check #{} for '{}' failed: {}",
                    session.check_count,
                    session.domain,
                    e
                );
                return TickReport {
                    session,
                    outcome: TickOutcome::Failed,
                };
            }
        };

        tracing::debug!(
            "Status check #{} for '{}': server_online={} service_ready={} ready={}",
            session.check_count,
            session.domain,
            snapshot.server_online,
            snapshot.service_ready,
            snapshot.ready
        );

        if self.view.apply(&snapshot) {
            self.renderer.render(&self.view);
        }

        if !snapshot.server_online && session.claim_wake() {
            tracing::info!("Server for '{}' is offline, requesting wake", session.domain);
            if let Err(e) = self.service.wake(&session.domain).await {
                tracing::warn!("Wake request for '{}' failed: {}", session.domain, e);
            }
        }

        if let Some(url) = snapshot.redirect_target() {
            if let Err(e) = self.service.activity(&session.domain).await {
                tracing::warn!("Activity signal for '{}' failed: {}", session.domain, e);
            }
            tracing::info!("'{}' is ready, redirecting to {}", session.domain, url);
            self.navigator.navigate(url).await;
            return TickReport {
                outcome: TickOutcome::Redirected(url.to_string()),
                session,
            };
        }

        if snapshot.ready {
            tracing::debug!(
                "'{}' reports ready without a redirect URL, still waiting",
                session.domain
            );
        }

        TickReport {
            session,
            outcome: TickOutcome::Waiting,
        }
    }

    async fn fetch_status(&self, domain: &str) -> crate::Result<StatusSnapshot> {
        let fetch = self.service.status(domain);
        let Some(limit) = self.fetch_timeout else {
            return fetch.await;
        };
        match tokio::time::timeout(limit, fetch).await {
            Ok(result) => result,
            Err(_) => Err(crate::HallError::Network(format!(
                "no status for '{}' within {:?}",
                domain, limit
            ))),
        }
    }
}
