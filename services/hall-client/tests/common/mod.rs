//! Scripted collaborators shared by the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use hall_client::admin::Operator;
use hall_client::poller::Navigator;
use hall_client::service::StatusService;
use hall_client::status::{GatewayConfigSummary, PolicyInfo, ReloadResult, StatusSnapshot};
use hall_client::view::{Renderer, WaitingRoomView};
use hall_client::HallError;

/// Ordered record of every call made to the fakes below
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

pub fn count(journal: &Journal, prefix: &str) -> usize {
    journal
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.starts_with(prefix))
        .count()
}

pub fn snapshot(
    server_online: bool,
    service_ready: bool,
    redirect_url: Option<&str>,
    reason: Option<&str>,
) -> StatusSnapshot {
    StatusSnapshot {
        domain: None,
        server_online,
        service_ready,
        ready: server_online && service_ready,
        redirect_url: redirect_url.map(str::to_string),
        policy: reason.map(|r| PolicyInfo::with_reason(r.to_string().into())),
    }
}

/// Status service answering from a script, one entry per status call
#[derive(Debug, Default)]
pub struct ScriptedService {
    statuses: Mutex<VecDeque<hall_client::Result<StatusSnapshot>>>,
    reload: Mutex<Option<hall_client::Result<ReloadResult>>>,
    fail_wake: bool,
    fail_activity: bool,
    pub journal: Journal,
}

impl ScriptedService {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn push_status(&self, status: hall_client::Result<StatusSnapshot>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn set_reload(&self, answer: hall_client::Result<ReloadResult>) {
        *self.reload.lock().unwrap() = Some(answer);
    }

    pub fn failing_wake(mut self) -> Self {
        self.fail_wake = true;
        self
    }

    pub fn failing_activity(mut self) -> Self {
        self.fail_activity = true;
        self
    }

    fn record(&self, entry: String) {
        self.journal.lock().unwrap().push(entry);
    }
}

#[async_trait::async_trait]
impl StatusService for ScriptedService {
    async fn status(&self, domain: &str) -> hall_client::Result<StatusSnapshot> {
        self.record(format!("status:{}", domain));
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HallError::Network("script exhausted".to_string())))
    }

    async fn wake(&self, domain: &str) -> hall_client::Result<()> {
        self.record(format!("wake:{}", domain));
        if self.fail_wake {
            return Err(HallError::Network("wake refused".to_string()));
        }
        Ok(())
    }

    async fn activity(&self, domain: &str) -> hall_client::Result<()> {
        self.record(format!("activity:{}", domain));
        if self.fail_activity {
            return Err(HallError::Network("activity refused".to_string()));
        }
        Ok(())
    }

    async fn reload(&self) -> hall_client::Result<ReloadResult> {
        self.record("reload".to_string());
        self.reload
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(HallError::Protocol("no reload scripted".to_string())))
    }

    async fn config_summary(&self) -> hall_client::Result<GatewayConfigSummary> {
        self.record("config".to_string());
        Ok(GatewayConfigSummary::default())
    }

    async fn shutdown(&self, domain: &str) -> hall_client::Result<()> {
        self.record(format!("shutdown:{}", domain));
        Ok(())
    }
}

/// Navigator that only writes to the journal
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub journal: Journal,
}

#[async_trait::async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, url: &str) {
        self.journal.lock().unwrap().push(format!("navigate:{}", url));
    }
}

/// Renderer keeping every view it was given
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Mutex<Vec<WaitingRoomView>>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<WaitingRoomView> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, view: &WaitingRoomView) {
        self.frames.lock().unwrap().push(view.clone());
    }
}

/// Operator that writes messages and refreshes to the journal
#[derive(Debug, Default)]
pub struct RecordingOperator {
    pub journal: Journal,
}

#[async_trait::async_trait]
impl Operator for RecordingOperator {
    async fn show_message(&self, message: &str) {
        self.journal.lock().unwrap().push(format!("message:{}", message));
    }

    async fn refresh(&self) -> hall_client::Result<()> {
        self.journal.lock().unwrap().push("refresh".to_string());
        Ok(())
    }
}
