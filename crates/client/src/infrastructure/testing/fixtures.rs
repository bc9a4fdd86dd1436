use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::outbound::{
    Alert, AlertHandlers, AlertKind, HttpTransport, PreparedRequest, TransportError,
    TransportResponse,
};

type Scripted = Result<TransportResponse, TransportError>;

/// Transport that replays queued outcomes in order and records every request.
///
/// Once the queue is empty every call fails with `NoResponse`.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.push(Ok(TransportResponse::new(status, body)))
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.push(Err(error))
    }

    fn push(self, outcome: Scripted) -> Self {
        lock(&self.outcomes).push_back(outcome);
        self
    }

    /// Requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.outcomes).len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportError> {
        lock(&self.requests).push(request);
        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::no_response("no scripted response left")))
    }
}

/// Alert handlers that record what they were asked to show.
#[derive(Default)]
pub struct RecordingAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        lock(&self.alerts).clone()
    }

    pub fn of_kind(&self, kind: AlertKind) -> Vec<Alert> {
        lock(&self.alerts)
            .iter()
            .filter(|alert| alert.kind == kind)
            .cloned()
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        lock(&self.alerts).iter().map(|a| a.title.clone()).collect()
    }

    fn record(&self, alert: &Alert) {
        lock(&self.alerts).push(alert.clone());
    }
}

impl AlertHandlers for RecordingAlerts {
    fn show_error(&self, alert: &Alert) {
        self.record(alert);
    }

    fn show_success(&self, alert: &Alert) {
        self.record(alert);
    }

    fn show_login_required(&self, alert: &Alert) {
        self.record(alert);
    }

    fn show_alert(&self, alert: &Alert) {
        self.record(alert);
    }

    fn show_confirm(&self, alert: &Alert) {
        self.record(alert);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
