use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{AdminBackend, ContactMessage, RawError, SessionStorage};

// Storage whose every operation fails, for error-swallowing paths.
pub(crate) struct FailingStorage;

impl SessionStorage for FailingStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
        Err("get failed".to_string())
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), String> {
        Err("set failed".to_string())
    }

    fn remove_item(&self, _key: &str) -> Result<(), String> {
        Err("remove failed".to_string())
    }
}

// Scripted backend; clones share counters and the probe gate.
#[derive(Clone)]
pub(crate) struct FakeBackend {
    ready: Arc<AtomicBool>,
    login: Result<Option<String>, RawError>,
    login_delay: Option<Duration>,
    // Shared so a test can change the answer between validations.
    probe: Arc<Mutex<Result<Vec<ContactMessage>, RawError>>>,
    health: Result<String, RawError>,
    health_delay: Option<Duration>,
    // When set, probes wait for a notification before answering.
    probe_gate: Option<Arc<Notify>>,
    pub probe_started: Arc<Notify>,
    pub probe_calls: Arc<AtomicUsize>,
    pub login_calls: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
            login: Ok(Some("issued-token".to_string())),
            login_delay: None,
            probe: Arc::new(Mutex::new(Ok(Vec::new()))),
            health: Ok("ok".to_string()),
            health_delay: None,
            probe_gate: None,
            probe_started: Arc::new(Notify::new()),
            probe_calls: Arc::new(AtomicUsize::new(0)),
            login_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_login(mut self, result: Result<Option<String>, RawError>) -> Self {
        self.login = result;
        self
    }

    pub(crate) fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = Some(delay);
        self
    }

    pub(crate) fn with_probe(mut self, result: Result<Vec<ContactMessage>, RawError>) -> Self {
        self.probe = Arc::new(Mutex::new(result));
        self
    }

    pub(crate) fn set_probe(&self, result: Result<Vec<ContactMessage>, RawError>) {
        *self.probe.lock().expect("probe lock") = result;
    }

    pub(crate) fn with_health(mut self, result: Result<String, RawError>) -> Self {
        self.health = result;
        self
    }

    pub(crate) fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = Some(delay);
        self
    }

    pub(crate) fn with_probe_gate(mut self, gate: Arc<Notify>) -> Self {
        self.probe_gate = Some(gate);
        self
    }

    pub(crate) fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub(crate) fn probes(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdminBackend for FakeBackend {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn admin_login(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<Option<String>, RawError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.login_delay {
            tokio::time::sleep(delay).await;
        }
        self.login.clone()
    }

    async fn get_messages(&self, _admin_token: &str) -> Result<Vec<ContactMessage>, RawError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.probe_started.notify_one();
        if let Some(gate) = &self.probe_gate {
            gate.notified().await;
        }
        self.probe.lock().expect("probe lock").clone()
    }

    async fn health(&self) -> Result<String, RawError> {
        if let Some(delay) = self.health_delay {
            tokio::time::sleep(delay).await;
        }
        self.health.clone()
    }
}
