use admin_session::{AdminBackend, AdminSessionContext, MemoryStorage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

// We use Arc<dyn Trait> to hold any backend implementation (dependency injection).
pub type SharedBackend = Arc<dyn AdminBackend>;
pub type ScopeContext = AdminSessionContext<SharedBackend, MemoryStorage>;

struct ScopeEntry {
    context: Arc<ScopeContext>,
    last_seen: Instant,
}

// Application state: the backend plus one session context per browser-tab scope.
pub struct AppState {
    pub backend: SharedBackend,
    pub health_timeout: Duration,
    scopes: Mutex<HashMap<String, ScopeEntry>>,
}

impl AppState {
    pub fn new(backend: SharedBackend, health_timeout: Duration) -> Self {
        Self {
            backend,
            health_timeout,
            scopes: Mutex::new(HashMap::new()),
        }
    }

    // Fresh, unregistered context; it only becomes a scope via `insert_scope`.
    pub fn new_context(&self) -> Arc<ScopeContext> {
        Arc::new(
            AdminSessionContext::open(self.backend.clone(), MemoryStorage::new())
                .with_health_timeout(self.health_timeout),
        )
    }

    // Looks up an existing scope without creating one.
    pub async fn get_scope(&self, scope_id: &str) -> Option<Arc<ScopeContext>> {
        let mut scopes = self.scopes.lock().await;
        scopes.get_mut(scope_id).map(|entry| {
            entry.last_seen = Instant::now();
            entry.context.clone()
        })
    }

    pub async fn insert_scope(&self, scope_id: &str, context: Arc<ScopeContext>) {
        let mut scopes = self.scopes.lock().await;
        tracing::debug!(scope_id, "opening session scope");
        scopes.insert(
            scope_id.to_string(),
            ScopeEntry {
                context,
                last_seen: Instant::now(),
            },
        );
    }

    pub async fn close_scope(&self, scope_id: &str) -> bool {
        let mut scopes = self.scopes.lock().await;
        scopes.remove(scope_id).is_some()
    }

    pub async fn scope_count(&self) -> usize {
        self.scopes.lock().await.len()
    }

    // Drops scopes nobody touched for longer than `max_idle`.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut scopes = self.scopes.lock().await;
        let before = scopes.len();
        scopes.retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        before - scopes.len()
    }

    // Background retry for scopes whose backend was unavailable. Contexts are
    // cloned out first so no probe runs under the scope lock.
    pub async fn retry_unavailable(&self) -> usize {
        let contexts: Vec<Arc<ScopeContext>> = {
            let scopes = self.scopes.lock().await;
            scopes.values().map(|entry| entry.context.clone()).collect()
        };

        let mut retried = 0;
        for context in contexts {
            if let Some(outcome) = context.retry_if_unavailable().await {
                tracing::debug!(?outcome, "background session retry");
                retried += 1;
            }
        }
        retried
    }
}
