use crate::domain::SessionStorage;

pub const LAST_CONNECTIVITY_ERROR_KEY: &str = "last_connectivity_error";

// Remembers the last connectivity failure seen by a scope, for the diagnostics view.
// Storage failures are logged and otherwise ignored.
pub struct ConnectivityDiagnostics<'a, S> {
    pub storage: &'a S,
}

impl<S> ConnectivityDiagnostics<'_, S>
where
    S: SessionStorage,
{
    pub fn store(&self, message: &str) {
        if let Err(err) = self.storage.set_item(LAST_CONNECTIVITY_ERROR_KEY, message) {
            tracing::warn!(error = %err, "failed to store connectivity error");
        }
    }

    pub fn last(&self) -> Option<String> {
        self.storage
            .get_item(LAST_CONNECTIVITY_ERROR_KEY)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to read connectivity error");
                None
            })
    }

    pub fn clear(&self) {
        if let Err(err) = self.storage.remove_item(LAST_CONNECTIVITY_ERROR_KEY) {
            tracing::warn!(error = %err, "failed to clear connectivity error");
        }
    }
}
