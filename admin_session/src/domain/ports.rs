use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::ContactMessage;
use crate::domain::rejection::RawError;

// Port for the per-scope key/value storage backing the admin session.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

// Port for the remote backend actor. Use cases depend on this trait, not on
// the concrete client.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    // Whether the collaborator finished initialising and may be called.
    fn is_ready(&self) -> bool {
        true
    }

    async fn admin_login(&self, username: &str, password: &str)
    -> Result<Option<String>, RawError>;

    // Admin-gated read.
    async fn get_messages(&self, admin_token: &str) -> Result<Vec<ContactMessage>, RawError>;

    // Token validity check only: any accepted call is a success, whatever the
    // payload looks like.
    async fn probe_session(&self, admin_token: &str) -> Result<(), RawError> {
        self.get_messages(admin_token).await.map(|_| ())
    }

    async fn health(&self) -> Result<String, RawError>;
}

#[async_trait]
impl<T> AdminBackend for Arc<T>
where
    T: AdminBackend + ?Sized,
{
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    async fn admin_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, RawError> {
        (**self).admin_login(username, password).await
    }

    async fn get_messages(&self, admin_token: &str) -> Result<Vec<ContactMessage>, RawError> {
        (**self).get_messages(admin_token).await
    }

    async fn probe_session(&self, admin_token: &str) -> Result<(), RawError> {
        (**self).probe_session(admin_token).await
    }

    async fn health(&self) -> Result<String, RawError> {
        (**self).health().await
    }
}
