use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

use crate::domain::{AdminBackend, ContactMessage, RawError};
use crate::interface_adapters::protocol::{
    AdminLoginRequest, AdminTokenRequest, extract_token, normalize_error,
};
use crate::use_cases::query_timeout::QUERY_TIMED_OUT;

// Thin wrapper around reqwest for backend actor calls. Calls are posted as
// JSON to `{base_url}/api/{method}`. No client-wide timeout: the session probe
// must not be capped, other callers wrap calls themselves.
pub struct HttpBackendClient {
    http: Client,
    base_url: Url,
    // Flipped once the startup health gate saw the backend answer.
    ready: AtomicBool,
}

impl HttpBackendClient {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        // A trailing slash makes `join` append instead of replacing the last segment.
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        Ok(Self {
            http: Client::new(),
            base_url,
            ready: AtomicBool::new(false),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    async fn call<T, A>(&self, method: &str, args: &A) -> Result<T, RawError>
    where
        T: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        self.send(method, args)
            .await?
            .json::<T>()
            .await
            .map_err(|err| RawError::plain(format!("failed to decode backend response: {err}")))
    }

    // Posts the call and turns non-2xx answers into `RawError`; the body of a
    // successful answer is left to the caller.
    async fn send<A>(&self, method: &str, args: &A) -> Result<reqwest::Response, RawError>
    where
        A: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(&format!("api/{method}"))
            .map_err(|err| RawError::plain(format!("invalid backend url: {err}")))?;

        let response = self
            .http
            .post(url)
            .json(args)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();

        // Keep the rejection payload so the classifier sees codes and reject text.
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(status, &body));
        }
        Ok(response)
    }
}

fn transport_error(err: reqwest::Error) -> RawError {
    if err.is_timeout() {
        RawError::network(QUERY_TIMED_OUT)
    } else {
        RawError::network(err.to_string())
    }
}

fn upstream_error(status: StatusCode, body: &str) -> RawError {
    let parsed = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| normalize_error(&value))
        .filter(|error| *error != RawError::Unknown);
    if let Some(error) = parsed {
        return error;
    }

    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            RawError::network(format!("backend unavailable ({status})"))
        }
        _ if !body.trim().is_empty() => RawError::plain(body.trim()),
        _ => RawError::plain(format!("backend returned {status}")),
    }
}

#[async_trait]
impl AdminBackend for HttpBackendClient {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn admin_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, RawError> {
        let reply: Value = self
            .call("adminLogin", &AdminLoginRequest { username, password })
            .await?;
        Ok(extract_token(&reply))
    }

    async fn get_messages(&self, admin_token: &str) -> Result<Vec<ContactMessage>, RawError> {
        self.call("getMessages", &AdminTokenRequest { admin_token })
            .await
    }

    // Only the status matters; the body is never decoded.
    async fn probe_session(&self, admin_token: &str) -> Result<(), RawError> {
        self.send("getMessages", &AdminTokenRequest { admin_token })
            .await
            .map(|_| ())
    }

    async fn health(&self) -> Result<String, RawError> {
        self.call("health", &Value::Null).await
    }
}
