// One stub backend plus one gate, shared by every test in the binary.
use admin_gate::frameworks::config::Settings;
use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

pub const ADMIN_PASSWORD: &str = "rice-mill";
const ISSUED_TOKEN: &str = "tok-valid";

static GATE_URL: OnceLock<String> = OnceLock::new();
static GATE_READY: OnceLock<()> = OnceLock::new();

// Ensure the gate is running and return its base URL.
pub fn ensure_gate() -> &'static str {
    GATE_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own OS thread so the servers outlive individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let backend_url = spawn_stub_backend().await;

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{addr}"));

                let settings = Settings {
                    backend_url,
                    health_check_timeout: Duration::from_secs(2),
                    startup_health_attempts: 3,
                    startup_health_retry_delay: Duration::from_millis(50),
                    session_maintenance_interval: Duration::from_millis(100),
                    scope_idle_timeout: Duration::from_secs(60),
                };
                admin_gate::run(listener, settings)
                    .await
                    .expect("gate failed");
            });
        });
        wait_for_url_and_readiness(published_url);
    });

    GATE_URL
        .get()
        .expect("gate url should be initialized")
        .as_str()
}

// The startup health gate flips readiness asynchronously; wait for it.
pub async fn wait_until_backend_ready(client: &reqwest::Client, base_url: &str) {
    for _ in 0..100 {
        let ready = client
            .get(format!("{base_url}/health"))
            .send()
            .await
            .map(|res| res.status() == reqwest::StatusCode::OK)
            .unwrap_or(false);
        if ready {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("backend did not become ready in time");
}

async fn spawn_stub_backend() -> String {
    let app = Router::new()
        .route("/api/health", post(|| async { Json(json!("rice mill backend ok")) }))
        .route("/api/adminLogin", post(stub_login))
        .route("/api/getMessages", post(stub_messages));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral backend port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend failed");
    });
    format!("http://{addr}")
}

async fn stub_login(Json(body): Json<Value>) -> Json<Value> {
    if body["password"] == ADMIN_PASSWORD {
        Json(json!({ "__kind__": "Some", "value": ISSUED_TOKEN }))
    } else {
        Json(Value::Null)
    }
}

async fn stub_messages(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["adminToken"] == ISSUED_TOKEN {
        (
            StatusCode::OK,
            Json(json!([{
                // 64-bit fields arrive string-encoded, as candid bridges emit them.
                "id": "1",
                "name": "Farmer",
                "email": "farmer@example.com",
                "message": "Price for 50kg?",
                "timestamp": "1700000000000000000"
            }])),
        )
    } else {
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Unauthorized: invalid admin token" })),
        )
    }
}

fn wait_for_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = GATE_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("gate did not become ready in time");
}
