//! In-process PostgREST stand-in for HTTP store tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;

/// A request captured by the stub.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Table segment of the request path.
    pub table: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Raw request body.
    pub body: String,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: Option<String>,
    delay: Duration,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Handle to a running stub server.
pub struct StubServer {
    addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    /// Start a server answering every insert with `status` and `reply`.
    /// `None` echoes the request body back.
    pub fn start(status: u16, reply: Option<&str>) -> Self {
        Self::start_with_delay(status, reply, Duration::ZERO)
    }

    /// Like [`StubServer::start`] but waits `delay` before answering.
    pub fn start_with_delay(status: u16, reply: Option<&str>, delay: Duration) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status: StatusCode::from_u16(status).expect("valid status code"),
            reply: reply.map(str::to_owned),
            delay,
            captured: Arc::clone(&captured),
        };
        let (addr_tx, addr_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub listener");
                addr_tx
                    .send(listener.local_addr().expect("stub address"))
                    .expect("report stub address");
                let app = Router::new()
                    .route("/rest/v1/:table", post(capture))
                    .with_state(state);
                axum::serve(listener, app).await.expect("stub server");
            });
        });
        let addr = addr_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("stub server should start");
        Self { addr, captured }
    }

    /// Base URL to configure the store with.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().expect("capture lock").clone()
    }
}

async fn capture(
    State(state): State<StubState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    let reply = state.reply.clone().unwrap_or_else(|| body.clone());
    state
        .captured
        .lock()
        .expect("capture lock")
        .push(CapturedRequest {
            table,
            headers,
            body,
        });
    (state.status, reply)
}

/// A loopback URL with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}")
}
