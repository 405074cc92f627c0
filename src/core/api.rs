//! HTTP + WebSocket API for timer-driven runs
//!
//! Endpoints:
//! - POST /run/new - Start a run (Go)
//! - GET /run/{id} - Get run status
//! - POST /run/{id}/step - Advance once by hand
//! - POST /run/{id}/stop - Pause the timer
//! - POST /run/{id}/go - Resume the timer
//! - GET /run/{id}/history - Every iterate with cycle flags
//! - DELETE /run/{id} - Clear the run
//! - WS /ws/{id} - Live steps
//! - GET /health - Health check

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::Message},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::core::{seed_from_input, SequenceEngine};
use crate::types::{CycleRange, DigitString, DriverStatus, ErrorKind, SequenceError, StepOutput};
use crate::{DEFAULT_STEP_INTERVAL_MS, DEFAULT_WIDTH, UPDATE_CHANNEL_CAPACITY};

/// One hosted run
#[derive(Debug)]
pub struct Run {
    pub id: String,
    pub engine: SequenceEngine,
    pub status: DriverStatus,
    pub interval_ms: u64,
    pub update_tx: broadcast::Sender<StepOutput>,
    ticker: Option<JoinHandle<()>>,
}

impl Run {
    /// Advance once, publish the step, and go STUCK on a repeat
    fn step(&mut self) -> Result<StepOutput, SequenceError> {
        let output = self.engine.advance()?;
        if output.already_seen {
            self.status = DriverStatus::Stuck;
            self.stop_ticker();
        }
        let _ = self.update_tx.send(output.clone());
        Ok(output)
    }

    fn cycle(&self) -> Option<CycleRange> {
        self.engine.cycle_range().ok()
    }

    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for Run {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// App state
#[derive(Debug, Default)]
pub struct AppState {
    pub runs: RwLock<HashMap<String, Run>>,
}

impl AppState {
    /// Receiver for the live steps of run `id`
    pub async fn subscribe(&self, id: &str) -> Option<broadcast::Receiver<StepOutput>> {
        self.runs.read().await.get(id).map(|run| run.update_tx.subscribe())
    }
}

/// Create new run request
#[derive(Debug, Default, Deserialize)]
pub struct NewRunRequest {
    /// Raw seed text; sanitized, random when no digits remain
    pub seed: Option<String>,
    pub width: Option<usize>,
    pub interval_ms: Option<u64>,
    /// Create the run PAUSED (no timer until /go)
    #[serde(default)]
    pub paused: bool,
}

/// Create new run response
#[derive(Debug, Serialize)]
pub struct NewRunResponse {
    pub run_id: String,
    pub seed: DigitString,
    pub width: usize,
    pub status: DriverStatus,
    pub websocket_url: String,
}

/// Run status response
#[derive(Debug, Serialize)]
pub struct RunStatusResponse {
    pub run_id: String,
    pub status: DriverStatus,
    pub seed: Option<DigitString>,
    pub current: Option<DigitString>,
    pub step_count: usize,
    pub interval_ms: u64,
    pub cycle: Option<CycleRange>,
    pub go_stop_enabled: bool,
    pub clear_enabled: bool,
}

/// Manual step response
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub status: DriverStatus,
    pub output: StepOutput,
    pub cycle: Option<CycleRange>,
}

/// One history line
#[derive(Debug, Serialize)]
pub struct HistoryLine {
    pub index: usize,
    pub value: DigitString,
    /// Part of the repeating cycle
    pub cyclic: bool,
    /// First repetition, closes the cycle
    pub closes_cycle: bool,
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub run_id: String,
    pub status: DriverStatus,
    pub lines: Vec<HistoryLine>,
    pub cycle: Option<CycleRange>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub runs_active: usize,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    fn not_found(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("no run {}", id))
    }

    fn conflict(status: DriverStatus, action: &str) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "INVALID_TRANSITION",
            format!("cannot {} a {} run", action, status),
        )
    }
}

impl From<SequenceError> for ApiError {
    fn from(err: SequenceError) -> Self {
        let status = match err.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::PrecondInvalid => StatusCode::CONFLICT,
            ErrorKind::InvariantViolation => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Create the API router
pub fn create_router() -> Router {
    create_router_with_state(Arc::new(AppState::default()))
}

/// Create the API router over shared state
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/run/new", post(create_run))
        .route("/run/:id", get(get_run).delete(clear_run))
        .route("/run/:id/step", post(step_run))
        .route("/run/:id/stop", post(stop_run))
        .route("/run/:id/go", post(go_run))
        .route("/run/:id/history", get(get_history))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let runs = state.runs.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        runs_active: runs.len(),
    })
}

/// Create and start a run
async fn create_run(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewRunRequest>,
) -> Result<Json<NewRunResponse>, ApiError> {
    let width = req.width.unwrap_or(DEFAULT_WIDTH);
    let seed = seed_from_input(req.seed.as_deref(), width).map_err(|e| {
        warn!(code = e.code(), "rejected new run");
        ApiError::from(e)
    })?;
    let interval_ms = req.interval_ms.unwrap_or(DEFAULT_STEP_INTERVAL_MS).max(1);
    let engine = SequenceEngine::with_seed(seed.clone())?;

    let run_id = generate_run_id();
    let (tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
    let status = if req.paused { DriverStatus::Paused } else { DriverStatus::Running };

    let mut runs = state.runs.write().await;
    runs.insert(
        run_id.clone(),
        Run {
            id: run_id.clone(),
            engine,
            status,
            interval_ms,
            update_tx: tx,
            ticker: None,
        },
    );
    if status == DriverStatus::Running {
        let handle = spawn_ticker(state.clone(), run_id.clone(), interval_ms);
        if let Some(run) = runs.get_mut(&run_id) {
            run.ticker = Some(handle);
        }
    }
    info!(run_id = %run_id, seed = %seed, interval_ms, "run created");

    Ok(Json(NewRunResponse {
        websocket_url: format!("/ws/{}", run_id),
        run_id,
        width: seed.width(),
        seed,
        status,
    }))
}

/// Get run status
async fn get_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RunStatusResponse>, ApiError> {
    let runs = state.runs.read().await;
    let run = runs.get(&id).ok_or_else(|| ApiError::not_found(&id))?;

    Ok(Json(RunStatusResponse {
        run_id: id.clone(),
        status: run.status,
        seed: run.engine.seed().cloned(),
        current: run.engine.current().cloned(),
        step_count: run.engine.step_count(),
        interval_ms: run.interval_ms,
        cycle: run.cycle(),
        go_stop_enabled: run.status.go_stop_enabled(),
        clear_enabled: run.status.clear_enabled(),
    }))
}

/// Advance once by hand
async fn step_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StepResponse>, ApiError> {
    let mut runs = state.runs.write().await;
    let run = runs.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
    if run.status == DriverStatus::Stuck {
        return Err(ApiError::conflict(run.status, "step"));
    }

    match run.step() {
        Ok(output) => Ok(Json(StepResponse {
            status: run.status,
            cycle: run.cycle(),
            output,
        })),
        Err(e) => {
            if e.is_fatal() {
                error!(run_id = %id, code = e.code(), "run aborted");
                runs.remove(&id);
            }
            Err(e.into())
        }
    }
}

/// RUNNING → PAUSED
async fn stop_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RunStatusResponse>, ApiError> {
    {
        let mut runs = state.runs.write().await;
        let run = runs.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
        if run.status != DriverStatus::Running {
            return Err(ApiError::conflict(run.status, "stop"));
        }
        run.status = DriverStatus::Paused;
        run.stop_ticker();
        info!(run_id = %id, "run paused");
    }
    get_run(State(state), Path(id)).await
}

/// PAUSED → RUNNING
async fn go_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RunStatusResponse>, ApiError> {
    {
        let mut runs = state.runs.write().await;
        let run = runs.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
        if run.status != DriverStatus::Paused {
            return Err(ApiError::conflict(run.status, "resume"));
        }
        run.status = DriverStatus::Running;
        run.ticker = Some(spawn_ticker(state.clone(), id.clone(), run.interval_ms));
        info!(run_id = %id, "run resumed");
    }
    get_run(State(state), Path(id)).await
}

/// Every iterate with cycle flags
async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let runs = state.runs.read().await;
    let run = runs.get(&id).ok_or_else(|| ApiError::not_found(&id))?;
    let cycle = run.cycle();

    let lines = run
        .engine
        .history()
        .iter()
        .enumerate()
        .map(|(index, value)| HistoryLine {
            index,
            value: value.clone(),
            cyclic: cycle.map_or(false, |c| c.contains(index)),
            closes_cycle: cycle.map_or(false, |c| c.closes_at(index)),
        })
        .collect();

    Ok(Json(HistoryResponse {
        run_id: id.clone(),
        status: run.status,
        lines,
        cycle,
    }))
}

/// Clear: stop and forget the run
async fn clear_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut runs = state.runs.write().await;
    runs.remove(&id).ok_or_else(|| ApiError::not_found(&id))?;
    info!(run_id = %id, "run cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// WebSocket handler for live steps
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let rx = state.subscribe(&id).await.ok_or_else(|| ApiError::not_found(&id))?;

    Ok(ws.on_upgrade(move |socket| async move {
        let (sender, receiver) = socket.split();
        forward_steps(sender, receiver, rx).await;
    }))
}

/// Forward steps as JSON text frames.
///
/// Sends a close frame once a repeated iterate went out (the run is STUCK)
/// or the run was cleared. Returns early when the client leaves.
pub async fn forward_steps<S, R, E>(mut sender: S, mut receiver: R, mut rx: broadcast::Receiver<StepOutput>)
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    loop {
        tokio::select! {
            update = rx.recv() => {
                let output = match update {
                    Ok(output) => output,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "websocket client lagging");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let json = serde_json::to_string(&output).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    return;
                }
                if output.already_seen {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    let _ = sender.send(Message::Close(None)).await;
}

/// Step a RUNNING run every `interval_ms` until it stops running
fn spawn_ticker(state: Arc<AppState>, id: String, interval_ms: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_millis(interval_ms);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let mut runs = state.runs.write().await;
            let Some(run) = runs.get_mut(&id) else { break };
            if run.status != DriverStatus::Running {
                break;
            }
            match run.step() {
                Ok(output) if output.already_seen => break,
                Ok(_) => {}
                Err(e) => {
                    error!(run_id = %id, code = e.code(), "run aborted");
                    runs.remove(&id);
                    break;
                }
            }
        }
    })
}

/// Generate run ID
fn generate_run_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};
    static NEXT: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    format!("run_{:x}_{}", nanos, NEXT.fetch_add(1, Ordering::Relaxed))
}

/// Run the API server
pub async fn run_server(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "midsquare API running");
    info!("  POST   /run/new         - Start run");
    info!("  GET    /run/:id         - Get status");
    info!("  POST   /run/:id/step    - Step once");
    info!("  POST   /run/:id/stop    - Pause");
    info!("  POST   /run/:id/go      - Resume");
    info!("  GET    /run/:id/history - History with cycle");
    info!("  DELETE /run/:id         - Clear");
    info!("  WS     /ws/:id          - Live steps");
    axum::serve(listener, router).await?;
    Ok(())
}
