//! HTTP request handlers

use super::types::{
    ErrorResponse, FunctionCallRequest, FunctionListResponse, GlobalDataResponse,
    SuccessResponse,
};
use super::AppState;
use crate::host::{DispatchError, TurnOutcome};
use crate::result::WireResponse;
use crate::tools::{InvokeError, ToolContext};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{Map, Value};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let swaig_route = format!("{}/swaig", state.config.route);
    Router::new()
        // Function signatures
        .route("/functions", get(list_functions))
        // Function calls from the host
        .route(&swaig_route, post(call_function))
        // Call sessions
        .route("/calls/:call_id/global_data", get(get_global_data))
        .route("/calls/:call_id", delete(end_call))
        .with_state(state)
}

// ============================================================
// Function Signatures
// ============================================================

async fn list_functions(State(state): State<AppState>) -> Json<FunctionListResponse> {
    Json(FunctionListResponse {
        agent: state.config.name.clone(),
        functions: state.registry.definitions(),
    })
}

// ============================================================
// Function Calls
// ============================================================

async fn call_function(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<Json<WireResponse>, AppError> {
    let req: FunctionCallRequest = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid function call: {e}")))?;
    // Without a call id the invocation is one-shot and nothing is remembered
    let (call_id, anonymous) = match req.call_id.filter(|id| !id.is_empty()) {
        Some(id) => (id, false),
        None => (uuid::Uuid::new_v4().to_string(), true),
    };

    let known = state.sessions.get(&call_id).await;
    if known.as_ref().is_some_and(|s| s.is_ended()) {
        return Err(AppError::Conflict(format!("Call {call_id} has already ended")));
    }

    let global_data = match (req.global_data, &known) {
        (Some(data), _) => data,
        (None, Some(session)) => session.global_data().await,
        (None, None) => Map::new(),
    };
    let ctx = ToolContext::new(call_id.clone(), global_data).with_raw_data(raw);

    // A failed build returns before anything is delivered or remembered
    let result = state.registry.invoke(&req.function, req.argument, ctx).await?;
    let wire = result.to_wire();

    match &state.executor {
        Some(executor) => match executor.dispatch(&call_id, wire.clone()).await? {
            TurnOutcome::Deferred { handle } => {
                tracing::debug!(call_id = %call_id, function = %req.function, "Turn handed back, actions deferred");
                if anonymous {
                    let sessions = state.sessions.clone();
                    tokio::spawn(async move {
                        let _ = handle.await;
                        sessions.remove(&call_id).await;
                    });
                }
            }
            TurnOutcome::Completed { reports } | TurnOutcome::Terminated { reports } => {
                tracing::debug!(call_id = %call_id, function = %req.function, reports = reports.len(), "Turn completed");
                if anonymous {
                    state.sessions.remove(&call_id).await;
                }
            }
        },
        // The external host runs the actions; keep a mirror of the call's data
        None if !anonymous => {
            let session = match known {
                Some(session) => session,
                None => state.sessions.get_or_create(&call_id).await,
            };
            session.apply_patch(&wire.global_data_patch).await;
        }
        None => {}
    }

    Ok(Json(wire))
}

// ============================================================
// Call Sessions
// ============================================================

async fn get_global_data(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<GlobalDataResponse>, AppError> {
    let session = state
        .sessions
        .get(&call_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Unknown call: {call_id}")))?;

    Ok(Json(GlobalDataResponse {
        call_id,
        ended: session.is_ended(),
        global_data: session.global_data().await,
    }))
}

/// Caller hung up: pending deferred actions that have not started are skipped
async fn end_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.sessions.get(&call_id).await.is_none() {
        return Err(AppError::NotFound(format!("Unknown call: {call_id}")));
    }
    let success = state.sessions.end(&call_id).await;
    Ok(Json(SuccessResponse { success }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<InvokeError> for AppError {
    fn from(e: InvokeError) -> Self {
        match e {
            InvokeError::UnknownFunction(_) => AppError::NotFound(e.to_string()),
            InvokeError::Arguments(_) => AppError::BadRequest(e.to_string()),
            InvokeError::Result(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::SessionEnded(_) => AppError::Conflict(e.to_string()),
            DispatchError::InvalidResponse(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
