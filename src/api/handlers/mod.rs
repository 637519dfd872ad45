use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use emos_core::catalog;
use emos_core::models::*;

use super::processors;
use super::state::{BackendState, ToggleError};

// ============================================================
// Error Handling
// ============================================================

/// JSON body of every non-2xx answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    let error = message.into();
    if status.is_server_error() {
        tracing::error!("{}", error);
    } else {
        tracing::warn!("{}", error);
    }
    (status, Json(ErrorBody { error }))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Features
// ============================================================

pub async fn list_features() -> Json<Vec<FeatureDescriptor>> {
    Json(catalog::descriptors())
}

pub async fn get_feature(Path(id): Path<u32>) -> Result<Json<FeatureDescriptor>, ApiError> {
    catalog::lookup(FeatureId(id))
        .map(|entry| Json(entry.descriptor()))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Feature {} not found", id)))
}

// ============================================================
// Processing
// ============================================================

/// Runs the feature's processor. Requests that carry no generator selection
/// use the generators switched on through `toggle_generator`.
pub async fn process_feature(
    State(state): State<BackendState>,
    Path(id): Path<u32>,
    Json(mut inputs): Json<PanelInputs>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let id = FeatureId(id);
    if catalog::lookup(id).is_none() {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Feature {} not found", id),
        ));
    }
    let process = processors::processor(id).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            format!("No processor for feature {}", id),
        )
    })?;

    let generators = UnitKind::Generator.input_key();
    if inputs.get(generators).is_none() {
        let active = state.active_generators();
        if !active.is_empty() {
            inputs.insert(generators, InputValue::Selections(active));
        }
    }

    tracing::debug!(feature = %id, inputs = inputs.len(), "Processing feature");
    Ok(Json(process(&inputs)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleGeneratorInput {
    pub class_name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub async fn toggle_generator(
    State(state): State<BackendState>,
    Json(input): Json<ToggleGeneratorInput>,
) -> Result<Json<MessageBody>, ApiError> {
    match state.set_generator(&input.class_name, input.active) {
        Ok(()) => {
            let verb = if input.active { "activated" } else { "deactivated" };
            tracing::info!(generator = %input.class_name, active = input.active, "Generator toggled");
            Ok(Json(MessageBody {
                message: format!("Generator '{}' {}", input.class_name, verb),
            }))
        }
        Err(e @ ToggleError::UnknownGenerator(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, e.to_string()))
        }
        Err(e @ ToggleError::Unavailable(_)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}
