//! Compilation endpoint.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use qir_relay_core::HardwareTarget;

/// Header selecting the hardware target profile.
pub const HARDWARE_TARGET_HEADER: &str = "x-hardware-target";

/// `POST /api/compile`
///
/// The body is the raw QIR program; the response is the compiled bitcode,
/// all-or-nothing. An absent body is a caller error, reported before any
/// staging file is created.
pub async fn compile_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("No source code provided".to_string()));
    }
    tracing::info!(body_len = body.len(), "compile request received");

    let target = HardwareTarget::from_header(
        headers
            .get(HARDWARE_TARGET_HEADER)
            .and_then(|value| value.to_str().ok()),
    );

    let artifact = state.compiler.compile(&body, target).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        artifact,
    )
        .into_response())
}
