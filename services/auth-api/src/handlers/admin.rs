//! Operator endpoint for changing token lifetimes at runtime

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use peoplecount_auth_core::PolicyUpdate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AdminAuth;
use crate::state::AppState;

/// Accepted unit suffixes and their length in seconds
const UNITS: [(&str, u64); 4] = [("second", 1), ("minute", 60), ("hour", 3_600), ("day", 86_400)];

#[derive(Debug, Serialize)]
pub struct TokenExpiryResponse {
    pub msg: &'static str,
    pub access_token_expires_seconds: u64,
    pub refresh_token_expires_seconds: u64,
}

/// POST /admin/set_token_expiry
///
/// Body keys are `access_<unit>` and `refresh_<unit>` with unit one of
/// second, minute, hour or day; values for the same prefix are summed.
/// Every token issued before the change stops being honored.
pub async fn set_token_expiry(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    body: Bytes,
) -> ApiResult<Json<TokenExpiryResponse>> {
    let update = match parse_update(&body) {
        Ok(update) => update,
        Err(e) => {
            // Body errors are only reported to an authorized operator
            state.gateway.authorize_admin(&admin).await?;
            return Err(e);
        }
    };

    let applied = state.gateway.change_policy(&admin, update).await?;

    Ok(Json(TokenExpiryResponse {
        msg: "Token expiry updated",
        access_token_expires_seconds: applied.access.as_secs(),
        refresh_token_expires_seconds: applied.refresh.as_secs(),
    }))
}

fn parse_update(body: &[u8]) -> ApiResult<PolicyUpdate> {
    let fields: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("expected a JSON object: {e}")))?;

    Ok(PolicyUpdate {
        access: sum_prefix(&fields, "access")?,
        refresh: sum_prefix(&fields, "refresh")?,
    })
}

/// Total of every `<prefix>_<unit>` field, or None if no such field is present
fn sum_prefix(fields: &Map<String, Value>, prefix: &str) -> ApiResult<Option<Duration>> {
    let mut total: Option<u64> = None;

    for (unit, multiplier) in UNITS {
        let key = format!("{prefix}_{unit}");
        let Some(value) = fields.get(&key) else {
            continue;
        };
        let amount = value
            .as_u64()
            .ok_or_else(|| ApiError::BadRequest(format!("{key} must be a non-negative integer")))?;
        let seconds = amount
            .checked_mul(multiplier)
            .and_then(|secs| secs.checked_add(total.unwrap_or(0)))
            .ok_or_else(|| ApiError::BadRequest(format!("{prefix} lifetime is too large")))?;
        total = Some(seconds);
    }

    Ok(total.map(Duration::from_secs))
}
