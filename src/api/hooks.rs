//! Identity lifecycle hooks
//!
//! The hosted identity provider calls these after an identity is created or
//! deleted. Every delivery must carry `x-webhook-signature: sha256=<hex>`
//! computed over the raw body with the configured webhook secret. Without a
//! secret both hooks reject every delivery.

use crate::api::SuccessResponse;
use crate::domain::{ProvisionUserInput, StringUuid};
use crate::error::AppError;
use crate::state::HasServices;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use hmac::{Hmac, Mac};
use metrics::counter;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEADER: &str = "x-webhook-signature";

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityDeletedEvent {
    pub id: StringUuid,
}

/// Result of a hook delivery. `applied` is false for repeated deliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookOutcome {
    pub id: StringUuid,
    pub applied: bool,
}

/// Verify an HMAC-SHA256 signature in `sha256=<hex>` or bare hex form
fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let expected_hex = signature.strip_prefix("sha256=").unwrap_or(signature);
    let Ok(expected) = hex::decode(expected_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

fn authenticate<S: HasServices>(state: &S, headers: &HeaderMap, body: &[u8]) -> Result<(), AppError> {
    let Some(secret) = state.config().hooks.webhook_secret.as_deref() else {
        warn!("Hook delivery rejected: HOOK_WEBHOOK_SECRET is not configured");
        return Err(AppError::Unauthorized(
            "Webhook secret not configured".to_string(),
        ));
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if signature.is_empty() {
        warn!("Hook delivery received without signature header");
        return Err(AppError::Unauthorized("Missing webhook signature".to_string()));
    }
    if !verify_signature(secret, body, signature) {
        warn!("Hook signature verification failed");
        return Err(AppError::Unauthorized("Invalid webhook signature".to_string()));
    }
    Ok(())
}

fn parse_event<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid event payload: {}", e)))
}

fn record_delivery<T>(hook: &'static str, result: &Result<T, AppError>) {
    let label = match result {
        Ok(_) => "ok",
        Err(AppError::Unauthorized(_)) => "unauthorized",
        Err(AppError::BadRequest(_)) | Err(AppError::Validation(_)) => "rejected",
        Err(_) => "error",
    };
    counter!("portal_hook_deliveries_total", "hook" => hook, "result" => label).increment(1);
}

/// POST /api/v1/hooks/identity-created
pub async fn identity_created<S: HasServices>(
    State(state): State<S>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let result: Result<HookOutcome, AppError> = async {
        authenticate(&state, &headers, &body)?;
        let input: ProvisionUserInput = parse_event(&body)?;
        let id = input.id;
        let applied = state.provisioning_service().identity_created(input).await?;
        Ok(HookOutcome { id, applied })
    }
    .await;
    record_delivery("identity_created", &result);
    Ok(Json(SuccessResponse::new(result?)))
}

/// POST /api/v1/hooks/identity-deleted
pub async fn identity_deleted<S: HasServices>(
    State(state): State<S>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let result: Result<HookOutcome, AppError> = async {
        authenticate(&state, &headers, &body)?;
        let event: IdentityDeletedEvent = parse_event(&body)?;
        let applied = state
            .provisioning_service()
            .identity_deleted(event.id)
            .await?;
        Ok(HookOutcome {
            id: event.id,
            applied,
        })
    }
    .await;
    record_delivery("identity_deleted", &result);
    Ok(Json(SuccessResponse::new(result?)))
}
