use crate::app_state::AppState;
use crate::config::PublishFailurePolicy;
use crate::error::RelayError;
use crate::relay::event::{InboundEvent, EVENT_HEADER};
use crate::relay::router::{route, Route};
use crate::utils::{verify_signature, SIGNATURE_HEADER};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), RelayError> {
    // 1. Signature, only when a secret is configured
    if let Some(secret) = &state.config.webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !verify_signature(signature, &body, secret) {
            warn!("rejected webhook with invalid signature");
            return Err(RelayError::InvalidSignature);
        }
    }

    // 2. Classify
    let event_type = headers
        .get(EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let event = InboundEvent::from_payload(event_type, &body)?;
    info!(event = %event.event_type, action = %event.action, "received webhook");

    let reply = match route(&event)? {
        Route::Reply(reply) => reply,
        Route::Ignore => return Ok((StatusCode::OK, Json(json!({ "status": "ignored" })))),
    };

    // 3. Generate; failures become the reply text
    let text = state
        .ollama
        .generate(&reply.prompt, &state.config.ollama_model)
        .await
        .unwrap_or_else(|err| err);
    let comment = reply.kind.render(&text);

    // 4. Publish
    let installation_id = reply
        .installation_id
        .unwrap_or(state.config.installation_id);
    let published = state
        .github
        .publish_comment(
            installation_id,
            &reply.repository_full_name,
            reply.issue_number,
            &comment,
        )
        .await?;

    if !published {
        warn!(
            repo = %reply.repository_full_name,
            issue_number = reply.issue_number,
            "reply comment was not published"
        );
        if state.config.publish_failure_policy == PublishFailurePolicy::Surface {
            return Ok((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "status": "publish_failed" })),
            ));
        }
    }

    Ok((StatusCode::OK, Json(json!({ "status": "processed" }))))
}
