use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::event::UserEvent;
use super::verify::SvixHeaders;
use crate::app::AppContext;
use crate::error::{Result, SyncError};
use crate::store::UserRecord;

/// Path the provider is configured to deliver to
pub const WEBHOOK_PATH: &str = "/api/webhooks/clerk";

/// Creates the webhook router
pub fn webhook_routes() -> Router<AppContext> {
    Router::new().route(WEBHOOK_PATH, post(handle_webhook))
}

/// JSON body for handled events: `{"message":"OK","user":<record>}`.
/// `user` is omitted when the store had nothing to return.
#[derive(Debug, Serialize)]
struct SyncResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserRecord>,
}

fn ok_response(user: Option<UserRecord>) -> Response {
    Json(SyncResponse {
        message: "OK",
        user,
    })
    .into_response()
}

/// Terminate one webhook delivery: authenticate, decode, apply, respond.
///
/// Flow and failure mapping:
/// 1. missing/invalid `svix-*` headers -> 400
/// 2. signature or timestamp rejected -> 400
/// 3. body fails to decode into an event -> 400
/// 4. store/provider error while applying -> 500 (no rollback; a created
///    record stays even if the follow-up metadata call fails)
/// 5. unhandled event type -> 200 empty body, no side effects
async fn handle_webhook(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let svix = extract_svix_headers(&headers)?;
    ctx.verifier.verify(&body, &svix)?;

    let event = UserEvent::parse(&body)?;
    tracing::info!(svix_id = svix.id, event = event.kind(), "webhook verified");

    match event {
        UserEvent::Created(data) => {
            let clerk_id = data.id.clone();
            let user = data.into_new_user()?;

            tracing::debug!(clerk_id = %clerk_id, username = %user.username, "creating user");
            let created = ctx.store.create_user(user).await?;

            if let Some(record) = &created {
                // Mirror the local id onto the Clerk account so sessions can
                // resolve it from the token without a lookup.
                ctx.provider
                    .update_user_metadata(&clerk_id, &record.id)
                    .await?;
                tracing::info!(clerk_id = %clerk_id, user_id = %record.id, "user created");
            }

            Ok(ok_response(created))
        }
        UserEvent::Updated(data) => {
            let (clerk_id, update) = data.into_update()?;

            tracing::debug!(clerk_id = %clerk_id, "updating user");
            let updated = ctx.store.update_user(&clerk_id, update).await?;

            Ok(ok_response(updated))
        }
        UserEvent::Deleted(data) => {
            tracing::debug!(clerk_id = %data.id, "deleting user");
            let deleted = ctx.store.delete_user(&data.id).await?;

            Ok(ok_response(deleted))
        }
        UserEvent::Other(kind) => {
            tracing::debug!(event = %kind, "unhandled event type, acknowledging");
            Ok(StatusCode::OK.into_response())
        }
    }
}

/// Pull the three `svix-*` headers out of the request.
///
/// A header that is present but not valid UTF-8 counts as missing.
fn extract_svix_headers(headers: &HeaderMap) -> Result<SvixHeaders<'_>> {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .ok_or(SyncError::MissingHeaders)
    };

    Ok(SvixHeaders {
        id: get("svix-id")?,
        timestamp: get("svix-timestamp")?,
        signature: get("svix-signature")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn full_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("svix-id", HeaderValue::from_static("msg_1"));
        headers.insert("svix-timestamp", HeaderValue::from_static("1700000000"));
        headers.insert("svix-signature", HeaderValue::from_static("v1,AAAA"));
        headers
    }

    #[test]
    fn test_extract_svix_headers() {
        let headers = full_headers();
        let svix = extract_svix_headers(&headers).unwrap();
        assert_eq!(svix.id, "msg_1");
        assert_eq!(svix.timestamp, "1700000000");
        assert_eq!(svix.signature, "v1,AAAA");
    }

    #[test]
    fn test_extract_fails_when_any_header_missing() {
        for name in ["svix-id", "svix-timestamp", "svix-signature"] {
            let mut headers = full_headers();
            headers.remove(name);
            let result = extract_svix_headers(&headers);
            assert!(
                matches!(result, Err(SyncError::MissingHeaders)),
                "missing {} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_extract_fails_on_non_utf8_header() {
        let mut headers = full_headers();
        headers.insert(
            "svix-signature",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        assert!(extract_svix_headers(&headers).is_err());
    }

    #[test]
    fn test_sync_response_omits_missing_user() {
        let json = serde_json::to_value(SyncResponse {
            message: "OK",
            user: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"message": "OK"}));
    }
}
