//! Actor extraction for audit attribution.
//!
//! Every mutating route records who performed it. The acting principal
//! arrives in the `X-Actor-Id` header; identity management itself lives
//! outside this service.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use serde_json::json;
use uuid::Uuid;

use kasira_shared::types::{ActorContext, ActorId};

/// Header carrying the acting principal's ID.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extracts the actor context from the `X-Actor-Id` header.
///
/// Rejects requests without the header or with a malformed UUID.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub ActorContext);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| missing_actor("Missing X-Actor-Id header"))?;

        let actor_id = Uuid::parse_str(value)
            .map_err(|_| missing_actor("X-Actor-Id is not a valid UUID"))?;

        Ok(Self(ActorContext::new(ActorId::from_uuid(actor_id))))
    }
}

fn missing_actor(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "MISSING_ACTOR",
            "message": message
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<Actor, (StatusCode, Json<serde_json::Value>)> {
        let (mut parts, ()) = req.into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_yields_actor() {
        let id = Uuid::now_v7();
        let req = Request::builder()
            .header(ACTOR_HEADER, id.to_string())
            .body(())
            .unwrap();

        let Actor(ctx) = extract(req).await.unwrap();
        assert_eq!(ctx.actor_id.into_inner(), id);
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let req = Request::builder().body(()).unwrap();
        let (status, _) = extract(req).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_uuid_rejected() {
        let req = Request::builder()
            .header(ACTOR_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        let (status, _) = extract(req).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
