//! Request body extractor shared by the player handlers.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    Form,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Request body parsed from JSON or from a url-encoded form, depending on
/// `Content-Type`.
///
/// A missing body, an empty JSON body and any other content type all
/// deserialize as `{}`, leaving it to the handler to decide what an absent
/// field means.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match content_type(req.headers()) {
            Some(BodyKind::Form) => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
                Ok(Self(value))
            }
            Some(BodyKind::Json) => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
                let bytes: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
                parse_json(bytes)
            }
            None => parse_json(b"{}"),
        }
    }
}

fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<Payload<T>, ApiError> {
    serde_json::from_slice(bytes)
        .map(Payload)
        .map_err(|err| ApiError::MalformedBody(err.to_string()))
}

enum BodyKind {
    Json,
    Form,
}

fn content_type(headers: &HeaderMap) -> Option<BodyKind> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let mime = value.split(';').next()?.trim().to_ascii_lowercase();

    if mime == "application/x-www-form-urlencoded" {
        Some(BodyKind::Form)
    } else if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
        Some(BodyKind::Json)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoldUpdate, InventoryPush, PlayerUpdate};
    use axum::{body::Body, http};

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = http::Request::builder().method("PUT").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn parses_json() {
        let req = request(Some("application/json; charset=utf-8"), r#"{"gold": 999}"#);
        let Payload(update) = Payload::<GoldUpdate>::from_request(req, &()).await.unwrap();
        assert_eq!(update.gold, Some(999));
    }

    #[tokio::test]
    async fn parses_form() {
        let req = request(Some("application/x-www-form-urlencoded"), "itemId=9");
        let Payload(push) = Payload::<InventoryPush>::from_request(req, &()).await.unwrap();
        assert_eq!(push.item_id, 9);
    }

    #[tokio::test]
    async fn empty_json_body_is_empty_object() {
        let req = request(Some("application/json"), "");
        let Payload(update) = Payload::<PlayerUpdate>::from_request(req, &()).await.unwrap();
        assert!(update.is_empty());
    }

    #[tokio::test]
    async fn missing_content_type_ignores_body() {
        let req = request(None, r#"{"gold": 1}"#);
        let Payload(update) = Payload::<PlayerUpdate>::from_request(req, &()).await.unwrap();
        assert!(update.is_empty());
    }

    #[tokio::test]
    async fn syntax_error_is_malformed() {
        let req = request(Some("application/json"), "{gold:");
        let err = Payload::<PlayerUpdate>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn missing_required_field_is_malformed() {
        let req = request(Some("application/json"), "{}");
        let err = Payload::<InventoryPush>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
    }
}
