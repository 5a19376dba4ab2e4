//! HTTP 处理器模块

pub mod auth;
pub mod user;

use axum::{
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Request body decoded by `Content-Type`: urlencoded forms go through
/// `Form`, everything else through `Json`. Rejections become the
/// `AppError::Validation` envelope instead of axum's plain-text body.
pub struct RequestBody<T>(pub T);

impl<S, T> FromRequest<S> for RequestBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form_request(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}

fn is_form_request(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(content_type: Option<&str>) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_form_content_type_detected() {
        assert!(is_form_request(&request_with(Some(
            "application/x-www-form-urlencoded"
        ))));
        assert!(is_form_request(&request_with(Some(
            "Application/X-WWW-Form-Urlencoded; charset=UTF-8"
        ))));
    }

    #[test]
    fn test_other_content_types_use_json() {
        assert!(!is_form_request(&request_with(Some("application/json"))));
        assert!(!is_form_request(&request_with(Some("multipart/form-data; boundary=x"))));
        assert!(!is_form_request(&request_with(None)));
    }
}
