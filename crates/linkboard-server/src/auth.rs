//! Basic auth for the admin subtree
//!
//! Credentials come from the config file. The whole `/admin` router sits
//! behind this middleware; everything else is public.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::app::SharedApp;

pub async fn require_basic_auth(
    State(app): State<SharedApp>,
    request: Request,
    next: Next,
) -> Response {
    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic);

    match supplied {
        Some((user, pass)) if user == app.auth.username && pass == app.auth.password => {
            next.run(request).await
        }
        _ => unauthorized(),
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, r#"Basic realm="Restricted""#)],
        "Unauthorized.",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        // base64("admin:secret")
        let header = "Basic YWRtaW46c2VjcmV0";
        assert_eq!(
            parse_basic(header),
            Some(("admin".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn test_parse_basic_password_with_colon() {
        // base64("admin:se:cret")
        let header = "Basic YWRtaW46c2U6Y3JldA==";
        assert_eq!(
            parse_basic(header),
            Some(("admin".to_string(), "se:cret".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_basic("Bearer token").is_none());
        assert!(parse_basic("Basic not-base64!!!").is_none());
        assert!(parse_basic("Basic YWRtaW4=").is_none()); // no colon
    }
}
