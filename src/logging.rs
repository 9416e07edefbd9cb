//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::internal_server_error::InternalServerError;

/// The number of characters of a body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full text is logged at the `debug` level. Bodies that are
/// not text, such as PDF downloads, are summarised by their length only. The
/// bytes passed on are always the bytes that were received.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return InternalServerError::default().into_response();
        }
    };

    log_body(
        &format!("Received request: {parts:#?}"),
        &parts.headers,
        &body_bytes,
    );

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return InternalServerError::default().into_response();
        }
    };

    log_body(
        &format!("Sending response: {parts:#?}"),
        &parts.headers,
        &body_bytes,
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_text(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return true;
    };

    content_type.starts_with("text/")
        || content_type.starts_with("application/x-www-form-urlencoded")
        || content_type.starts_with("application/json")
}

fn log_body(message: &str, headers: &HeaderMap, body: &Bytes) {
    if !is_text(headers) {
        tracing::info!("{message}\nbody: <{} bytes>", body.len());
        return;
    }

    let text = String::from_utf8_lossy(body);

    match text.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((cutoff, _)) => {
            tracing::info!("{message}\nbody: {}...", &text[..cutoff]);
            tracing::debug!("Full body: {text:?}");
        }
        None => tracing::info!("{message}\nbody: {text:?}"),
    }
}

#[cfg(test)]
mod logging_middleware_tests {
    use axum::{Router, middleware, routing::get};
    use axum_test::TestServer;

    use super::logging_middleware;

    const BINARY: &[u8] = &[0x25, 0x50, 0x44, 0x46, 0xff, 0xfe, 0x00, 0x80];

    async fn binary_handler() -> ([(&'static str, &'static str); 1], &'static [u8]) {
        ([("content-type", "application/pdf")], BINARY)
    }

    async fn text_handler() -> String {
        "é".repeat(100)
    }

    fn server() -> TestServer {
        let app = Router::new()
            .route("/binary", get(binary_handler))
            .route("/text", get(text_handler))
            .layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server")
    }

    #[tokio::test]
    async fn binary_body_passes_through_unchanged() {
        let response = server().get("/binary").await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), BINARY);
    }

    #[tokio::test]
    async fn long_multibyte_text_is_not_split_mid_character() {
        let response = server().get("/text").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "é".repeat(100));
    }
}
