//! WebSocket inbound adapter for per-user notification rooms.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list and bearer token)
//! - bind the connection to the authenticated user's room
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{debug, error, warn};
use url::{Url, form_urlencoded};

use crate::domain::Error;
use crate::inbound::http::auth::{NOT_AUTHORIZED, bearer_token};

mod session;

pub mod messages;
pub mod state;

use state::{AllowedOrigins, WsState};

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.allowed_origins, origin_header)?;

    let token = upgrade_token(&req).ok_or_else(|| Error::unauthorized(NOT_AUTHORIZED))?;
    let caller = state.authenticator.authenticate(&token).await?;

    let (response, session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        warn!(error = %error, "WebSocket upgrade failed");
        error
    })?;
    let (membership, outbox) = state.rooms.join(caller.user_id);
    debug!(user_id = %caller.user_id, "WebSocket connection upgraded");
    actix_web::rt::spawn(session::handle_ws_session(
        membership, outbox, session, messages,
    ));
    Ok(response)
}

/// Token from the `token` query parameter, falling back to the bearer header.
fn upgrade_token(req: &HttpRequest) -> Option<String> {
    form_urlencoded::parse(req.query_string().as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.trim().to_owned())
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(req.headers()).map(str::to_owned))
}

fn validate_origin(allowed: &AllowedOrigins, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if allowed.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header::AUTHORIZATION};
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://jobs.example.com")]
    fn accepts_configured_origins(#[case] origin: &str) {
        let allowed = AllowedOrigins::new(["http://localhost:3000", "https://jobs.example.com"]);
        assert!(validate_origin(&allowed, &header(origin)).is_ok());
    }

    #[rstest]
    #[case("http://localhost")]
    #[case("http://localhost:4000")]
    #[case("https://example.com")]
    fn rejects_disallowed_origins(#[case] origin: &str) {
        let error = validate_origin(&AllowedOrigins::default(), &header(origin))
            .expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[rstest]
    fn rejects_non_utf8_origin_header() {
        let header = HeaderValue::from_bytes(&[0x80]).expect("opaque header value");
        let error = validate_origin(&AllowedOrigins::default(), &header)
            .expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    fn rejects_unparsable_origin_header() {
        let header = HeaderValue::from_static("not a url");
        let error = validate_origin(&AllowedOrigins::default(), &header)
            .expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    #[case("/ws?token=abc", None, Some("abc"))]
    #[case("/ws?token=a%2Bb", None, Some("a+b"))]
    #[case("/ws", Some("Bearer xyz"), Some("xyz"))]
    #[case("/ws?token=abc", Some("Bearer xyz"), Some("abc"))]
    #[case("/ws?token=", Some("Bearer xyz"), Some("xyz"))]
    #[case("/ws", Some("Basic xyz"), None)]
    #[case("/ws", None, None)]
    fn reads_token_from_query_then_header(
        #[case] uri: &str,
        #[case] authorization: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let mut request = TestRequest::get().uri(uri);
        if let Some(value) = authorization {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let req = request.to_http_request();
        assert_eq!(upgrade_token(&req).as_deref(), expected);
    }
}
