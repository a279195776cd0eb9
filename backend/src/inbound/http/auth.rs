//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take an [`AuthenticatedCaller`] argument to require a valid
//! token. The role attached to the caller comes from storage, so handlers
//! gate on it with [`Caller::authorize`].

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Caller, Error};

use super::state::HttpState;

/// Message returned for every authentication failure.
pub const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// # Examples
/// ```
/// use actix_web::http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
/// use jobtrack::inbound::http::auth::bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
/// assert_eq!(bearer_token(&headers), Some("abc"));
/// ```
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Caller resolved from the request's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCaller(pub Caller);

impl AuthenticatedCaller {
    pub fn into_inner(self) -> Caller {
        self.0
    }
}

impl FromRequest for AuthenticatedCaller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req.headers()).map(str::to_owned);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = token.ok_or_else(|| Error::unauthorized(NOT_AUTHORIZED))?;
            let caller = state.authenticator.authenticate(&token).await?;
            Ok(Self(caller))
        })
    }
}
