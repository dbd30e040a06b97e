//! Bearer-token extractor yielding the acting [`Principal`].
//!
//! Keeps the HTTP modules focused on request/response mapping: handlers take
//! an [`Authenticated`] argument and never look at headers themselves.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Principal);

impl Authenticated {
    /// The resolved caller.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(Error::unauthorized("bearer token required"));
    }
    Ok(token.to_owned())
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let principal = state
                .authenticator
                .authenticate(&token)
                .await
                .map_err(|error| {
                    warn!(error = %error, "authentication backend failed");
                    Error::service_unavailable("authentication is temporarily unavailable")
                })?
                .ok_or_else(|| Error::unauthorized("invalid or expired token"))?;
            Ok(Authenticated(principal))
        })
    }
}
