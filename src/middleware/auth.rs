//! Authorization gate middleware.
//!
//! Extracts the session token via the configured transport, verifies it with
//! the codec and attaches the resulting identity to the request. Everything
//! downstream of this gate can rely on `CurrentUser` being present.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use chrono::{DateTime, Utc};
use futures::future::{ready, Ready};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::security::jwt::TokenCodec;
use crate::AppState;

/// Identity attached to a request once the gate accepts its token.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub can_view_pokemon: bool,
}

/// Decide whether a request proceeds, given only the extracted token and the
/// current time. No I/O happens here.
///
/// Expired and tampered tokens are deliberately indistinguishable to the
/// caller: both collapse into `InvalidToken`.
pub fn authenticate(
    token: Option<&str>,
    codec: &TokenCodec,
    now: DateTime<Utc>,
) -> Result<CurrentUser, ApiError> {
    let token = token.ok_or(ApiError::TokenRequired)?;
    let claims = codec
        .verify(token, now)
        .map_err(|_| ApiError::InvalidToken)?;

    Ok(CurrentUser {
        id: claims.sub,
        username: claims.username,
        can_view_pokemon: claims.can_view_pokemon,
    })
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let outcome = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| ApiError::Internal("application state missing".into()))
                .and_then(|state| {
                    let token = state.transport.extract(req.request());
                    authenticate(token.as_deref(), &state.codec, Utc::now())
                });

            match outcome {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req
                    .into_response(err.error_response())
                    .map_into_right_body()),
            }
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ApiError::TokenRequired.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Duration;

    const SECRET: &str = "gate-test-signing-secret-0123456789abcd";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 3_600)
    }

    fn issue_for(can_view_pokemon: bool, now: DateTime<Utc>) -> (User, String) {
        let user = User {
            id: Uuid::new_v4(),
            username: "misty".into(),
            password_hash: "irrelevant".into(),
            can_view_pokemon,
        };
        let token = codec().issue(&user, now).unwrap();
        (user, token)
    }

    #[test]
    fn missing_token_is_rejected_as_required() {
        let err = authenticate(None, &codec(), Utc::now()).unwrap_err();
        assert!(matches!(err, ApiError::TokenRequired));
    }

    #[test]
    fn garbage_token_is_rejected_as_invalid() {
        let err = authenticate(Some("not-a-token"), &codec(), Utc::now()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn expired_token_is_rejected_identically_to_tampering() {
        let now = Utc::now();
        let (_, token) = issue_for(true, now);

        let later = now + Duration::seconds(3_600);
        let err = authenticate(Some(&token), &codec(), later).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn valid_token_yields_identity_and_capability() {
        let now = Utc::now();
        let (user, token) = issue_for(false, now);

        let current = authenticate(Some(&token), &codec(), now).unwrap();
        assert_eq!(current.id, user.id);
        assert_eq!(current.username, "misty");
        assert!(!current.can_view_pokemon);
    }
}
