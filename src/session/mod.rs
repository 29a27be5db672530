//! Session transport: carries the token between client and server.
//!
//! Cookie and bearer mode are interchangeable at deployment time; the token
//! itself is opaque to this layer and the codec never sees the transport.

use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::http::header;
use actix_web::HttpRequest;

use crate::config::{Config, TransportMode};

pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Clone)]
pub enum SessionTransport {
    Cookie {
        secure: bool,
        same_site: SameSite,
        max_age_secs: i64,
    },
    Bearer,
}

impl SessionTransport {
    pub fn from_config(config: &Config) -> Self {
        match config.session.transport {
            TransportMode::Cookie => SessionTransport::Cookie {
                secure: config.session.cookie_secure,
                same_site: if config.session.same_site_strict {
                    SameSite::Strict
                } else {
                    SameSite::Lax
                },
                max_age_secs: config.auth.token_ttl_secs,
            },
            TransportMode::Bearer => SessionTransport::Bearer,
        }
    }

    /// Pull the raw token off an incoming request, if any.
    pub fn extract(&self, req: &HttpRequest) -> Option<String> {
        match self {
            SessionTransport::Cookie { .. } => {
                req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned())
            }
            SessionTransport::Bearer => req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_owned),
        }
    }

    /// Cookie delivering a fresh session token. `None` in bearer mode, where
    /// the client stores the token itself.
    pub fn session_cookie(&self, token: &str) -> Option<Cookie<'static>> {
        match self {
            SessionTransport::Cookie {
                secure,
                same_site,
                max_age_secs,
            } => Some(
                Cookie::build(SESSION_COOKIE, token.to_owned())
                    .path("/")
                    .http_only(true)
                    .secure(*secure)
                    .same_site(*same_site)
                    .max_age(time::Duration::seconds(*max_age_secs))
                    .finish(),
            ),
            SessionTransport::Bearer => None,
        }
    }

    /// Expired cookie instructing the client to drop its session. `None` in
    /// bearer mode: there logout is a client-side concern and the server
    /// only acknowledges it.
    pub fn removal_cookie(&self) -> Option<Cookie<'static>> {
        match self {
            SessionTransport::Cookie { .. } => {
                let mut cookie = Cookie::build(SESSION_COOKIE, "")
                    .path("/")
                    .http_only(true)
                    .finish();
                cookie.make_removal();
                Some(cookie)
            }
            SessionTransport::Bearer => None,
        }
    }

    /// Whether login responses must carry the token in the body. Only bearer
    /// clients need it there; cookie clients get it via `Set-Cookie`.
    pub fn token_in_body(&self) -> bool {
        matches!(self, SessionTransport::Bearer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn cookie_transport() -> SessionTransport {
        SessionTransport::Cookie {
            secure: true,
            same_site: SameSite::Strict,
            max_age_secs: 86_400,
        }
    }

    #[test]
    fn cookie_extract_reads_session_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "tok-123"))
            .to_http_request();

        assert_eq!(cookie_transport().extract(&req), Some("tok-123".into()));
    }

    #[test]
    fn cookie_extract_ignores_authorization_header() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer tok-123"))
            .to_http_request();

        assert_eq!(cookie_transport().extract(&req), None);
    }

    #[test]
    fn bearer_extract_requires_bearer_prefix() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer tok-123"))
            .to_http_request();
        assert_eq!(SessionTransport::Bearer.extract(&req), Some("tok-123".into()));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert_eq!(SessionTransport::Bearer.extract(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(SessionTransport::Bearer.extract(&req), None);
    }

    #[test]
    fn session_cookie_carries_hardening_flags() {
        let cookie = cookie_transport().session_cookie("tok-123").unwrap();

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok-123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = cookie_transport().removal_cookie().unwrap();

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    #[test]
    fn bearer_mode_has_no_cookies() {
        assert!(SessionTransport::Bearer.session_cookie("tok").is_none());
        assert!(SessionTransport::Bearer.removal_cookie().is_none());
        assert!(SessionTransport::Bearer.token_in_body());
    }
}
