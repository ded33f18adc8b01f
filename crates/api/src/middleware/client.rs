//! Extractor for the visitor metadata recorded with public comments.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use matuto_db::models::comment::ClientInfo;

/// Longest user agent kept.
const MAX_USER_AGENT_LENGTH: usize = 512;

/// Client IP and user agent of the current request.
///
/// The IP comes from the first `X-Forwarded-For` entry, then `X-Real-IP`,
/// then the socket peer address when the server was started with connect
/// info. Never rejects: missing values are `None`.
#[derive(Debug, Clone, Default)]
pub struct RequestClient(pub ClientInfo);

impl<S> FromRequestParts<S> for RequestClient
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = forwarded_ip(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        let user_agent = header_str(&parts.headers, USER_AGENT.as_str())
            .map(|ua| ua.chars().take(MAX_USER_AGENT_LENGTH).collect());

        Ok(RequestClient(ClientInfo { ip, user_agent }))
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .or_else(|| header_str(headers, "x-real-ip"))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
