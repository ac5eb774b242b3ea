//! `CatalogContext` extractor: client identity and moderator rights.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;

use modhub_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Per-request context available in handlers.
///
/// Never rejects: a missing or wrong moderator token only means the
/// request sees the public view.
#[derive(Debug, Clone)]
pub struct CatalogContext(pub RequestContext);

impl std::ops::Deref for CatalogContext {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CatalogContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let moderator = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| state.is_moderator_token(token.trim()));

        Ok(Self(RequestContext::new(client_identity(parts), moderator)))
    }
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then the socket peer.
fn client_identity(parts: &Parts) -> String {
    let first_hop = header_value(parts, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').map(str::trim).find(|s| !s.is_empty()));
    if let Some(first) = first_hop {
        return first.to_string();
    }

    if let Some(real_ip) = header_value(parts, "x-real-ip") {
        return real_ip.to_string();
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
