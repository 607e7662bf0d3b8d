//! Per-request context captured by the audit interceptor

use axum::extract::{ConnectInfo, MatchedPath, Query};
use http::{header, request::Parts, HeaderMap, Method};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Fallback client address when nothing identifies the peer
pub const UNKNOWN_IP: &str = "unknown";

/// Caller identity placed in the request extensions by the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl AuthenticatedUser {
    /// "First Last" when either part is known, else the username
    pub fn display_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            return Some(name);
        }

        self.username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// What the interceptor knows about a request before the handler runs
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Concrete request path, e.g. `/api/v1/books/42`
    pub path: String,
    /// Matched route template when routing resolved one, else the path
    pub route: String,
    pub query: Option<String>,
    pub path_params: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub headers: HeaderMap,
    pub user: Option<AuthenticatedUser>,
    pub client_ip: String,
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts) -> Self {
        let path = parts.uri.path().to_string();
        let route = parts
            .extensions
            .get::<MatchedPath>()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| path.clone());

        let query_params = Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(params)| params)
            .unwrap_or_default();

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            method: parts.method.clone(),
            path_params: extract_path_params(&route, &path),
            path,
            route,
            query: parts.uri.query().map(str::to_string),
            query_params,
            headers: parts.headers.clone(),
            user: parts.extensions.get::<AuthenticatedUser>().cloned(),
            client_ip: client_ip(&parts.headers, parts.extensions.get::<ConnectInfo<SocketAddr>>()),
            user_agent,
        }
    }

    /// `id` path parameter, the audited entity identifier
    pub fn entity_id(&self) -> Option<&str> {
        self.path_params.get("id").map(String::as_str)
    }

    /// Trimmed non-empty `search` query parameter
    pub fn search_term(&self) -> Option<&str> {
        self.query_params
            .get("search")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// Pair route template parameters (`:id`, `{id}`) with concrete segments
pub fn extract_path_params(route: &str, path: &str) -> BTreeMap<String, String> {
    // Aligned from the end: a nested router may report only its own suffix
    let route_segments = route.split('/').filter(|s| !s.is_empty()).rev();
    let path_segments = path.split('/').filter(|s| !s.is_empty()).rev();

    route_segments
        .zip(path_segments)
        .filter_map(|(template, value)| {
            let name = template
                .strip_prefix(':')
                .or_else(|| template.strip_prefix('{').and_then(|t| t.strip_suffix('}')))?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Client address: first `X-Forwarded-For` hop, `X-Real-IP`, then the peer
pub fn client_ip(headers: &HeaderMap, peer: Option<&ConnectInfo<SocketAddr>>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}
