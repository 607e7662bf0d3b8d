//! Audit interceptor for book inventory requests
//!
//! Wraps the router as a tower layer. For every request the classifier maps
//! to an inventory action it:
//! - buffers the request body and writes a PENDING record before the handler
//!   runs, snapshotting the book first when the request deletes one
//! - buffers the response and completes the record as SUCCESS or FAILURE
//! - hands the original request and response through unchanged
//!
//! Everything else passes straight to the inner service. Audit storage
//! errors are logged and never reach the client.

use axum::{
    body::{Body, Bytes},
    extract::{MatchedPath, Request},
    response::Response,
};
use futures::future::BoxFuture;
use http::StatusCode;
use http_body_util::BodyExt;
use serde_json::{json, Value as JsonValue};
use std::{
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::{debug, error, warn};

use super::classifier::{classify, entity_type_for};
use super::context::RequestContext;
use super::metadata::{describe, DescriptionParts};
use super::error::{AuditError, AuditResult};
use super::models::{AuditAction, AuditCompletion, AuditStatus, NewAuditRecord};
use super::sanitize::{sanitize_body, sanitize_headers, sanitize_response};
use super::service::AuditService;

/// Audit logging layer
#[derive(Clone)]
pub struct AuditLayer {
    audit: AuditService,
}

impl AuditLayer {
    pub fn new(audit: AuditService) -> Self {
        Self { audit }
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            audit: self.audit.clone(),
        }
    }
}

/// Audit middleware service
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    audit: AuditService,
}

impl<S> Service<Request> for AuditMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // Keep the instance that was polled ready
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let audit = self.audit.clone();

        Box::pin(async move {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| request.uri().path().to_string());

            let Some(action) = classify(request.method(), &route, request.uri().query()) else {
                return inner.call(request).await;
            };

            let started = Instant::now();
            let (parts, body) = request.into_parts();
            let body_bytes = collect_body(body, "request").await;
            let ctx = RequestContext::from_parts(&parts);
            let body_json = parse_json(&body_bytes);

            let opened = match pending_entry(&audit, &ctx, action, body_json.as_ref()).await {
                Ok(entry) => audit.begin(entry).await,
                Err(e) => Err(e),
            };
            let audit_id = match opened {
                Ok(record) => {
                    debug!(audit_id = record.id, action = %action, path = %ctx.path, "Audit record opened");
                    Some(record.id)
                }
                Err(e) => {
                    error!(error = %e, action = %action, path = %ctx.path, "Failed to write pending audit record");
                    None
                }
            };

            let request = Request::from_parts(parts, Body::from(body_bytes));
            let result = inner.call(request).await;

            match result {
                Ok(response) => {
                    let (response, completion) = capture_response(response, started).await;
                    finish(&audit, audit_id, completion).await;
                    Ok(response)
                }
                Err(e) => {
                    let completion = AuditCompletion::failure(e.to_string(), elapsed_ms(started));
                    finish(&audit, audit_id, completion).await;
                    Err(e)
                }
            }
        })
    }
}

async fn collect_body(body: Body, kind: &'static str) -> Bytes {
    match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, kind, "Failed to buffer body for auditing");
            Bytes::new()
        }
    }
}

fn parse_json(bytes: &Bytes) -> Option<JsonValue> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

fn elapsed_ms(started: Instant) -> i64 {
    i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX)
}

/// `id` path parameter, else an `id` field in the body
fn entity_id(ctx: &RequestContext, body: Option<&JsonValue>) -> Option<String> {
    if let Some(id) = ctx.entity_id() {
        return Some(id.to_string());
    }

    match body?.get("id")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

async fn pending_entry(
    audit: &AuditService,
    ctx: &RequestContext,
    action: AuditAction,
    body: Option<&JsonValue>,
) -> AuditResult<NewAuditRecord> {
    let entity = entity_type_for(&ctx.route);
    let entity_id = entity_id(ctx, body);
    let metadata = audit
        .metadata_for(entity, &ctx.method, entity_id.as_deref(), body)
        .await;

    let description = describe(&DescriptionParts {
        entity,
        action,
        method: &ctx.method,
        path: &ctx.path,
        entity_id: entity_id.as_deref(),
        body,
        metadata: metadata.as_ref(),
        search_term: ctx.search_term(),
    });

    let request_data = json!({
        "params": ctx.path_params,
        "query": ctx.query_params,
        "body": body.map(sanitize_body),
        "headers": sanitize_headers(&ctx.headers),
    });

    let endpoint = match ctx.query.as_deref() {
        Some(query) => format!("{}?{}", ctx.path, query),
        None => ctx.path.clone(),
    };

    let user = ctx.user.as_ref();

    let mut builder = NewAuditRecord::builder()
        .user(
            user.map(|u| u.id),
            user.and_then(|u| u.email.clone()),
            user.and_then(|u| u.display_name()),
        )
        .action(action)
        .entity(entity, entity_id)
        .description(description)
        .request_data(request_data)
        .status(AuditStatus::Pending)
        .ip_address(ctx.client_ip.clone())
        .endpoint(ctx.method.to_string(), endpoint);

    if let Some(user_agent) = ctx.user_agent.clone() {
        builder = builder.user_agent(user_agent);
    }
    if let Some(metadata) = metadata {
        builder = builder.metadata(metadata);
    }

    builder
        .try_build()
        .map_err(|e| AuditError::InvalidRecord(e.to_string()))
}

/// Message for a failed response: `error.message`, `message`, `error`, else
/// the status reason phrase
fn error_message(status: StatusCode, body: Option<&JsonValue>) -> String {
    let from_body = body.and_then(|b| {
        b.pointer("/error/message")
            .and_then(JsonValue::as_str)
            .or_else(|| b.get("message").and_then(JsonValue::as_str))
            .or_else(|| b.get("error").and_then(JsonValue::as_str))
    });

    match from_body {
        Some(message) => message.to_string(),
        None => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string()),
    }
}

/// Buffer the response, derive the completion and rebuild the response
async fn capture_response(response: Response, started: Instant) -> (Response, AuditCompletion) {
    let (parts, body) = response.into_parts();
    let bytes = collect_body(body, "response").await;
    let elapsed = elapsed_ms(started);
    let json = parse_json(&bytes);

    let completion = if parts.status.is_client_error() || parts.status.is_server_error() {
        AuditCompletion::failure(error_message(parts.status, json.as_ref()), elapsed)
    } else {
        AuditCompletion::success(json.as_ref().map(sanitize_response), elapsed)
    };

    (Response::from_parts(parts, Body::from(bytes)), completion)
}

async fn finish(audit: &AuditService, audit_id: Option<i64>, completion: AuditCompletion) {
    let Some(id) = audit_id else {
        return;
    };

    let status = completion.status;
    match audit.complete(id, completion).await {
        Ok(_) => debug!(audit_id = id, status = %status, "Audit record completed"),
        Err(e) => error!(audit_id = id, error = %e, "Failed to complete audit record"),
    }
}
