// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the chat API.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::feed::MessageFeed;
use crate::limiter::RateLimiter;
use crate::metrics::Metrics;
use crate::models::{Message, NewMessage};
use crate::store::MessageStore;
use crate::validator::{MessageValidator, ValidationResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared application state.
pub struct AppState<S> {
    pub store: S,
    pub limiter: RateLimiter,
    pub validator: MessageValidator,
    pub feed: MessageFeed,
    pub metrics: Metrics,
    pub config: Config,
}

impl<S: MessageStore> AppState<S> {
    pub fn new(store: S, config: Config) -> std::result::Result<Arc<Self>, prometheus::Error> {
        Ok(Arc::new(Self {
            store,
            limiter: RateLimiter::new(config.rate_limit.clone()),
            validator: MessageValidator::new(config.validation.clone()),
            feed: MessageFeed::new(config.feed.capacity),
            metrics: Metrics::new()?,
            config,
        }))
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "paladin-chat",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Most recent messages, oldest first.
pub async fn list_messages<S: MessageStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Message>>> {
    let messages = state
        .store
        .list(state.config.store.history_limit)
        .await
        .map_err(|e| {
            state.metrics.store_failures.inc();
            AppError::FetchFailed(e)
        })?;

    debug!(count = messages.len(), "Fetched messages");
    Ok(Json(messages))
}

/// Validate and append a new message, then publish it to the live feed.
pub async fn create_message<S: MessageStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: std::result::Result<Json<NewMessage>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>)> {
    let Json(payload) = payload?;

    if let ValidationResult::Invalid(err) = state
        .validator
        .validate(payload.author.as_deref(), payload.content.as_deref())
    {
        info!(error = %err, "Message rejected");
        return Err(err.into());
    }

    // Validation guarantees both fields are present
    let author = payload.author.as_deref().unwrap_or_default().trim();
    let content = payload.content.as_deref().unwrap_or_default().trim();

    let message = state.store.append(author, content).await.map_err(|e| {
        state.metrics.store_failures.inc();
        AppError::SendFailed(e)
    })?;

    state.metrics.messages_created.inc();
    info!(id = %message.id, author = %message.author, "Message created");
    state.feed.publish(&message);

    Ok((StatusCode::CREATED, Json(message)))
}

/// Server-Sent Events stream of newly created messages.
pub async fn stream_messages<S: MessageStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    debug!(subscribers = state.feed.subscriber_count() + 1, "Feed subscriber connected");

    let events = state
        .feed
        .subscribe()
        .map(|message| Event::default().event("message").json_data(&message));

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Prometheus text exposition.
pub async fn metrics<S: MessageStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse> {
    let body = state.metrics.render()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

/// Fallback for unknown paths under `/api/`.
pub async fn api_not_found() -> AppError {
    AppError::NotFound
}
