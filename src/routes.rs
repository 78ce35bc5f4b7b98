// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Router assembly.

use crate::client::index;
use crate::handlers::{
    api_not_found, create_message, health, list_messages, metrics, stream_messages, AppState,
};
use crate::middleware::{cors, rate_limit};
use crate::store::MessageStore;
use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router.
///
/// Everything under `/api/` passes through CORS (outermost, so preflights
/// are answered without consuming quota) and then the rate limiter.
pub fn router<S: MessageStore>(state: Arc<AppState<S>>) -> Router {
    let api = Router::new()
        .route(
            "/messages",
            get(list_messages::<S>).post(create_message::<S>),
        )
        .route("/messages/stream", get(stream_messages::<S>))
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::<S>))
        .layer(middleware::from_fn(cors));

    let mut app = Router::new()
        .route("/", get(index::<S>))
        .route("/health", get(health))
        .route("/healthz", get(health))
        .nest("/api", api);

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics::<S>));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Serve the application until `shutdown` resolves.
///
/// Live feed streams are closed as soon as shutdown begins; otherwise the
/// graceful drain would wait on them forever.
pub async fn serve<S: MessageStore>(
    listener: TcpListener,
    state: Arc<AppState<S>>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let feed = state.feed.clone();
    let app = router(state);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.await;
        info!("Closing live feed for shutdown");
        feed.close();
    })
    .await
}
