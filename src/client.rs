// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Browser client served at `/`.
//!
//! The page validates the form with the same limits the API enforces;
//! they are substituted into the template at request time.

use crate::config::ValidationConfig;
use crate::handlers::AppState;
use crate::store::MessageStore;
use axum::{extract::State, response::Html};
use std::sync::Arc;

const TEMPLATE: &str = include_str!("../assets/index.html");

/// Render the client page with the configured payload limits.
pub fn render_page(limits: &ValidationConfig) -> String {
    TEMPLATE
        .replace("{{AUTHOR_MAX}}", &limits.author_max_chars.to_string())
        .replace("{{CONTENT_MAX}}", &limits.content_max_chars.to_string())
}

pub async fn index<S: MessageStore>(State(state): State<Arc<AppState<S>>>) -> Html<String> {
    Html(render_page(state.validator.config()))
}
