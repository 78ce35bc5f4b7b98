// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Paladin Chat
//!
//! A minimal real-time chat service:
//!
//! - Message history and submission over a JSON API backed by SurrealDB
//! - Live updates for browsers over Server-Sent Events
//! - Per-IP sliding-window rate limiting (20 requests per minute default)
//! - Permissive CORS with 204 preflight responses on API routes
//! - A single-page browser client served from `/`

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
pub mod validator;

pub use crate::config::Config;
pub use crate::limiter::{RateLimitResult, RateLimiter};
pub use crate::routes::{router, serve};
pub use crate::store::{Database, MessageStore};
pub use crate::validator::{MessageValidator, ValidationResult};
