// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for the chat service.

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub messages_created: IntCounter,
    pub requests_rate_limited: IntCounter,
    pub store_failures: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let messages_created =
            IntCounter::new("paladin_messages_created_total", "Messages appended to the store")?;
        let requests_rate_limited = IntCounter::new(
            "paladin_requests_rate_limited_total",
            "API requests rejected by the rate limiter",
        )?;
        let store_failures =
            IntCounter::new("paladin_store_failures_total", "Failed message store operations")?;

        registry.register(Box::new(messages_created.clone()))?;
        registry.register(Box::new(requests_rate_limited.clone()))?;
        registry.register(Box::new(store_failures.clone()))?;

        Ok(Self {
            registry,
            messages_created,
            requests_rate_limited,
            store_failures,
        })
    }

    /// Text exposition of all registered metrics.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
